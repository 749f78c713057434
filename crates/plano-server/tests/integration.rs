use axum::http::StatusCode;
use http_body_util::BodyExt;
use plano_core::config::Backend;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Initialize a workspace in `dir` and build a router over it.
fn app(dir: &TempDir, backend: Backend) -> axum::Router {
    plano_core::setup::init(dir.path(), "Prefeitura de Teste", backend).unwrap();
    let state = plano_server::AppState::open(dir.path().to_path_buf()).unwrap();
    plano_server::build_router(state)
}

/// Send a request via `oneshot` and return (status, parsed JSON body).
async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = axum::http::Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None).await
}

async fn post_json(
    app: &axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(body)).await
}

async fn create_unit(app: &axum::Router, acronym: &str) -> String {
    let (status, json) = post_json(
        app,
        "/api/units",
        serde_json::json!({ "name": format!("Secretaria {acronym}"), "acronym": acronym }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json["id"].as_str().unwrap().to_string()
}

async fn create_program(app: &axum::Router, unit_id: &str, name: &str) -> (StatusCode, serde_json::Value) {
    post_json(
        app,
        "/api/programs",
        serde_json::json!({ "unit_id": unit_id, "axis_id": "social", "name": name }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn seeded_axes_are_listed() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, Backend::Document);
    let (status, json) = get(&app, "/api/axes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn invalid_unit_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, Backend::Sql);
    let (status, json) = post_json(
        &app,
        "/api/units",
        serde_json::json!({ "name": "Secretaria", "acronym": "x" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("acronym"));
}

#[tokio::test]
async fn sixth_program_conflicts_and_is_not_stored() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, Backend::Sql);
    let unit = create_unit(&app, "SEMED").await;

    for i in 0..5 {
        let (status, _) = create_program(&app, &unit, &format!("Programa {i}")).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, json) = create_program(&app, &unit, "Programa 6").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("maximum of 5"));

    let (_, list) = get(&app, &format!("/api/programs?unit={unit}")).await;
    assert_eq!(list.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn program_for_unknown_unit_is_404() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, Backend::Document);
    let (status, _) = create_program(&app, "ghost", "Programa").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn completion_requires_evidence() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, Backend::Document);
    let unit = create_unit(&app, "SEMOB").await;
    let (_, program) = create_program(&app, &unit, "Pavimentação").await;
    let program_id = program["id"].as_str().unwrap();

    let (status, action) = post_json(
        &app,
        &format!("/api/programs/{program_id}/actions"),
        serde_json::json!({ "title": "Asfaltar avenida" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let action_id = action["id"].as_str().unwrap();
    let status_uri = format!("/api/actions/{action_id}/status");

    let (status, json) = send(
        &app,
        "PUT",
        &status_uri,
        Some(serde_json::json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("Asfaltar avenida"));

    let (status, _) = post_json(
        &app,
        &format!("/api/actions/{action_id}/evidence"),
        serde_json::json!({ "title": "Foto", "url": "https://files.example/f.jpg", "kind": "photo" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, detail) = get(&app, &format!("/api/actions/{action_id}")).await;
    assert_eq!(detail["can_complete"], true);

    let (status, json) = send(
        &app,
        "PUT",
        &status_uri,
        Some(serde_json::json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "completed");
}

#[tokio::test]
async fn unknown_status_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, Backend::Sql);
    let (status, _) = send(
        &app,
        "PUT",
        "/api/actions/any/status",
        Some(serde_json::json!({ "status": "finished" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn validate_reports_missing_children() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, Backend::Sql);
    let unit = create_unit(&app, "SMS").await;
    let (_, program) = create_program(&app, &unit, "Saúde da Família").await;
    let program_id = program["id"].as_str().unwrap();

    let (status, json) = get(&app, &format!("/api/programs/{program_id}/validate")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["is_valid"], false);
    assert_eq!(json["errors"].as_array().unwrap().len(), 2);

    post_json(
        &app,
        &format!("/api/programs/{program_id}/indicators"),
        serde_json::json!({ "name": "Cobertura", "baseline": 60.0, "target": 90.0, "unit_of_measure": "%" }),
    )
    .await;
    let (_, action) = post_json(
        &app,
        &format!("/api/programs/{program_id}/actions"),
        serde_json::json!({ "title": "Contratar agentes" }),
    )
    .await;
    let action_id = action["id"].as_str().unwrap();

    let (_, json) = get(&app, &format!("/api/programs/{program_id}/validate")).await;
    assert_eq!(
        json["errors"],
        serde_json::json!(["Action 'Contratar agentes' must have at least 1 deliverable."])
    );

    post_json(
        &app,
        &format!("/api/actions/{action_id}/deliverables"),
        serde_json::json!({ "description": "Agentes", "quantity": 40.0, "unit_of_measure": "pessoas" }),
    )
    .await;
    let (_, json) = get(&app, &format!("/api/programs/{program_id}/validate")).await;
    assert_eq!(json["is_valid"], true);
}

#[tokio::test]
async fn session_runs_automation_and_alerts_once() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, Backend::Document);
    let unit = create_unit(&app, "SEMAD").await;
    let (_, program) = create_program(&app, &unit, "Gestão Digital").await;
    let program_id = program["id"].as_str().unwrap();

    let (_, user) = post_json(
        &app,
        "/api/users",
        serde_json::json!({ "display_name": "João Conceição", "role": "gestor", "unit_id": unit }),
    )
    .await;
    let user_id = user["id"].as_str().unwrap().to_string();

    let (_, action) = post_json(
        &app,
        &format!("/api/programs/{program_id}/actions"),
        serde_json::json!({
            "title": "Migrar protocolo",
            "responsible": "joao conceicao",
            "end_date": "2026-03-01",
        }),
    )
    .await;
    let action_id = action["id"].as_str().unwrap();

    let body = serde_json::json!({ "user_id": user_id, "today": "2026-03-02" });
    let (status, first) = post_json(&app, "/api/session", body.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["automation"]["changes"].as_array().unwrap().len(), 1);
    assert_eq!(first["alerts"].as_array().unwrap().len(), 1);
    assert_eq!(first["alerts"][0]["reasons"], serde_json::json!(["delayed"]));

    let (_, detail) = get(&app, &format!("/api/actions/{action_id}")).await;
    assert_eq!(detail["action"]["status"], "delayed");

    let (_, second) = post_json(&app, "/api/session", body.clone()).await;
    assert!(second["alerts"].as_array().unwrap().is_empty());
    assert_eq!(second["alerts_already_shown"], true);

    let (status, ended) = send(&app, "DELETE", &format!("/api/session/{user_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ended["ended"], true);

    let (_, third) = post_json(&app, "/api/session", body).await;
    assert_eq!(third["alerts"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn session_for_unknown_user_is_404() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, Backend::Sql);
    let (status, _) = post_json(&app, "/api/session", serde_json::json!({ "user_id": "ghost" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn automation_run_reports_changes() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, Backend::Sql);
    let unit = create_unit(&app, "SEMAS").await;
    let (_, program) = create_program(&app, &unit, "Assistência").await;
    let program_id = program["id"].as_str().unwrap();
    post_json(
        &app,
        &format!("/api/programs/{program_id}/actions"),
        serde_json::json!({ "title": "Cadastro", "end_date": "2026-01-10" }),
    )
    .await;

    let (status, report) = send(&app, "POST", "/api/automation/run?today=2026-01-11", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["examined"], 1);
    assert_eq!(report["changes"][0]["to"], "delayed");

    let (_, again) = send(&app, "POST", "/api/automation/run?today=2026-01-11", None).await;
    assert!(again["changes"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn generic_delete_is_hard_and_does_not_cascade() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, Backend::Document);
    let unit = create_unit(&app, "SEMMA").await;
    let (_, program) = create_program(&app, &unit, "Arborização").await;
    let program_id = program["id"].as_str().unwrap();

    let (_, risk) = post_json(
        &app,
        &format!("/api/programs/{program_id}/risks"),
        serde_json::json!({ "description": "Seca", "impact": 4, "probability": 3 }),
    )
    .await;
    assert_eq!(risk["severity"], 12);
    let risk_id = risk["id"].as_str().unwrap();

    let (status, _) = send(&app, "DELETE", &format!("/api/risks/{risk_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", &format!("/api/risks/{risk_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", "/api/widgets/x", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, action) = post_json(
        &app,
        &format!("/api/programs/{program_id}/actions"),
        serde_json::json!({ "title": "Plantio" }),
    )
    .await;
    let (status, _) = send(&app, "DELETE", &format!("/api/programs/{program_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app, &format!("/api/actions/{}", action["id"].as_str().unwrap())).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn dashboard_is_scoped_by_user() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, Backend::Sql);
    let own = create_unit(&app, "SEMED").await;
    let other = create_unit(&app, "SEMOB").await;
    create_program(&app, &own, "Escola Integral").await;
    create_program(&app, &other, "Pavimentação").await;

    let (_, focal) = post_json(
        &app,
        "/api/users",
        serde_json::json!({ "display_name": "Carla", "role": "focal", "unit_id": own }),
    )
    .await;
    let focal_id = focal["id"].as_str().unwrap();

    let (_, all) = get(&app, "/api/dashboard").await;
    assert_eq!(all["units"].as_array().unwrap().len(), 2);

    let (status, scoped) = get(&app, &format!("/api/dashboard?user={focal_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(scoped["units"].as_array().unwrap().len(), 1);
    assert_eq!(scoped["units"][0]["unit_id"], own.as_str());

    let (_, programs) = get(&app, &format!("/api/programs?user={focal_id}")).await;
    assert_eq!(programs.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn editable_flag_follows_viewer_unit() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, Backend::Document);
    let own = create_unit(&app, "SEMED").await;
    let other = create_unit(&app, "SEMOB").await;
    let (_, program) = create_program(&app, &own, "Escola Integral").await;
    let program_id = program["id"].as_str().unwrap();
    let (_, action) = post_json(
        &app,
        &format!("/api/programs/{program_id}/actions"),
        serde_json::json!({ "title": "Reformar salas" }),
    )
    .await;
    let action_id = action["id"].as_str().unwrap();

    let mut users = Vec::new();
    for (name, role, unit) in [
        ("Carla", "gestor", Some(own.as_str())),
        ("Rui", "gestor", Some(other.as_str())),
        ("Marta", "controladoria", None),
    ] {
        let (status, user) = post_json(
            &app,
            "/api/users",
            serde_json::json!({ "display_name": name, "role": role, "unit_id": unit }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{user}");
        users.push(user["id"].as_str().unwrap().to_string());
    }

    let (_, anonymous) = get(&app, &format!("/api/programs/{program_id}")).await;
    assert!(anonymous["editable"].is_null());

    for (user, expected) in users.iter().zip([true, false, false]) {
        let (status, detail) = get(&app, &format!("/api/programs/{program_id}?user={user}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["editable"], expected);

        let (_, detail) = get(&app, &format!("/api/actions/{action_id}?user={user}")).await;
        assert_eq!(detail["editable"], expected);
    }

    let (status, _) = get(&app, &format!("/api/programs/{program_id}?user=ghost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Store whose action listings fail; everything else goes to SQLite.
struct ActionsUnreadable(plano_core::store::SqlStore);

impl plano_core::repository::Repository for ActionsUnreadable {
    fn backend(&self) -> &'static str {
        "actions-unreadable"
    }
    fn get(
        &self,
        c: plano_core::record::Collection,
        id: &str,
    ) -> plano_core::Result<Option<plano_core::record::Document>> {
        self.0.get(c, id)
    }
    fn list(
        &self,
        c: plano_core::record::Collection,
        parent: Option<&str>,
    ) -> plano_core::Result<Vec<plano_core::record::Document>> {
        if c == plano_core::record::Collection::Actions {
            return Err(plano_core::PlanoError::Storage("actions table offline".into()));
        }
        self.0.list(c, parent)
    }
    fn insert(
        &self,
        c: plano_core::record::Collection,
        doc: &plano_core::record::Document,
    ) -> plano_core::Result<()> {
        self.0.insert(c, doc)
    }
    fn insert_bounded(
        &self,
        c: plano_core::record::Collection,
        doc: &plano_core::record::Document,
        limit: usize,
    ) -> plano_core::Result<bool> {
        self.0.insert_bounded(c, doc, limit)
    }
    fn update(
        &self,
        c: plano_core::record::Collection,
        doc: &plano_core::record::Document,
    ) -> plano_core::Result<()> {
        self.0.update(c, doc)
    }
    fn delete(&self, c: plano_core::record::Collection, id: &str) -> plano_core::Result<bool> {
        self.0.delete(c, id)
    }
}

#[tokio::test]
async fn session_load_survives_unreadable_actions() {
    use plano_core::repository::RepositoryExt;

    let dir = TempDir::new().unwrap();
    let store = plano_core::store::SqlStore::open_in_memory().unwrap();
    let user = plano_core::user::UserProfile::new("Ana", plano_core::types::Role::Admin);
    store.insert_record(&user).unwrap();

    let state = plano_server::AppState::with_repo(
        dir.path().to_path_buf(),
        plano_core::config::Config::new("Prefeitura de Teste"),
        std::sync::Arc::new(ActionsUnreadable(store)),
    );
    let app = plano_server::build_router(state);

    let body = serde_json::json!({ "user_id": user.id, "today": "2026-03-02" });
    let (status, start) = post_json(&app, "/api/session", body).await;
    assert_eq!(status, StatusCode::OK, "{start}");
    assert_eq!(start["automation"]["aborted"], true);
    assert!(start["alerts"].as_array().unwrap().is_empty());
    assert_eq!(start["alerts_already_shown"], false);
}
