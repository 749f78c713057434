pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, post, put};
use axum::Router;
use plano_core::repository::Repository;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Units, axes, users
        .route(
            "/api/units",
            get(routes::units::list_units).post(routes::units::create_unit),
        )
        .route(
            "/api/units/{id}",
            get(routes::units::get_unit).delete(routes::records::delete_unit),
        )
        .route(
            "/api/axes",
            get(routes::units::list_axes).post(routes::units::create_axis),
        )
        .route(
            "/api/users",
            get(routes::units::list_users).post(routes::units::create_user),
        )
        // Programs
        .route(
            "/api/programs",
            get(routes::programs::list_programs).post(routes::programs::create_program),
        )
        .route(
            "/api/programs/{id}",
            get(routes::programs::get_program).delete(routes::records::delete_program),
        )
        .route(
            "/api/programs/{id}/validate",
            get(routes::programs::validate_program),
        )
        .route(
            "/api/programs/{id}/dashboard",
            get(routes::programs::program_dashboard),
        )
        .route(
            "/api/programs/{id}/projects",
            get(routes::programs::list_projects).post(routes::programs::create_project),
        )
        .route(
            "/api/programs/{id}/actions",
            get(routes::programs::list_actions).post(routes::programs::create_action),
        )
        .route(
            "/api/programs/{id}/indicators",
            get(routes::programs::list_indicators).post(routes::programs::create_indicator),
        )
        .route(
            "/api/programs/{id}/risks",
            get(routes::programs::list_risks).post(routes::programs::create_risk),
        )
        // Actions
        .route(
            "/api/actions/{id}",
            get(routes::actions::get_action).delete(routes::records::delete_action),
        )
        .route("/api/actions/{id}/status", put(routes::actions::set_status))
        .route(
            "/api/actions/{id}/deliverables",
            get(routes::actions::list_deliverables).post(routes::actions::create_deliverable),
        )
        .route(
            "/api/actions/{id}/evidence",
            get(routes::actions::list_evidence).post(routes::actions::create_evidence),
        )
        // Automation, sessions, dashboard
        .route(
            "/api/automation/run",
            post(routes::session::run_automation),
        )
        .route("/api/session", post(routes::session::start_session))
        .route(
            "/api/session/{user_id}",
            delete(routes::session::end_session),
        )
        .route("/api/dashboard", get(routes::dashboard::overview))
        // Remaining deletes
        .route(
            "/api/{collection}/{id}",
            delete(routes::records::delete_record),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the plano API server.
pub async fn serve(root: PathBuf, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(root, listener, open_browser).await
}

/// Start the plano API server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app_state = AppState::open(root)?;
    tracing::info!(
        project = %app_state.config.project.name,
        backend = app_state.repo.backend(),
        "plano server listening on http://localhost:{actual_port}"
    );
    let app = build_router(app_state);

    if open_browser {
        let url = format!("http://localhost:{actual_port}/api/dashboard");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
