use anyhow::Context;
use std::path::Path;

/// Serve the JSON API until Ctrl-C.
pub fn run(root: &Path, port: u16, no_open: bool) -> anyhow::Result<()> {
    // Fail before binding when the workspace is missing.
    let (config, _) = super::open(root)?;
    let name = config.project.name;

    let rt = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let root_buf = root.to_path_buf();

    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
            .await
            .with_context(|| format!("failed to bind port {port}"))?;
        let actual_port = listener.local_addr()?.port();
        println!("plano API for '{name}' → http://localhost:{actual_port}/api");

        tokio::select! {
            res = plano_server::serve_on(root_buf, listener, !no_open) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
