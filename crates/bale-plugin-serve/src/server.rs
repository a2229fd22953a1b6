//! Static file server.

use std::path::PathBuf;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::info;

/// Router serving `dirs` in order: a path missing from one directory is
/// looked up in the next, and the last miss is a 404.
pub fn router(dirs: &[PathBuf]) -> Router {
    dirs.iter().rev().fold(Router::new(), |next, dir| {
        Router::new().fallback_service(ServeDir::new(dir).fallback(next))
    })
}

/// Serve until the task is dropped or aborted.
pub async fn serve(listener: TcpListener, dirs: Vec<PathBuf>) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, dirs = ?dirs, "development server listening");
    axum::serve(listener, router(&dirs)).await?;
    Ok(())
}
