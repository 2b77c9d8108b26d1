use tokio::net::TcpListener;

use super::*;

/// Binds the health endpoint up front so a bad `--health-addr` stops startup.
pub(crate) async fn bind(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Serving health checks on http://{addr}/healthz");
    }
    Ok(listener)
}

pub(crate) async fn serve(listener: TcpListener) {
    let app = Router::new().route("/healthz", get(healthz));
    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!(?err, "Health endpoint stopped");
    }
}

async fn healthz() -> &'static str {
    "ok"
}
