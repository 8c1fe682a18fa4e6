use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{ApiState, api_routes};
use crate::config::Config;
use crate::error::Error;
use crate::middleware::{AuthConfig, SessionVerifier, with_auth};
use crate::pages::page_routes;
use crate::upstream::NavitimeClient;
use crate::verify::VerifyClient;

/// Assemble the full application: pages, proxy endpoints and auth routes,
/// all behind the session gate.
pub fn app<V: SessionVerifier>(navitime: NavitimeClient, auth: AuthConfig, verifier: V) -> Router {
    let routes = page_routes().merge(api_routes(ApiState::new(navitime)));
    with_auth(routes, auth, verifier).layer(TraceLayer::new_for_http())
}

/// Bind `0.0.0.0:{port}` and serve until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns [`Error::Io`] if the listener cannot be bound or the server fails,
/// and [`Error::Config`] if the verify endpoint URL is invalid.
pub async fn serve(config: Config) -> Result<(), Error> {
    let verifier = VerifyClient::new(config.auth.auth_server_url())?;
    let navitime = NavitimeClient::new(config.navitime);
    let router = app(navitime, config.auth, verifier);

    let address = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(address).await?;
    info!("Server running on {address}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
