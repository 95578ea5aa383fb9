//! Server lifecycle manager.
//!
//! Owns the listening socket and the run/shutdown state machine:
//! `Starting -> Serving -> Draining -> Stopped`. A bind failure at
//! `Starting` is fatal; once serving, the only way out is a termination
//! signal followed by a bounded drain.

use std::future::Future;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::{
    app_state::AppState,
    config::Config,
    error::{Result, ServerError},
    router,
};

/// How long `Draining` waits for in-flight requests before giving up.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug)]
enum Lifecycle {
    Starting,
    Serving,
    Draining,
    Stopped,
}

/// Bind the configured port. No retry: a bind failure is fatal and the
/// caller exits non-zero.
pub async fn bind(cfg: &Config) -> Result<TcpListener> {
    let addr = cfg.bind_addr();
    tracing::info!(state = ?Lifecycle::Starting, %addr, "binding listener");
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

/// Accept and dispatch until `shutdown` resolves, then finish in-flight
/// requests before returning.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = router::build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)
}

/// Run the full lifecycle: bind, serve in the background, block on the
/// termination signal, then drain with a bounded timeout.
pub async fn run(cfg: Config) -> Result<()> {
    let state = AppState::new();
    let listener = bind(&cfg).await?;
    let addr = listener.local_addr().map_err(ServerError::Serve)?;

    let (trigger, tripwire) = oneshot::channel::<()>();
    let mut task = tokio::spawn(serve(listener, state, async move {
        let _ = tripwire.await;
    }));
    tracing::info!(state = ?Lifecycle::Serving, %addr, "serving default backend");

    tokio::select! {
        res = &mut task => {
            // Accept loop died without a signal.
            return flatten(res);
        }
        _ = shutdown_signal() => {}
    }

    tracing::info!(state = ?Lifecycle::Draining, "signal received, draining in-flight requests");
    let _ = trigger.send(());
    drain(task, DRAIN_TIMEOUT).await;

    tracing::info!(state = ?Lifecycle::Stopped, "shutdown complete");
    Ok(())
}

/// Wait for the server task to finish, at most `timeout`. Exceeding the
/// timeout abandons in-flight requests with a warning; the shutdown
/// sequence still completes.
pub async fn drain(mut task: JoinHandle<Result<()>>, timeout: Duration) {
    match tokio::time::timeout(timeout, &mut task).await {
        Ok(res) => {
            if let Err(err) = flatten(res) {
                tracing::error!(%err, "server exited uncleanly during drain");
            }
        }
        Err(_) => {
            task.abort();
            tracing::warn!(
                timeout_secs = timeout.as_secs(),
                "drain timed out, abandoning in-flight requests"
            );
        }
    }
}

fn flatten(res: std::result::Result<Result<()>, tokio::task::JoinError>) -> Result<()> {
    match res {
        Ok(inner) => inner,
        Err(join_err) => Err(ServerError::Serve(std::io::Error::other(join_err))),
    }
}

/// Resolves on SIGTERM (unix) or Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
