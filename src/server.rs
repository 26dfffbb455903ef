//! Process lifecycle: connect the store, bind, serve, and drain on SIGINT/SIGTERM.
//!
//! Connections are driven by hyper-util directly so that the request-head read
//! timeout and the idle-connection timeout can be enforced per connection.

use crate::config::AppConfig;
use crate::repository::{postgres, PgRepository};
use crate::routes::{app, IDLE_TIMEOUT, READ_TIMEOUT};
use crate::service::QnaService;
use crate::state::AppState;
use axum::{extract::ConnectInfo, Router};
use hyper::body::Incoming;
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto::Builder;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tower::Service;

const IDLE_CHECK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
    #[error("failed to prepare tables")]
    Schema(#[source] sqlx::Error),
    #[error("failed to bind {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// Wire the components once and serve until a termination signal arrives.
pub async fn run(config: AppConfig) -> Result<(), StartupError> {
    let pool = postgres::connect(&config.postgres).await.map_err(StartupError::Database)?;
    postgres::ensure_tables(&pool).await.map_err(StartupError::Schema)?;
    tracing::info!(
        host = %config.postgres.host,
        database = %config.postgres.database,
        max_connections = config.postgres.pool_max_conns,
        "database pool ready"
    );

    let repo = Arc::new(PgRepository::new(pool.clone()));
    let state = AppState {
        service: QnaService::new(repo.clone(), repo),
    };

    let addr = config.rest.addr();
    let listener = TcpListener::bind(&addr).await.map_err(|source| StartupError::Bind {
        addr: addr.clone(),
        source,
    })?;
    tracing::info!(addr = %addr, "server is running");

    serve(listener, app(state)).await;

    pool.close().await;
    tracing::info!("shut down gracefully");
    Ok(())
}

/// Accept until a shutdown signal, then wait for open connections to finish
/// their in-flight requests.
async fn serve(listener: TcpListener, router: Router) {
    let mut builder = Builder::new(TokioExecutor::new());
    builder
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(READ_TIMEOUT);

    let (close_tx, close_rx) = watch::channel(());
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        let (stream, remote) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to accept connection");
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    continue;
                }
            },
            _ = &mut shutdown => break,
        };
        tokio::spawn(serve_connection(
            builder.clone(),
            stream,
            remote,
            router.clone(),
            close_rx.clone(),
        ));
    }

    drop(listener);
    drop(close_rx);
    // Resolves once every connection task has dropped its receiver.
    close_tx.send_replace(());
    close_tx.closed().await;
}

async fn serve_connection(
    builder: Builder<TokioExecutor>,
    stream: TcpStream,
    remote: SocketAddr,
    router: Router,
    mut close_rx: watch::Receiver<()>,
) {
    let activity = Arc::new(Activity::new());
    let tracker = activity.clone();
    let service = hyper::service::service_fn(move |mut req: hyper::Request<Incoming>| {
        req.extensions_mut().insert(ConnectInfo(remote));
        let in_flight = tracker.begin();
        let fut = router.clone().call(req);
        async move {
            let response = fut.await;
            drop(in_flight);
            response
        }
    });

    let conn = builder.serve_connection_with_upgrades(TokioIo::new(stream), service);
    tokio::pin!(conn);
    let mut ticker = tokio::time::interval(IDLE_CHECK_INTERVAL);
    let mut closing = false;

    loop {
        tokio::select! {
            result = conn.as_mut() => {
                if let Err(e) = result {
                    tracing::debug!(%remote, error = %e, "connection closed with error");
                }
                break;
            }
            _ = close_rx.changed(), if !closing => {
                closing = true;
                conn.as_mut().graceful_shutdown();
            }
            _ = ticker.tick(), if !closing => {
                if activity.idle_for().is_some_and(|idle| idle >= IDLE_TIMEOUT) {
                    tracing::debug!(%remote, "closing idle connection");
                    closing = true;
                    conn.as_mut().graceful_shutdown();
                }
            }
        }
    }
}

/// Request activity on one connection.
struct Activity {
    in_flight: AtomicUsize,
    last_active: Mutex<Instant>,
}

impl Activity {
    fn new() -> Self {
        Activity {
            in_flight: AtomicUsize::new(0),
            last_active: Mutex::new(Instant::now()),
        }
    }

    fn begin(self: &Arc<Self>) -> InFlight {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        InFlight(self.clone())
    }

    fn touch(&self) {
        if let Ok(mut last) = self.last_active.lock() {
            *last = Instant::now();
        }
    }

    /// How long the connection has had nothing in flight. `None` while a request is being served.
    fn idle_for(&self) -> Option<Duration> {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            return None;
        }
        self.last_active.lock().ok().map(|last| last.elapsed())
    }
}

struct InFlight(Arc<Activity>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.touch();
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    };
    tracing::info!(signal, "shutting down server, draining in-flight requests");
}
