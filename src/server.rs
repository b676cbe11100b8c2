//! Owned start/stop lifecycle around the HTTP listener.
//!
//! The listener state lives in this object instead of process-wide
//! globals, so tests can run several instances side by side and whoever
//! owns the `Lifecycle` decides when serving ends.

use std::net::SocketAddr;

use anyhow::{Context, Result, bail};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::info;

/// Handle that owns the listening task.
///
/// `start` and `stop` are safe to call concurrently; the mutex guards
/// only lifecycle transitions and is never taken on the request path.
#[derive(Default)]
pub struct Lifecycle {
    inner: Mutex<Option<Running>>,
}

struct Running {
    addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<std::io::Result<()>>,
}

impl Lifecycle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `addr` and start serving `router` in a background task.
    /// Returns the bound address (port 0 resolves to a real port).
    /// Fails if the server is already started.
    pub async fn start(&self, addr: &str, router: Router) -> Result<SocketAddr> {
        let mut slot = self.inner.lock().await;
        if slot.is_some() {
            bail!("server already started");
        }

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        let local_addr = listener
            .local_addr()
            .context("failed to read local address")?;

        let (shutdown, mut signal) = watch::channel(false);
        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = signal.changed().await;
                })
                .await
        });

        info!(%local_addr, "listening for connections");
        *slot = Some(Running {
            addr: local_addr,
            shutdown,
            task,
        });

        Ok(local_addr)
    }

    /// Stop the server if it is running and wait for the serve task to
    /// finish. No-op when not started.
    pub async fn stop(&self) -> Result<()> {
        let running = self.inner.lock().await.take();
        let Some(running) = running else {
            return Ok(());
        };

        let _ = running.shutdown.send(true);
        let served = running.task.await.context("serve task panicked")?;
        served.context("server terminated with error")?;

        info!("server stopped");
        Ok(())
    }

    /// Address the server is currently bound to, if running.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.inner.lock().await.as_ref().map(|running| running.addr)
    }
}
