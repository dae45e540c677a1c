use crate::core::framer::{line_queue, LineFramer};
use crate::core::scheduler::{RenderScheduler, SchedulerStats};
use crate::domain::ports::{ConfigProvider, Renderer};
use crate::utils::error::{Result, SignError};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;

/// Cloneable trigger for a cooperative shutdown of a running [`SignReceiver`].
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.tx.send_replace(true);
    }
}

/// A bound listener plus the render loop that consumes its lines.
pub struct SignReceiver<R: Renderer> {
    framer: LineFramer,
    scheduler: RenderScheduler<R>,
    shutdown: ShutdownHandle,
}

impl<R: Renderer> SignReceiver<R> {
    /// Binds the configured transport. Bind failures are fatal and returned as
    /// [`SignError::BindError`].
    pub async fn bind<C: ConfigProvider>(config: &C, renderer: R) -> Result<Self> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (lines_tx, lines_rx) = line_queue();

        let address = config.bind_address();
        let framer = LineFramer::bind(config.transport(), &address, lines_tx, shutdown_rx).await?;
        tracing::debug!("Bound {} listener on {}", config.transport().as_str(), address);

        let scheduler = RenderScheduler::from_config(config, lines_rx, renderer);

        Ok(Self {
            framer,
            scheduler,
            shutdown: ShutdownHandle {
                tx: Arc::new(shutdown_tx),
            },
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.framer.local_addr()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Runs until the shutdown handle fires, then waits for the listener to
    /// close its sockets.
    ///
    /// The render loop gets its own blocking thread so a slow renderer cannot
    /// starve the listener tasks.
    pub async fn run(self) -> Result<SchedulerStats>
    where
        R: 'static,
    {
        let framer_task = tokio::spawn(self.framer.run());

        let scheduler = self.scheduler;
        let shutdown_rx = self.shutdown.tx.subscribe();
        let rendered = tokio::task::spawn_blocking(move || scheduler.run(shutdown_rx)).await;

        self.shutdown.shutdown();
        let framed = framer_task.await;

        let stats = rendered.map_err(|e| SignError::TaskError {
            message: format!("render loop: {}", e),
        })?;
        framed.map_err(|e| SignError::TaskError {
            message: format!("line framer: {}", e),
        })?;

        tracing::info!("✅ Receiver shut down cleanly");
        Ok(stats)
    }
}
