//! A concurrent service runner that manages long-running processes with graceful shutdown.
//!
//! The runner orchestrates named app processes and ordered cleanup functions:
//! - Processes run concurrently until one fails or a shutdown signal arrives
//! - SIGTERM/SIGINT cancel the shared token, letting every process drain
//! - Closers run afterwards in registration order, under a shared timeout
//! - The process exits non-zero when any app process or closer failed
//!
//! # Example
//!
//! ```no_run
//! use skywatch_runner::Runner;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     Runner::new()
//!         .with_named_process("heartbeat", |ctx| async move {
//!             loop {
//!                 tokio::select! {
//!                     _ = ctx.cancelled() => {
//!                         tracing::info!("heartbeat stopping");
//!                         break;
//!                     }
//!                     _ = tokio::time::sleep(Duration::from_secs(1)) => {
//!                         tracing::info!("tick");
//!                     }
//!                 }
//!             }
//!             Ok(())
//!         })
//!         .with_closer(|| async move {
//!             tracing::info!("releasing resources");
//!             Ok(())
//!         })
//!         .with_closer_timeout(Duration::from_secs(5))
//!         .run()
//!         .await;
//! }
//! ```

pub mod telemetry;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// An app process function: takes the shared cancellation token, returns a
/// future that runs until done or cancelled.
pub type AppProcess = Box<
    dyn FnOnce(CancellationToken) -> Pin<Box<dyn Future<Output = Result<(), anyhow::Error>> + Send>>
        + Send,
>;

/// A cleanup function, run after every app process has stopped.
pub type Closer =
    Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = Result<(), anyhow::Error>> + Send>> + Send>;

pub struct Runner {
    processes: Vec<(String, AppProcess)>,
    closers: Vec<Closer>,
    closer_timeout: Duration,
    cancellation_token: CancellationToken,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    /// Creates an empty runner with a 10 second closer timeout.
    pub fn new() -> Self {
        Self {
            processes: Vec::new(),
            closers: Vec::new(),
            closer_timeout: Duration::from_secs(10),
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Adds a named app process.
    ///
    /// Processes run concurrently. When any process returns an error the
    /// shared token is cancelled and the remaining processes are expected
    /// to drain and return.
    pub fn with_named_process<F, Fut>(mut self, name: impl Into<String>, process: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), anyhow::Error>> + Send + 'static,
    {
        self.processes
            .push((name.into(), Box::new(|token| Box::pin(process(token)))));
        self
    }

    /// Adds a closer. Closers run after the processes have stopped, in the
    /// order they were registered, each awaited before the next starts.
    /// A failing closer does not stop the ones after it, but it does make
    /// the run exit non-zero.
    pub fn with_closer<F, Fut>(mut self, closer: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), anyhow::Error>> + Send + 'static,
    {
        self.closers.push(Box::new(|| Box::pin(closer())));
        self
    }

    /// Overrides the overall closer timeout (default 10 seconds).
    pub fn with_closer_timeout(mut self, timeout: Duration) -> Self {
        self.closer_timeout = timeout;
        self
    }

    /// Replaces the root cancellation token, giving callers external
    /// control over shutdown. Mostly useful in tests.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    /// Runs everything and exits the process when done: 0 when all
    /// processes and closers returned cleanly, 1 otherwise.
    pub async fn run(self) {
        let code = self.execute().await;
        if code == 0 {
            info!("exiting normally");
        } else {
            error!("exiting with code {}", code);
        }
        std::process::exit(code);
    }

    /// Drives the processes to completion and returns the exit code
    /// without terminating the process. `run` is a thin wrapper over this.
    pub async fn execute(self) -> i32 {
        let token = self.cancellation_token;
        let mut join_set: JoinSet<(String, Result<(), anyhow::Error>)> = JoinSet::new();

        for (name, process) in self.processes {
            let process_token = token.child_token();
            join_set.spawn(async move {
                let result = process(process_token).await;
                (name, result)
            });
        }

        let signal_token = token.clone();
        tokio::spawn(async move {
            wait_for_shutdown_signal().await;
            signal_token.cancel();
        });

        let mut failed = false;
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((name, Ok(()))) => {
                    debug!(process = %name, "app process completed");
                }
                Ok((name, Err(err))) => {
                    error!(process = %name, "app process failed: {:#}", err);
                    failed = true;
                    token.cancel();
                }
                Err(err) => {
                    error!(error = %err, "app process panicked");
                    failed = true;
                    token.cancel();
                }
            }
        }

        if !self.closers.is_empty() {
            info!(timeout = ?self.closer_timeout, "running closers");
            match tokio::time::timeout(self.closer_timeout, run_closers(self.closers)).await {
                Ok(true) => info!("all closers completed"),
                Ok(false) => failed = true,
                Err(_) => {
                    error!(timeout = ?self.closer_timeout, "closers timed out");
                    failed = true;
                }
            }
        }

        if failed {
            1
        } else {
            0
        }
    }
}

/// Runs closers one at a time, in registration order. Teardown steps often
/// depend on each other (stop the producer loop, then drop the connection),
/// so they are not raced. Returns false when any closer failed.
async fn run_closers(closers: Vec<Closer>) -> bool {
    let mut clean = true;
    for closer in closers {
        match closer().await {
            Ok(()) => debug!("closer completed"),
            Err(err) => {
                error!("closer failed: {:#}", err);
                clean = false;
            }
        }
    }
    clean
}

async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT"),
        _ = terminate => info!("received SIGTERM"),
    }
}
