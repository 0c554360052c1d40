//! Periodic reconciliation daemon
//!
//! Repeatedly invokes the [`Reconciler`] on a fixed interval. A single bad
//! cycle is logged and never terminates the loop; only an explicit
//! cancellation signal (Ctrl-C in production, a oneshot channel
//! under test) ends it.
//!
//! Cycles are strictly sequential: the next cycle begins only after the
//! previous cycle completed plus the full interval elapsed, so cycles never
//! overlap and no state is shared across them. Each cycle is a single plain
//! `reconcile` call, not the retry-wrapped variant; the next interval is
//! itself the natural retry.

use crate::engine::Reconciler;
use crate::types::Reconciliation;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{error, info};

/// Long-running periodic driver for a [`Reconciler`]
pub struct Daemon {
    reconciler: Reconciler,
    interval: Duration,
}

impl Daemon {
    /// Create a daemon that reconciles every `interval`
    pub fn new(reconciler: Reconciler, interval: Duration) -> Self {
        Self {
            reconciler,
            interval,
        }
    }

    /// Run until a SIGINT (Ctrl-C) is received.
    ///
    /// An in-flight reconciliation finishes before cancellation is honored;
    /// the signal is only checked between cycles and during the sleep.
    pub async fn run(&self) {
        self.run_internal(None).await
    }

    /// Run with a controlled shutdown channel.
    ///
    /// This is `pub` for testing: contract tests need deterministic
    /// shutdown. Production code should use [`Daemon::run`], which ties
    /// cancellation to OS signals.
    pub async fn run_with_shutdown(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) {
        self.run_internal(shutdown_rx).await
    }

    async fn run_internal(&self, shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>) {
        info!(
            hostname = %self.reconciler.hostname(),
            interval_secs = self.interval.as_secs(),
            "starting dyndns daemon"
        );

        // One loop for both modes; only the cancellation source differs.
        let mut shutdown: Pin<Box<dyn Future<Output = ()> + Send>> = match shutdown_rx {
            Some(rx) => Box::pin(async move {
                let _ = rx.await;
            }),
            None => Box::pin(async {
                let _ = tokio::signal::ctrl_c().await;
            }),
        };

        loop {
            self.run_cycle().await;

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = &mut shutdown => {
                    info!("shutdown signal received, stopping daemon");
                    break;
                }
            }
        }
    }

    /// Run one cycle, isolating any failure so the loop stays alive
    async fn run_cycle(&self) {
        match self.reconciler.reconcile(None).await {
            Ok(Reconciliation::Unchanged { ip }) => {
                info!(hostname = %self.reconciler.hostname(), ip = %ip, "cycle: IP unchanged");
            }
            Ok(Reconciliation::Updated {
                previous_ip,
                new_ip,
            }) => {
                info!(
                    hostname = %self.reconciler.hostname(),
                    old_ip = %previous_ip,
                    new_ip = %new_ip,
                    "cycle: registry updated"
                );
            }
            Err(err) => {
                error!(
                    hostname = %self.reconciler.hostname(),
                    error = %err,
                    "cycle failed, will retry next interval"
                );
            }
        }
    }
}
