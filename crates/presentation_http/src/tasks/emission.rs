//! Emission loop task
//!
//! Runs the tick loop next to the HTTP server until shutdown is signalled.

use application::{EmissionLoop, LoopReport};
use tokio::{sync::watch, task::JoinHandle};
use tracing::info;

/// Spawn the emission loop on the runtime.
///
/// Send `true` on the paired `watch::Sender` (or drop it) to stop the loop;
/// the returned handle resolves once the tick in progress has finished.
///
/// # Example
///
/// ```ignore
/// let (shutdown_tx, shutdown_rx) = watch::channel(false);
/// let handle = spawn_emission_task(emission_loop, shutdown_rx);
///
/// // On shutdown:
/// let _ = shutdown_tx.send(true);
/// let report = handle.await?;
/// ```
pub fn spawn_emission_task(
    emission_loop: EmissionLoop,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<LoopReport> {
    info!(
        first_iteration = emission_loop.iteration(),
        "Starting emission task"
    );

    tokio::spawn(emission_loop.run(shutdown))
}
