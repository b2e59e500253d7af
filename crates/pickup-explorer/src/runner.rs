use std::future::Future;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Wait for the UI thread to finish, or for `signal` to fire first.
///
/// On a signal the shutdown flag is raised and the UI thread is still awaited,
/// so the terminal is restored before this returns.
pub async fn run_until_signal<S>(
    mut ui: JoinHandle<io::Result<()>>,
    shutdown: Arc<AtomicBool>,
    signal: S,
) -> anyhow::Result<()>
where
    S: Future<Output = io::Result<()>>,
{
    tokio::select! {
        joined = &mut ui => {
            joined??;
        }
        received = signal => {
            match received {
                Ok(()) => {
                    info!("Ctrl+C received; shutting down");
                    shutdown.store(true, Ordering::Relaxed);
                }
                Err(e) => warn!("Cannot listen for Ctrl+C: {}", e),
            }
            ui.await??;
        }
    }
    Ok(())
}
