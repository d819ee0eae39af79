use crate::error::{Result, VdToolError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Ctrl-C handling for a batch. The first interrupt lets in-flight files
/// finish and skips the rest; a second one exits immediately.
pub struct GracefulShutdown {
    running: Arc<AtomicBool>,
}

impl GracefulShutdown {
    pub fn new() -> Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let interrupted_once = Arc::new(AtomicBool::new(false));

        let running_clone = running.clone();
        let interrupted_clone = interrupted_once.clone();

        ctrlc::set_handler(move || {
            running_clone.store(false, Ordering::SeqCst);

            if !interrupted_clone.swap(true, Ordering::SeqCst) {
                eprintln!("\nStopping after the files in progress... (Ctrl+C again to abort)");
            } else {
                eprintln!("\nAborting.");
                std::process::exit(130);
            }
        })
        .map_err(|e| VdToolError::Config {
            message: format!("Failed to set signal handler: {}", e),
        })?;

        Ok(Self { running })
    }

    /// Same state without installing a process-wide handler.
    #[cfg(test)]
    pub fn new_for_test() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn check_shutdown(&self) -> Result<()> {
        if !self.is_running() {
            return Err(VdToolError::Cancelled);
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn request_shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
