use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use tracing::info;

/// A shutdown flag whose waits wake up as soon as it is triggered.
pub struct ShutdownSignal {
    shutdown: AtomicBool,
    condvar: Condvar,
    mutex: Mutex<()>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self {
            shutdown: AtomicBool::new(false),
            condvar: Condvar::new(),
            mutex: Mutex::new(()),
        }
    }

    /// Signal that is triggered by Ctrl+C
    pub fn install_ctrlc() -> anyhow::Result<Arc<Self>> {
        let shutdown = Arc::new(Self::new());
        let shutdown_ctrlc = Arc::clone(&shutdown);
        ctrlc::set_handler(move || {
            info!("Received shutdown signal, stopping...");
            shutdown_ctrlc.trigger();
        })?;
        Ok(shutdown)
    }

    pub fn trigger(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.condvar.notify_all();
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Wait for `duration` or until shutdown is triggered.
    ///
    /// Returns `true` if shutdown was triggered.
    pub fn wait(&self, duration: Duration) -> bool {
        if self.is_shutdown() {
            return true;
        }

        let Ok(guard) = self.mutex.lock() else {
            return true;
        };
        match self
            .condvar
            .wait_timeout_while(guard, duration, |_| !self.is_shutdown())
        {
            Ok((_, timeout)) => !timeout.timed_out(),
            // Poisoned mutex, treat as shutdown
            Err(_) => true,
        }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_wait_timeout() {
        let signal = ShutdownSignal::new();
        let start = Instant::now();
        assert!(!signal.wait(Duration::from_millis(50)));
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_wait_interrupted() {
        let signal = Arc::new(ShutdownSignal::new());
        let signal_clone = Arc::clone(&signal);

        let handle = thread::spawn(move || {
            let start = Instant::now();
            let interrupted = signal_clone.wait(Duration::from_secs(10));
            (interrupted, start.elapsed())
        });

        thread::sleep(Duration::from_millis(50));
        signal.trigger();

        let (interrupted, elapsed) = handle.join().unwrap();
        assert!(interrupted);
        assert!(elapsed < Duration::from_secs(1));
    }

    #[test]
    fn test_wait_already_shutdown() {
        let signal = ShutdownSignal::new();
        signal.trigger();
        assert!(signal.is_shutdown());
        assert!(signal.wait(Duration::from_secs(10)));
    }
}
