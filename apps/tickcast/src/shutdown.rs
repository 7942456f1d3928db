use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tickcast_domain::services::run_control::RunControl;

/// Shared stop flag. Pauses wait on a condvar so `cancel` wakes them
/// immediately instead of after the full interval.
#[derive(Clone, Default)]
pub struct ShutdownControl {
    inner: Arc<ShutdownInner>,
}

#[derive(Default)]
struct ShutdownInner {
    cancel: AtomicBool,
    wake: (Mutex<()>, Condvar),
}

impl ShutdownControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancel.store(true, Ordering::SeqCst);
        let (lock, cvar) = &self.inner.wake;
        let _guard = lock.lock();
        cvar.notify_all();
    }
}

impl RunControl for ShutdownControl {
    fn should_cancel(&self) -> bool {
        self.inner.cancel.load(Ordering::SeqCst)
    }

    fn pause(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let (lock, cvar) = &self.inner.wake;
        let mut guard = lock.lock();
        while !self.should_cancel() {
            if cvar.wait_until(&mut guard, deadline).timed_out() {
                break;
            }
        }
        !self.should_cancel()
    }
}

/// Spawns a watcher thread that cancels `control` on Ctrl+C or SIGTERM.
pub fn install_signal_handler(control: ShutdownControl) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .build()
        .map_err(|err| format!("failed to init signal runtime: {err}"))?;

    thread::Builder::new()
        .name("tickcast-signals".to_string())
        .spawn(move || {
            runtime.block_on(async move {
                match wait_for_signal().await {
                    Ok(signal) => {
                        tracing::info!(
                            signal,
                            "received shutdown signal, stopping after current iteration"
                        );
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "signal handler failed, stopping");
                    }
                }
                control.cancel();
            });
        })
        .map_err(|err| format!("failed to spawn signal thread: {err}"))?;
    Ok(())
}

async fn wait_for_signal() -> Result<&'static str, String> {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .map(|()| "SIGINT")
            .map_err(|err| format!("failed to listen for Ctrl+C: {err}"))
    };

    #[cfg(unix)]
    let terminate = async {
        let mut stream =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .map_err(|err| format!("failed to listen for SIGTERM: {err}"))?;
        stream.recv().await;
        Ok::<_, String>("SIGTERM")
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<&'static str, String>>();

    tokio::select! {
        result = ctrl_c => result,
        result = terminate => result,
    }
}
