use std::time::Duration;

/// Cancellation handle polled by long-running loops.
pub trait RunControl {
    fn should_cancel(&self) -> bool;

    /// Blocks for `duration`. Returns `false` if cancellation was requested
    /// before or during the wait.
    fn pause(&self, duration: Duration) -> bool;
}

/// Never cancels; pauses with a plain thread sleep.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uncancellable;

impl RunControl for Uncancellable {
    fn should_cancel(&self) -> bool {
        false
    }

    fn pause(&self, duration: Duration) -> bool {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
        true
    }
}
