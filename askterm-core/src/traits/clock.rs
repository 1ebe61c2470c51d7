//! Monotonic time

/// Millisecond clock
#[allow(async_fn_in_trait)]
pub trait Clock {
    /// Milliseconds since boot
    fn now_ms(&self) -> u64;

    /// Wait for `ms` milliseconds
    async fn pause(&mut self, ms: u64);
}
