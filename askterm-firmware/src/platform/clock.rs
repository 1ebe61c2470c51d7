//! embassy-time clock

use embassy_time::{Instant, Timer};

use askterm_core::traits::Clock;

pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }

    async fn pause(&mut self, ms: u64) {
        Timer::after_millis(ms).await;
    }
}
