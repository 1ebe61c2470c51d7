//! Preset question buttons
//!
//! Each button is active low with an internal pull-up. A press is accepted
//! once the pin still reads low after the debounce delay, and the next press
//! is only armed after release.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Timer};

use askterm_core::command::{Button, ControlInput};

use crate::channels::INPUT_CHANNEL;

/// Debounce time for press and release
const DEBOUNCE: Duration = Duration::from_millis(50);

/// Button task - one instance per physical button
#[embassy_executor::task(pool_size = 2)]
pub async fn button_task(mut pin: Input<'static>, button: Button) {
    info!("Button task started: {:?}", button);

    loop {
        pin.wait_for_falling_edge().await;
        Timer::after(DEBOUNCE).await;

        if pin.is_low() {
            debug!("Button: {:?}", button);
            if INPUT_CHANNEL.try_send(ControlInput::Preset(button)).is_err() {
                warn!("Input channel full, dropping button press");
            }

            pin.wait_for_high().await;
            Timer::after(DEBOUNCE).await;
        }
    }
}
