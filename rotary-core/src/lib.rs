#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! # Rotary Core
//!
//! Rotary encoder sensing core for embedded systems.
//! Decodes CLK/DT quadrature edges into a bounded, wrapped or unbounded value
//! and classifies push-button activity into click, double-click and
//! repeat-count gestures. All entry points are safe to call from interrupt
//! handlers and never allocate.

pub mod types;
pub mod fsm;
pub mod range;
pub mod controller;
pub mod listener;
pub mod rotary;
pub mod hal;
pub mod encoder;

#[cfg(feature = "test-utils")]
pub mod test_utils;


pub use types::*;
pub use fsm::{QuadratureDecoder, Transition};
pub use range::RangePolicy;
pub use controller::*;
pub use listener::*;
pub use rotary::*;
pub use hal::{EmbeddedHalPins, EncoderPins, HalError, InterruptControl, NoOpInterruptController, RotaryHal};
pub use encoder::RotaryEncoder;

/// Rotary core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration: value 0..=10, step 1, unbounded, full step
pub fn default_config() -> RotaryConfig {
    RotaryConfig::default()
}
