//! Host-based integration tests for the rotary encoder core

mod decoder_tests;
mod embassy_tick_tests;
mod gesture_tests;
mod range_properties;
