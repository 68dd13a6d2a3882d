//! Push-button edge tracking and tick-driven gesture classification

use crate::types::{ButtonLevel, ButtonState, ClickPhase};

/// Expected period between [`GestureClassifier::on_tick`] calls
pub const TICK_PERIOD_MS: u32 = 100;

/// A lone press older than this can no longer start a double-click
pub const SINGLE_PRESS_EXPIRY_MS: u32 = 230;

/// A burst with no new press for this long is complete
pub const BURST_SETTLE_MS: u32 = 250;

/// Click produced by an edge, before the encoder id is attached
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClickEvent {
    pub phase: ClickPhase,
    pub duration_ms: u32,
}

/// Converts raw level transitions into press/release events
pub struct ButtonEdgeTracker;

impl ButtonEdgeTracker {
    /// Record a level sample.
    ///
    /// Repeated samples at the same level are ignored so a doubled interrupt
    /// cannot count as a second press.
    pub fn on_edge(
        state: &mut ButtonState,
        level: ButtonLevel,
        now_ms: u32,
        report_press: bool,
    ) -> Option<ClickEvent> {
        if level == state.level {
            return None;
        }
        state.level = level;

        match level {
            ButtonLevel::Pressed => {
                state.press_timestamp_ms = now_ms;
                state.press_count = state.press_count.saturating_add(1);
                report_press.then_some(ClickEvent {
                    phase: ClickPhase::Pressed,
                    duration_ms: 0,
                })
            }
            ButtonLevel::Released => Some(ClickEvent {
                phase: ClickPhase::Released,
                duration_ms: now_ms.wrapping_sub(state.press_timestamp_ms),
            }),
        }
    }
}

/// Result of one classifier tick
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GestureOutcome {
    /// No presses pending
    Idle,
    /// A burst is still inside its recognition window
    Pending,
    /// A single press aged out without a follow-up, counter cleared
    Expired,
    /// Exactly two presses settled
    DoubleClick,
    /// Three or more presses settled
    RepeatCount(u16),
}

impl GestureOutcome {
    /// Returns true if this outcome must be dispatched to listeners
    pub const fn is_event(&self) -> bool {
        matches!(self, GestureOutcome::DoubleClick | GestureOutcome::RepeatCount(_))
    }
}

/// Periodic reducer over the burst counter
pub struct GestureClassifier;

impl GestureClassifier {
    /// Classify the burst at `now_ms`, resetting the counter when it settles or expires
    pub fn on_tick(state: &mut ButtonState, now_ms: u32) -> GestureOutcome {
        let elapsed = now_ms.wrapping_sub(state.press_timestamp_ms);

        match state.press_count {
            0 => GestureOutcome::Idle,
            1 if elapsed >= SINGLE_PRESS_EXPIRY_MS => {
                state.press_count = 0;
                GestureOutcome::Expired
            }
            count if count > 1 && elapsed >= BURST_SETTLE_MS => {
                state.press_count = 0;
                if count > 2 {
                    GestureOutcome::RepeatCount(count)
                } else {
                    GestureOutcome::DoubleClick
                }
            }
            _ => GestureOutcome::Pending,
        }
    }
}
