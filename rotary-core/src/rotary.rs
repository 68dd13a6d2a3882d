//! Encoder core composing the decoder, range policy, button tracking and dispatch
//!
//! Every entry point takes `&self` and may be called from interrupt context.
//! State lives behind `critical_section::Mutex` and each entry point does its
//! whole read-modify-write inside one critical section, so the pin-edge and
//! timer paths cannot interleave on the button counter. Listeners run after
//! the critical section is released.
//!
//! Listener registration takes `&mut self`: register everything first, then
//! share the core (e.g. through a `StaticCell`) with the interrupt handlers.

use core::cell::Cell;

use critical_section::Mutex;
use portable_atomic::{AtomicBool, Ordering};

use crate::controller::{ButtonEdgeTracker, GestureClassifier, GestureOutcome};
use crate::fsm::{pin_index, QuadratureDecoder};
use crate::listener::{Listener, ListenerId, ListenerRegistry, RegistryError};
use crate::range::RangePolicy;
use crate::types::{
    ButtonLevel, ButtonState, Click, ConfigUpdate, DecoderState, DoubleClick, QuadState,
    RepeatCount, RotaryConfig, ValueChanged,
};

/// One physical encoder with its push-button
pub struct RotaryCore<'a, const N: usize = 4> {
    rotary_id: u8,
    config: Mutex<Cell<RotaryConfig>>,
    decoder: Mutex<Cell<DecoderState>>,
    button: Mutex<Cell<ButtonState>>,
    listeners: ListenerRegistry<'a, N>,
    closed: AtomicBool,
}

impl<'a, const N: usize> RotaryCore<'a, N> {
    /// Create a core starting at `config.min_value`.
    ///
    /// `button_level` is the button sampled at start-up so that a button held
    /// during boot is not counted as a press.
    pub fn new(
        rotary_id: u8,
        config: RotaryConfig,
        button_level: ButtonLevel,
    ) -> Result<Self, &'static str> {
        config.validate()?;
        Ok(Self {
            rotary_id,
            config: Mutex::new(Cell::new(config)),
            decoder: Mutex::new(Cell::new(DecoderState::new(config.min_value))),
            button: Mutex::new(Cell::new(ButtonState::new(button_level))),
            listeners: ListenerRegistry::new(),
            closed: AtomicBool::new(false),
        })
    }

    pub fn rotary_id(&self) -> u8 {
        self.rotary_id
    }

    /// Current configuration
    pub fn config(&self) -> RotaryConfig {
        critical_section::with(|cs| self.config.borrow(cs).get())
    }

    /// Current value
    pub fn value(&self) -> i32 {
        critical_section::with(|cs| self.decoder.borrow(cs).get().current_value)
    }

    /// Signed increment applied by the last rotary edge
    pub fn direction(&self) -> i32 {
        critical_section::with(|cs| self.decoder.borrow(cs).get().last_direction)
    }

    /// Snapshot of the decoder state
    pub fn decoder_state(&self) -> DecoderState {
        critical_section::with(|cs| self.decoder.borrow(cs).get())
    }

    /// Snapshot of the button state
    pub fn button_state(&self) -> ButtonState {
        critical_section::with(|cs| self.button.borrow(cs).get())
    }

    /// Apply a partial configuration.
    ///
    /// Any half-finished Gray-code sequence is discarded. With a ranged mode the
    /// current value is folded into the new bounds. On error nothing changes.
    pub fn configure(&self, update: ConfigUpdate) -> Result<(), &'static str> {
        let _config = critical_section::with(|cs| -> Result<RotaryConfig, &'static str> {
            let config = self.config.borrow(cs).get().merged(&update);
            config.validate()?;
            self.config.borrow(cs).set(config);

            let cell = self.decoder.borrow(cs);
            let mut state = cell.get();
            let value = update.value.unwrap_or(state.current_value);
            state.state_code = QuadState::Start;
            state.current_value =
                RangePolicy::apply(value, 0, config.min_value, config.max_value, config.range_mode);
            cell.set(state);
            Ok(config)
        })?;

        #[cfg(feature = "defmt")]
        defmt::info!("rotary {}: configured {}", self.rotary_id, _config);
        Ok(())
    }

    /// Set the value to 0, regardless of `min_value`
    pub fn reset(&self) {
        critical_section::with(|cs| {
            let cell = self.decoder.borrow(cs);
            let mut state = cell.get();
            state.current_value = 0;
            cell.set(state);
        });
    }

    /// Stop reacting to input. Hardware is released by the HAL side.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Feed one CLK/DT sample (called on either line's edge).
    ///
    /// Dispatches and returns a [`ValueChanged`] when a completed detent moved the value.
    pub fn on_rotary_edge(&self, clk: bool, dt: bool, _now_ms: u32) -> Option<ValueChanged> {
        if self.is_closed() {
            return None;
        }

        let event = critical_section::with(|cs| {
            let config = self.config.borrow(cs).get();
            let cell = self.decoder.borrow(cs);
            let mut state = cell.get();

            let pins = pin_index(clk, dt, config.invert);
            let transition = QuadratureDecoder::transition(state.state_code, pins, config.half_step);
            let increment = transition
                .direction
                .map_or(0, |direction| config.signed_increment(direction));

            let old_value = state.current_value;
            state.state_code = transition.next;
            state.current_value = RangePolicy::apply(
                old_value,
                increment,
                config.min_value,
                config.max_value,
                config.range_mode,
            );
            state.last_direction = increment;
            cell.set(state);

            (state.current_value != old_value).then_some(ValueChanged {
                rotary_id: self.rotary_id,
                value: state.current_value,
                direction: increment,
            })
        });

        if let Some(event) = event {
            #[cfg(feature = "defmt")]
            defmt::trace!("rotary {}: value {} ({})", self.rotary_id, event.value, event.direction);
            self.listeners.dispatch_value(event);
        }
        event
    }

    /// Feed a button level sample (called on the button line's edge)
    pub fn on_button_edge(&self, level: ButtonLevel, now_ms: u32) -> Option<Click> {
        if self.is_closed() {
            return None;
        }

        let click = critical_section::with(|cs| {
            let report_press = self.config.borrow(cs).get().report_press;
            let cell = self.button.borrow(cs);
            let mut state = cell.get();
            let click = ButtonEdgeTracker::on_edge(&mut state, level, now_ms, report_press);
            cell.set(state);
            click
        })
        .map(|click| Click {
            rotary_id: self.rotary_id,
            phase: click.phase,
            duration_ms: click.duration_ms,
        });

        if let Some(click) = click {
            #[cfg(feature = "defmt")]
            defmt::trace!("rotary {}: {} {}ms", self.rotary_id, click.phase, click.duration_ms);
            self.listeners.dispatch_click(click);
        }
        click
    }

    /// Periodic gesture classification, nominally every
    /// [`TICK_PERIOD_MS`](crate::controller::TICK_PERIOD_MS)
    pub fn on_tick(&self, now_ms: u32) -> GestureOutcome {
        if self.is_closed() {
            return GestureOutcome::Idle;
        }

        let outcome = critical_section::with(|cs| {
            let cell = self.button.borrow(cs);
            let mut state = cell.get();
            let outcome = GestureClassifier::on_tick(&mut state, now_ms);
            cell.set(state);
            outcome
        });

        #[cfg(feature = "defmt")]
        if outcome.is_event() {
            defmt::debug!("rotary {}: gesture {}", self.rotary_id, outcome);
        }

        match outcome {
            GestureOutcome::DoubleClick => {
                self.listeners.dispatch_double_click(DoubleClick {
                    rotary_id: self.rotary_id,
                });
            }
            GestureOutcome::RepeatCount(count) => {
                self.listeners.dispatch_repeat(RepeatCount {
                    rotary_id: self.rotary_id,
                    count,
                });
            }
            GestureOutcome::Idle | GestureOutcome::Pending | GestureOutcome::Expired => {}
        }
        outcome
    }

    /// Access to the listener registry (read-only once shared)
    pub fn listeners(&self) -> &ListenerRegistry<'a, N> {
        &self.listeners
    }

    /// Listener failures isolated so far
    pub fn listener_failures(&self) -> u32 {
        self.listeners.failures()
    }

    pub fn add_value_listener(
        &mut self,
        listener: Listener<'a, ValueChanged>,
    ) -> Result<ListenerId, RegistryError> {
        self.listeners.value.add(listener)
    }

    pub fn remove_value_listener(&mut self, id: ListenerId) -> Result<(), RegistryError> {
        self.listeners.value.remove(id)
    }

    pub fn add_click_listener(
        &mut self,
        listener: Listener<'a, Click>,
    ) -> Result<ListenerId, RegistryError> {
        self.listeners.click.add(listener)
    }

    pub fn remove_click_listener(&mut self, id: ListenerId) -> Result<(), RegistryError> {
        self.listeners.click.remove(id)
    }

    pub fn add_double_click_listener(
        &mut self,
        listener: Listener<'a, DoubleClick>,
    ) -> Result<ListenerId, RegistryError> {
        self.listeners.double_click.add(listener)
    }

    pub fn remove_double_click_listener(&mut self, id: ListenerId) -> Result<(), RegistryError> {
        self.listeners.double_click.remove(id)
    }

    pub fn add_repeat_listener(
        &mut self,
        listener: Listener<'a, RepeatCount>,
    ) -> Result<ListenerId, RegistryError> {
        self.listeners.repeat.add(listener)
    }

    pub fn remove_repeat_listener(&mut self, id: ListenerId) -> Result<(), RegistryError> {
        self.listeners.repeat.remove(id)
    }
}

/// Async task driving [`RotaryCore::on_tick`] from an embassy ticker,
/// for platforms without a dedicated timer interrupt
#[cfg(feature = "embassy-time")]
pub async fn tick_task<const N: usize>(core: &RotaryCore<'_, N>) {
    use embassy_time::{Duration, Instant, Ticker};

    let mut ticker = Ticker::every(Duration::from_millis(crate::controller::TICK_PERIOD_MS as u64));

    while !core.is_closed() {
        ticker.next().await;
        let _outcome = core.on_tick(Instant::now().as_millis() as u32);

        #[cfg(feature = "defmt")]
        defmt::trace!("Tick outcome: {:?}", _outcome);
    }
}
