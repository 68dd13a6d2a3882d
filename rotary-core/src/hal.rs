//! Hardware Abstraction Layer for encoder platforms
//!
//! The core never touches hardware. A platform supplies [`EncoderPins`] and
//! [`InterruptControl`] through a [`RotaryHal`], and [`crate::RotaryEncoder`]
//! composes it with a [`crate::RotaryCore`].

use embedded_hal::digital::InputPin;

use crate::types::ButtonLevel;

/// Error types for HAL operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// GPIO operation failed
    GpioError,
    /// Periodic timer could not be started or stopped
    TimerError,
    /// Interrupt configuration failed
    InterruptError,
    /// Hardware not initialized
    NotInitialized,
    /// Invalid configuration
    InvalidConfig,
    /// Pin cannot be used for edge interrupts on this platform
    InvalidPin(u8),
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::GpioError => write!(f, "GPIO operation failed"),
            HalError::TimerError => write!(f, "Timer operation failed"),
            HalError::InterruptError => write!(f, "Interrupt configuration failed"),
            HalError::NotInitialized => write!(f, "Hardware not initialized"),
            HalError::InvalidConfig => write!(f, "Invalid configuration"),
            HalError::InvalidPin(pin) => write!(f, "Pin {} not available for interrupts", pin),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// Pins that cannot raise interrupts on the ESP8266
pub const ESP8266_DENY_PINS: [u8; 1] = [16];

/// Reject any pin found in a platform deny list
pub fn validate_pins(pins: &[u8], deny: &[u8]) -> Result<(), HalError> {
    match pins.iter().find(|pin| deny.contains(*pin)) {
        Some(&pin) => Err(HalError::InvalidPin(pin)),
        None => Ok(()),
    }
}

/// Level reads of the encoder lines
pub trait EncoderPins {
    type Error: From<HalError>;

    /// CLK (A) line level
    fn read_clk(&mut self) -> Result<bool, Self::Error>;

    /// DT (B) line level
    fn read_dt(&mut self) -> Result<bool, Self::Error>;

    /// Push-button level
    fn read_button(&mut self) -> Result<ButtonLevel, Self::Error>;
}

/// Edge interrupt and periodic tick control
pub trait InterruptControl {
    type Error: From<HalError>;

    /// Enable both-edge interrupts on CLK, DT and the button
    fn enable_edge_interrupts(&mut self) -> Result<(), Self::Error>;

    /// Disable all edge interrupts of this encoder
    fn disable_edge_interrupts(&mut self) -> Result<(), Self::Error>;

    /// Start the periodic gesture tick
    fn start_tick(&mut self, period_ms: u32) -> Result<(), Self::Error>;

    /// Stop the periodic gesture tick
    fn stop_tick(&mut self) -> Result<(), Self::Error>;
}

/// Complete encoder HAL interface
pub trait RotaryHal {
    type Error: From<HalError>;
    type Pins: EncoderPins<Error = Self::Error>;
    type Interrupts: InterruptControl<Error = Self::Error>;

    /// Access to the encoder lines
    fn pins(&mut self) -> &mut Self::Pins;

    /// Access to interrupt and timer control
    fn interrupts(&mut self) -> &mut Self::Interrupts;

    /// Monotonic milliseconds, wrapping
    fn now_ms(&self) -> u32;

    /// Release platform resources
    fn shutdown(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Encoder lines on embedded-hal input pins
pub struct EmbeddedHalPins<CLK, DT, BTN> {
    clk: CLK,
    dt: DT,
    button: BTN,
    active_low: bool,
}

impl<CLK, DT, BTN> EmbeddedHalPins<CLK, DT, BTN>
where
    CLK: InputPin,
    DT: InputPin,
    BTN: InputPin,
{
    /// `pull_up` wiring means the button shorts to ground, i.e. low = pressed
    pub fn new(clk: CLK, dt: DT, button: BTN, pull_up: bool) -> Self {
        Self {
            clk,
            dt,
            button,
            active_low: pull_up,
        }
    }

    /// Give the pins back
    pub fn release(self) -> (CLK, DT, BTN) {
        (self.clk, self.dt, self.button)
    }
}

impl<CLK, DT, BTN> EncoderPins for EmbeddedHalPins<CLK, DT, BTN>
where
    CLK: InputPin,
    DT: InputPin,
    BTN: InputPin,
{
    type Error = HalError;

    fn read_clk(&mut self) -> Result<bool, Self::Error> {
        self.clk.is_high().map_err(|_| HalError::GpioError)
    }

    fn read_dt(&mut self) -> Result<bool, Self::Error> {
        self.dt.is_high().map_err(|_| HalError::GpioError)
    }

    fn read_button(&mut self) -> Result<ButtonLevel, Self::Error> {
        let high = self.button.is_high().map_err(|_| HalError::GpioError)?;
        Ok(ButtonLevel::from_pin(high, self.active_low))
    }
}

/// No-op interrupt controller for polled setups
pub struct NoOpInterruptController;

impl InterruptControl for NoOpInterruptController {
    type Error = HalError;

    fn enable_edge_interrupts(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn disable_edge_interrupts(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn start_tick(&mut self, _period_ms: u32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn stop_tick(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock implementations for testing

    use super::*;
    use core::cell::Cell;

    /// Pin levels set directly by the test
    pub struct MockPins {
        clk: bool,
        dt: bool,
        button: ButtonLevel,
        fail: bool,
    }

    impl Default for MockPins {
        fn default() -> Self {
            // pulled-up lines idle high
            Self {
                clk: true,
                dt: true,
                button: ButtonLevel::Released,
                fail: false,
            }
        }
    }

    impl MockPins {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_lines(&mut self, clk: bool, dt: bool) {
            self.clk = clk;
            self.dt = dt;
        }

        pub fn set_button(&mut self, level: ButtonLevel) {
            self.button = level;
        }

        /// Make every read fail with [`HalError::GpioError`]
        pub fn set_failing(&mut self, fail: bool) {
            self.fail = fail;
        }

        fn check(&self) -> Result<(), HalError> {
            if self.fail {
                Err(HalError::GpioError)
            } else {
                Ok(())
            }
        }
    }

    impl EncoderPins for MockPins {
        type Error = HalError;

        fn read_clk(&mut self) -> Result<bool, Self::Error> {
            self.check()?;
            Ok(self.clk)
        }

        fn read_dt(&mut self) -> Result<bool, Self::Error> {
            self.check()?;
            Ok(self.dt)
        }

        fn read_button(&mut self) -> Result<ButtonLevel, Self::Error> {
            self.check()?;
            Ok(self.button)
        }
    }

    /// Records interrupt and tick control calls
    #[derive(Default)]
    pub struct MockInterrupts {
        pub edges_enabled: bool,
        pub tick_period_ms: Option<u32>,
        /// Number of `disable_edge_interrupts` calls
        pub disable_count: usize,
    }

    impl InterruptControl for MockInterrupts {
        type Error = HalError;

        fn enable_edge_interrupts(&mut self) -> Result<(), Self::Error> {
            self.edges_enabled = true;
            Ok(())
        }

        fn disable_edge_interrupts(&mut self) -> Result<(), Self::Error> {
            self.edges_enabled = false;
            self.disable_count += 1;
            Ok(())
        }

        fn start_tick(&mut self, period_ms: u32) -> Result<(), Self::Error> {
            self.tick_period_ms = Some(period_ms);
            Ok(())
        }

        fn stop_tick(&mut self) -> Result<(), Self::Error> {
            self.tick_period_ms = None;
            Ok(())
        }
    }

    /// Complete mock HAL with a manually advanced clock
    #[derive(Default)]
    pub struct MockRotaryHal {
        pub pins: MockPins,
        pub interrupts: MockInterrupts,
        now: Cell<u32>,
        pub shut_down: bool,
    }

    impl MockRotaryHal {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_time(&self, now_ms: u32) {
            self.now.set(now_ms);
        }

        pub fn advance(&self, ms: u32) {
            self.now.set(self.now.get().wrapping_add(ms));
        }
    }

    impl RotaryHal for MockRotaryHal {
        type Error = HalError;
        type Pins = MockPins;
        type Interrupts = MockInterrupts;

        fn pins(&mut self) -> &mut Self::Pins {
            &mut self.pins
        }

        fn interrupts(&mut self) -> &mut Self::Interrupts {
            &mut self.interrupts
        }

        fn now_ms(&self) -> u32 {
            self.now.get()
        }

        fn shutdown(&mut self) -> Result<(), Self::Error> {
            self.shut_down = true;
            Ok(())
        }
    }
}
