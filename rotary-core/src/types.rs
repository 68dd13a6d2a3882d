//! Core data types for the rotary encoder

/// How the decoded value behaves at the configured bounds
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangeMode {
    /// No bounds, the value grows or shrinks freely
    Unbounded,
    /// Stepping past one bound continues from the other
    Wrap,
    /// The value is clamped to the bounds
    Bounded,
}

/// Physical rotation direction reported by the quadrature table
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise detent
    Clockwise,
    /// Counter-clockwise detent
    CounterClockwise,
}

impl Direction {
    /// Sign of this direction before `reverse` is applied
    pub const fn sign(&self) -> i32 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

/// Push-button level
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonLevel {
    /// Button held down
    Pressed,
    /// Button up
    Released,
}

impl ButtonLevel {
    /// Map a raw pin level to a button level.
    ///
    /// With `active_low` (pull-up wiring, switch to ground) a low pin means pressed.
    pub const fn from_pin(is_high: bool, active_low: bool) -> Self {
        if is_high != active_low {
            ButtonLevel::Pressed
        } else {
            ButtonLevel::Released
        }
    }
}

/// States of the quadrature Gray-code machine.
///
/// The half-step table reuses the same eight codes with its own meaning,
/// so the names follow the full-step table.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum QuadState {
    Start = 0,
    Cw1 = 1,
    Cw2 = 2,
    Cw3 = 3,
    Ccw1 = 4,
    Ccw2 = 5,
    Ccw3 = 6,
    Illegal = 7,
}

impl QuadState {
    /// All states in table row order
    pub const ALL: [QuadState; 8] = [
        QuadState::Start,
        QuadState::Cw1,
        QuadState::Cw2,
        QuadState::Cw3,
        QuadState::Ccw1,
        QuadState::Ccw2,
        QuadState::Ccw3,
        QuadState::Illegal,
    ];

    /// Row index into the transition tables
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

/// Encoder configuration
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RotaryConfig {
    /// Lower bound (inclusive)
    pub min_value: i32,
    /// Upper bound (inclusive)
    pub max_value: i32,
    /// Step applied per detent, always positive
    pub increment: i32,
    /// Flip the sign of reported directions
    pub reverse: bool,
    /// Range discipline
    pub range_mode: RangeMode,
    /// Use the half-step transition table
    pub half_step: bool,
    /// Complement the CLK/DT sample before lookup
    pub invert: bool,
    /// Report `Click(Pressed, 0)` as soon as the button goes down
    pub report_press: bool,
}

impl Default for RotaryConfig {
    fn default() -> Self {
        Self {
            min_value: 0,
            max_value: 10,
            increment: 1,
            reverse: false,
            range_mode: RangeMode::Unbounded,
            half_step: false,
            invert: false,
            report_press: true,
        }
    }
}

impl RotaryConfig {
    /// Create a new configuration with validation
    pub fn new(
        min_value: i32,
        max_value: i32,
        increment: i32,
        range_mode: RangeMode,
    ) -> Result<Self, &'static str> {
        let config = Self {
            min_value,
            max_value,
            increment,
            range_mode,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Builder: flip reported direction
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Builder: select the half-step table
    pub fn with_half_step(mut self, half_step: bool) -> Self {
        self.half_step = half_step;
        self
    }

    /// Builder: complement CLK/DT before decoding
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Builder: eager press reporting
    pub fn with_report_press(mut self, report_press: bool) -> Self {
        self.report_press = report_press;
        self
    }

    /// Check the bounds and increment
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.min_value > self.max_value {
            return Err("min_value must be <= max_value");
        }
        if self.increment <= 0 {
            return Err("increment must be positive");
        }
        Ok(())
    }

    /// Signed step for a decoded direction, `reverse` applied
    pub fn signed_increment(&self, direction: Direction) -> i32 {
        let step = self.increment * direction.sign();
        if self.reverse {
            -step
        } else {
            step
        }
    }

    /// Merge a partial update, returning the new configuration without validating it
    pub fn merged(&self, update: &ConfigUpdate) -> Self {
        Self {
            min_value: update.min_value.unwrap_or(self.min_value),
            max_value: update.max_value.unwrap_or(self.max_value),
            increment: update.increment.unwrap_or(self.increment),
            reverse: update.reverse.unwrap_or(self.reverse),
            range_mode: update.range_mode.unwrap_or(self.range_mode),
            half_step: update.half_step.unwrap_or(self.half_step),
            invert: update.invert.unwrap_or(self.invert),
            report_press: update.report_press.unwrap_or(self.report_press),
        }
    }
}

/// Partial configuration change for [`crate::RotaryCore::configure`].
///
/// Unset fields keep their current value.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigUpdate {
    pub value: Option<i32>,
    pub min_value: Option<i32>,
    pub max_value: Option<i32>,
    pub increment: Option<i32>,
    pub reverse: Option<bool>,
    pub range_mode: Option<RangeMode>,
    pub half_step: Option<bool>,
    pub invert: Option<bool>,
    pub report_press: Option<bool>,
}

impl ConfigUpdate {
    /// Empty update
    pub const fn new() -> Self {
        Self {
            value: None,
            min_value: None,
            max_value: None,
            increment: None,
            reverse: None,
            range_mode: None,
            half_step: None,
            invert: None,
            report_press: None,
        }
    }

    pub fn value(mut self, value: i32) -> Self {
        self.value = Some(value);
        self
    }

    pub fn bounds(mut self, min_value: i32, max_value: i32) -> Self {
        self.min_value = Some(min_value);
        self.max_value = Some(max_value);
        self
    }

    pub fn increment(mut self, increment: i32) -> Self {
        self.increment = Some(increment);
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = Some(reverse);
        self
    }

    pub fn range_mode(mut self, range_mode: RangeMode) -> Self {
        self.range_mode = Some(range_mode);
        self
    }

    pub fn half_step(mut self, half_step: bool) -> Self {
        self.half_step = Some(half_step);
        self
    }

    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = Some(invert);
        self
    }

    pub fn report_press(mut self, report_press: bool) -> Self {
        self.report_press = Some(report_press);
        self
    }
}

/// Mutable quadrature decoder state
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoderState {
    /// Current Gray-code machine state
    pub state_code: QuadState,
    /// Decoded value
    pub current_value: i32,
    /// Signed increment applied by the last edge (0 when the edge completed no detent)
    pub last_direction: i32,
}

impl DecoderState {
    pub const fn new(initial_value: i32) -> Self {
        Self {
            state_code: QuadState::Start,
            current_value: initial_value,
            last_direction: 0,
        }
    }
}

/// Push-button tracking state shared by the edge and tick paths
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonState {
    /// Last observed level
    pub level: ButtonLevel,
    /// Time of the most recent press, wrapping milliseconds
    pub press_timestamp_ms: u32,
    /// Presses in the current burst
    pub press_count: u16,
}

impl ButtonState {
    pub const fn new(level: ButtonLevel) -> Self {
        Self {
            level,
            press_timestamp_ms: 0,
            press_count: 0,
        }
    }
}

/// Value-changed event
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ValueChanged {
    pub rotary_id: u8,
    pub value: i32,
    /// `+increment` or `-increment`, `reverse` applied
    pub direction: i32,
}

/// Phase of a click event
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClickPhase {
    Pressed,
    Released,
}

/// Press/release event
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Click {
    pub rotary_id: u8,
    pub phase: ClickPhase,
    /// 0 on press, time held on release
    pub duration_ms: u32,
}

/// Two presses settled into one gesture
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DoubleClick {
    pub rotary_id: u8,
}

/// Three or more presses settled into one gesture
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RepeatCount {
    pub rotary_id: u8,
    /// Presses in the burst, always > 2
    pub count: u16,
}
