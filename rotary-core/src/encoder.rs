//! Glue between a platform HAL and a shared [`RotaryCore`]
//!
//! Interrupt handlers call the `handle_*` methods; they sample the lines
//! through the HAL and forward the levels with a timestamp.

use crate::controller::{GestureOutcome, TICK_PERIOD_MS};
use crate::hal::{EncoderPins, HalError, InterruptControl, RotaryHal};
use crate::rotary::RotaryCore;
use crate::types::{Click, ConfigUpdate, ValueChanged};

/// One encoder bound to its hardware
pub struct RotaryEncoder<'c, 'a, H, const N: usize = 4>
where
    H: RotaryHal,
{
    core: &'c RotaryCore<'a, N>,
    hal: H,
    open: bool,
}

impl<'c, 'a, H, const N: usize> RotaryEncoder<'c, 'a, H, N>
where
    H: RotaryHal,
{
    pub fn new(core: &'c RotaryCore<'a, N>, hal: H) -> Self {
        Self {
            core,
            hal,
            open: false,
        }
    }

    pub fn core(&self) -> &'c RotaryCore<'a, N> {
        self.core
    }

    pub fn hal(&self) -> &H {
        &self.hal
    }

    pub fn hal_mut(&mut self) -> &mut H {
        &mut self.hal
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Enable edge interrupts and start the gesture tick
    pub fn open(&mut self) -> Result<(), H::Error> {
        if self.core.is_closed() {
            return Err(HalError::NotInitialized.into());
        }
        self.enable()?;
        self.open = true;

        #[cfg(feature = "defmt")]
        defmt::info!("rotary {}: open", self.core.rotary_id());
        Ok(())
    }

    /// CLK or DT edge interrupt
    pub fn handle_rotary_irq(&mut self) -> Result<Option<ValueChanged>, H::Error> {
        let pins = self.hal.pins();
        let clk = pins.read_clk()?;
        let dt = pins.read_dt()?;
        Ok(self.core.on_rotary_edge(clk, dt, self.hal.now_ms()))
    }

    /// Button edge interrupt
    pub fn handle_button_irq(&mut self) -> Result<Option<Click>, H::Error> {
        let level = self.hal.pins().read_button()?;
        Ok(self.core.on_button_edge(level, self.hal.now_ms()))
    }

    /// Periodic timer interrupt
    pub fn handle_tick(&mut self) -> GestureOutcome {
        self.core.on_tick(self.hal.now_ms())
    }

    /// Reconfigure with this encoder's interrupts masked.
    ///
    /// Interrupts are re-enabled even when the update is rejected.
    pub fn configure(&mut self, update: ConfigUpdate) -> Result<(), H::Error> {
        if self.open {
            self.disable()?;
        }
        let result = self.core.configure(update);
        if self.open {
            self.enable()?;
        }
        result.map_err(|_| HalError::InvalidConfig.into())
    }

    /// Mask everything, release the hardware and close the core
    pub fn close(&mut self) -> Result<(), H::Error> {
        self.disable()?;
        self.hal.shutdown()?;
        self.core.close();
        self.open = false;

        #[cfg(feature = "defmt")]
        defmt::info!("rotary {}: closed", self.core.rotary_id());
        Ok(())
    }

    fn enable(&mut self) -> Result<(), H::Error> {
        let irq = self.hal.interrupts();
        irq.enable_edge_interrupts()?;
        irq.start_tick(TICK_PERIOD_MS)
    }

    fn disable(&mut self) -> Result<(), H::Error> {
        let irq = self.hal.interrupts();
        irq.disable_edge_interrupts()?;
        irq.stop_tick()
    }
}
