//! `tick_task` on the embassy mock time driver

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use embassy_time::{Duration, Instant, MockDriver};
    use tokio_test::{assert_pending, assert_ready, task};

    use rotary_core::test_utils::event_log::EventLog;
    use rotary_core::{tick_task, ButtonLevel, RotaryConfig, RotaryCore};

    // the mock driver clock is process-wide
    static CLOCK: Mutex<()> = Mutex::new(());

    fn shared_core() -> (&'static RotaryCore<'static>, EventLog) {
        let log = EventLog::new();
        let mut core: RotaryCore<'static> =
            RotaryCore::new(4, RotaryConfig::default(), ButtonLevel::Released).unwrap();
        log.attach(&mut core).unwrap();
        (Box::leak(Box::new(core)), log)
    }

    fn advance_to(driver: &MockDriver, at_ms: u64) {
        let now = Instant::now().as_millis();
        driver.advance(Duration::from_millis(at_ms - now));
    }

    fn now_ms() -> u32 {
        Instant::now().as_millis() as u32
    }

    #[test]
    fn test_tick_task_reports_double_click() {
        let _clock = CLOCK.lock().unwrap_or_else(|e| e.into_inner());
        let driver = MockDriver::get();
        driver.reset();

        let (core, log) = shared_core();
        let mut ticker = task::spawn(tick_task(core));
        assert_pending!(ticker.poll());

        // presses at 20 and 150, ticks every 100 ms
        for (press, release) in [(20, 60), (150, 190)] {
            advance_to(driver, press);
            core.on_button_edge(ButtonLevel::Pressed, now_ms());
            advance_to(driver, release);
            core.on_button_edge(ButtonLevel::Released, now_ms());
        }
        assert_eq!(core.button_state().press_count, 2);

        for tick in [200, 300, 400] {
            advance_to(driver, tick);
            assert_pending!(ticker.poll());
        }

        assert_eq!(log.double_clicks(), 1);
        assert_eq!(core.button_state().press_count, 0);
    }

    #[test]
    fn test_tick_task_ends_after_close() {
        let _clock = CLOCK.lock().unwrap_or_else(|e| e.into_inner());
        let driver = MockDriver::get();
        driver.reset();

        let (core, _log) = shared_core();
        let mut ticker = task::spawn(tick_task(core));
        assert_pending!(ticker.poll());

        advance_to(driver, 100);
        assert_pending!(ticker.poll());

        core.close();
        advance_to(driver, 200);
        assert_ready!(ticker.poll());
    }
}
