//! Button gesture recognition over a virtual 100 ms tick

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use rotary_core::test_utils::button_simulator::{run_pattern, ButtonPattern};
    use rotary_core::test_utils::event_log::EventLog;
    use rotary_core::{
        ButtonLevel, ClickPhase, GestureOutcome, RotaryConfig, RotaryCore, BURST_SETTLE_MS,
    };

    fn core() -> RotaryCore<'static> {
        RotaryCore::new(1, RotaryConfig::default(), ButtonLevel::Released).unwrap()
    }

    #[rstest]
    #[case::single(ButtonPattern::single_click(50, 80), vec![])]
    #[case::double(ButtonPattern::double_click(50, 150, 60), vec![(500, GestureOutcome::DoubleClick)])]
    #[case::double_late_in_window(ButtonPattern::double_click(50, 240, 60), vec![(600, GestureOutcome::DoubleClick)])]
    #[case::too_slow(ButtonPattern::double_click(50, 400, 60), vec![])]
    #[case::triple(ButtonPattern::burst(50, 3, 100, 40), vec![(500, GestureOutcome::RepeatCount(3))])]
    #[case::five(ButtonPattern::burst(20, 5, 80, 30), vec![(600, GestureOutcome::RepeatCount(5))])]
    fn test_gesture_patterns(
        #[case] pattern: ButtonPattern,
        #[case] expected: Vec<(u32, GestureOutcome)>,
    ) {
        let core = core();
        let outcomes = run_pattern(&core, &pattern, pattern.end_ms() + 1_000);
        assert_eq!(outcomes, expected, "{}", pattern.description);
        assert_eq!(core.button_state().press_count, 0);
    }

    #[test]
    fn test_bursts_separated_by_settle_time() {
        let pattern = ButtonPattern::sequence(&[
            ButtonPattern::double_click(50, 150, 60),
            ButtonPattern::burst(1_050, 3, 100, 40),
        ]);
        let core = core();
        let outcomes = run_pattern(&core, &pattern, 2_000);

        assert_eq!(
            outcomes,
            vec![
                (500, GestureOutcome::DoubleClick),
                (1_500, GestureOutcome::RepeatCount(3)),
            ]
        );
    }

    #[test]
    fn test_listeners_see_clicks_and_gestures() {
        let log = EventLog::new();
        let mut core = core();
        log.attach(&mut core).unwrap();

        run_pattern(&core, &ButtonPattern::double_click(50, 150, 60), 1_000);

        assert_eq!(
            log.clicks(),
            vec![
                (ClickPhase::Pressed, 0),
                (ClickPhase::Released, 60),
                (ClickPhase::Pressed, 0),
                (ClickPhase::Released, 60),
            ]
        );
        assert_eq!(log.double_clicks(), 1);
        assert!(log.repeats().is_empty());
    }

    #[test]
    fn test_press_reporting_disabled() {
        let log = EventLog::new();
        let mut core: RotaryCore<'static> = RotaryCore::new(
            1,
            RotaryConfig::default().with_report_press(false),
            ButtonLevel::Released,
        )
        .unwrap();
        log.attach(&mut core).unwrap();

        run_pattern(&core, &ButtonPattern::single_click(50, 120), 1_000);

        assert_eq!(log.clicks(), vec![(ClickPhase::Released, 120)]);
    }

    #[test]
    fn test_double_click_across_timer_wrap() {
        let core = core();
        let first = u32::MAX - 100;
        let second = first.wrapping_add(150);

        core.on_button_edge(ButtonLevel::Pressed, first);
        core.on_button_edge(ButtonLevel::Released, first.wrapping_add(60));
        assert_eq!(core.on_tick(first.wrapping_add(100)), GestureOutcome::Pending);

        core.on_button_edge(ButtonLevel::Pressed, second);
        let click = core.on_button_edge(ButtonLevel::Released, second.wrapping_add(60));
        assert_eq!(click.map(|c| c.duration_ms), Some(60));

        assert_eq!(core.on_tick(second.wrapping_add(100)), GestureOutcome::Pending);
        assert_eq!(
            core.on_tick(second.wrapping_add(BURST_SETTLE_MS)),
            GestureOutcome::DoubleClick
        );
    }

    #[test]
    #[should_panic(expected = "pattern too long")]
    fn test_oversized_pattern_is_rejected() {
        // 33 clicks need 66 edges
        ButtonPattern::burst(0, 33, 100, 40);
    }
}
