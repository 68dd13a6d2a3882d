//! Quadrature decoding through a full core, across configurations

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use rotary_core::test_utils::event_log::{EventLog, RecordedEvent};
    use rotary_core::test_utils::quadrature::{complemented, full_step, half_step, repeat};
    use rotary_core::{
        ButtonLevel, Direction, ListenerResult, RangeMode, RotaryConfig, RotaryCore, ValueChanged,
    };

    use Direction::{Clockwise as Cw, CounterClockwise as Ccw};

    fn ranged(min: i32, max: i32, increment: i32, mode: RangeMode) -> RotaryConfig {
        RotaryConfig::new(min, max, increment, mode).unwrap()
    }

    fn play(config: RotaryConfig, samples: &[(bool, bool)]) -> EventLog {
        let log = EventLog::new();
        let mut core: RotaryCore<'_> = RotaryCore::new(7, config, ButtonLevel::Released).unwrap();
        log.attach(&mut core).unwrap();
        for &(clk, dt) in samples {
            core.on_rotary_edge(clk, dt, 0);
        }
        log
    }

    #[rstest]
    #[case::clockwise(RotaryConfig::default(), repeat(full_step(Cw), 3), vec![1, 2, 3])]
    #[case::counter_clockwise(RotaryConfig::default(), repeat(full_step(Ccw), 2), vec![-1, -2])]
    #[case::half_step_cw(RotaryConfig::default().with_half_step(true), repeat(half_step(Cw), 2), vec![1, 2, 3, 4])]
    #[case::half_step_ccw(RotaryConfig::default().with_half_step(true), repeat(half_step(Ccw), 1), vec![-1, -2])]
    #[case::reversed(RotaryConfig::default().with_reverse(true), repeat(full_step(Cw), 1), vec![-1])]
    #[case::increment(ranged(0, 10, 5, RangeMode::Unbounded), repeat(full_step(Cw), 2), vec![5, 10])]
    #[case::wrap_below_min(ranged(0, 3, 1, RangeMode::Wrap), repeat(full_step(Ccw), 1), vec![3])]
    #[case::bounded_stops(ranged(0, 2, 1, RangeMode::Bounded), repeat(full_step(Cw), 4), vec![1, 2])]
    #[case::inverted(RotaryConfig::default().with_invert(true), complemented(&full_step(Cw)), vec![1])]
    fn test_detent_values(
        #[case] config: RotaryConfig,
        #[case] samples: Vec<(bool, bool)>,
        #[case] expected: Vec<i32>,
    ) {
        assert_eq!(play(config, &samples).values(), expected);
    }

    #[test]
    fn test_events_carry_id_and_direction() {
        let config = ranged(0, 100, 3, RangeMode::Unbounded);
        let mut samples = repeat(full_step(Cw), 1);
        samples.extend(repeat(full_step(Ccw), 1));

        let events = play(config, &samples).events();
        let changes: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::Value(v) => Some((v.rotary_id, v.value, v.direction)),
                _ => None,
            })
            .collect();

        assert_eq!(changes, vec![(7, 3, 3), (7, 0, -3)]);
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let log = EventLog::new();
        let panicking = |_: ValueChanged| -> ListenerResult { panic!("display unplugged") };
        let mut core: RotaryCore<'_> =
            RotaryCore::new(0, RotaryConfig::default(), ButtonLevel::Released).unwrap();
        core.add_value_listener(&panicking).unwrap();
        log.attach(&mut core).unwrap();

        for &(clk, dt) in &repeat(full_step(Cw), 2) {
            core.on_rotary_edge(clk, dt, 0);
        }

        assert_eq!(log.values(), vec![1, 2]);
        assert_eq!(core.listener_failures(), 2);
    }

    proptest! {
        #[test]
        fn prop_every_event_is_one_increment(
            samples in prop::collection::vec((any::<bool>(), any::<bool>()), 0..200),
            half in any::<bool>(),
        ) {
            let config = RotaryConfig::default().with_half_step(half);
            let log = play(config, &samples);

            let mut last = config.min_value;
            for event in log.events() {
                if let RecordedEvent::Value(v) = event {
                    prop_assert!(v.direction == 1 || v.direction == -1);
                    prop_assert_eq!(v.value, last + v.direction);
                    last = v.value;
                }
            }
        }
    }
}
