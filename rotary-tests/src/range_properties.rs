//! Property tests for the range disciplines

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use rotary_core::{RangeMode, RangePolicy};

    fn bounds() -> impl Strategy<Value = (i32, i32)> {
        (-10_000i32..10_000, 0i32..1_000).prop_map(|(min, span)| (min, min + span))
    }

    proptest! {
        #[test]
        fn prop_wrap_stays_in_range(
            (min, max) in bounds(),
            value in any::<i32>(),
            increment in -5_000i32..5_000,
        ) {
            let next = RangePolicy::apply(value, increment, min, max, RangeMode::Wrap);
            prop_assert!(min <= next && next <= max);
        }

        #[test]
        fn prop_wrap_is_periodic(
            (min, max) in bounds(),
            offset in 0i32..1_000,
            increment in -5_000i32..5_000,
        ) {
            let value = min + offset % (max - min + 1);
            let width = max - min + 1;
            prop_assert_eq!(
                RangePolicy::apply(value, increment, min, max, RangeMode::Wrap),
                RangePolicy::apply(value, increment + width, min, max, RangeMode::Wrap)
            );
        }

        #[test]
        fn prop_bounded_clamps(
            (min, max) in bounds(),
            value in -20_000i32..20_000,
            increment in -5_000i32..5_000,
        ) {
            let next = RangePolicy::apply(value, increment, min, max, RangeMode::Bounded);
            prop_assert_eq!(next, (value + increment).clamp(min, max));
        }

        #[test]
        fn prop_unbounded_ignores_limits(
            (min, max) in bounds(),
            value in -1_000_000i32..1_000_000,
            increment in -5_000i32..5_000,
        ) {
            prop_assert_eq!(
                RangePolicy::apply(value, increment, min, max, RangeMode::Unbounded),
                value + increment
            );
        }

        #[test]
        fn prop_in_range_single_step_moves_by_one(
            (min, max) in bounds(),
            offset in 0i32..1_000,
        ) {
            prop_assume!(max > min);
            let value = min + offset % (max - min);
            prop_assert_eq!(RangePolicy::apply(value, 1, min, max, RangeMode::Wrap), value + 1);
            prop_assert_eq!(RangePolicy::apply(value, 1, min, max, RangeMode::Bounded), value + 1);
        }
    }
}
