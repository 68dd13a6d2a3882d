//! Range disciplines applied to each decoded step

use crate::types::RangeMode;

/// Applies a signed increment to a value under a [`RangeMode`]
pub struct RangePolicy;

impl RangePolicy {
    /// Returns the new value, pure
    pub fn apply(value: i32, increment: i32, min: i32, max: i32, mode: RangeMode) -> i32 {
        match mode {
            RangeMode::Unbounded => value.wrapping_add(increment),
            RangeMode::Bounded => Self::bound(value, increment, min, max),
            RangeMode::Wrap => Self::wrap(value, increment, min, max),
        }
    }

    /// Clamp `value + increment` into `[min, max]`
    pub fn bound(value: i32, increment: i32, min: i32, max: i32) -> i32 {
        let next = value as i64 + increment as i64;
        next.clamp(min as i64, max as i64) as i32
    }

    /// Euclidean wrap of `value + increment` over the inclusive `[min, max]`
    pub fn wrap(value: i32, increment: i32, min: i32, max: i32) -> i32 {
        let width = max as i64 - min as i64 + 1;
        let offset = value as i64 + increment as i64 - min as i64;
        (min as i64 + offset.rem_euclid(width)) as i32
    }
}
