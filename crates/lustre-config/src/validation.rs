//! Field-level validation applied while merging partial settings.
//!
//! Invalid input never becomes an error: non-finite numbers are dropped
//! and out-of-range numbers are clamped, each with a `tracing` warning
//! naming the field.

use std::ops::RangeInclusive;

use tracing::warn;

/// Outcome of checking one incoming value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Checked {
    /// Value was inside the range.
    Accepted(f32),
    /// Value was outside the range and has been clamped.
    Clamped(f32),
    /// Value was NaN or infinite.
    Rejected,
}

/// Check `value` against `range`.
pub fn check(value: f32, range: &RangeInclusive<f32>) -> Checked {
    if !value.is_finite() {
        Checked::Rejected
    } else if range.contains(&value) {
        Checked::Accepted(value)
    } else {
        Checked::Clamped(value.clamp(*range.start(), *range.end()))
    }
}

/// Merge an optional number into `target`, clamped to `range`.
///
/// `field` is the dotted, serialized field name used in the warning.
pub fn merge_ranged(target: &mut f32, value: Option<f32>, range: RangeInclusive<f32>, field: &str) {
    let Some(value) = value else {
        return;
    };
    match check(value, &range) {
        Checked::Accepted(v) => *target = v,
        Checked::Clamped(v) => {
            warn!(field, value, clamped = v, "value out of range, clamping");
            *target = v;
        }
        Checked::Rejected => {
            warn!(field, value, kept = *target, "non-finite value ignored");
        }
    }
}

/// Merge an optional flag into `target`.
pub fn merge_flag(target: &mut bool, value: Option<bool>) {
    if let Some(value) = value {
        *target = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check() {
        assert_eq!(check(0.5, &(0.0..=1.0)), Checked::Accepted(0.5));
        assert_eq!(check(1.5, &(0.0..=1.0)), Checked::Clamped(1.0));
        assert_eq!(check(-3.0, &(-24.0..=0.0)), Checked::Accepted(-3.0));
        assert_eq!(check(-30.0, &(-24.0..=0.0)), Checked::Clamped(-24.0));
        assert_eq!(check(f32::NAN, &(0.0..=1.0)), Checked::Rejected);
        assert_eq!(check(f32::INFINITY, &(0.0..=1.0)), Checked::Rejected);
    }

    #[test]
    fn test_merge_ranged() {
        let mut volume = 0.8;
        merge_ranged(&mut volume, None, 0.0..=1.0, "output.volume");
        assert_eq!(volume, 0.8);
        merge_ranged(&mut volume, Some(1.5), 0.0..=1.0, "output.volume");
        assert_eq!(volume, 1.0);
        merge_ranged(&mut volume, Some(f32::NAN), 0.0..=1.0, "output.volume");
        assert_eq!(volume, 1.0);
        merge_ranged(&mut volume, Some(0.25), 0.0..=1.0, "output.volume");
        assert_eq!(volume, 0.25);
    }

    #[test]
    fn test_merge_flag() {
        let mut enabled = true;
        merge_flag(&mut enabled, None);
        assert!(enabled);
        merge_flag(&mut enabled, Some(false));
        assert!(!enabled);
    }
}
