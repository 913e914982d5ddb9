//! Mapping normalized progress onto integer counter values.

use num_traits::{FromPrimitive, PrimInt, ToPrimitive, Unsigned};
use std::fmt::Debug;

/// An unsigned integer type that a [`CounterRamp`](crate::counter::CounterRamp) can count with.
///
/// Implemented for every primitive unsigned integer. Negative targets are unrepresentable, which
/// is how counters avoid having to reject them at runtime.
pub trait RampValue: PrimInt + Unsigned + FromPrimitive + ToPrimitive + Debug + 'static {
    /// Computes `floor(progress * target)`, with `progress` clamped to `0.0..=1.0`.
    ///
    /// At `progress >= 1.0` the result is exactly `target`; below that it never exceeds `target`
    /// even when floating-point rounding would suggest otherwise. NaN counts as zero progress.
    ///
    /// ```
    /// use vitrine_core::interpolation::RampValue;
    ///
    /// assert_eq!(u32::at_progress(50, 0.0), 0);
    /// assert_eq!(u32::at_progress(50, 0.5), 25);
    /// assert_eq!(u32::at_progress(50, 0.999), 49);
    /// assert_eq!(u32::at_progress(50, 1.0), 50);
    /// ```
    fn at_progress(target: Self, progress: f64) -> Self {
        if progress >= 1.0 {
            return target;
        }
        if progress.is_nan() || progress <= 0.0 {
            return Self::zero();
        }
        // Integers wider than 53 bits lose precision here, but the result is still clamped to
        // the target so the counter cannot overshoot.
        let scaled = target.to_f64().map_or(0.0, |target| (target * progress).floor());
        Self::from_f64(scaled).map_or(target, |value| value.min(target))
    }
}

impl<T> RampValue for T where
    T: PrimInt + Unsigned + FromPrimitive + ToPrimitive + Debug + 'static
{
}
