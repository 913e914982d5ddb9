//! Contains the [`Easing`] enum, which shapes the progress of a [`CounterRamp`], and the
//! [`EasingFunction`] trait for defining custom curves.
//!
//! [`CounterRamp`]: crate::counter::CounterRamp

use dyn_clone::{clone_trait_object, DynClone};
use lazy_static::lazy_static;
use lyon_geom::{CubicBezierSegment, Point};
use std::fmt::Debug;

/// Maps normalized elapsed time to normalized progress.
///
/// Both `x` and the result are expected to be between 0 and 1. Counters clamp the result, so a
/// curve that overshoots will hold at the target instead of exceeding it.
pub trait EasingFunction: Debug + DynClone {
    fn calc(&self, x: f32) -> f32;
}

clone_trait_object!(EasingFunction);

/// Specifies a standard or custom [`EasingFunction`].
///
/// Only monotonic curves are offered as named variants, since a counter that counts backward
/// partway through looks broken. Anything else can be supplied via [`Custom`](Easing::Custom).
#[derive(Clone, Debug, Default)]
pub enum Easing {
    /// Straight-line progress; the count advances at a constant rate.
    #[default]
    Linear,
    /// CSS [`ease`](https://developer.mozilla.org/en-US/docs/Web/CSS/easing-function#ease).
    Ease,
    /// CSS `ease-in`.
    In,
    /// CSS `ease-out`.
    Out,
    /// CSS `ease-in-out`.
    InOut,
    /// Cubic deceleration. See: <https://easings.net/#easeOutCubic>
    OutCubic,
    /// Fast start that settles slowly onto the target; the usual choice for stat counters.
    ///
    /// See: <https://easings.net/#easeOutExpo>
    OutExpo,
    /// User-defined easing, such as an ad-hoc [`CubicBezierEasing`].
    Custom(Box<dyn EasingFunction>),
}

impl EasingFunction for Easing {
    fn calc(&self, x: f32) -> f32 {
        match self {
            Self::Linear => x,
            Self::Ease => EASE.calc(x),
            Self::In => EASE_IN.calc(x),
            Self::Out => EASE_OUT.calc(x),
            Self::InOut => EASE_IN_OUT.calc(x),
            Self::OutCubic => EASE_OUT_CUBIC.calc(x),
            Self::OutExpo => EASE_OUT_EXPO.calc(x),
            Self::Custom(custom) => custom.calc(x),
        }
    }
}

lazy_static! {
    static ref EASE: CubicBezierEasing = CubicBezierEasing::new(0.25, 0.1, 0.25, 1.0);
    static ref EASE_IN: CubicBezierEasing = CubicBezierEasing::new(0.42, 0.0, 1.0, 1.0);
    static ref EASE_OUT: CubicBezierEasing = CubicBezierEasing::new(0.0, 0.0, 0.58, 1.0);
    static ref EASE_IN_OUT: CubicBezierEasing = CubicBezierEasing::new(0.42, 0.0, 0.58, 1.0);
    static ref EASE_OUT_CUBIC: CubicBezierEasing = CubicBezierEasing::new(0.33, 1.0, 0.68, 1.0);
    static ref EASE_OUT_EXPO: CubicBezierEasing = CubicBezierEasing::new(0.16, 1.0, 0.3, 1.0);
}

/// Easing defined by a cubic bezier curve from `(0, 0)` to `(1, 1)`, with the same meaning as CSS
/// `cubic-bezier(x1, y1, x2, y2)`.
///
/// To experiment with different curves, see: <https://cubic-bezier.com/>
#[derive(Clone, Debug)]
pub struct CubicBezierEasing {
    segment: CubicBezierSegment<f64>,
}

impl CubicBezierEasing {
    /// Creates a new [`CubicBezierEasing`] with control points `(x1, y1)` and `(x2, y2)`. The
    /// `x` coordinates should be within `0..=1` for the curve to be a function of time.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            segment: CubicBezierSegment {
                from: Point::new(0.0, 0.0),
                ctrl1: Point::new(x1.into(), y1.into()),
                ctrl2: Point::new(x2.into(), y2.into()),
                to: Point::new(1.0, 1.0),
            },
        }
    }

    // The curve is parameterized by `t`, not by `x`, so the input has to be mapped back onto the
    // parameter first. x(t) is monotonic when both control points lie within 0..=1. Solving in f64
    // keeps the error far below the f32 output resolution, so sampled outputs never step backward.
    fn solve_t(&self, x: f64) -> f64 {
        let (mut low, mut high) = (0.0f64, 1.0f64);
        let mut t = x;
        for _ in 0..64 {
            let x_at_t = self.segment.x(t);
            if (x_at_t - x).abs() < 1e-12 {
                break;
            }
            if x_at_t < x {
                low = t;
            } else {
                high = t;
            }
            t = (low + high) / 2.0;
        }
        t
    }
}

impl EasingFunction for CubicBezierEasing {
    fn calc(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        let y = self.segment.y(self.solve_t(x.into()));
        y.clamp(0.0, 1.0) as f32
    }
}
