//! Error types for animator configuration.

use thiserror::Error;

/// Configuration rejected when building or reconfiguring an animator.
///
/// Animators never fail once they are running; every invalid input is caught here, at the point
/// where it is supplied.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A typing animator was given a zero per-character delay, which would make it spin without
    /// ever yielding to the host.
    #[error("type speed must be greater than zero")]
    ZeroTypeSpeed,

    /// A counter animator was given a zero duration.
    #[error("counter duration must be greater than zero")]
    ZeroDuration,

    /// Visibility threshold outside of `0.0..=1.0`, or NaN.
    #[error("visibility threshold {0} is outside the range [0, 1]")]
    ThresholdOutOfRange(f32),

    /// The root margin could not be parsed.
    #[error("invalid root margin: {0}")]
    InvalidMargin(#[from] MarginParseError),
}

/// Error produced when parsing a CSS-style margin shorthand such as `"0px 0px -100px 0px"`.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum MarginParseError {
    /// The string contained no lengths at all.
    #[error("margin is empty")]
    Empty,

    /// More than four lengths were given.
    #[error("expected at most 4 lengths, found {0}")]
    TooManyValues(usize),

    /// A component was not a number followed by `px` or `%`.
    #[error("`{0}` is not a pixel or percentage length")]
    InvalidLength(String),
}
