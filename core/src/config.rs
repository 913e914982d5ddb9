//! Configuration for the animators.
//!
//! Every config struct has defaults matching a typical portfolio page and can be deserialized from
//! any serde format. Durations are written as integer milliseconds, so anything finer than a
//! millisecond is truncated when serializing; margins are written as CSS shorthand:
//!
//! ```
//! use vitrine_core::config::VisibilityConfig;
//!
//! let config: VisibilityConfig = serde_json::from_str(r#"{ "threshold": 0.5 }"#).unwrap();
//! assert_eq!(config.root_margin.to_string(), "0px 0px -100px 0px");
//! ```

use crate::easing::Easing;
use crate::error::ConfigError;
use crate::geometry::{Length, Margin};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing for a [`TypingCycler`](crate::typing::TypingCycler).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    /// Delay before each typed character. Deleting runs at half of this delay.
    #[serde(rename = "type_speed_ms", with = "millis")]
    pub type_speed: Duration,
    /// How long a fully typed string stays on screen before deleting starts.
    #[serde(rename = "pause_ms", with = "millis")]
    pub pause: Duration,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            type_speed: Duration::from_millis(100),
            pause: Duration::from_millis(2000),
        }
    }
}

impl TypingConfig {
    pub fn new(type_speed: Duration, pause: Duration) -> Self {
        Self { type_speed, pause }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.type_speed.is_zero() {
            return Err(ConfigError::ZeroTypeSpeed);
        }
        Ok(())
    }

    /// Delay before each deleted character: half of the typing delay, rounded down to the
    /// nanosecond.
    pub fn delete_speed(&self) -> Duration {
        self.type_speed / 2
    }
}

/// Timing for a [`CounterRamp`](crate::counter::CounterRamp).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Wall-clock time from the first frame to reaching the target.
    #[serde(rename = "duration_ms", with = "millis")]
    pub duration: Duration,
    /// Curve applied to the normalized progress. Not serializable; always linear when loaded.
    #[serde(skip)]
    pub easing: Easing,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(2000),
            easing: Easing::Linear,
        }
    }
}

impl CounterConfig {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            ..Default::default()
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration.is_zero() {
            return Err(ConfigError::ZeroDuration);
        }
        Ok(())
    }
}

/// Options for a [`VisibilityGate`](crate::visibility::VisibilityGate).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    /// Fraction of the region, from `0.0` to `1.0`, that has to be inside the margined root.
    pub threshold: f32,
    /// Adjustment applied to the root before intersecting. Negative values shrink it.
    pub root_margin: Margin,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            threshold: 0.2,
            root_margin: Margin::new(
                Length::Px(0.0),
                Length::Px(0.0),
                Length::Px(-100.0),
                Length::Px(0.0),
            ),
        }
    }
}

impl VisibilityConfig {
    pub fn new(threshold: f32, root_margin: Margin) -> Self {
        Self {
            threshold,
            root_margin,
        }
    }

    /// Builds a config from a CSS margin shorthand such as `"0px 0px -100px 0px"`, validating the
    /// result.
    ///
    /// ```
    /// use vitrine_core::config::VisibilityConfig;
    /// use vitrine_core::error::ConfigError;
    ///
    /// assert!(VisibilityConfig::from_css(0.5, "10% 0px").is_ok());
    /// assert!(matches!(
    ///     VisibilityConfig::from_css(0.5, "10em"),
    ///     Err(ConfigError::InvalidMargin(_))
    /// ));
    /// ```
    pub fn from_css(threshold: f32, root_margin: &str) -> Result<Self, ConfigError> {
        let config = Self::new(threshold, root_margin.parse()?);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.threshold));
        }
        Ok(())
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    // Whole milliseconds only; sub-millisecond parts are dropped.
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
