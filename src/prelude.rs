//! Includes the types commonly used for wiring animators into a host.

pub use crate::{
    CounterConfig, CounterRamp, Easing, IntersectionEntry, IntersectionHost, Rect, Scheduler,
    TypingConfig, TypingCycler, VirtualScheduler, VirtualViewport, VisibilityConfig,
    VisibilityGate,
};
