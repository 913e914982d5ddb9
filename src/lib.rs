//! Framework-independent animators for the moving parts of a portfolio page: a typewriter
//! headline, statistics that count up, and sections that reveal themselves once scrolled into view.
//!
//! Each animator is a self-contained state machine. None of them own a clock or a thread; the host
//! application provides timers and frame callbacks through a [`Scheduler`], reports region
//! visibility through an [`IntersectionHost`], and reads (or [subscribes](TypingCycler::subscribe)
//! to) the current output. [`VirtualScheduler`] and [`VirtualViewport`] are deterministic hosts for
//! tests and for applications that run their own loop.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use vitrine::prelude::*;
//!
//! let mut scheduler = VirtualScheduler::new();
//! let mut viewport = VirtualViewport::new(800.0, 600.0);
//! viewport.set_region("about", Rect::new(0.0, 1000.0, 800.0, 400.0));
//!
//! let mut gate = VisibilityGate::new(VisibilityConfig::default()).unwrap();
//! let mut projects = CounterRamp::<u32>::new(50, CounterConfig::default()).unwrap();
//! gate.bind("about", &mut viewport);
//!
//! viewport.scroll_to(0.0, 700.0);
//! for (subscription, entry) in viewport.entries() {
//!     gate.notify(subscription, &entry, &mut viewport);
//! }
//! projects.set_gate(gate.is_visible(), &mut scheduler);
//!
//! while let Some(fired) = scheduler.next_due(Duration::from_secs(3)) {
//!     projects.fire(fired.ticket, fired.at, &mut scheduler);
//! }
//! assert_eq!(projects.count(), 50);
//! ```

pub mod prelude;

pub use vitrine_core::{
    config::{CounterConfig, TypingConfig, VisibilityConfig},
    counter::{CounterRamp, RampState},
    easing::{CubicBezierEasing, Easing, EasingFunction},
    error::{ConfigError, MarginParseError},
    geometry::{Length, Margin, Rect},
    interpolation::RampValue,
    listeners::ListenerId,
    scheduler::{Fired, PendingSlot, Scheduler, Ticket, VirtualScheduler, Wake},
    typing::{TypingCycler, TypingPhase},
    viewport::VirtualViewport,
    visibility::{IntersectionEntry, IntersectionHost, Latch, Subscription, VisibilityGate},
};
