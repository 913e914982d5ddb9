//! Gated counter that ramps from zero to a target over a fixed wall-clock duration.

use crate::config::CounterConfig;
use crate::easing::{Easing, EasingFunction};
use crate::error::ConfigError;
use crate::interpolation::RampValue;
use crate::listeners::{ListenerId, Listeners};
use crate::scheduler::{PendingSlot, Scheduler, Ticket};
use log::{debug, trace};
use std::time::Duration;

/// Lifecycle of a [`CounterRamp`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RampState {
    /// Not animating: the gate has never opened, was closed, or the ramp was stopped. The count
    /// holds whatever value it had.
    Idle,
    /// The gate is open and a frame callback is pending.
    Running,
    /// The full duration elapsed and the count settled on the target. Nothing is pending.
    Finished,
}

/// Counts from zero up to a target once an external gate opens, typically wired to a
/// [`VisibilityGate`](crate::visibility::VisibilityGate) so that statistics start counting when
/// they scroll into view.
///
/// Progress is always computed from the timestamp of the first frame after the gate opened, never
/// by accumulating per-frame increments, so the ramp finishes after `duration` no matter how often
/// or how irregularly frames arrive. With the default linear easing, the count at `elapsed` is
/// `floor(min(elapsed / duration, 1) * target)`:
///
/// ```
/// use std::time::Duration;
/// use vitrine_core::config::CounterConfig;
/// use vitrine_core::counter::CounterRamp;
/// use vitrine_core::scheduler::VirtualScheduler;
///
/// let mut scheduler = VirtualScheduler::with_frame_interval(Duration::from_millis(10));
/// let mut ramp = CounterRamp::<u32>::new(50, CounterConfig::default()).unwrap();
/// ramp.set_gate(true, &mut scheduler);
/// // First frame at 10ms starts the clock, so 1000ms of progress is reached at 1010ms.
/// while let Some(fired) = scheduler.next_due(Duration::from_millis(1010)) {
///     ramp.fire(fired.ticket, fired.at, &mut scheduler);
/// }
/// assert_eq!(ramp.count(), 25);
/// ```
#[derive(Debug)]
pub struct CounterRamp<T: RampValue = u32> {
    target: T,
    config: CounterConfig,
    gate: bool,
    count: T,
    start: Option<Duration>,
    state: RampState,
    pending: PendingSlot<()>,
    listeners: Listeners<T>,
}

impl<T: RampValue> CounterRamp<T> {
    /// Creates an idle counter at zero with its gate closed.
    ///
    /// Fails if the configured duration is zero.
    pub fn new(target: T, config: CounterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            target,
            config,
            gate: false,
            count: T::zero(),
            start: None,
            state: RampState::Idle,
            pending: PendingSlot::new(),
            listeners: Listeners::new(),
        })
    }

    pub fn count(&self) -> T {
        self.count
    }

    pub fn target(&self) -> T {
        self.target
    }

    pub fn duration(&self) -> Duration {
        self.config.duration
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    pub fn is_gate_open(&self) -> bool {
        self.gate
    }

    pub fn state(&self) -> RampState {
        self.state
    }

    /// Timestamp of the first frame of the current run, once it has arrived.
    pub fn start_time(&self) -> Option<Duration> {
        self.start
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_pending()
    }

    pub fn pending_ticket(&self) -> Option<Ticket> {
        self.pending.ticket()
    }

    /// Registers a callback that receives the count every time it changes.
    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Updates the gate input.
    ///
    /// Opening the gate starts a new run from zero. Closing it cancels the pending frame and
    /// freezes the count; it does not count back down. Setting the gate to the value it already
    /// has does nothing.
    pub fn set_gate(&mut self, open: bool, scheduler: &mut dyn Scheduler) {
        if open == self.gate {
            return;
        }
        self.gate = open;
        if open {
            self.arm(scheduler);
        } else {
            debug!("Counter gate closed at {:?}", self.count);
            self.halt(scheduler);
        }
    }

    /// Handles a fired frame callback. Tickets other than the pending one are ignored.
    ///
    /// Returns `true` if the count changed.
    pub fn fire(&mut self, ticket: Ticket, now: Duration, scheduler: &mut dyn Scheduler) -> bool {
        if self.pending.take(ticket).is_none() {
            return false;
        }
        let start = *self.start.get_or_insert(now);
        let elapsed = now.saturating_sub(start);
        // Eased progress can round onto the target a frame early; a run never counts backward.
        let next = T::at_progress(self.target, self.progress(elapsed)).max(self.count);
        trace!("Counter frame at {now:?}: elapsed {elapsed:?}, count {next:?}");
        if elapsed < self.config.duration {
            self.pending.request_frame(scheduler, ());
        } else {
            debug!("Counter reached {:?}", self.target);
            self.state = RampState::Finished;
        }
        self.update_count(next)
    }

    /// Changes the target. An open gate restarts the ramp from zero; with the gate closed the count
    /// is only clamped to the new target.
    pub fn retarget(&mut self, target: T, scheduler: &mut dyn Scheduler) {
        debug!("Counter retargeted from {:?} to {target:?}", self.target);
        self.target = target;
        if self.gate {
            self.arm(scheduler);
        } else {
            self.update_count(self.count.min(target));
        }
    }

    /// Changes the duration and easing. An open gate restarts the ramp from zero.
    pub fn set_config(
        &mut self,
        config: CounterConfig,
        scheduler: &mut dyn Scheduler,
    ) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        if self.gate {
            self.arm(scheduler);
        }
        Ok(())
    }

    /// Cancels any pending frame. The gate input is left as it was; the count is frozen.
    pub fn stop(&mut self, scheduler: &mut dyn Scheduler) {
        self.halt(scheduler);
    }

    fn arm(&mut self, scheduler: &mut dyn Scheduler) {
        debug!("Counter armed toward {:?} over {:?}", self.target, self.config.duration);
        self.start = None;
        self.state = RampState::Running;
        self.pending.request_frame(scheduler, ());
        self.update_count(T::zero());
    }

    fn halt(&mut self, scheduler: &mut dyn Scheduler) {
        self.pending.cancel(scheduler);
        if self.state == RampState::Running {
            self.state = RampState::Idle;
        }
    }

    fn progress(&self, elapsed: Duration) -> f64 {
        let linear = (elapsed.as_nanos() as f64 / self.config.duration.as_nanos() as f64).min(1.0);
        match &self.config.easing {
            Easing::Linear => linear,
            easing => (easing.calc(linear as f32) as f64).clamp(0.0, 1.0),
        }
    }

    fn update_count(&mut self, count: T) -> bool {
        if count == self.count {
            return false;
        }
        self.count = count;
        self.listeners.emit(&self.count);
        true
    }
}
