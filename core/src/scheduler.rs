//! Host scheduling primitives and the single-slot pending schedule owned by each animator.
//!
//! Animators never own a clock. They ask the host for a wake-up through the [`Scheduler`] trait,
//! which mirrors the two suspension points a UI event loop offers: a delay-based timer and a
//! callback before the next frame. The host answers with a [`Ticket`] and later hands the same
//! ticket back to the animator when the wake-up is due. Because an animator only acts on the
//! ticket it is currently holding, a callback that was superseded by a reconfiguration can never
//! change its state, even if the host fails to drop it.
//!
//! [`VirtualScheduler`] is a deterministic implementation for tests, demos and hosts that drive
//! animations from their own loop.

use log::trace;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Opaque handle for one scheduled wake-up.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Ticket(u64);

impl Ticket {
    /// Creates a ticket from a host-defined identifier. Hosts must not reuse identifiers while the
    /// previous ticket with the same value may still be pending.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// The scheduling services a host event loop provides to animators.
pub trait Scheduler {
    /// Requests a wake-up after `delay` has elapsed.
    fn set_timeout(&mut self, delay: Duration) -> Ticket;

    /// Requests a wake-up on the next frame, timestamped with that frame's time.
    fn request_frame(&mut self) -> Ticket;

    /// Cancels a wake-up. Cancelling a ticket that already fired or was already cancelled has no
    /// effect.
    fn cancel(&mut self, ticket: Ticket);
}

/// The one outstanding wake-up of an animator, together with what the animator intends to do when
/// it arrives.
///
/// Every method that installs a new wake-up cancels the previous one first, so at most one ticket
/// is ever live per slot.
#[derive(Debug)]
pub struct PendingSlot<A> {
    entry: Option<(Ticket, A)>,
}

impl<A> Default for PendingSlot<A> {
    fn default() -> Self {
        Self { entry: None }
    }
}

impl<A> PendingSlot<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the pending wake-up with a timer firing after `delay`.
    pub fn set_timeout(&mut self, scheduler: &mut dyn Scheduler, delay: Duration, action: A) {
        self.cancel(scheduler);
        let ticket = scheduler.set_timeout(delay);
        self.entry = Some((ticket, action));
    }

    /// Replaces the pending wake-up with a frame callback.
    pub fn request_frame(&mut self, scheduler: &mut dyn Scheduler, action: A) {
        self.cancel(scheduler);
        let ticket = scheduler.request_frame();
        self.entry = Some((ticket, action));
    }

    /// Cancels the pending wake-up, if any. Returns `true` if something was cancelled.
    pub fn cancel(&mut self, scheduler: &mut dyn Scheduler) -> bool {
        match self.entry.take() {
            Some((ticket, _)) => {
                scheduler.cancel(ticket);
                true
            }
            None => false,
        }
    }

    /// Claims the pending action if `ticket` is the one currently held, emptying the slot.
    ///
    /// Returns [`None`] for any other ticket, leaving the slot untouched.
    pub fn take(&mut self, ticket: Ticket) -> Option<A> {
        match &self.entry {
            Some((current, _)) if *current == ticket => self.entry.take().map(|(_, action)| action),
            _ => {
                trace!("Ignoring stale ticket {ticket:?}");
                None
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.entry.is_some()
    }

    pub fn ticket(&self) -> Option<Ticket> {
        self.entry.as_ref().map(|(ticket, _)| *ticket)
    }

    pub fn action(&self) -> Option<&A> {
        self.entry.as_ref().map(|(_, action)| action)
    }
}

/// Which scheduling primitive produced a wake-up.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Wake {
    Timeout,
    Frame,
}

/// A wake-up delivered by [`VirtualScheduler::next_due`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Fired {
    pub ticket: Ticket,
    /// Virtual time at which the wake-up happened.
    pub at: Duration,
    pub wake: Wake,
}

/// Deterministic, single-threaded event loop with a virtual clock.
///
/// Timers fire at exactly `now + delay`. Frames occur on a fixed cadence (every 16 ms unless
/// configured otherwise); a frame requested at time `t` fires on the first frame boundary strictly
/// after `t`. Wake-ups due at the same instant fire in the order they were requested.
///
/// The scheduler also keeps counters that tests use to check that animators never leave more than
/// one wake-up outstanding.
#[derive(Debug)]
pub struct VirtualScheduler {
    now: Duration,
    frame_interval: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, Ticket), Wake>,
    due_times: HashMap<Ticket, Duration>,
    requested: usize,
    cancelled: usize,
}

impl Default for VirtualScheduler {
    fn default() -> Self {
        Self::with_frame_interval(Duration::from_millis(16))
    }
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scheduler whose frames occur every `frame_interval`. A zero interval is treated
    /// as one millisecond.
    pub fn with_frame_interval(frame_interval: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            frame_interval: frame_interval.max(Duration::from_millis(1)),
            next_id: 0,
            queue: BTreeMap::new(),
            due_times: HashMap::new(),
            requested: 0,
            cancelled: 0,
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Number of wake-ups that are scheduled and have neither fired nor been cancelled.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Total number of wake-ups requested since creation.
    pub fn requested_count(&self) -> usize {
        self.requested
    }

    /// Total number of pending wake-ups that were cancelled.
    pub fn cancelled_count(&self) -> usize {
        self.cancelled
    }

    pub fn is_pending(&self, ticket: Ticket) -> bool {
        self.due_times.contains_key(&ticket)
    }

    /// Virtual time at which `ticket` will fire, if it is still pending.
    pub fn due_time(&self, ticket: Ticket) -> Option<Duration> {
        self.due_times.get(&ticket).copied()
    }

    /// Removes and returns the earliest wake-up due at or before `until`, advancing the clock to
    /// its time. When nothing is due, advances the clock to `until` and returns [`None`].
    ///
    /// Hosts typically drain it in a loop, handing each ticket to every animator they own:
    ///
    /// ```
    /// use std::time::Duration;
    /// use vitrine_core::scheduler::VirtualScheduler;
    /// use vitrine_core::typing::TypingCycler;
    ///
    /// let mut scheduler = VirtualScheduler::new();
    /// let mut cycler = TypingCycler::new(["Hi"], Default::default()).unwrap();
    /// cycler.start(&mut scheduler);
    /// while let Some(fired) = scheduler.next_due(Duration::from_millis(150)) {
    ///     cycler.fire(fired.ticket, fired.at, &mut scheduler);
    /// }
    /// assert_eq!(cycler.display(), "H");
    /// ```
    pub fn next_due(&mut self, until: Duration) -> Option<Fired> {
        let next_at = self.queue.first_key_value().map(|(&(at, _), _)| at);
        let due = match next_at {
            Some(at) if at <= until => self.queue.pop_first(),
            _ => None,
        };
        match due {
            Some(((at, ticket), wake)) => {
                self.due_times.remove(&ticket);
                self.now = self.now.max(at);
                Some(Fired { ticket, at, wake })
            }
            None => {
                self.now = self.now.max(until);
                None
            }
        }
    }

    fn schedule(&mut self, at: Duration, wake: Wake) -> Ticket {
        let ticket = Ticket::new(self.next_id);
        self.next_id += 1;
        self.requested += 1;
        self.queue.insert((at, ticket), wake);
        self.due_times.insert(ticket, at);
        ticket
    }

    fn next_frame_time(&self) -> Duration {
        let interval = self.frame_interval.as_nanos();
        let elapsed_frames = self.now.as_nanos() / interval;
        let next = (elapsed_frames + 1) * interval;
        Duration::from_nanos(next as u64)
    }
}

impl Scheduler for VirtualScheduler {
    fn set_timeout(&mut self, delay: Duration) -> Ticket {
        self.schedule(self.now + delay, Wake::Timeout)
    }

    fn request_frame(&mut self) -> Ticket {
        let at = self.next_frame_time();
        self.schedule(at, Wake::Frame)
    }

    fn cancel(&mut self, ticket: Ticket) {
        if let Some(at) = self.due_times.remove(&ticket) {
            self.queue.remove(&(at, ticket));
            self.cancelled += 1;
        }
    }
}
