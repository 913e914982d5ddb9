//! Typewriter effect that cycles through a list of strings.

use crate::config::TypingConfig;
use crate::error::ConfigError;
use crate::listeners::{ListenerId, Listeners};
use crate::scheduler::{PendingSlot, Scheduler, Ticket};
use enum_map::{enum_map, Enum, EnumMap};
use log::{debug, trace};
use std::time::Duration;

/// What a [`TypingCycler`] is doing with the current string.
#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub enum TypingPhase {
    /// Appending characters until the whole string is shown.
    Typing,
    /// Showing the whole string for the configured pause.
    Holding,
    /// Removing characters until nothing is shown.
    Deleting,
}

/// Types each string one character at a time, holds it, deletes it at twice the typing speed, then
/// moves on to the next string, forever.
///
/// The cycler is a plain state machine. It asks the host for one timer at a time through a
/// [`Scheduler`] and advances by exactly one step each time the host hands that timer back via
/// [`fire`](Self::fire). With `["AB", "C"]` and default timing the display runs through:
///
/// | time (ms) | 0  | 100 | 200  | 2250 | 2300 | 2400 | 4450 | 4550 |
/// |-----------|----|-----|------|------|------|------|------|------|
/// | display   | "" | "A" | "AB" | "A"  | ""   | "C"  | ""   | "A"  |
///
/// There is a pause after a string is fully typed, but none after it is fully deleted: typing the
/// next string starts right away, so its first character appears one typing delay later.
///
/// An empty list of strings is allowed and simply produces an empty display with nothing
/// scheduled. A list made up only of empty strings with a zero pause never advances the clock, so a
/// host draining a virtual scheduler would never get past that instant.
#[derive(Debug)]
pub struct TypingCycler {
    texts: Vec<String>,
    config: TypingConfig,
    delays: EnumMap<TypingPhase, Duration>,
    text_index: usize,
    char_index: usize,
    deleting: bool,
    display: String,
    running: bool,
    pending: PendingSlot<TypingPhase>,
    listeners: Listeners<str>,
}

impl TypingCycler {
    /// Creates a cycler over `texts`. Nothing is scheduled until [`start`](Self::start).
    ///
    /// Fails if the typing delay is zero.
    pub fn new<I>(texts: I, config: TypingConfig) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        config.validate()?;
        Ok(Self {
            texts: texts.into_iter().map(Into::into).collect(),
            config,
            delays: phase_delays(&config),
            text_index: 0,
            char_index: 0,
            deleting: false,
            display: String::new(),
            running: false,
            pending: PendingSlot::new(),
            listeners: Listeners::new(),
        })
    }

    /// The text currently shown; always a prefix of [`current_text`](Self::current_text).
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn config(&self) -> &TypingConfig {
        &self.config
    }

    /// The string being typed or deleted, or [`None`] if there are no strings.
    pub fn current_text(&self) -> Option<&str> {
        self.texts.get(self.text_index).map(String::as_str)
    }

    pub fn text_index(&self) -> usize {
        self.text_index
    }

    /// Number of characters of the current string that are shown.
    pub fn char_index(&self) -> usize {
        self.char_index
    }

    pub fn phase(&self) -> TypingPhase {
        if self.deleting {
            TypingPhase::Deleting
        } else if self.char_index >= self.current_len() {
            TypingPhase::Holding
        } else {
            TypingPhase::Typing
        }
    }

    /// Delay used for steps taken in `phase`.
    pub fn delay(&self, phase: TypingPhase) -> Duration {
        self.delays[phase]
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_pending()
    }

    /// The ticket this cycler is waiting for, if any.
    pub fn pending_ticket(&self) -> Option<Ticket> {
        self.pending.ticket()
    }

    /// Registers a callback that receives the display text every time it changes.
    pub fn subscribe(&mut self, listener: impl FnMut(&str) + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Begins animating from the current position. Has no effect if already running.
    pub fn start(&mut self, scheduler: &mut dyn Scheduler) {
        if self.running {
            return;
        }
        debug!("Starting typing cycler over {} texts", self.texts.len());
        self.running = true;
        self.schedule_next(scheduler);
    }

    /// Stops animating and cancels the pending timer. The display keeps its current text.
    pub fn stop(&mut self, scheduler: &mut dyn Scheduler) {
        if !self.running {
            return;
        }
        debug!("Stopping typing cycler at {:?}", self.display);
        self.running = false;
        self.pending.cancel(scheduler);
    }

    /// Handles a fired timer. Tickets other than the one this cycler is waiting for are ignored.
    ///
    /// Returns `true` if the display changed.
    pub fn fire(&mut self, ticket: Ticket, now: Duration, scheduler: &mut dyn Scheduler) -> bool {
        let Some(phase) = self.pending.take(ticket) else {
            return false;
        };
        let changed = self.step(phase);
        trace!("{phase:?} step at {now:?}: {:?}", self.display);
        self.schedule_next(scheduler);
        if changed {
            self.listeners.emit(&self.display);
        }
        changed
    }

    /// Replaces the strings and restarts from the beginning of the first one.
    ///
    /// The pending timer is cancelled before anything else changes, so no step scheduled for the
    /// old strings can run afterward.
    pub fn set_texts<I>(&mut self, texts: I, scheduler: &mut dyn Scheduler)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.pending.cancel(scheduler);
        self.texts = texts.into_iter().map(Into::into).collect();
        debug!("Typing cycler reconfigured with {} texts", self.texts.len());
        self.text_index = 0;
        self.char_index = 0;
        self.deleting = false;
        let cleared = !self.display.is_empty();
        self.display.clear();
        if self.running {
            self.schedule_next(scheduler);
        }
        if cleared {
            self.listeners.emit(&self.display);
        }
    }

    /// Changes the timing, keeping the current position. The step that was pending is rescheduled
    /// from now with the new delay.
    pub fn set_config(
        &mut self,
        config: TypingConfig,
        scheduler: &mut dyn Scheduler,
    ) -> Result<(), ConfigError> {
        config.validate()?;
        self.pending.cancel(scheduler);
        debug!("Typing cycler timing changed to {config:?}");
        self.config = config;
        self.delays = phase_delays(&config);
        if self.running {
            self.schedule_next(scheduler);
        }
        Ok(())
    }

    fn current_len(&self) -> usize {
        self.current_text().map_or(0, |text| text.chars().count())
    }

    fn step(&mut self, phase: TypingPhase) -> bool {
        match phase {
            TypingPhase::Typing => {
                let next_char = self
                    .current_text()
                    .and_then(|text| text.chars().nth(self.char_index));
                match next_char {
                    Some(c) => {
                        self.display.push(c);
                        self.char_index += 1;
                        true
                    }
                    None => false,
                }
            }
            TypingPhase::Holding => {
                self.deleting = true;
                false
            }
            TypingPhase::Deleting => {
                if self.char_index == 0 {
                    return false;
                }
                self.display.pop();
                self.char_index -= 1;
                true
            }
        }
    }

    fn schedule_next(&mut self, scheduler: &mut dyn Scheduler) {
        if self.texts.is_empty() {
            self.pending.cancel(scheduler);
            return;
        }
        if self.deleting && self.char_index == 0 {
            self.deleting = false;
            self.text_index = (self.text_index + 1) % self.texts.len();
            trace!("Advancing to text {}", self.text_index);
        }
        let phase = self.phase();
        self.pending.set_timeout(scheduler, self.delays[phase], phase);
    }
}

fn phase_delays(config: &TypingConfig) -> EnumMap<TypingPhase, Duration> {
    enum_map! {
        TypingPhase::Typing => config.type_speed,
        TypingPhase::Holding => config.pause,
        TypingPhase::Deleting => config.delete_speed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::VirtualScheduler;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn run_until(cycler: &mut TypingCycler, scheduler: &mut VirtualScheduler, until: Duration) {
        while let Some(fired) = scheduler.next_due(until) {
            cycler.fire(fired.ticket, fired.at, scheduler);
        }
    }

    #[test]
    fn phase_delays_follow_config() {
        let cycler =
            TypingCycler::new(["abc"], TypingConfig::new(ms(80), ms(900))).unwrap();

        assert_eq!(cycler.delay(TypingPhase::Typing), ms(80));
        assert_eq!(cycler.delay(TypingPhase::Holding), ms(900));
        assert_eq!(cycler.delay(TypingPhase::Deleting), ms(40));
    }

    #[test]
    fn when_not_started_then_nothing_scheduled() {
        let mut scheduler = VirtualScheduler::new();
        let mut cycler = TypingCycler::new(["abc"], TypingConfig::default()).unwrap();

        run_until(&mut cycler, &mut scheduler, ms(10_000));

        assert_eq!(cycler.display(), "");
        assert_eq!(scheduler.requested_count(), 0);
    }

    #[test]
    fn when_texts_empty_then_display_empty_and_nothing_scheduled() {
        let mut scheduler = VirtualScheduler::new();
        let mut cycler = TypingCycler::new(Vec::<String>::new(), TypingConfig::default()).unwrap();
        cycler.start(&mut scheduler);

        run_until(&mut cycler, &mut scheduler, ms(10_000));

        assert_eq!(cycler.display(), "");
        assert_eq!(cycler.current_text(), None);
        assert!(!cycler.is_pending());
        assert_eq!(scheduler.requested_count(), 0);
    }

    #[test]
    fn types_first_character_after_one_delay() {
        let mut scheduler = VirtualScheduler::new();
        let mut cycler = TypingCycler::new(["Rust"], TypingConfig::default()).unwrap();
        cycler.start(&mut scheduler);

        run_until(&mut cycler, &mut scheduler, ms(99));
        assert_eq!(cycler.display(), "");
        run_until(&mut cycler, &mut scheduler, ms(100));
        assert_eq!(cycler.display(), "R");
        assert_eq!(cycler.phase(), TypingPhase::Typing);
    }

    #[test]
    fn holds_full_text_for_pause_then_deletes() {
        let mut scheduler = VirtualScheduler::new();
        let mut cycler = TypingCycler::new(["ab"], TypingConfig::default()).unwrap();
        cycler.start(&mut scheduler);

        run_until(&mut cycler, &mut scheduler, ms(200));
        assert_eq!(cycler.display(), "ab");
        assert_eq!(cycler.phase(), TypingPhase::Holding);

        run_until(&mut cycler, &mut scheduler, ms(2200));
        assert_eq!(cycler.display(), "ab");
        assert_eq!(cycler.phase(), TypingPhase::Deleting);

        run_until(&mut cycler, &mut scheduler, ms(2250));
        assert_eq!(cycler.display(), "a");
    }

    #[test]
    fn types_multibyte_characters_whole() {
        let mut scheduler = VirtualScheduler::new();
        let mut cycler = TypingCycler::new(["héllo→"], TypingConfig::default()).unwrap();
        cycler.start(&mut scheduler);

        run_until(&mut cycler, &mut scheduler, ms(200));
        assert_eq!(cycler.display(), "hé");
        run_until(&mut cycler, &mut scheduler, ms(600));
        assert_eq!(cycler.display(), "héllo→");
        assert_eq!(cycler.char_index(), 6);
    }

    #[test]
    fn empty_string_in_list_is_held_then_skipped() {
        let mut scheduler = VirtualScheduler::new();
        let config = TypingConfig::new(ms(100), ms(1000));
        let mut cycler = TypingCycler::new(["", "x"], config).unwrap();
        cycler.start(&mut scheduler);

        assert_eq!(cycler.phase(), TypingPhase::Holding);
        run_until(&mut cycler, &mut scheduler, ms(1000));
        assert_eq!(cycler.text_index(), 1);
        run_until(&mut cycler, &mut scheduler, ms(1100));
        assert_eq!(cycler.display(), "x");
    }

    #[test]
    fn stop_cancels_pending_timer_and_keeps_display() {
        let mut scheduler = VirtualScheduler::new();
        let mut cycler = TypingCycler::new(["abc"], TypingConfig::default()).unwrap();
        cycler.start(&mut scheduler);
        run_until(&mut cycler, &mut scheduler, ms(150));

        cycler.stop(&mut scheduler);
        run_until(&mut cycler, &mut scheduler, ms(5000));

        assert_eq!(cycler.display(), "a");
        assert!(!cycler.is_pending());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn stale_ticket_does_not_advance() {
        let mut scheduler = VirtualScheduler::new();
        let mut cycler = TypingCycler::new(["abc"], TypingConfig::default()).unwrap();
        cycler.start(&mut scheduler);
        let stale = cycler.pending_ticket().unwrap();
        cycler.set_texts(["xyz"], &mut scheduler);

        assert!(!cycler.fire(stale, ms(100), &mut scheduler));
        assert_eq!(cycler.display(), "");
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn set_config_keeps_position_and_uses_new_delay() {
        let mut scheduler = VirtualScheduler::new();
        let mut cycler = TypingCycler::new(["abcd"], TypingConfig::default()).unwrap();
        cycler.start(&mut scheduler);
        run_until(&mut cycler, &mut scheduler, ms(200));

        cycler
            .set_config(TypingConfig::new(ms(10), ms(2000)), &mut scheduler)
            .unwrap();
        run_until(&mut cycler, &mut scheduler, ms(210));

        assert_eq!(cycler.display(), "abc");
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn set_config_rejects_zero_speed_without_side_effects() {
        let mut scheduler = VirtualScheduler::new();
        let mut cycler = TypingCycler::new(["abcd"], TypingConfig::default()).unwrap();
        cycler.start(&mut scheduler);
        let ticket = cycler.pending_ticket();

        let result = cycler.set_config(TypingConfig::new(Duration::ZERO, ms(1)), &mut scheduler);

        assert_eq!(result, Err(ConfigError::ZeroTypeSpeed));
        assert_eq!(cycler.pending_ticket(), ticket);
        assert_eq!(cycler.config(), &TypingConfig::default());
    }

    #[test]
    fn new_rejects_zero_speed() {
        let result = TypingCycler::new(["a"], TypingConfig::new(Duration::ZERO, ms(100)));

        assert!(matches!(result, Err(ConfigError::ZeroTypeSpeed)));
    }

    #[test]
    fn listeners_receive_each_change() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = VirtualScheduler::new();
        let mut cycler = TypingCycler::new(["ab"], TypingConfig::default()).unwrap();
        let sink = seen.clone();
        cycler.subscribe(move |text| sink.borrow_mut().push(text.to_string()));
        cycler.start(&mut scheduler);

        run_until(&mut cycler, &mut scheduler, ms(2300));

        assert_eq!(*seen.borrow(), vec!["a", "ab", "a", ""]);
    }
}
