//! One-shot detection of a region scrolling into view.

use crate::config::VisibilityConfig;
use crate::error::ConfigError;
use crate::geometry::{Margin, Rect};
use crate::listeners::{ListenerId, Listeners};
use log::{debug, trace};

/// Opaque handle for one region observation, handed out by an [`IntersectionHost`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Subscription(u64);

impl Subscription {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// The observation service a host provides, modeled on a browser intersection observer.
///
/// `R` is whatever the host uses to identify a region of its layout: an element id, a widget key,
/// an entity, etc. After [`observe`](Self::observe), the host reports changes by calling
/// [`VisibilityGate::notify`] with the returned subscription.
pub trait IntersectionHost<R> {
    fn observe(&mut self, region: &R, options: &VisibilityConfig) -> Subscription;

    /// Stops reporting for a subscription. Unknown or already-removed subscriptions are ignored.
    fn unobserve(&mut self, subscription: Subscription);
}

/// How much of an observed region lies inside the (margined) observation root.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    /// Whether the region touches the root at all. Regions that only share an edge with the root
    /// count as intersecting.
    pub is_intersecting: bool,
    /// Visible fraction of the region's area, from `0.0` to `1.0`.
    pub ratio: f32,
}

impl IntersectionEntry {
    pub fn new(is_intersecting: bool, ratio: f32) -> Self {
        Self {
            is_intersecting,
            ratio,
        }
    }

    /// Computes the entry for a `target` region against a `root` area adjusted by `margin`.
    ///
    /// A region with no area that lies within the root is considered fully visible.
    pub fn from_geometry(target: &Rect, root: &Rect, margin: &Margin) -> Self {
        let root = root.expand_by(margin);
        match target.intersection(&root) {
            None => Self::new(false, 0.0),
            Some(overlap) => {
                let area = target.area();
                let ratio = if area > 0.0 { overlap.area() / area } else { 1.0 };
                Self::new(true, ratio.min(1.0))
            }
        }
    }

    /// Whether this entry satisfies `threshold`. A region has to be intersecting, so even a zero
    /// threshold is not met by a region that is entirely out of view.
    pub fn meets(&self, threshold: f32) -> bool {
        self.is_intersecting && self.ratio >= threshold
    }
}

/// State of a [`VisibilityGate`]. The only transition is `Unarmed` to `Armed`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Latch {
    #[default]
    Unarmed,
    Armed,
}

/// Reports whether a region has ever been seen, for scroll-reveal effects and for starting
/// [`CounterRamp`](crate::counter::CounterRamp)s.
///
/// Once the bound region is reported with an intersection ratio at or above the threshold, the
/// gate latches and stays visible for the rest of its life, even if the region later leaves the
/// viewport. Observation is dropped at that point since nothing can change the outcome anymore.
///
/// A gate that is never bound stays invisible forever; this is not an error.
#[derive(Debug)]
pub struct VisibilityGate<R> {
    config: VisibilityConfig,
    latch: Latch,
    region: Option<R>,
    subscription: Option<Subscription>,
    listeners: Listeners<bool>,
}

impl<R: PartialEq> VisibilityGate<R> {
    /// Creates an unbound, unlatched gate. Fails if the threshold is outside `0.0..=1.0`.
    pub fn new(config: VisibilityConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            latch: Latch::Unarmed,
            region: None,
            subscription: None,
            listeners: Listeners::new(),
        })
    }

    pub fn config(&self) -> &VisibilityConfig {
        &self.config
    }

    pub fn is_visible(&self) -> bool {
        self.latch == Latch::Armed
    }

    pub fn latch(&self) -> Latch {
        self.latch
    }

    /// The region currently bound, if any.
    pub fn region(&self) -> Option<&R> {
        self.region.as_ref()
    }

    pub fn is_observing(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn subscription(&self) -> Option<Subscription> {
        self.subscription
    }

    /// Registers a callback invoked once, with `true`, when the gate latches.
    pub fn subscribe(&mut self, listener: impl FnMut(&bool) + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Attaches the gate to `region`, typically when the host's element for it is created.
    ///
    /// Binding a different region cancels the observation of the previous one first. Binding the
    /// same region again does nothing. An already latched gate records the region but does not
    /// observe it.
    pub fn bind(&mut self, region: R, host: &mut dyn IntersectionHost<R>) {
        if self.region.as_ref() == Some(&region) {
            return;
        }
        self.release(host);
        if self.latch == Latch::Unarmed {
            let subscription = host.observe(&region, &self.config);
            debug!("Observing region with {subscription:?}");
            self.subscription = Some(subscription);
        }
        self.region = Some(region);
    }

    /// Detaches from the current region and stops observing. The latch is unaffected.
    pub fn unbind(&mut self, host: &mut dyn IntersectionHost<R>) {
        self.release(host);
        self.region = None;
    }

    /// Handles an intersection report from the host. Reports for any subscription other than the
    /// current one are ignored, as is everything after the gate has latched.
    ///
    /// Returns `true` if this report latched the gate.
    pub fn notify(
        &mut self,
        subscription: Subscription,
        entry: &IntersectionEntry,
        host: &mut dyn IntersectionHost<R>,
    ) -> bool {
        if self.subscription != Some(subscription) {
            trace!("Ignoring report for stale {subscription:?}");
            return false;
        }
        if self.latch == Latch::Armed || !entry.meets(self.config.threshold) {
            return false;
        }
        debug!("Region became visible at ratio {}", entry.ratio);
        self.latch = Latch::Armed;
        self.release(host);
        self.listeners.emit(&true);
        true
    }

    fn release(&mut self, host: &mut dyn IntersectionHost<R>) {
        if let Some(subscription) = self.subscription.take() {
            trace!("Unobserving {subscription:?}");
            host.unobserve(subscription);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Length;

    #[derive(Default)]
    struct RecordingHost {
        next_id: u64,
        observed: Vec<(&'static str, Subscription)>,
        unobserved: Vec<Subscription>,
    }

    impl IntersectionHost<&'static str> for RecordingHost {
        fn observe(&mut self, region: &&'static str, _options: &VisibilityConfig) -> Subscription {
            let subscription = Subscription::new(self.next_id);
            self.next_id += 1;
            self.observed.push((*region, subscription));
            subscription
        }

        fn unobserve(&mut self, subscription: Subscription) {
            self.unobserved.push(subscription);
        }
    }

    fn gate(threshold: f32) -> VisibilityGate<&'static str> {
        VisibilityGate::new(VisibilityConfig::new(threshold, Margin::zero())).unwrap()
    }

    #[test]
    fn entry_from_geometry_computes_visible_fraction() {
        let root = Rect::new(0.0, 0.0, 800.0, 600.0);
        let target = Rect::new(0.0, 500.0, 800.0, 400.0);

        let entry = IntersectionEntry::from_geometry(&target, &root, &Margin::zero());

        assert!(entry.is_intersecting);
        assert_eq!(entry.ratio, 0.25);
    }

    #[test]
    fn entry_from_geometry_applies_root_margin() {
        let root = Rect::new(0.0, 0.0, 800.0, 600.0);
        let target = Rect::new(0.0, 500.0, 800.0, 400.0);
        let margin =
            Margin::new(Length::Px(0.0), Length::Px(0.0), Length::Px(-100.0), Length::Px(0.0));

        let entry = IntersectionEntry::from_geometry(&target, &root, &margin);

        assert!(entry.is_intersecting);
        assert_eq!(entry.ratio, 0.0);
        assert!(!entry.meets(0.2));
    }

    #[test]
    fn entry_for_zero_area_region_inside_root_is_fully_visible() {
        let root = Rect::new(0.0, 0.0, 100.0, 100.0);
        let target = Rect::new(10.0, 10.0, 0.0, 0.0);

        let entry = IntersectionEntry::from_geometry(&target, &root, &Margin::zero());

        assert_eq!(entry, IntersectionEntry::new(true, 1.0));
    }

    #[test]
    fn zero_threshold_requires_intersection() {
        assert!(!IntersectionEntry::new(false, 0.0).meets(0.0));
        assert!(IntersectionEntry::new(true, 0.0).meets(0.0));
    }

    #[test]
    fn when_never_bound_then_never_visible() {
        let gate = gate(0.2);

        assert!(!gate.is_visible());
        assert!(!gate.is_observing());
        assert_eq!(gate.region(), None);
    }

    #[test]
    fn bind_starts_observing() {
        let mut host = RecordingHost::default();
        let mut gate = gate(0.2);

        gate.bind("about", &mut host);

        assert!(gate.is_observing());
        assert_eq!(host.observed, vec![("about", Subscription::new(0))]);
    }

    #[test]
    fn latches_when_threshold_met() {
        let mut host = RecordingHost::default();
        let mut gate = gate(0.5);
        gate.bind("about", &mut host);
        let subscription = gate.subscription().unwrap();

        assert!(!gate.notify(subscription, &IntersectionEntry::new(true, 0.49), &mut host));
        assert!(!gate.is_visible());
        assert!(gate.notify(subscription, &IntersectionEntry::new(true, 0.5), &mut host));
        assert!(gate.is_visible());
        assert_eq!(gate.latch(), Latch::Armed);
    }

    #[test]
    fn latch_survives_leaving_view() {
        let mut host = RecordingHost::default();
        let mut gate = gate(0.2);
        gate.bind("about", &mut host);
        let subscription = gate.subscription().unwrap();
        gate.notify(subscription, &IntersectionEntry::new(true, 1.0), &mut host);

        let changed = gate.notify(subscription, &IntersectionEntry::new(false, 0.0), &mut host);

        assert!(!changed);
        assert!(gate.is_visible());
    }

    #[test]
    fn latching_drops_observation() {
        let mut host = RecordingHost::default();
        let mut gate = gate(0.2);
        gate.bind("about", &mut host);
        let subscription = gate.subscription().unwrap();

        gate.notify(subscription, &IntersectionEntry::new(true, 0.3), &mut host);

        assert!(!gate.is_observing());
        assert_eq!(host.unobserved, vec![subscription]);
        assert_eq!(gate.region(), Some(&"about"));
    }

    #[test]
    fn rebinding_cancels_previous_observation() {
        let mut host = RecordingHost::default();
        let mut gate = gate(0.2);
        gate.bind("about", &mut host);
        let old = gate.subscription().unwrap();

        gate.bind("skills", &mut host);

        assert_eq!(host.unobserved, vec![old]);
        assert!(!gate.notify(old, &IntersectionEntry::new(true, 1.0), &mut host));
        assert!(!gate.is_visible());
        assert_eq!(gate.region(), Some(&"skills"));
    }

    #[test]
    fn binding_same_region_twice_is_ignored() {
        let mut host = RecordingHost::default();
        let mut gate = gate(0.2);
        gate.bind("about", &mut host);
        gate.bind("about", &mut host);

        assert_eq!(host.observed.len(), 1);
        assert!(host.unobserved.is_empty());
    }

    #[test]
    fn unbind_stops_observing_without_latching() {
        let mut host = RecordingHost::default();
        let mut gate = gate(0.2);
        gate.bind("about", &mut host);
        let subscription = gate.subscription().unwrap();

        gate.unbind(&mut host);

        assert_eq!(host.unobserved, vec![subscription]);
        assert!(!gate.notify(subscription, &IntersectionEntry::new(true, 1.0), &mut host));
        assert!(!gate.is_visible());
    }

    #[test]
    fn new_rejects_invalid_threshold() {
        let result =
            VisibilityGate::<&'static str>::new(VisibilityConfig::new(1.5, Margin::zero()));

        assert!(matches!(result, Err(ConfigError::ThresholdOutOfRange(_))));
    }

    #[test]
    fn listeners_notified_once_on_latch() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut host = RecordingHost::default();
        let mut gate = gate(0.2);
        let sink = calls.clone();
        gate.subscribe(move |visible| sink.borrow_mut().push(*visible));
        gate.bind("about", &mut host);
        let subscription = gate.subscription().unwrap();

        gate.notify(subscription, &IntersectionEntry::new(true, 0.9), &mut host);
        gate.notify(subscription, &IntersectionEntry::new(true, 0.9), &mut host);

        assert_eq!(*calls.borrow(), vec![true]);
    }
}
