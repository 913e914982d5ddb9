//! A scrollable viewport that implements [`IntersectionHost`] without a browser.

use crate::config::VisibilityConfig;
use crate::geometry::Rect;
use crate::visibility::{IntersectionEntry, IntersectionHost, Subscription};
use log::trace;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

#[derive(Debug)]
struct Observation<R> {
    region: R,
    options: VisibilityConfig,
    last_met: Option<bool>,
}

/// Page layout with a scrollable window onto it.
///
/// Regions are positioned in page coordinates. The observation root is the visible window, i.e. a
/// rectangle of the viewport's size at the current scroll offset. Like a browser intersection
/// observer, [`entries`](Self::entries) reports every new observation once, and afterward only
/// observations whose threshold status changed.
#[derive(Debug)]
pub struct VirtualViewport<R> {
    width: f32,
    height: f32,
    scroll_x: f32,
    scroll_y: f32,
    regions: HashMap<R, Rect>,
    observations: BTreeMap<Subscription, Observation<R>>,
    next_id: u64,
}

impl<R: Clone + Eq + Hash> VirtualViewport<R> {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
            regions: HashMap::new(),
            observations: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Places (or moves) a region on the page.
    pub fn set_region(&mut self, region: R, rect: Rect) {
        self.regions.insert(region, rect);
    }

    pub fn remove_region(&mut self, region: &R) -> Option<Rect> {
        self.regions.remove(region)
    }

    pub fn scroll_to(&mut self, x: f32, y: f32) {
        self.scroll_x = x;
        self.scroll_y = y;
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// The visible window in page coordinates, before any root margin.
    pub fn root(&self) -> Rect {
        Rect::new(self.scroll_x, self.scroll_y, self.width, self.height)
    }

    /// Number of live observations.
    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }

    pub fn is_observed(&self, subscription: Subscription) -> bool {
        self.observations.contains_key(&subscription)
    }

    /// Collects the reports that are due for the current layout and scroll position, in
    /// subscription order.
    ///
    /// Observations of regions that have not been placed yet are skipped until they are.
    pub fn entries(&mut self) -> Vec<(Subscription, IntersectionEntry)> {
        let root = self.root();
        let mut entries = Vec::new();
        for (subscription, observation) in self.observations.iter_mut() {
            let Some(target) = self.regions.get(&observation.region) else {
                continue;
            };
            let margin = &observation.options.root_margin;
            let entry = IntersectionEntry::from_geometry(target, &root, margin);
            let met = entry.meets(observation.options.threshold);
            if observation.last_met != Some(met) {
                observation.last_met = Some(met);
                trace!("Reporting {subscription:?}: {entry:?}");
                entries.push((*subscription, entry));
            }
        }
        entries
    }
}

impl<R: Clone + Eq + Hash> IntersectionHost<R> for VirtualViewport<R> {
    fn observe(&mut self, region: &R, options: &VisibilityConfig) -> Subscription {
        let subscription = Subscription::new(self.next_id);
        self.next_id += 1;
        self.observations.insert(
            subscription,
            Observation {
                region: region.clone(),
                options: *options,
                last_met: None,
            },
        );
        subscription
    }

    fn unobserve(&mut self, subscription: Subscription) {
        self.observations.remove(&subscription);
    }
}
