//! Scroll-triggered entrance reveals.
//!
//! Every element tagged `.reveal` starts [`RevealState::Pending`] and flips to
//! [`RevealState::Visible`] the first time it intersects the viewport at or
//! above [`VISIBILITY_THRESHOLD`]. The flip is one-way.
//!
//! A target taller than the viewport may never reach the threshold ratio, so
//! for those any intersection reveals.

use std::collections::HashMap;
use std::hash::Hash;

/// Fraction of a target that must be inside the viewport to reveal it.
pub const VISIBILITY_THRESHOLD: f64 = 0.15;

/// Class marking elements that take part in reveals.
pub const REVEAL_CLASS: &str = "reveal";

/// Class added once an element has been revealed.
pub const VISIBLE_CLASS: &str = "visible";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Pending,
    Visible,
}

/// One visibility report from the watcher.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry<K> {
    pub target: K,
    pub is_intersecting: bool,
    pub ratio: f64,
    /// The target's height exceeds the viewport's.
    pub taller_than_viewport: bool,
}

impl<K> IntersectionEntry<K> {
    pub fn new(target: K, is_intersecting: bool, ratio: f64) -> Self {
        Self {
            target,
            is_intersecting,
            ratio,
            taller_than_viewport: false,
        }
    }

    pub fn taller_than_viewport(mut self) -> Self {
        self.taller_than_viewport = true;
        self
    }

    fn reveals(&self) -> bool {
        self.is_intersecting && (self.ratio >= VISIBILITY_THRESHOLD || self.taller_than_viewport)
    }
}

/// The viewport watcher (`IntersectionObserver` on the page).
pub trait IntersectionWatcher<K> {
    fn observe(&mut self, target: &K, threshold: f64);
    fn disconnect(&mut self);
}

pub struct RevealObserver<K, W>
where
    K: Eq + Hash + Clone,
    W: IntersectionWatcher<K>,
{
    targets: HashMap<K, RevealState>,
    watcher: Option<W>,
}

impl<K, W> RevealObserver<K, W>
where
    K: Eq + Hash + Clone,
    W: IntersectionWatcher<K>,
{
    /// Register every target with `watcher`. An empty target list observes nothing.
    pub fn mount(targets: impl IntoIterator<Item = K>, mut watcher: W) -> Self {
        let mut states = HashMap::new();
        for target in targets {
            if states.insert(target.clone(), RevealState::Pending).is_none() {
                watcher.observe(&target, VISIBILITY_THRESHOLD);
            }
        }
        tracing::debug!(targets = states.len(), "reveal observer mounted");
        Self {
            targets: states,
            watcher: Some(watcher),
        }
    }

    /// Apply a batch of intersection reports, returning the targets that were
    /// revealed by this batch.
    pub fn handle(&mut self, entries: &[IntersectionEntry<K>]) -> Vec<K> {
        if self.watcher.is_none() {
            return Vec::new();
        }
        let mut revealed = Vec::new();
        for entry in entries.iter().filter(|e| e.reveals()) {
            if let Some(state) = self.targets.get_mut(&entry.target) {
                if *state == RevealState::Pending {
                    *state = RevealState::Visible;
                    revealed.push(entry.target.clone());
                }
            }
        }
        revealed
    }

    pub fn state(&self, target: &K) -> Option<RevealState> {
        self.targets.get(target).copied()
    }

    pub fn pending_count(&self) -> usize {
        self.targets
            .values()
            .filter(|s| **s == RevealState::Pending)
            .count()
    }

    pub fn is_mounted(&self) -> bool {
        self.watcher.is_some()
    }

    /// Tear down the watcher. Safe to call more than once.
    pub fn unmount(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            watcher.disconnect();
            tracing::debug!("reveal observer disconnected");
        }
    }
}

impl<K, W> Drop for RevealObserver<K, W>
where
    K: Eq + Hash + Clone,
    W: IntersectionWatcher<K>,
{
    fn drop(&mut self) {
        self.unmount();
    }
}
