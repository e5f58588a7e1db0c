// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry: explicit ownership of live panel instances.
//!
//! ## Overview
//!
//! Instances are registered when created and unregistered when destroyed; the registry is
//! an ordinary value owned by the caller, not a global. Handles are generational
//! [`InstanceId`]s, so a stale id from an unregistered instance never aliases a newer one
//! that reuses the slot.
//!
//! A low-frequency [`Registry::sweep`] drops instances the caller reports as dead (for
//! example, origin detached from the document).

use core::time::Duration;

/// Default time between two [`Registry::sweep`] passes.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(20);

/// Identifier for a registered instance (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct InstanceId(u32, u32);

impl InstanceId {
    fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Owner of live instances.
#[derive(Clone, Debug)]
pub struct Registry<T> {
    slots: Vec<Option<T>>,
    generations: Vec<u32>, // persists across frees
    free_list: Vec<usize>,
    sweep_interval: Duration,
    last_sweep: Option<Duration>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Registry<T> {
    /// Empty registry with the default sweep interval.
    pub fn new() -> Self {
        Self::with_sweep_interval(DEFAULT_SWEEP_INTERVAL)
    }

    /// Empty registry with a custom sweep interval.
    pub fn with_sweep_interval(sweep_interval: Duration) -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            sweep_interval,
            last_sweep: None,
        }
    }

    /// Add an instance and return its id.
    pub fn register(&mut self, instance: T) -> InstanceId {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.generations[idx] = self.generations[idx].wrapping_add(1);
            self.slots[idx] = Some(instance);
            idx
        } else {
            self.slots.push(Some(instance));
            self.generations.push(1);
            self.slots.len() - 1
        };
        self.id_at(idx)
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "InstanceId uses 32-bit indices by design."
    )]
    fn id_at(&self, idx: usize) -> InstanceId {
        InstanceId(idx as u32, self.generations[idx])
    }

    /// Remove an instance, returning it. Stale ids return `None`.
    pub fn unregister(&mut self, id: InstanceId) -> Option<T> {
        if !self.contains(id) {
            return None;
        }
        let instance = self.slots[id.idx()].take();
        self.free_list.push(id.idx());
        instance
    }

    /// True if `id` refers to a live instance.
    pub fn contains(&self, id: InstanceId) -> bool {
        self.generations.get(id.idx()) == Some(&id.1)
            && self.slots.get(id.idx()).is_some_and(Option::is_some)
    }

    /// Borrow an instance.
    pub fn get(&self, id: InstanceId) -> Option<&T> {
        if !self.contains(id) {
            return None;
        }
        self.slots[id.idx()].as_ref()
    }

    /// Mutably borrow an instance.
    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut T> {
        if !self.contains(id) {
            return None;
        }
        self.slots[id.idx()].as_mut()
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live instances with their ids, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (InstanceId, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|t| (self.id_at(i), t)))
    }

    /// Live instances, mutably, with their ids.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (InstanceId, &mut T)> + '_ {
        let generations = &self.generations;
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(move |(i, slot)| {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "InstanceId uses 32-bit indices by design."
                )]
                let idx = i as u32;
                slot.as_mut().map(|t| (InstanceId(idx, generations[i]), t))
            })
    }

    /// Drop every instance for which `alive` returns false, at most once per sweep interval.
    ///
    /// Returns the removed instances; an empty list when the interval has not elapsed.
    pub fn sweep(
        &mut self,
        now: Duration,
        mut alive: impl FnMut(&T) -> bool,
    ) -> Vec<(InstanceId, T)> {
        if let Some(last) = self.last_sweep
            && now.saturating_sub(last) < self.sweep_interval
        {
            return Vec::new();
        }
        self.last_sweep = Some(now);

        let dead: Vec<InstanceId> = self
            .iter()
            .filter(|(_, t)| !alive(*t))
            .map(|(id, _)| id)
            .collect();
        let removed: Vec<(InstanceId, T)> = dead
            .into_iter()
            .filter_map(|id| self.unregister(id).map(|t| (id, t)))
            .collect();

        #[cfg(feature = "tracing")]
        if !removed.is_empty() {
            tracing::debug!(removed = removed.len(), live = self.len(), "registry sweep");
        }

        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_get_unregister() {
        let mut r = Registry::new();
        let a = r.register("a");
        let b = r.register("b");
        assert_eq!(r.len(), 2);
        assert_eq!(r.get(a), Some(&"a"));
        assert_eq!(r.unregister(a), Some("a"));
        assert_eq!(r.get(a), None);
        assert_eq!(r.unregister(a), None, "double unregister is a no-op");
        assert_eq!(r.len(), 1);
        assert!(r.contains(b));
    }

    #[test]
    fn stale_ids_do_not_alias_reused_slots() {
        let mut r = Registry::new();
        let a = r.register(1);
        r.unregister(a);
        let b = r.register(2);
        assert_eq!(a.0, b.0, "slot reused");
        assert_ne!(a, b);
        assert_eq!(r.get(a), None);
        assert_eq!(r.get(b), Some(&2));
    }

    #[test]
    fn sweep_is_rate_limited() {
        let mut r = Registry::with_sweep_interval(Duration::from_secs(20));
        let dead = r.register(false);
        let live = r.register(true);

        let removed = r.sweep(Duration::ZERO, |alive| *alive);
        assert_eq!(removed, vec![(dead, false)]);

        let again = r.register(false);
        assert!(r.sweep(Duration::from_secs(19), |alive| *alive).is_empty());
        assert!(r.contains(again));
        assert_eq!(r.sweep(Duration::from_secs(20), |alive| *alive).len(), 1);
        assert_eq!(r.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![live]);
    }

    #[test]
    fn iter_mut_reaches_every_instance() {
        let mut r = Registry::new();
        r.register(1);
        let gone = r.register(2);
        r.register(3);
        r.unregister(gone);
        for (_, v) in r.iter_mut() {
            *v *= 10;
        }
        assert_eq!(r.iter().map(|(_, v)| *v).collect::<Vec<_>>(), vec![10, 30]);
    }
}
