use super::{Point, Rect, Target, TargetId};
use std::collections::{HashMap, VecDeque};

/// Live targets, kept in creation order.
///
/// The creation-order queue and the id-keyed rectangle map always hold the
/// same ids; every method updates both before returning.
#[derive(Debug, Default, Clone)]
pub struct TargetRegistry {
    order: VecDeque<TargetId>,
    rects: HashMap<TargetId, Rect>,
}

impl TargetRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a target as the newest entry.
    ///
    /// An id already present is replaced in place and keeps its position.
    pub fn insert(&mut self, target: Target) {
        if self.rects.insert(target.id, target.bounds).is_none() {
            self.order.push_back(target.id);
        }
        self.debug_check();
    }

    /// Removes and returns the oldest live target.
    pub fn expire_oldest(&mut self) -> Option<Target> {
        let id = self.order.pop_front()?;
        let bounds = self.rects.remove(&id)?;
        self.debug_check();
        Some(Target { id, bounds })
    }

    /// Removes the first target, in creation order, whose bounds contain
    /// `point`. At most one target is removed.
    pub fn remove_hit(&mut self, point: Point) -> Option<Target> {
        let index = self
            .order
            .iter()
            .position(|id| self.rects.get(id).is_some_and(|r| r.contains(point)))?;
        let id = self.order.remove(index)?;
        let bounds = self.rects.remove(&id)?;
        self.debug_check();
        Some(Target { id, bounds })
    }

    /// Looks up a live target by id.
    pub fn get(&self, id: TargetId) -> Option<Target> {
        self.rects.get(&id).map(|bounds| Target { id, bounds: *bounds })
    }

    /// Whether `id` is still live.
    pub fn contains(&self, id: TargetId) -> bool {
        self.rects.contains_key(&id)
    }

    /// Oldest live target.
    pub fn oldest(&self) -> Option<Target> {
        self.order.front().and_then(|id| self.get(*id))
    }

    /// Live targets, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = Target> + '_ {
        self.order.iter().filter_map(|id| self.get(*id))
    }

    /// Live ids, oldest first.
    pub fn ids(&self) -> Vec<TargetId> {
        self.order.iter().copied().collect()
    }

    /// Number of live targets.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no target is live.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn debug_check(&self) {
        debug_assert_eq!(self.order.len(), self.rects.len());
        debug_assert!(self.order.iter().all(|id| self.rects.contains_key(id)));
    }
}
