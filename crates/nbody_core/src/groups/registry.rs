use std::ops::Range;

use tracing::debug;

use crate::groups::{GroupError, GroupHandle};
use crate::spawn::SpawnSpec;

/// A live group: the spec it was realized from and the index range its
/// particles occupy right now.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    handle: GroupHandle,
    start: usize,
    count: usize,
    spec: SpawnSpec,
}

impl Group {
    #[inline]
    pub fn handle(&self) -> GroupHandle {
        self.handle
    }

    /// First particle index of the group.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// One past the last particle index of the group.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.count
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    pub fn spec(&self) -> &SpawnSpec {
        &self.spec
    }
}

/// Ordered registry of live groups.
///
/// Groups partition a prefix of the particle index space with no gaps and
/// no overlaps, in ascending `start` order matching registration order.
pub struct GroupRegistry {
    groups: Vec<Group>,
    next_id: u32,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            next_id: 0,
        }
    }

    /// Record a group that was just appended to the particle store.
    ///
    /// `start` must equal the particle count before the append.
    pub fn register(&mut self, spec: SpawnSpec, start: usize, count: usize) -> GroupHandle {
        debug_assert_eq!(
            start,
            self.total_particles(),
            "group registered out of step with the particle store"
        );

        let handle = GroupHandle::new(self.next_id);
        self.next_id += 1;
        self.groups.push(Group {
            handle,
            start,
            count,
            spec,
        });
        handle
    }

    /// Remove a group and close the gap it leaves.
    ///
    /// Every group that started after the removed one moves down by its
    /// `count`; registration order of the survivors is unchanged.
    pub fn unregister(&mut self, handle: GroupHandle) -> Result<Group, GroupError> {
        let position = self
            .groups
            .iter()
            .position(|group| group.handle == handle)
            .ok_or(GroupError::UnknownGroup { handle })?;

        let removed = self.groups.remove(position);
        let mut shifted = 0usize;
        for group in self.groups.iter_mut().filter(|g| g.start > removed.start) {
            group.start -= removed.count;
            shifted += 1;
        }

        debug!(%handle, shifted, by = removed.count, "group ranges shifted");
        Ok(removed)
    }

    pub fn get(&self, handle: GroupHandle) -> Option<&Group> {
        self.groups.iter().find(|group| group.handle == handle)
    }

    pub fn contains(&self, handle: GroupHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Live groups in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Sum of all live group sizes.
    pub fn total_particles(&self) -> usize {
        self.groups.iter().map(Group::count).sum()
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_counts(registry: &mut GroupRegistry, counts: &[usize]) -> Vec<GroupHandle> {
        counts
            .iter()
            .map(|&count| {
                let start = registry.total_particles();
                registry.register(SpawnSpec::default(), start, count)
            })
            .collect()
    }

    fn assert_partition(registry: &GroupRegistry) {
        let mut expected_start = 0;
        for group in registry.iter() {
            assert_eq!(group.start(), expected_start, "gap or overlap at {}", group.handle());
            expected_start = group.end();
        }
        assert_eq!(expected_start, registry.total_particles());
    }

    #[test]
    fn register_assigns_consecutive_ranges() {
        let mut registry = GroupRegistry::new();
        let handles = register_counts(&mut registry, &[3, 5, 2]);

        let ranges: Vec<_> = handles.iter().map(|h| registry.get(*h).unwrap().range()).collect();
        assert_eq!(ranges, vec![0..3, 3..8, 8..10]);
        assert_partition(&registry);
    }

    #[test]
    fn removing_first_group_shifts_later_groups() {
        let mut registry = GroupRegistry::new();
        let handles = register_counts(&mut registry, &[3, 5, 2]);

        let removed = registry.unregister(handles[0]).unwrap();
        assert_eq!(removed.range(), 0..3);

        let second = registry.get(handles[1]).unwrap();
        let third = registry.get(handles[2]).unwrap();
        assert_eq!((second.start(), second.count()), (0, 5));
        assert_eq!((third.start(), third.count()), (5, 2));
        assert_partition(&registry);
    }

    #[test]
    fn removing_middle_group_leaves_earlier_groups_alone() {
        let mut registry = GroupRegistry::new();
        let handles = register_counts(&mut registry, &[4, 6, 1]);

        registry.unregister(handles[1]).unwrap();
        assert_eq!(registry.get(handles[0]).unwrap().range(), 0..4);
        assert_eq!(registry.get(handles[2]).unwrap().range(), 4..5);
        assert_partition(&registry);
    }

    #[test]
    fn unknown_handle_is_rejected() {
        let mut registry = GroupRegistry::new();
        let handles = register_counts(&mut registry, &[2]);

        registry.unregister(handles[0]).unwrap();
        assert_eq!(
            registry.unregister(handles[0]),
            Err(GroupError::UnknownGroup { handle: handles[0] })
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn handles_are_not_reused() {
        let mut registry = GroupRegistry::new();
        let first = register_counts(&mut registry, &[1])[0];
        registry.unregister(first).unwrap();

        let second = register_counts(&mut registry, &[1])[0];
        assert_ne!(first, second);
        assert!(!registry.contains(first));
    }

    #[test]
    fn partition_survives_interleaved_changes() {
        let mut registry = GroupRegistry::new();
        let mut live = register_counts(&mut registry, &[7, 1, 4, 9, 3]);

        for victim in [2usize, 0, 2] {
            let handle = live.remove(victim);
            registry.unregister(handle).unwrap();
            assert_partition(&registry);

            live.extend(register_counts(&mut registry, &[victim + 2]));
            assert_partition(&registry);
        }

        let order: Vec<_> = registry.iter().map(Group::handle).collect();
        assert_eq!(order, live);
    }
}
