//! Track registry - ordered navigation view over rendered items
//!
//! Rebuilt wholesale from the live view (never patched) by scanning a fixed
//! list of containers in priority order. The resulting sequence is the only
//! source of truth for next/previous.

use crate::view::TrackView;

/// Ordered collection of navigable item handles
#[derive(Debug, Clone)]
pub struct TrackRegistry<H> {
    /// Containers scanned on rebuild, highest priority first
    containers: Vec<String>,

    /// Handles in navigation order, unique by node identity
    handles: Vec<H>,
}

impl<H: Clone + PartialEq> TrackRegistry<H> {
    /// Create an empty registry scanning `containers` in the given order
    pub fn new<I, C>(containers: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        Self {
            containers: containers.into_iter().map(Into::into).collect(),
            handles: Vec::new(),
        }
    }

    /// Replace the sequence with the view's current items
    ///
    /// Must be called after any structural change to the view; the registry
    /// never refreshes itself. A node matched by more than one container is
    /// kept once, at its first position. Distinct nodes showing the same
    /// source are all kept.
    pub fn rebuild<V>(&mut self, view: &V)
    where
        V: TrackView<Handle = H>,
    {
        let mut handles: Vec<H> = Vec::new();
        for container in &self.containers {
            for handle in view.items(container) {
                if !handles.contains(&handle) {
                    handles.push(handle);
                }
            }
        }

        tracing::debug!(
            before = self.handles.len(),
            after = handles.len(),
            "Track registry rebuilt"
        );
        self.handles = handles;
    }

    /// Position of a handle, `None` if absent
    pub fn index_of(&self, handle: &H) -> Option<usize> {
        self.handles.iter().position(|h| h == handle)
    }

    /// Resolve a possibly out-of-range position with wrap-around
    ///
    /// Below zero maps to the last item, at or past the end maps to the
    /// first. `None` only for an empty registry.
    pub fn wrap(&self, index: isize) -> Option<usize> {
        if self.handles.is_empty() {
            return None;
        }
        let len = self.handles.len();
        if index < 0 {
            Some(len - 1)
        } else if index as usize >= len {
            Some(0)
        } else {
            Some(index as usize)
        }
    }

    /// Handle at a position, with the wrap-around of [`Self::wrap`]
    pub fn at(&self, index: isize) -> Option<&H> {
        self.wrap(index).map(|i| &self.handles[i])
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Handles in navigation order
    pub fn handles(&self) -> &[H] {
        &self.handles
    }

    /// Containers in scan order
    pub fn containers(&self) -> &[String] {
        &self.containers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use melowave_core::TrackDescriptor;
    use std::collections::HashMap;

    /// Containers mapping to item ids; item id doubles as source
    struct MapView(HashMap<&'static str, Vec<u32>>);

    impl TrackView for MapView {
        type Handle = u32;

        fn items(&self, container: &str) -> Vec<u32> {
            self.0.get(container).cloned().unwrap_or_default()
        }

        fn describe(&self, handle: &u32) -> melowave_core::Result<TrackDescriptor> {
            Ok(TrackDescriptor::new(handle.to_string()))
        }
    }

    fn view(entries: &[(&'static str, Vec<u32>)]) -> MapView {
        MapView(entries.iter().cloned().collect())
    }

    #[test]
    fn rebuild_follows_container_priority() {
        let v = view(&[("popular", vec![7, 8]), ("recentList", vec![1, 2]), ("savedList", vec![3])]);
        let mut registry = TrackRegistry::new(["recentList", "savedList", "popular"]);
        registry.rebuild(&v);

        assert_eq!(registry.handles(), &[1, 2, 3, 7, 8]);
    }

    #[test]
    fn rebuild_replaces_previous_contents() {
        let mut registry = TrackRegistry::new(["a"]);
        registry.rebuild(&view(&[("a", vec![1, 2, 3])]));
        registry.rebuild(&view(&[("a", vec![9])]));

        assert_eq!(registry.handles(), &[9]);
    }

    #[test]
    fn rebuild_drops_repeated_nodes() {
        let mut registry = TrackRegistry::new(["a", "b"]);
        registry.rebuild(&view(&[("a", vec![1, 2]), ("b", vec![2, 3])]));

        assert_eq!(registry.handles(), &[1, 2, 3]);
    }

    #[test]
    fn unknown_containers_contribute_nothing() {
        let mut registry = TrackRegistry::new(["missing", "a"]);
        registry.rebuild(&view(&[("a", vec![4])]));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn index_of_finds_position() {
        let mut registry = TrackRegistry::new(["a"]);
        registry.rebuild(&view(&[("a", vec![10, 20, 30])]));

        assert_eq!(registry.index_of(&20), Some(1));
        assert_eq!(registry.index_of(&99), None);
    }

    #[test]
    fn at_wraps_both_ends() {
        let mut registry = TrackRegistry::new(["a"]);
        registry.rebuild(&view(&[("a", vec![10, 20, 30])]));

        assert_eq!(registry.at(3), registry.at(0));
        assert_eq!(registry.at(-1), registry.at(2));
        assert_eq!(registry.at(-7), Some(&30));
        assert_eq!(registry.at(100), Some(&10));
        assert_eq!(registry.at(1), Some(&20));
    }

    #[test]
    fn empty_registry_resolves_nothing() {
        let registry: TrackRegistry<u32> = TrackRegistry::new(["a"]);
        assert!(registry.is_empty());
        assert_eq!(registry.wrap(0), None);
        assert_eq!(registry.at(-1), None);
    }
}
