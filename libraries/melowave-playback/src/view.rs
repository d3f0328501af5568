//! Live view port

use melowave_core::TrackDescriptor;

/// Live, queryable view of rendered track items
///
/// Handles are opaque node identities (a DOM element, a list row id).
/// Equality on handles is node identity: two items showing the same source
/// in different lists are different handles.
pub trait TrackView {
    /// Opaque item handle
    type Handle: Clone + PartialEq + std::fmt::Debug;

    /// Items of one container, in display order
    fn items(&self, container: &str) -> Vec<Self::Handle>;

    /// Read the track attributes carried by an item
    fn describe(&self, handle: &Self::Handle) -> melowave_core::Result<TrackDescriptor>;
}
