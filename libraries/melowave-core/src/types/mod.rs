/// Domain types for Melowave
mod list_key;
mod track;

pub use list_key::ListKey;
pub use track::TrackDescriptor;
