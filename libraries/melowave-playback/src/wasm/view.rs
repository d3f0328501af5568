//! Rendered track lists as the live view

use crate::TrackView;
use melowave_core::{CoreError, TrackDescriptor};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

/// Track items are `.track` rows and `.card` tiles carrying `data-src`,
/// `data-title`, `data-artist` and `data-cover`
pub struct DomView {
    document: Document,
}

impl DomView {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn select(&self, selector: &str) -> Vec<Element> {
        let Ok(nodes) = self.document.query_selector_all(selector) else {
            tracing::warn!(selector, "Invalid item selector");
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }
}

impl TrackView for DomView {
    type Handle = Element;

    fn items(&self, container: &str) -> Vec<Element> {
        self.select(&format!("#{container} .track, #{container} .card"))
    }

    fn describe(&self, handle: &Element) -> melowave_core::Result<TrackDescriptor> {
        let src = handle.get_attribute("data-src");
        let title = handle.get_attribute("data-title");
        let artist = handle.get_attribute("data-artist");
        let cover = handle.get_attribute("data-cover");

        TrackDescriptor::from_attributes(
            src.as_deref(),
            title.as_deref(),
            artist.as_deref(),
            cover.as_deref(),
        )
        .map_err(|e| match e {
            CoreError::MissingAttribute(_) => CoreError::MissingAttribute("data-src"),
            other => other,
        })
    }
}
