//! Tool-owned overlay sublayers.

use portolan_types::Feature;

use crate::style::RenderStyle;

/// Handle of an overlay within a scene.
///
/// Handles are only meaningful for the scene that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(usize);

/// A feature with the styles it is drawn with, ready for a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledFeature {
    /// The feature to draw.
    pub feature: Feature,
    /// Styles to draw it with.
    pub styles: Vec<RenderStyle>,
}

/// A scratch sublayer drawn above all vector layers.
///
/// Each interactive tool owns its overlays outright; the synchronizers never
/// touch them.
pub struct Overlay {
    id: OverlayId,
    name: &'static str,
    items: Vec<StyledFeature>,
    revision: u64,
}

impl Overlay {
    /// Handle of this overlay.
    pub fn id(&self) -> OverlayId {
        self.id
    }

    /// Name of the owning tool, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Drawn items, in draw order.
    pub fn items(&self) -> &[StyledFeature] {
        &self.items
    }

    /// True if nothing is drawn.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Removes all items.
    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            self.items.clear();
            self.revision += 1;
        }
    }

    /// Replaces all items at once.
    pub fn set_items(&mut self, items: Vec<StyledFeature>) {
        self.items = items;
        self.revision += 1;
    }

    /// Adds one item on top.
    pub fn push(&mut self, feature: Feature, styles: Vec<RenderStyle>) {
        self.items.push(StyledFeature { feature, styles });
        self.revision += 1;
    }

    /// Counter of changes a renderer would have to pick up.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// All overlays of a scene, in creation order.
#[derive(Default)]
pub struct OverlayCollection {
    overlays: Vec<Overlay>,
}

impl OverlayCollection {
    /// Creates an overlay and returns its handle.
    pub fn create(&mut self, name: &'static str) -> OverlayId {
        let id = OverlayId(self.overlays.len());
        self.overlays.push(Overlay {
            id,
            name,
            items: Vec::new(),
            revision: 0,
        });
        id
    }

    /// The overlay behind the given handle.
    pub fn get(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.get(id.0)
    }

    /// Mutable access to the overlay behind the given handle.
    pub fn get_mut(&mut self, id: OverlayId) -> Option<&mut Overlay> {
        self.overlays.get_mut(id.0)
    }

    /// Iterates over the overlays in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.iter()
    }
}

#[cfg(test)]
mod tests {
    use portolan_types::{Geometry, Position};

    use super::*;

    #[test]
    fn created_overlays_are_addressable() {
        let mut overlays = OverlayCollection::default();
        let a = overlays.create("first");
        let b = overlays.create("second");

        assert_ne!(a, b);
        assert_eq!(overlays.get(a).map(|o| o.name()), Some("first"));
        assert_eq!(overlays.get(b).map(|o| o.name()), Some("second"));
    }

    #[test]
    fn clear_on_empty_overlay_keeps_revision() {
        let mut overlays = OverlayCollection::default();
        let id = overlays.create("scratch");

        let overlay = overlays.get_mut(id).unwrap();
        overlay.clear();
        assert_eq!(overlay.revision(), 0);

        overlay.push(
            Feature::new(Geometry::Point(Position::new(0.0, 0.0))),
            Vec::new(),
        );
        assert_eq!(overlay.revision(), 1);

        overlay.clear();
        assert_eq!(overlay.revision(), 2);
    }
}
