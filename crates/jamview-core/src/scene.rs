//! The scene capability driven by the synchronizer.
//!
//! A rendering backend implements [`Scene`]; the engine only ever calls these
//! setters and never reads the scene back. Each call replaces the previous
//! value for its target, so repeating a call is harmless.

use serde::{Deserialize, Serialize};

use crate::enums::{EntityKind, SceneLayer};
use crate::types::{Ecef, LinkSegment};

/// Addressable object in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityRef {
    /// Satellite by index into the log's satellite list.
    Satellite(usize),
    /// UAV by array index.
    Uav(usize),
    /// Ground terminal by log id.
    GroundTerminal(u32),
}

impl EntityRef {
    /// Reference to a moving entity.
    pub fn moving(kind: EntityKind, index: usize) -> Self {
        match kind {
            EntityKind::Satellite => Self::Satellite(index),
            EntityKind::Uav => Self::Uav(index),
        }
    }
}

/// Scene-graph mutations the engine needs from a renderer.
pub trait Scene {
    /// Place an entity.
    fn set_position(&mut self, entity: EntityRef, position: Ecef);

    /// Set an entity's indicator color (0xRRGGBB).
    fn set_color(&mut self, entity: EntityRef, color: u32);

    /// Replace an entity's trail polyline.
    fn set_trail(&mut self, entity: EntityRef, points: &[Ecef]);

    /// Replace the whole interference-link geometry set, drawn in `color`
    /// (0xRRGGBB). Empty clears it.
    fn set_links(&mut self, links: &[LinkSegment], color: u32);

    /// Show or hide a layer without touching its geometry.
    fn set_visible(&mut self, layer: SceneLayer, visible: bool);
}

impl<S: Scene + ?Sized> Scene for Box<S> {
    fn set_position(&mut self, entity: EntityRef, position: Ecef) {
        (**self).set_position(entity, position)
    }

    fn set_color(&mut self, entity: EntityRef, color: u32) {
        (**self).set_color(entity, color)
    }

    fn set_trail(&mut self, entity: EntityRef, points: &[Ecef]) {
        (**self).set_trail(entity, points)
    }

    fn set_links(&mut self, links: &[LinkSegment], color: u32) {
        (**self).set_links(links, color)
    }

    fn set_visible(&mut self, layer: SceneLayer, visible: bool) {
        (**self).set_visible(layer, visible)
    }
}
