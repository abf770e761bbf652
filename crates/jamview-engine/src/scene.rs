//! In-memory scene that keeps the latest value of every scene call.
//!
//! Used by the headless player and by tests to observe what a renderer
//! would display.

use std::collections::BTreeMap;

use jamview_core::constants::LINK_COLOR;
use jamview_core::enums::SceneLayer;
use jamview_core::scene::{EntityRef, Scene};
use jamview_core::types::{Ecef, LinkSegment};

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessScene {
    pub positions: BTreeMap<EntityRef, Ecef>,
    pub colors: BTreeMap<EntityRef, u32>,
    pub trails: BTreeMap<EntityRef, Vec<Ecef>>,
    pub links: Vec<LinkSegment>,
    pub link_color: u32,
    pub trails_visible: bool,
    pub links_visible: bool,
}

impl Default for HeadlessScene {
    fn default() -> Self {
        Self {
            positions: BTreeMap::new(),
            colors: BTreeMap::new(),
            trails: BTreeMap::new(),
            links: Vec::new(),
            link_color: LINK_COLOR,
            trails_visible: true,
            links_visible: true,
        }
    }
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self, entity: EntityRef) -> Option<Ecef> {
        self.positions.get(&entity).copied()
    }

    pub fn color(&self, entity: EntityRef) -> Option<u32> {
        self.colors.get(&entity).copied()
    }

    pub fn trail(&self, entity: EntityRef) -> Option<&[Ecef]> {
        self.trails.get(&entity).map(Vec::as_slice)
    }
}

impl Scene for HeadlessScene {
    fn set_position(&mut self, entity: EntityRef, position: Ecef) {
        self.positions.insert(entity, position);
    }

    fn set_color(&mut self, entity: EntityRef, color: u32) {
        self.colors.insert(entity, color);
    }

    fn set_trail(&mut self, entity: EntityRef, points: &[Ecef]) {
        self.trails.insert(entity, points.to_vec());
    }

    fn set_links(&mut self, links: &[LinkSegment], color: u32) {
        self.links = links.to_vec();
        self.link_color = color;
    }

    fn set_visible(&mut self, layer: SceneLayer, visible: bool) {
        match layer {
            SceneLayer::Trails => self.trails_visible = visible,
            SceneLayer::Links => self.links_visible = visible,
        }
    }
}
