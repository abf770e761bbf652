//! Scene synchronizer: applies one log step to the scene.
//!
//! `sync` is a pure function of (log, step, flags) as far as the scene is
//! concerned. Every call replaces what it touches, so syncing the same step
//! twice leaves the scene and the snapshot unchanged.

use std::collections::HashSet;

use jamview_core::constants::LINK_COLOR;
use jamview_core::enums::{EntityKind, SceneLayer, TerminalStatus};
use jamview_core::log::SimulationLog;
use jamview_core::scene::{EntityRef, Scene};
use jamview_core::state::{PlaybackState, TerminalReading, UiSnapshot};

use crate::links::LinkDeriver;
use crate::trail::TrailTracker;

/// Owns the trail buffers and link deriver, and is the only writer to the scene.
#[derive(Debug, Clone)]
pub struct SceneSynchronizer {
    trails: TrailTracker,
    links: LinkDeriver,
    terminal_ids: Vec<u32>,
    known_terminals: HashSet<u32>,
}

impl SceneSynchronizer {
    pub fn new(log: &SimulationLog, trail_window: usize) -> Self {
        Self {
            trails: TrailTracker::new(trail_window),
            links: LinkDeriver::new(log),
            terminal_ids: log.ground_terminals.iter().map(|gt| gt.id).collect(),
            known_terminals: log.ground_terminals.iter().map(|gt| gt.id).collect(),
        }
    }

    pub fn trails(&self) -> &TrailTracker {
        &self.trails
    }

    /// Force a full trail recompute on the next sync.
    pub fn invalidate_trails(&mut self) {
        self.trails.invalidate();
    }

    /// Place the static ground terminals and set layer visibility.
    pub fn populate<S: Scene>(&self, log: &SimulationLog, state: &PlaybackState, scene: &mut S) {
        for gt in &log.ground_terminals {
            let entity = EntityRef::GroundTerminal(gt.id);
            scene.set_position(entity, gt.ecef);
            scene.set_color(entity, TerminalStatus::Normal.color());
        }
        scene.set_visible(SceneLayer::Trails, state.show_trails);
        scene.set_visible(SceneLayer::Links, state.show_links);
    }

    /// Apply `state.current_step` to the scene and describe it.
    ///
    /// Returns `None` when the step does not exist in the log.
    pub fn sync<S: Scene>(
        &mut self,
        log: &SimulationLog,
        state: &PlaybackState,
        scene: &mut S,
    ) -> Option<UiSnapshot> {
        let step = state.current_step;
        let sample = log.step(step)?;

        if state.show_trails {
            self.trails.refresh(log, step);
        }

        // Moving entities
        for kind in [EntityKind::Satellite, EntityKind::Uav] {
            for index in 0..log.entity_count(kind) {
                let entity = EntityRef::moving(kind, index);
                match sample.position(kind, index) {
                    Some(position) => scene.set_position(entity, position),
                    None => tracing::debug!(step, ?entity, "no position at step, skipped"),
                }
                if state.show_trails {
                    scene.set_trail(entity, &self.trails.trail(kind, index));
                }
            }
        }
        scene.set_visible(SceneLayer::Trails, state.show_trails);

        // Terminal indicators. Terminals without a result at this step show
        // as normal.
        let mut jammed_terminals = HashSet::new();
        let mut terminals = Vec::with_capacity(sample.ground_terminal_results.len());
        for result in &sample.ground_terminal_results {
            if !self.known_terminals.contains(&result.gt_id) {
                tracing::debug!(step, gt_id = result.gt_id, "result for unknown terminal skipped");
                continue;
            }
            if result.is_jammed {
                jammed_terminals.insert(result.gt_id);
            }
            terminals.push(TerminalReading {
                gt_id: result.gt_id,
                is_jammed: result.is_jammed,
                sinr: result.sinr,
            });
        }
        for &id in &self.terminal_ids {
            let status = TerminalStatus::from_jammed(jammed_terminals.contains(&id));
            scene.set_color(EntityRef::GroundTerminal(id), status.color());
        }

        // Interference links
        let link_count = if state.show_links {
            let links = self.links.links_for(sample);
            scene.set_links(&links, LINK_COLOR);
            links.len()
        } else {
            scene.set_links(&[], LINK_COLOR);
            0
        };
        scene.set_visible(SceneLayer::Links, state.show_links);

        let terminal_count = u32::try_from(log.ground_terminal_count()).unwrap_or(u32::MAX);
        Some(UiSnapshot {
            time: sample.time,
            step,
            step_count: log.step_count(),
            avg_sinr: sample.avg_sinr,
            jammed_rate: sample.jammed_rate,
            jammed_count: sample.jammed_count,
            normal_count: terminal_count.saturating_sub(sample.jammed_count),
            link_count,
            is_playing: state.is_playing,
            speed_multiplier: state.speed_multiplier,
            show_links: state.show_links,
            show_trails: state.show_trails,
            terminals,
        })
    }
}
