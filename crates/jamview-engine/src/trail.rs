//! Trail history: a bounded window of recent positions per moving entity.
//!
//! Trails are derived from the log, never stored in it. A trail ending at
//! step `k` holds the entity's positions at steps `max(0, k-W+1) ..= k`.

use std::collections::VecDeque;

use jamview_core::enums::EntityKind;
use jamview_core::log::SimulationLog;
use jamview_core::types::Ecef;

/// Positions of one entity over the window ending at `upto_step`.
///
/// Length is `min(window, upto_step + 1)` for a consistent log. Steps where
/// the entity index is missing are skipped. `upto_step` past the end of the
/// log is clamped to the last step.
pub fn trail_for(
    log: &SimulationLog,
    window: usize,
    kind: EntityKind,
    index: usize,
    upto_step: usize,
) -> Vec<Ecef> {
    let Some(last) = log.step_count().checked_sub(1) else {
        return Vec::new();
    };
    let upto = upto_step.min(last);
    let first = (upto + 1).saturating_sub(window);
    log.time_steps[first..=upto]
        .iter()
        .filter_map(|sample| sample.position(kind, index))
        .collect()
}

/// Per-entity trail buffers for every satellite and UAV.
#[derive(Debug, Clone)]
pub struct TrailTracker {
    window: usize,
    satellites: Vec<VecDeque<Ecef>>,
    uavs: Vec<VecDeque<Ecef>>,
    /// Step the buffers currently end at.
    synced_step: Option<usize>,
}

impl TrailTracker {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            satellites: Vec::new(),
            uavs: Vec::new(),
            synced_step: None,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Step the buffers were last refreshed for.
    pub fn synced_step(&self) -> Option<usize> {
        self.synced_step
    }

    /// Bring every buffer up to date for `step`.
    ///
    /// Moving forward by exactly one step slides each window; any other move
    /// rebuilds from the log. Both give the same result as [`trail_for`].
    pub fn refresh(&mut self, log: &SimulationLog, step: usize) {
        let Some(last) = log.step_count().checked_sub(1) else {
            self.satellites.clear();
            self.uavs.clear();
            self.synced_step = None;
            return;
        };
        let step = step.min(last);

        if self.synced_step == Some(step) && self.sized_for(log) {
            return;
        }
        if step > 0 && self.synced_step == Some(step - 1) && self.sized_for(log) {
            self.slide(log, step);
        } else {
            self.rebuild(log, step);
        }
        self.synced_step = Some(step);
    }

    /// Forget the synced step so the next refresh rebuilds from the log.
    pub fn invalidate(&mut self) {
        self.synced_step = None;
    }

    /// Current trail of an entity, oldest first. Empty for unknown indices.
    pub fn trail(&self, kind: EntityKind, index: usize) -> Vec<Ecef> {
        self.buffers(kind)
            .get(index)
            .map(|buffer| buffer.iter().copied().collect())
            .unwrap_or_default()
    }

    fn buffers(&self, kind: EntityKind) -> &[VecDeque<Ecef>] {
        match kind {
            EntityKind::Satellite => &self.satellites,
            EntityKind::Uav => &self.uavs,
        }
    }

    fn sized_for(&self, log: &SimulationLog) -> bool {
        self.satellites.len() == log.entity_count(EntityKind::Satellite)
            && self.uavs.len() == log.entity_count(EntityKind::Uav)
    }

    fn rebuild(&mut self, log: &SimulationLog, step: usize) {
        let window = self.window;
        let build = |kind: EntityKind| -> Vec<VecDeque<Ecef>> {
            (0..log.entity_count(kind))
                .map(|index| trail_for(log, window, kind, index, step).into())
                .collect()
        };
        self.satellites = build(EntityKind::Satellite);
        self.uavs = build(EntityKind::Uav);
        tracing::debug!(step, window, "trail buffers rebuilt");
    }

    fn slide(&mut self, log: &SimulationLog, step: usize) {
        let window = self.window;
        let sample = &log.time_steps[step];
        // Sample leaving the window, if the window was already full.
        let dropped = step.checked_sub(window).map(|i| &log.time_steps[i]);

        for (kind, buffers) in [
            (EntityKind::Satellite, &mut self.satellites),
            (EntityKind::Uav, &mut self.uavs),
        ] {
            for (index, buffer) in buffers.iter_mut().enumerate() {
                if let Some(old) = dropped {
                    if old.position(kind, index).is_some() {
                        buffer.pop_front();
                    }
                }
                if let Some(position) = sample.position(kind, index) {
                    buffer.push_back(position);
                }
            }
        }
    }
}
