//! Interference link derivation.
//!
//! The log records whether a terminal is jammed but not which UAV caused it,
//! so every UAV is linked to every jammed terminal (fan-out). Callers must not
//! read a link as attributing the jamming to that UAV.

use std::collections::HashMap;

use jamview_core::log::{SimulationLog, StepSample};
use jamview_core::types::{Ecef, LinkSegment};

/// Derives link geometry from step samples. Holds the static terminal
/// positions keyed by terminal id.
#[derive(Debug, Clone, Default)]
pub struct LinkDeriver {
    terminals: HashMap<u32, Ecef>,
}

impl LinkDeriver {
    pub fn new(log: &SimulationLog) -> Self {
        Self {
            terminals: log
                .ground_terminals
                .iter()
                .map(|gt| (gt.id, gt.ecef))
                .collect(),
        }
    }

    /// One segment from every UAV to every jammed terminal in `sample`,
    /// ordered by terminal result, then UAV index.
    ///
    /// Results that reference an unknown terminal id are skipped.
    pub fn links_for(&self, sample: &StepSample) -> Vec<LinkSegment> {
        let mut links = Vec::new();
        for result in sample.ground_terminal_results.iter().filter(|r| r.is_jammed) {
            let Some(&to) = self.terminals.get(&result.gt_id) else {
                tracing::debug!(
                    gt_id = result.gt_id,
                    "jammed result for unknown terminal skipped"
                );
                continue;
            };
            links.extend(
                sample
                    .uav_positions
                    .iter()
                    .map(|&from| LinkSegment::new(from, to)),
            );
        }
        links
    }
}
