//! Simulation log: the immutable, precomputed dataset that playback replays.
//!
//! The on-disk format is the JSON document written by the upstream exporter
//! (snake_case keys, ECEF positions as `[x, y, z]` arrays). Loading is the only
//! fallible step; once loaded, the log is never mutated.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::TIME_DRIFT_TOLERANCE;
use crate::enums::EntityKind;
use crate::error::LoadError;
use crate::types::Ecef;

/// The complete simulation log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationLog {
    pub metadata: LogMetadata,
    pub satellites: Vec<SatelliteInfo>,
    pub ground_terminals: Vec<GroundTerminalInfo>,
    pub time_steps: Vec<StepSample>,
}

/// Header describing entity counts and the time grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_time: Option<String>,
    pub num_satellites: usize,
    pub num_uavs: usize,
    pub num_ground_terminals: usize,
    #[serde(default)]
    pub num_time_steps: usize,
    pub time_range: TimeRange,
}

/// Time span covered by the log (seconds since simulation start).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
    pub dt: f64,
}

/// A satellite. Its index in `SimulationLog::satellites` joins it to
/// `StepSample::satellite_positions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SatelliteInfo {
    pub id: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_power_dbw: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_gain_db: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_hz: Option<f64>,
}

/// A ground terminal. Position is static for the whole log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundTerminalInfo {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rx_gain_db: Option<f64>,
    pub ecef: Ecef,
}

impl GroundTerminalInfo {
    /// Name for display; falls back to `GT-<id>`.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("GT-{}", self.id),
        }
    }
}

/// One discrete, precomputed instant of the simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepSample {
    pub time: f64,
    pub satellite_positions: Vec<Ecef>,
    /// UAV identity is the array index; the log carries no UAV ids.
    pub uav_positions: Vec<Ecef>,
    pub avg_sinr: f64,
    pub jammed_rate: f64,
    pub jammed_count: u32,
    pub ground_terminal_results: Vec<TerminalResult>,
}

impl StepSample {
    /// Position of a moving entity at this step, if present.
    pub fn position(&self, kind: EntityKind, index: usize) -> Option<Ecef> {
        match kind {
            EntityKind::Satellite => self.satellite_positions.get(index).copied(),
            EntityKind::Uav => self.uav_positions.get(index).copied(),
        }
    }
}

/// Per-terminal outcome at one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerminalResult {
    pub gt_id: u32,
    pub is_jammed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sinr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_rx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub j_total: Option<f64>,
}

/// Aggregate metrics of one step, a point on the time-series plots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub time: f64,
    pub avg_sinr: f64,
    pub jammed_rate: f64,
}

impl From<&StepSample> for SeriesPoint {
    fn from(sample: &StepSample) -> Self {
        Self {
            time: sample.time,
            avg_sinr: sample.avg_sinr,
            jammed_rate: sample.jammed_rate,
        }
    }
}

/// A consistency problem found in a loaded log. Never fatal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogIssue {
    /// Step the issue was found at, or `None` for header-level issues.
    pub step: Option<usize>,
    pub message: String,
}

impl fmt::Display for LogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.step {
            Some(step) => write!(f, "step {}: {}", step, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl SimulationLog {
    /// Load a log from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, LoadError> {
        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let log = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            steps = log.step_count(),
            satellites = log.satellites.len(),
            uavs = log.metadata.num_uavs,
            terminals = log.ground_terminals.len(),
            "simulation log loaded"
        );
        Ok(log)
    }

    /// Parse a log from a JSON string and validate its time grid.
    ///
    /// Structural problems are fatal. Consistency problems (see
    /// [`SimulationLog::check_consistency`]) are logged and tolerated.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let log: SimulationLog = serde_json::from_str(json)?;
        let dt = log.dt();
        let steps = log.time_steps.len();
        if steps > 1 && !(dt.is_finite() && dt > 0.0) {
            return Err(LoadError::InvalidTimeStep { dt, steps });
        }
        for issue in log.check_consistency() {
            tracing::warn!("simulation log: {}", issue);
        }
        Ok(log)
    }

    /// Number of steps `N`.
    pub fn step_count(&self) -> usize {
        self.time_steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_steps.is_empty()
    }

    /// Seconds between consecutive steps.
    pub fn dt(&self) -> f64 {
        self.metadata.time_range.dt
    }

    /// Time of step 0.
    pub fn start_time(&self) -> f64 {
        self.metadata.time_range.start
    }

    pub fn step(&self, index: usize) -> Option<&StepSample> {
        self.time_steps.get(index)
    }

    /// Number of UAVs declared by the header.
    pub fn uav_count(&self) -> usize {
        self.metadata.num_uavs
    }

    /// Number of ground terminals used for `normal_count`.
    pub fn ground_terminal_count(&self) -> usize {
        self.metadata.num_ground_terminals
    }

    /// Number of tracked entities of a kind.
    pub fn entity_count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Satellite => self.satellites.len(),
            EntityKind::Uav => self.metadata.num_uavs,
        }
    }

    pub fn ground_terminal(&self, id: u32) -> Option<&GroundTerminalInfo> {
        self.ground_terminals.iter().find(|gt| gt.id == id)
    }

    /// Metric history for steps `0..=step`; `step` is clamped to the last step.
    pub fn series_upto(&self, step: usize) -> Vec<SeriesPoint> {
        let end = step.saturating_add(1).min(self.time_steps.len());
        self.time_steps[..end].iter().map(SeriesPoint::from).collect()
    }

    /// Check the log invariants: array lengths, fixed time spacing and
    /// terminal id references.
    pub fn check_consistency(&self) -> Vec<LogIssue> {
        let mut issues = Vec::new();
        let header = |message: String| LogIssue {
            step: None,
            message,
        };

        if self.metadata.num_satellites != self.satellites.len() {
            issues.push(header(format!(
                "header declares {} satellites, log lists {}",
                self.metadata.num_satellites,
                self.satellites.len()
            )));
        }
        if self.metadata.num_ground_terminals != self.ground_terminals.len() {
            issues.push(header(format!(
                "header declares {} ground terminals, log lists {}",
                self.metadata.num_ground_terminals,
                self.ground_terminals.len()
            )));
        }
        if self.metadata.num_time_steps != 0 && self.metadata.num_time_steps != self.step_count() {
            issues.push(header(format!(
                "header declares {} time steps, log contains {}",
                self.metadata.num_time_steps,
                self.step_count()
            )));
        }

        let known_ids: HashSet<u32> = self.ground_terminals.iter().map(|gt| gt.id).collect();
        let dt = self.dt();
        let tolerance = TIME_DRIFT_TOLERANCE * dt.abs().max(1.0);

        for (index, sample) in self.time_steps.iter().enumerate() {
            let mut push = |message: String| {
                issues.push(LogIssue {
                    step: Some(index),
                    message,
                })
            };

            if sample.satellite_positions.len() != self.satellites.len() {
                push(format!(
                    "{} satellite positions for {} satellites",
                    sample.satellite_positions.len(),
                    self.satellites.len()
                ));
            }
            if sample.uav_positions.len() != self.metadata.num_uavs {
                push(format!(
                    "{} UAV positions for {} UAVs",
                    sample.uav_positions.len(),
                    self.metadata.num_uavs
                ));
            }

            let expected = self.start_time() + index as f64 * dt;
            if (sample.time - expected).abs() > tolerance {
                push(format!("time {} but expected {}", sample.time, expected));
            }

            let mut seen = HashSet::new();
            for result in &sample.ground_terminal_results {
                if !known_ids.contains(&result.gt_id) {
                    push(format!("unknown ground terminal id {}", result.gt_id));
                }
                if !seen.insert(result.gt_id) {
                    push(format!("duplicate ground terminal id {}", result.gt_id));
                }
            }
        }

        issues
    }
}
