//! Tests for the playback controller, synchronizer and their properties.

use std::time::Duration;

use glam::DVec3;
use proptest::prelude::*;

use jamview_core::commands::PlaybackCommand;
use jamview_core::constants::{JAMMED_COLOR, LINK_COLOR, NORMAL_COLOR};
use jamview_core::enums::EntityKind;
use jamview_core::log::{
    GroundTerminalInfo, SatelliteInfo, SimulationLog, StepSample, TerminalResult,
};
use jamview_core::scene::EntityRef;

use crate::clock::advance_steps;
use crate::config::PlaybackConfig;
use crate::controller::PlaybackController;
use crate::links::LinkDeriver;
use crate::scene::HeadlessScene;
use crate::trail::trail_for;

// ---- Fixtures ----

/// A log with moving satellites and UAVs. Terminal `k` is jammed at step `i`
/// when `(i + k) % 3 == 0`.
fn build_log(
    steps: usize,
    satellites: usize,
    uavs: usize,
    terminals: usize,
    dt: f64,
) -> SimulationLog {
    let mut log = SimulationLog::default();
    log.metadata.num_satellites = satellites;
    log.metadata.num_uavs = uavs;
    log.metadata.num_ground_terminals = terminals;
    log.metadata.num_time_steps = steps;
    log.metadata.time_range.dt = dt;
    log.metadata.time_range.end = steps.saturating_sub(1) as f64 * dt;

    log.satellites = (0..satellites)
        .map(|i| SatelliteInfo {
            id: i as u32 + 1,
            name: format!("SAT-{}", i + 1),
            ..Default::default()
        })
        .collect();
    log.ground_terminals = (0..terminals)
        .map(|k| GroundTerminalInfo {
            id: k as u32 + 1,
            ecef: DVec3::new(6_371_000.0, k as f64 * 1000.0, 0.0),
            ..Default::default()
        })
        .collect();

    for i in 0..steps {
        let t = i as f64;
        let results: Vec<TerminalResult> = (0..terminals)
            .map(|k| TerminalResult {
                gt_id: k as u32 + 1,
                is_jammed: (i + k) % 3 == 0,
                sinr: Some(-t),
                ..Default::default()
            })
            .collect();
        let jammed = results.iter().filter(|r| r.is_jammed).count() as u32;
        log.time_steps.push(StepSample {
            time: t * dt,
            satellite_positions: (0..satellites)
                .map(|s| DVec3::new(7_000_000.0, t * 100.0, s as f64 * 10.0))
                .collect(),
            uav_positions: (0..uavs)
                .map(|u| DVec3::new(6_391_000.0, u as f64 * 500.0, t))
                .collect(),
            avg_sinr: -t,
            jammed_rate: if terminals > 0 {
                jammed as f64 / terminals as f64
            } else {
                0.0
            },
            jammed_count: jammed,
            ground_terminal_results: results,
        });
    }
    log
}

fn controller(log: SimulationLog) -> PlaybackController<HeadlessScene> {
    PlaybackController::new(log, PlaybackConfig::default(), HeadlessScene::new())
}

fn controller_with(
    log: SimulationLog,
    config: PlaybackConfig,
) -> PlaybackController<HeadlessScene> {
    PlaybackController::new(log, config, HeadlessScene::new())
}

/// Scenario log: 3 steps, dt=10, one satellite, no UAVs, one terminal jammed
/// only at step 2.
fn scenario_a_log() -> SimulationLog {
    let mut log = build_log(3, 1, 0, 1, 10.0);
    for (i, sample) in log.time_steps.iter_mut().enumerate() {
        let jammed = i == 2;
        sample.ground_terminal_results[0].is_jammed = jammed;
        sample.jammed_count = jammed as u32;
        sample.jammed_rate = if jammed { 1.0 / 3.0 } else { 0.0 };
    }
    log
}

// ---- Construction ----

#[test]
fn test_new_syncs_first_step() {
    let ctrl = controller(build_log(5, 2, 3, 2, 60.0));
    let snap = ctrl.snapshot().unwrap();
    assert_eq!(snap.step, 0);
    assert_eq!(snap.step_count, 5);
    assert!(!snap.is_playing);
    assert_eq!(ctrl.sync_count(), 1);

    let scene = ctrl.scene();
    assert_eq!(
        scene.position(EntityRef::Satellite(1)),
        Some(DVec3::new(7_000_000.0, 0.0, 10.0))
    );
    assert_eq!(
        scene.position(EntityRef::GroundTerminal(2)),
        Some(DVec3::new(6_371_000.0, 1000.0, 0.0))
    );
}

#[test]
fn test_invalid_config_falls_back_to_defaults() {
    let config = PlaybackConfig {
        min_speed: 3.0,
        max_speed: 2.0,
        ..Default::default()
    };
    let mut ctrl = controller_with(build_log(5, 1, 1, 1, 1.0), config);
    assert_eq!(ctrl.config().min_speed, 0.1);
    assert_eq!(ctrl.config().max_speed, 5.0);
    ctrl.set_speed(10.0);
    assert_eq!(ctrl.state().speed_multiplier, 5.0);

    let config = PlaybackConfig {
        initial_speed: f64::NAN,
        carry_fraction: false,
        ..Default::default()
    };
    let mut ctrl = controller_with(build_log(10, 1, 1, 1, 1.0), config);
    assert_eq!(ctrl.state().speed_multiplier, 1.0);
    ctrl.play();
    assert_eq!(ctrl.frame(Duration::from_secs(3)).unwrap().step, 3);
}

#[test]
fn test_empty_log_is_noop() {
    let mut ctrl = controller(SimulationLog::default());
    assert!(ctrl.snapshot().is_none());

    ctrl.play();
    ctrl.seek(10);
    ctrl.set_speed(3.0);
    ctrl.toggle_links(false);
    ctrl.toggle_trails(false);
    ctrl.reset();
    assert!(ctrl.frame(Duration::from_secs(5)).is_none());

    assert_eq!(ctrl.sync_count(), 0);
    assert!(!ctrl.state().is_playing);
    assert_eq!(ctrl.state().speed_multiplier, 1.0);
    assert!(ctrl.state().show_links);
    assert_eq!(*ctrl.scene(), HeadlessScene::new());
}

// ---- Scenarios ----

#[test]
fn test_scenario_a_jammed_counts() {
    let mut ctrl = controller(scenario_a_log());

    ctrl.seek(0);
    assert_eq!(ctrl.snapshot().unwrap().jammed_count, 0);
    assert_eq!(ctrl.snapshot().unwrap().normal_count, 1);
    assert_eq!(ctrl.scene().color(EntityRef::GroundTerminal(1)), Some(NORMAL_COLOR));

    ctrl.seek(1);
    assert_eq!(ctrl.snapshot().unwrap().jammed_count, 0);
    assert_eq!(ctrl.snapshot().unwrap().time, 10.0);

    ctrl.seek(2);
    let snap = ctrl.snapshot().unwrap();
    assert_eq!(snap.jammed_count, 1);
    assert_eq!(snap.normal_count, 0);
    assert!((snap.jammed_rate - 0.333).abs() < 1e-3);
    assert_eq!(snap.time, 20.0);
    assert_eq!(ctrl.scene().color(EntityRef::GroundTerminal(1)), Some(JAMMED_COLOR));
    // No UAVs, so no links even with a jammed terminal.
    assert!(ctrl.scene().links.is_empty());
}

#[test]
fn test_scenario_b_sub_step_frames() {
    // 0.4 s at 2x with dt=1 is 0.8 steps per frame.
    assert_eq!(advance_steps(0.4, 2.0, 1.0), 0);

    let config = PlaybackConfig {
        carry_fraction: false,
        ..Default::default()
    };
    let mut ctrl = controller_with(build_log(10, 1, 1, 1, 1.0), config);
    ctrl.set_speed(2.0);
    ctrl.play();
    ctrl.frame(Duration::from_millis(400));
    ctrl.frame(Duration::from_millis(400));
    assert_eq!(ctrl.state().current_step, 0, "without carry sub-step frames never advance");

    let mut ctrl = controller(build_log(10, 1, 1, 1, 1.0));
    ctrl.set_speed(2.0);
    ctrl.play();
    assert!(ctrl.frame(Duration::from_millis(400)).is_none());
    let snap = ctrl.frame(Duration::from_millis(400)).unwrap();
    assert_eq!(snap.step, 1);
    assert!((ctrl.clock_carry() - 0.6).abs() < 1e-6);
}

#[test]
fn test_scenario_c_trail_toggle_round_trip() {
    let mut ctrl = controller(build_log(80, 2, 2, 1, 1.0));
    ctrl.seek(63);
    let before = ctrl.scene().trails.clone();
    assert_eq!(before[&EntityRef::Uav(1)].len(), 50);

    ctrl.toggle_trails(false);
    assert!(!ctrl.scene().trails_visible);
    // Hidden, not deleted.
    assert_eq!(ctrl.scene().trails, before);

    ctrl.toggle_trails(true);
    assert!(ctrl.scene().trails_visible);
    assert_eq!(ctrl.scene().trails, before);
}

#[test]
fn test_hidden_trails_go_stale_then_recompute() {
    let mut ctrl = controller(build_log(30, 1, 1, 1, 1.0));
    ctrl.seek(5);
    ctrl.toggle_trails(false);
    ctrl.seek(20);
    // Still the step-5 trail while hidden.
    assert_eq!(ctrl.scene().trail(EntityRef::Satellite(0)).unwrap().len(), 6);

    ctrl.toggle_trails(true);
    let expected = trail_for(ctrl.log(), 50, EntityKind::Satellite, 0, 20);
    assert_eq!(ctrl.scene().trail(EntityRef::Satellite(0)).unwrap(), expected.as_slice());
}

// ---- Controller transitions ----

#[test]
fn test_seek_clamps() {
    let mut ctrl = controller(build_log(10, 1, 1, 1, 60.0));
    ctrl.seek(-5);
    assert_eq!(ctrl.state().current_step, 0);
    let low = ctrl.scene().clone();

    ctrl.seek(110);
    assert_eq!(ctrl.state().current_step, 9);
    let high = ctrl.scene().clone();

    ctrl.seek(0);
    assert_eq!(*ctrl.scene(), low);
    ctrl.seek(9);
    assert_eq!(*ctrl.scene(), high);
}

#[test]
fn test_seek_always_syncs_and_keeps_play_state() {
    let mut ctrl = controller(build_log(10, 1, 1, 1, 60.0));
    ctrl.play();
    let before = ctrl.sync_count();
    ctrl.seek(4);
    ctrl.seek(4);
    assert_eq!(ctrl.sync_count(), before + 2);
    assert!(ctrl.state().is_playing);
}

#[test]
fn test_play_pause_idempotent() {
    let mut ctrl = controller(build_log(4, 1, 1, 1, 1.0));
    ctrl.play();
    ctrl.play();
    assert!(ctrl.state().is_playing);
    assert!(ctrl.snapshot().unwrap().is_playing);
    ctrl.pause();
    ctrl.pause();
    assert!(!ctrl.state().is_playing);
    assert!(!ctrl.snapshot().unwrap().is_playing);
}

#[test]
fn test_reset() {
    let mut ctrl = controller(build_log(10, 1, 1, 1, 1.0));
    ctrl.seek(7);
    ctrl.play();
    ctrl.reset();
    assert_eq!(ctrl.state().current_step, 0);
    assert!(!ctrl.state().is_playing);
    assert_eq!(ctrl.snapshot().unwrap().step, 0);
}

#[test]
fn test_set_speed_clamps() {
    let mut ctrl = controller(build_log(4, 1, 1, 1, 1.0));
    ctrl.set_speed(0.0);
    assert_eq!(ctrl.state().speed_multiplier, 0.1);
    ctrl.set_speed(-3.0);
    assert_eq!(ctrl.state().speed_multiplier, 0.1);
    ctrl.set_speed(100.0);
    assert_eq!(ctrl.state().speed_multiplier, 5.0);
    ctrl.set_speed(f64::INFINITY);
    assert_eq!(ctrl.state().speed_multiplier, 5.0);
    ctrl.set_speed(2.5);
    assert_eq!(ctrl.state().speed_multiplier, 2.5);
    ctrl.set_speed(f64::NAN);
    assert_eq!(ctrl.state().speed_multiplier, 2.5);
    assert_eq!(ctrl.snapshot().unwrap().speed_multiplier, 2.5);
}

#[test]
fn test_toggle_links() {
    let mut ctrl = controller(build_log(6, 1, 3, 2, 1.0));
    // Step 0: terminal 1 jammed ((0 + 0) % 3 == 0), terminal 2 not.
    assert_eq!(ctrl.scene().links.len(), 3);
    assert_eq!(ctrl.snapshot().unwrap().link_count, 3);
    assert_eq!(ctrl.scene().link_color, LINK_COLOR);

    ctrl.toggle_links(false);
    assert!(ctrl.scene().links.is_empty());
    assert!(!ctrl.scene().links_visible);
    assert_eq!(ctrl.snapshot().unwrap().link_count, 0);

    ctrl.toggle_links(true);
    assert_eq!(ctrl.scene().links.len(), 3);
    assert!(ctrl.scene().links_visible);
}

#[test]
fn test_links_point_at_jammed_terminals() {
    let mut ctrl = controller(build_log(6, 1, 2, 3, 1.0));
    ctrl.seek(1);
    // Step 1: terminal k jammed when (1 + k) % 3 == 0, i.e. k = 2 (id 3).
    let target = ctrl.log().ground_terminal(3).unwrap().ecef;
    let links = &ctrl.scene().links;
    assert_eq!(links.len(), 2);
    assert!(links.iter().all(|l| l.to == target));
    assert_eq!(links[0].from, ctrl.log().time_steps[1].uav_positions[0]);
    assert_eq!(links[1].from, ctrl.log().time_steps[1].uav_positions[1]);
}

#[test]
fn test_config_flags_apply_at_start() {
    let config = PlaybackConfig {
        show_links: false,
        show_trails: false,
        initial_speed: 9.0,
        ..Default::default()
    };
    let ctrl = controller_with(build_log(5, 1, 2, 1, 1.0), config);
    assert!(ctrl.scene().links.is_empty());
    assert!(ctrl.scene().trails.is_empty());
    assert!(!ctrl.scene().trails_visible);
    assert_eq!(ctrl.state().speed_multiplier, 5.0);
}

// ---- Frames ----

#[test]
fn test_frame_does_nothing_while_paused() {
    let mut ctrl = controller(build_log(10, 1, 1, 1, 1.0));
    assert!(ctrl.frame(Duration::from_secs(3)).is_none());
    assert_eq!(ctrl.state().current_step, 0);
}

#[test]
fn test_frame_advances_and_wraps() {
    let config = PlaybackConfig {
        carry_fraction: false,
        ..Default::default()
    };
    let mut ctrl = controller_with(build_log(5, 1, 1, 1, 2.0), config);
    ctrl.play();
    assert_eq!(ctrl.frame(Duration::from_secs(4)).unwrap().step, 2);
    assert_eq!(ctrl.frame(Duration::from_secs(4)).unwrap().step, 4);
    // (4 + 2) mod 5
    assert_eq!(ctrl.frame(Duration::from_secs(4)).unwrap().step, 1);
    assert!(ctrl.state().is_playing);
}

#[test]
fn test_huge_frame_wraps_without_overflow() {
    let mut ctrl = controller(build_log(10, 1, 1, 1, 1.0));
    ctrl.seek(5);
    ctrl.set_speed(5.0);
    ctrl.play();
    let snap = ctrl.frame(Duration::from_secs(u64::MAX)).unwrap();
    // The step count saturates at u64::MAX, and u64::MAX % 10 == 5.
    assert_eq!(snap.step, 0);
    assert!(ctrl.state().is_playing);
}

#[test]
fn test_queued_commands_apply_before_advance() {
    let config = PlaybackConfig {
        carry_fraction: false,
        ..Default::default()
    };
    let mut ctrl = controller_with(build_log(20, 1, 1, 1, 1.0), config);
    ctrl.queue_commands([
        PlaybackCommand::Seek { step: 10 },
        PlaybackCommand::SetSpeed { speed: 2.0 },
        PlaybackCommand::Play,
    ]);
    assert_eq!(ctrl.state().current_step, 0, "queued commands wait for the frame");

    let snap = ctrl.frame(Duration::from_secs(1)).unwrap();
    // Seek to 10, then 1 s at 2x with dt=1.
    assert_eq!(snap.step, 12);
    assert_eq!(snap.speed_multiplier, 2.0);

    // Pause lands at the next frame boundary; that frame does not advance.
    ctrl.queue_command(PlaybackCommand::Pause);
    assert!(ctrl.frame(Duration::from_secs(1)).is_none());
    assert_eq!(ctrl.state().current_step, 12);
}

#[test]
fn test_apply_returns_snapshot() {
    let mut ctrl = controller(build_log(5, 1, 1, 1, 1.0));
    let snap = ctrl.apply(PlaybackCommand::Seek { step: 3 }).unwrap();
    assert_eq!(snap.step, 3);
    let snap = ctrl.apply(PlaybackCommand::Play).unwrap();
    assert!(snap.is_playing);
}

#[test]
fn test_inconsistent_log_still_renders() {
    let mut log = build_log(4, 2, 2, 2, 1.0);
    log.time_steps[2].uav_positions.truncate(1);
    log.time_steps[2].satellite_positions.clear();
    log.time_steps[2].ground_terminal_results.push(TerminalResult {
        gt_id: 99,
        is_jammed: true,
        ..Default::default()
    });
    let mut ctrl = controller(log);
    ctrl.seek(1);
    let sat_before = ctrl.scene().position(EntityRef::Satellite(0));

    let snap = ctrl.apply(PlaybackCommand::Seek { step: 2 }).unwrap();
    assert_eq!(snap.step, 2);
    // Missing satellite positions leave the previous placement in place.
    assert_eq!(ctrl.scene().position(EntityRef::Satellite(0)), sat_before);
    assert_eq!(
        ctrl.scene().position(EntityRef::Uav(0)),
        Some(ctrl.log().time_steps[2].uav_positions[0])
    );
    assert!(ctrl.scene().color(EntityRef::GroundTerminal(99)).is_none());
}

#[test]
fn test_missing_terminal_result_shows_normal() {
    // Terminal 2 is jammed at step 2; its result is missing at step 3.
    let mut log = build_log(6, 1, 1, 2, 1.0);
    log.time_steps[3].ground_terminal_results.retain(|r| r.gt_id != 2);

    let mut ctrl = controller(log.clone());
    ctrl.seek(2);
    assert_eq!(ctrl.scene().color(EntityRef::GroundTerminal(2)), Some(JAMMED_COLOR));
    ctrl.seek(3);
    assert_eq!(ctrl.scene().color(EntityRef::GroundTerminal(2)), Some(NORMAL_COLOR));

    let mut direct = controller(log);
    direct.seek(3);
    assert_eq!(direct.scene(), ctrl.scene());
}

#[test]
fn test_snapshot_carries_terminal_readings() {
    let mut log = build_log(4, 1, 1, 2, 1.0);
    log.time_steps[2].ground_terminal_results.push(TerminalResult {
        gt_id: 99,
        is_jammed: true,
        ..Default::default()
    });
    let mut ctrl = controller(log);
    let snap = ctrl.apply(PlaybackCommand::Seek { step: 2 }).unwrap();
    // Unknown terminal 99 is left out.
    assert_eq!(snap.terminals.len(), 2);
    assert_eq!(snap.terminals[0].gt_id, 1);
    assert!(!snap.terminals[0].is_jammed);
    assert_eq!(snap.terminals[0].sinr, Some(-2.0));
    assert_eq!(snap.terminals[1].gt_id, 2);
    assert!(snap.terminals[1].is_jammed);
}

#[test]
fn test_series_follows_current_step() {
    let mut ctrl = controller(build_log(8, 1, 1, 3, 1.0));
    assert_eq!(ctrl.series().len(), 1);
    ctrl.seek(5);
    let series = ctrl.series();
    assert_eq!(series.len(), 6);
    assert_eq!(series[5].time, 5.0);
    assert_eq!(series[5].avg_sinr, -5.0);
    assert_eq!(series[5].jammed_rate, ctrl.snapshot().unwrap().jammed_rate);
    ctrl.seek(100);
    assert_eq!(ctrl.series().len(), 8);
}

// ---- Properties ----

proptest! {
    #[test]
    fn prop_seek_clamps(n in 1usize..40, step in -1000i64..1000) {
        let mut ctrl = controller(build_log(n, 1, 1, 1, 1.0));
        ctrl.seek(step);
        let expected = step.clamp(0, n as i64 - 1) as usize;
        prop_assert_eq!(ctrl.state().current_step, expected);
        prop_assert_eq!(ctrl.snapshot().unwrap().step, expected);
    }

    #[test]
    fn prop_sync_idempotent(
        n in 1usize..60,
        k in 0usize..60,
        links in any::<bool>(),
        trails in any::<bool>(),
    ) {
        let k = k % n;
        let mut ctrl = controller(build_log(n, 2, 3, 4, 1.0));
        ctrl.toggle_links(links);
        ctrl.toggle_trails(trails);
        ctrl.seek(k as i64);
        let scene = ctrl.scene().clone();
        let snap = ctrl.snapshot().cloned();
        ctrl.seek(k as i64);
        prop_assert_eq!(ctrl.scene(), &scene);
        prop_assert_eq!(ctrl.snapshot().cloned(), snap);
    }

    #[test]
    fn prop_trail_window_bound(n in 1usize..120, w in 1usize..70, step in 0usize..120) {
        let log = build_log(n, 1, 1, 0, 1.0);
        let step = step % n;
        let trail = trail_for(&log, w, EntityKind::Uav, 0, step);
        prop_assert!(trail.len() <= w);
        prop_assert_eq!(trail.len(), w.min(step + 1));
        prop_assert_eq!(trail.last().copied(), Some(log.time_steps[step].uav_positions[0]));
    }

    #[test]
    fn prop_link_fan_out(uavs in 0usize..8, terminals in 0usize..8, step in 0usize..6) {
        let log = build_log(6, 1, uavs, terminals, 1.0);
        let sample = &log.time_steps[step];
        let jammed: Vec<u32> = sample
            .ground_terminal_results
            .iter()
            .filter(|r| r.is_jammed)
            .map(|r| r.gt_id)
            .collect();
        let links = LinkDeriver::new(&log).links_for(sample);
        prop_assert_eq!(links.len(), jammed.len() * uavs);
        for (i, link) in links.iter().enumerate() {
            let gt = log.ground_terminal(jammed[i / uavs]).unwrap();
            prop_assert_eq!(link.to, gt.ecef);
        }
    }

    #[test]
    fn prop_autoplay_monotonic(
        n in 2usize..30,
        speed in 0.1f64..5.0,
        frames in proptest::collection::vec(0u64..3000, 1..40),
    ) {
        let mut ctrl = controller(build_log(n, 1, 1, 1, 1.0));
        ctrl.set_speed(speed);
        ctrl.play();
        let mut previous = ctrl.state().current_step;
        for ms in frames {
            if let Some(snap) = ctrl.frame(Duration::from_millis(ms)) {
                let advanced = ((ms as f64 / 1000.0) * speed).ceil() as usize + 1;
                let forward = (snap.step + n - previous) % n;
                prop_assert!(snap.step < n);
                // Either moved forward or wrapped; never skipped more than the frame allows.
                prop_assert!(forward <= advanced, "moved {} steps in a {} ms frame", forward, ms);
                previous = snap.step;
            }
        }
    }
}
