use std::time::Duration;

use festoon_core::surface::DrawOp;
use festoon_core::{Engine, EngineConfig, LoopState, ParticleKind, Recorder, Viewport};
use glam::Vec2;

fn seeded(seed: u64) -> Engine {
    Engine::new(EngineConfig {
        seed: Some(seed),
        ..EngineConfig::default()
    })
}

fn frame_time(frame: u64) -> Duration {
    Duration::from_micros(frame * 16_667)
}

#[test]
fn opened_card_runs_to_completion_and_goes_idle() {
    let mut engine = seeded(11);
    let mut surface = Recorder::new(Viewport::new(1024.0, 768.0));
    assert!(engine.open(Vec2::new(512.0, 384.0), Duration::ZERO));

    let mut saw_tree = false;
    let mut saw_star = false;
    let mut frame = 0;
    while engine.needs_frames() {
        frame += 1;
        assert!(frame < 5_000, "engine never settled");
        engine.frame(frame_time(frame), &mut surface);
        saw_tree |= engine
            .particles()
            .iter()
            .any(|p| p.kind() == ParticleKind::FallingTree);
        saw_star |= engine
            .particles()
            .iter()
            .any(|p| p.kind() == ParticleKind::FallingStar);
        surface.take_ops();
    }

    assert!(saw_tree && saw_star);
    assert!(engine.particles().is_empty());
    assert!(engine.falling_run().is_none());
    assert!(!engine.is_running());
    // The last tree can spawn just before 11 s and lives at most 700 frames.
    assert!(frame_time(frame) < Duration::from_millis(11_000 + 700 * 17 + 1_000));
}

#[test]
fn intense_phase_is_denser_than_the_tail() {
    let mut engine = seeded(12);
    let viewport = Viewport::new(800.0, 600.0);
    engine.start_falling(Duration::ZERO, Duration::from_millis(6_000));

    let spawned_in = |from: u64, to: u64, engine: &mut Engine| {
        let before = engine.particles().len();
        for ms in (from..to).step_by(10) {
            engine.advance(Duration::from_millis(ms), viewport);
        }
        engine.particles().len() - before
    };
    let intense = spawned_in(0, 2_800, &mut engine);
    let tail = spawned_in(2_800, 5_600, &mut engine);
    assert!(intense > 2 * tail, "intense {intense} vs tail {tail}");
}

#[test]
fn replay_after_idle_wakes_the_loop_again() {
    let mut engine = seeded(13);
    let mut surface = Recorder::new(Viewport::new(640.0, 480.0));
    engine.add_burst(Vec2::new(320.0, 240.0), 3);
    while engine.step(&mut surface).state == LoopState::Running {}
    assert!(!engine.is_running());

    engine.replay(Vec2::new(320.0, 240.0), Duration::from_secs(30));
    assert!(engine.is_running());
    let report = engine.step(&mut surface);
    assert_eq!(report.rendered, 650);
    let polygons = surface
        .fills()
        .filter(|op| matches!(op, DrawOp::Polygon { .. }))
        .count();
    assert_eq!(polygons, 650);
}
