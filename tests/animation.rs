#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::time::Duration;

use common::{RecordingSink, shown};
use tokio::time::sleep;
use vitrine::animation::Animation;
use vitrine::config::{AnimationSettings, MatrixSettings, NotifySettings, ParticleSettings, Viewport};
use vitrine::notify::NotificationCenter;
use vitrine::particles::{BoundaryPolicy, SpawnRanges};
use vitrine::stage::Stage;

fn stage(frame_interval: Duration) -> Stage {
    let particles = ParticleSettings {
        count: 20,
        policy: BoundaryPolicy::Bounce,
        seed: Some(11),
        ranges: SpawnRanges::default(),
    };
    let animation = AnimationSettings {
        frame_interval,
        fps_floor: 30,
        matrix: MatrixSettings::default(),
        trail_length: 10,
    };
    Stage::new(Viewport::new(800.0, 600.0), &particles, &animation, 11)
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_frames_until_resume() {
    let interval = Duration::from_millis(16);
    let animation = Animation::spawn(stage(interval), interval, None);

    sleep(Duration::from_millis(500)).await;
    let running = animation.snapshot().await.expect("snapshot").frames;
    assert!(running > 0);

    animation.pause().expect("pause");
    let paused_at = animation.snapshot().await.expect("snapshot").frames;
    sleep(Duration::from_secs(2)).await;
    assert_eq!(animation.snapshot().await.expect("snapshot").frames, paused_at);

    animation.resume().expect("resume");
    sleep(Duration::from_millis(200)).await;
    let resumed = animation.snapshot().await.expect("snapshot");
    assert!(resumed.frames > paused_at);
    assert!(!resumed.reduced, "pause must not read as a slow frame");

    let stage = animation.dispose().await.expect("dispose");
    assert_eq!(stage.snapshot().particles, 20);
}

#[tokio::test(start_paused = true)]
async fn resize_and_pointer_reach_the_stage() {
    let interval = Duration::from_millis(16);
    let animation = Animation::spawn(stage(interval), interval, None);

    animation.resize(Viewport::new(400.0, 300.0)).expect("resize");
    animation.pointer(120.0, 80.0).expect("pointer");
    sleep(Duration::from_millis(100)).await;

    let snapshot = animation.snapshot().await.expect("snapshot");
    assert_eq!(snapshot.viewport, Viewport::new(400.0, 300.0));
    assert_eq!(snapshot.matrix_columns, 20);
    assert!(snapshot.cursor.0 > 0.0 && snapshot.cursor.0 < 120.0);

    let stage = animation.dispose().await.expect("dispose");
    assert!(stage.field().iter().all(|p| stage.field().viewport().contains(p.x, p.y)));
}

#[tokio::test(start_paused = true)]
async fn zero_interval_still_ticks() {
    let animation = Animation::spawn(stage(Duration::ZERO), Duration::ZERO, None);
    sleep(Duration::from_millis(50)).await;
    assert!(animation.snapshot().await.expect("snapshot").frames > 0);
    animation.dispose().await.expect("dispose");
}

#[tokio::test(start_paused = true)]
async fn low_frame_rate_degrades_and_announces_once() {
    let (sink, events) = RecordingSink::new();
    let center = NotificationCenter::spawn(&NotifySettings::default(), sink);
    let interval = Duration::from_millis(100);
    let animation = Animation::spawn(stage(interval), interval, Some(center.notifier()));

    sleep(Duration::from_secs(3)).await;
    let snapshot = animation.snapshot().await.expect("snapshot");
    assert!(snapshot.reduced);
    assert_eq!(snapshot.particles, 20);
    assert_eq!(snapshot.visible_particles, 10);

    animation.dispose().await.expect("dispose");
    let messages: Vec<_> = shown(&events).into_iter().map(|(m, _)| m).collect();
    assert_eq!(messages, ["Performance optimised automatically"]);
    center.shutdown().await;
}
