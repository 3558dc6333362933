//! Everything redrawn on the display refresh: particles, matrix rain and
//! the custom cursor.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::{AnimationSettings, ParticleSettings, Viewport};
use crate::cursor::{CursorFollower, CursorTrail};
use crate::matrix::MatrixRain;
use crate::particles::ParticleField;
use crate::perf::FpsMeter;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub fps: Option<u32>,
    /// Set on the frame that switched the stage to reduced motion.
    pub degraded: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StageSnapshot {
    pub frames: u64,
    pub particles: usize,
    pub visible_particles: usize,
    pub glyphs: usize,
    pub matrix_columns: usize,
    pub cursor: (f64, f64),
    pub reduced: bool,
    pub viewport: Viewport,
}

pub struct Stage {
    field: ParticleField,
    matrix: MatrixRain,
    cursor: CursorFollower,
    trail: CursorTrail,
    fps: FpsMeter,
    fps_floor: u32,
    frame_interval: Duration,
    last_frame: Option<Instant>,
    frames: u64,
}

impl Stage {
    pub fn new(
        viewport: Viewport,
        particles: &ParticleSettings,
        animation: &AnimationSettings,
        seed: u64,
    ) -> Self {
        Self {
            field: ParticleField::initialize(
                particles.count,
                viewport,
                particles.policy,
                particles.ranges,
                seed,
            ),
            matrix: MatrixRain::new(animation.matrix.clone(), viewport.width, seed.wrapping_add(1)),
            cursor: CursorFollower::new(),
            trail: CursorTrail::new(animation.trail_length),
            fps: FpsMeter::new(),
            fps_floor: animation.fps_floor,
            frame_interval: animation.frame_interval,
            last_frame: None,
            frames: 0,
        }
    }

    pub fn frame(&mut self, now: Instant) -> FrameReport {
        let dt = self
            .last_frame
            .map_or(self.frame_interval, |last| now.saturating_duration_since(last));
        self.last_frame = Some(now);
        self.frames += 1;

        self.field.tick();
        self.matrix.advance(dt);
        self.cursor.step();

        let fps = self.fps.record(now);
        let mut report = FrameReport {
            fps,
            degraded: false,
        };
        if let Some(rate) = fps {
            debug!(fps = rate, frames = self.frames, "frame rate sample");
            if rate < self.fps_floor && !self.field.is_reduced() {
                info!(fps = rate, floor = self.fps_floor, "switching to reduced motion");
                self.field.set_reduced(true);
                report.degraded = true;
            }
        }
        report
    }

    /// Hidden time must not count as one long frame nor drag the FPS sample down.
    pub fn restart_clock(&mut self) {
        self.last_frame = None;
        self.fps.reset();
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if !self.field.resize(viewport) {
            warn!(width = viewport.width, height = viewport.height, "ignoring unusable viewport");
            return;
        }
        self.matrix.resize(viewport.width);
    }

    pub fn pointer(&mut self, x: f64, y: f64) {
        self.cursor.set_target(x, y);
        self.trail.push(x, y);
    }

    pub const fn field(&self) -> &ParticleField {
        &self.field
    }

    pub const fn trail(&self) -> &CursorTrail {
        &self.trail
    }

    pub fn snapshot(&self) -> StageSnapshot {
        StageSnapshot {
            frames: self.frames,
            particles: self.field.len(),
            visible_particles: self.field.visible().count(),
            glyphs: self.matrix.glyphs().len(),
            matrix_columns: self.matrix.columns(),
            cursor: self.cursor.drawn_at(),
            reduced: self.field.is_reduced(),
            viewport: self.field.viewport(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Stage;
    use crate::config::{AnimationSettings, MatrixSettings, ParticleSettings, Viewport};
    use crate::particles::{BoundaryPolicy, SpawnRanges};
    use std::time::{Duration, Instant};

    fn stage(fps_floor: u32) -> Stage {
        let particles = ParticleSettings {
            count: 12,
            policy: BoundaryPolicy::Bounce,
            seed: Some(3),
            ranges: SpawnRanges::default(),
        };
        let animation = AnimationSettings {
            frame_interval: Duration::from_millis(16),
            fps_floor,
            matrix: MatrixSettings::default(),
            trail_length: 10,
        };
        Stage::new(Viewport::new(640.0, 480.0), &particles, &animation, 3)
    }

    #[test]
    fn slow_frames_switch_to_reduced_motion_once() {
        let mut stage = stage(30);
        let start = Instant::now();
        let mut degraded = 0;
        for frame in 0..=40u64 {
            let report = stage.frame(start + Duration::from_millis(frame * 100));
            degraded += usize::from(report.degraded);
        }
        assert_eq!(degraded, 1);
        let snap = stage.snapshot();
        assert!(snap.reduced);
        assert_eq!(snap.particles, 12);
        assert_eq!(snap.visible_particles, 6);
    }

    #[test]
    fn fast_frames_keep_full_motion() {
        let mut stage = stage(30);
        let start = Instant::now();
        for frame in 0..=120u64 {
            stage.frame(start + Duration::from_millis(frame * 16));
        }
        assert!(!stage.snapshot().reduced);
        assert_eq!(stage.snapshot().frames, 121);
    }

    #[test]
    fn resize_updates_bounds_and_columns() {
        let mut stage = stage(30);
        stage.resize(Viewport::new(200.0, 100.0));
        let snap = stage.snapshot();
        assert_eq!(snap.viewport, Viewport::new(200.0, 100.0));
        assert_eq!(snap.matrix_columns, 10);
    }

    #[test]
    fn nan_resize_keeps_particles_inside() {
        let mut stage = stage(30);
        stage.resize(Viewport::new(f64::NAN, 300.0));
        stage.resize(Viewport::new(f64::INFINITY, 300.0));
        let start = Instant::now();
        for frame in 0..500u64 {
            stage.frame(start + Duration::from_millis(frame * 16));
        }
        let snap = stage.snapshot();
        assert_eq!(snap.viewport, Viewport::new(640.0, 480.0));
        assert_eq!(snap.matrix_columns, 32);
        let field = stage.field();
        assert!(field.iter().all(|p| field.viewport().contains(p.x, p.y)));
    }

    #[test]
    fn pointer_feeds_cursor_and_trail() {
        let mut stage = stage(30);
        stage.pointer(50.0, 50.0);
        stage.frame(Instant::now());
        assert_eq!(stage.trail().segments().count(), 1);
        let (x, y) = stage.snapshot().cursor;
        assert!((x + 5.0).abs() < 1e-9 && (y + 5.0).abs() < 1e-9);
    }
}
