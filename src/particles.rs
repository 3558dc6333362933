//! Fixed-size particle field advanced once per display frame.
//!
//! The field owns every particle. A particle that leaves the viewport is
//! either reflected back in ([`BoundaryPolicy::Bounce`]) or re-rolled from the
//! spawn ranges ([`BoundaryPolicy::Respawn`]); the collection never grows or
//! shrinks.

use std::fmt::{self, Display};
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::Viewport;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    #[default]
    Bounce,
    Respawn,
}

impl Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bounce => "bounce",
            Self::Respawn => "respawn",
        })
    }
}

impl FromStr for BoundaryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bounce" | "reflect" => Ok(Self::Bounce),
            "respawn" | "rise" => Ok(Self::Respawn),
            other => Err(format!("unknown boundary policy: {other}")),
        }
    }
}

/// Ranges every particle is drawn from, at creation and on respawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRanges {
    /// Largest absolute velocity per axis, in pixels per frame.
    pub speed: f64,
    pub size: (f64, f64),
    pub opacity: (f64, f64),
    /// Frames a respawning particle lives before it is re-rolled.
    pub max_age: u32,
    /// Distance below the viewport where respawning particles start.
    pub spawn_offset: f64,
}

impl Default for SpawnRanges {
    fn default() -> Self {
        Self {
            speed: 1.0,
            size: (1.0, 5.0),
            opacity: (0.3, 0.8),
            max_age: 600,
            spawn_offset: 50.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub opacity: f64,
    pub age: u32,
    pub max_age: u32,
    pub hidden: bool,
}

pub struct ParticleField {
    particles: Vec<Particle>,
    viewport: Viewport,
    policy: BoundaryPolicy,
    ranges: SpawnRanges,
    rng: StdRng,
    reduced: bool,
}

impl ParticleField {
    /// Creates `count` particles from a seeded source so runs are reproducible.
    pub fn initialize(
        count: usize,
        viewport: Viewport,
        policy: BoundaryPolicy,
        ranges: SpawnRanges,
        seed: u64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let particles = (0..count)
            .map(|_| spawn(&mut rng, viewport, policy, &ranges))
            .collect();
        Self {
            particles,
            viewport,
            policy,
            ranges,
            rng,
            reduced: false,
        }
    }

    /// Advances every particle by one frame.
    pub fn tick(&mut self) {
        let viewport = self.viewport;
        match self.policy {
            BoundaryPolicy::Bounce => {
                for particle in &mut self.particles {
                    bounce(particle, viewport);
                }
            }
            BoundaryPolicy::Respawn => {
                let ranges = self.ranges;
                for particle in &mut self.particles {
                    if particle.age >= particle.max_age || particle.y < -ranges.spawn_offset {
                        let hidden = particle.hidden;
                        *particle = spawn(&mut self.rng, viewport, BoundaryPolicy::Respawn, &ranges);
                        particle.hidden = hidden;
                        continue;
                    }
                    particle.x = wrap(particle.x + particle.vx, viewport.width);
                    particle.y += particle.vy;
                    particle.age += 1;
                }
            }
        }
    }

    /// New bounds apply from the next [`tick`](Self::tick) on.
    /// Non-finite or empty viewports are ignored; the old bounds stay.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if !viewport.is_usable() {
            return false;
        }
        self.viewport = viewport;
        true
    }

    /// Low-FPS mode: every other particle is hidden, none are dropped.
    pub fn set_reduced(&mut self, reduced: bool) {
        self.reduced = reduced;
        for (idx, particle) in self.particles.iter_mut().enumerate() {
            particle.hidden = reduced && idx % 2 == 0;
        }
    }

    pub const fn is_reduced(&self) -> bool {
        self.reduced
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub const fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|particle| !particle.hidden)
    }
}

fn bounce(particle: &mut Particle, viewport: Viewport) {
    particle.x += particle.vx;
    particle.y += particle.vy;

    if particle.x <= 0.0 {
        particle.x = 0.0;
        particle.vx = particle.vx.abs();
    } else if particle.x >= viewport.width {
        particle.x = viewport.width;
        particle.vx = -particle.vx.abs();
    }
    if particle.y <= 0.0 {
        particle.y = 0.0;
        particle.vy = particle.vy.abs();
    } else if particle.y >= viewport.height {
        particle.y = viewport.height;
        particle.vy = -particle.vy.abs();
    }
}

fn wrap(value: f64, bound: f64) -> f64 {
    if bound > 0.0 { value.rem_euclid(bound) } else { 0.0 }
}

fn spawn(
    rng: &mut StdRng,
    viewport: Viewport,
    policy: BoundaryPolicy,
    ranges: &SpawnRanges,
) -> Particle {
    let x = sample(rng, 0.0, viewport.width);
    let (y, vx, vy) = match policy {
        BoundaryPolicy::Bounce => (
            sample(rng, 0.0, viewport.height),
            sample(rng, -ranges.speed, ranges.speed),
            sample(rng, -ranges.speed, ranges.speed),
        ),
        BoundaryPolicy::Respawn => (
            viewport.height + ranges.spawn_offset,
            sample(rng, -ranges.speed / 2.0, ranges.speed / 2.0),
            -sample(rng, ranges.speed / 2.0, ranges.speed * 1.5),
        ),
    };
    Particle {
        x,
        y,
        vx,
        vy,
        size: sample(rng, ranges.size.0, ranges.size.1),
        opacity: sample(rng, ranges.opacity.0, ranges.opacity.1),
        age: 0,
        max_age: ranges.max_age,
        hidden: false,
    }
}

fn sample(rng: &mut StdRng, low: f64, high: f64) -> f64 {
    if high > low {
        rng.random_range(low..=high)
    } else {
        low
    }
}

#[cfg(test)]
mod tests {
    use super::{BoundaryPolicy, ParticleField, SpawnRanges};
    use crate::config::Viewport;
    use std::str::FromStr;

    fn field(count: usize, policy: BoundaryPolicy, ranges: SpawnRanges) -> ParticleField {
        ParticleField::initialize(count, Viewport::new(400.0, 300.0), policy, ranges, 7)
    }

    #[test]
    fn same_seed_gives_same_field() {
        let a = field(20, BoundaryPolicy::Bounce, SpawnRanges::default());
        let b = field(20, BoundaryPolicy::Bounce, SpawnRanges::default());
        assert!(a.iter().eq(b.iter()));
    }

    #[test]
    fn count_is_stable_across_ticks() {
        for policy in [BoundaryPolicy::Bounce, BoundaryPolicy::Respawn] {
            let ranges = SpawnRanges {
                max_age: 5,
                ..SpawnRanges::default()
            };
            let mut field = field(30, policy, ranges);
            for _ in 0..500 {
                field.tick();
            }
            assert_eq!(field.len(), 30, "policy {policy}");
        }
    }

    #[test]
    fn bounce_keeps_particles_inside() {
        let ranges = SpawnRanges {
            speed: 40.0,
            ..SpawnRanges::default()
        };
        let mut field = field(40, BoundaryPolicy::Bounce, ranges);
        let viewport = field.viewport();
        for _ in 0..1_000 {
            field.tick();
            assert!(field.iter().all(|p| viewport.contains(p.x, p.y)));
        }
    }

    #[test]
    fn bounce_reflects_velocity_at_edge() {
        let ranges = SpawnRanges {
            speed: 0.0,
            ..SpawnRanges::default()
        };
        let mut field = field(1, BoundaryPolicy::Bounce, ranges);
        field.particles[0].x = 399.5;
        field.particles[0].vx = 2.0;
        field.tick();
        assert!((field.particles[0].x - 400.0).abs() < f64::EPSILON);
        assert!(field.particles[0].vx < 0.0);
    }

    #[test]
    fn resize_applies_on_next_tick() {
        let ranges = SpawnRanges {
            speed: 0.0,
            ..SpawnRanges::default()
        };
        let mut field = field(1, BoundaryPolicy::Bounce, ranges);
        field.particles[0].x = 350.0;
        field.particles[0].y = 10.0;
        assert!(field.resize(Viewport::new(200.0, 300.0)));
        assert!((field.particles[0].x - 350.0).abs() < f64::EPSILON);
        field.tick();
        assert!((field.particles[0].x - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn non_finite_resize_is_ignored() {
        let mut field = field(25, BoundaryPolicy::Bounce, SpawnRanges::default());
        assert!(!field.resize(Viewport::new(f64::NAN, 600.0)));
        assert!(!field.resize(Viewport::new(f64::INFINITY, 600.0)));
        assert!(!field.resize(Viewport::new(800.0, -1.0)));
        for _ in 0..500 {
            field.tick();
        }
        assert_eq!(field.viewport(), Viewport::new(400.0, 300.0));
        assert!(field.iter().all(|p| field.viewport().contains(p.x, p.y)));
    }

    #[test]
    fn respawn_resets_age_and_height() {
        let ranges = SpawnRanges {
            max_age: 10,
            spawn_offset: 50.0,
            ..SpawnRanges::default()
        };
        let mut field = field(1, BoundaryPolicy::Respawn, ranges);
        let start_y = 300.0 + 50.0;
        assert!((field.particles[0].y - start_y).abs() < f64::EPSILON);
        assert!(field.particles[0].vy < 0.0);

        for _ in 0..10 {
            field.tick();
        }
        assert_eq!(field.particles[0].age, 10);
        assert!(field.particles[0].y < start_y);

        field.tick();
        assert_eq!(field.particles[0].age, 0);
        assert!((field.particles[0].y - start_y).abs() < f64::EPSILON);
    }

    #[test]
    fn respawn_when_above_top() {
        let mut field = field(1, BoundaryPolicy::Respawn, SpawnRanges::default());
        field.particles[0].y = -51.0;
        field.particles[0].age = 3;
        field.tick();
        assert_eq!(field.particles[0].age, 0);
        assert!((field.particles[0].y - 350.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reduced_mode_hides_half_without_dropping() {
        let mut field = field(10, BoundaryPolicy::Bounce, SpawnRanges::default());
        field.set_reduced(true);
        assert_eq!(field.len(), 10);
        assert_eq!(field.visible().count(), 5);
        field.set_reduced(false);
        assert_eq!(field.visible().count(), 10);
    }

    #[test]
    fn policy_parses_aliases() {
        assert_eq!(BoundaryPolicy::from_str("Reflect"), Ok(BoundaryPolicy::Bounce));
        assert_eq!(BoundaryPolicy::from_str("respawn"), Ok(BoundaryPolicy::Respawn));
        assert!(BoundaryPolicy::from_str("orbit").is_err());
    }
}
