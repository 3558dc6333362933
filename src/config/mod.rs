use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::Result;
use crate::error::Error as VitrineError;
use crate::particles::{BoundaryPolicy, SpawnRanges};
use crate::types::Theme;

mod defaults;
mod env;
mod raw;
mod serde;

pub(crate) use self::serde::HumantimeDuration;

const PARTICLE_COUNT_BOUNDS: RangeInclusive<usize> = 1..=1000;
const FPS_FLOOR_BOUNDS: RangeInclusive<u32> = 1..=240;

#[derive(Debug, Clone)]
pub struct Config {
    pub notify: NotifySettings,
    pub particles: ParticleSettings,
    pub viewport: Viewport,
    pub animation: AnimationSettings,
    pub contact: ContactSettings,
    pub prefs: PrefsSettings,
    pub page: PageSettings,
}

#[derive(Debug, Clone)]
pub struct NotifySettings {
    pub default_duration: Duration,
    pub queue_bound: usize,
    /// Zéro signifie « pas de limite ».
    pub pending_limit: usize,
    pub dedup_window: Option<Duration>,
    pub dedup_cache_size: usize,
}

#[derive(Debug, Clone)]
pub struct ParticleSettings {
    pub count: usize,
    pub policy: BoundaryPolicy,
    pub seed: Option<u64>,
    pub ranges: SpawnRanges,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone)]
pub struct AnimationSettings {
    pub frame_interval: Duration,
    pub fps_floor: u32,
    pub matrix: MatrixSettings,
    pub trail_length: usize,
}

#[derive(Debug, Clone)]
pub struct MatrixSettings {
    pub column_width: f64,
    pub drop_chance: f64,
    pub interval: Duration,
    pub lifetime: Duration,
}

#[derive(Debug, Clone)]
pub struct ContactSettings {
    pub whatsapp_number: String,
    pub base_url: Url,
    pub site_name: String,
}

#[derive(Debug, Clone)]
pub struct PrefsSettings {
    pub state_dir: PathBuf,
    pub default_theme: Theme,
}

#[derive(Debug, Clone)]
pub struct PageSettings {
    pub section_height: f64,
}

impl Config {
    /// Load configuration from a file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration file cannot be read, parsed,
    /// when environment overrides are invalid, or when the resulting values
    /// fail validation.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut raw = raw::load(path).map_err(VitrineError::from)?;
        raw.apply_env_overrides().map_err(VitrineError::from)?;
        raw.validate_and_build()
    }
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }

    /// Both sides finite and strictly positive.
    pub fn is_usable(&self) -> bool {
        [self.width, self.height]
            .iter()
            .all(|side| side.is_finite() && *side > 0.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(defaults::default_viewport_width(), defaults::default_viewport_height())
    }
}

impl Default for MatrixSettings {
    fn default() -> Self {
        Self {
            column_width: defaults::default_matrix_column_width(),
            drop_chance: defaults::default_matrix_drop_chance(),
            interval: defaults::default_matrix_interval(),
            lifetime: defaults::default_matrix_lifetime(),
        }
    }
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            default_duration: defaults::default_notify_duration(),
            queue_bound: defaults::default_queue_bound(),
            pending_limit: 0,
            dedup_window: None,
            dedup_cache_size: defaults::default_dedup_cache_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Viewport;

    #[test]
    fn viewport_contains_its_edges() {
        let vp = Viewport::new(100.0, 50.0);
        assert!(vp.contains(0.0, 0.0));
        assert!(vp.contains(100.0, 50.0));
        assert!(!vp.contains(100.1, 10.0));
        assert!(!vp.contains(10.0, -0.1));
    }

    #[test]
    fn unusable_viewports() {
        assert!(Viewport::new(1.0, 1.0).is_usable());
        assert!(!Viewport::new(f64::NAN, 300.0).is_usable());
        assert!(!Viewport::new(400.0, f64::INFINITY).is_usable());
        assert!(!Viewport::new(0.0, 300.0).is_usable());
    }
}
