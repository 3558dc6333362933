use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;
use url::Url;

use crate::Result;
use crate::error::ConfigError;
use crate::particles::{BoundaryPolicy, SpawnRanges};
use crate::types::Theme;

use super::defaults::{
    default_base_url, default_dedup_cache_size, default_fps_floor, default_frame_interval,
    default_matrix_column_width, default_matrix_drop_chance, default_matrix_interval,
    default_matrix_lifetime, default_notify_duration, default_particle_count,
    default_particle_max_age, default_particle_opacity, default_particle_policy,
    default_particle_size, default_particle_speed, default_queue_bound, default_section_height,
    default_site_name, default_spawn_offset, default_state_dir, default_theme,
    default_trail_length, default_viewport_height, default_viewport_width,
};
use super::env::{env_duration, env_parse, env_string};
use super::{
    AnimationSettings, Config, ContactSettings, FPS_FLOOR_BOUNDS, HumantimeDuration,
    MatrixSettings, NotifySettings, PARTICLE_COUNT_BOUNDS, PageSettings, ParticleSettings,
    PrefsSettings, Viewport,
};

pub(super) fn load(path: impl AsRef<Path>) -> std::result::Result<RawConfig, ConfigError> {
    let mut builder = ::config::Config::builder();
    let path = path.as_ref();
    builder = builder.add_source(::config::File::from(path).required(false));
    builder = builder.add_source(
        ::config::Environment::with_prefix("VITRINE")
            .separator("__")
            .try_parsing(true),
    );

    builder
        .build()
        .map_err(|err| ConfigError::Other(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub(super) notify: RawNotify,
    #[serde(default)]
    pub(super) particles: RawParticles,
    #[serde(default)]
    pub(super) viewport: RawViewport,
    #[serde(default)]
    pub(super) animation: RawAnimation,
    #[serde(default)]
    pub(super) contact: RawContact,
    #[serde(default)]
    pub(super) prefs: RawPrefs,
    #[serde(default)]
    pub(super) page: RawPage,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawNotify {
    #[serde(default = "default_notify_duration")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) default_duration: Duration,
    #[serde(default = "default_queue_bound")]
    pub(super) queue_bound: usize,
    #[serde(default)]
    pub(super) pending_limit: usize,
    #[serde(default)]
    #[serde_as(as = "Option<HumantimeDuration>")]
    pub(super) dedup_window: Option<Duration>,
    #[serde(default = "default_dedup_cache_size")]
    pub(super) dedup_cache_size: usize,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawParticles {
    #[serde(default = "default_particle_count")]
    pub(super) count: usize,
    #[serde(default = "default_particle_policy")]
    pub(super) policy: String,
    #[serde(default)]
    pub(super) seed: Option<u64>,
    #[serde(default = "default_particle_speed")]
    pub(super) speed: f64,
    #[serde(default = "default_particle_size")]
    pub(super) size: [f64; 2],
    #[serde(default = "default_particle_opacity")]
    pub(super) opacity: [f64; 2],
    #[serde(default = "default_particle_max_age")]
    pub(super) max_age: u32,
    #[serde(default = "default_spawn_offset")]
    pub(super) spawn_offset: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawViewport {
    #[serde(default = "default_viewport_width")]
    pub(super) width: f64,
    #[serde(default = "default_viewport_height")]
    pub(super) height: f64,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawAnimation {
    #[serde(default = "default_frame_interval")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) frame_interval: Duration,
    #[serde(default = "default_fps_floor")]
    pub(super) fps_floor: u32,
    #[serde(default = "default_matrix_column_width")]
    pub(super) matrix_column_width: f64,
    #[serde(default = "default_matrix_drop_chance")]
    pub(super) matrix_drop_chance: f64,
    #[serde(default = "default_matrix_interval")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) matrix_interval: Duration,
    #[serde(default = "default_matrix_lifetime")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) matrix_lifetime: Duration,
    #[serde(default = "default_trail_length")]
    pub(super) trail_length: usize,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawContact {
    #[serde(default)]
    pub(super) whatsapp_number: Option<String>,
    #[serde(default = "default_base_url")]
    pub(super) base_url: String,
    #[serde(default = "default_site_name")]
    pub(super) site_name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawPrefs {
    #[serde(default = "default_state_dir")]
    pub(super) state_dir: PathBuf,
    #[serde(default = "default_theme")]
    pub(super) default_theme: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawPage {
    #[serde(default = "default_section_height")]
    pub(super) section_height: f64,
}

impl RawConfig {
    pub(super) fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        if let Some(duration) = env_duration("NOTIFY_DURATION")? {
            self.notify.default_duration = duration;
        }
        if let Some(bound) = env_parse::<usize>("NOTIFY_QUEUE_BOUND")? {
            self.notify.queue_bound = bound;
        }
        if let Some(window) = env_duration("NOTIFY_DEDUP_WINDOW")? {
            self.notify.dedup_window = Some(window);
        }
        if let Some(count) = env_parse::<usize>("PARTICLE_COUNT")? {
            self.particles.count = count;
        }
        if let Some(policy) = env_string("PARTICLE_POLICY")? {
            self.particles.policy = policy;
        }
        if let Some(seed) = env_parse::<u64>("PARTICLE_SEED")? {
            self.particles.seed = Some(seed);
        }
        if let Some(width) = env_parse::<f64>("VIEWPORT_WIDTH")? {
            self.viewport.width = width;
        }
        if let Some(height) = env_parse::<f64>("VIEWPORT_HEIGHT")? {
            self.viewport.height = height;
        }
        if let Some(interval) = env_duration("FRAME_INTERVAL")? {
            self.animation.frame_interval = interval;
        }
        if let Some(number) = env_string("WHATSAPP_NUMBER")? {
            self.contact.whatsapp_number = Some(number);
        }
        if let Some(dir) = env_string("VITRINE_STATE_DIR")? {
            self.prefs.state_dir = PathBuf::from(dir);
        }
        if let Some(theme) = env_string("VITRINE_THEME")? {
            self.prefs.default_theme = theme;
        }
        Ok(())
    }

    pub(super) fn validate_and_build(self) -> Result<Config> {
        let notify = self.notify.validate()?;
        let particles = self.particles.validate()?;
        let viewport = self.viewport.validate()?;
        let animation = self.animation.validate()?;
        let contact = self.contact.validate()?;

        let default_theme =
            Theme::from_str(&self.prefs.default_theme).map_err(|err| ConfigError::InvalidField {
                field: "prefs.default_theme",
                message: err,
            })?;

        if !(self.page.section_height.is_finite() && self.page.section_height > 0.0) {
            return Err(invalid("page.section_height", "must be a positive number").into());
        }

        Ok(Config {
            notify,
            particles,
            viewport,
            animation,
            contact,
            prefs: PrefsSettings {
                state_dir: self.prefs.state_dir,
                default_theme,
            },
            page: PageSettings {
                section_height: self.page.section_height,
            },
        })
    }
}

impl RawNotify {
    fn validate(self) -> std::result::Result<NotifySettings, ConfigError> {
        if self.default_duration.is_zero() {
            return Err(invalid(
                "notify.default_duration",
                "duration must be greater than zero",
            ));
        }
        if self.queue_bound == 0 {
            return Err(invalid(
                "notify.queue_bound",
                "queue bound must be greater than zero",
            ));
        }
        if self.dedup_cache_size == 0 {
            return Err(invalid(
                "notify.dedup_cache_size",
                "dedup cache size must be greater than zero",
            ));
        }
        Ok(NotifySettings {
            default_duration: self.default_duration,
            queue_bound: self.queue_bound,
            pending_limit: self.pending_limit,
            dedup_window: self.dedup_window.filter(|window| !window.is_zero()),
            dedup_cache_size: self.dedup_cache_size,
        })
    }
}

impl RawParticles {
    fn validate(self) -> std::result::Result<ParticleSettings, ConfigError> {
        if !PARTICLE_COUNT_BOUNDS.contains(&self.count) {
            return Err(invalid(
                "particles.count",
                format!(
                    "expected between {} and {}, got {}",
                    PARTICLE_COUNT_BOUNDS.start(),
                    PARTICLE_COUNT_BOUNDS.end(),
                    self.count
                ),
            ));
        }
        let policy = BoundaryPolicy::from_str(&self.policy)
            .map_err(|err| invalid("particles.policy", err))?;
        if !(self.speed.is_finite() && self.speed >= 0.0) {
            return Err(invalid("particles.speed", "must be a non-negative number"));
        }
        let size = ordered_pair("particles.size", self.size)?;
        if size.0 <= 0.0 {
            return Err(invalid("particles.size", "sizes must be positive"));
        }
        let opacity = ordered_pair("particles.opacity", self.opacity)?;
        if opacity.0 < 0.0 || opacity.1 > 1.0 {
            return Err(invalid("particles.opacity", "opacity must stay within 0..=1"));
        }
        if self.max_age == 0 {
            return Err(invalid("particles.max_age", "max age must be at least one frame"));
        }
        if !(self.spawn_offset.is_finite() && self.spawn_offset >= 0.0) {
            return Err(invalid("particles.spawn_offset", "must be a non-negative number"));
        }

        Ok(ParticleSettings {
            count: self.count,
            policy,
            seed: self.seed,
            ranges: SpawnRanges {
                speed: self.speed,
                size,
                opacity,
                max_age: self.max_age,
                spawn_offset: self.spawn_offset,
            },
        })
    }
}

impl RawViewport {
    fn validate(self) -> std::result::Result<Viewport, ConfigError> {
        let viewport = Viewport::new(self.width, self.height);
        if !viewport.is_usable() {
            return Err(invalid(
                "viewport",
                format!("width and height must be positive numbers, got {}x{}", self.width, self.height),
            ));
        }
        Ok(viewport)
    }
}

impl RawAnimation {
    fn validate(self) -> std::result::Result<AnimationSettings, ConfigError> {
        if self.frame_interval.is_zero() {
            return Err(invalid(
                "animation.frame_interval",
                "frame interval must be greater than zero",
            ));
        }
        if !FPS_FLOOR_BOUNDS.contains(&self.fps_floor) {
            return Err(invalid(
                "animation.fps_floor",
                format!(
                    "expected between {} and {}, got {}",
                    FPS_FLOOR_BOUNDS.start(),
                    FPS_FLOOR_BOUNDS.end(),
                    self.fps_floor
                ),
            ));
        }
        if !(self.matrix_column_width.is_finite() && self.matrix_column_width >= 1.0) {
            return Err(invalid(
                "animation.matrix_column_width",
                "column width must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.matrix_drop_chance) {
            return Err(invalid(
                "animation.matrix_drop_chance",
                "probability must stay within 0..=1",
            ));
        }
        if self.matrix_interval.is_zero() {
            return Err(invalid(
                "animation.matrix_interval",
                "interval must be greater than zero",
            ));
        }
        if self.trail_length == 0 {
            return Err(invalid(
                "animation.trail_length",
                "trail needs at least one segment",
            ));
        }
        Ok(AnimationSettings {
            frame_interval: self.frame_interval,
            fps_floor: self.fps_floor,
            matrix: MatrixSettings {
                column_width: self.matrix_column_width,
                drop_chance: self.matrix_drop_chance,
                interval: self.matrix_interval,
                lifetime: self.matrix_lifetime,
            },
            trail_length: self.trail_length,
        })
    }
}

impl RawContact {
    fn validate(self) -> std::result::Result<ContactSettings, ConfigError> {
        let number = self.whatsapp_number.ok_or(ConfigError::MissingField {
            field: "contact.whatsapp_number",
        })?;
        let number = number.trim().to_string();
        let digits = number.strip_prefix('+').unwrap_or(&number);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid(
                "contact.whatsapp_number",
                "expected digits with an optional leading '+'",
            ));
        }
        let base_url = Url::parse(&self.base_url)
            .map_err(|err| invalid("contact.base_url", err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("contact.base_url", "URL cannot be used as a base"));
        }
        Ok(ContactSettings {
            whatsapp_number: number,
            base_url,
            site_name: self.site_name,
        })
    }
}

fn ordered_pair(
    field: &'static str,
    [low, high]: [f64; 2],
) -> std::result::Result<(f64, f64), ConfigError> {
    if !(low.is_finite() && high.is_finite()) || low > high {
        return Err(invalid(field, format!("expected [min, max], got [{low}, {high}]")));
    }
    Ok((low, high))
}

fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidField {
        field,
        message: message.into(),
    }
}

impl Default for RawNotify {
    fn default() -> Self {
        Self {
            default_duration: default_notify_duration(),
            queue_bound: default_queue_bound(),
            pending_limit: 0,
            dedup_window: None,
            dedup_cache_size: default_dedup_cache_size(),
        }
    }
}

impl Default for RawParticles {
    fn default() -> Self {
        Self {
            count: default_particle_count(),
            policy: default_particle_policy(),
            seed: None,
            speed: default_particle_speed(),
            size: default_particle_size(),
            opacity: default_particle_opacity(),
            max_age: default_particle_max_age(),
            spawn_offset: default_spawn_offset(),
        }
    }
}

impl Default for RawViewport {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
        }
    }
}

impl Default for RawAnimation {
    fn default() -> Self {
        Self {
            frame_interval: default_frame_interval(),
            fps_floor: default_fps_floor(),
            matrix_column_width: default_matrix_column_width(),
            matrix_drop_chance: default_matrix_drop_chance(),
            matrix_interval: default_matrix_interval(),
            matrix_lifetime: default_matrix_lifetime(),
            trail_length: default_trail_length(),
        }
    }
}

impl Default for RawContact {
    fn default() -> Self {
        Self {
            whatsapp_number: None,
            base_url: default_base_url(),
            site_name: default_site_name(),
        }
    }
}

impl Default for RawPrefs {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            default_theme: default_theme(),
        }
    }
}

impl Default for RawPage {
    fn default() -> Self {
        Self {
            section_height: default_section_height(),
        }
    }
}
