use std::path::PathBuf;
use std::time::Duration;

pub(super) const fn default_notify_duration() -> Duration {
    Duration::from_secs(5)
}

pub(super) const fn default_queue_bound() -> usize {
    64
}

pub(super) const fn default_dedup_cache_size() -> usize {
    64
}

pub(super) const fn default_particle_count() -> usize {
    50
}

pub(super) fn default_particle_policy() -> String {
    "bounce".to_string()
}

pub(super) const fn default_particle_speed() -> f64 {
    1.0
}

pub(super) const fn default_particle_size() -> [f64; 2] {
    [1.0, 5.0]
}

pub(super) const fn default_particle_opacity() -> [f64; 2] {
    [0.3, 0.8]
}

pub(super) const fn default_particle_max_age() -> u32 {
    600
}

pub(super) const fn default_spawn_offset() -> f64 {
    50.0
}

pub(super) const fn default_viewport_width() -> f64 {
    1280.0
}

pub(super) const fn default_viewport_height() -> f64 {
    720.0
}

pub(super) const fn default_frame_interval() -> Duration {
    Duration::from_millis(16)
}

pub(super) const fn default_fps_floor() -> u32 {
    30
}

pub(super) const fn default_matrix_column_width() -> f64 {
    20.0
}

pub(super) const fn default_matrix_drop_chance() -> f64 {
    0.02
}

pub(super) const fn default_matrix_interval() -> Duration {
    Duration::from_millis(100)
}

pub(super) const fn default_matrix_lifetime() -> Duration {
    Duration::from_secs(5)
}

pub(super) const fn default_trail_length() -> usize {
    10
}

pub(super) fn default_base_url() -> String {
    "https://wa.me/".to_string()
}

pub(super) fn default_site_name() -> String {
    "Vitrine".to_string()
}

pub(super) fn default_state_dir() -> PathBuf {
    PathBuf::from(".vitrine")
}

pub(super) fn default_theme() -> String {
    "cyber".to_string()
}

pub(super) const fn default_section_height() -> f64 {
    900.0
}
