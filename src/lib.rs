#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod animation;
pub mod commands;
pub mod config;
pub mod contact;
pub mod cursor;
pub mod error;
pub mod matrix;
pub mod notify;
pub mod page;
pub mod particles;
pub mod perf;
pub mod scroll;
pub mod stage;
pub mod telemetry;
pub mod theme;
pub mod tween;
pub mod types;

pub type Result<T> = std::result::Result<T, error::Error>;
