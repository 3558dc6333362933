//! "Matrix rain" background: one column every `column_width` pixels, each
//! rolling for a falling glyph on a fixed cadence.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::MatrixSettings;

pub const GLYPHS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789@#$%^&*()_+-=[]{}|;:,.<>?";

const FALL_SECS: std::ops::RangeInclusive<f64> = 2.0..=5.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    pub column: usize,
    pub ch: char,
    pub fall: Duration,
    pub born: Duration,
}

pub struct MatrixRain {
    settings: MatrixSettings,
    columns: usize,
    glyphs: Vec<Glyph>,
    charset: Vec<char>,
    clock: Duration,
    next_round: Duration,
    rng: StdRng,
}

impl MatrixRain {
    pub fn new(settings: MatrixSettings, width: f64, seed: u64) -> Self {
        let columns = column_count(width, settings.column_width);
        let next_round = settings.interval;
        Self {
            settings,
            columns,
            glyphs: Vec::new(),
            charset: GLYPHS.chars().collect(),
            clock: Duration::ZERO,
            next_round,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Moves the rain clock forward; returns how many glyphs were dropped.
    pub fn advance(&mut self, dt: Duration) -> usize {
        self.clock += dt;
        let mut dropped = 0;
        while self.next_round <= self.clock {
            let born = self.next_round;
            dropped += self.round(born);
            self.next_round += self.settings.interval;
        }
        let (clock, lifetime) = (self.clock, self.settings.lifetime);
        self.glyphs
            .retain(|glyph| clock.saturating_sub(glyph.born) < lifetime);
        dropped
    }

    fn round(&mut self, born: Duration) -> usize {
        let mut dropped = 0;
        for column in 0..self.columns {
            if self.rng.random::<f64>() >= self.settings.drop_chance {
                continue;
            }
            let idx = self.rng.random_range(0..self.charset.len());
            let fall = Duration::from_secs_f64(self.rng.random_range(FALL_SECS));
            self.glyphs.push(Glyph {
                column,
                ch: self.charset[idx],
                fall,
                born,
            });
            dropped += 1;
        }
        dropped
    }

    /// Rebuilds the columns for a new width; glyphs on screen are cleared.
    pub fn resize(&mut self, width: f64) {
        self.columns = column_count(width, self.settings.column_width);
        self.glyphs.clear();
    }

    pub const fn columns(&self) -> usize {
        self.columns
    }

    pub fn column_x(&self, column: usize) -> f64 {
        column as f64 * self.settings.column_width
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }
}

fn column_count(width: f64, column_width: f64) -> usize {
    if width <= 0.0 || column_width <= 0.0 {
        return 0;
    }
    (width / column_width).floor() as usize
}
