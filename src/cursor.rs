use std::collections::VecDeque;

const FOLLOW_EASE: f64 = 0.1;
const CURSOR_HALF: f64 = 10.0;
const TRAIL_HALF: f64 = 2.0;

/// Custom cursor that eases toward the pointer once per frame.
#[derive(Clone, Debug)]
pub struct CursorFollower {
    pos: (f64, f64),
    target: (f64, f64),
}

impl CursorFollower {
    pub const fn new() -> Self {
        Self {
            pos: (0.0, 0.0),
            target: (0.0, 0.0),
        }
    }

    pub const fn set_target(&mut self, x: f64, y: f64) {
        self.target = (x, y);
    }

    /// Returns the top-left corner the cursor is drawn at.
    pub fn step(&mut self) -> (f64, f64) {
        self.pos.0 += (self.target.0 - self.pos.0) * FOLLOW_EASE;
        self.pos.1 += (self.target.1 - self.pos.1) * FOLLOW_EASE;
        self.drawn_at()
    }

    pub fn drawn_at(&self) -> (f64, f64) {
        (self.pos.0 - CURSOR_HALF, self.pos.1 - CURSOR_HALF)
    }
}

impl Default for CursorFollower {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailSegment {
    pub x: f64,
    pub y: f64,
    pub opacity: f64,
    pub scale: f64,
}

/// The last `len` pointer positions, newest first when rendered.
#[derive(Clone, Debug)]
pub struct CursorTrail {
    history: VecDeque<(f64, f64)>,
    len: usize,
}

impl CursorTrail {
    pub fn new(len: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(len),
            len: len.max(1),
        }
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.history.push_back((x, y));
        while self.history.len() > self.len {
            self.history.pop_front();
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = TrailSegment> + '_ {
        let len = self.len as f64;
        self.history
            .iter()
            .rev()
            .enumerate()
            .map(move |(idx, &(x, y))| {
                let fade = 1.0 - idx as f64 / len;
                TrailSegment {
                    x: x - TRAIL_HALF,
                    y: y - TRAIL_HALF,
                    opacity: fade * 0.5,
                    scale: fade,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{CursorFollower, CursorTrail};

    #[test]
    fn follower_closes_a_tenth_of_the_gap() {
        let mut cursor = CursorFollower::new();
        cursor.set_target(100.0, 50.0);
        let (x, y) = cursor.step();
        assert!((x - 0.0).abs() < 1e-9);
        assert!((y + 5.0).abs() < 1e-9);
        for _ in 0..200 {
            cursor.step();
        }
        let (x, y) = cursor.drawn_at();
        assert!((x - 90.0).abs() < 1e-6);
        assert!((y - 40.0).abs() < 1e-6);
    }

    #[test]
    fn trail_keeps_latest_positions_newest_first() {
        let mut trail = CursorTrail::new(3);
        for step in 0..5 {
            trail.push(f64::from(step) * 10.0, 0.0);
        }
        let segments: Vec<_> = trail.segments().collect();
        assert_eq!(segments.len(), 3);
        assert!((segments[0].x - 38.0).abs() < 1e-9);
        assert!((segments[0].opacity - 0.5).abs() < 1e-9);
        assert!((segments[2].x - 18.0).abs() < 1e-9);
        assert!(segments[2].scale < segments[1].scale);
    }
}
