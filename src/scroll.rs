//! Scroll-driven state: section geometry, navbar style, reveal-on-scroll.

use std::time::Duration;

use tracing::trace;

use crate::types::Section;

pub const NAVBAR_SCROLLED_AFTER: f64 = 100.0;
const ACTIVE_NAV_LINE: f64 = 150.0;
const CURRENT_SECTION_LINE: f64 = 100.0;
const REVEAL_THRESHOLD: f64 = 0.1;
const REVEAL_STAGGER: Duration = Duration::from_millis(100);

/// Vertical extent in document coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Visible share of the rect for a viewport starting at `offset`.
    pub fn visible_ratio(&self, offset: f64, viewport_height: f64) -> f64 {
        let start = self.top.max(offset);
        let end = self.bottom().min(offset + viewport_height);
        if self.height <= 0.0 {
            return if (offset..=offset + viewport_height).contains(&self.top) {
                1.0
            } else {
                0.0
            };
        }
        ((end - start) / self.height).clamp(0.0, 1.0)
    }
}

pub const fn navbar_scrolled(offset: f64) -> bool {
    offset > NAVBAR_SCROLLED_AFTER
}

#[derive(Clone, Debug)]
pub struct SectionLayout {
    rects: Vec<(Section, Rect)>,
}

impl SectionLayout {
    /// Every section `height` tall, stacked in document order.
    pub fn uniform(height: f64) -> Self {
        let rects = Section::ORDER
            .iter()
            .enumerate()
            .map(|(idx, section)| (*section, Rect::new(idx as f64 * height, height)))
            .collect();
        Self { rects }
    }

    pub fn top_of(&self, section: Section) -> f64 {
        self.rect(section).map_or(0.0, |rect| rect.top)
    }

    pub fn rect(&self, section: Section) -> Option<Rect> {
        self.rects
            .iter()
            .find(|(candidate, _)| *candidate == section)
            .map(|(_, rect)| *rect)
    }

    pub fn document_height(&self) -> f64 {
        self.rects
            .iter()
            .map(|(_, rect)| rect.bottom())
            .fold(0.0, f64::max)
    }

    /// Section under the navigation line; `home` when none spans it.
    /// On a shared edge the later section wins.
    pub fn current(&self, offset: f64) -> Section {
        let line = offset + CURRENT_SECTION_LINE;
        self.rects
            .iter()
            .rev()
            .find(|(_, rect)| rect.top <= line && rect.bottom() >= line)
            .map_or(Section::Home, |(section, _)| *section)
    }

    /// Highlighted navbar entry: the last section whose top has crossed
    /// 150px below the viewport top.
    pub fn active_nav(&self, offset: f64) -> Option<Section> {
        self.rects
            .iter()
            .filter(|(_, rect)| rect.top - offset <= ACTIVE_NAV_LINE)
            .map(|(section, _)| *section)
            .last()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reveal {
    pub id: String,
    pub delay: Duration,
}

#[derive(Debug)]
struct Observed {
    id: String,
    rect: Rect,
    revealed: bool,
}

/// Reveals each observed element once, the first time enough of it is
/// on screen.
#[derive(Debug, Default)]
pub struct ScrollReveal {
    observed: Vec<Observed>,
}

impl ScrollReveal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, id: impl Into<String>, rect: Rect) {
        self.observed.push(Observed {
            id: id.into(),
            rect,
            revealed: false,
        });
    }

    pub fn pending(&self) -> usize {
        self.observed.iter().filter(|item| !item.revealed).count()
    }

    /// Newly visible elements, staggered by position within this batch.
    pub fn scan(&mut self, offset: f64, viewport_height: f64) -> Vec<Reveal> {
        let mut batch = Vec::new();
        for item in self.observed.iter_mut().filter(|item| !item.revealed) {
            if item.rect.visible_ratio(offset, viewport_height) < REVEAL_THRESHOLD {
                continue;
            }
            item.revealed = true;
            let delay = REVEAL_STAGGER.saturating_mul(u32::try_from(batch.len()).unwrap_or(u32::MAX));
            trace!(id = %item.id, ?delay, "element revealed");
            batch.push(Reveal {
                id: item.id.clone(),
                delay,
            });
        }
        batch
    }
}
