//! Edge-proximity auto-scroll for the horizontal board strip.
//!
//! A cooperative loop driven by the TUI frame tick: while a drag session is
//! open the shell calls [`AutoScrollEngine::frame`] once per tick with the
//! session's last pointer X. The engine nudges the scroll offset toward
//! whichever edge the pointer approaches and reports whether it wants another
//! frame. It holds no timer of its own, so a `Stop` simply leaves it dormant
//! until the next tick re-evaluates.

use ratatui::layout::Rect;

/// Tuning constants for edge detection and scroll speed, in terminal cells.
#[derive(Debug, Clone, Copy)]
pub struct AutoScrollConfig {
    /// Distance from either edge of the strip that activates scrolling.
    pub edge_zone: u16,
    /// Cells scrolled per frame while active.
    pub speed: u16,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            edge_zone: 12,
            speed: 2,
        }
    }
}

/// Outcome of one auto-scroll frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTick {
    /// Offset moved; keep scheduling frames.
    Continue,
    /// Pointer in the neutral zone or offset at its bound; go dormant.
    Stop,
}

/// The auto-scroll loop. Started exactly once per drag session and stopped
/// unconditionally on every session-ending transition, including teardown.
#[derive(Debug)]
pub struct AutoScrollEngine {
    config: AutoScrollConfig,
    active: bool,
}

impl Default for AutoScrollEngine {
    fn default() -> Self {
        Self::new(AutoScrollConfig::default())
    }
}

impl AutoScrollEngine {
    pub fn new(config: AutoScrollConfig) -> Self {
        Self {
            config,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn start(&mut self) {
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Run one frame against the scroll strip `viewport`. `scroll` is the
    /// current horizontal offset in cells, `max_scroll` its upper bound.
    ///
    /// A degenerate viewport (zero width) means the strip is gone; the frame
    /// is a silent no-op so a late tick against a torn-down board cannot
    /// scroll anything.
    pub fn frame(
        &self,
        pointer_x: u16,
        viewport: Rect,
        scroll: &mut u16,
        max_scroll: u16,
    ) -> ScrollTick {
        if !self.active || viewport.width == 0 {
            return ScrollTick::Stop;
        }

        *scroll = (*scroll).min(max_scroll);

        let near_left = pointer_x < viewport.x.saturating_add(self.config.edge_zone);
        let near_right = pointer_x >= viewport.right().saturating_sub(self.config.edge_zone);

        if near_left && *scroll > 0 {
            *scroll = scroll.saturating_sub(self.config.speed);
            ScrollTick::Continue
        } else if near_right && *scroll < max_scroll {
            *scroll = scroll.saturating_add(self.config.speed).min(max_scroll);
            ScrollTick::Continue
        } else {
            ScrollTick::Stop
        }
    }
}
