//! Card presentation and the stacked-mode long-press affordance.
//!
//! Terminal drag semantics are unreliable in the stacked (narrow) layout, so
//! instead of attempting a drag there, holding the button on a card surfaces
//! a transient hint pointing at the keyboard move action.

use std::time::{Duration, Instant};

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::Application;
use crate::prefs::Density;

/// Hold duration before the hint appears.
pub const LONG_PRESS: Duration = Duration::from_millis(500);
/// How long the hint stays on screen.
pub const HINT_VISIBLE: Duration = Duration::from_secs(2);

const HINT_TEXT: &str = "press e to move";

/// Long-press detector for non-draggable layouts. Timing is injected so the
/// tick cadence of the event loop (or a test) drives it.
#[derive(Debug, Default)]
pub struct LongPress {
    pressed: Option<(u16, u16, Instant)>,
    hint_until: Option<Instant>,
}

impl LongPress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Button went down on a card.
    pub fn press(&mut self, x: u16, y: u16, now: Instant) {
        self.pressed = Some((x, y, now));
    }

    /// Pointer moved while held; more than a cell of travel is a scroll or
    /// stray drag attempt, not a hold.
    pub fn moved(&mut self, x: u16, y: u16) {
        if let Some((px, py, _)) = self.pressed {
            if px.abs_diff(x) > 1 || py.abs_diff(y) > 1 {
                self.pressed = None;
            }
        }
    }

    /// Button released before the threshold: not a long press.
    pub fn release(&mut self) {
        self.pressed = None;
    }

    /// Advance time; fires the hint once the hold crosses the threshold.
    pub fn tick(&mut self, now: Instant) {
        if let Some((_, _, since)) = self.pressed {
            if now.duration_since(since) >= LONG_PRESS {
                self.pressed = None;
                self.hint_until = Some(now + HINT_VISIBLE);
            }
        }
    }

    /// Hint text to display, if the hint is currently visible (auto-hides).
    pub fn hint(&self, now: Instant) -> Option<&'static str> {
        match self.hint_until {
            Some(until) if now < until => Some(HINT_TEXT),
            _ => None,
        }
    }
}

/// Card rows consumed per density, excluding the blank separator row.
pub fn card_height(density: Density) -> u16 {
    match density {
        Density::Normal => 2,
        Density::Compact => 1,
    }
}

/// Render one card as text lines for its column.
pub fn card_lines(app: &Application, density: Density, selected: bool, dragged: bool) -> Vec<Line<'static>> {
    let base = if dragged {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
    } else if selected {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };

    let title = Span::styled(app.company.clone(), base.add_modifier(Modifier::BOLD));
    match density {
        Density::Compact => {
            vec![Line::from(vec![
                title,
                Span::styled(format!(" · {}", app.role), base),
            ])]
        }
        Density::Normal => vec![
            Line::from(title),
            Line::from(Span::styled(
                format!("  {}", app.role),
                base.fg(if dragged { Color::DarkGray } else { Color::Gray }),
            )),
        ],
    }
}
