//! Board geometry: drop-zone rectangles recorded during rendering and the
//! hit-test tracker that turns pointer motion into enter/leave transitions.

use ratatui::layout::Rect;

use crate::board::drag::DragSession;
use crate::models::Stage;

/// Effective presentation mode for one frame. The persisted preference picks
/// horizontal vs grid; a narrow viewport forces stacked regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardMode {
    Stacked,
    Horizontal,
    Grid,
}

impl BoardMode {
    /// Dragging is disabled in stacked mode; cards offer the long-press hint
    /// instead.
    pub fn draggable(&self) -> bool {
        !matches!(self, BoardMode::Stacked)
    }
}

/// One stage column's drop zone.
#[derive(Debug, Clone, Copy)]
pub struct StageZone {
    pub stage: Stage,
    pub rect: Rect,
}

/// One card's on-screen extent (drag source, nested inside its column).
#[derive(Debug, Clone, Copy)]
pub struct CardZone {
    pub id: i64,
    pub stage: Stage,
    pub rect: Rect,
}

/// Identity of a hit-testable element. Card zones nest inside column zones,
/// which is what exercises the enter-counter: crossing onto a card fires a
/// second enter for the same stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneKey {
    Column(Stage),
    Card(i64, Stage),
}

impl ZoneKey {
    pub fn stage(&self) -> Stage {
        match self {
            ZoneKey::Column(s) => *s,
            ZoneKey::Card(_, s) => *s,
        }
    }
}

fn rect_contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x.saturating_add(rect.width) && y >= rect.y && y < rect.y.saturating_add(rect.height)
}

/// Geometry produced by one render pass. Mouse handling always hit-tests
/// against the layout of the frame the user is actually looking at.
#[derive(Debug, Default)]
pub struct BoardLayout {
    pub mode: Option<BoardMode>,
    /// The horizontally scrollable strip (horizontal mode only; zero-sized
    /// otherwise, which the auto-scroll engine treats as absent).
    pub strip: Rect,
    pub max_scroll: u16,
    pub zones: Vec<StageZone>,
    pub cards: Vec<CardZone>,
}

impl BoardLayout {
    pub fn new(mode: BoardMode) -> Self {
        Self {
            mode: Some(mode),
            ..Self::default()
        }
    }

    pub fn stage_at(&self, x: u16, y: u16) -> Option<Stage> {
        self.zones
            .iter()
            .find(|z| rect_contains(z.rect, x, y))
            .map(|z| z.stage)
    }

    pub fn card_at(&self, x: u16, y: u16) -> Option<&CardZone> {
        self.cards.iter().find(|c| rect_contains(c.rect, x, y))
    }

    /// Stack of elements under the pointer, outermost first.
    pub fn hit_path(&self, x: u16, y: u16) -> Vec<ZoneKey> {
        let mut path = Vec::with_capacity(2);
        if let Some(stage) = self.stage_at(x, y) {
            path.push(ZoneKey::Column(stage));
        }
        if let Some(card) = self.card_at(x, y) {
            path.push(ZoneKey::Card(card.id, card.stage));
        }
        path
    }
}

/// Tracks which elements the pointer is inside and emits balanced
/// enter/leave transitions on the session as crossings happen.
#[derive(Debug, Default)]
pub struct ZoneTracker {
    path: Vec<ZoneKey>,
}

impl ZoneTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-hit-test at the new pointer position and emit transitions for
    /// every element crossed since the previous update. Leaves fire before
    /// enters, mirroring how boundary events arrive from a real pointer.
    pub fn update(&mut self, layout: &BoardLayout, x: u16, y: u16, session: &mut DragSession) {
        let next = layout.hit_path(x, y);
        for old in &self.path {
            if !next.contains(old) {
                session.leave(old.stage());
            }
        }
        for new in &next {
            if !self.path.contains(new) {
                session.enter(new.stage());
            }
        }
        self.path = next;
    }

    /// Forget tracked elements without emitting transitions. Called on every
    /// session-ending transition; the session's own reset already cleared
    /// its counters.
    pub fn clear(&mut self) {
        self.path.clear();
    }
}
