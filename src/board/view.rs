//! Board rendering: stacked, horizontal-scroll and grid modes.
//!
//! All three modes draw from the same [`group_by_stage`] output and record
//! their geometry into a [`BoardLayout`], so drop semantics are identical
//! wherever columns end up on screen. Mode switching never changes which
//! stage a card is displayed under.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::board::card::{card_height, card_lines};
use crate::board::drag::DragSession;
use crate::board::grouper::group_by_stage;
use crate::board::layout::{BoardLayout, BoardMode, CardZone, StageZone};
use crate::models::{Application, Stage};
use crate::prefs::{BoardPrefs, ViewMode};

/// Below this width the board falls back to the stacked layout.
pub const STACK_BREAKPOINT: u16 = 72;
/// Column width in horizontal mode.
const COLUMN_WIDTH: u16 = 26;
/// Gap between horizontal columns.
const COLUMN_GAP: u16 = 1;
/// Minimum column width when wrapping into a grid.
const GRID_MIN_COLUMN: u16 = 22;
/// Narrower than this and a clipped column is not worth drawing.
const MIN_VISIBLE: u16 = 6;

/// Pick the presentation mode for the current viewport. The persisted
/// preference only applies when the viewport is wide enough to drag.
pub fn effective_mode(width: u16, prefs: &BoardPrefs) -> BoardMode {
    if width < STACK_BREAKPOINT {
        BoardMode::Stacked
    } else {
        match prefs.view_mode {
            ViewMode::Horizontal => BoardMode::Horizontal,
            ViewMode::Grid => BoardMode::Grid,
        }
    }
}

/// Render the board and return the geometry of what was drawn.
pub fn render_board(
    f: &mut Frame,
    area: Rect,
    apps: &[Application],
    session: &DragSession,
    prefs: &BoardPrefs,
    scroll_x: u16,
    selected: Option<i64>,
) -> BoardLayout {
    let grouped = group_by_stage(apps);
    let mode = effective_mode(area.width, prefs);
    let mut layout = BoardLayout::new(mode);

    match mode {
        BoardMode::Stacked => render_stacked(f, area, &grouped, prefs, selected, &mut layout),
        BoardMode::Horizontal => {
            render_horizontal(f, area, &grouped, session, prefs, scroll_x, selected, &mut layout)
        }
        BoardMode::Grid => render_grid(f, area, &grouped, session, prefs, selected, &mut layout),
    }
    layout
}

/// Total virtual width of the horizontal strip.
fn strip_width() -> u16 {
    Stage::COUNT as u16 * (COLUMN_WIDTH + COLUMN_GAP) - COLUMN_GAP
}

#[allow(clippy::too_many_arguments)]
fn render_horizontal(
    f: &mut Frame,
    area: Rect,
    grouped: &[(Stage, Vec<&Application>)],
    session: &DragSession,
    prefs: &BoardPrefs,
    scroll_x: u16,
    selected: Option<i64>,
    layout: &mut BoardLayout,
) {
    layout.strip = area;
    layout.max_scroll = strip_width().saturating_sub(area.width);
    let scroll_x = scroll_x.min(layout.max_scroll);

    for (i, (stage, bucket)) in grouped.iter().enumerate() {
        let vx = i as u32 * (COLUMN_WIDTH + COLUMN_GAP) as u32;
        let vr = vx + COLUMN_WIDTH as u32;
        let win_l = scroll_x as u32;
        let win_r = win_l + area.width as u32;

        // Clip the column's virtual span to the scroll window.
        let l = vx.max(win_l);
        let r = vr.min(win_r);
        if r <= l || (r - l) < MIN_VISIBLE as u32 {
            continue;
        }
        let rect = Rect::new(area.x + (l - win_l) as u16, area.y, (r - l) as u16, area.height);
        render_column(f, rect, *stage, bucket, session, prefs, selected, true, layout);
    }
}

fn render_grid(
    f: &mut Frame,
    area: Rect,
    grouped: &[(Stage, Vec<&Application>)],
    session: &DragSession,
    prefs: &BoardPrefs,
    selected: Option<i64>,
    layout: &mut BoardLayout,
) {
    let per_row = ((area.width + COLUMN_GAP) / (GRID_MIN_COLUMN + COLUMN_GAP)).max(1) as usize;
    let per_row = per_row.min(Stage::COUNT);
    let n_rows = Stage::COUNT.div_ceil(per_row);

    let row_constraints: Vec<Constraint> =
        (0..n_rows).map(|_| Constraint::Ratio(1, n_rows as u32)).collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(area);

    for (row_idx, chunk) in grouped.chunks(per_row).enumerate() {
        let col_constraints: Vec<Constraint> =
            (0..per_row).map(|_| Constraint::Ratio(1, per_row as u32)).collect();
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(col_constraints)
            .split(rows[row_idx]);

        for (col_idx, (stage, bucket)) in chunk.iter().enumerate() {
            render_column(
                f, cols[col_idx], *stage, bucket, session, prefs, selected, true, layout,
            );
        }
    }
}

fn render_stacked(
    f: &mut Frame,
    area: Rect,
    grouped: &[(Stage, Vec<&Application>)],
    prefs: &BoardPrefs,
    selected: Option<i64>,
    layout: &mut BoardLayout,
) {
    let mut y = area.y;
    let bottom = area.y + area.height;
    let height = card_height(prefs.density);

    for (stage, bucket) in grouped {
        if y >= bottom {
            break;
        }
        let heading = Line::from(vec![
            Span::styled(
                format!("{} ", stage.display_name()),
                Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan),
            ),
            Span::styled(format!("({})", bucket.len()), Style::default().fg(Color::DarkGray)),
        ]);
        f.render_widget(Paragraph::new(heading), Rect::new(area.x, y, area.width, 1));
        y += 1;

        if bucket.is_empty() {
            if y < bottom {
                f.render_widget(
                    Paragraph::new(Span::styled("  none", Style::default().fg(Color::DarkGray))),
                    Rect::new(area.x, y, area.width, 1),
                );
                y += 1;
            }
            continue;
        }

        for app in bucket {
            if y + height > bottom {
                break;
            }
            let rect = Rect::new(area.x + 2, y, area.width.saturating_sub(2), height);
            let is_selected = app.id == selected && selected.is_some();
            f.render_widget(
                Paragraph::new(card_lines(app, prefs.density, is_selected, false)),
                rect,
            );
            // Cards are hit-testable for the long-press hint, but stacked
            // mode records no drop zones: dragging is disabled here.
            if let Some(id) = app.id {
                layout.cards.push(CardZone { id, stage: *stage, rect });
            }
            y += height;
        }
        y += 1; // blank row between sections
    }
}

#[allow(clippy::too_many_arguments)]
fn render_column(
    f: &mut Frame,
    rect: Rect,
    stage: Stage,
    bucket: &[&Application],
    session: &DragSession,
    prefs: &BoardPrefs,
    selected: Option<i64>,
    draggable: bool,
    layout: &mut BoardLayout,
) {
    let hovered = session.hovered_stage() == Some(stage) && session.is_dragging();

    let border_style = if hovered {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title = Span::styled(
        format!(" {} ({}) ", stage.display_name(), bucket.len()),
        if hovered {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        },
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    if draggable {
        layout.zones.push(StageZone { stage, rect });
    }

    let mut y = inner.y;
    let bottom = inner.y + inner.height;

    if hovered {
        if y < bottom {
            f.render_widget(
                Paragraph::new(Span::styled(
                    "▼ drop here",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )),
                Rect::new(inner.x, y, inner.width, 1),
            );
            y += 1;
        }
    } else if bucket.is_empty() {
        if y < bottom {
            f.render_widget(
                Paragraph::new(Span::styled(
                    "no applications",
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                )),
                Rect::new(inner.x, y, inner.width, 1),
            );
        }
        return;
    }

    let height = card_height(prefs.density);
    let mut shown = 0usize;
    for app in bucket {
        if y + height > bottom {
            break;
        }
        let rect = Rect::new(inner.x, y, inner.width, height);
        let is_selected = app.id == selected && selected.is_some();
        let is_dragged = app.id == session.dragged_id() && session.is_dragging();
        f.render_widget(
            Paragraph::new(card_lines(app, prefs.density, is_selected, is_dragged)),
            rect,
        );
        if draggable {
            if let Some(id) = app.id {
                layout.cards.push(CardZone { id, stage, rect });
            }
        }
        y += height + 1;
        shown += 1;
    }

    if shown < bucket.len() && y < bottom {
        f.render_widget(
            Paragraph::new(Span::styled(
                format!("+{} more", bucket.len() - shown),
                Style::default().fg(Color::DarkGray),
            )),
            Rect::new(inner.x, y, inner.width, 1),
        );
    }
}
