//! Full-screen pipeline board: event loop, mouse drag wiring, keyboard
//! actions, and the status bar.

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
use rusqlite::Connection;

use crate::board::card::LongPress;
use crate::board::layout::BoardMode;
use crate::board::view::render_board;
use crate::board::{group_by_stage, AutoScrollConfig, BoardLayout, BoardState, StageChange};
use crate::db::DbConnection;
use crate::models::{Application, Stage};
use crate::prefs::BoardPrefs;
use crate::repo::{ApplicationRepo, SqliteSink};

/// Frame cadence for the event loop; auto-scroll advances once per tick.
const TICK: Duration = Duration::from_millis(33);
const NOTIFY_VISIBLE: Duration = Duration::from_secs(3);
/// Wheel scroll step in horizontal mode, cells.
const WHEEL_STEP: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NotifyLevel {
    Info,
    Error,
}

/// Modal interaction state, kept deliberately small.
#[derive(Debug, Clone)]
enum Mode {
    Normal,
    /// Keyboard fallback for moving a card between stages.
    PickStage { id: i64, cursor: usize },
    ConfirmDelete { id: i64 },
}

struct BoardApp<'a> {
    conn: &'a Connection,
    apps: Vec<Application>,
    board: BoardState,
    layout: BoardLayout,
    prefs: BoardPrefs,
    scroll_x: u16,
    selected: Option<i64>,
    mode: Mode,
    long_press: LongPress,
    notification: Option<(String, NotifyLevel, Instant)>,
    should_quit: bool,
}

/// Launch the board against the given database connection.
pub fn run_board(conn: &Connection) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = BoardApp::new(conn).and_then(|mut app| app.run(&mut terminal));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    result
}

impl<'a> BoardApp<'a> {
    fn new(conn: &'a Connection) -> Result<Self> {
        let apps = ApplicationRepo::list_all(conn)?;
        let prefs = BoardPrefs::load(&DbConnection::config_path());
        Ok(Self {
            conn,
            apps,
            board: BoardState::new(AutoScrollConfig::default()),
            layout: BoardLayout::default(),
            prefs,
            scroll_x: 0,
            selected: None,
            mode: Mode::Normal,
            long_press: LongPress::new(),
            notification: None,
            should_quit: false,
        })
    }

    fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.tick(Instant::now());

            let mut drawn = None;
            terminal.draw(|f| drawn = Some(self.draw(f)))?;
            if let Some(layout) = drawn {
                self.layout = layout;
            }

            if event::poll(TICK)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key)?,
                    Event::Mouse(mouse) => self.handle_mouse(mouse)?,
                    Event::Resize(_, _) => {
                        // A resize can flip the board into stacked mode;
                        // a drag in flight has lost its zones, so cancel it.
                        self.board.abort();
                    }
                    _ => {}
                }
            }

            if self.should_quit {
                break;
            }
        }
        // Teardown mid-drag must still stop the scroll loop.
        self.board.abort();
        Ok(())
    }

    fn tick(&mut self, now: Instant) {
        if let Some((_, _, shown)) = self.notification {
            if now.duration_since(shown) >= NOTIFY_VISIBLE {
                self.notification = None;
            }
        }
        self.long_press.tick(now);

        if self.board.session.is_dragging() && self.layout.mode == Some(BoardMode::Horizontal) {
            self.board.autoscroll_frame(&self.layout, &mut self.scroll_x);
        }
    }

    fn notify(&mut self, msg: impl Into<String>) {
        self.notification = Some((msg.into(), NotifyLevel::Info, Instant::now()));
    }

    fn notify_error(&mut self, msg: impl Into<String>) {
        self.notification = Some((msg.into(), NotifyLevel::Error, Instant::now()));
    }

    // ---- drawing ----------------------------------------------------------

    fn draw(&self, f: &mut Frame) -> BoardLayout {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.draw_title(f, chunks[0]);
        let layout = render_board(
            f,
            chunks[1],
            &self.apps,
            &self.board.session,
            &self.prefs,
            self.scroll_x,
            self.selected,
        );
        self.draw_status(f, chunks[2], &layout);

        match &self.mode {
            Mode::PickStage { id, cursor } => self.draw_stage_picker(f, *id, *cursor),
            Mode::ConfirmDelete { id } => self.draw_confirm(f, *id),
            Mode::Normal => {}
        }
        layout
    }

    fn draw_title(&self, f: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(" huntl ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled("pipeline board", Style::default().fg(Color::Gray)),
            Span::styled(
                format!(
                    "  [{} · {}]",
                    self.prefs.view_mode.as_str(),
                    self.prefs.density.as_str()
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }

    fn draw_status(&self, f: &mut Frame, area: Rect, layout: &BoardLayout) {
        let now = Instant::now();
        let line = if let Some((msg, level, _)) = &self.notification {
            let style = match level {
                NotifyLevel::Info => Style::default().fg(Color::Green),
                NotifyLevel::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            };
            Line::from(Span::styled(format!(" {}", msg), style))
        } else if let Some(hint) = self.long_press.hint(now) {
            Line::from(Span::styled(
                format!(" {}", hint),
                Style::default().fg(Color::Yellow),
            ))
        } else if self.board.session.is_dragging() && layout.mode == Some(BoardMode::Horizontal) {
            Line::from(Span::styled(
                " drag near the board edge to scroll",
                Style::default().fg(Color::Yellow),
            ))
        } else {
            Line::from(Span::styled(
                " q quit · v view · c density · e move · d delete · r reload",
                Style::default().fg(Color::DarkGray),
            ))
        };
        f.render_widget(Paragraph::new(line), area);
    }

    fn popup(&self, f: &mut Frame, width: u16, height: u16) -> Rect {
        let area = f.area();
        let rect = Rect::new(
            area.width.saturating_sub(width) / 2,
            area.height.saturating_sub(height) / 2,
            width.min(area.width),
            height.min(area.height),
        );
        f.render_widget(Clear, rect);
        rect
    }

    fn draw_stage_picker(&self, f: &mut Frame, id: i64, cursor: usize) {
        let current = self
            .apps
            .iter()
            .find(|a| a.id == Some(id))
            .map(|a| a.stage);
        let rect = self.popup(f, 28, Stage::COUNT as u16 + 2);
        let block = Block::default()
            .title(" move to stage ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        let inner = block.inner(rect);
        f.render_widget(block, rect);

        for (i, stage) in Stage::ALL.iter().enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            let marker = if i == cursor { "> " } else { "  " };
            let suffix = if Some(*stage) == current { " (current)" } else { "" };
            let style = if i == cursor {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            f.render_widget(
                Paragraph::new(Span::styled(
                    format!("{}{}{}", marker, stage.display_name(), suffix),
                    style,
                )),
                Rect::new(inner.x, inner.y + i as u16, inner.width, 1),
            );
        }
    }

    fn draw_confirm(&self, f: &mut Frame, id: i64) {
        let company = self
            .apps
            .iter()
            .find(|a| a.id == Some(id))
            .map(|a| a.company.as_str())
            .unwrap_or("?");
        let rect = self.popup(f, 40, 3);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));
        let inner = block.inner(rect);
        f.render_widget(block, rect);
        f.render_widget(
            Paragraph::new(format!("Delete \"{}\"? (y/n)", company)),
            inner,
        );
    }

    // ---- state changes ----------------------------------------------------

    /// Optimistic move: the in-memory list changes first, then persistence.
    /// A write failure is surfaced but not reverted; `r` reconciles.
    fn apply_change(&mut self, change: StageChange, error: Option<String>) {
        if let Some(app) = self.apps.iter_mut().find(|a| a.id == Some(change.id)) {
            app.stage = change.to;
        }
        match error {
            Some(e) => self.notify_error(format!("move not saved: {}", e)),
            None => self.notify(format!("moved to {}", change.to.display_name())),
        }
    }

    fn reload(&mut self) -> Result<()> {
        self.board.abort();
        self.apps = ApplicationRepo::list_all(self.conn)?;
        if let Some(id) = self.selected {
            if !self.apps.iter().any(|a| a.id == Some(id)) {
                self.selected = None;
            }
        }
        self.notify("reloaded");
        Ok(())
    }

    fn delete(&mut self, id: i64) {
        match ApplicationRepo::delete(self.conn, id) {
            Ok(()) => {
                self.apps.retain(|a| a.id != Some(id));
                if self.selected == Some(id) {
                    self.selected = None;
                }
                self.notify("deleted");
            }
            Err(e) => self.notify_error(format!("delete failed: {:#}", e)),
        }
    }

    /// Position of the selected card as (stage index, index within bucket).
    fn selection_pos(&self) -> Option<(usize, usize)> {
        let id = self.selected?;
        let grouped = group_by_stage(&self.apps);
        for (si, (_, bucket)) in grouped.iter().enumerate() {
            if let Some(ci) = bucket.iter().position(|a| a.id == Some(id)) {
                return Some((si, ci));
            }
        }
        None
    }

    fn move_selection(&mut self, d_stage: i32, d_card: i32) {
        let grouped = group_by_stage(&self.apps);
        let (si, ci) = match self.selection_pos() {
            Some(pos) => pos,
            None => {
                // No selection yet: pick the first card anywhere.
                self.selected = grouped
                    .iter()
                    .flat_map(|(_, b)| b.iter())
                    .next()
                    .and_then(|a| a.id);
                return;
            }
        };

        if d_stage != 0 {
            // Walk toward the next non-empty column in that direction.
            let mut s = si as i32 + d_stage;
            while s >= 0 && (s as usize) < Stage::COUNT {
                let bucket = &grouped[s as usize].1;
                if !bucket.is_empty() {
                    let idx = ci.min(bucket.len() - 1);
                    self.selected = bucket[idx].id;
                    return;
                }
                s += d_stage;
            }
        } else if d_card != 0 {
            let bucket = &grouped[si].1;
            let next = ci as i32 + d_card;
            if next >= 0 && (next as usize) < bucket.len() {
                self.selected = bucket[next as usize].id;
            }
        }
    }

    // ---- input ------------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind == KeyEventKind::Release {
            return Ok(());
        }

        match self.mode.clone() {
            Mode::PickStage { id, cursor } => {
                match key.code {
                    KeyCode::Up | KeyCode::Char('k') => {
                        self.mode = Mode::PickStage {
                            id,
                            cursor: cursor.saturating_sub(1),
                        };
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        self.mode = Mode::PickStage {
                            id,
                            cursor: (cursor + 1).min(Stage::COUNT - 1),
                        };
                    }
                    KeyCode::Enter => {
                        self.mode = Mode::Normal;
                        let to = Stage::ALL[cursor];
                        let origin = self
                            .apps
                            .iter()
                            .find(|a| a.id == Some(id))
                            .map(|a| a.stage);
                        // Same no-op rule as a drop on the current stage.
                        if origin != Some(to) {
                            let error = ApplicationRepo::set_stage(self.conn, id, to)
                                .err()
                                .map(|e| format!("{:#}", e));
                            self.apply_change(StageChange { id, to }, error);
                        }
                    }
                    KeyCode::Esc | KeyCode::Char('q') => self.mode = Mode::Normal,
                    _ => {}
                }
                return Ok(());
            }
            Mode::ConfirmDelete { id } => {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Enter => {
                        self.mode = Mode::Normal;
                        self.delete(id);
                    }
                    _ => self.mode = Mode::Normal,
                }
                return Ok(());
            }
            Mode::Normal => {}
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                if self.board.session.is_dragging() {
                    self.board.abort();
                    self.notify("drag cancelled");
                }
            }
            KeyCode::Char('v') => {
                self.prefs.view_mode = self.prefs.view_mode.toggled();
                self.scroll_x = 0;
                self.save_prefs();
            }
            KeyCode::Char('c') => {
                self.prefs.density = self.prefs.density.toggled();
                self.save_prefs();
            }
            KeyCode::Char('r') => self.reload()?,
            KeyCode::Char('e') => {
                if let Some(id) = self.selected {
                    let cursor = self
                        .apps
                        .iter()
                        .find(|a| a.id == Some(id))
                        .map(|a| a.stage.index())
                        .unwrap_or(0);
                    self.mode = Mode::PickStage { id, cursor };
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected {
                    self.mode = Mode::ConfirmDelete { id };
                }
            }
            KeyCode::Left | KeyCode::Char('h') => self.move_selection(-1, 0),
            KeyCode::Right | KeyCode::Char('l') => self.move_selection(1, 0),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(0, -1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(0, 1),
            _ => {}
        }
        Ok(())
    }

    fn save_prefs(&mut self) {
        if let Err(e) = self.prefs.save(&DbConnection::config_path()) {
            self.notify_error(format!("could not save preferences: {:#}", e));
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        if !matches!(self.mode, Mode::Normal) {
            return Ok(());
        }
        let (x, y) = (mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(card) = self.layout.card_at(x, y).copied() {
                    self.selected = Some(card.id);
                    if self.layout.mode.is_some_and(|m| m.draggable()) {
                        self.board.begin_drag(&self.layout, card.id, card.stage, x, y);
                    } else {
                        // Stacked layout: no drag, arm the long-press hint.
                        self.long_press.press(x, y, Instant::now());
                    }
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.board.session.is_dragging() {
                    self.board.pointer_moved(&self.layout, x, y);
                } else {
                    self.long_press.moved(x, y);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.board.session.is_dragging() {
                    let target = self.layout.stage_at(x, y);
                    let mut sink = SqliteSink::new(self.conn);
                    let outcome = self.board.finish_drag(target, &mut sink);
                    if let Some(change) = outcome.change {
                        self.apply_change(change, outcome.error);
                    }
                } else {
                    self.long_press.release();
                }
            }
            // During a drag the auto-scroll engine owns the offset; wheel
            // input would fight it.
            MouseEventKind::ScrollLeft if !self.board.session.is_dragging() => {
                self.scroll_x = self.scroll_x.saturating_sub(WHEEL_STEP);
            }
            MouseEventKind::ScrollRight if !self.board.session.is_dragging() => {
                self.scroll_x = self
                    .scroll_x
                    .saturating_add(WHEEL_STEP)
                    .min(self.layout.max_scroll);
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::layout::StageZone;
    use crossterm::event::KeyModifiers;

    fn wheel(kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            column: 40,
            row: 5,
            modifiers: KeyModifiers::empty(),
        }
    }

    fn app_with_layout(conn: &Connection) -> BoardApp<'_> {
        let mut app = BoardApp::new(conn).unwrap();
        let mut layout = BoardLayout::new(BoardMode::Horizontal);
        layout.strip = Rect::new(0, 0, 80, 20);
        layout.max_scroll = 60;
        layout.zones.push(StageZone {
            stage: Stage::Applied,
            rect: Rect::new(0, 0, 40, 20),
        });
        app.layout = layout;
        app
    }

    #[test]
    fn test_wheel_scrolls_when_idle() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let mut app = app_with_layout(&conn);

        app.handle_mouse(wheel(MouseEventKind::ScrollRight)).unwrap();
        assert_eq!(app.scroll_x, WHEEL_STEP);
        app.handle_mouse(wheel(MouseEventKind::ScrollLeft)).unwrap();
        assert_eq!(app.scroll_x, 0);
    }

    #[test]
    fn test_wheel_ignored_while_dragging() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let mut app = app_with_layout(&conn);
        app.scroll_x = 20;
        app.board.begin_drag(&app.layout, 1, Stage::Applied, 5, 5);

        // The auto-scroll engine owns the offset for the whole gesture.
        app.handle_mouse(wheel(MouseEventKind::ScrollRight)).unwrap();
        app.handle_mouse(wheel(MouseEventKind::ScrollLeft)).unwrap();
        assert_eq!(app.scroll_x, 20);

        app.board.abort();
        app.handle_mouse(wheel(MouseEventKind::ScrollRight)).unwrap();
        assert_eq!(app.scroll_x, 24);
    }
}
