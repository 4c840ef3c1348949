//! The pipeline board core: grouping, drag state, auto-scroll and rendering.

pub mod autoscroll;
pub mod card;
pub mod drag;
pub mod grouper;
pub mod layout;
pub mod view;

pub use autoscroll::{AutoScrollConfig, AutoScrollEngine, ScrollTick};
pub use drag::{DragSession, StageChange, StatusSink};
pub use grouper::group_by_stage;
pub use layout::{BoardLayout, BoardMode, ZoneTracker};

/// Result of completing a drag gesture.
#[derive(Debug)]
pub struct DropOutcome {
    /// The stage move that was applied visually, if any.
    pub change: Option<StageChange>,
    /// Persistence failure, if the sink rejected the move. The visual state
    /// is not rolled back; reconciliation happens on the next reload.
    pub error: Option<String>,
}

/// Everything a drag gesture touches, bundled so every session-ending path
/// performs the same cleanup: session reset, scroll loop stopped, zone
/// tracker cleared.
#[derive(Debug, Default)]
pub struct BoardState {
    pub session: DragSession,
    pub engine: AutoScrollEngine,
    pub tracker: ZoneTracker,
}

impl BoardState {
    pub fn new(config: AutoScrollConfig) -> Self {
        Self {
            engine: AutoScrollEngine::new(config),
            ..Self::default()
        }
    }

    /// Start a drag on a card and the auto-scroll loop with it. The initial
    /// pointer position is hit-tested immediately so the origin column
    /// counts as entered.
    pub fn begin_drag(&mut self, layout: &BoardLayout, id: i64, origin: crate::models::Stage, x: u16, y: u16) {
        self.session.start(id, origin, x);
        self.engine.start();
        self.tracker.clear();
        self.tracker.update(layout, x, y, &mut self.session);
    }

    /// Feed a drag-move: pointer X for auto-scroll, plus any boundary
    /// crossings for the hover state.
    pub fn pointer_moved(&mut self, layout: &BoardLayout, x: u16, y: u16) {
        if !self.session.is_dragging() {
            return;
        }
        self.session.move_to(x);
        self.tracker.update(layout, x, y, &mut self.session);
    }

    /// Complete the gesture. `target` is the drop zone under the release
    /// point, or `None` for a release outside every zone (a cancel). When a
    /// stage change results, the sink is invoked exactly once; a sink
    /// failure is reported in the outcome but does not undo the change.
    pub fn finish_drag(
        &mut self,
        target: Option<crate::models::Stage>,
        sink: &mut dyn StatusSink,
    ) -> DropOutcome {
        let change = match target {
            Some(stage) => self.session.drop_on(stage),
            None => {
                self.session.cancel();
                None
            }
        };
        self.engine.stop();
        self.tracker.clear();

        let mut error = None;
        if let Some(change) = &change {
            if let Err(e) = sink.update_status(change.id, change.to) {
                log::error!("failed to persist stage change for {}: {:#}", change.id, e);
                error = Some(format!("{:#}", e));
            }
        }
        DropOutcome { change, error }
    }

    /// Cancel without a drop: escape, focus loss, or board teardown
    /// mid-drag. Safe to call when idle.
    pub fn abort(&mut self) {
        if self.session.is_dragging() {
            self.session.cancel();
        }
        self.engine.stop();
        self.tracker.clear();
    }

    /// Run one auto-scroll frame against the current layout.
    pub fn autoscroll_frame(&mut self, layout: &BoardLayout, scroll: &mut u16) -> ScrollTick {
        let Some(pointer_x) = self.session.last_pointer_x() else {
            return ScrollTick::Stop;
        };
        self.engine.frame(pointer_x, layout.strip, scroll, layout.max_scroll)
    }
}
