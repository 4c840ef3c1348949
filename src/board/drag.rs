//! Drag gesture state machine.
//!
//! A drag is well-formed as `start`, any number of `move_to`/`enter`/`leave`,
//! then exactly one of `drop_on` or `cancel`. Event ordering from the terminal
//! is not fully controllable, so out-of-order transitions are ignored (logged
//! at debug level) rather than treated as errors.

use anyhow::Result;
use log::debug;

use crate::models::Stage;

/// Consumer of committed stage changes. The board invokes this exactly once
/// per drop that lands on a different stage; persistence sits behind it.
pub trait StatusSink {
    fn update_status(&mut self, id: i64, to: Stage) -> Result<()>;
}

/// A stage move produced by a completed drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageChange {
    pub id: i64,
    pub to: Stage,
}

#[derive(Debug)]
struct ActiveDrag {
    id: i64,
    origin: Stage,
    hovered: Option<Stage>,
    /// Per-stage enter refcount. Crossing into a nested element of a column
    /// produces another enter for the same stage; the column stays hovered
    /// while its count is above zero. Saturating so a spurious extra leave
    /// cannot wrap.
    enters: [u16; Stage::COUNT],
    last_pointer_x: u16,
}

/// Ephemeral state for one drag gesture. Exists only between `start` and the
/// terminal `drop_on`/`cancel`; owns no long-lived resources.
#[derive(Debug, Default)]
pub struct DragSession {
    active: Option<ActiveDrag>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn dragged_id(&self) -> Option<i64> {
        self.active.as_ref().map(|d| d.id)
    }

    pub fn origin_stage(&self) -> Option<Stage> {
        self.active.as_ref().map(|d| d.origin)
    }

    pub fn hovered_stage(&self) -> Option<Stage> {
        self.active.as_ref().and_then(|d| d.hovered)
    }

    pub fn last_pointer_x(&self) -> Option<u16> {
        self.active.as_ref().map(|d| d.last_pointer_x)
    }

    /// Begin a drag. A session that is somehow still active is forcibly
    /// cancelled first.
    pub fn start(&mut self, id: i64, origin: Stage, pointer_x: u16) {
        if self.active.is_some() {
            debug!("drag start while a session is active; cancelling prior session");
            self.cancel();
        }
        self.active = Some(ActiveDrag {
            id,
            origin,
            hovered: None,
            enters: [0; Stage::COUNT],
            last_pointer_x: pointer_x,
        });
    }

    /// Record pointer movement. Feeds auto-scroll only; no reassignment here.
    pub fn move_to(&mut self, pointer_x: u16) {
        match self.active.as_mut() {
            Some(drag) => drag.last_pointer_x = pointer_x,
            None => debug!("drag move with no active session; ignored"),
        }
    }

    /// Pointer crossed into a drop zone (or a nested element of one).
    pub fn enter(&mut self, stage: Stage) {
        let Some(drag) = self.active.as_mut() else {
            debug!("drag enter({:?}) with no active session; ignored", stage);
            return;
        };
        drag.enters[stage.index()] = drag.enters[stage.index()].saturating_add(1);
        if drag.enters[stage.index()] > 0 {
            drag.hovered = Some(stage);
        }
    }

    /// Pointer crossed out of a drop zone (or a nested element of one).
    pub fn leave(&mut self, stage: Stage) {
        let Some(drag) = self.active.as_mut() else {
            debug!("drag leave({:?}) with no active session; ignored", stage);
            return;
        };
        drag.enters[stage.index()] = drag.enters[stage.index()].saturating_sub(1);
        if drag.enters[stage.index()] == 0 && drag.hovered == Some(stage) {
            drag.hovered = None;
        }
    }

    /// Complete the gesture on a drop zone. Returns the stage change to
    /// commit, or `None` when the drop targets the record's current stage
    /// (a deliberate no-op, not an error). Either way the session resets.
    #[must_use]
    pub fn drop_on(&mut self, stage: Stage) -> Option<StageChange> {
        let Some(drag) = self.active.take() else {
            debug!("drop({:?}) with no active session; ignored", stage);
            return None;
        };
        if stage == drag.origin {
            return None;
        }
        Some(StageChange { id: drag.id, to: stage })
    }

    /// Terminate the gesture without a drop (released outside any zone,
    /// escape pressed, or teardown mid-drag).
    pub fn cancel(&mut self) {
        if self.active.take().is_none() {
            debug!("drag cancel with no active session; ignored");
        }
    }
}
