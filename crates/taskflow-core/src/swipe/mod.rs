//! Swipe-to-act state machine for task rows.
//!
//! Framework independent: the view feeds drag offsets, commit and close
//! events in, and gets back which rows to close and which action to run.
//! At most one row is ever open.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::config::ClientConfig;

/// Drag distance, in logical pixels, that commits a direction
pub const DEFAULT_SWIPE_THRESHOLD: f64 = 60.0;

/// Which side panel a row reveals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    /// Revealed by dragging right; toggles completion
    Left,
    /// Revealed by dragging left; asks to delete
    Right,
}

impl SwipeDirection {
    /// Direction revealed by a horizontal drag offset
    pub fn from_offset(dx: f64) -> Option<Self> {
        if dx > 0.0 {
            Some(Self::Left)
        } else if dx < 0.0 {
            Some(Self::Right)
        } else {
            None
        }
    }

    pub const fn action(self) -> SwipeAction {
        match self {
            Self::Left => SwipeAction::ToggleComplete,
            Self::Right => SwipeAction::RequestDelete,
        }
    }
}

/// What the view should do once a direction commits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeAction {
    ToggleComplete,
    /// The view owns the confirmation step before deleting
    RequestDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowState {
    #[default]
    Closed,
    Opening,
    Open(SwipeDirection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEvent {
    Drag,
    Commit(SwipeDirection),
    Close,
}

impl RowState {
    /// Transition for a single row, ignoring every other row
    #[must_use]
    pub const fn next(self, event: RowEvent) -> Self {
        match (self, event) {
            (_, RowEvent::Close) => Self::Closed,
            (_, RowEvent::Commit(direction)) => Self::Open(direction),
            (Self::Open(direction), RowEvent::Drag) => Self::Open(direction),
            (Self::Closed | Self::Opening, RowEvent::Drag) => Self::Opening,
        }
    }

    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// Result of feeding one event to the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwipeOutcome<K> {
    /// Rows that were force-closed, in no particular order
    pub closed: Vec<K>,
    pub action: Option<SwipeAction>,
    /// The acting row should animate closed and report `on_close`
    pub close_requested: bool,
}

impl<K> Default for SwipeOutcome<K> {
    fn default() -> Self {
        Self {
            closed: Vec::new(),
            action: None,
            close_requested: false,
        }
    }
}

/// Tracks every visible row and keeps at most one of them open.
///
/// A committed direction fires its action once. The guard for that row and
/// direction is cleared only when the row reports that it fully closed.
#[derive(Debug, Clone)]
pub struct SwipeCoordinator<K> {
    threshold: f64,
    rows: HashMap<K, RowState>,
    triggered: HashSet<(K, SwipeDirection)>,
}

impl<K: Eq + Hash + Clone> Default for SwipeCoordinator<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone> SwipeCoordinator<K> {
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_SWIPE_THRESHOLD,
            rows: HashMap::new(),
            triggered: HashSet::new(),
        }
    }

    /// Uses the configured `swipe_threshold`
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new().with_threshold(config.swipe_threshold)
    }

    /// Non-positive or non-finite thresholds fall back to the default
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = if threshold.is_finite() && threshold > 0.0 {
            threshold
        } else {
            DEFAULT_SWIPE_THRESHOLD
        };
        self
    }

    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn state(&self, row: &K) -> RowState {
        self.rows.get(row).copied().unwrap_or_default()
    }

    /// The row currently opening or open, if any
    pub fn open_row(&self) -> Option<&K> {
        self.rows
            .iter()
            .find(|(_, state)| !state.is_closed())
            .map(|(row, _)| row)
    }

    /// Feed a drag offset; commits once `|dx|` reaches the threshold
    pub fn on_drag_update(&mut self, row: &K, dx: f64) -> SwipeOutcome<K> {
        let Some(direction) = SwipeDirection::from_offset(dx) else {
            return SwipeOutcome::default();
        };

        let current = self.state(row);
        let mut outcome = SwipeOutcome::default();
        if current.is_closed() {
            outcome.closed = self.close_others(row);
        }
        self.rows.insert(row.clone(), current.next(RowEvent::Drag));

        if dx.abs() >= self.threshold && !matches!(current, RowState::Open(_)) {
            let committed = self.on_commit(row, direction);
            outcome.closed.extend(committed.closed);
            outcome.action = committed.action;
            outcome.close_requested = committed.close_requested;
        }
        outcome
    }

    /// Open `row` in `direction` and fire its action unless already fired.
    ///
    /// A row that is already open stays as it is until it closes, whichever
    /// direction is committed.
    pub fn on_commit(&mut self, row: &K, direction: SwipeDirection) -> SwipeOutcome<K> {
        if let RowState::Open(open) = self.state(row) {
            tracing::debug!("Ignoring {direction:?} commit on a row open {open:?}");
            return SwipeOutcome::default();
        }

        let closed = self.close_others(row);
        let state = self.state(row).next(RowEvent::Commit(direction));
        self.rows.insert(row.clone(), state);

        if self.triggered.insert((row.clone(), direction)) {
            tracing::debug!("Swipe {direction:?} committed");
            SwipeOutcome {
                closed,
                action: Some(direction.action()),
                close_requested: true,
            }
        } else {
            SwipeOutcome {
                closed,
                ..SwipeOutcome::default()
            }
        }
    }

    /// The row finished closing; its actions may fire again
    pub fn on_close(&mut self, row: &K) {
        if let Some(state) = self.rows.get_mut(row) {
            *state = state.next(RowEvent::Close);
        }
        self.triggered.retain(|(key, _)| key != row);
    }

    /// Forget a row that left the list
    pub fn remove_row(&mut self, row: &K) {
        self.rows.remove(row);
        self.triggered.retain(|(key, _)| key != row);
    }

    fn close_others(&mut self, keep: &K) -> Vec<K> {
        let others: Vec<K> = self
            .rows
            .iter()
            .filter(|(row, state)| *row != keep && !state.is_closed())
            .map(|(row, _)| row.clone())
            .collect();
        for row in &others {
            self.on_close(row);
        }
        others
    }
}
