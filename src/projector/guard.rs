//! Scoped ownership of a feature cursor during a projection
//!
//! State machine: `Idle -> Iterating -> Done`. The guard closes the cursor
//! exactly once, either through `finish` or on drop when an error unwinds
//! the projection early.

use crate::feature::{FeatureCursor, StoreResult};
use crate::observability::{log_event_with_fields, Event};

/// Projection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionState {
    Idle,
    Iterating,
    Done,
}

pub(crate) struct CursorGuard<'a, C: FeatureCursor> {
    cursor: &'a mut C,
    state: ProjectionState,
}

impl<'a, C: FeatureCursor> CursorGuard<'a, C> {
    pub(crate) fn new(cursor: &'a mut C) -> Self {
        Self {
            cursor,
            state: ProjectionState::Idle,
        }
    }

    pub(crate) fn state(&self) -> ProjectionState {
        self.state
    }

    pub(crate) fn begin(&mut self) {
        debug_assert_eq!(self.state(), ProjectionState::Idle);
        self.state = ProjectionState::Iterating;
    }

    pub(crate) fn has_next(&mut self) -> StoreResult<bool> {
        self.cursor.has_next()
    }

    pub(crate) fn next(&mut self) -> StoreResult<C::Item> {
        self.cursor.next()
    }

    /// Close the cursor and move to `Done`
    pub(crate) fn finish(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.state == ProjectionState::Done {
            return;
        }
        let from = self.state;
        self.cursor.close();
        self.state = ProjectionState::Done;

        let from = format!("{:?}", from);
        log_event_with_fields(Event::CursorClosed, &[("from_state", from.as_str())]);
    }
}

impl<C: FeatureCursor> Drop for CursorGuard<'_, C> {
    fn drop(&mut self) {
        self.release();
    }
}
