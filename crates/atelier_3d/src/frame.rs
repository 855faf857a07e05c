//! Frame scheduling
//!
//! The render loop is cooperative: each tick schedules the next one
//! through a [`FrameScheduler`]. Scheduling returns a cancellable
//! [`FrameHandle`]; the scene manager stores the pending handle and
//! cancels it on disposal so no frame runs after teardown.

use std::cell::Cell;
use std::rc::Rc;

/// Handle to one scheduled frame
///
/// Cloned handles share the cancellation flag: the scheduler backend
/// keeps one side and checks `is_cancelled` before dispatching the
/// tick.
#[derive(Clone, Debug, Default)]
pub struct FrameHandle {
    cancelled: Rc<Cell<bool>>,
}

impl FrameHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the scheduled frame
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Schedules render-loop ticks
///
/// The windowed backend maps this to redraw requests; tests use a
/// recording implementation.
pub trait FrameScheduler {
    /// Request one tick, returning a cancellable handle for it
    fn request_frame(&mut self) -> FrameHandle;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_is_shared_between_clones() {
        let handle = FrameHandle::new();
        let backend_side = handle.clone();
        assert!(!backend_side.is_cancelled());
        handle.cancel();
        assert!(backend_side.is_cancelled());
    }
}
