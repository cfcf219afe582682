//! The callback seam consumed by the chat front end.

use crate::{Progress, StreamEvent};

/// Receives progress and streaming events from a run.
///
/// Both methods are called inline on the run's task and must not block.
/// Rate limiting of `FileDiscovered` is the implementor's concern; the
/// pipeline emits every event.
pub trait Observer: Send + Sync {
    /// A coarse step/percentage report.
    fn on_progress(&self, _progress: &Progress) {}

    /// A streaming event.
    fn on_stream(&self, _event: &StreamEvent) {}
}

/// `()` ignores every event.
impl Observer for () {}

impl<O: Observer + ?Sized> Observer for &O {
    fn on_progress(&self, progress: &Progress) {
        (**self).on_progress(progress)
    }

    fn on_stream(&self, event: &StreamEvent) {
        (**self).on_stream(event)
    }
}
