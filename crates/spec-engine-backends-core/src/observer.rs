//! Call observation hooks.

use spec_engine_common_log::{CallEvent, RunLogger};

/// Receives one event per completion call.
pub trait CallObserver: Send + Sync {
    fn on_call(&self, event: CallEvent);
}

impl CallObserver for RunLogger {
    fn on_call(&self, event: CallEvent) {
        self.record(event);
    }
}
