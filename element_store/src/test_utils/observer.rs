// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::Mutex;

use crate::observer::{StoreEvent, StoreObserver};

/// Observer keeping every event it receives so tests can assert on them.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<StoreEvent>>,
}

impl RecordingObserver {
    /// Returns a copy of all recorded events.
    pub fn events(&self) -> Vec<StoreEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Returns all recorded events and forgets them.
    pub fn take(&self) -> Vec<StoreEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl StoreObserver for RecordingObserver {
    fn on_event(&self, event: &StoreEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
