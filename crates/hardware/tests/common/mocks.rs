//! Writeback sink doubles.

use std::sync::{Arc, Mutex};

use cachesim_core::{Eviction, WritebackSink};
use mockall::mock;

mock! {
    pub Sink {}
    impl WritebackSink for Sink {
        fn writeback(&mut self, eviction: &Eviction);
    }
}

/// Sink that records every writeback into a shared log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub log: Arc<Mutex<Vec<Eviction>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Eviction> {
        self.log.lock().unwrap().clone()
    }
}

impl WritebackSink for RecordingSink {
    fn writeback(&mut self, eviction: &Eviction) {
        self.log.lock().unwrap().push(*eviction);
    }
}
