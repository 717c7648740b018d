//! Mock source for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use marksheet_core::table::Row;
use marksheet_core::traits::SheetSource;
use marksheet_core::SourceError;

/// An in-memory sheet for exercising lookups without a real backend.
///
/// Unknown ranges fail with `RangeNotFound`; a source built with
/// [`MockSource::failing`] fails every request.
pub struct MockSource {
    /// Map of range → rows.
    ranges: HashMap<String, Vec<Row>>,
    /// Message for the network error returned by a failing mock.
    failure: Option<String>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Ranges requested, in call order.
    requested: Mutex<Vec<String>>,
}

impl MockSource {
    /// Create a mock serving the given ranges.
    pub fn new(ranges: HashMap<String, Vec<Row>>) -> Self {
        Self {
            ranges,
            failure: None,
            call_count: AtomicU32::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock whose every fetch fails with a network error.
    pub fn failing(message: &str) -> Self {
        Self {
            ranges: HashMap::new(),
            failure: Some(message.to_string()),
            call_count: AtomicU32::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Add or replace a range.
    pub fn with_range(mut self, range: &str, rows: Vec<Row>) -> Self {
        self.ranges.insert(range.to_string(), rows);
        self
    }

    /// Get the number of calls made to this source.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Ranges requested so far.
    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SheetSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_range(&self, range: &str) -> anyhow::Result<Vec<Row>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(range.to_string());
        }

        if let Some(message) = &self.failure {
            return Err(SourceError::Network(message.clone()).into());
        }

        self.ranges
            .get(range)
            .cloned()
            .ok_or_else(|| SourceError::RangeNotFound(range.to_string()).into())
    }
}
