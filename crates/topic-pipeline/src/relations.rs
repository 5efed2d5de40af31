//! Source of the flattened topic co-occurrence matrix.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use topic_enrich::SourceError;
use topic_types::RelationRow;

/// Fetches relation rows (`"A&B"` keys with co-occurrence counts).
#[async_trait]
pub trait RelationSource: Send + Sync {
    async fn relations(&self) -> Result<Vec<RelationRow>, SourceError>;
}

/// Mock relation source for testing.
#[derive(Default)]
pub struct MockRelationSource {
    pub rows: Vec<RelationRow>,
    /// Latency applied to successive calls; once drained, calls return at once
    delays: Mutex<VecDeque<Duration>>,
    pub should_fail: bool,
    /// Succeed this many times, then fail
    pub fail_after: Option<usize>,
    calls: AtomicUsize,
}

impl MockRelationSource {
    pub fn new(rows: Vec<RelationRow>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    pub fn with_row(mut self, key: impl Into<String>, doc_count: u64) -> Self {
        self.rows.push(RelationRow::new(key, doc_count));
        self
    }

    /// Queue a delay for the next not-yet-delayed call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        if let Ok(delays) = self.delays.get_mut() {
            delays.push_back(delay);
        }
        self
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    pub fn with_fail_after(mut self, successes: usize) -> Self {
        self.fail_after = Some(successes);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RelationSource for MockRelationSource {
    async fn relations(&self) -> Result<Vec<RelationRow>, SourceError> {
        let served = self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = self.delays.lock().ok().and_then(|mut d| d.pop_front());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.should_fail || self.fail_after.is_some_and(|n| served >= n) {
            return Err(SourceError::Unavailable("relation source failed".to_string()));
        }

        Ok(self.rows.clone())
    }
}
