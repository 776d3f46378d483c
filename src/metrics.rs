use std::time::Instant;

use tonic::{Code, Status};
use tracing::{info, warn};
use uuid::Uuid;

/// Length of the ids attached to RPC spans.
pub const REQUEST_ID_LEN: usize = 8;

/// Times one RPC and logs its duration and status code when dropped.
///
/// ```ignore
/// let mut timer = OperationTimer::new("update_sort");
/// let result = handlers::item_sort::update_sort(&store, req).await;
/// timer.observe(&result);
/// result
/// ```
pub struct OperationTimer {
    operation: &'static str,
    start: Instant,
    code: Code,
}

impl OperationTimer {
    #[must_use]
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
            code: Code::Ok,
        }
    }

    /// Remember the status code the operation finished with.
    pub fn observe<T>(&mut self, result: &Result<T, Status>) {
        self.code = result.as_ref().map_or_else(Status::code, |_| Code::Ok);
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let duration_ms = self.start.elapsed().as_millis();
        if self.code == Code::Ok {
            info!(operation = self.operation, duration_ms = %duration_ms, "Operation completed");
        } else {
            warn!(
                operation = self.operation,
                duration_ms = %duration_ms,
                code = ?self.code,
                "Operation rejected"
            );
        }
    }
}

/// Short random hex id used to correlate the log lines of one request.
#[must_use]
pub fn generate_request_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(REQUEST_ID_LEN);
    id
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod metrics_tests;
