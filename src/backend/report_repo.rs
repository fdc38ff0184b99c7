//! Problem reports in the `match_reports` table.

use std::sync::Arc;

use serde_json::json;

use super::Backend;
use crate::Result;

const TABLE: &str = "match_reports";

/// Repository wrapper for problem reports.
#[derive(Clone)]
pub struct ReportRepo {
    backend: Arc<dyn Backend>,
}

impl ReportRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// File a report for moderation follow-up.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Persistence` if the insert fails.
    pub async fn file(&self, match_id: &str, reporter_id: &str) -> Result<()> {
        self.backend
            .insert(
                TABLE,
                json!({ "match_id": match_id, "reporter_id": reporter_id, "reason": "report" }),
            )
            .await
            .map(|_| ())
    }
}
