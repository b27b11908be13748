use studylink_api_models::{EntityId, InterestToggle};

use super::study_group_path;
use crate::error::ApiResult;
use crate::pipeline::ApiClient;

impl ApiClient {
    /// Flip the member's interest in a group and report the new value.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) on any pipeline failure.
    pub async fn toggle_interest(&self, group_id: EntityId) -> ApiResult<InterestToggle> {
        self.post_json(
            &format!("{}/interest", study_group_path(group_id)),
            &serde_json::Value::Null,
        )
        .await
    }
}
