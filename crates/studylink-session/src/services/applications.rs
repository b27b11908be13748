use studylink_api_models::{
    ApplicationDecision, ApplicationProcessRequest, ApplicationRequest, ApplicationSummary,
    EntityId,
};

use super::study_group_path;
use crate::error::ApiResult;
use crate::pipeline::ApiClient;

impl ApiClient {
    /// Apply to join a group.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError); repeated applications surface as 409.
    pub async fn apply_to_study_group(
        &self,
        group_id: EntityId,
        request: &ApplicationRequest,
    ) -> ApiResult<String> {
        self.post_text(&format!("{}/applications", study_group_path(group_id)), request)
            .await
    }

    /// Applications received by a group the member owns.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) on any pipeline failure.
    pub async fn applications_for_study_group(
        &self,
        group_id: EntityId,
    ) -> ApiResult<Vec<ApplicationSummary>> {
        self.get_json(&format!("{}/applications", study_group_path(group_id)))
            .await
    }

    /// Accept or reject an application.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) on any pipeline failure.
    pub async fn process_application(
        &self,
        group_id: EntityId,
        application_id: EntityId,
        decision: ApplicationDecision,
    ) -> ApiResult<String> {
        let path = format!(
            "{}/applications/{application_id}/process",
            study_group_path(group_id)
        );
        self.post_text(&path, &ApplicationProcessRequest { status: decision })
            .await
    }
}
