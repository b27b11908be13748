use studylink_api_models::{
    MemberApplication, MyStudyGroup, ProfileUpdateRequest, StudyGroupSummary, UserProfile,
};

use super::MEMBERS_ME;
use crate::error::ApiResult;
use crate::pipeline::ApiClient;

impl ApiClient {
    /// Profile of the member the credential belongs to.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) on any pipeline failure.
    pub async fn my_profile(&self) -> ApiResult<UserProfile> {
        self.get_json(MEMBERS_ME).await
    }

    /// Apply a sparse profile update.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) on any pipeline failure.
    pub async fn update_my_profile(&self, update: &ProfileUpdateRequest) -> ApiResult<String> {
        self.put_text(MEMBERS_ME, update).await
    }

    /// Applications the member has submitted.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) on any pipeline failure.
    pub async fn my_applications(&self) -> ApiResult<Vec<MemberApplication>> {
        self.get_json(&format!("{MEMBERS_ME}/applications")).await
    }

    /// Groups the member participates in.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) on any pipeline failure.
    pub async fn my_study_groups(&self) -> ApiResult<Vec<MyStudyGroup>> {
        self.get_json(&format!("{MEMBERS_ME}/study-groups")).await
    }

    /// Groups the member created.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) on any pipeline failure.
    pub async fn my_created_study_groups(&self) -> ApiResult<Vec<MyStudyGroup>> {
        self.get_json(&format!("{MEMBERS_ME}/created-study-groups"))
            .await
    }

    /// Groups the member marked as interesting, newest first.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) on any pipeline failure.
    pub async fn my_interests(&self) -> ApiResult<Vec<StudyGroupSummary>> {
        self.get_json(&format!("{MEMBERS_ME}/interests")).await
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::services::tests::signed_in_client;

    #[tokio::test]
    async fn profile_update_sends_only_present_fields() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/api/members/me")
                .header("authorization", "Bearer tok-123")
                .json_body(json!({"nickname": "ann", "tags": ["rust"]}));
            then.status(200).body("profile updated");
        });
        let api = signed_in_client(&server)?;

        let update = ProfileUpdateRequest {
            nickname: Some("ann".into()),
            tags: Some(vec!["rust".into()]),
            ..ProfileUpdateRequest::default()
        };
        assert_eq!(api.update_my_profile(&update).await?, "profile updated");
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn my_study_groups_decode() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/members/me/created-study-groups");
            then.status(200).json_body(json!([{
                "id": 4,
                "title": "Rust study",
                "topic": "systems",
                "currentParticipants": 2,
                "maxParticipants": 5,
                "recruitmentDeadline": "2026-12-01"
            }]));
        });
        let api = signed_in_client(&server)?;

        let groups = api.my_created_study_groups().await?;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].max_participants, 5);
        Ok(())
    }
}
