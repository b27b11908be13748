use studylink_api_models::{
    EntityId, RecommendedStudyGroup, StudyGroupCreateRequest, StudyGroupDetail, StudyGroupQuery,
    StudyGroupSummary, StudyGroupUpdateRequest,
};

use super::{STUDY_GROUPS, study_group_path};
use crate::error::ApiResult;
use crate::pipeline::ApiClient;

impl ApiClient {
    /// Public listing filtered by region, keyword and ordering.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) on any pipeline failure.
    pub async fn list_study_groups(
        &self,
        query: &StudyGroupQuery,
    ) -> ApiResult<Vec<StudyGroupSummary>> {
        self.get_json_query(STUDY_GROUPS, query).await
    }

    /// Full detail of one group.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) on any pipeline failure.
    pub async fn study_group(&self, id: EntityId) -> ApiResult<StudyGroupDetail> {
        self.get_json(&study_group_path(id)).await
    }

    /// Create a group owned by the current member.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) on any pipeline failure.
    pub async fn create_study_group(
        &self,
        request: &StudyGroupCreateRequest,
    ) -> ApiResult<StudyGroupDetail> {
        self.post_json(STUDY_GROUPS, request).await
    }

    /// Apply a sparse update to a group the member owns.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) on any pipeline failure.
    pub async fn update_study_group(
        &self,
        id: EntityId,
        update: &StudyGroupUpdateRequest,
    ) -> ApiResult<StudyGroupDetail> {
        self.put_json(&study_group_path(id), update).await
    }

    /// Delete a group the member owns.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) on any pipeline failure.
    pub async fn delete_study_group(&self, id: EntityId) -> ApiResult<String> {
        self.delete_text(&study_group_path(id)).await
    }

    /// Tag-based recommendations for the current member.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) on any pipeline failure.
    pub async fn recommended_study_groups(&self) -> ApiResult<Vec<RecommendedStudyGroup>> {
        self.get_json(&format!("{STUDY_GROUPS}/recommendations"))
            .await
    }

    /// Weighted recommendations (tags, region, style and career).
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) on any pipeline failure.
    pub async fn recommended_study_groups_v2(&self) -> ApiResult<Vec<RecommendedStudyGroup>> {
        self.get_json(&format!("{STUDY_GROUPS}/recommendations/v2"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use serde_json::json;
    use studylink_api_models::StudyGroupSort;

    use super::*;
    use crate::services::tests::signed_in_client;

    #[tokio::test]
    async fn listing_forwards_only_set_filters() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/study-groups")
                .query_param("sort", "deadline")
                .query_param("search", "rust");
            then.status(200).json_body(json!([{
                "id": 9,
                "title": "Rust",
                "topic": "lang",
                "creatorNickname": "ann",
                "recruitmentDeadline": "2026-11-30",
                "region": null
            }]));
        });
        let api = signed_in_client(&server)?;

        let query = StudyGroupQuery {
            sort: Some(StudyGroupSort::Deadline),
            search: Some("rust".into()),
            ..StudyGroupQuery::default()
        };
        let groups = api.list_study_groups(&query).await?;
        assert_eq!(groups[0].id, 9);
        assert_eq!(groups[0].creator_nickname, "ann");
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn recommendations_keep_match_score() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/study-groups/recommendations/v2");
            then.status(200).json_body(json!([{
                "id": 2,
                "title": "Algorithms",
                "topic": "cs",
                "creatorNickname": "bo",
                "recruitmentDeadLine": "2026-11-01",
                "matchScore": 0.75
            }]));
        });
        let api = signed_in_client(&server)?;

        let groups = api.recommended_study_groups_v2().await?;
        assert!((groups[0].match_score - 0.75).abs() < f64::EPSILON);
        Ok(())
    }

    #[tokio::test]
    async fn delete_returns_confirmation_text() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(DELETE).path("/api/study-groups/7");
            then.status(200).body("deleted");
        });
        let api = signed_in_client(&server)?;
        assert_eq!(api.delete_study_group(7).await?, "deleted");
        Ok(())
    }
}
