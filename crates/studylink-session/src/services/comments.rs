use studylink_api_models::{Comment, CommentRequest, EntityId};

use super::study_group_path;
use crate::error::ApiResult;
use crate::pipeline::ApiClient;

impl ApiClient {
    /// Comment threads of a group, top-level comments with their replies.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) on any pipeline failure.
    pub async fn comments_for_study_group(&self, group_id: EntityId) -> ApiResult<Vec<Comment>> {
        self.get_json(&format!("{}/comments", study_group_path(group_id)))
            .await
    }

    /// Post a comment, or a reply when `request.parent_id` is set.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) on any pipeline failure.
    pub async fn create_comment(
        &self,
        group_id: EntityId,
        request: &CommentRequest,
    ) -> ApiResult<Comment> {
        self.post_json(&format!("{}/comments", study_group_path(group_id)), request)
            .await
    }

    /// Delete one of the member's own comments.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) on any pipeline failure.
    pub async fn delete_comment(&self, comment_id: EntityId) -> ApiResult<String> {
        self.delete_text(&format!("/api/comments/{comment_id}"))
            .await
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
    async fn replies_carry_parent_id() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/study-groups/5/comments")
                .json_body(json!({"content": "me too", "parentId": 12}));
            then.status(200).json_body(json!({
                "id": 13,
                "content": "me too",
                "authorNickname": "ann",
                "authorId": 1,
                "createdAt": "2026-10-01T12:00:00",
                "children": []
            }));
        });
        let api = signed_in_client(&server)?;

        let request = CommentRequest {
            content: "me too".into(),
            parent_id: Some(12),
        };
        let comment = api.create_comment(5, &request).await?;
        assert_eq!(comment.id, 13);
        mock.assert();
        Ok(())
    }
}
