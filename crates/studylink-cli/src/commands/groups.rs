use studylink_api_models::{
    EntityId, StudyGroupCreateRequest, StudyGroupQuery, StudyGroupUpdateRequest,
};
use studylink_session::{Navigator, Route};

use super::require_non_empty;
use crate::cli::{GroupCreateArgs, GroupListArgs, GroupUpdateArgs, RecommendArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_group_detail, render_group_list, render_message, render_recommendations};

pub(crate) async fn handle_list(ctx: &AppContext, args: GroupListArgs) -> CliResult<()> {
    ctx.open(Route::Search)?;
    let query = StudyGroupQuery {
        region: args.region.filter(|region| !region.trim().is_empty()),
        sort: args.sort.map(Into::into),
        search: args.search.filter(|search| !search.trim().is_empty()),
    };
    let groups = ctx.api().list_study_groups(&query).await?;
    render_group_list(&groups, ctx.output)
}

pub(crate) async fn handle_show(ctx: &AppContext, id: EntityId) -> CliResult<()> {
    ctx.open(Route::StudyDetail(id))?;
    let detail = ctx.api().study_group(id).await?;
    render_group_detail(&detail, ctx.output)
}

pub(crate) async fn handle_create(ctx: &AppContext, args: GroupCreateArgs) -> CliResult<()> {
    ctx.open(Route::StudyCreate)?;
    let request = StudyGroupCreateRequest {
        title: require_non_empty(&args.title, "title")?,
        topic: require_non_empty(&args.topic, "topic")?,
        description: args.description,
        goal: args.goal,
        member_count: args.member_count,
        study_style: args.study_style.into(),
        region: args.region,
        tags: args.tags,
        required_career: args.required_career.map(Into::into),
        recruitment_deadline: args.deadline,
    };
    let created = ctx.api().create_study_group(&request).await?;
    ctx.navigator.navigate(Route::StudyDetail(created.id));
    render_group_detail(&created, ctx.output)
}

pub(crate) async fn handle_update(ctx: &AppContext, args: GroupUpdateArgs) -> CliResult<()> {
    ctx.open(Route::StudyEdit(args.id))?;
    let update = StudyGroupUpdateRequest {
        title: args.title,
        topic: args.topic,
        description: args.description,
        goal: args.goal,
        member_count: args.member_count,
        recruitment_deadline: args.deadline,
        region: args.region,
        study_style: args.study_style.map(Into::into),
        tags: args.tags,
    };
    if update.is_empty() {
        return Err(CliError::validation("no study group changes supplied"));
    }
    let updated = ctx.api().update_study_group(args.id, &update).await?;
    ctx.navigator.navigate(Route::StudyDetail(args.id));
    render_group_detail(&updated, ctx.output)
}

pub(crate) async fn handle_delete(ctx: &AppContext, id: EntityId) -> CliResult<()> {
    ctx.open(Route::StudyManage(id))?;
    let confirmation = ctx.api().delete_study_group(id).await?;
    ctx.navigator.navigate(Route::Home);
    render_message(&confirmation, ctx.output)
}

/// Recommendations live on the home page and only appear once signed in.
pub(crate) async fn handle_recommend(ctx: &AppContext, args: RecommendArgs) -> CliResult<()> {
    ctx.open(Route::Home)?;
    if !ctx.session.state().is_authenticated() {
        return Err(CliError::login_required(
            "recommendations are personalised; run `studylink login` first",
        ));
    }
    let groups = if args.v2 {
        ctx.api().recommended_study_groups_v2().await?
    } else {
        ctx.api().recommended_study_groups().await?
    };
    render_recommendations(&groups, ctx.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::{mock_profile, test_app};
    use anyhow::{Result, anyhow};
    use chrono::NaiveDate;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use serde_json::json;

    use crate::cli::StudyStyleArg;

    fn detail_body(id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "title": "Rust study",
            "topic": "systems",
            "description": "weekly reading",
            "goal": "ship a crate",
            "currentMemberCount": 1,
            "maxMemberCount": 4,
            "studyStyle": "ONLINE",
            "tags": ["rust"],
            "creatorId": 1,
            "creatorNickname": "ann",
            "recruitmentDeadline": "2026-12-01"
        })
    }

    #[tokio::test]
    async fn create_posts_payload_and_moves_to_detail() -> Result<()> {
        let server = MockServer::start_async().await;
        mock_profile(&server);
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/study-groups")
                .header("authorization", "Bearer tok-123")
                .json_body(json!({
                    "title": "Rust study",
                    "topic": "systems",
                    "description": "weekly reading",
                    "goal": "ship a crate",
                    "memberCount": 4,
                    "studyStyle": "ONLINE",
                    "tags": ["rust"],
                    "recruitmentDeadline": "2026-12-01"
                }));
            then.status(200).json_body(detail_body(21));
        });
        let app = test_app(&server, Some("tok-123"))?;
        app.ctx.session.initialize().await;

        let args = GroupCreateArgs {
            title: "Rust study".into(),
            topic: "systems".into(),
            description: "weekly reading".into(),
            goal: "ship a crate".into(),
            member_count: 4,
            study_style: StudyStyleArg::Online,
            deadline: NaiveDate::from_ymd_opt(2026, 12, 1).ok_or_else(|| anyhow!("date"))?,
            region: None,
            tags: vec!["rust".into()],
            required_career: None,
        };
        handle_create(&app.ctx, args)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        mock.assert();
        assert_eq!(app.ctx.navigator.current(), Route::StudyDetail(21));
        Ok(())
    }

    #[tokio::test]
    async fn empty_update_is_rejected_before_any_request() -> Result<()> {
        let server = MockServer::start_async().await;
        mock_profile(&server);
        let put = server.mock(|when, then| {
            when.method(PUT).path("/api/study-groups/21");
            then.status(200).json_body(detail_body(21));
        });
        let app = test_app(&server, Some("tok-123"))?;
        app.ctx.session.initialize().await;

        let args = GroupUpdateArgs {
            id: 21,
            title: None,
            topic: None,
            description: None,
            goal: None,
            member_count: None,
            deadline: None,
            region: None,
            study_style: None,
            tags: None,
        };
        let err = handle_update(&app.ctx, args)
            .await
            .err()
            .ok_or_else(|| anyhow!("expected validation error"))?;
        assert_eq!(err.exit_code(), 2);
        put.assert_calls(0);
        Ok(())
    }

    #[tokio::test]
    async fn recommendations_need_a_session() -> Result<()> {
        let server = MockServer::start_async().await;
        let app = test_app(&server, None)?;
        app.ctx.session.initialize().await;

        let err = handle_recommend(&app.ctx, RecommendArgs { v2: true })
            .await
            .err()
            .ok_or_else(|| anyhow!("expected login required"))?;
        assert_eq!(err.exit_code(), 4);
        Ok(())
    }

    #[tokio::test]
    async fn delete_conflict_is_reported_as_validation() -> Result<()> {
        let server = MockServer::start_async().await;
        mock_profile(&server);
        server.mock(|when, then| {
            when.method(DELETE).path("/api/study-groups/21");
            then.status(409).body("group still has members");
        });
        let app = test_app(&server, Some("tok-123"))?;
        app.ctx.session.initialize().await;

        let err = handle_delete(&app.ctx, 21)
            .await
            .err()
            .ok_or_else(|| anyhow!("expected conflict"))?;
        assert_eq!(err.display_message(), "group still has members");
        assert!(app.ctx.session.state().is_authenticated());
        Ok(())
    }
}
