use studylink_api_models::ProfileUpdateRequest;
use studylink_session::{Navigator, Route};

use crate::cli::ProfileUpdateArgs;
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_member_applications, render_message, render_my_groups, render_profile};

pub(crate) async fn handle_profile(ctx: &AppContext) -> CliResult<()> {
    ctx.open(Route::MyPage)?;
    let profile = ctx.api().my_profile().await?;
    render_profile(&profile, ctx.output)
}

pub(crate) async fn handle_update(ctx: &AppContext, args: ProfileUpdateArgs) -> CliResult<()> {
    ctx.open(Route::ProfileEdit)?;
    let update = ProfileUpdateRequest {
        nickname: args.nickname,
        career: args.career.map(Into::into),
        job: args.job,
        goal: args.goal,
        study_style: args.study_style.map(Into::into),
        tags: args.tags,
        region: args.region,
    };
    if update.is_empty() {
        return Err(CliError::validation("no profile changes supplied"));
    }
    let confirmation = ctx.api().update_my_profile(&update).await?;
    ctx.navigator.navigate(Route::MyPage);
    render_message(&confirmation, ctx.output)
}

pub(crate) async fn handle_applications(ctx: &AppContext) -> CliResult<()> {
    ctx.open(Route::MyPage)?;
    let applications = ctx.api().my_applications().await?;
    render_member_applications(&applications, ctx.output)
}

pub(crate) async fn handle_groups(ctx: &AppContext) -> CliResult<()> {
    ctx.open(Route::MyPage)?;
    let groups = ctx.api().my_study_groups().await?;
    render_my_groups(&groups, ctx.output)
}

pub(crate) async fn handle_created(ctx: &AppContext) -> CliResult<()> {
    ctx.open(Route::MyPage)?;
    let groups = ctx.api().my_created_study_groups().await?;
    render_my_groups(&groups, ctx.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CareerArg;
    use crate::cli::tests::{mock_profile, test_app};
    use anyhow::{Result, anyhow};
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn update_sends_sparse_body_and_returns_to_mypage() -> Result<()> {
        let server = MockServer::start_async().await;
        mock_profile(&server);
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/api/members/me")
                .json_body(json!({"career": "SENIOR", "region": "Busan"}));
            then.status(200).body("profile updated");
        });
        let app = test_app(&server, Some("tok-123"))?;
        app.ctx.session.initialize().await;

        let args = ProfileUpdateArgs {
            nickname: None,
            career: Some(CareerArg::Senior),
            job: None,
            goal: None,
            study_style: None,
            tags: None,
            region: Some("Busan".into()),
        };
        handle_update(&app.ctx, args)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        mock.assert();
        assert_eq!(app.ctx.navigator.current(), Route::MyPage);
        Ok(())
    }

    #[tokio::test]
    async fn created_groups_render() -> Result<()> {
        let server = MockServer::start_async().await;
        mock_profile(&server);
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/members/me/created-study-groups");
            then.status(200).json_body(json!([]));
        });
        let app = test_app(&server, Some("tok-123"))?;
        app.ctx.session.initialize().await;

        handle_created(&app.ctx)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        mock.assert();
        Ok(())
    }
}
