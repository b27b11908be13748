use studylink_api_models::{ApplicationRequest, EntityId};
use studylink_session::Route;

use super::require_non_empty;
use crate::cli::{ApplyArgs, ProcessArgs};
use crate::client::{AppContext, CliResult};
use crate::output::{render_applications, render_message};

pub(crate) async fn handle_apply(ctx: &AppContext, args: ApplyArgs) -> CliResult<()> {
    ctx.open(Route::StudyDetail(args.id))?;
    let request = ApplicationRequest {
        message: require_non_empty(&args.message, "message")?,
    };
    let confirmation = ctx.api().apply_to_study_group(args.id, &request).await?;
    render_message(&confirmation, ctx.output)
}

pub(crate) async fn handle_list(ctx: &AppContext, group_id: EntityId) -> CliResult<()> {
    ctx.open(Route::StudyManage(group_id))?;
    let applications = ctx.api().applications_for_study_group(group_id).await?;
    render_applications(&applications, ctx.output)
}

pub(crate) async fn handle_process(ctx: &AppContext, args: ProcessArgs) -> CliResult<()> {
    ctx.open(Route::StudyManage(args.group_id))?;
    let confirmation = ctx
        .api()
        .process_application(args.group_id, args.application_id, args.decision.into())
        .await?;
    render_message(&confirmation, ctx.output)
}
