use std::slice;

use studylink_api_models::{CommentRequest, EntityId};
use studylink_session::Route;

use super::require_non_empty;
use crate::cli::{CommentAddArgs, CommentDeleteArgs};
use crate::client::{AppContext, CliResult};
use crate::output::{render_comments, render_message};

pub(crate) async fn handle_list(ctx: &AppContext, group_id: EntityId) -> CliResult<()> {
    ctx.open(Route::StudyDetail(group_id))?;
    let comments = ctx.api().comments_for_study_group(group_id).await?;
    render_comments(&comments, ctx.output)
}

pub(crate) async fn handle_add(ctx: &AppContext, args: CommentAddArgs) -> CliResult<()> {
    ctx.open(Route::StudyDetail(args.id))?;
    let request = CommentRequest {
        content: require_non_empty(&args.content, "comment")?,
        parent_id: args.parent_id,
    };
    let comment = ctx.api().create_comment(args.id, &request).await?;
    render_comments(slice::from_ref(&comment), ctx.output)
}

pub(crate) async fn handle_delete(ctx: &AppContext, args: CommentDeleteArgs) -> CliResult<()> {
    ctx.open(Route::StudyDetail(args.group_id))?;
    let confirmation = ctx.api().delete_comment(args.comment_id).await?;
    render_message(&confirmation, ctx.output)
}
