use studylink_api_models::EntityId;
use studylink_session::Route;

use crate::client::{AppContext, CliResult};
use crate::output::{render_group_list, render_interest};

pub(crate) async fn handle_toggle(ctx: &AppContext, group_id: EntityId) -> CliResult<()> {
    ctx.open(Route::StudyDetail(group_id))?;
    let toggle = ctx.api().toggle_interest(group_id).await?;
    render_interest(group_id, toggle.is_interested, ctx.output)
}

pub(crate) async fn handle_list(ctx: &AppContext) -> CliResult<()> {
    ctx.open(Route::MyPage)?;
    let groups = ctx.api().my_interests().await?;
    render_group_list(&groups, ctx.output)
}
