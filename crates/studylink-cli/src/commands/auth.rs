use std::io::{self, IsTerminal};

use anyhow::anyhow;
use studylink_api_models::{LoginRequest, SignupRequest};
use studylink_session::Route;

use super::require_non_empty;
use crate::cli::{LoginArgs, SignupArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_identity, render_message};

pub(crate) async fn handle_signup(ctx: &AppContext, args: SignupArgs) -> CliResult<()> {
    ctx.open(Route::Signup)?;
    let request = SignupRequest {
        email: require_non_empty(&args.email, "email")?,
        password: resolve_password(args.password)?,
        nickname: require_non_empty(&args.nickname, "nickname")?,
        career: args.career.map(Into::into),
        birth_date: args.birth_date,
        job: args.job,
        goal: args.goal,
        study_style: args.study_style.map(Into::into),
        tags: args.tags,
        region: args.region,
    };
    let confirmation = ctx.session.sign_up(&request).await?;
    render_message(&confirmation, ctx.output)
}

pub(crate) async fn handle_login(ctx: &AppContext, args: LoginArgs) -> CliResult<()> {
    ctx.open(Route::Login)?;
    let claims = if let Some(token) = args.token {
        ctx.session.login(&token).await?
    } else {
        let email = args
            .email
            .as_deref()
            .ok_or_else(|| CliError::validation("--email or --token is required"))?;
        let request = LoginRequest {
            email: require_non_empty(email, "email")?,
            password: resolve_password(args.password)?,
        };
        ctx.session.sign_in(&request).await?
    };
    render_identity(&claims, ctx.session.hint().as_ref(), ctx.output)
}

pub(crate) fn handle_logout(ctx: &AppContext) -> CliResult<()> {
    ctx.session.logout();
    render_message("signed out", ctx.output)
}

pub(crate) fn handle_whoami(ctx: &AppContext) -> CliResult<()> {
    ctx.open(Route::MyPage)?;
    let state = ctx.session.state();
    let claims = state
        .claims()
        .ok_or_else(|| CliError::login_required("not signed in; run `studylink login`"))?;
    render_identity(claims, ctx.session.hint().as_ref(), ctx.output)
}

fn resolve_password(supplied: Option<String>) -> CliResult<String> {
    if let Some(value) = supplied {
        if value.is_empty() {
            return Err(CliError::validation("password cannot be empty"));
        }
        return Ok(value);
    }

    if io::stdin().is_terminal() {
        let password = rpassword::prompt_password("Password: ").map_err(|err| {
            CliError::failure(anyhow!("failed to read password from stdin: {err}"))
        })?;
        if password.is_empty() {
            return Err(CliError::validation("password cannot be empty"));
        }
        Ok(password)
    } else {
        Err(CliError::validation(
            "password required; supply via --password or STUDYLINK_PASSWORD when running non-interactively",
        ))
    }
}
