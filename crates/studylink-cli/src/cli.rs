//! Argument parsing, session bootstrap, and command dispatch.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use studylink_api_models::{ApplicationDecision, Career, EntityId, StudyGroupSort, StudyStyle};
use studylink_session::config::{DEFAULT_API_URL, default_token_path, parse_base_url};
use studylink_session::{
    ApiClient, ClientConfig, FileTokenStore, HistoryNavigator, Navigator, Session, TokenStore,
};
use studylink_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, command_span, init_logging};
use tracing::{Instrument, info, warn};
use url::Url;
use uuid::Uuid;

use crate::client::{AppContext, CliError, CliResult};
use crate::commands::{applications, auth, comments, groups, interests, me};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Commit the binary was built from; release builds set `STUDYLINK_BUILD_SHA`.
const BUILD_SHA: &str = match option_env!("STUDYLINK_BUILD_SHA") {
    Some(sha) => sha,
    None => "dev",
};

/// Parses CLI arguments, bootstraps the session, runs the requested command,
/// and returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    install_logging(&cli);
    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4().to_string();

    let span = command_span(command_name, &trace_id);
    let context = span.in_scope(|| {
        info!("command started");
        build_context(&cli, &trace_id)
    });
    let command = cli.command;
    let outcome = async move {
        match context {
            Ok(ctx) => dispatch(&ctx, command).await,
            Err(err) => Err(err),
        }
    }
    .instrument(span.clone())
    .await;

    let _entered = span.enter();
    match outcome {
        Ok(()) => {
            info!("command completed");
            0
        }
        Err(err) => {
            let exit_code = err.exit_code();
            let message = err.display_message();
            warn!(exit_code, "command failed");
            eprintln!("error: {message}");
            exit_code
        }
    }
}

fn install_logging(cli: &Cli) {
    let config = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format,
        build_sha: BUILD_SHA,
    };
    if let Err(err) = init_logging(&config) {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn build_context(cli: &Cli, trace_id: &str) -> CliResult<AppContext> {
    let config = ClientConfig {
        timeout: Duration::from_secs(cli.timeout),
        token_path: cli.token_file.clone().unwrap_or_else(default_token_path),
        request_id: Some(trace_id.to_string()),
        ..ClientConfig::new(cli.api_url.clone())
    };
    config
        .validate()
        .map_err(|err| CliError::validation(err.to_string()))?;

    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&config.token_path));
    let api = ApiClient::new(&config, store).map_err(CliError::failure)?;
    let navigator = Arc::new(HistoryNavigator::default());
    let session = Session::new(api, Arc::clone(&navigator) as Arc<dyn Navigator>);
    Ok(AppContext::new(session, navigator, cli.output))
}

pub(crate) async fn dispatch(ctx: &AppContext, command: Command) -> CliResult<()> {
    ctx.session.initialize().await;

    match command {
        Command::Signup(args) => auth::handle_signup(ctx, args).await,
        Command::Login(args) => auth::handle_login(ctx, args).await,
        Command::Logout => auth::handle_logout(ctx),
        Command::Whoami => auth::handle_whoami(ctx),
        Command::Groups(command) => match command {
            GroupsCommand::List(args) => groups::handle_list(ctx, args).await,
            GroupsCommand::Show(args) => groups::handle_show(ctx, args.id).await,
            GroupsCommand::Create(args) => groups::handle_create(ctx, args).await,
            GroupsCommand::Update(args) => groups::handle_update(ctx, args).await,
            GroupsCommand::Delete(args) => groups::handle_delete(ctx, args.id).await,
            GroupsCommand::Recommend(args) => groups::handle_recommend(ctx, args).await,
        },
        Command::Apply(args) => applications::handle_apply(ctx, args).await,
        Command::Applications(command) => match command {
            ApplicationsCommand::List(args) => applications::handle_list(ctx, args.id).await,
            ApplicationsCommand::Process(args) => applications::handle_process(ctx, args).await,
        },
        Command::Comments(command) => match command {
            CommentsCommand::List(args) => comments::handle_list(ctx, args.id).await,
            CommentsCommand::Add(args) => comments::handle_add(ctx, args).await,
            CommentsCommand::Delete(args) => comments::handle_delete(ctx, args).await,
        },
        Command::Interest(command) => match command {
            InterestCommand::Toggle(args) => interests::handle_toggle(ctx, args.id).await,
            InterestCommand::List => interests::handle_list(ctx).await,
        },
        Command::Me(command) => match command {
            MeCommand::Profile => me::handle_profile(ctx).await,
            MeCommand::Update(args) => me::handle_update(ctx, args).await,
            MeCommand::Applications => me::handle_applications(ctx).await,
            MeCommand::Groups => me::handle_groups(ctx).await,
            MeCommand::Created => me::handle_created(ctx).await,
        },
    }
}

#[derive(Parser)]
#[command(
    name = "studylink",
    version,
    about = "Find, join, and run study groups on StudyLink"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "STUDYLINK_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    api_url: Url,
    #[arg(
        long,
        global = true,
        env = "STUDYLINK_TIMEOUT",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        help = "Per-request timeout in seconds"
    )]
    timeout: u64,
    #[arg(
        long,
        global = true,
        env = "STUDYLINK_TOKEN_FILE",
        help = "Where the session token is kept (default: ~/.studylink/session.json)"
    )]
    token_file: Option<PathBuf>,
    #[arg(long, global = true, env = "STUDYLINK_LOG", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
    #[arg(
        long,
        global = true,
        value_parser = parse_log_format,
        default_value = "auto",
        help = "Log output format: json, pretty, or auto"
    )]
    log_format: LogFormat,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Create an account.
    Signup(SignupArgs),
    /// Sign in with email and password, or with an existing token.
    Login(LoginArgs),
    /// Sign out and forget the stored token.
    Logout,
    /// Show who the stored session belongs to.
    Whoami,
    /// Browse and manage study groups.
    #[command(subcommand)]
    Groups(GroupsCommand),
    /// Apply to join a study group.
    Apply(ApplyArgs),
    /// Review applications to a group you own.
    #[command(subcommand)]
    Applications(ApplicationsCommand),
    /// Read and write group comments.
    #[command(subcommand)]
    Comments(CommentsCommand),
    /// Track groups you are interested in.
    #[command(subcommand)]
    Interest(InterestCommand),
    /// Your profile and memberships.
    #[command(subcommand)]
    Me(MeCommand),
}

#[derive(Subcommand)]
pub(crate) enum GroupsCommand {
    /// Search the public listing.
    List(GroupListArgs),
    /// Show one group in detail.
    Show(GroupIdArgs),
    /// Create a new group.
    Create(GroupCreateArgs),
    /// Edit a group you own.
    Update(GroupUpdateArgs),
    /// Delete a group you own.
    Delete(GroupIdArgs),
    /// Groups recommended for your profile.
    Recommend(RecommendArgs),
}

#[derive(Subcommand)]
pub(crate) enum ApplicationsCommand {
    /// List applications received by a group.
    List(GroupIdArgs),
    /// Accept or reject an application.
    Process(ProcessArgs),
}

#[derive(Subcommand)]
pub(crate) enum CommentsCommand {
    /// Show comment threads of a group.
    List(GroupIdArgs),
    /// Post a comment or a reply.
    Add(CommentAddArgs),
    /// Delete one of your comments.
    Delete(CommentDeleteArgs),
}

#[derive(Subcommand)]
pub(crate) enum InterestCommand {
    /// Mark or unmark a group as interesting.
    Toggle(GroupIdArgs),
    /// List groups you marked.
    List,
}

#[derive(Subcommand)]
pub(crate) enum MeCommand {
    /// Show your profile.
    Profile,
    /// Edit your profile.
    Update(ProfileUpdateArgs),
    /// Applications you submitted.
    Applications,
    /// Groups you participate in.
    Groups,
    /// Groups you created.
    Created,
}

#[derive(Args)]
pub(crate) struct SignupArgs {
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long, env = "STUDYLINK_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
    #[arg(long)]
    pub(crate) nickname: String,
    #[arg(long, value_enum)]
    pub(crate) career: Option<CareerArg>,
    #[arg(long)]
    pub(crate) birth_date: Option<NaiveDate>,
    #[arg(long)]
    pub(crate) job: Option<String>,
    #[arg(long)]
    pub(crate) goal: Option<String>,
    #[arg(long, value_enum)]
    pub(crate) study_style: Option<StudyStyleArg>,
    #[arg(long = "tag")]
    pub(crate) tags: Vec<String>,
    #[arg(long)]
    pub(crate) region: Option<String>,
}

#[derive(Args)]
pub(crate) struct LoginArgs {
    #[arg(long, conflicts_with = "token", required_unless_present = "token")]
    pub(crate) email: Option<String>,
    #[arg(long, env = "STUDYLINK_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
    #[arg(long, help = "Adopt an existing bearer token instead of signing in")]
    pub(crate) token: Option<String>,
}

#[derive(Args)]
pub(crate) struct GroupIdArgs {
    pub(crate) id: EntityId,
}

#[derive(Args)]
pub(crate) struct GroupListArgs {
    #[arg(long)]
    pub(crate) region: Option<String>,
    #[arg(long, value_enum)]
    pub(crate) sort: Option<SortArg>,
    #[arg(long)]
    pub(crate) search: Option<String>,
}

#[derive(Args)]
pub(crate) struct GroupCreateArgs {
    #[arg(long)]
    pub(crate) title: String,
    #[arg(long)]
    pub(crate) topic: String,
    #[arg(long)]
    pub(crate) description: String,
    #[arg(long)]
    pub(crate) goal: String,
    #[arg(long = "members")]
    pub(crate) member_count: u32,
    #[arg(long, value_enum)]
    pub(crate) study_style: StudyStyleArg,
    #[arg(long)]
    pub(crate) deadline: NaiveDate,
    #[arg(long)]
    pub(crate) region: Option<String>,
    #[arg(long = "tag")]
    pub(crate) tags: Vec<String>,
    #[arg(long, value_enum)]
    pub(crate) required_career: Option<CareerArg>,
}

#[derive(Args)]
pub(crate) struct GroupUpdateArgs {
    pub(crate) id: EntityId,
    #[arg(long)]
    pub(crate) title: Option<String>,
    #[arg(long)]
    pub(crate) topic: Option<String>,
    #[arg(long)]
    pub(crate) description: Option<String>,
    #[arg(long)]
    pub(crate) goal: Option<String>,
    #[arg(long = "members")]
    pub(crate) member_count: Option<u32>,
    #[arg(long)]
    pub(crate) deadline: Option<NaiveDate>,
    #[arg(long)]
    pub(crate) region: Option<String>,
    #[arg(long, value_enum)]
    pub(crate) study_style: Option<StudyStyleArg>,
    #[arg(long = "tag")]
    pub(crate) tags: Option<Vec<String>>,
}

#[derive(Args)]
pub(crate) struct RecommendArgs {
    #[arg(long, help = "Use the weighted recommender (tags, region, style, career)")]
    pub(crate) v2: bool,
}

#[derive(Args)]
pub(crate) struct ApplyArgs {
    pub(crate) id: EntityId,
    #[arg(long)]
    pub(crate) message: String,
}

#[derive(Args)]
pub(crate) struct ProcessArgs {
    pub(crate) group_id: EntityId,
    pub(crate) application_id: EntityId,
    #[arg(value_enum)]
    pub(crate) decision: DecisionArg,
}

#[derive(Args)]
pub(crate) struct CommentAddArgs {
    pub(crate) id: EntityId,
    #[arg(long)]
    pub(crate) content: String,
    #[arg(long = "reply-to")]
    pub(crate) parent_id: Option<EntityId>,
}

#[derive(Args)]
pub(crate) struct CommentDeleteArgs {
    pub(crate) group_id: EntityId,
    pub(crate) comment_id: EntityId,
}

#[derive(Args)]
pub(crate) struct ProfileUpdateArgs {
    #[arg(long)]
    pub(crate) nickname: Option<String>,
    #[arg(long, value_enum)]
    pub(crate) career: Option<CareerArg>,
    #[arg(long)]
    pub(crate) job: Option<String>,
    #[arg(long)]
    pub(crate) goal: Option<String>,
    #[arg(long, value_enum)]
    pub(crate) study_style: Option<StudyStyleArg>,
    #[arg(long = "tag")]
    pub(crate) tags: Option<Vec<String>>,
    #[arg(long)]
    pub(crate) region: Option<String>,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum CareerArg {
    Newbie,
    Junior,
    Senior,
}

impl From<CareerArg> for Career {
    fn from(value: CareerArg) -> Self {
        match value {
            CareerArg::Newbie => Self::Newbie,
            CareerArg::Junior => Self::Junior,
            CareerArg::Senior => Self::Senior,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum StudyStyleArg {
    Online,
    Offline,
    Hybrid,
}

impl From<StudyStyleArg> for StudyStyle {
    fn from(value: StudyStyleArg) -> Self {
        match value {
            StudyStyleArg::Online => Self::Online,
            StudyStyleArg::Offline => Self::Offline,
            StudyStyleArg::Hybrid => Self::Hybrid,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum SortArg {
    Latest,
    Deadline,
}

impl From<SortArg> for StudyGroupSort {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Latest => Self::Latest,
            SortArg::Deadline => Self::Deadline,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum DecisionArg {
    Accept,
    Reject,
}

impl From<DecisionArg> for ApplicationDecision {
    fn from(value: DecisionArg) -> Self {
        match value {
            DecisionArg::Accept => Self::Accepted,
            DecisionArg::Reject => Self::Rejected,
        }
    }
}

fn parse_url(input: &str) -> Result<Url, String> {
    parse_base_url(input).map_err(|err| err.to_string())
}

fn parse_log_format(input: &str) -> Result<LogFormat, String> {
    input.parse::<LogFormat>().map_err(|err| err.to_string())
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Signup(_) => "signup",
        Command::Login(_) => "login",
        Command::Logout => "logout",
        Command::Whoami => "whoami",
        Command::Groups(GroupsCommand::List(_)) => "groups_list",
        Command::Groups(GroupsCommand::Show(_)) => "groups_show",
        Command::Groups(GroupsCommand::Create(_)) => "groups_create",
        Command::Groups(GroupsCommand::Update(_)) => "groups_update",
        Command::Groups(GroupsCommand::Delete(_)) => "groups_delete",
        Command::Groups(GroupsCommand::Recommend(_)) => "groups_recommend",
        Command::Apply(_) => "apply",
        Command::Applications(ApplicationsCommand::List(_)) => "applications_list",
        Command::Applications(ApplicationsCommand::Process(_)) => "applications_process",
        Command::Comments(CommentsCommand::List(_)) => "comments_list",
        Command::Comments(CommentsCommand::Add(_)) => "comments_add",
        Command::Comments(CommentsCommand::Delete(_)) => "comments_delete",
        Command::Interest(InterestCommand::Toggle(_)) => "interest_toggle",
        Command::Interest(InterestCommand::List) => "interest_list",
        Command::Me(MeCommand::Profile) => "me_profile",
        Command::Me(MeCommand::Update(_)) => "me_update",
        Command::Me(MeCommand::Applications) => "me_applications",
        Command::Me(MeCommand::Groups) => "me_groups",
        Command::Me(MeCommand::Created) => "me_created",
    }
}
