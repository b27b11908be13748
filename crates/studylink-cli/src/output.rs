//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::json;
use studylink_api_models::{
    ApplicationStatus, ApplicationSummary, Career, Comment, EntityId, MemberApplication, MyStudyGroup,
    RecommendedStudyGroup, StudyGroupDetail, StudyGroupSummary, StudyStyle, UserProfile,
};
use studylink_session::{IdentityClaims, TokenHint};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

const TITLE_WIDTH: usize = 32;

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

pub(crate) fn render_message(message: &str, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&json!({ "message": message })),
        OutputFormat::Table => {
            println!("{message}");
            Ok(())
        }
    }
}

pub(crate) fn render_identity(
    claims: &IdentityClaims,
    hint: Option<&TokenHint>,
    format: OutputFormat,
) -> CliResult<()> {
    let expires_at = hint.and_then(|hint| hint.expires_at);
    match format {
        OutputFormat::Json => print_json(&json!({
            "id": claims.id,
            "nickname": claims.nickname,
            "email": claims.email,
            "expiresAt": expires_at,
        })),
        OutputFormat::Table => {
            println!("signed in as {} <{}> (id {})", claims.nickname, claims.email, claims.id);
            if let Some(expires_at) = expires_at {
                println!("token expires: {}", format_timestamp(expires_at));
            }
            Ok(())
        }
    }
}

pub(crate) fn render_group_list(groups: &[StudyGroupSummary], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(groups),
        OutputFormat::Table => {
            println!(
                "{:>6} {:<32} {:<16} {:<12} {:>6} TOPIC",
                "ID", "TITLE", "CREATOR", "DEADLINE", "LIKES"
            );
            for group in groups {
                println!(
                    "{:>6} {:<32} {:<16} {:<12} {:>6} {}",
                    group.id,
                    truncate(&group.title, TITLE_WIDTH),
                    truncate(&group.creator_nickname, 16),
                    format_date(group.recruitment_deadline),
                    group.interest_count,
                    group.topic
                );
            }
            if groups.is_empty() {
                println!("no study groups matched");
            }
            Ok(())
        }
    }
}

pub(crate) fn render_group_detail(detail: &StudyGroupDetail, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(detail),
        OutputFormat::Table => {
            println!("id: {}", detail.id);
            println!("title: {}", detail.title);
            println!("topic: {}", detail.topic);
            println!("goal: {}", detail.goal);
            println!(
                "members: {}/{}",
                detail.current_member_count, detail.max_member_count
            );
            println!("created by: {}", detail.creator_nickname);
            println!("deadline: {}", format_date(detail.recruitment_deadline));
            if let Some(style) = detail.study_style {
                println!("style: {}", style_label(style));
            }
            if let Some(region) = &detail.region {
                println!("region: {region}");
            }
            if !detail.tags.is_empty() {
                println!("tags: {}", detail.tags.join(", "));
            }
            println!();
            println!("{}", detail.description);
            Ok(())
        }
    }
}

pub(crate) fn render_recommendations(
    groups: &[RecommendedStudyGroup],
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(groups),
        OutputFormat::Table => {
            println!("{:>6} {:>6} {:<32} {:<12} TOPIC", "ID", "MATCH", "TITLE", "DEADLINE");
            for group in groups {
                println!(
                    "{:>6} {:>6} {:<32} {:<12} {}",
                    group.id,
                    format_score(group.match_score),
                    truncate(&group.title, TITLE_WIDTH),
                    format_date(group.recruitment_deadline),
                    group.topic
                );
            }
            Ok(())
        }
    }
}

pub(crate) fn render_profile(profile: &UserProfile, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(profile),
        OutputFormat::Table => {
            println!("id: {}", profile.id);
            println!("nickname: {}", profile.nickname);
            println!("email: {}", profile.email);
            if let Some(career) = profile.career {
                println!("career: {}", career_label(career));
            }
            if let Some(job) = &profile.job {
                println!("job: {job}");
            }
            if let Some(goal) = &profile.goal {
                println!("goal: {goal}");
            }
            if let Some(style) = profile.study_style {
                println!("style: {}", style_label(style));
            }
            if let Some(region) = &profile.region {
                println!("region: {region}");
            }
            if !profile.tags.is_empty() {
                println!("tags: {}", profile.tags.join(", "));
            }
            if let Some(created_at) = profile.created_at {
                println!("member since: {}", format_local(created_at));
            }
            Ok(())
        }
    }
}

pub(crate) fn render_my_groups(groups: &[MyStudyGroup], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(groups),
        OutputFormat::Table => {
            println!("{:>6} {:<32} {:>7} {:<12} TOPIC", "ID", "TITLE", "MEMBERS", "DEADLINE");
            for group in groups {
                let members = format!("{}/{}", group.current_participants, group.max_participants);
                println!(
                    "{:>6} {:<32} {:>7} {:<12} {}",
                    group.id,
                    truncate(&group.title, TITLE_WIDTH),
                    members,
                    format_date(group.recruitment_deadline),
                    group.topic
                );
            }
            Ok(())
        }
    }
}

pub(crate) fn render_member_applications(
    applications: &[MemberApplication],
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(applications),
        OutputFormat::Table => {
            println!("{:>6} {:>6} {:<32} {:<9} APPLIED", "ID", "GROUP", "TITLE", "STATUS");
            for application in applications {
                println!(
                    "{:>6} {:>6} {:<32} {:<9} {}",
                    application.application_id,
                    application.study_group_id,
                    truncate(&application.study_group_title, TITLE_WIDTH),
                    status_label(application.status),
                    application
                        .applied_at
                        .map_or_else(|| "-".to_string(), format_local)
                );
            }
            Ok(())
        }
    }
}

pub(crate) fn render_applications(
    applications: &[ApplicationSummary],
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(applications),
        OutputFormat::Table => {
            println!("{:>6} {:<16} {:<9} MESSAGE", "ID", "APPLICANT", "STATUS");
            for application in applications {
                println!(
                    "{:>6} {:<16} {:<9} {}",
                    application.application_id,
                    truncate(&application.applicant_nickname, 16),
                    status_label(application.status),
                    application.message
                );
            }
            if applications.is_empty() {
                println!("no applications yet");
            }
            Ok(())
        }
    }
}

pub(crate) fn render_comments(comments: &[Comment], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(comments),
        OutputFormat::Table => {
            for line in comment_lines(comments) {
                println!("{line}");
            }
            let total: usize = comments.iter().map(Comment::thread_len).sum();
            println!("{total} comment(s)");
            Ok(())
        }
    }
}

pub(crate) fn render_interest(
    group_id: EntityId,
    interested: bool,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&json!({ "studyGroupId": group_id, "isInterested": interested })),
        OutputFormat::Table => {
            if interested {
                println!("added study group {group_id} to your interests");
            } else {
                println!("removed study group {group_id} from your interests");
            }
            Ok(())
        }
    }
}

/// Flatten comment threads into indented lines, replies under their parent.
pub(crate) fn comment_lines(comments: &[Comment]) -> Vec<String> {
    fn walk(comment: &Comment, depth: usize, lines: &mut Vec<String>) {
        let when = comment
            .created_at
            .map(format_local)
            .unwrap_or_default();
        lines.push(format!(
            "{indent}#{id} {author} {when}: {content}",
            indent = "  ".repeat(depth),
            id = comment.id,
            author = comment.author_nickname,
            content = comment.content
        ));
        for reply in &comment.children {
            walk(reply, depth + 1, lines);
        }
    }

    let mut lines = Vec::new();
    for comment in comments {
        walk(comment, 0, &mut lines);
    }
    lines
}

pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}

pub(crate) fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |date| date.format("%Y-%m-%d").to_string())
}

fn format_local(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M UTC").to_string()
}

pub(crate) fn format_score(score: f64) -> String {
    if score <= 1.0 {
        format!("{:.0}%", score * 100.0)
    } else {
        format!("{score:.1}")
    }
}

pub(crate) const fn status_label(status: ApplicationStatus) -> &'static str {
    match status {
        ApplicationStatus::Pending => "pending",
        ApplicationStatus::Accepted => "accepted",
        ApplicationStatus::Rejected => "rejected",
    }
}

const fn career_label(career: Career) -> &'static str {
    match career {
        Career::Newbie => "newbie",
        Career::Junior => "junior",
        Career::Senior => "senior",
    }
}

const fn style_label(style: StudyStyle) -> &'static str {
    match style {
        StudyStyle::Online => "online",
        StudyStyle::Offline => "offline",
        StudyStyle::Hybrid => "hybrid",
    }
}
