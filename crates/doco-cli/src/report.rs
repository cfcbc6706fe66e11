//! Plain-text rendering of a replay.

use doco_core::{Content, Screen, Snapshot};
use doco_model::AuthStatus;

use crate::replay::{ReplayResult, StepOutcome};

pub fn render_text(result: &ReplayResult) -> String {
    let mut lines = vec!["steps:".to_string()];
    if result.steps.is_empty() {
        lines.push("  (none)".to_string());
    }
    lines.extend(
        result
            .steps
            .iter()
            .map(|step| format!("  {}", describe_step(step))),
    );
    let snapshot = &result.snapshot;
    lines.push(format!("snapshot (rev {}):", snapshot.revision));
    lines.extend(
        snapshot_fields(snapshot)
            .into_iter()
            .map(|(label, value)| format!("  {label}: {value}")),
    );
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn describe_step(step: &StepOutcome) -> String {
    match &step.rejected {
        None => format!("{}. {} -> ok [rev {}]", step.step, step.intent, step.revision),
        Some(reason) => format!(
            "{}. {} -> rejected: {reason} [rev {}]",
            step.step, step.intent, step.revision
        ),
    }
}

/// Label/value pairs shared by the text and table renderings.
pub fn snapshot_fields(snapshot: &Snapshot) -> Vec<(&'static str, String)> {
    let active = match &snapshot.active_document {
        Some(id) if snapshot.is_active_unlisted() => format!("{id} (unlisted)"),
        Some(id) => id.to_string(),
        None => "-".to_string(),
    };
    let flags = snapshot
        .ui
        .iter()
        .map(|(flag, value)| format!("{flag}={value}"))
        .collect::<Vec<_>>()
        .join(", ");
    vec![
        ("status", describe_status(snapshot)),
        (
            "documents",
            join_or_dash(snapshot.documents.iter().map(|d| d.id.to_string())),
        ),
        (
            "opened",
            join_or_dash(snapshot.opened_documents.iter().map(ToString::to_string)),
        ),
        (
            "recent",
            join_or_dash(snapshot.recent_documents.iter().map(|d| d.id.to_string())),
        ),
        ("active", active),
        ("flags", flags),
        ("screen", describe_screen(&snapshot.screen())),
    ]
}

fn describe_status(snapshot: &Snapshot) -> String {
    match (&snapshot.status, &snapshot.auth_failure) {
        (AuthStatus::Authenticated(user), _) => format!("authenticated ({})", user.id),
        (AuthStatus::Anonymous, Some(failure)) => format!("anonymous ({failure})"),
        (status, _) => status.label().to_string(),
    }
}

pub fn describe_screen(screen: &Screen<'_>) -> String {
    match screen {
        Screen::Loading => "loading".to_string(),
        Screen::Login { failure: None } => "login".to_string(),
        Screen::Login {
            failure: Some(failure),
        } => format!("login ({failure})"),
        Screen::Workspace {
            file_manager,
            content,
        } => {
            let panel = if *file_manager { "shown" } else { "hidden" };
            let content = match content {
                Content::Viewer(document) => format!("viewer({})", document.id),
                Content::Welcome { recent } if recent.is_empty() => {
                    "welcome, open file manager".to_string()
                }
                Content::Welcome { recent } => format!(
                    "welcome, recent: {}",
                    recent
                        .iter()
                        .map(|d| d.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            };
            format!("workspace, file manager {panel}, {content}")
        }
    }
}

fn join_or_dash(items: impl Iterator<Item = String>) -> String {
    let joined = items.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}
