//! Text formatting functions for `issuetrack`.
//!
//! Plain text by default, with optional ANSI color via `colored`:
//! - Status icons (○ ◐ ✓) and badges
//! - Issue lines and detail blocks
//! - Notices and the empty-list hint

use crate::model::{Identity, Issue, Status};
use crate::util::time::{format_long_date, format_short_date};
use crate::view::{Notice, NoticeLevel, Transition};
use colored::Colorize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Status icon characters.
pub mod icons {
    /// Open issue (hollow circle).
    pub const OPEN: &str = "○";
    /// In progress (half-filled).
    pub const IN_PROGRESS: &str = "◐";
    /// Closed (checkmark).
    pub const CLOSED: &str = "✓";
}

/// Shown in place of an empty list.
pub const EMPTY_TITLE: &str = "No issues found";
pub const EMPTY_HINT: &str = "Create your first issue to get started";

/// Formatting options for text output.
#[derive(Debug, Clone, Copy)]
pub struct TextFormatOptions {
    pub use_color: bool,
    pub max_width: Option<usize>,
}

impl TextFormatOptions {
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            use_color: false,
            max_width: None,
        }
    }
}

/// Return the icon character for a status.
#[must_use]
pub const fn format_status_icon(status: Status) -> &'static str {
    match status {
        Status::Open => icons::OPEN,
        Status::InProgress => icons::IN_PROGRESS,
        Status::Closed => icons::CLOSED,
    }
}

/// Paint text in the status color: open red, in progress yellow, closed green.
fn paint(text: &str, status: Status, use_color: bool) -> String {
    if !use_color {
        return text.to_string();
    }
    match status {
        Status::Open => text.red().to_string(),
        Status::InProgress => text.yellow().to_string(),
        Status::Closed => text.green().to_string(),
    }
}

/// Format status label with optional color.
#[must_use]
pub fn format_status_label(status: Status, use_color: bool) -> String {
    paint(status.as_str(), status, use_color)
}

/// Format status as a bracketed badge, e.g. `[In Progress]`.
#[must_use]
pub fn format_status_badge(status: Status, use_color: bool) -> String {
    format!("[{}]", format_status_label(status, use_color))
}

/// Determine terminal width from environment (falls back to 80).
#[must_use]
pub fn terminal_width() -> usize {
    if let Ok(columns) = std::env::var("COLUMNS") {
        if let Ok(value) = columns.trim().parse::<usize>() {
            if value > 0 {
                return value;
            }
        }
    }
    80
}

/// Truncate a title to fit within `max_len` visible columns.
///
/// Handles wide characters (emojis, CJK) correctly using `unicode-width`.
#[must_use]
pub fn truncate_title(title: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if UnicodeWidthStr::width(title) <= max_len {
        return title.to_string();
    }

    let (target_len, ellipsis) = if max_len <= 3 {
        (max_len, "")
    } else {
        (max_len - 3, "...")
    };

    let mut w = 0;
    let mut s = String::new();
    for c in title.chars() {
        let cw = UnicodeWidthChar::width(c).unwrap_or(0);
        if w + cw > target_len {
            break;
        }
        w += cw;
        s.push(c);
    }
    s.push_str(ellipsis);
    s
}

/// Format a single-line issue summary with options.
///
/// Format: `{icon} {id} [{status}] {title}`
#[must_use]
pub fn format_issue_line_with(issue: &Issue, options: TextFormatOptions) -> String {
    let badge_plain = format_status_badge(issue.status, false);
    let prefix_len = UnicodeWidthStr::width(format_status_icon(issue.status))
        + 1
        + UnicodeWidthStr::width(issue.id.as_str())
        + 1
        + UnicodeWidthStr::width(badge_plain.as_str())
        + 1;

    let title = options.max_width.map_or_else(
        || issue.title.clone(),
        |width| truncate_title(&issue.title, width.saturating_sub(prefix_len)),
    );

    let icon = paint(format_status_icon(issue.status), issue.status, options.use_color);
    let badge = format_status_badge(issue.status, options.use_color);
    let id = if options.use_color {
        issue.id.bold().to_string()
    } else {
        issue.id.clone()
    };

    format!("{icon} {id} {badge} {title}")
}

/// Format a single-line issue summary.
#[must_use]
pub fn format_issue_line(issue: &Issue) -> String {
    format_issue_line_with(issue, TextFormatOptions::plain())
}

/// Multi-line card: summary line, description, creation date.
#[must_use]
pub fn format_issue_card(issue: &Issue, options: TextFormatOptions) -> String {
    let mut out = format_issue_line_with(issue, options);
    for line in issue.description.lines() {
        out.push_str("\n    ");
        out.push_str(line);
    }
    let created = format!("Created on {}", format_short_date(&issue.created_at));
    out.push_str("\n    ");
    if options.use_color {
        out.push_str(&created.dimmed().to_string());
    } else {
        out.push_str(&created);
    }
    out
}

/// The "Mark as ..." menu, current status marked.
#[must_use]
pub fn format_transitions(transitions: &[Transition]) -> String {
    transitions
        .iter()
        .map(|t| {
            if t.enabled {
                format!("  {}", t.label)
            } else {
                format!("  {} (current)", t.label)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Notice line, e.g. `Success: Issue created successfully`.
#[must_use]
pub fn format_notice(notice: &Notice, use_color: bool) -> String {
    if !use_color {
        return notice.to_string();
    }
    let title = match notice.level {
        NoticeLevel::Success => notice.title().green().bold(),
        NoticeLevel::Error => notice.title().red().bold(),
    };
    format!("{title}: {}", notice.message)
}

/// Two-line hint shown for an empty list.
#[must_use]
pub fn format_empty(use_color: bool) -> String {
    if use_color {
        format!("{}\n{}", EMPTY_TITLE.bold(), EMPTY_HINT.dimmed())
    } else {
        format!("{EMPTY_TITLE}\n{EMPTY_HINT}")
    }
}

/// Profile header: email and member-since date.
#[must_use]
pub fn format_identity(identity: &Identity, use_color: bool) -> String {
    let email = if use_color {
        identity.email.bold().to_string()
    } else {
        identity.email.clone()
    };
    format!(
        "{email}\nMember since {}",
        format_long_date(&identity.created_at)
    )
}
