//! Formatting rules shared by cards, the detail reader and the process guide.

use chrono::{DateTime, Utc};
use url::Url;

use crate::{MeetingLink, MAX_RATING};

/// Comment length after which cards collapse the text behind Read More.
pub const COMMENT_PREVIEW_CHARS: usize = 100;
const ELLIPSIS: &str = "...";

/// Possibly shortened text plus whether the Read More toggle applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPreview {
    pub text: String,
    /// The full text is longer than the threshold.
    pub collapsible: bool,
    pub expanded: bool,
}

impl TextPreview {
    pub fn new(full: &str, max_chars: usize, expanded: bool) -> Self {
        let collapsible = full.chars().count() > max_chars;
        let text = if collapsible && !expanded {
            let cut: String = full.chars().take(max_chars).collect();
            format!("{cut}{ELLIPSIS}")
        } else {
            full.to_string()
        };
        Self {
            text,
            collapsible,
            expanded,
        }
    }

    /// Label of the toggle, if one is shown.
    pub fn toggle_label(&self) -> Option<&'static str> {
        match (self.collapsible, self.expanded) {
            (false, _) => None,
            (true, false) => Some("Read More"),
            (true, true) => Some("Read Less"),
        }
    }
}

/// `Mar 5, 2025`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Five-star bar for a score, clamped to the scale.
pub fn star_bar(score: u8) -> String {
    let filled = usize::from(score.min(MAX_RATING));
    let empty = usize::from(MAX_RATING) - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

pub fn shortlist_label(shortlisted: Option<bool>) -> &'static str {
    match shortlisted {
        Some(true) => "Shortlisted",
        Some(false) => "Not selected",
        None => "Result yet to be declared",
    }
}

/// What a GD card offers for joining the discussion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    /// Link is published; `url` is ready to open.
    Start { url: String },
    /// Link is visible but not set yet.
    Soon,
    /// Organiser has hidden the link.
    Hidden,
}

impl LinkStatus {
    pub fn from_link(link: &MeetingLink) -> Self {
        if !link.visible {
            return LinkStatus::Hidden;
        }
        match link
            .url
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .and_then(normalize_meeting_url)
        {
            Some(url) => LinkStatus::Start { url },
            None => LinkStatus::Soon,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            LinkStatus::Start { url } => url,
            LinkStatus::Soon => "GD link will be available soon",
            LinkStatus::Hidden => "Link Visibility is off",
        }
    }
}

/// Prefixes `https://` onto links entered without a scheme and checks the
/// result parses as a URL.
pub fn normalize_meeting_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let candidate = if raw.starts_with("http") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };
    Url::parse(&candidate).ok().map(String::from)
}
