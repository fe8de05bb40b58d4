use crate::{Draft, PortalError, ResourceKind, MAX_RATING};

/// Checks a draft before it is sent to the server.
pub fn validate_draft(kind: ResourceKind, draft: &Draft) -> Result<(), PortalError> {
    let fields = &draft.fields;
    match kind {
        ResourceKind::Experience => {
            require_text(fields.title.as_deref(), "Title is required.")?;
            require_text(fields.content.as_deref(), "Content is required.")?;
        }
        ResourceKind::Feedback => {
            require_text(fields.title.as_deref(), "Company is required.")?;
            if fields.ratings.is_empty() {
                return Err(PortalError::Validation("At least one rating is required.".into()));
            }
            if let Some(rating) = fields
                .ratings
                .iter()
                .find(|rating| rating.score == 0 || rating.score > MAX_RATING)
            {
                return Err(PortalError::Validation(format!(
                    "{} must be rated from 1 to {MAX_RATING}.",
                    rating.label
                )));
            }
        }
        ResourceKind::GdSchedule => {
            require_text(fields.title.as_deref(), "Company name is required.")?;
            let raw_link = fields
                .link
                .as_ref()
                .and_then(|link| link.url.as_deref())
                .map(str::trim)
                .filter(|raw| !raw.is_empty());
            if let Some(raw) = raw_link {
                if crate::normalize_meeting_url(raw).is_none() {
                    return Err(PortalError::Validation(format!("GD link {raw:?} is not a valid URL.")));
                }
            }
        }
    }
    Ok(())
}

fn require_text(value: Option<&str>, message: &str) -> Result<(), PortalError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(()),
        _ => Err(PortalError::Validation(message.to_string())),
    }
}
