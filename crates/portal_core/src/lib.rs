//! Portal core: pure list/detail state machine and view-model helpers.
mod effect;
mod error;
mod model;
mod msg;
mod present;
pub mod process;
mod state;
mod update;
mod validate;
mod view_model;

pub use effect::{ConfirmPrompt, Effect, Ticket};
pub use error::PortalError;
pub use model::{
    Collection, Draft, ItemFields, ItemId, ListItem, MeetingLink, MergeOutcome, Rating,
    ResourceKind, ResourceSpec, TabId, TabSpec, FEEDBACK_RATINGS, MAX_RATING,
};
pub use msg::Msg;
pub use present::{
    format_date, normalize_meeting_url, shortlist_label, star_bar, LinkStatus, TextPreview,
    COMMENT_PREVIEW_CHARS,
};
pub use state::{
    AppState, EditSession, Notification, NotificationLevel, ViewState, MAX_NOTIFICATIONS,
};
pub use update::update;
pub use validate::validate_draft;
pub use view_model::{
    AppViewModel, CardView, DetailView, FormView, RatingView, Screen, TabView,
};
