use crate::present::{
    format_date, shortlist_label, star_bar, LinkStatus, TextPreview, COMMENT_PREVIEW_CHARS,
};
use crate::state::PendingMutation;
use crate::{
    AppState, Draft, ItemId, ListItem, Notification, ResourceKind, TabId, ViewState,
};

const ANONYMOUS: &str = "Anonymous";
const DATE_MISSING: &str = "Not Provided";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Loading,
    Error {
        message: String,
    },
    List,
    Detail,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub screen: Screen,
    pub tabs: Vec<TabView>,
    /// Cards of the active tab, in server order.
    pub cards: Vec<CardView>,
    pub detail: Option<DetailView>,
    pub form: Option<FormView>,
    pub notifications: Vec<Notification>,
    /// A mutation is in flight; mutation controls are disabled.
    pub busy: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabView {
    pub id: TabId,
    pub label: String,
    pub active: bool,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingView {
    pub label: String,
    pub score: u8,
    pub stars: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: ItemId,
    pub title: String,
    pub date: Option<String>,
    pub schedule_time: Option<String>,
    pub ratings: Vec<RatingView>,
    pub excerpt: Option<TextPreview>,
    pub link: Option<LinkStatus>,
    pub status: Option<&'static str>,
    /// This card is the target of the pending mutation.
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub id: ItemId,
    pub kind: ResourceKind,
    pub title: String,
    pub author: String,
    pub date: Option<String>,
    pub schedule_time: Option<String>,
    pub ratings: Vec<RatingView>,
    /// Full body; HTML for experiences.
    pub content: Option<String>,
    pub link: Option<LinkStatus>,
    pub status: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub kind: ResourceKind,
    pub draft: Draft,
    pub is_new: bool,
    pub error: Option<String>,
    pub saving: bool,
}

impl AppState {
    pub fn view(&self) -> AppViewModel {
        let pending = self.pending();
        let busy = pending.is_some();
        let mut model = AppViewModel {
            tabs: self.tab_views(),
            notifications: self.notifications().to_vec(),
            busy,
            ..AppViewModel::default()
        };

        match self.view_state() {
            ViewState::Loading => model.screen = Screen::Loading,
            ViewState::Error { message } => {
                model.screen = Screen::Error {
                    message: message.clone(),
                }
            }
            ViewState::List { tab } => {
                model.screen = Screen::List;
                model.cards = self.cards(tab, pending);
            }
            ViewState::Detail { tab, item } => {
                model.screen = Screen::Detail;
                if let Some(kind) = self.resource(tab).map(|r| r.kind) {
                    model.detail = Some(detail_view(kind, item));
                }
            }
            ViewState::Edit(session) => {
                model.screen = Screen::Edit;
                if let Some(kind) = self.resource(&session.tab).map(|r| r.kind) {
                    model.form = Some(FormView {
                        kind,
                        draft: session.draft.clone(),
                        is_new: session.is_new,
                        error: session.error.clone(),
                        saving: matches!(pending, Some(PendingMutation::Saving { .. })),
                    });
                }
            }
        }
        model
    }

    fn tab_views(&self) -> Vec<TabView> {
        self.tabs()
            .iter()
            .map(|spec| TabView {
                id: spec.id.clone(),
                label: spec.label.clone(),
                active: &spec.id == self.active_tab(),
                count: self.collection(&spec.id).map_or(0, |c| c.len()),
            })
            .collect()
    }

    fn cards(&self, tab: &TabId, pending: Option<&PendingMutation>) -> Vec<CardView> {
        let (Some(collection), Some(resource)) = (self.collection(tab), self.resource(tab)) else {
            return Vec::new();
        };
        let busy_id = pending.and_then(PendingMutation::target);
        collection
            .iter()
            .map(|item| {
                let mut card = card_view(resource.kind, item, self.is_expanded(&item.id));
                card.busy = busy_id == Some(&item.id);
                card
            })
            .collect()
    }
}

fn rating_views(item: &ListItem) -> Vec<RatingView> {
    item.fields
        .ratings
        .iter()
        .map(|rating| RatingView {
            label: rating.label.clone(),
            score: rating.score,
            stars: star_bar(rating.score),
        })
        .collect()
}

fn title_of(kind: ResourceKind, item: &ListItem) -> String {
    item.fields
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(kind.untitled())
        .to_string()
}

fn date_of(kind: ResourceKind, item: &ListItem) -> Option<String> {
    match (kind, item.fields.created_at.as_ref()) {
        (_, Some(date)) => Some(format_date(date)),
        (ResourceKind::GdSchedule, None) => Some(DATE_MISSING.to_string()),
        (_, None) => None,
    }
}

fn card_view(kind: ResourceKind, item: &ListItem, expanded: bool) -> CardView {
    let fields = &item.fields;
    let mut card = CardView {
        id: item.id.clone(),
        title: title_of(kind, item),
        date: date_of(kind, item),
        schedule_time: None,
        ratings: Vec::new(),
        excerpt: None,
        link: None,
        status: None,
        busy: false,
    };
    match kind {
        ResourceKind::Experience => {}
        ResourceKind::Feedback => {
            card.ratings = rating_views(item);
            card.excerpt = Some(TextPreview::new(
                fields.content.as_deref().unwrap_or_default(),
                COMMENT_PREVIEW_CHARS,
                expanded,
            ));
        }
        ResourceKind::GdSchedule => {
            card.schedule_time = fields.schedule_time.clone();
            card.link = Some(LinkStatus::from_link(
                &fields.link.clone().unwrap_or_default(),
            ));
            card.status = Some(shortlist_label(fields.shortlisted));
        }
    }
    card
}

fn detail_view(kind: ResourceKind, item: &ListItem) -> DetailView {
    let fields = &item.fields;
    DetailView {
        id: item.id.clone(),
        kind,
        title: title_of(kind, item),
        author: fields
            .author
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| ANONYMOUS.to_string()),
        date: date_of(kind, item),
        schedule_time: fields.schedule_time.clone(),
        ratings: rating_views(item),
        content: fields.content.clone(),
        link: (kind == ResourceKind::GdSchedule)
            .then(|| LinkStatus::from_link(&fields.link.clone().unwrap_or_default())),
        status: (kind == ResourceKind::GdSchedule).then(|| shortlist_label(fields.shortlisted)),
    }
}
