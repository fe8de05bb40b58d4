use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::PortalError;

/// Labels of the three scores a recruiter gives in a feedback entry.
pub const FEEDBACK_RATINGS: [&str; 3] =
    ["Technical Skill", "Communication Skill", "Overall Experience"];

/// Upper bound of every rating scale.
pub const MAX_RATING: u8 = 5;

/// Opaque server-side identifier of a record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rating {
    pub label: String,
    pub score: u8,
}

impl Rating {
    pub fn new(label: impl Into<String>, score: u8) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Meeting link of a GD schedule plus the organiser's visibility switch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MeetingLink {
    pub url: Option<String>,
    pub visible: bool,
}

/// Display fields shared by every resource kind. Which ones are populated
/// depends on the resource the record came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemFields {
    pub title: Option<String>,
    pub author: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub content: Option<String>,
    pub ratings: Vec<Rating>,
    pub link: Option<MeetingLink>,
    pub schedule_time: Option<String>,
    pub shortlisted: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub id: ItemId,
    pub fields: ItemFields,
}

impl ListItem {
    pub fn new(id: impl Into<ItemId>, fields: ItemFields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Edit form contents. `id` is `None` for a record that does not exist on
/// the server yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft {
    pub id: Option<ItemId>,
    pub fields: ItemFields,
}

impl Draft {
    /// Empty form for a new record of `kind`.
    pub fn template(kind: ResourceKind) -> Self {
        let fields = match kind {
            ResourceKind::Experience => ItemFields::default(),
            ResourceKind::Feedback => ItemFields {
                ratings: FEEDBACK_RATINGS
                    .iter()
                    .map(|label| Rating::new(*label, 0))
                    .collect(),
                ..ItemFields::default()
            },
            ResourceKind::GdSchedule => ItemFields {
                link: Some(MeetingLink::default()),
                ..ItemFields::default()
            },
        };
        Self { id: None, fields }
    }

    pub fn from_item(item: &ListItem) -> Self {
        Self {
            id: Some(item.id.clone()),
            fields: item.fields.clone(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Experience,
    Feedback,
    GdSchedule,
}

impl ResourceKind {
    /// Lower-case singular noun used in user-facing messages.
    pub fn noun(self) -> &'static str {
        match self {
            ResourceKind::Experience => "experience",
            ResourceKind::Feedback => "feedback",
            ResourceKind::GdSchedule => "GD schedule",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            ResourceKind::Experience => "experiences",
            ResourceKind::Feedback => "feedback",
            ResourceKind::GdSchedule => "GD schedules",
        }
    }

    /// Title shown when the record has none.
    pub fn untitled(self) -> &'static str {
        match self {
            ResourceKind::Experience => "Untitled Experience",
            ResourceKind::Feedback | ResourceKind::GdSchedule => "Unnamed Company",
        }
    }

    pub(crate) fn capitalized(self) -> String {
        let noun = self.noun();
        let mut chars = noun.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Where a collection lives on the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpec {
    pub kind: ResourceKind,
    /// Path segment below the base URL, e.g. `feedback`.
    pub path: String,
    /// Key of the response object holding the array, e.g. `data`.
    pub envelope: String,
}

impl ResourceSpec {
    pub fn new(kind: ResourceKind, path: impl Into<String>, envelope: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            envelope: envelope.into(),
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TabId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One tab of a list view; each tab owns one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabSpec {
    pub id: TabId,
    pub label: String,
    pub resource: ResourceSpec,
}

impl TabSpec {
    pub fn new(id: impl Into<TabId>, label: impl Into<String>, resource: ResourceSpec) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            resource,
        }
    }
}

/// Outcome of [`Collection::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Replaced,
    Appended,
}

/// Ordered records of one tab, in server response order. Ids are unique.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Collection {
    items: Vec<ListItem>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot, rejecting duplicate ids.
    pub fn from_items(items: Vec<ListItem>) -> Result<Self, PortalError> {
        let mut seen = BTreeSet::new();
        for item in &items {
            if !seen.insert(&item.id) {
                return Err(PortalError::DataIntegrity(format!(
                    "duplicate id {} in collection",
                    item.id
                )));
            }
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &ListItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&ListItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn remove(&mut self, id: &ItemId) -> Option<ListItem> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(index))
    }

    pub(crate) fn merge(&mut self, item: ListItem) -> MergeOutcome {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                *existing = item;
                MergeOutcome::Replaced
            }
            None => {
                self.items.push(item);
                MergeOutcome::Appended
            }
        }
    }
}
