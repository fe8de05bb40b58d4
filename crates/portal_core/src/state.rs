use std::collections::{BTreeMap, BTreeSet};

use crate::{Collection, Draft, ItemId, ListItem, ResourceSpec, TabId, TabSpec, Ticket};

/// Oldest notifications are dropped beyond this many.
pub const MAX_NOTIFICATIONS: usize = 5;

/// Which screen the view shows. Exactly one is active at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Loading,
    Error {
        message: String,
    },
    List {
        tab: TabId,
    },
    Detail {
        tab: TabId,
        item: ListItem,
    },
    Edit(EditSession),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub tab: TabId,
    pub draft: Draft,
    pub is_new: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient message shown until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub text: String,
}

/// The single mutation a view may have in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingMutation {
    AwaitingConfirm {
        ticket: Ticket,
        tab: TabId,
        id: ItemId,
    },
    Deleting {
        ticket: Ticket,
        tab: TabId,
        id: ItemId,
    },
    Saving {
        ticket: Ticket,
        tab: TabId,
        target: Option<ItemId>,
    },
}

impl PendingMutation {
    pub(crate) fn ticket(&self) -> Ticket {
        match self {
            PendingMutation::AwaitingConfirm { ticket, .. }
            | PendingMutation::Deleting { ticket, .. }
            | PendingMutation::Saving { ticket, .. } => *ticket,
        }
    }

    /// Record the mutation is about, if any.
    pub(crate) fn target(&self) -> Option<&ItemId> {
        match self {
            PendingMutation::AwaitingConfirm { id, .. } | PendingMutation::Deleting { id, .. } => {
                Some(id)
            }
            PendingMutation::Saving { target, .. } => target.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    tabs: Vec<TabSpec>,
    collections: BTreeMap<TabId, Collection>,
    active_tab: TabId,
    view: ViewState,
    mounted: bool,
    generation: u64,
    next_seq: u64,
    fetches: BTreeMap<TabId, Ticket>,
    load_failures: BTreeMap<TabId, String>,
    pending: Option<PendingMutation>,
    expanded: BTreeSet<ItemId>,
    notifications: Vec<Notification>,
    next_notification_id: u64,
    dirty: bool,
}

impl AppState {
    /// State for a view showing `tabs`; the first tab starts active.
    pub fn new(tabs: Vec<TabSpec>) -> Self {
        let active_tab = tabs.first().map(|tab| tab.id.clone()).unwrap_or_default();
        let collections = tabs
            .iter()
            .map(|tab| (tab.id.clone(), Collection::new()))
            .collect();
        Self {
            tabs,
            collections,
            active_tab,
            ..Self::default()
        }
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn active_tab(&self) -> &TabId {
        &self.active_tab
    }

    pub fn tabs(&self) -> &[TabSpec] {
        &self.tabs
    }

    pub fn collection(&self, tab: &TabId) -> Option<&Collection> {
        self.collections.get(tab)
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// True while a delete (including its confirmation) or a save is in flight.
    pub fn has_pending_mutation(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns and clears the render flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_view(&mut self, view: ViewState) {
        self.view = view;
        self.mark_dirty();
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn tab_spec(&self, tab: &TabId) -> Option<&TabSpec> {
        self.tabs.iter().find(|spec| &spec.id == tab)
    }

    pub(crate) fn resource(&self, tab: &TabId) -> Option<&ResourceSpec> {
        self.tab_spec(tab).map(|spec| &spec.resource)
    }

    pub(crate) fn set_active_tab(&mut self, tab: TabId) {
        self.active_tab = tab;
        self.mark_dirty();
    }

    pub(crate) fn collection_mut(&mut self, tab: &TabId) -> Option<&mut Collection> {
        self.collections.get_mut(tab)
    }

    pub(crate) fn issue_ticket(&mut self) -> Ticket {
        self.next_seq += 1;
        Ticket {
            generation: self.generation,
            seq: self.next_seq,
        }
    }

    /// Starts a new mount generation so results from the previous one are
    /// recognised as stale.
    pub(crate) fn begin_mount(&mut self) {
        self.mounted = true;
        self.generation += 1;
        self.mark_dirty();
    }

    /// Drops everything the mounted view owned.
    pub(crate) fn unmount(&mut self) {
        self.mounted = false;
        self.generation += 1;
        for collection in self.collections.values_mut() {
            *collection = Collection::new();
        }
        self.fetches.clear();
        self.load_failures.clear();
        self.pending = None;
        self.expanded.clear();
        self.notifications.clear();
        self.view = ViewState::Loading;
        self.mark_dirty();
    }

    pub(crate) fn is_loading(&self) -> bool {
        !self.fetches.is_empty()
    }

    pub(crate) fn track_fetch(&mut self, tab: TabId, ticket: Ticket) {
        self.fetches.insert(tab, ticket);
    }

    /// Removes the outstanding fetch for `tab` if `ticket` is the one issued.
    pub(crate) fn settle_fetch(&mut self, tab: &TabId, ticket: Ticket) -> bool {
        if self.fetches.get(tab) == Some(&ticket) {
            self.fetches.remove(tab);
            true
        } else {
            false
        }
    }

    pub(crate) fn record_load_failure(&mut self, tab: TabId, message: String) {
        self.load_failures.insert(tab, message);
    }

    /// Message of the first failed tab in tab order, clearing all recorded
    /// failures.
    pub(crate) fn take_load_failure(&mut self) -> Option<String> {
        let mut failures = std::mem::take(&mut self.load_failures);
        self.tabs
            .iter()
            .find_map(|tab| failures.remove(&tab.id))
    }

    pub(crate) fn pending(&self) -> Option<&PendingMutation> {
        self.pending.as_ref()
    }

    pub(crate) fn set_pending(&mut self, pending: Option<PendingMutation>) {
        self.pending = pending;
        self.mark_dirty();
    }

    pub(crate) fn is_expanded(&self, id: &ItemId) -> bool {
        self.expanded.contains(id)
    }

    pub(crate) fn toggle_expanded(&mut self, id: ItemId) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
        self.mark_dirty();
    }

    pub(crate) fn forget_expanded(&mut self, id: &ItemId) {
        self.expanded.remove(id);
    }

    /// Drops expansion flags of records no collection holds any more.
    pub(crate) fn prune_expanded(&mut self) {
        let collections = &self.collections;
        self.expanded
            .retain(|id| collections.values().any(|collection| collection.contains(id)));
    }

    pub(crate) fn notify(&mut self, level: NotificationLevel, text: impl Into<String>) {
        self.next_notification_id += 1;
        if self.notifications.len() >= MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
        self.notifications.push(Notification {
            id: self.next_notification_id,
            level,
            text: text.into(),
        });
        self.mark_dirty();
    }

    pub(crate) fn dismiss_notification(&mut self, id: u64) {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id != id);
        if self.notifications.len() != before {
            self.mark_dirty();
        }
    }
}
