use portal_logging::{portal_debug, portal_info, portal_warn};

use crate::state::PendingMutation;
use crate::{
    validate_draft, AppState, Collection, ConfirmPrompt, Draft, EditSession, Effect, ItemId,
    ListItem, Msg, NotificationLevel, PortalError, TabId, Ticket, ViewState,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    if !state.is_mounted() && !matches!(msg, Msg::Mounted) {
        portal_debug!("Ignoring {} while unmounted", msg_name(&msg));
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::Mounted => {
            if state.is_mounted() {
                Vec::new()
            } else {
                state.begin_mount();
                start_loading(&mut state)
            }
        }
        Msg::Unmounted => {
            state.unmount();
            vec![Effect::CancelInFlight]
        }
        Msg::RefreshClicked => {
            let can_refresh = matches!(
                state.view_state(),
                ViewState::List { .. } | ViewState::Error { .. }
            );
            if !can_refresh || state.is_loading() {
                Vec::new()
            } else if state.has_pending_mutation() {
                portal_info!("Refresh suppressed while a mutation is pending");
                Vec::new()
            } else {
                start_loading(&mut state)
            }
        }
        Msg::FetchCompleted {
            ticket,
            tab,
            result,
        } => {
            apply_fetch(&mut state, ticket, tab, result);
            Vec::new()
        }
        Msg::TabSelected(tab) => {
            if matches!(state.view_state(), ViewState::List { .. })
                && state.tab_spec(&tab).is_some()
                && state.active_tab() != &tab
            {
                state.set_active_tab(tab.clone());
                state.set_view(ViewState::List { tab });
            }
            Vec::new()
        }
        Msg::ItemSelected(id) => {
            if let ViewState::List { tab } = state.view_state() {
                let tab = tab.clone();
                if let Some(item) = find_item(&state, &tab, &id) {
                    state.set_view(ViewState::Detail { tab, item });
                }
            }
            Vec::new()
        }
        Msg::BackClicked => {
            match state.view_state() {
                ViewState::Detail { tab, .. } => {
                    let tab = tab.clone();
                    state.set_view(ViewState::List { tab });
                }
                ViewState::Edit(_) => close_editor(&mut state),
                _ => {}
            }
            Vec::new()
        }
        Msg::EditCancelled => {
            if matches!(state.view_state(), ViewState::Edit(_)) {
                close_editor(&mut state);
            }
            Vec::new()
        }
        Msg::CreateClicked => {
            if is_deleting(&state) {
                portal_info!("Create suppressed: a delete is pending");
            } else if let ViewState::List { tab } = state.view_state() {
                let tab = tab.clone();
                if let Some(kind) = state.resource(&tab).map(|r| r.kind) {
                    state.set_view(ViewState::Edit(EditSession {
                        tab,
                        draft: Draft::template(kind),
                        is_new: true,
                        error: None,
                    }));
                }
            }
            Vec::new()
        }
        Msg::EditClicked(id) => {
            let tab = match state.view_state() {
                ViewState::List { tab } => Some(tab.clone()),
                ViewState::Detail { tab, item } if item.id == id => Some(tab.clone()),
                _ => None,
            };
            if tab.is_some() && (is_deleting(&state) || is_target(&state, &id)) {
                portal_info!("Edit of {} suppressed: a mutation is pending", id);
            } else if let Some(tab) = tab {
                if let Some(item) = find_item(&state, &tab, &id) {
                    state.set_view(ViewState::Edit(EditSession {
                        tab,
                        draft: Draft::from_item(&item),
                        is_new: false,
                        error: None,
                    }));
                }
            }
            Vec::new()
        }
        Msg::DraftChanged(fields) => {
            let saving = is_saving(&state);
            if let ViewState::Edit(session) = state.view_state() {
                if !saving {
                    let mut session = session.clone();
                    session.draft.fields = fields;
                    session.error = None;
                    state.set_view(ViewState::Edit(session));
                }
            }
            Vec::new()
        }
        Msg::SaveClicked => request_save(&mut state),
        Msg::UpsertCompleted { ticket, result } => {
            apply_upsert(&mut state, ticket, result);
            Vec::new()
        }
        Msg::DeleteClicked(id) => request_delete(&mut state, id),
        Msg::ConfirmResolved { ticket, confirmed } => resolve_confirm(&mut state, ticket, confirmed),
        Msg::DeleteCompleted { ticket, result } => {
            apply_delete(&mut state, ticket, result);
            Vec::new()
        }
        Msg::ToggleExpanded(id) => {
            let tab = state.active_tab().clone();
            if state.collection(&tab).is_some_and(|c| c.contains(&id)) {
                state.toggle_expanded(id);
            }
            Vec::new()
        }
        Msg::NotificationDismissed(id) => {
            state.dismiss_notification(id);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn msg_name(msg: &Msg) -> &'static str {
    match msg {
        Msg::Mounted => "Mounted",
        Msg::Unmounted => "Unmounted",
        Msg::RefreshClicked => "RefreshClicked",
        Msg::FetchCompleted { .. } => "FetchCompleted",
        Msg::TabSelected(_) => "TabSelected",
        Msg::ItemSelected(_) => "ItemSelected",
        Msg::BackClicked => "BackClicked",
        Msg::CreateClicked => "CreateClicked",
        Msg::EditClicked(_) => "EditClicked",
        Msg::DraftChanged(_) => "DraftChanged",
        Msg::SaveClicked => "SaveClicked",
        Msg::EditCancelled => "EditCancelled",
        Msg::UpsertCompleted { .. } => "UpsertCompleted",
        Msg::DeleteClicked(_) => "DeleteClicked",
        Msg::ConfirmResolved { .. } => "ConfirmResolved",
        Msg::DeleteCompleted { .. } => "DeleteCompleted",
        Msg::ToggleExpanded(_) => "ToggleExpanded",
        Msg::NotificationDismissed(_) => "NotificationDismissed",
        Msg::NoOp => "NoOp",
    }
}

fn find_item(state: &AppState, tab: &TabId, id: &ItemId) -> Option<ListItem> {
    state.collection(tab).and_then(|c| c.get(id)).cloned()
}

fn is_saving(state: &AppState) -> bool {
    matches!(state.pending(), Some(PendingMutation::Saving { .. }))
}

fn is_deleting(state: &AppState) -> bool {
    matches!(
        state.pending(),
        Some(PendingMutation::AwaitingConfirm { .. } | PendingMutation::Deleting { .. })
    )
}

fn is_target(state: &AppState, id: &ItemId) -> bool {
    state.pending().and_then(PendingMutation::target) == Some(id)
}

/// Issues one fetch per tab and enters Loading. Existing collections stay
/// in place until their replacement arrives.
fn start_loading(state: &mut AppState) -> Vec<Effect> {
    let tabs: Vec<_> = state
        .tabs()
        .iter()
        .map(|spec| (spec.id.clone(), spec.resource.clone()))
        .collect();
    if tabs.is_empty() {
        let tab = state.active_tab().clone();
        state.set_view(ViewState::List { tab });
        return Vec::new();
    }

    state.set_view(ViewState::Loading);
    let mut effects = Vec::with_capacity(tabs.len());
    for (tab, resource) in tabs {
        let ticket = state.issue_ticket();
        state.track_fetch(tab.clone(), ticket);
        effects.push(Effect::Fetch {
            ticket,
            tab,
            resource,
        });
    }
    effects
}

fn apply_fetch(
    state: &mut AppState,
    ticket: Ticket,
    tab: TabId,
    result: Result<Vec<ListItem>, PortalError>,
) {
    if ticket.generation != state.generation() || !state.settle_fetch(&tab, ticket) {
        portal_debug!("Discarding stale fetch result for tab {}", tab);
        return;
    }
    let Some(kind) = state.resource(&tab).map(|r| r.kind) else {
        return;
    };

    match result.and_then(Collection::from_items) {
        Ok(collection) => {
            portal_info!("Loaded {} {} for tab {}", collection.len(), kind.plural(), tab);
            if let Some(slot) = state.collection_mut(&tab) {
                *slot = collection;
            }
            state.prune_expanded();
        }
        Err(err) => {
            portal_warn!("Fetch for tab {} failed: {}", tab, err);
            state.record_load_failure(tab, format!("Failed to load {}.", kind.plural()));
        }
    }
    state.mark_dirty();

    if !state.is_loading() {
        let next = match state.take_load_failure() {
            Some(message) => ViewState::Error { message },
            None => ViewState::List {
                tab: state.active_tab().clone(),
            },
        };
        state.set_view(next);
    }
}

fn close_editor(state: &mut AppState) {
    if is_saving(state) {
        portal_debug!("Editor stays open while the save is pending");
        return;
    }
    if let ViewState::Edit(session) = state.view_state() {
        let tab = session.tab.clone();
        state.set_view(ViewState::List { tab });
    }
}

fn request_save(state: &mut AppState) -> Vec<Effect> {
    let ViewState::Edit(session) = state.view_state() else {
        return Vec::new();
    };
    let mut session = session.clone();
    if state.has_pending_mutation() {
        portal_info!("Save suppressed: another mutation is pending");
        return Vec::new();
    }
    let Some(resource) = state.resource(&session.tab).cloned() else {
        return Vec::new();
    };

    if let Err(err) = validate_draft(resource.kind, &session.draft) {
        session.error = Some(err.to_string());
        state.set_view(ViewState::Edit(session));
        return Vec::new();
    }

    let ticket = state.issue_ticket();
    state.set_pending(Some(PendingMutation::Saving {
        ticket,
        tab: session.tab.clone(),
        target: session.draft.id.clone(),
    }));
    session.error = None;
    let draft = session.draft.clone();
    state.set_view(ViewState::Edit(session));
    vec![Effect::Upsert {
        ticket,
        resource,
        draft,
    }]
}

fn apply_upsert(state: &mut AppState, ticket: Ticket, result: Result<ListItem, PortalError>) {
    let Some(PendingMutation::Saving { ticket: pending, tab, .. }) = state.pending().cloned()
    else {
        portal_debug!("Discarding upsert result without a pending save");
        return;
    };
    if pending != ticket {
        portal_debug!("Discarding stale upsert result");
        return;
    }
    state.set_pending(None);
    let Some(kind) = state.resource(&tab).map(|r| r.kind) else {
        return;
    };

    match result {
        Ok(item) => {
            portal_info!("Saved {} {}", kind.noun(), item.id);
            if let Some(collection) = state.collection_mut(&tab) {
                collection.merge(item);
            }
            state.notify(
                NotificationLevel::Success,
                format!("{} saved successfully!", kind.capitalized()),
            );
            if matches!(state.view_state(), ViewState::Edit(_)) {
                state.set_view(ViewState::List { tab });
            }
        }
        Err(err) => {
            portal_warn!("Saving {} failed: {}", kind.noun(), err);
            let message = format!("Failed to save {}.", kind.noun());
            if let ViewState::Edit(session) = state.view_state() {
                let mut session = session.clone();
                session.error = Some(err.to_string());
                state.set_view(ViewState::Edit(session));
            }
            state.notify(NotificationLevel::Error, message);
        }
    }
}

fn request_delete(state: &mut AppState, id: ItemId) -> Vec<Effect> {
    let tab = match state.view_state() {
        ViewState::List { tab } => tab.clone(),
        ViewState::Detail { tab, item } if item.id == id => tab.clone(),
        _ => return Vec::new(),
    };
    if !state.collection(&tab).is_some_and(|c| c.contains(&id)) {
        return Vec::new();
    }
    if let Some(pending) = state.pending() {
        portal_info!(
            "Delete of {} suppressed: mutation on {:?} is pending",
            id,
            pending.target()
        );
        return Vec::new();
    }

    let ticket = state.issue_ticket();
    state.set_pending(Some(PendingMutation::AwaitingConfirm { ticket, tab, id }));
    vec![Effect::Confirm {
        ticket,
        prompt: ConfirmPrompt::delete(),
    }]
}

fn resolve_confirm(state: &mut AppState, ticket: Ticket, confirmed: bool) -> Vec<Effect> {
    let Some(PendingMutation::AwaitingConfirm {
        ticket: pending,
        tab,
        id,
    }) = state.pending().cloned()
    else {
        return Vec::new();
    };
    if pending != ticket {
        portal_debug!("Discarding stale confirmation");
        return Vec::new();
    }
    if !confirmed {
        portal_debug!("Delete of {} declined", id);
        state.set_pending(None);
        return Vec::new();
    }
    let Some(resource) = state.resource(&tab).cloned() else {
        state.set_pending(None);
        return Vec::new();
    };

    state.set_pending(Some(PendingMutation::Deleting {
        ticket,
        tab,
        id: id.clone(),
    }));
    vec![Effect::Delete {
        ticket,
        resource,
        id,
    }]
}

fn apply_delete(state: &mut AppState, ticket: Ticket, result: Result<(), PortalError>) {
    let Some(PendingMutation::Deleting {
        ticket: pending,
        tab,
        id,
    }) = state.pending().cloned()
    else {
        portal_debug!("Discarding delete result without a pending delete");
        return;
    };
    if pending != ticket {
        portal_debug!("Discarding stale delete result");
        return;
    }
    state.set_pending(None);
    let Some(kind) = state.resource(&tab).map(|r| r.kind) else {
        return;
    };

    match result {
        Ok(()) => {
            portal_info!("Deleted {} {}", kind.noun(), id);
            if let Some(collection) = state.collection_mut(&tab) {
                collection.remove(&id);
            }
            state.forget_expanded(&id);
            state.notify(
                NotificationLevel::Success,
                format!("{} deleted successfully!", kind.capitalized()),
            );
            let showing_deleted = match state.view_state() {
                ViewState::Detail { item, .. } => item.id == id,
                ViewState::Edit(session) => session.draft.id.as_ref() == Some(&id),
                _ => false,
            };
            if showing_deleted {
                state.set_view(ViewState::List { tab });
            }
        }
        Err(err) => {
            portal_warn!("Deleting {} {} failed: {}", kind.noun(), id, err);
            state.notify(
                NotificationLevel::Error,
                format!("Failed to delete {}.", kind.noun()),
            );
        }
    }
}
