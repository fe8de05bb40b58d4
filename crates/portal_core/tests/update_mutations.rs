use std::sync::Once;

use portal_core::{
    update, AppState, Effect, ItemFields, ItemId, ListItem, Msg, NotificationLevel, PortalError,
    ResourceKind, ResourceSpec, Screen, TabId, TabSpec, Ticket, ViewState, MAX_NOTIFICATIONS,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(portal_logging::initialize_for_tests);
}

fn experience(id: &str, title: &str) -> ListItem {
    ListItem::new(
        id,
        ItemFields {
            title: Some(title.to_string()),
            content: Some("<p>body</p>".to_string()),
            ..ItemFields::default()
        },
    )
}

/// Mounted view with one experiences tab holding `items`.
fn loaded(items: Vec<ListItem>) -> AppState {
    let tabs = vec![TabSpec::new(
        "experiences",
        "Students Experiences",
        ResourceSpec::new(ResourceKind::Experience, "sharedexperience", "otherExperiences"),
    )];
    let (state, effects) = update(AppState::new(tabs), Msg::Mounted);
    let Some(Effect::Fetch { ticket, tab, .. }) = effects.into_iter().next() else {
        panic!("expected fetch effect");
    };
    let (mut state, _) = update(
        state,
        Msg::FetchCompleted {
            ticket,
            tab,
            result: Ok(items),
        },
    );
    state.consume_dirty();
    state
}

fn confirm_ticket(effects: &[Effect]) -> Ticket {
    match effects {
        [Effect::Confirm { ticket, prompt }] => {
            assert_eq!(prompt.title, "Are you sure?");
            assert_eq!(prompt.confirm_label, "Yes, delete it!");
            *ticket
        }
        other => panic!("expected a single confirm effect, got {other:?}"),
    }
}

fn titles(state: &AppState) -> Vec<String> {
    state
        .collection(&TabId::from("experiences"))
        .unwrap()
        .iter()
        .map(|item| item.fields.title.clone().unwrap_or_default())
        .collect()
}

#[test]
fn confirmed_delete_removes_exactly_one_item() {
    init_logging();
    let state = loaded(vec![experience("1", "A"), experience("2", "B")]);

    let (state, effects) = update(state, Msg::DeleteClicked(ItemId::from("2")));
    let ticket = confirm_ticket(&effects);
    assert!(state.view().busy);

    let (state, effects) = update(
        state,
        Msg::ConfirmResolved {
            ticket,
            confirmed: true,
        },
    );
    match effects.as_slice() {
        [Effect::Delete { id, resource, .. }] => {
            assert_eq!(id, &ItemId::from("2"));
            assert_eq!(resource.path, "sharedexperience");
        }
        other => panic!("expected delete effect, got {other:?}"),
    }
    // Collection untouched until the server acknowledges.
    assert_eq!(titles(&state), vec!["A", "B"]);

    let (state, _) = update(
        state,
        Msg::DeleteCompleted {
            ticket,
            result: Ok(()),
        },
    );
    assert_eq!(titles(&state), vec!["A"]);
    assert!(!state.has_pending_mutation());
    let notice = state.notifications().last().unwrap();
    assert_eq!(notice.level, NotificationLevel::Success);
    assert_eq!(notice.text, "Experience deleted successfully!");
}

#[test]
fn declined_confirmation_changes_nothing() {
    init_logging();
    let state = loaded(vec![experience("1", "A"), experience("2", "B")]);
    let (state, effects) = update(state, Msg::DeleteClicked(ItemId::from("1")));
    let ticket = confirm_ticket(&effects);

    let (state, effects) = update(
        state,
        Msg::ConfirmResolved {
            ticket,
            confirmed: false,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(titles(&state), vec!["A", "B"]);
    assert!(!state.has_pending_mutation());
    assert!(state.notifications().is_empty());
}

#[test]
fn double_click_delete_issues_one_request() {
    init_logging();
    let state = loaded(vec![experience("1", "A"), experience("2", "B")]);

    let (state, first) = update(state, Msg::DeleteClicked(ItemId::from("2")));
    let (state, second) = update(state, Msg::DeleteClicked(ItemId::from("2")));
    assert_eq!(first.len(), 1);
    assert!(second.is_empty());

    let ticket = confirm_ticket(&first);
    let (state, effects) = update(
        state,
        Msg::ConfirmResolved {
            ticket,
            confirmed: true,
        },
    );
    assert_eq!(effects.len(), 1);

    // Still pending: a third click and a delete on another card are suppressed.
    let (state, third) = update(state, Msg::DeleteClicked(ItemId::from("2")));
    let (_state, other) = update(state, Msg::DeleteClicked(ItemId::from("1")));
    assert!(third.is_empty());
    assert!(other.is_empty());
}

#[test]
fn failed_delete_keeps_collection_and_notifies() {
    init_logging();
    let state = loaded(vec![experience("1", "A")]);
    let (state, effects) = update(state, Msg::DeleteClicked(ItemId::from("1")));
    let ticket = confirm_ticket(&effects);
    let (state, _) = update(
        state,
        Msg::ConfirmResolved {
            ticket,
            confirmed: true,
        },
    );
    let (state, _) = update(
        state,
        Msg::DeleteCompleted {
            ticket,
            result: Err(PortalError::Network("http status 500".into())),
        },
    );

    assert_eq!(titles(&state), vec!["A"]);
    let notice = state.notifications().last().unwrap().clone();
    assert_eq!(notice.level, NotificationLevel::Error);
    assert_eq!(notice.text, "Failed to delete experience.");

    // Dismissable, and a retry is allowed once settled.
    let (state, _) = update(state, Msg::NotificationDismissed(notice.id));
    assert!(state.notifications().is_empty());
    let (_state, effects) = update(state, Msg::DeleteClicked(ItemId::from("1")));
    assert_eq!(effects.len(), 1);
}

#[test]
fn deleting_the_selected_item_returns_to_list() {
    init_logging();
    let state = loaded(vec![experience("1", "A"), experience("2", "B")]);
    let (state, _) = update(state, Msg::ItemSelected(ItemId::from("1")));
    assert_eq!(state.view().screen, Screen::Detail);

    let (state, effects) = update(state, Msg::DeleteClicked(ItemId::from("1")));
    let ticket = confirm_ticket(&effects);
    let (state, _) = update(
        state,
        Msg::ConfirmResolved {
            ticket,
            confirmed: true,
        },
    );
    let (state, _) = update(
        state,
        Msg::DeleteCompleted {
            ticket,
            result: Ok(()),
        },
    );

    assert_eq!(
        state.view_state(),
        &ViewState::List {
            tab: TabId::from("experiences")
        }
    );
    assert_eq!(titles(&state), vec!["B"]);
}

#[test]
fn stale_confirmation_is_ignored() {
    init_logging();
    let state = loaded(vec![experience("1", "A")]);
    let (state, effects) = update(state, Msg::DeleteClicked(ItemId::from("1")));
    let ticket = confirm_ticket(&effects);
    let bogus = Ticket {
        generation: ticket.generation,
        seq: ticket.seq + 100,
    };

    let (state, effects) = update(
        state,
        Msg::ConfirmResolved {
            ticket: bogus,
            confirmed: true,
        },
    );
    assert!(effects.is_empty());
    assert!(state.has_pending_mutation());
}

#[test]
fn save_new_item_appends_and_returns_to_list() {
    init_logging();
    let state = loaded(vec![experience("1", "A")]);
    let (state, _) = update(state, Msg::CreateClicked);
    let form = state.view().form.unwrap();
    assert!(form.is_new);

    let mut fields = form.draft.fields.clone();
    fields.title = Some("C".into());
    fields.content = Some("<p>new</p>".into());
    let (state, _) = update(state, Msg::DraftChanged(fields));
    let (state, effects) = update(state, Msg::SaveClicked);
    let ticket = match effects.as_slice() {
        [Effect::Upsert { ticket, draft, .. }] => {
            assert!(draft.id.is_none());
            assert_eq!(draft.fields.title.as_deref(), Some("C"));
            *ticket
        }
        other => panic!("expected upsert, got {other:?}"),
    };
    assert!(state.view().form.unwrap().saving);

    let (state, _) = update(
        state,
        Msg::UpsertCompleted {
            ticket,
            result: Ok(experience("3", "C")),
        },
    );
    assert_eq!(titles(&state), vec!["A", "C"]);
    assert_eq!(state.view().screen, Screen::List);
    assert_eq!(
        state.notifications().last().unwrap().text,
        "Experience saved successfully!"
    );
}

#[test]
fn edit_from_detail_replaces_in_place() {
    init_logging();
    let state = loaded(vec![experience("1", "A"), experience("2", "B")]);
    let (state, _) = update(state, Msg::ItemSelected(ItemId::from("1")));
    let (state, _) = update(state, Msg::EditClicked(ItemId::from("1")));
    let form = state.view().form.unwrap();
    assert!(!form.is_new);
    assert_eq!(form.draft.id, Some(ItemId::from("1")));

    let mut fields = form.draft.fields;
    fields.title = Some("A2".into());
    let (state, _) = update(state, Msg::DraftChanged(fields));
    let (state, effects) = update(state, Msg::SaveClicked);
    let Some(Effect::Upsert { ticket, .. }) = effects.first() else {
        panic!("expected upsert");
    };

    let (state, _) = update(
        state,
        Msg::UpsertCompleted {
            ticket: *ticket,
            result: Ok(experience("1", "A2")),
        },
    );
    assert_eq!(titles(&state), vec!["A2", "B"]);
    assert_eq!(state.view().screen, Screen::List);
}

#[test]
fn failed_save_keeps_form_and_input() {
    init_logging();
    let state = loaded(vec![]);
    let (state, _) = update(state, Msg::CreateClicked);
    let fields = ItemFields {
        title: Some("Draft title".into()),
        content: Some("<p>keep me</p>".into()),
        ..ItemFields::default()
    };
    let (state, _) = update(state, Msg::DraftChanged(fields.clone()));
    let (state, effects) = update(state, Msg::SaveClicked);
    let Some(Effect::Upsert { ticket, .. }) = effects.first() else {
        panic!("expected upsert");
    };

    let (state, _) = update(
        state,
        Msg::UpsertCompleted {
            ticket: *ticket,
            result: Err(PortalError::DataIntegrity("item without id".into())),
        },
    );
    let view = state.view();
    assert_eq!(view.screen, Screen::Edit);
    let form = view.form.unwrap();
    assert_eq!(form.draft.fields, fields);
    assert!(!form.saving);
    assert_eq!(
        form.error.as_deref(),
        Some("malformed server data: item without id")
    );
    assert!(state.collection(&TabId::from("experiences")).unwrap().is_empty());
}

#[test]
fn invalid_draft_is_not_submitted() {
    init_logging();
    let state = loaded(vec![]);
    let (state, _) = update(state, Msg::CreateClicked);
    let (state, effects) = update(state, Msg::SaveClicked);

    assert!(effects.is_empty());
    assert!(!state.has_pending_mutation());
    assert_eq!(
        state.view().form.unwrap().error.as_deref(),
        Some("Title is required.")
    );
}

#[test]
fn double_save_issues_one_upsert() {
    init_logging();
    let state = loaded(vec![experience("1", "A")]);
    let (state, _) = update(state, Msg::EditClicked(ItemId::from("1")));
    let (state, first) = update(state, Msg::SaveClicked);
    let (state, second) = update(state, Msg::SaveClicked);
    assert_eq!(first.len(), 1);
    assert!(second.is_empty());

    // Cancel is held back while the save is in flight.
    let (state, _) = update(state, Msg::EditCancelled);
    assert_eq!(state.view().screen, Screen::Edit);
}

#[test]
fn editor_stays_closed_while_a_delete_is_pending() {
    init_logging();
    let state = loaded(vec![experience("1", "A"), experience("2", "B")]);
    let (state, effects) = update(state, Msg::DeleteClicked(ItemId::from("2")));
    let ticket = confirm_ticket(&effects);
    let (state, _) = update(
        state,
        Msg::ConfirmResolved {
            ticket,
            confirmed: true,
        },
    );

    let (state, _) = update(state, Msg::EditClicked(ItemId::from("2")));
    assert_eq!(state.view().screen, Screen::List);
    let (state, _) = update(state, Msg::EditClicked(ItemId::from("1")));
    assert_eq!(state.view().screen, Screen::List);
    let (state, _) = update(state, Msg::CreateClicked);
    assert_eq!(state.view().screen, Screen::List);

    let (state, _) = update(
        state,
        Msg::DeleteCompleted {
            ticket,
            result: Ok(()),
        },
    );
    let (state, effects) = update(state, Msg::SaveClicked);
    assert!(!effects.iter().any(|effect| matches!(
        effect,
        Effect::Upsert { draft, .. } if draft.id == Some(ItemId::from("2"))
    )));
    assert_eq!(titles(&state), vec!["A"]);

    // Editing works again once the delete has settled.
    let (state, _) = update(state, Msg::EditClicked(ItemId::from("1")));
    assert_eq!(state.view().screen, Screen::Edit);
}

#[test]
fn notifications_keep_only_the_latest() {
    init_logging();
    let mut state = loaded(vec![experience("1", "A")]);
    for _ in 0..MAX_NOTIFICATIONS + 2 {
        let (next, effects) = update(state, Msg::DeleteClicked(ItemId::from("1")));
        let ticket = confirm_ticket(&effects);
        let (next, _) = update(
            next,
            Msg::ConfirmResolved {
                ticket,
                confirmed: true,
            },
        );
        let (next, _) = update(
            next,
            Msg::DeleteCompleted {
                ticket,
                result: Err(PortalError::Network("timeout".into())),
            },
        );
        state = next;
    }

    let ids: Vec<u64> = state.notifications().iter().map(|n| n.id).collect();
    assert_eq!(ids.len(), MAX_NOTIFICATIONS);
    assert_eq!(ids.last(), Some(&(MAX_NOTIFICATIONS as u64 + 2)));
}
