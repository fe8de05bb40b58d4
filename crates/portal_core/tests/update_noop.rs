use portal_core::{update, AppState, Msg, ResourceKind, ResourceSpec, TabSpec};

fn tabs() -> Vec<TabSpec> {
    vec![TabSpec::new(
        "feedback",
        "Recruiter Feedbacks",
        ResourceSpec::new(ResourceKind::Feedback, "feedback", "data"),
    )]
}

#[test]
fn update_is_noop() {
    let state = AppState::new(tabs());
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn messages_before_mount_are_ignored() {
    let state = AppState::new(tabs());
    let (next, effects) = update(state.clone(), Msg::RefreshClicked);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
