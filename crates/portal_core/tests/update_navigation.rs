use chrono::{TimeZone, Utc};
use portal_core::{
    update, AppState, Effect, ItemFields, ItemId, LinkStatus, ListItem, MeetingLink, Msg, Rating,
    ResourceKind, ResourceSpec, Screen, TabId, TabSpec, ViewState,
};
use pretty_assertions::assert_eq;

fn tabs() -> Vec<TabSpec> {
    vec![
        TabSpec::new(
            "feedback",
            "Recruiter Feedbacks",
            ResourceSpec::new(ResourceKind::Feedback, "feedback", "data"),
        ),
        TabSpec::new(
            "gd",
            "Group Discussions",
            ResourceSpec::new(ResourceKind::GdSchedule, "gd", "items"),
        ),
    ]
}

fn feedback(id: &str, company: &str, comment: &str) -> ListItem {
    ListItem::new(
        id,
        ItemFields {
            title: Some(company.to_string()),
            content: Some(comment.to_string()),
            ratings: vec![
                Rating::new("Technical Skill", 4),
                Rating::new("Communication Skill", 2),
                Rating::new("Overall Experience", 5),
            ],
            ..ItemFields::default()
        },
    )
}

fn gd(id: &str, link: Option<&str>, visible: bool, shortlisted: Option<bool>) -> ListItem {
    ListItem::new(
        id,
        ItemFields {
            title: Some("Acme".into()),
            created_at: None,
            schedule_time: Some("10:30 AM".into()),
            content: Some("Bring your resume.".into()),
            link: Some(MeetingLink {
                url: link.map(str::to_string),
                visible,
            }),
            shortlisted,
            ..ItemFields::default()
        },
    )
}

fn loaded() -> AppState {
    let (mut state, effects) = update(AppState::new(tabs()), Msg::Mounted);
    for effect in effects {
        let Effect::Fetch { ticket, tab, .. } = effect else {
            continue;
        };
        let items = if tab.as_str() == "feedback" {
            vec![
                feedback("f1", "Acme", "Solid fundamentals."),
                feedback("f2", "Globex", &"x".repeat(140)),
            ]
        } else {
            vec![
                gd("g1", Some("meet.example.com/room"), true, Some(true)),
                gd("g2", None, true, None),
                gd("g3", Some("https://meet.example.com/x"), false, Some(false)),
            ]
        };
        state = update(
            state,
            Msg::FetchCompleted {
                ticket,
                tab,
                result: Ok(items),
            },
        )
        .0;
    }
    state
}

#[test]
fn select_then_back_restores_tab_and_collection() {
    let state = loaded();
    let (state, _) = update(state, Msg::TabSelected(TabId::from("gd")));
    let before_view = state.view();
    let before_collection = state.collection(&TabId::from("gd")).cloned();

    let (state, _) = update(state, Msg::ItemSelected(ItemId::from("g2")));
    assert_eq!(state.view().screen, Screen::Detail);
    let (state, _) = update(state, Msg::BackClicked);

    assert_eq!(
        state.view_state(),
        &ViewState::List {
            tab: TabId::from("gd")
        }
    );
    assert_eq!(state.collection(&TabId::from("gd")).cloned(), before_collection);
    assert_eq!(state.view().cards, before_view.cards);
}

#[test]
fn tab_switch_is_ignored_outside_list() {
    let state = loaded();
    let (state, _) = update(state, Msg::ItemSelected(ItemId::from("f1")));
    let (state, _) = update(state, Msg::TabSelected(TabId::from("gd")));

    assert_eq!(state.active_tab(), &TabId::from("feedback"));
    assert_eq!(state.view().screen, Screen::Detail);
}

#[test]
fn unknown_tab_or_item_is_ignored() {
    let state = loaded();
    let (state, _) = update(state, Msg::TabSelected(TabId::from("nope")));
    let (state, _) = update(state, Msg::ItemSelected(ItemId::from("g1")));

    assert_eq!(state.active_tab(), &TabId::from("feedback"));
    assert_eq!(state.view().screen, Screen::List);
}

#[test]
fn feedback_cards_show_stars_and_truncated_comment() {
    let state = loaded();
    let cards = state.view().cards;

    assert_eq!(cards[0].title, "Acme");
    let stars: Vec<_> = cards[0].ratings.iter().map(|r| r.stars.as_str()).collect();
    assert_eq!(stars, vec!["★★★★☆", "★★☆☆☆", "★★★★★"]);
    let short = cards[0].excerpt.as_ref().unwrap();
    assert_eq!(short.toggle_label(), None);

    let long = cards[1].excerpt.as_ref().unwrap();
    assert_eq!(long.text, format!("{}...", "x".repeat(100)));
    assert_eq!(long.toggle_label(), Some("Read More"));

    let (state, _) = update(state, Msg::ToggleExpanded(ItemId::from("f2")));
    let long = state.view().cards[1].excerpt.clone().unwrap();
    assert_eq!(long.text, "x".repeat(140));
    assert_eq!(long.toggle_label(), Some("Read Less"));
}

#[test]
fn gd_cards_show_link_and_status() {
    let state = loaded();
    let (state, _) = update(state, Msg::TabSelected(TabId::from("gd")));
    let cards = state.view().cards;

    assert_eq!(
        cards[0].link,
        Some(LinkStatus::Start {
            url: "https://meet.example.com/room".into()
        })
    );
    assert_eq!(cards[0].status, Some("Shortlisted"));
    assert_eq!(cards[0].date.as_deref(), Some("Not Provided"));
    assert_eq!(cards[0].schedule_time.as_deref(), Some("10:30 AM"));

    assert_eq!(cards[1].link, Some(LinkStatus::Soon));
    assert_eq!(cards[1].status, Some("Result yet to be declared"));

    assert_eq!(cards[2].link, Some(LinkStatus::Hidden));
    assert_eq!(cards[2].status, Some("Not selected"));
}

#[test]
fn experience_detail_uses_fallbacks() {
    let tabs = vec![TabSpec::new(
        "experiences",
        "Students Experiences",
        ResourceSpec::new(ResourceKind::Experience, "sharedexperience", "otherExperiences"),
    )];
    let (state, effects) = update(AppState::new(tabs), Msg::Mounted);
    let Some(Effect::Fetch { ticket, tab, .. }) = effects.into_iter().next() else {
        panic!("expected fetch");
    };
    let item = ListItem::new(
        "e1",
        ItemFields {
            created_at: Some(Utc.with_ymd_and_hms(2024, 11, 20, 9, 0, 0).unwrap()),
            content: Some("<p>hello</p>".into()),
            ..ItemFields::default()
        },
    );
    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            ticket,
            tab,
            result: Ok(vec![item]),
        },
    );
    let (state, _) = update(state, Msg::ItemSelected(ItemId::from("e1")));

    let detail = state.view().detail.unwrap();
    assert_eq!(detail.title, "Untitled Experience");
    assert_eq!(detail.author, "Anonymous");
    assert_eq!(detail.date.as_deref(), Some("Nov 20, 2024"));
    assert_eq!(detail.content.as_deref(), Some("<p>hello</p>"));
    assert_eq!(detail.link, None);
}

#[test]
fn create_then_cancel_returns_to_same_tab() {
    let state = loaded();
    let (state, _) = update(state, Msg::TabSelected(TabId::from("gd")));
    let (state, _) = update(state, Msg::CreateClicked);
    assert_eq!(state.view().form.unwrap().kind, ResourceKind::GdSchedule);

    let (state, _) = update(state, Msg::EditCancelled);
    assert_eq!(
        state.view_state(),
        &ViewState::List {
            tab: TabId::from("gd")
        }
    );
}

fn refresh_with(state: AppState, feedback_items: Vec<ListItem>) -> AppState {
    let (mut state, effects) = update(state, Msg::RefreshClicked);
    for effect in effects {
        let Effect::Fetch { ticket, tab, .. } = effect else {
            continue;
        };
        let items = if tab.as_str() == "feedback" {
            feedback_items.clone()
        } else {
            Vec::new()
        };
        state = update(
            state,
            Msg::FetchCompleted {
                ticket,
                tab,
                result: Ok(items),
            },
        )
        .0;
    }
    state
}

#[test]
fn refresh_forgets_expansion_of_vanished_records() {
    let long = "x".repeat(140);
    let state = loaded();
    let (state, _) = update(state, Msg::ToggleExpanded(ItemId::from("f2")));

    let state = refresh_with(state, vec![feedback("f1", "Acme", "ok")]);
    let state = refresh_with(
        state,
        vec![
            feedback("f1", "Acme", "ok"),
            feedback("f2", "Globex", &long),
        ],
    );

    let excerpt = state.view().cards[1].excerpt.clone().unwrap();
    assert_eq!(excerpt.toggle_label(), Some("Read More"));
    assert_eq!(excerpt.text, format!("{}...", "x".repeat(100)));
}
