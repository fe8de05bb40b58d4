//! Plain-text rendering of the view model.

use std::fmt::Write;

use portal_core::process::ProcessGuide;
use portal_core::{
    AppViewModel, CardView, DetailView, FormView, LinkStatus, NotificationLevel, RatingView,
    ResourceKind, Screen,
};
use portal_engine::ContentRenderer;

pub fn render(view: &AppViewModel, content: &dyn ContentRenderer) -> String {
    let mut out = String::new();
    render_tabs(&mut out, view);
    match &view.screen {
        Screen::Loading => out.push_str("Loading...\n"),
        Screen::Error { message } => {
            let _ = writeln!(out, "Error: {message}");
            out.push_str("Type `refresh` to try again.\n");
        }
        Screen::List => render_cards(&mut out, &view.cards),
        Screen::Detail => {
            if let Some(detail) = &view.detail {
                render_detail(&mut out, detail, content);
            }
        }
        Screen::Edit => {
            if let Some(form) = &view.form {
                render_form(&mut out, form);
            }
        }
    }
    for notice in &view.notifications {
        let tag = match notice.level {
            NotificationLevel::Success => "ok",
            NotificationLevel::Error => "error",
        };
        let _ = writeln!(out, "[{tag}] {}", notice.text);
    }
    if view.busy {
        out.push_str("(working...)\n");
    }
    out
}

pub fn render_guide(guide: &ProcessGuide) -> String {
    let mut out = String::from("Recruitment Process\n");
    for step in guide.steps() {
        let _ = writeln!(out, "{}  {}", step.number, step.title);
        let _ = writeln!(out, "    {}", step.text.text);
        if let Some(label) = step.text.toggle_label() {
            let _ = writeln!(out, "    [{label}: process {}]", step.number.trim_start_matches('0'));
        }
    }
    let _ = writeln!(out, "[{}: process more]", guide.toggle_label());
    out
}

fn render_tabs(out: &mut String, view: &AppViewModel) {
    let tabs: Vec<String> = view
        .tabs
        .iter()
        .map(|tab| {
            if tab.active {
                format!("[{} ({})]", tab.label, tab.count)
            } else {
                format!(" {} ({}) ", tab.label, tab.count)
            }
        })
        .collect();
    let _ = writeln!(out, "{}", tabs.join(" | "));
}

fn render_cards(out: &mut String, cards: &[CardView]) {
    if cards.is_empty() {
        out.push_str("Nothing here yet.\n");
        return;
    }
    for (index, card) in cards.iter().enumerate() {
        let marker = if card.busy { " *" } else { "" };
        let _ = writeln!(out, "{}. {}{marker}", index + 1, card.title);
        if let Some(date) = &card.date {
            match &card.schedule_time {
                Some(time) => {
                    let _ = writeln!(out, "   {date} at {time}");
                }
                None => {
                    let _ = writeln!(out, "   {date}");
                }
            }
        }
        render_ratings(out, &card.ratings);
        if let Some(excerpt) = &card.excerpt {
            let _ = writeln!(out, "   {}", excerpt.text);
            if let Some(label) = excerpt.toggle_label() {
                let _ = writeln!(out, "   [{label}: more {}]", index + 1);
            }
        }
        if let Some(link) = &card.link {
            render_link(out, link);
        }
        if let Some(status) = card.status {
            let _ = writeln!(out, "   Status: {status}");
        }
    }
}

fn render_detail(out: &mut String, detail: &DetailView, content: &dyn ContentRenderer) {
    let _ = writeln!(out, "{}", detail.title);
    if detail.kind == ResourceKind::Experience {
        let _ = writeln!(out, "by {}", detail.author);
    }
    if let Some(date) = &detail.date {
        let _ = writeln!(out, "{date}");
    }
    if let Some(time) = &detail.schedule_time {
        let _ = writeln!(out, "Time: {time}");
    }
    render_ratings(out, &detail.ratings);
    if let Some(body) = &detail.content {
        let _ = writeln!(out, "\n{}\n", content.to_markdown(body));
    }
    if let Some(link) = &detail.link {
        render_link(out, link);
    }
    if let Some(status) = detail.status {
        let _ = writeln!(out, "Status: {status}");
    }
}

fn render_form(out: &mut String, form: &FormView) {
    let verb = if form.is_new { "New" } else { "Edit" };
    let _ = writeln!(out, "{verb} {}", form.kind.noun());
    let fields = &form.draft.fields;
    let _ = writeln!(out, "  title: {}", fields.title.as_deref().unwrap_or(""));
    let _ = writeln!(out, "  content: {}", fields.content.as_deref().unwrap_or(""));
    for (index, rating) in fields.ratings.iter().enumerate() {
        let _ = writeln!(out, "  rating {}: {} = {}", index + 1, rating.label, rating.score);
    }
    if form.kind == ResourceKind::GdSchedule {
        let date = fields
            .created_at
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let _ = writeln!(out, "  date: {date}");
        let _ = writeln!(
            out,
            "  time: {}",
            fields.schedule_time.as_deref().unwrap_or("")
        );
        if let Some(link) = &fields.link {
            let _ = writeln!(out, "  link: {}", link.url.as_deref().unwrap_or(""));
            let _ = writeln!(out, "  visible: {}", link.visible);
        }
        let shortlisted = match fields.shortlisted {
            Some(true) => "yes",
            Some(false) => "no",
            None => "pending",
        };
        let _ = writeln!(out, "  shortlisted: {shortlisted}");
    }
    if let Some(error) = &form.error {
        let _ = writeln!(out, "! {error}");
    }
    if form.saving {
        out.push_str("Saving...\n");
    }
}

fn render_ratings(out: &mut String, ratings: &[RatingView]) {
    for rating in ratings {
        let _ = writeln!(out, "   {}: {}", rating.label, rating.stars);
    }
}

fn render_link(out: &mut String, link: &LinkStatus) {
    match link {
        LinkStatus::Start { url } => {
            let _ = writeln!(out, "   Start: {url}");
        }
        other => {
            let _ = writeln!(out, "   {}", other.message());
        }
    }
}
