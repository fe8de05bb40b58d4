use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::LevelFilter;
use portal_core::process::ProcessGuide;
use portal_core::{update, AppState, AppViewModel, Effect, ItemId, MeetingLink, Msg, TabId, TabSpec};
use portal_engine::{ContentRenderer, Html2MdRenderer, ReqwestRemote};
use portal_logging::{portal_debug, portal_info};

use crate::config::{AppConfig, DEFAULT_CONFIG_PATH};
use crate::confirm::{ConfirmSlot, TerminalConfirmer};
use crate::effects::EffectRunner;
use crate::input::{parse_command, parse_confirmation, Command, Field, HELP};
use crate::render::{render, render_guide};

const LOG_PATH: &str = "./portal.log";

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Msg(Msg),
    Command(Command),
    InputClosed,
}

pub fn run() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = AppConfig::load(&config_path)?;
    portal_logging::initialize(config.log, LevelFilter::Info, Path::new(LOG_PATH));
    config.log_startup();

    let remote = ReqwestRemote::new(config.client_settings()?)
        .context("building HTTP client")?;
    let slot = ConfirmSlot::default();
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(
        Arc::new(remote),
        Arc::new(TerminalConfirmer::new(slot.clone())),
        event_tx.clone(),
    )
    .context("starting engine")?;
    spawn_input_thread(slot, event_tx).context("starting input reader")?;

    let mut app = App::new(config.tabs, Html2MdRenderer);
    println!("Type `help` for commands.");
    app.dispatch(Msg::Mounted, &runner);

    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Msg(msg) => app.dispatch(msg, &runner),
            AppEvent::Command(Command::Quit) | AppEvent::InputClosed => break,
            AppEvent::Command(command) => app.handle_command(command, &runner),
        }
    }

    app.dispatch(Msg::Unmounted, &runner);
    portal_info!("Exiting");
    Ok(())
}

fn spawn_input_thread(slot: ConfirmSlot, event_tx: mpsc::Sender<AppEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("portal-input".into())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if slot.is_waiting() {
                    slot.answer(parse_confirmation(&line));
                    continue;
                }
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(command) => {
                        if event_tx.send(AppEvent::Command(command)).is_err() {
                            return;
                        }
                    }
                    Err(err) => {
                        eprintln!("{err}");
                    }
                }
            }
            // A prompt left open on EOF is declined.
            slot.answer(false);
            let _ = event_tx.send(AppEvent::InputClosed);
        })?;
    Ok(())
}

/// Owns the state machine and the process guide; prints whenever either
/// changes.
pub struct App<R> {
    state: AppState,
    guide: ProcessGuide,
    renderer: R,
}

impl<R: ContentRenderer> App<R> {
    pub fn new(tabs: Vec<TabSpec>, renderer: R) -> Self {
        Self {
            state: AppState::new(tabs),
            guide: ProcessGuide::new(),
            renderer,
        }
    }

    fn dispatch(&mut self, msg: Msg, runner: &EffectRunner) {
        let effects = self.apply(msg);
        runner.enqueue(effects);
        if self.state.consume_dirty() {
            self.print(&render(&self.state.view(), &self.renderer));
        }
    }

    fn handle_command(&mut self, command: Command, runner: &EffectRunner) {
        match command {
            Command::Help => self.print(HELP),
            Command::Process => self.print(&render_guide(&self.guide)),
            Command::ProcessMore => {
                self.guide.toggle_show_all();
                self.print(&render_guide(&self.guide));
            }
            Command::ProcessStep(number) => {
                self.guide.toggle_step(number - 1);
                self.print(&render_guide(&self.guide));
            }
            command => match resolve(&self.state.view(), command) {
                Ok(msgs) => {
                    for msg in msgs {
                        self.dispatch(msg, runner);
                    }
                }
                Err(err) => self.print(&err),
            },
        }
    }

    fn apply(&mut self, msg: Msg) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        effects
    }

    fn print(&self, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", text.trim_end());
        let _ = stdout.flush();
    }
}

/// Maps a typed command onto the messages it stands for, given what is on
/// screen.
pub fn resolve(view: &AppViewModel, command: Command) -> Result<Vec<Msg>, String> {
    let msg = match command {
        Command::Tab(id) => Msg::TabSelected(TabId::new(id)),
        Command::Open(n) => Msg::ItemSelected(card_id(view, n)?),
        Command::Back => Msg::BackClicked,
        Command::New => Msg::CreateClicked,
        Command::Edit(n) => Msg::EditClicked(target_id(view, n)?),
        Command::Set(field, value) => set_field(view, field, &value)?,
        Command::Rate(n, score) => {
            let form = view.form.as_ref().ok_or("no form is open")?;
            let mut fields = form.draft.fields.clone();
            let rating = fields
                .ratings
                .get_mut(n - 1)
                .ok_or_else(|| format!("no rating {n}"))?;
            rating.score = score;
            Msg::DraftChanged(fields)
        }
        Command::Save => Msg::SaveClicked,
        Command::Cancel => Msg::EditCancelled,
        Command::Delete(n) => Msg::DeleteClicked(target_id(view, n)?),
        Command::More(n) => Msg::ToggleExpanded(card_id(view, n)?),
        Command::Refresh => Msg::RefreshClicked,
        Command::Dismiss => {
            return Ok(view
                .notifications
                .iter()
                .map(|notice| Msg::NotificationDismissed(notice.id))
                .collect())
        }
        Command::Process
        | Command::ProcessMore
        | Command::ProcessStep(_)
        | Command::Help
        | Command::Quit => Msg::NoOp,
    };
    portal_debug!("Resolved command to {:?}", msg);
    Ok(vec![msg])
}

fn card_id(view: &AppViewModel, n: usize) -> Result<ItemId, String> {
    view.cards
        .get(n - 1)
        .map(|card| card.id.clone())
        .ok_or_else(|| format!("no card {n}"))
}

/// Card `n` when given, otherwise the record open in the detail view.
fn target_id(view: &AppViewModel, n: Option<usize>) -> Result<ItemId, String> {
    match n {
        Some(n) => card_id(view, n),
        None => view
            .detail
            .as_ref()
            .map(|detail| detail.id.clone())
            .ok_or_else(|| "open a record or give a card number".to_string()),
    }
}

fn set_field(view: &AppViewModel, field: Field, value: &str) -> Result<Msg, String> {
    let form = view.form.as_ref().ok_or("no form is open")?;
    let mut fields = form.draft.fields.clone();
    let text = (!value.is_empty()).then(|| value.to_string());
    match field {
        Field::Title => fields.title = text,
        Field::Content => fields.content = text,
        Field::Time => fields.schedule_time = text,
        Field::Date => {
            fields.created_at = match text {
                None => None,
                Some(raw) => {
                    let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                        .map_err(|_| format!("expected YYYY-MM-DD, got {raw:?}"))?;
                    date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc())
                }
            }
        }
        Field::Link => fields.link.get_or_insert_with(MeetingLink::default).url = text,
        Field::LinkVisible => {
            fields.link.get_or_insert_with(MeetingLink::default).visible = parse_flag(value)?
        }
        Field::Shortlisted => {
            fields.shortlisted = match value.to_ascii_lowercase().as_str() {
                "" | "pending" => None,
                other => Some(parse_flag(other)?),
            }
        }
    }
    Ok(Msg::DraftChanged(fields))
}

fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "on" => Ok(true),
        "no" | "n" | "false" | "off" => Ok(false),
        other => Err(format!("expected yes or no, got {other:?}")),
    }
}
