use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use portal_core::Effect;
use portal_engine::{Confirmer, EngineEvent, EngineHandle, Remote};
use portal_logging::{portal_debug, portal_info, portal_warn};

use crate::app::AppEvent;

/// Hands effects to the engine and pumps its events back into the app loop.
pub struct EffectRunner {
    engine: Arc<EngineHandle>,
}

impl EffectRunner {
    pub fn new(
        remote: Arc<dyn Remote>,
        confirmer: Arc<dyn Confirmer>,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> io::Result<Self> {
        let engine = Arc::new(EngineHandle::new(remote, confirmer)?);
        let runner = Self { engine };
        runner.spawn_event_loop(event_tx)?;
        Ok(runner)
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match &effect {
                Effect::Fetch { tab, resource, .. } => {
                    portal_info!("Fetch tab={} path={}", tab, resource.path);
                }
                Effect::Confirm { prompt, .. } => {
                    portal_debug!("Confirm {:?}", prompt.title);
                }
                Effect::Delete { resource, id, .. } => {
                    portal_info!("Delete path={} id={}", resource.path, id);
                }
                Effect::Upsert {
                    resource, draft, ..
                } => {
                    portal_info!(
                        "Upsert path={} id={:?}",
                        resource.path,
                        draft.id.as_ref().map(|id| id.as_str())
                    );
                }
                Effect::CancelInFlight => {}
            }
            self.engine.submit(effect);
        }
    }

    fn spawn_event_loop(&self, event_tx: mpsc::Sender<AppEvent>) -> io::Result<()> {
        let engine = self.engine.clone();
        thread::Builder::new()
            .name("portal-events".into())
            .spawn(move || loop {
                let Some(event) = engine.recv_timeout(Duration::from_millis(100)) else {
                    continue;
                };
                log_failure(&event);
                if event_tx.send(AppEvent::Msg(event.into_msg())).is_err() {
                    break;
                }
            })?;
        Ok(())
    }
}

fn log_failure(event: &EngineEvent) {
    match event {
        EngineEvent::Fetched {
            tab,
            result: Err(err),
            ..
        } => portal_warn!("Fetch for tab {} failed: {}", tab, err),
        EngineEvent::Deleted { result: Err(err), .. } => portal_warn!("Delete failed: {}", err),
        EngineEvent::Upserted { result: Err(err), .. } => portal_warn!("Save failed: {}", err),
        _ => {}
    }
}
