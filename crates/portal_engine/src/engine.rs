use std::io;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use portal_core::Effect;
use portal_logging::{portal_debug, portal_info};
use tokio_util::sync::CancellationToken;

use crate::{Confirmer, EngineEvent, Remote};

/// Runs effects on a private tokio runtime and reports their outcome as
/// [`EngineEvent`]s. Shareable between a submitting thread and a pumping
/// thread.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<Effect>,
    event_rx: Mutex<mpsc::Receiver<EngineEvent>>,
}

impl EngineHandle {
    pub fn new(remote: Arc<dyn Remote>, confirmer: Arc<dyn Confirmer>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Effect>();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::Builder::new()
            .name("portal-engine".into())
            .spawn(move || {
                let mut cancel = CancellationToken::new();
                while let Ok(effect) = cmd_rx.recv() {
                    if effect == Effect::CancelInFlight {
                        portal_info!("Cancelling in-flight requests");
                        cancel.cancel();
                        cancel = CancellationToken::new();
                        continue;
                    }
                    let token = cancel.clone();
                    let remote = remote.clone();
                    let confirmer = confirmer.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        tokio::select! {
                            () = token.cancelled() => {
                                portal_debug!("Dropped cancelled effect");
                            }
                            event = run_effect(remote.as_ref(), confirmer.as_ref(), effect) => {
                                if let Some(event) = event {
                                    let _ = event_tx.send(event);
                                }
                            }
                        }
                    });
                }
                // Command channel closed: let outstanding work wind down.
                cancel.cancel();
                runtime.shutdown_timeout(Duration::from_secs(1));
            })?;

        Ok(Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
        })
    }

    pub fn submit(&self, effect: Effect) {
        let _ = self.cmd_tx.send(effect);
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}

async fn run_effect(
    remote: &dyn Remote,
    confirmer: &dyn Confirmer,
    effect: Effect,
) -> Option<EngineEvent> {
    match effect {
        Effect::Fetch {
            ticket,
            tab,
            resource,
        } => {
            let result = remote.list(&resource).await;
            Some(EngineEvent::Fetched {
                ticket,
                tab,
                result,
            })
        }
        Effect::Confirm { ticket, prompt } => {
            let confirmed = confirmer.confirm(&prompt).await;
            Some(EngineEvent::Confirmed { ticket, confirmed })
        }
        Effect::Delete {
            ticket,
            resource,
            id,
        } => {
            let result = remote.delete(&resource, &id).await;
            Some(EngineEvent::Deleted { ticket, result })
        }
        Effect::Upsert {
            ticket,
            resource,
            draft,
        } => {
            let result = remote.upsert(&resource, &draft).await;
            Some(EngineEvent::Upserted { ticket, result })
        }
        Effect::CancelInFlight => None,
    }
}
