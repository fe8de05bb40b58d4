use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use portal_core::ConfirmPrompt;
use portal_engine::Confirmer;
use portal_logging::portal_debug;
use tokio::sync::oneshot;

/// Answer channel of the prompt currently on screen, if any. The input thread
/// takes the sender and answers with the next line typed.
#[derive(Debug, Clone, Default)]
pub struct ConfirmSlot(Arc<Mutex<Option<oneshot::Sender<bool>>>>);

impl ConfirmSlot {
    fn arm(&self, answer: oneshot::Sender<bool>) {
        let mut slot = match self.0.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = Some(answer);
    }

    /// Resolves the open prompt with `confirmed`. Returns `false` when no
    /// prompt was waiting.
    pub fn answer(&self, confirmed: bool) -> bool {
        let taken = match self.0.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        match taken {
            Some(sender) => {
                let _ = sender.send(confirmed);
                true
            }
            None => false,
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.0.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }
}

/// Prints the prompt on stdout and waits for the user's `y`/`n`.
pub struct TerminalConfirmer {
    slot: ConfirmSlot,
}

impl TerminalConfirmer {
    pub fn new(slot: ConfirmSlot) -> Self {
        Self { slot }
    }
}

#[async_trait::async_trait]
impl Confirmer for TerminalConfirmer {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        let (tx, rx) = oneshot::channel();
        self.slot.arm(tx);
        {
            let mut stdout = io::stdout().lock();
            let _ = writeln!(stdout, "\n{} {}", prompt.title, prompt.text);
            let _ = write!(stdout, "{} [y/N] ", prompt.confirm_label);
            let _ = stdout.flush();
        }

        let confirmed = rx.await.unwrap_or(false);
        portal_debug!("Confirmation answered: {}", confirmed);
        confirmed
    }
}
