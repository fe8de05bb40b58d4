use portal_core::ConfirmPrompt;

/// Asks the user to approve a destructive action.
#[async_trait::async_trait]
pub trait Confirmer: Send + Sync {
    /// Resolves to `true` only on explicit approval.
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool;
}

/// Answers every prompt the same way. Used by tests and non-interactive runs.
#[derive(Debug, Clone, Copy)]
pub struct StaticConfirmer(pub bool);

#[async_trait::async_trait]
impl Confirmer for StaticConfirmer {
    async fn confirm(&self, _prompt: &ConfirmPrompt) -> bool {
        self.0
    }
}
