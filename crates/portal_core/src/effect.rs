use crate::{Draft, ItemId, ResourceSpec, TabId};

/// Stamp carried by every effect and echoed back by its completion message.
/// `generation` changes on every mount and unmount, so completions that
/// outlive their view are recognisable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub generation: u64,
    pub seq: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub text: String,
    pub confirm_label: String,
}

impl ConfirmPrompt {
    pub fn delete() -> Self {
        Self {
            title: "Are you sure?".to_string(),
            text: "You won't be able to revert this!".to_string(),
            confirm_label: "Yes, delete it!".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch {
        ticket: Ticket,
        tab: TabId,
        resource: ResourceSpec,
    },
    Confirm {
        ticket: Ticket,
        prompt: ConfirmPrompt,
    },
    Delete {
        ticket: Ticket,
        resource: ResourceSpec,
        id: ItemId,
    },
    Upsert {
        ticket: Ticket,
        resource: ResourceSpec,
        draft: Draft,
    },
    /// Abandon every request issued before this point.
    CancelInFlight,
}
