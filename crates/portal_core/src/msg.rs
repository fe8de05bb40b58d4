use crate::{ItemFields, ItemId, ListItem, PortalError, TabId, Ticket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The view was shown; loads every tab.
    Mounted,
    /// The view went away; pending results must be dropped.
    Unmounted,
    /// User asked to reload all tabs.
    RefreshClicked,
    /// Engine finished loading one tab.
    FetchCompleted {
        ticket: Ticket,
        tab: TabId,
        result: Result<Vec<ListItem>, PortalError>,
    },
    /// User switched tabs in the list view.
    TabSelected(TabId),
    /// User opened a card.
    ItemSelected(ItemId),
    /// User navigated back from the detail or edit view.
    BackClicked,
    /// User asked for an empty form.
    CreateClicked,
    /// User asked to edit an existing record.
    EditClicked(ItemId),
    /// Edit form contents changed.
    DraftChanged(ItemFields),
    SaveClicked,
    EditCancelled,
    /// Engine finished a create/update.
    UpsertCompleted {
        ticket: Ticket,
        result: Result<ListItem, PortalError>,
    },
    DeleteClicked(ItemId),
    /// User answered the confirmation prompt.
    ConfirmResolved { ticket: Ticket, confirmed: bool },
    /// Engine finished a delete.
    DeleteCompleted {
        ticket: Ticket,
        result: Result<(), PortalError>,
    },
    /// Read More / Read Less on a card.
    ToggleExpanded(ItemId),
    NotificationDismissed(u64),
    /// Input that resolved to nothing.
    NoOp,
}
