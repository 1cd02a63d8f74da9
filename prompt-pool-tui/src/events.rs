//! Event types for the reconciler inbox.

use crossterm::event::KeyEvent;
use prompt_pool_core::{
    ComposeEdit, DisplayOption, FilterEdit, Movement, NewRecord, RecordId, RecordList,
};
use std::fmt;

/// Everything that can change what the user sees.
///
/// Producers never touch the view directly; they submit one of these and the
/// reconciler applies it in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A raw key, interpreted against the input mode current when applied.
    Input(KeyEvent),
    ListReplaced(RecordList),
    ResizeRequested { width: u16, height: u16 },
    ToggleOption(DisplayOption),
    DeleteRequested,
    InsertRequested(NewRecord),
    Navigate(Movement),
    Filter(FilterEdit),
    Compose(ComposeEdit),
    PushStatus(PushStatus),
    /// The service accepted the call; the list itself changes only on echo.
    RemoteCompleted(RemoteOperation),
    RemoteFailed {
        operation: RemoteOperation,
        error: String,
    },
    Tick,
    Quit,
}

impl Event {
    /// Short label for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Event::Input(_) => "input",
            Event::ListReplaced(_) => "list_replaced",
            Event::ResizeRequested { .. } => "resize_requested",
            Event::ToggleOption(_) => "toggle_option",
            Event::DeleteRequested => "delete_requested",
            Event::InsertRequested(_) => "insert_requested",
            Event::Navigate(_) => "navigate",
            Event::Filter(_) => "filter",
            Event::Compose(_) => "compose",
            Event::PushStatus(_) => "push_status",
            Event::RemoteCompleted(_) => "remote_completed",
            Event::RemoteFailed { .. } => "remote_failed",
            Event::Tick => "tick",
            Event::Quit => "quit",
        }
    }
}

/// State of the push channel as shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PushStatus {
    #[default]
    Connected,
    Reconnecting { attempt: u32 },
}

/// The remote call a failure refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOperation {
    Create(NewRecord),
    Delete { id: RecordId, title: String },
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteOperation::Create(record) => write!(f, "add \"{}\"", record.title),
            RemoteOperation::Delete { title, .. } => write!(f, "delete \"{}\"", title),
        }
    }
}
