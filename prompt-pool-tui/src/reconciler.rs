//! Single-writer event loop that owns the view model.
//!
//! Every producer (key reader, push listener, ticker, finished remote calls)
//! submits into one unbounded inbox. The loop applies events one at a time in
//! arrival order and publishes an immutable snapshot after each, so readers
//! never see a half-applied list replacement.
//!
//! Remote calls never touch the record list. A delete or insert is only
//! visible once the service pushes the next full list.

use crate::api_client::RemoteClient;
use crate::config::TuiConfig;
use crate::events::{Event, RemoteOperation};
use crate::keys;
use crate::notifications::Notification;
use crate::state::ViewModel;
use crate::views::FrameLayout;
use chrono::Utc;
use prompt_pool_core::{DisplayOption, RecordList};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{debug, info, trace, warn};

/// Returned when the reconciler has stopped and no longer accepts events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("reconciler inbox closed")]
pub struct InboxClosed;

/// Where producers send their events.
pub trait EventSink: Send + Sync {
    fn submit(&self, event: Event) -> Result<(), InboxClosed>;
}

/// Cloneable submission handle for the reconciler inbox.
#[derive(Debug, Clone)]
pub struct ReconcilerHandle {
    tx: mpsc::UnboundedSender<Event>,
}

impl EventSink for ReconcilerHandle {
    fn submit(&self, event: Event) -> Result<(), InboxClosed> {
        self.tx.send(event).map_err(|_| InboxClosed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilerSettings {
    pub title: String,
    pub status_message_lifetime: Duration,
    pub shutdown_grace: Duration,
}

impl ReconcilerSettings {
    pub fn from_config(config: &TuiConfig) -> Self {
        Self {
            title: config.title.clone(),
            status_message_lifetime: config.status_message_lifetime(),
            shutdown_grace: config.shutdown_grace(),
        }
    }
}

impl Default for ReconcilerSettings {
    fn default() -> Self {
        Self::from_config(&TuiConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Reconciler {
    model: ViewModel,
    remote: Arc<dyn RemoteClient>,
    layout: Arc<dyn FrameLayout>,
    settings: ReconcilerSettings,
    inbox: mpsc::UnboundedReceiver<Event>,
    // Weak so that finished calls can report back without keeping the inbox open.
    outbox: mpsc::WeakUnboundedSender<Event>,
    snapshots: watch::Sender<Arc<ViewModel>>,
    tasks: JoinSet<()>,
}

impl Reconciler {
    pub fn new(
        remote: Arc<dyn RemoteClient>,
        layout: Arc<dyn FrameLayout>,
        settings: ReconcilerSettings,
    ) -> (Self, ReconcilerHandle, watch::Receiver<Arc<ViewModel>>) {
        let (tx, inbox) = mpsc::unbounded_channel();
        let model = ViewModel::new(settings.title.clone());
        let (snapshots, rx) = watch::channel(Arc::new(model.clone()));
        let reconciler = Self {
            model,
            remote,
            layout,
            settings,
            inbox,
            outbox: tx.downgrade(),
            snapshots,
            tasks: JoinSet::new(),
        };
        (reconciler, ReconcilerHandle { tx }, rx)
    }

    pub fn model(&self) -> &ViewModel {
        &self.model
    }

    /// Install the startup snapshot before any other event is read.
    pub fn seed(&mut self, records: RecordList) {
        info!(count = records.len(), "Seeding record list");
        self.model.view.replace_records(records);
        self.publish();
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    pub async fn run(mut self) -> ViewModel {
        while let Some(event) = self.inbox.recv().await {
            let flow = self.apply(event);
            self.publish();
            self.reap();
            if flow == Flow::Quit {
                break;
            }
        }
        self.finish_remote_calls().await;
        self.model
    }

    pub fn apply(&mut self, event: Event) -> Flow {
        trace!(event = event.name(), "Applying event");
        match event {
            Event::Input(key) => {
                if let Some(event) = keys::interpret(key, &self.model.view) {
                    return self.apply(event);
                }
            }
            Event::ListReplaced(records) => {
                debug!(count = records.len(), "Record list replaced");
                self.model.view.replace_records(records);
            }
            Event::ResizeRequested { width, height } => {
                self.model.resize(width, height, self.layout.as_ref());
                debug!(
                    width,
                    height,
                    per_page = self.model.per_page,
                    "Frame resized"
                );
            }
            Event::ToggleOption(option) => {
                self.model.view.toggle(option);
                self.model.relayout(self.layout.as_ref());
                debug!(
                    option = option.label(),
                    shown = self.model.view.shows(option),
                    "Display option toggled"
                );
            }
            Event::DeleteRequested => match self.model.view.selected_record() {
                Some(record) => {
                    let operation = RemoteOperation::Delete {
                        id: record.id,
                        title: record.title.clone(),
                    };
                    self.spawn_remote(operation);
                }
                None => debug!("Delete requested with nothing selected"),
            },
            Event::InsertRequested(record) => {
                self.model.view.take_draft();
                self.spawn_remote(RemoteOperation::Create(record));
            }
            Event::Navigate(movement) => {
                self.model.view.navigate(movement, self.model.per_page);
            }
            Event::Filter(edit) => self.model.view.edit_filter(edit),
            Event::Compose(edit) => self.model.view.edit_draft(edit),
            Event::PushStatus(status) => {
                if self.model.push_status != status {
                    info!(?status, "Push channel status changed");
                }
                self.model.push_status = status;
            }
            Event::RemoteCompleted(operation) => {
                let message = match &operation {
                    RemoteOperation::Create(record) => format!("Added \"{}\"", record.title),
                    RemoteOperation::Delete { title, .. } => format!("Deleted \"{}\"", title),
                };
                self.model.notification = Some(Notification::info(message));
            }
            Event::RemoteFailed { operation, error } => {
                warn!(operation = %operation, error = %error, "Remote call failed");
                self.model.notification = Some(Notification::error(format!(
                    "Could not {}: {}",
                    operation, error
                )));
            }
            Event::Tick => {
                if self.model.view.shows(DisplayOption::Spinner) {
                    self.model.advance_spinner();
                }
                let lifetime = self.settings.status_message_lifetime;
                if self
                    .model
                    .notification
                    .as_ref()
                    .is_some_and(|note| note.is_expired(Utc::now(), lifetime))
                {
                    self.model.notification = None;
                }
            }
            Event::Quit => {
                info!("Quit requested");
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    fn publish(&self) {
        self.snapshots.send_replace(Arc::new(self.model.clone()));
    }

    fn spawn_remote(&mut self, operation: RemoteOperation) {
        debug!(operation = %operation, "Starting remote call");
        let remote = Arc::clone(&self.remote);
        let outbox = self.outbox.clone();
        self.tasks.spawn(async move {
            let result = match &operation {
                RemoteOperation::Create(record) => remote
                    .create_record(record)
                    .await
                    .map(|created| debug!(id = %created.id, "Record created")),
                RemoteOperation::Delete { id, .. } => remote.delete_record(*id).await,
            };
            let event = match result {
                Ok(()) => Event::RemoteCompleted(operation),
                Err(err) => {
                    debug!(kind = ?err.kind(), "Remote call returned an error");
                    Event::RemoteFailed {
                        operation,
                        error: err.to_string(),
                    }
                }
            };
            if let Some(tx) = outbox.upgrade() {
                let _ = tx.send(event);
            }
        });
    }

    fn reap(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            if let Err(err) = result {
                warn!(error = %err, "Remote call task ended abnormally");
            }
        }
    }

    async fn finish_remote_calls(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let pending = self.tasks.len();
        let grace = self.settings.shutdown_grace;
        debug!(pending, ?grace, "Waiting for in-flight remote calls");
        let tasks = &mut self.tasks;
        let drained = tokio::time::timeout(grace, async {
            while tasks.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            warn!(
                abandoned = self.tasks.len(),
                "Abandoning remote calls after shutdown grace"
            );
            self.tasks.abort_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::PushStatus;
    use crate::notifications::NotificationLevel;
    use crate::test_helpers::MockRemote;
    use crate::views::ListFrame;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use prompt_pool_core::{ComposeEdit, FilterEdit, Movement, NewRecord, Record, RecordId};
    use prompt_pool_test_utils::fixtures;

    fn reconciler_with(
        remote: MockRemote,
    ) -> (
        Reconciler,
        ReconcilerHandle,
        watch::Receiver<Arc<ViewModel>>,
        Arc<MockRemote>,
    ) {
        let remote = Arc::new(remote);
        let (reconciler, handle, rx) = Reconciler::new(
            remote.clone(),
            Arc::new(ListFrame::default()),
            ReconcilerSettings::default(),
        );
        (reconciler, handle, rx, remote)
    }

    fn key(c: char) -> Event {
        Event::Input(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn ids(model: &ViewModel) -> Vec<i64> {
        model.view.records().iter().map(|r| r.id.value()).collect()
    }

    #[test]
    fn test_startup_fetch_selects_first() {
        let (mut reconciler, _handle, rx, _) = reconciler_with(MockRemote::default());
        reconciler.seed(vec![Record::new(1, "A", "d1")]);
        let snapshot = rx.borrow().clone();
        assert_eq!(snapshot.view.records().len(), 1);
        assert_eq!(snapshot.view.selected(), Some(0));
    }

    #[test]
    fn test_empty_push_clears_selection() {
        let (mut reconciler, _handle, _rx, _) = reconciler_with(MockRemote::default());
        reconciler.seed(fixtures::record_list(1));
        reconciler.apply(Event::ListReplaced(Vec::new()));
        assert_eq!(reconciler.model().view.selected(), None);
    }

    #[test]
    fn test_back_to_back_pushes_keep_last() {
        let (mut reconciler, _handle, _rx, _) = reconciler_with(MockRemote::default());
        reconciler.apply(Event::ListReplaced(fixtures::record_list(1)));
        reconciler.apply(Event::ListReplaced(fixtures::record_list(2)));
        assert_eq!(ids(reconciler.model()), vec![1, 2]);
    }

    #[test]
    fn test_replacement_is_idempotent() {
        let (mut reconciler, _handle, _rx, _) = reconciler_with(MockRemote::default());
        reconciler.apply(Event::ListReplaced(fixtures::record_list(4)));
        reconciler.apply(Event::Navigate(Movement::Last));
        let once = reconciler.model().clone();
        reconciler.apply(Event::ListReplaced(fixtures::record_list(4)));
        assert_eq!(reconciler.model(), &once);
    }

    #[tokio::test]
    async fn test_delete_waits_for_echo() {
        let (mut reconciler, handle, mut rx, remote) = reconciler_with(MockRemote::default());
        reconciler.seed(vec![Record::new(1, "A", "d1")]);
        let task = tokio::spawn(reconciler.run());

        handle.submit(Event::DeleteRequested).unwrap();
        let snapshot = rx
            .wait_for(|model| model.notification.is_some())
            .await
            .unwrap()
            .clone();
        assert_eq!(ids(&snapshot), vec![1]);
        assert_eq!(snapshot.notification.as_ref().unwrap().message, "Deleted \"A\"");
        assert_eq!(remote.calls(), vec!["delete:1".to_string()]);

        handle.submit(Event::ListReplaced(Vec::new())).unwrap();
        handle.submit(Event::Quit).unwrap();
        let last = task.await.unwrap();
        assert!(last.view.records().is_empty());
    }

    #[tokio::test]
    async fn test_insert_closes_form_without_adding() {
        let (mut reconciler, handle, mut rx, remote) = reconciler_with(MockRemote::default());
        reconciler.seed(fixtures::record_list(2));
        let task = tokio::spawn(reconciler.run());

        for event in [key('a'), key('N'), key('e'), key('w')] {
            handle.submit(event).unwrap();
        }
        handle
            .submit(Event::Input(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
            .unwrap();
        let snapshot = rx
            .wait_for(|model| model.notification.is_some())
            .await
            .unwrap()
            .clone();
        assert!(!snapshot.view.is_composing());
        assert_eq!(ids(&snapshot), vec![1, 2]);
        assert_eq!(remote.calls(), vec!["create:New".to_string()]);

        handle.submit(Event::Quit).unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_remote_failure_keeps_view() {
        let (mut reconciler, handle, mut rx, _) = reconciler_with(MockRemote::failing(500));
        reconciler.seed(fixtures::record_list(3));
        reconciler.apply(Event::Navigate(Movement::Down));
        let before = reconciler.model().view.clone();
        let task = tokio::spawn(reconciler.run());

        handle.submit(Event::DeleteRequested).unwrap();
        let snapshot = rx
            .wait_for(|model| model.notification.is_some())
            .await
            .unwrap()
            .clone();
        let note = snapshot.notification.as_ref().unwrap();
        assert_eq!(note.level, NotificationLevel::Error);
        assert!(note.message.starts_with("Could not delete \"Prompt 2\""));
        assert_eq!(snapshot.view, before);

        handle.submit(Event::Quit).unwrap();
        task.await.unwrap();
    }

    #[test]
    fn test_delete_with_empty_list_spawns_nothing() {
        let (mut reconciler, _handle, _rx, remote) = reconciler_with(MockRemote::default());
        assert_eq!(reconciler.apply(Event::DeleteRequested), Flow::Continue);
        assert_eq!(reconciler.in_flight(), 0);
        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_events_apply_in_arrival_order() {
        let (mut reconciler, handle, _rx, _) = reconciler_with(MockRemote::default());
        reconciler.apply(Event::ResizeRequested {
            width: 80,
            height: 24,
        });
        let task = tokio::spawn(reconciler.run());

        handle.submit(Event::ListReplaced(fixtures::record_list(5))).unwrap();
        handle.submit(Event::Navigate(Movement::Last)).unwrap();
        handle.submit(Event::ListReplaced(fixtures::record_list(2))).unwrap();
        handle.submit(Event::Navigate(Movement::Up)).unwrap();
        handle.submit(Event::Quit).unwrap();

        let last = task.await.unwrap();
        assert_eq!(ids(&last), vec![1, 2]);
        assert_eq!(last.view.selected(), Some(0));
    }

    #[test]
    fn test_filtering_swallows_command_keys() {
        let (mut reconciler, _handle, _rx, _) = reconciler_with(MockRemote::default());
        reconciler.seed(fixtures::record_list(3));
        reconciler.apply(key('/'));
        assert_eq!(reconciler.apply(key('q')), Flow::Continue);
        reconciler.apply(key('T'));
        reconciler.apply(key('x'));
        let view = &reconciler.model().view;
        assert!(view.is_filtering());
        assert_eq!(view.filter(), Some("qTx"));
        assert!(view.shows(DisplayOption::TitleBar));
        assert_eq!(reconciler.in_flight(), 0);
    }

    #[test]
    fn test_toggle_recomputes_page_size() {
        let (mut reconciler, _handle, _rx, _) = reconciler_with(MockRemote::default());
        reconciler.apply(Event::ResizeRequested {
            width: 80,
            height: 24,
        });
        assert_eq!(reconciler.model().per_page, 5);
        reconciler.apply(Event::ToggleOption(DisplayOption::Help));
        reconciler.apply(Event::ToggleOption(DisplayOption::StatusBar));
        assert_eq!(reconciler.model().per_page, 6);
    }

    #[test]
    fn test_title_bar_off_drops_filter() {
        let (mut reconciler, _handle, _rx, _) = reconciler_with(MockRemote::default());
        reconciler.seed(fixtures::record_list(3));
        reconciler.apply(Event::Filter(FilterEdit::Start));
        reconciler.apply(Event::Filter(FilterEdit::Insert('3')));
        reconciler.apply(Event::ToggleOption(DisplayOption::TitleBar));
        let view = &reconciler.model().view;
        assert!(!view.is_filtering());
        assert_eq!(view.filter(), None);
    }

    #[test]
    fn test_tick_advances_spinner_only_when_shown() {
        let (mut reconciler, _handle, _rx, _) = reconciler_with(MockRemote::default());
        reconciler.apply(Event::Tick);
        assert_eq!(reconciler.model().spinner_frame, 0);
        reconciler.apply(Event::ToggleOption(DisplayOption::Spinner));
        reconciler.apply(Event::Tick);
        assert_eq!(reconciler.model().spinner_frame, 1);
    }

    #[test]
    fn test_tick_expires_notification() {
        let (mut reconciler, _handle, _rx, _) = reconciler_with(MockRemote::default());
        reconciler.model.notification = Some(Notification::at(
            NotificationLevel::Info,
            "Deleted",
            Utc::now() - chrono::Duration::seconds(60),
        ));
        reconciler.apply(Event::Tick);
        assert!(reconciler.model().notification.is_none());
    }

    #[test]
    fn test_push_status_recorded() {
        let (mut reconciler, _handle, _rx, _) = reconciler_with(MockRemote::default());
        reconciler.apply(Event::PushStatus(PushStatus::Reconnecting { attempt: 3 }));
        assert_eq!(
            reconciler.model().push_status,
            PushStatus::Reconnecting { attempt: 3 }
        );
    }

    #[test]
    fn test_compose_edits_reach_draft() {
        let (mut reconciler, _handle, _rx, _) = reconciler_with(MockRemote::default());
        reconciler.apply(Event::Compose(ComposeEdit::Open));
        reconciler.apply(Event::Compose(ComposeEdit::Insert('h')));
        reconciler.apply(Event::Compose(ComposeEdit::SwitchField));
        reconciler.apply(Event::Compose(ComposeEdit::Insert('d')));
        let draft = reconciler.model().view.draft().cloned().unwrap();
        assert_eq!(draft.to_new_record(), Some(NewRecord::new("h", "d")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_abandons_slow_calls_after_grace() {
        let (mut reconciler, handle, _rx, remote) =
            reconciler_with(MockRemote::slow(Duration::from_secs(60)));
        reconciler.seed(fixtures::record_list(1));
        let task = tokio::spawn(reconciler.run());

        handle.submit(Event::DeleteRequested).unwrap();
        handle.submit(Event::Quit).unwrap();
        let last = task.await.unwrap();
        assert_eq!(ids(&last), vec![1]);
        assert_eq!(remote.calls(), vec!["delete:1".to_string()]);
    }

    #[tokio::test]
    async fn test_submit_after_stop_reports_closed() {
        let (reconciler, handle, _rx, _) = reconciler_with(MockRemote::default());
        let task = tokio::spawn(reconciler.run());
        handle.submit(Event::Quit).unwrap();
        task.await.unwrap();
        assert_eq!(handle.submit(Event::Tick), Err(InboxClosed));
    }

    #[tokio::test]
    async fn test_delete_targets_visible_selection() {
        let (mut reconciler, _handle, _rx, _) = reconciler_with(MockRemote::default());
        reconciler.seed(fixtures::titled(&[(1, "alpha"), (7, "beta")]));
        reconciler.apply(Event::Filter(FilterEdit::Start));
        reconciler.apply(Event::Filter(FilterEdit::Insert('b')));
        reconciler.apply(Event::Filter(FilterEdit::Accept));
        assert_eq!(
            reconciler.model().view.selected_record().map(|r| r.id),
            Some(RecordId::new(7))
        );
        reconciler.apply(Event::DeleteRequested);
        assert_eq!(reconciler.in_flight(), 1);
    }
}
