//! Push channel listener with reconnect backoff.
//!
//! The listener is the only owner of the websocket. Every frame carries the
//! complete record list, so each decoded frame becomes one `ListReplaced`.
//! After a reconnect the list is fetched over REST before the new stream is
//! read, because pushes sent while disconnected are gone.

use crate::api_client::{ApiClientError, PushStream, RemoteClient, WsClient};
use crate::config::ReconnectConfig;
use crate::events::{Event, PushStatus};
use crate::reconciler::{EventSink, InboxClosed};
use futures_util::{Stream, StreamExt};
use prompt_pool_core::RecordList;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("push channel closed by the service")]
    Closed,
    #[error("push channel read failed: {0}")]
    Read(Box<WsError>),
    #[error("reconnect failed: {0}")]
    Connect(#[source] ApiClientError),
    #[error("resync after reconnect failed: {0}")]
    Resync(#[source] ApiClientError),
}

#[derive(Debug)]
enum ConnectionEnd {
    /// Shutdown was signalled or the reconciler is gone.
    Stopped,
    Lost(PushError),
}

pub struct PushListener<S: EventSink> {
    sink: S,
    remote: Arc<dyn RemoteClient>,
    ws: WsClient,
    reconnect: ReconnectConfig,
    shutdown: watch::Receiver<bool>,
}

impl<S: EventSink> PushListener<S> {
    pub fn new(
        sink: S,
        remote: Arc<dyn RemoteClient>,
        ws: WsClient,
        reconnect: ReconnectConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            sink,
            remote,
            ws,
            reconnect,
            shutdown,
        }
    }

    /// Listen on an already open connection until shutdown.
    ///
    /// Returns an error only once the connection is lost and the reconnect
    /// budget is spent.
    pub async fn run(mut self, first: PushStream) -> Result<(), PushError> {
        let mut stream = first;
        loop {
            let lost = match self.listen(&mut stream).await {
                ConnectionEnd::Stopped => {
                    if let Err(err) = stream.close(None).await {
                        debug!(error = %err, "Push channel close handshake failed");
                    }
                    info!("Push listener stopped");
                    return Ok(());
                }
                ConnectionEnd::Lost(err) => err,
            };
            warn!(error = %lost, "Push channel lost");
            match self.reestablish(lost).await? {
                Some(next) => stream = next,
                None => return Ok(()),
            }
        }
    }

    async fn listen<St>(&mut self, stream: &mut St) -> ConnectionEnd
    where
        St: Stream<Item = Result<Message, WsError>> + Unpin,
    {
        loop {
            let message = match until_shutdown(&mut self.shutdown, stream.next()).await {
                Some(message) => message,
                None => return ConnectionEnd::Stopped,
            };
            let forwarded = match message {
                None => return ConnectionEnd::Lost(PushError::Closed),
                Some(Err(err)) => return ConnectionEnd::Lost(PushError::Read(Box::new(err))),
                Some(Ok(Message::Text(text))) => self.forward(text.as_bytes()),
                Some(Ok(Message::Binary(bytes))) => self.forward(&bytes),
                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "Push channel close frame received");
                    return ConnectionEnd::Lost(PushError::Closed);
                }
                Some(Ok(_)) => Ok(()),
            };
            if forwarded.is_err() {
                return ConnectionEnd::Stopped;
            }
        }
    }

    fn forward(&self, payload: &[u8]) -> Result<(), InboxClosed> {
        match serde_json::from_slice::<RecordList>(payload) {
            Ok(records) => {
                debug!(count = records.len(), "Push received");
                self.sink.submit(Event::ListReplaced(records))
            }
            Err(err) => {
                warn!(error = %err, bytes = payload.len(), "Discarding malformed push frame");
                Ok(())
            }
        }
    }

    /// Reconnect with backoff and resync; `None` means shutdown came first.
    async fn reestablish(&mut self, lost: PushError) -> Result<Option<PushStream>, PushError> {
        if self.reconnect.max_attempts == 0 {
            error!("Push channel lost and reconnecting is disabled");
            return Err(lost);
        }
        let mut delay_ms = self.reconnect.initial_ms;
        let mut last = lost;
        for attempt in 1..=self.reconnect.max_attempts {
            if self
                .sink
                .submit(Event::PushStatus(PushStatus::Reconnecting { attempt }))
                .is_err()
            {
                return Ok(None);
            }

            let wait = Duration::from_millis(jittered_backoff(delay_ms, self.reconnect.jitter_ms));
            if until_shutdown(&mut self.shutdown, tokio::time::sleep(wait))
                .await
                .is_none()
            {
                return Ok(None);
            }
            delay_ms = next_delay(delay_ms, &self.reconnect);

            let Some(connected) = until_shutdown(&mut self.shutdown, self.ws.connect()).await
            else {
                return Ok(None);
            };
            let mut stream = match connected {
                Ok(stream) => stream,
                Err(err) => {
                    warn!(attempt, error = %err, "Push reconnect attempt failed");
                    last = PushError::Connect(err);
                    continue;
                }
            };

            let Some(fetched) =
                until_shutdown(&mut self.shutdown, self.remote.fetch_records()).await
            else {
                let _ = stream.close(None).await;
                return Ok(None);
            };
            match fetched {
                Ok(records) => {
                    info!(attempt, count = records.len(), "Push channel restored");
                    let resynced = self
                        .sink
                        .submit(Event::ListReplaced(records))
                        .and_then(|()| self.sink.submit(Event::PushStatus(PushStatus::Connected)));
                    if resynced.is_err() {
                        let _ = stream.close(None).await;
                        return Ok(None);
                    }
                    return Ok(Some(stream));
                }
                Err(err) => {
                    warn!(attempt, error = %err, "Resync after reconnect failed");
                    let _ = stream.close(None).await;
                    last = PushError::Resync(err);
                }
            }
        }
        error!(
            attempts = self.reconnect.max_attempts,
            error = %last,
            "Push reconnect budget exhausted"
        );
        Err(last)
    }
}

/// Run `fut` unless shutdown is signalled first.
///
/// A dropped shutdown sender counts as a shutdown signal.
async fn until_shutdown<F: Future>(
    shutdown: &mut watch::Receiver<bool>,
    fut: F,
) -> Option<F::Output> {
    if *shutdown.borrow() {
        return None;
    }
    tokio::select! {
        output = fut => Some(output),
        _ = shutdown.wait_for(|stop| *stop) => None,
    }
}

fn next_delay(current_ms: u64, config: &ReconnectConfig) -> u64 {
    let next = (current_ms as f64 * config.multiplier) as u64;
    next.min(config.max_ms)
}

fn jittered_backoff(base_ms: u64, jitter_ms: u64) -> u64 {
    if jitter_ms == 0 {
        return base_ms;
    }
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_nanos(0))
        .subsec_nanos() as u64;
    let jitter = nanos % jitter_ms;
    base_ms.saturating_add(jitter)
}
