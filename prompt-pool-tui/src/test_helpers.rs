//! Test doubles shared by the unit tests.

use crate::api_client::{ApiClientError, RemoteClient};
use crate::events::Event;
use crate::reconciler::{EventSink, InboxClosed};
use async_trait::async_trait;
use prompt_pool_core::{NewRecord, Record, RecordId, RecordList};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory remote that records every call.
///
/// Calls never touch `records`; list changes only reach the view through a
/// push, the same as against the real service.
#[derive(Default)]
pub struct MockRemote {
    pub records: Mutex<RecordList>,
    pub calls: Mutex<Vec<String>>,
    pub fail_with: Option<u16>,
    pub delay: Option<Duration>,
}

impl MockRemote {
    pub fn with_records(records: RecordList) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn call(&self, name: String) -> Result<(), ApiClientError> {
        self.calls.lock().unwrap().push(name);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.fail_with {
            Some(status) => Err(ApiClientError::Status {
                status,
                body: "mock failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteClient for MockRemote {
    async fn fetch_records(&self) -> Result<RecordList, ApiClientError> {
        self.call("fetch".to_string()).await?;
        Ok(self.records.lock().unwrap().clone())
    }

    async fn create_record(&self, record: &NewRecord) -> Result<Record, ApiClientError> {
        self.call(format!("create:{}", record.title)).await?;
        Ok(Record::new(1000, record.title.clone(), record.description.clone()))
    }

    async fn delete_record(&self, id: RecordId) -> Result<(), ApiClientError> {
        self.call(format!("delete:{}", id)).await
    }
}

/// Sink that keeps every submitted event.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn lists(&self) -> Vec<RecordList> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::ListReplaced(list) => Some(list),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn submit(&self, event: Event) -> Result<(), InboxClosed> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}
