//! Prompt Pool Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - Proptest generators for records and view inputs
//! - Fixtures for the common list scenarios

pub use prompt_pool_core::{
    ComposeEdit, DisplayOption, DisplayOptions, FilterEdit, Movement, NewRecord, Record,
    RecordId, RecordList, ViewState,
};

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    use super::*;

    /// A record with a predictable title and description.
    pub fn record(id: i64) -> Record {
        Record::new(id, format!("Prompt {}", id), format!("Description {}", id))
    }

    /// Records with ids `1..=count`.
    pub fn record_list(count: usize) -> RecordList {
        (1..=count as i64).map(record).collect()
    }

    /// Records built from `(id, title)` pairs.
    pub fn titled(items: &[(i64, &str)]) -> RecordList {
        items
            .iter()
            .map(|(id, title)| Record::new(*id, *title, format!("about {}", title)))
            .collect()
    }

    /// The JSON array the service pushes for `records`.
    pub fn push_payload(records: &[Record]) -> String {
        serde_json::to_string(records).unwrap_or_else(|_| "[]".to_string())
    }

    /// A view already holding `records`.
    pub fn seeded_view(records: RecordList) -> ViewState {
        let mut view = ViewState::new();
        view.replace_records(records);
        view
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    use super::*;
    use proptest::prelude::*;

    pub fn arb_record_id() -> impl Strategy<Value = RecordId> {
        (0i64..10_000).prop_map(RecordId::new)
    }

    pub fn arb_record() -> impl Strategy<Value = Record> {
        (arb_record_id(), "[A-Za-z][A-Za-z0-9 ]{0,23}", "[A-Za-z0-9 .,]{0,48}")
            .prop_map(|(id, title, description)| Record::new(id, title, description))
    }

    /// A snapshot with unique ids, as the service would send it.
    pub fn arb_record_list() -> impl Strategy<Value = RecordList> {
        prop::collection::vec(arb_record(), 0..16).prop_map(|records| {
            let mut seen = std::collections::HashSet::new();
            records
                .into_iter()
                .filter(|record| seen.insert(record.id))
                .collect()
        })
    }

    pub fn arb_new_record() -> impl Strategy<Value = NewRecord> {
        ("[A-Za-z][A-Za-z0-9 ]{0,23}", "[A-Za-z0-9 ]{0,32}")
            .prop_map(|(title, description)| NewRecord::new(title, description))
    }

    pub fn arb_display_option() -> impl Strategy<Value = DisplayOption> {
        prop_oneof![
            Just(DisplayOption::TitleBar),
            Just(DisplayOption::StatusBar),
            Just(DisplayOption::Pagination),
            Just(DisplayOption::Help),
            Just(DisplayOption::Spinner),
        ]
    }

    pub fn arb_movement() -> impl Strategy<Value = Movement> {
        prop_oneof![
            Just(Movement::Up),
            Just(Movement::Down),
            Just(Movement::PageUp),
            Just(Movement::PageDown),
            Just(Movement::First),
            Just(Movement::Last),
        ]
    }
}
