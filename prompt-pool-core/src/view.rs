//! View state for the record list.
//!
//! `ViewState` owns the current snapshot together with everything the user
//! has chosen about how to look at it: selection, display options, filter and
//! the active input mode. Every transition here is synchronous and total, so
//! the event loop can apply them one at a time without locks.

use crate::{NewRecord, Record, RecordList};
use bitflags::bitflags;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

// ============================================================================
// DISPLAY OPTIONS
// ============================================================================

bitflags! {
    /// Which chrome elements surround the list.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DisplayOptions: u8 {
        const TITLE_BAR = 0b0000_0001;
        const STATUS_BAR = 0b0000_0010;
        const PAGINATION = 0b0000_0100;
        const HELP = 0b0000_1000;
        const SPINNER = 0b0001_0000;
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::TITLE_BAR | Self::STATUS_BAR | Self::PAGINATION | Self::HELP
    }
}

/// A single toggleable display option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayOption {
    TitleBar,
    StatusBar,
    Pagination,
    Help,
    Spinner,
}

impl DisplayOption {
    pub fn all() -> &'static [DisplayOption] {
        &[
            DisplayOption::TitleBar,
            DisplayOption::StatusBar,
            DisplayOption::Pagination,
            DisplayOption::Help,
            DisplayOption::Spinner,
        ]
    }

    pub fn flag(self) -> DisplayOptions {
        match self {
            DisplayOption::TitleBar => DisplayOptions::TITLE_BAR,
            DisplayOption::StatusBar => DisplayOptions::STATUS_BAR,
            DisplayOption::Pagination => DisplayOptions::PAGINATION,
            DisplayOption::Help => DisplayOptions::HELP,
            DisplayOption::Spinner => DisplayOptions::SPINNER,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DisplayOption::TitleBar => "title",
            DisplayOption::StatusBar => "status",
            DisplayOption::Pagination => "pagination",
            DisplayOption::Help => "help",
            DisplayOption::Spinner => "spinner",
        }
    }
}

// ============================================================================
// INPUT MODES
// ============================================================================

/// Selection movement within the visible records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Up,
    Down,
    PageUp,
    PageDown,
    First,
    Last,
}

/// Edits to the filter text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterEdit {
    /// Enter filtering mode with an empty filter.
    Start,
    Insert(char),
    Backspace,
    /// Leave filtering mode and keep the filter applied.
    Accept,
    /// Leave filtering mode and drop the filter.
    Cancel,
    /// Drop an applied filter while browsing.
    Clear,
}

/// Edits to the insert form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeEdit {
    Open,
    Insert(char),
    Backspace,
    SwitchField,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftField {
    #[default]
    Title,
    Description,
}

/// A record being typed into the insert form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub field: DraftField,
}

impl Draft {
    fn active_mut(&mut self) -> &mut String {
        match self.field {
            DraftField::Title => &mut self.title,
            DraftField::Description => &mut self.description,
        }
    }

    /// The create body for this draft, or `None` while the title is blank.
    pub fn to_new_record(&self) -> Option<NewRecord> {
        let title = self.title.trim();
        if title.is_empty() {
            return None;
        }
        Some(NewRecord::new(title, self.description.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Browsing,
    Filtering,
    Composing(Draft),
}

// ============================================================================
// VIEW STATE
// ============================================================================

/// Everything the user sees, minus layout.
///
/// `selected` is always either `None` (empty list) or a valid index into
/// `records`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    records: RecordList,
    selected: Option<usize>,
    options: DisplayOptions,
    filter: Option<String>,
    mode: InputMode,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn options(&self) -> DisplayOptions {
        self.options
    }

    pub fn shows(&self, option: DisplayOption) -> bool {
        self.options.contains(option.flag())
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    pub fn is_filtering(&self) -> bool {
        matches!(self.mode, InputMode::Filtering)
    }

    pub fn is_composing(&self) -> bool {
        matches!(self.mode, InputMode::Composing(_))
    }

    pub fn draft(&self) -> Option<&Draft> {
        match &self.mode {
            InputMode::Composing(draft) => Some(draft),
            _ => None,
        }
    }

    /// Filtering follows the title bar, as the filter input lives there.
    pub fn filtering_enabled(&self) -> bool {
        self.options.contains(DisplayOptions::TITLE_BAR)
    }

    /// Swap in a new snapshot and bring the selection back into range.
    pub fn replace_records(&mut self, records: RecordList) {
        self.records = records;
        self.clamp_selection();
        self.follow_filter();
    }

    fn clamp_selection(&mut self) {
        let len = self.records.len();
        self.selected = if len == 0 {
            None
        } else {
            Some(self.selected.unwrap_or(0).min(len - 1))
        };
    }

    /// Indices into `records` that pass the current filter, in list order.
    pub fn visible_indices(&self) -> Vec<usize> {
        match self.filter.as_deref() {
            Some(pattern) if !pattern.is_empty() => {
                let matcher = SkimMatcherV2::default().ignore_case();
                self.records
                    .iter()
                    .enumerate()
                    .filter(|(_, record)| matcher.fuzzy_match(&record.title, pattern).is_some())
                    .map(|(index, _)| index)
                    .collect()
            }
            _ => (0..self.records.len()).collect(),
        }
    }

    /// Position of the selection among the visible records.
    pub fn selected_position(&self) -> Option<usize> {
        let selected = self.selected?;
        self.visible_indices().iter().position(|&i| i == selected)
    }

    /// The selected record, if it is currently visible.
    pub fn selected_record(&self) -> Option<&Record> {
        self.selected_position()?;
        self.selected.and_then(|i| self.records.get(i))
    }

    pub fn toggle(&mut self, option: DisplayOption) {
        self.options.toggle(option.flag());
        if option == DisplayOption::TitleBar && !self.filtering_enabled() {
            self.filter = None;
            if self.is_filtering() {
                self.mode = InputMode::Browsing;
            }
        }
    }

    pub fn navigate(&mut self, movement: Movement, per_page: usize) {
        let visible = self.visible_indices();
        if visible.is_empty() {
            return;
        }
        let last = visible.len() - 1;
        let current = self.selected_position().unwrap_or(0);
        let step = per_page.max(1);
        let next = match movement {
            Movement::Up => current.saturating_sub(1),
            Movement::Down => (current + 1).min(last),
            Movement::PageUp => current.saturating_sub(step),
            Movement::PageDown => (current + step).min(last),
            Movement::First => 0,
            Movement::Last => last,
        };
        self.selected = Some(visible[next]);
    }

    pub fn edit_filter(&mut self, edit: FilterEdit) {
        match edit {
            FilterEdit::Start => {
                if self.filtering_enabled() && self.mode == InputMode::Browsing {
                    self.mode = InputMode::Filtering;
                    self.filter = Some(String::new());
                }
            }
            FilterEdit::Insert(c) => {
                if self.is_filtering() {
                    self.filter.get_or_insert_with(String::new).push(c);
                }
            }
            FilterEdit::Backspace => {
                if self.is_filtering() {
                    if let Some(filter) = self.filter.as_mut() {
                        filter.pop();
                    }
                }
            }
            FilterEdit::Accept => {
                if self.is_filtering() {
                    self.mode = InputMode::Browsing;
                    if self.filter.as_deref().is_some_and(str::is_empty) {
                        self.filter = None;
                    }
                }
            }
            FilterEdit::Cancel => {
                if self.is_filtering() {
                    self.mode = InputMode::Browsing;
                    self.filter = None;
                }
            }
            FilterEdit::Clear => {
                if self.mode == InputMode::Browsing {
                    self.filter = None;
                }
            }
        }
        self.follow_filter();
    }

    /// Move a hidden selection onto the first visible record.
    fn follow_filter(&mut self) {
        if self.selected.is_none() || self.selected_position().is_some() {
            return;
        }
        if let Some(&first) = self.visible_indices().first() {
            self.selected = Some(first);
        }
    }

    pub fn edit_draft(&mut self, edit: ComposeEdit) {
        if edit == ComposeEdit::Open {
            if self.mode == InputMode::Browsing {
                self.mode = InputMode::Composing(Draft::default());
            }
            return;
        }
        let InputMode::Composing(draft) = &mut self.mode else {
            return;
        };
        match edit {
            ComposeEdit::Insert(c) => draft.active_mut().push(c),
            ComposeEdit::Backspace => {
                draft.active_mut().pop();
            }
            ComposeEdit::SwitchField => {
                draft.field = match draft.field {
                    DraftField::Title => DraftField::Description,
                    DraftField::Description => DraftField::Title,
                };
            }
            ComposeEdit::Cancel => self.mode = InputMode::Browsing,
            ComposeEdit::Open => {}
        }
    }

    /// Close the insert form, handing back what was typed.
    pub fn take_draft(&mut self) -> Option<Draft> {
        match std::mem::take(&mut self.mode) {
            InputMode::Composing(draft) => Some(draft),
            other => {
                self.mode = other;
                None
            }
        }
    }
}


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
