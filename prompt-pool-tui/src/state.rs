//! Presentation state published by the reconciler.

use crate::events::PushStatus;
use crate::notifications::Notification;
use crate::views::FrameLayout;
use prompt_pool_core::{Record, ViewState};

pub const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// One immutable frame of everything the renderer needs.
///
/// The scroll offset is never stored: it follows from the selected position
/// and the page size, so it cannot drift from the selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub title: String,
    pub view: ViewState,
    pub width: u16,
    pub height: u16,
    pub content_width: u16,
    pub content_height: u16,
    pub per_page: usize,
    pub spinner_frame: usize,
    pub push_status: PushStatus,
    pub notification: Option<Notification>,
}

impl ViewModel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            view: ViewState::new(),
            width: 0,
            height: 0,
            content_width: 0,
            content_height: 0,
            per_page: 1,
            spinner_frame: 0,
            push_status: PushStatus::Connected,
            notification: None,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16, layout: &dyn FrameLayout) {
        self.width = width;
        self.height = height;
        self.relayout(layout);
    }

    /// Recompute content size and page size for the current frame and options.
    pub fn relayout(&mut self, layout: &dyn FrameLayout) {
        let (content_width, content_height) = layout.content_size(self.width, self.height);
        self.content_width = content_width;
        self.content_height = content_height;
        self.per_page = layout
            .items_per_page(content_height, self.view.options())
            .max(1);
    }

    pub fn visible_count(&self) -> usize {
        self.view.visible_indices().len()
    }

    pub fn page_count(&self) -> usize {
        self.visible_count().div_ceil(self.per_page).max(1)
    }

    pub fn page(&self) -> usize {
        self.view.selected_position().unwrap_or(0) / self.per_page
    }

    pub fn scroll_offset(&self) -> usize {
        self.page() * self.per_page
    }

    /// The visible records on the current page, with their list index.
    pub fn page_records(&self) -> Vec<(usize, &Record)> {
        let records = self.view.records();
        self.view
            .visible_indices()
            .into_iter()
            .skip(self.scroll_offset())
            .take(self.per_page)
            .filter_map(|index| records.get(index).map(|record| (index, record)))
            .collect()
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
    }

    pub fn spinner_glyph(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }
}
