//! Frame geometry for the list screen.

use prompt_pool_core::{DisplayOption, DisplayOptions};

/// Answers the two sizing questions the reconciler asks on resize.
pub trait FrameLayout: Send + Sync {
    /// Usable size inside the frame padding.
    fn content_size(&self, width: u16, height: u16) -> (u16, u16);

    /// How many records fit once the enabled chrome rows are taken out.
    fn items_per_page(&self, content_height: u16, options: DisplayOptions) -> usize;
}

/// Rows taken by each chrome element when shown.
pub fn chrome_rows(option: DisplayOption) -> u16 {
    match option {
        DisplayOption::TitleBar => 2,
        DisplayOption::StatusBar => 2,
        DisplayOption::Pagination => 1,
        DisplayOption::Help => 2,
        DisplayOption::Spinner => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListFrame {
    pub padding_vertical: u16,
    pub padding_horizontal: u16,
    /// Title line, description line and a spacer.
    pub item_height: u16,
}

impl Default for ListFrame {
    fn default() -> Self {
        Self {
            padding_vertical: 1,
            padding_horizontal: 2,
            item_height: 3,
        }
    }
}

impl FrameLayout for ListFrame {
    fn content_size(&self, width: u16, height: u16) -> (u16, u16) {
        (
            width.saturating_sub(self.padding_horizontal * 2),
            height.saturating_sub(self.padding_vertical * 2),
        )
    }

    fn items_per_page(&self, content_height: u16, options: DisplayOptions) -> usize {
        let chrome: u16 = DisplayOption::all()
            .iter()
            .filter(|option| options.contains(option.flag()))
            .map(|option| chrome_rows(*option))
            .sum();
        let available = content_height.saturating_sub(chrome);
        usize::from((available / self.item_height.max(1)).max(1))
    }
}
