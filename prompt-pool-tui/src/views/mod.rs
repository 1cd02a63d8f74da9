//! View rendering dispatch.

pub mod compose;
pub mod layout;
pub mod list;

pub use layout::{chrome_rows, FrameLayout, ListFrame};

use crate::state::ViewModel;
use crate::theme::Palette;
use crate::widgets::{Pagination, StatusBar, TitleBar};
use prompt_pool_core::{DisplayOption, InputMode};
use ratatui::{
    backend::TestBackend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::Span,
    widgets::Paragraph,
    Frame, Terminal,
};

pub fn render_frame(f: &mut Frame<'_>, model: &ViewModel, palette: &Palette) {
    let view = &model.view;
    let shows_title = view.shows(DisplayOption::TitleBar);
    let shows_status = view.shows(DisplayOption::StatusBar);
    let shows_pagination = view.shows(DisplayOption::Pagination);
    let shows_help = view.shows(DisplayOption::Help);

    let mut constraints = Vec::with_capacity(5);
    if shows_title {
        constraints.push(Constraint::Length(chrome_rows(DisplayOption::TitleBar)));
    }
    if shows_status {
        constraints.push(Constraint::Length(chrome_rows(DisplayOption::StatusBar)));
    }
    constraints.push(Constraint::Min(0));
    if shows_pagination {
        constraints.push(Constraint::Length(chrome_rows(DisplayOption::Pagination)));
    }
    if shows_help {
        constraints.push(Constraint::Length(chrome_rows(DisplayOption::Help)));
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .vertical_margin(1)
        .horizontal_margin(2)
        .constraints(constraints)
        .split(f.size());
    let mut slots = chunks.iter().copied();

    if shows_title {
        if let Some(area) = slots.next() {
            TitleBar {
                title: &model.title,
                filter: view.filter(),
                editing: view.is_filtering(),
                spinner: view
                    .shows(DisplayOption::Spinner)
                    .then(|| model.spinner_glyph()),
                palette,
            }
            .render(f, area);
        }
    }

    if shows_status {
        if let Some(area) = slots.next() {
            StatusBar {
                visible: model.visible_count(),
                total: view.records().len(),
                filtered: view.filter().is_some_and(|text| !text.is_empty()),
                push_status: model.push_status,
                notification: model.notification.as_ref(),
                palette,
            }
            .render(f, area);
        }
    }

    if let Some(area) = slots.next() {
        match view.draft() {
            Some(draft) => compose::render(f, draft, palette, area),
            None => list::render(f, model, palette, area),
        }
    }

    if shows_pagination {
        if let Some(area) = slots.next() {
            Pagination {
                page: model.page(),
                pages: model.page_count(),
                palette,
            }
            .render(f, area);
        }
    }

    if shows_help {
        if let Some(area) = slots.next() {
            let help = Paragraph::new(Span::styled(
                help_text(view.mode()),
                Style::default().fg(palette.text_dim),
            ));
            f.render_widget(help, area);
        }
    }
}

fn help_text(mode: &InputMode) -> &'static str {
    match mode {
        InputMode::Browsing => {
            "↑/k up • ↓/j down • / filter • a add • x delete • T/S/P/H/s toggle • q quit"
        }
        InputMode::Filtering => "enter apply filter • esc cancel • ↑/↓ move",
        InputMode::Composing(_) => "tab switch field • enter save • esc cancel",
    }
}

/// Render one frame off-screen and return its text, one line per row.
pub fn render_text(
    model: &ViewModel,
    palette: &Palette,
    width: u16,
    height: u16,
) -> std::io::Result<String> {
    let mut terminal = Terminal::new(TestBackend::new(width, height))?;
    terminal.draw(|f| render_frame(f, model, palette))?;
    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        let mut row = String::new();
        for x in 0..buffer.area.width {
            row.push_str(buffer.get(x, y).symbol());
        }
        text.push_str(row.trim_end());
        text.push('\n');
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::PushStatus;
    use crate::notifications::Notification;
    use prompt_pool_core::{ComposeEdit, FilterEdit, Movement};
    use prompt_pool_test_utils::fixtures;

    const WIDTH: u16 = 80;
    const HEIGHT: u16 = 24;

    fn model(count: usize) -> ViewModel {
        let mut model = ViewModel::new("Prompt Pool");
        model.view.replace_records(fixtures::record_list(count));
        model.resize(WIDTH, HEIGHT, &ListFrame::default());
        model
    }

    fn text(model: &ViewModel) -> String {
        render_text(model, &Palette::default(), WIDTH, HEIGHT).unwrap()
    }

    #[test]
    fn test_renders_title_status_and_records() {
        let screen = text(&model(2));
        assert!(screen.contains("Prompt Pool"));
        assert!(screen.contains("2 items • live"));
        assert!(screen.contains("│ Prompt 1"));
        assert!(screen.contains("│ Description 1"));
        assert!(screen.contains("  Prompt 2"));
    }

    #[test]
    fn test_empty_list_message() {
        let screen = text(&model(0));
        assert!(screen.contains("No items."));
        assert!(screen.contains("0 items"));
    }

    #[test]
    fn test_pagination_dots_follow_page() {
        let mut model = model(12);
        assert!(screen_has_dots(&text(&model), "• ◦ ◦"));
        model.view.navigate(Movement::Last, model.per_page);
        assert!(screen_has_dots(&text(&model), "◦ ◦ •"));
        assert!(text(&model).contains("Prompt 12"));
    }

    fn screen_has_dots(screen: &str, dots: &str) -> bool {
        screen.lines().any(|line| line.trim() == dots)
    }

    #[test]
    fn test_filter_input_replaces_title() {
        let mut model = model(3);
        model.view.edit_filter(FilterEdit::Start);
        model.view.edit_filter(FilterEdit::Insert('2'));
        let screen = text(&model);
        assert!(screen.contains("Filter: 2_"));
        assert!(screen.contains("1 of 3 items"));
        assert!(!screen.contains("Prompt 1"));
        assert!(screen.contains("enter apply filter"));
    }

    #[test]
    fn test_hidden_chrome_not_drawn() {
        let mut model = model(1);
        model.view.toggle(DisplayOption::TitleBar);
        model.view.toggle(DisplayOption::Help);
        let screen = text(&model);
        assert!(!screen.contains("Prompt Pool"));
        assert!(!screen.contains("q quit"));
        assert!(screen.contains("1 item"));
    }

    #[test]
    fn test_compose_form_replaces_list() {
        let mut model = model(2);
        model.view.edit_draft(ComposeEdit::Open);
        for c in "Haiku".chars() {
            model.view.edit_draft(ComposeEdit::Insert(c));
        }
        let screen = text(&model);
        assert!(screen.contains("Add prompt"));
        assert!(screen.contains("> Title: Haiku_"));
        assert!(!screen.contains("Prompt 1"));
    }

    #[test]
    fn test_status_shows_notification_and_reconnect() {
        let mut model = model(1);
        model.push_status = PushStatus::Reconnecting { attempt: 2 };
        model.notification = Some(Notification::error("Could not delete \"Prompt 1\""));
        let screen = text(&model);
        assert!(screen.contains("reconnecting (attempt 2)"));
        assert!(screen.contains("Could not delete \"Prompt 1\""));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let model = model(5);
        assert!(render_text(&model, &Palette::default(), 4, 2).is_ok());
    }
}
