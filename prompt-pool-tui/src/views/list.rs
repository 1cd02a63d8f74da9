//! Record list view.

use crate::state::ViewModel;
use crate::theme::Palette;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const SELECTED_MARKER: &str = "│ ";
const UNSELECTED_MARKER: &str = "  ";

pub fn render(f: &mut Frame<'_>, model: &ViewModel, palette: &Palette, area: Rect) {
    let page = model.page_records();
    if page.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            format!("{}No items.", UNSELECTED_MARKER),
            Style::default().fg(palette.text_dim),
        )));
        f.render_widget(empty, area);
        return;
    }

    let selected = model.view.selected();
    let mut lines = Vec::with_capacity(page.len() * 3);
    for (index, record) in page {
        let (marker, title_style, desc_style) = if selected == Some(index) {
            (
                Span::styled(SELECTED_MARKER, Style::default().fg(palette.selected_title)),
                Style::default().fg(palette.selected_title),
                Style::default().fg(palette.selected_desc),
            )
        } else {
            (
                Span::raw(UNSELECTED_MARKER),
                Style::default().fg(palette.text),
                Style::default().fg(palette.text_dim),
            )
        };
        lines.push(Line::from(vec![
            marker.clone(),
            Span::styled(record.title.clone(), title_style),
        ]));
        lines.push(Line::from(vec![
            marker,
            Span::styled(record.description.clone(), desc_style),
        ]));
        lines.push(Line::default());
    }
    f.render_widget(Paragraph::new(lines), area);
}
