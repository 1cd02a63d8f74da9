//! Insert form.

use crate::theme::Palette;
use prompt_pool_core::{Draft, DraftField};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame<'_>, draft: &Draft, palette: &Palette, area: Rect) {
    let field_line = |label: &str, value: &str, field: DraftField| {
        let active = draft.field == field;
        let label_style = if active {
            Style::default()
                .fg(palette.selected_title)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text_dim)
        };
        let mut spans = vec![
            Span::styled(if active { "> " } else { "  " }, label_style),
            Span::styled(format!("{}: ", label), label_style),
            Span::styled(value.to_string(), Style::default().fg(palette.text)),
        ];
        if active {
            spans.push(Span::styled("_", Style::default().fg(palette.selected_title)));
        }
        Line::from(spans)
    };

    let lines = vec![
        field_line("Title", &draft.title, DraftField::Title),
        Line::default(),
        field_line("Description", &draft.description, DraftField::Description),
    ];
    let form = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(Span::styled(
                    " Add prompt ",
                    Style::default().fg(palette.title_fg).bg(palette.title_bg),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.text_dim)),
        );
    f.render_widget(form, area);
}
