//! Title bar widget, which doubles as the filter input.

use crate::theme::Palette;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub struct TitleBar<'a> {
    pub title: &'a str,
    /// The filter text, when filtering or a filter is applied.
    pub filter: Option<&'a str>,
    pub editing: bool,
    pub spinner: Option<&'a str>,
    pub palette: &'a Palette,
}

impl<'a> TitleBar<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let line = match self.filter {
            Some(text) => {
                let mut spans = vec![
                    Span::styled("Filter: ", Style::default().fg(self.palette.status)),
                    Span::styled(text.to_string(), Style::default().fg(self.palette.text)),
                ];
                if self.editing {
                    spans.push(Span::styled(
                        "_",
                        Style::default()
                            .fg(self.palette.selected_title)
                            .add_modifier(Modifier::SLOW_BLINK),
                    ));
                }
                Line::from(spans)
            }
            None => {
                let mut spans = vec![Span::styled(
                    format!(" {} ", self.title),
                    Style::default()
                        .fg(self.palette.title_fg)
                        .bg(self.palette.title_bg),
                )];
                if let Some(glyph) = self.spinner {
                    spans.push(Span::styled(
                        format!(" {}", glyph),
                        Style::default().fg(self.palette.selected_desc),
                    ));
                }
                Line::from(spans)
            }
        };
        f.render_widget(Paragraph::new(line), area);
    }
}
