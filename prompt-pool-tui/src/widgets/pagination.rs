//! Page indicator widget.

use crate::theme::Palette;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const ACTIVE_DOT: &str = "•";
const INACTIVE_DOT: &str = "◦";

pub struct Pagination<'a> {
    pub page: usize,
    pub pages: usize,
    pub palette: &'a Palette,
}

impl<'a> Pagination<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        if self.pages <= 1 {
            return;
        }
        // Dots take two columns each; fall back to a counter when they do not fit.
        let line = if self.pages * 2 > usize::from(area.width) {
            Line::from(Span::styled(
                format!("{}/{}", self.page + 1, self.pages),
                Style::default().fg(self.palette.text_dim),
            ))
        } else {
            let spans: Vec<Span> = (0..self.pages)
                .map(|page| {
                    if page == self.page {
                        Span::styled(
                            format!("{} ", ACTIVE_DOT),
                            Style::default().fg(self.palette.text),
                        )
                    } else {
                        Span::styled(
                            format!("{} ", INACTIVE_DOT),
                            Style::default().fg(self.palette.text_dim),
                        )
                    }
                })
                .collect();
            Line::from(spans)
        };
        f.render_widget(Paragraph::new(line), area);
    }
}
