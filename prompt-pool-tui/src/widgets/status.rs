//! Status bar widget.

use crate::events::PushStatus;
use crate::notifications::Notification;
use crate::theme::{notification_color, push_status_color, Palette};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub struct StatusBar<'a> {
    pub visible: usize,
    pub total: usize,
    pub filtered: bool,
    pub push_status: PushStatus,
    pub notification: Option<&'a Notification>,
    pub palette: &'a Palette,
}

impl<'a> StatusBar<'a> {
    pub fn summary(&self) -> String {
        let noun = if self.total == 1 { "item" } else { "items" };
        if self.filtered {
            format!("{} of {} {}", self.visible, self.total, noun)
        } else {
            format!("{} {}", self.total, noun)
        }
    }

    fn push_label(&self) -> String {
        match self.push_status {
            PushStatus::Connected => "live".to_string(),
            PushStatus::Reconnecting { attempt } => format!("reconnecting (attempt {})", attempt),
        }
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let separator = Span::styled(" • ", Style::default().fg(self.palette.text_dim));
        let mut spans = vec![
            Span::styled(self.summary(), Style::default().fg(self.palette.text_dim)),
            separator.clone(),
            Span::styled(
                self.push_label(),
                Style::default().fg(push_status_color(self.push_status, self.palette)),
            ),
        ];
        if let Some(note) = self.notification {
            spans.push(separator);
            spans.push(Span::styled(
                note.message.clone(),
                Style::default().fg(notification_color(note.level, self.palette)),
            ));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
