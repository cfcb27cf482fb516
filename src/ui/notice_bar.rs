use crate::app::AppState;
use crate::ui::styles::severity_style;
use ratatui::{layout::Rect, text::Span, widgets::Paragraph, Frame};

/// Render the transient notice, if one is showing
pub fn render_notice_bar(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(active) = &app.notice {
        let notice = &active.notice;
        let text = Span::styled(format!(" {}", notice), severity_style(notice.severity));
        f.render_widget(Paragraph::new(text), area);
    }
}
