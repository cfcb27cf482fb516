use crate::app::AppState;
use crate::domain::{compute_stats, Filter};
use crate::ui::styles::{active_filter_style, border_style, default_style, hint_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render filter tabs and the task counters
pub fn render_filter_bar(f: &mut Frame, app: &AppState, area: Rect) {
    let mut spans = Vec::new();

    for (idx, filter) in Filter::all().iter().enumerate() {
        let label = format!(" {} {} ", idx + 1, filter.label());
        let style = if *filter == app.filter {
            active_filter_style()
        } else {
            default_style()
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }

    let stats = compute_stats(app.store.tasks());
    spans.push(Span::styled(
        format!(
            "   Total {} · Completed {} · Pending {}",
            stats.total, stats.completed, stats.pending
        ),
        hint_style(),
    ));

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(" Filter ", title_style())),
    );

    f.render_widget(paragraph, area);
}
