use crate::app::AppState;
use crate::domain::{deadline_class, format_deadline, time_left_badge, Task};
use crate::ui::styles::{
    border_style, deadline_style, default_style, done_style, hint_style, selected_style,
    title_style,
};
use chrono::NaiveDateTime;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Build the display line for one task
fn task_line(task: &Task, now: NaiveDateTime, selected: bool) -> Line<'static> {
    let mut spans = Vec::new();

    let checkbox = if task.completed { "[✓] " } else { "[ ] " };
    let text_style = if selected {
        selected_style()
    } else if task.completed {
        done_style()
    } else {
        default_style()
    };
    spans.push(Span::styled(checkbox.to_string(), text_style));
    spans.push(Span::styled(task.text.clone(), text_style));

    if let Some(deadline) = task.deadline() {
        let class = deadline_class(task, now);
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("⏰ {}", format_deadline(deadline, now)),
            deadline_style(class),
        ));

        if let Some(badge) = time_left_badge(task, now) {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(format!("({})", badge), deadline_style(class)));
        }
    }

    Line::from(spans)
}

/// Render the filtered task list
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let now = app.now();
    let tasks = app.visible_tasks_at(now);

    let title = format!(" Tasks · {} ({}) ", app.filter.label(), tasks.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(title, title_style()));

    if tasks.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            format!("  {}", app.filter.empty_message()),
            hint_style(),
        )))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = tasks
        .iter()
        .enumerate()
        .map(|(idx, task)| ListItem::new(task_line(task, now, idx == app.selected_index)))
        .collect();

    // ListState scrolls the view so the selected row stays on screen
    let mut state = ListState::default().with_selected(Some(app.selected_index));
    f.render_stateful_widget(List::new(items).block(block), area, &mut state);
}
