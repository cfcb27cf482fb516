use crate::app::AppState;
use crate::domain::{deadline_class, format_age, format_deadline, time_left_badge, DeadlineClass};
use crate::ui::styles::{border_style, deadline_style, default_style, title_style};
use chrono::Local;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the details pane for the selected task
pub fn render_details_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Details ", title_style()));

    let Some(task) = app.selected_task_id().and_then(|id| app.store.get(id)) else {
        f.render_widget(Paragraph::new("No task selected").block(block), area);
        return;
    };

    let now = app.now();
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled("Task:", title_style())));
    lines.push(Line::raw(format!("  {}", task.text)));
    lines.push(Line::raw(""));

    let status = if task.completed { "Completed" } else { "Pending" };
    lines.push(Line::from(vec![
        Span::styled("Status:   ", title_style()),
        Span::raw(status),
    ]));

    match task.deadline() {
        Some(deadline) => {
            let class = deadline_class(task, now);
            lines.push(Line::from(vec![
                Span::styled("Deadline: ", title_style()),
                Span::styled(format_deadline(deadline, now), deadline_style(class)),
            ]));
            if let Some(badge) = time_left_badge(task, now) {
                lines.push(Line::from(vec![
                    Span::raw("          "),
                    Span::styled(badge, deadline_style(class)),
                ]));
            }
            let label = match class {
                DeadlineClass::Normal => None,
                DeadlineClass::Urgent => Some("Due within a day"),
                DeadlineClass::Passed => Some("Overdue"),
            };
            if let Some(label) = label {
                lines.push(Line::from(Span::styled(
                    format!("          {}", label),
                    deadline_style(class),
                )));
            }
        }
        None => {
            let value = task.time.as_deref().unwrap_or("none");
            lines.push(Line::from(vec![
                Span::styled("Deadline: ", title_style()),
                Span::styled(value.to_string(), default_style()),
            ]));
        }
    }

    if let Some(created) = task.created_at_local() {
        lines.push(Line::from(vec![
            Span::styled("Created:  ", title_style()),
            Span::raw(format_age(Local::now().signed_duration_since(created))),
        ]));
    }

    lines.push(Line::from(vec![
        Span::styled("Id:       ", title_style()),
        Span::raw(task.id.to_string()),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
