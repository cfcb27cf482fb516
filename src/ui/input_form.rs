use crate::app::AppState;
use crate::ui::{
    layout::create_modal_area,
    styles::{hint_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Label line plus "> value█" line for one form field
fn field_lines<'a>(label: &'a str, value: &'a str, active: bool) -> [Line<'a>; 2] {
    let label = if active {
        Line::raw(format!("{} (editing)", label))
    } else {
        Line::raw(label)
    };

    let value = Line::from(vec![
        Span::raw("> "),
        Span::styled(value, modal_title_style()),
        if active {
            Span::styled("█", modal_title_style()) // Cursor
        } else {
            Span::raw("")
        },
    ]);

    [label, value]
}

/// Render the input form for adding or editing a task
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.input_form {
        let modal_area = create_modal_area(area, 12);

        // Clear the area behind the form
        f.render_widget(Clear, modal_area);

        let title_text = if form.editing_id.is_some() {
            " Edit Task "
        } else {
            " Add Task "
        };

        let mut lines = Vec::new();
        lines.push(Line::raw(""));
        lines.extend(field_lines("Task:", &form.text, form.editing_field == 0));
        lines.push(Line::raw(""));
        lines.extend(field_lines(
            "Deadline (YYYY-MM-DD HH:MM, HH:MM, or empty):",
            &form.deadline,
            form.editing_field == 1,
        ));
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            "Tab to switch fields  ·  Enter to submit  ·  Esc to cancel",
            hint_style(),
        ));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(title_text, modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}
