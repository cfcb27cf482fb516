use crate::domain::DeadlineClass;
use crate::notifications::Severity;
use ratatui::style::{Color, Modifier, Style};

/// Default text style
pub fn default_style() -> Style {
    Style::default().fg(Color::White)
}

/// Selected row highlight style
pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}

/// Title style for panes
pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Border style
pub fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Modal background style
pub fn modal_bg_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

/// Modal title style
pub fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Keybinding hint style
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Done/completed task style
pub fn done_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::CROSSED_OUT)
}

/// Active entry in the filter bar
pub fn active_filter_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Deadline badge colour by urgency
pub fn deadline_style(class: DeadlineClass) -> Style {
    match class {
        DeadlineClass::Normal => Style::default().fg(Color::Gray),
        DeadlineClass::Urgent => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        DeadlineClass::Passed => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
    }
}

/// Notice colour by severity
pub fn severity_style(severity: Severity) -> Style {
    let color = match severity {
        Severity::Success => Color::Green,
        Severity::Error => Color::Red,
        Severity::Info => Color::Cyan,
        Severity::Warning => Color::Yellow,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}
