use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub filter_area: Rect,
    pub list_area: Rect,
    pub details_area: Rect,
    pub notice_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Filter bar with counters (3 rows)
/// - Main area: List (70%) | Details (30%)
/// - Bottom bar: notice (1 row)
pub fn create_layout(area: Rect) -> MainLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Length(3), // Filter bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Notice
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(70), // List pane
            Constraint::Percentage(30), // Details pane
        ])
        .split(vertical[2]);

    MainLayout {
        keybindings_area: vertical[0],
        filter_area: vertical[1],
        list_area: horizontal[0],
        details_area: horizontal[1],
        notice_area: vertical[3],
    }
}

/// Create centered modal area with a fixed height
pub fn create_modal_area(area: Rect, height: u16) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(height),
            Constraint::Percentage(25),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}
