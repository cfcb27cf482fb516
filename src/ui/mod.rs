pub mod details_pane;
pub mod filter_bar;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod notice_bar;
pub mod styles;

use crate::app::AppState;
use details_pane::render_details_pane;
use filter_bar::render_filter_bar;
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use modal::render_confirm_delete_modal;
use notice_bar::render_notice_bar;
use ratatui::Frame;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, layout.keybindings_area);
    render_filter_bar(f, app, layout.filter_area);
    render_list_pane(f, app, layout.list_area);
    render_details_pane(f, app, layout.details_area);
    render_notice_bar(f, app, layout.notice_area);

    // Overlays
    render_confirm_delete_modal(f, app, size);
    if app.input_form.is_some() {
        render_input_form(f, app, size);
    }
}
