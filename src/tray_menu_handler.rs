use tauri::AppHandle;

use crate::{lifecycle, tray_actions, window_actions};

pub(crate) fn handle_tray_menu_event(app_handle: &AppHandle, menu_id: &str) {
    match tray_actions::action_from_menu_id(menu_id) {
        Some(tray_actions::TrayMenuAction::Restore) => {
            window_actions::smart_reveal_main(app_handle)
        }
        Some(tray_actions::TrayMenuAction::Quit) => lifecycle::request_quit(app_handle),
        None => {}
    }
}
