use tauri::{menu::MenuItem, AppHandle, Manager};

use crate::{append_desktop_log, ShellState, TRAY_ID};

fn set_menu_text_safe(item: &MenuItem<tauri::Wry>, text: &str, item_name: &str) {
    if let Err(error) = item.set_text(text) {
        append_desktop_log(&format!(
            "failed to update tray menu text for {item_name}: {error}"
        ));
    }
}

/// Re-label the tray from the installed locale table. Called after a
/// locale change and after visibility flips; a missing tray is fine.
pub(crate) fn refresh(app_handle: &AppHandle) {
    let state = app_handle.state::<ShellState>();
    let table = state.locale.table();

    let items = match state.tray_items.lock() {
        Ok(guard) => guard.clone(),
        Err(_) => None,
    };
    let Some(items) = items else {
        return;
    };

    set_menu_text_safe(&items.restore_item, table.tray_restore, "restore");
    set_menu_text_safe(&items.quit_item, table.tray_quit, "quit");

    if let Some(tray) = app_handle.tray_by_id(TRAY_ID) {
        if let Err(error) = tray.set_tooltip(Some(table.tray_tooltip)) {
            append_desktop_log(&format!("failed to update tray tooltip: {error}"));
        }
    }
}
