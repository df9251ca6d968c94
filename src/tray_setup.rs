use tauri::{
    menu::{Menu, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager,
};

use crate::{
    append_desktop_log, tray_actions, tray_menu_handler, window_actions, ShellState,
    TrayMenuState, TRAY_ID,
};

/// Build the tray for the current presentation cycle. The tray exposes
/// restore/quit menu entries and toggles the main window on left click.
pub(crate) fn setup_tray(app_handle: &AppHandle) -> Result<(), String> {
    let state = app_handle.state::<ShellState>();
    let table = state.locale.table();

    let restore_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_RESTORE,
        table.tray_restore,
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray restore menu item: {error}"))?;
    let quit_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_QUIT,
        table.tray_quit,
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray quit menu item: {error}"))?;
    let separator = PredefinedMenuItem::separator(app_handle)
        .map_err(|error| format!("Failed to create tray separator menu item: {error}"))?;

    let menu = Menu::with_items(app_handle, &[&restore_item, &separator, &quit_item])
        .map_err(|error| format!("Failed to build tray menu: {error}"))?;

    match state.tray_items.lock() {
        Ok(mut guard) => {
            *guard = Some(TrayMenuState {
                restore_item: restore_item.clone(),
                quit_item: quit_item.clone(),
            });
        }
        Err(_) => append_desktop_log("tray menu state is poisoned, labels will not refresh"),
    }

    let tray_builder = TrayIconBuilder::with_id(TRAY_ID)
        .menu(&menu)
        .tooltip(table.tray_tooltip)
        .icon(tauri::include_image!("./icons/tray.png"))
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| {
            tray_menu_handler::handle_tray_menu_event(app, event.id().as_ref())
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                window_actions::toggle_main_window(tray.app_handle());
            }
        });

    #[cfg(target_os = "macos")]
    let tray_builder = tray_builder.icon_as_template(true);

    tray_builder
        .build(app_handle)
        .map_err(|error| format!("Failed to create tray icon: {error}"))?;

    append_desktop_log("tray icon created");
    Ok(())
}
