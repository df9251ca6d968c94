use tauri::{AppHandle, Manager};

use crate::{
    append_desktop_log, lifecycle, locale_tables, tray_labels, ui_dispatch, window_actions,
    window_registry::{self, WindowRole},
    ShellBridgeResult, ShellState,
};

fn open_shell_window(app_handle: &AppHandle, role: WindowRole) -> ShellBridgeResult {
    let state = app_handle.state::<ShellState>();
    let title = match role {
        WindowRole::Calls => state.locale.table().calls_window_title,
        WindowRole::Settings => state.locale.table().settings_window_title,
        _ => return ShellBridgeResult::rejected("window role is not bridge-openable"),
    };

    let window = {
        let mut registry = match state.windows.lock() {
            Ok(guard) => guard,
            Err(_) => return ShellBridgeResult::rejected("window registry state is poisoned"),
        };
        window_registry::get_or_create(app_handle, &mut registry, role, title)
    };

    match window {
        Ok(window) => {
            window_actions::smart_reveal(&window);
            ShellBridgeResult::accepted()
        }
        Err(error) => {
            // An unloadable sub-window descriptor is a packaging defect.
            lifecycle::fatal_startup_error(app_handle, &error);
            ShellBridgeResult::rejected(error)
        }
    }
}

#[tauri::command]
pub(crate) fn shell_bridge_open_calls_window(app_handle: AppHandle) -> ShellBridgeResult {
    open_shell_window(&app_handle, WindowRole::Calls)
}

#[tauri::command]
pub(crate) fn shell_bridge_open_settings_window(app_handle: AppHandle) -> ShellBridgeResult {
    open_shell_window(&app_handle, WindowRole::Settings)
}

/// Focus probe for idle/notification suppression in collaborators.
#[tauri::command]
pub(crate) fn shell_bridge_has_focus(app_handle: AppHandle) -> bool {
    window_actions::has_focus(&app_handle)
}

#[tauri::command]
pub(crate) fn shell_bridge_current_locale(app_handle: AppHandle) -> String {
    let state = app_handle.state::<ShellState>();
    state.locale.installed_id().to_string()
}

#[tauri::command]
pub(crate) fn shell_bridge_available_locales() -> Vec<String> {
    locale_tables::AVAILABLE_LOCALES
        .iter()
        .map(|locale| locale.to_string())
        .collect()
}

/// Persist (or clear) the locale preference and apply it right away.
#[tauri::command]
pub(crate) fn shell_bridge_set_locale(
    app_handle: AppHandle,
    locale: Option<String>,
) -> ShellBridgeResult {
    let state = app_handle.state::<ShellState>();

    let normalized = match locale.as_deref() {
        Some(raw) => match locale_tables::normalize_locale(raw) {
            Some(id) => Some(id),
            None => {
                return ShellBridgeResult::rejected(format!("unsupported locale '{raw}'"));
            }
        },
        None => None,
    };

    let persisted = {
        let guard = match state.engine.lock() {
            Ok(guard) => guard,
            Err(_) => return ShellBridgeResult::rejected("engine state is poisoned"),
        };
        let Some(engine) = guard.as_ref() else {
            return ShellBridgeResult::rejected("session engine is not running");
        };
        engine.set_persisted_locale(normalized.unwrap_or(""))
    };
    if let Err(error) = persisted {
        append_desktop_log(&format!("failed to persist locale preference: {error}"));
        return ShellBridgeResult::rejected(error);
    }

    if let Some(id) = normalized {
        match state.locale.resolve(&[id]) {
            Ok(installed) => {
                append_desktop_log(&format!("locale switched to {installed}"));
                window_actions::apply_locale_titles(&app_handle, state.locale.table());
                tray_labels::refresh(&app_handle);
            }
            Err(error) => return ShellBridgeResult::rejected(error),
        }
    }

    ShellBridgeResult::accepted()
}

/// Restart the engine and presentation layer from scratch.
#[tauri::command]
pub(crate) fn shell_bridge_restart(app_handle: AppHandle) -> ShellBridgeResult {
    match ui_dispatch::run_on_main_thread_dispatch(&app_handle, "shell restart", |main_handle| {
        lifecycle::restart(main_handle)
    }) {
        Ok(()) => ShellBridgeResult::accepted(),
        Err(error) => ShellBridgeResult::rejected(error),
    }
}
