use tauri::{AppHandle, Manager, WebviewWindow};

use crate::{
    append_desktop_log, locale_tables::UiStrings, tray_labels,
    window_registry::{self, WindowRole},
    ShellState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RevealStep {
    Show,
    Unminimize,
    Focus,
}

/// Ordered steps that bring a window to the foreground. Toggling
/// visibility alone does not restore a minimized window everywhere, and
/// the focus request only raises a window that is no longer minimized,
/// hence the fixed sequence.
pub(crate) fn smart_reveal_plan(minimized: bool) -> &'static [RevealStep] {
    if minimized {
        &[RevealStep::Show, RevealStep::Unminimize, RevealStep::Focus]
    } else {
        &[RevealStep::Show, RevealStep::Focus]
    }
}

pub(crate) fn smart_reveal(window: &WebviewWindow) {
    let minimized = window.is_minimized().unwrap_or(false);
    for step in smart_reveal_plan(minimized) {
        let result = match step {
            RevealStep::Show => window.show(),
            RevealStep::Unminimize => window.unminimize(),
            RevealStep::Focus => window.set_focus(),
        };
        if let Err(error) = result {
            append_desktop_log(&format!(
                "reveal step {:?} failed for window {}: {}",
                step,
                window.label(),
                error
            ));
        }
    }
}

fn current_window(app_handle: &AppHandle, role: WindowRole) -> Option<WebviewWindow> {
    let state = app_handle.state::<ShellState>();
    let registry = state.windows.lock().ok()?;
    window_registry::find_window(app_handle, &registry, role)
}

pub(crate) fn smart_reveal_main(app_handle: &AppHandle) {
    let Some(window) = current_window(app_handle, WindowRole::Main) else {
        append_desktop_log("reveal skipped: main window not found");
        return;
    };
    smart_reveal(&window);
    tray_labels::refresh(app_handle);
}

pub(crate) fn hide_main_window(app_handle: &AppHandle) {
    let Some(window) = current_window(app_handle, WindowRole::Main) else {
        append_desktop_log("hide skipped: main window not found");
        return;
    };
    if let Err(error) = window.hide() {
        append_desktop_log(&format!("failed to hide main window: {error}"));
    }
    tray_labels::refresh(app_handle);
}

pub(crate) fn toggle_main_window(app_handle: &AppHandle) {
    let Some(window) = current_window(app_handle, WindowRole::Main) else {
        append_desktop_log("toggle skipped: main window not found");
        return;
    };

    match window.is_visible() {
        Ok(true) => hide_main_window(app_handle),
        Ok(false) => smart_reveal_main(app_handle),
        Err(error) => {
            append_desktop_log(&format!("failed to read main window visibility: {error}"))
        }
    }
}

/// True when the main window or the calls window (once it exists) holds
/// activation focus. Collaborators use this to suppress notifications
/// while the user is already looking at the app.
pub(crate) fn has_focus(app_handle: &AppHandle) -> bool {
    for role in [WindowRole::Main, WindowRole::Calls] {
        let focused = current_window(app_handle, role)
            .and_then(|window| window.is_focused().ok())
            .unwrap_or(false);
        if focused {
            return true;
        }
    }
    false
}

/// Re-apply window titles from the installed locale table after a locale
/// change; windows that do not exist yet pick the titles up at creation.
pub(crate) fn apply_locale_titles(app_handle: &AppHandle, table: &UiStrings) {
    let titled = [
        (WindowRole::Main, table.main_window_title),
        (WindowRole::Calls, table.calls_window_title),
        (WindowRole::Settings, table.settings_window_title),
    ];
    for (role, title) in titled {
        if let Some(window) = current_window(app_handle, role) {
            if let Err(error) = window.set_title(title) {
                append_desktop_log(&format!(
                    "failed to retitle {} window: {}",
                    role.base_label(),
                    error
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_plan_unminimizes_between_show_and_focus() {
        assert_eq!(
            smart_reveal_plan(true),
            &[RevealStep::Show, RevealStep::Unminimize, RevealStep::Focus]
        );
    }

    #[test]
    fn reveal_plan_skips_unminimize_when_not_minimized() {
        assert_eq!(
            smart_reveal_plan(false),
            &[RevealStep::Show, RevealStep::Focus]
        );
    }
}
