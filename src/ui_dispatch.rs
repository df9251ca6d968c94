use tauri::AppHandle;

/// Marshal work onto the controller's thread. Window, tray, and locale
/// state are only ever touched from there.
pub(crate) fn run_on_main_thread_dispatch<F>(
    app_handle: &AppHandle,
    what: &str,
    task: F,
) -> Result<(), String>
where
    F: FnOnce(&AppHandle) + Send + 'static,
{
    let dispatched = app_handle.clone();
    app_handle
        .run_on_main_thread(move || task(&dispatched))
        .map_err(|error| format!("failed to dispatch {what}: {error}"))
}
