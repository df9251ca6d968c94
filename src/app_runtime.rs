use tauri::{Listener, Manager, RunEvent, WindowEvent};

use crate::{
    append_shutdown_log, append_startup_log,
    backend_readiness::EngineReadyPayload,
    lifecycle,
    lifecycle_phase::PhaseMachine,
    locale_resolver::LocaleResolver,
    platform_caps::PlatformCapabilities,
    startup_config, ui_dispatch, window_actions,
    window_registry::WindowRole,
    ShellState, APP_DISPLAY_NAME, DESKTOP_LOG_FILE, ENGINE_READY_EVENT,
};

pub(crate) fn run() {
    let startup = startup_config::parse();
    crate::logging::set_verbose(startup.verbose);

    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        crate::logging::resolve_desktop_log_path(
            crate::runtime_paths::default_root_dir(),
            DESKTOP_LOG_FILE,
        )
        .display()
    ));

    let capabilities = PlatformCapabilities::detect();
    if startup.iconified && !capabilities.start_iconified {
        append_startup_log("--iconified is not honored on this platform");
    }

    // Locale bootstrap precedes everything else; without even the default
    // table the process cannot present any text.
    let locale = LocaleResolver::new();
    let mut phase = PhaseMachine::new();
    match locale.install_bootstrap_chain() {
        Ok(installed) => append_startup_log(&format!("bootstrap locale installed: {installed}")),
        Err(error) => {
            eprintln!("{APP_DISPLAY_NAME} startup failed: {error}");
            std::process::exit(1);
        }
    }
    if let Err(error) = phase.locale_bootstrapped() {
        eprintln!("{APP_DISPLAY_NAME} startup failed: {error}");
        std::process::exit(1);
    }

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            lifecycle::handle_instance_activation(app);
        }))
        .manage(ShellState::new(startup, capabilities, locale, phase))
        .invoke_handler(tauri::generate_handler![
            crate::shell_bridge_commands::shell_bridge_open_calls_window,
            crate::shell_bridge_commands::shell_bridge_open_settings_window,
            crate::shell_bridge_commands::shell_bridge_has_focus,
            crate::shell_bridge_commands::shell_bridge_current_locale,
            crate::shell_bridge_commands::shell_bridge_available_locales,
            crate::shell_bridge_commands::shell_bridge_set_locale,
            crate::shell_bridge_commands::shell_bridge_restart,
        ])
        .on_window_event(|window, event| {
            let WindowEvent::CloseRequested { api, .. } = event else {
                return;
            };

            let app_handle = window.app_handle();
            let state = app_handle.state::<ShellState>();
            if state.is_quitting() {
                return;
            }

            match WindowRole::from_label(window.label()) {
                // Closing the last window must not end the process; the
                // tray (or a relayed activation) brings it back.
                Some(WindowRole::Main) => {
                    api.prevent_close();
                    window_actions::hide_main_window(app_handle);
                }
                // Sub-windows hide so their cached handles stay valid
                // for the rest of the cycle.
                Some(WindowRole::Calls) | Some(WindowRole::Settings) => {
                    api.prevent_close();
                    let _ = window.hide();
                }
                _ => {}
            }
        })
        .setup(|app| {
            let app_handle = app.handle().clone();

            // Readiness wiring: the gate filters stale and duplicate
            // fires, the continuation runs on the controller's thread.
            let listener_handle = app_handle.clone();
            app_handle.listen(ENGINE_READY_EVENT, move |event| {
                let payload: EngineReadyPayload = match serde_json::from_str(event.payload()) {
                    Ok(payload) => payload,
                    Err(error) => {
                        crate::append_desktop_log(&format!(
                            "discarding malformed readiness payload: {error}"
                        ));
                        return;
                    }
                };

                let state = listener_handle.state::<ShellState>();
                if !state.readiness.accept(payload.generation) {
                    crate::append_desktop_log("ignoring stale or duplicate readiness signal");
                    return;
                }

                if let Err(error) = ui_dispatch::run_on_main_thread_dispatch(
                    &listener_handle,
                    "engine readiness continuation",
                    |main_handle| lifecycle::handle_engine_ready(main_handle),
                ) {
                    crate::append_desktop_log(&error);
                }
            });

            if let Err(error) = lifecycle::start_content(&app_handle) {
                lifecycle::fatal_startup_error(&app_handle, &error);
            }
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { .. } => {
                lifecycle::handle_exit_requested(app_handle);
            }
            RunEvent::Exit => {
                append_shutdown_log("desktop process exited");
            }
            _ => {}
        });
}
