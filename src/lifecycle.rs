use tauri::{AppHandle, Emitter, Manager};

use crate::{
    append_desktop_log, append_restart_log, append_shutdown_log, append_startup_log,
    append_verbose_log,
    backend_readiness::EngineReadyPayload,
    lifecycle_phase::{ReadinessOutcome, RestartDecision, StartKind},
    platform_caps,
    session_engine::SessionEngine,
    tray_setup, ui_dispatch, window_actions,
    window_registry::{self, WindowRole},
    AtomicFlagGuard, ShellState, APP_DISPLAY_NAME, ENGINE_READY_EVENT, TRAY_ID,
};

/// Bootstrap-path failures never show a partial UI; the process ends
/// before any window is revealed.
pub(crate) fn fatal_startup_error(app_handle: &AppHandle, message: &str) {
    append_startup_log(&format!("fatal: {message}"));
    eprintln!("{APP_DISPLAY_NAME} startup failed: {message}");
    app_handle.exit(1);
}

/// One startup/restart cycle: engine init, presentation load, window
/// creation, readiness wiring. Strictly in that order; callers treat an
/// error as fatal.
pub(crate) fn start_content(app_handle: &AppHandle) -> Result<(), String> {
    let state = app_handle.state::<ShellState>();

    let kind = state
        .phase
        .lock()
        .map_err(|_| "lifecycle phase state is poisoned".to_string())?
        .begin_content_start()?;
    if kind == StartKind::Restart {
        append_restart_log("tearing down previous engine and presentation state");
        teardown_presentation(app_handle);
    }

    // Backend engine first; windows depend on engine-provided state.
    let engine = SessionEngine::init(state.startup.config_path.as_deref())?;
    append_startup_log(&format!(
        "session engine initialized (config: {})",
        engine.config_path().display()
    ));
    match state.engine.lock() {
        Ok(mut guard) => *guard = Some(engine),
        Err(_) => return Err("engine state is poisoned".to_string()),
    }
    state
        .phase
        .lock()
        .map_err(|_| "lifecycle phase state is poisoned".to_string())?
        .backend_started()?;
    append_verbose_log("phase: backend started, loading presentation");

    let table = state.locale.table();
    let generation = {
        let mut registry = state
            .windows
            .lock()
            .map_err(|_| "window registry state is poisoned".to_string())?;
        let generation = registry.begin_generation();

        // Main stays hidden until the readiness continuation decides on
        // reveal; an unloadable descriptor aborts the cycle.
        window_registry::create_window(
            app_handle,
            &mut registry,
            WindowRole::Main,
            table.main_window_title,
        )?;
        generation
    };
    state
        .phase
        .lock()
        .map_err(|_| "lifecycle phase state is poisoned".to_string())?
        .main_window_loaded()?;
    append_verbose_log("phase: main window loaded, awaiting engine readiness");

    {
        let mut registry = state
            .windows
            .lock()
            .map_err(|_| "window registry state is poisoned".to_string())?;
        window_registry::create_window(
            app_handle,
            &mut registry,
            WindowRole::Splash,
            table.splash_window_title,
        )?;
    }

    state.readiness.arm(generation);
    spawn_engine_bringup(app_handle.clone(), generation);
    Ok(())
}

/// Engine bringup on its own execution context. Completion comes back as
/// the one-shot readiness event; a bringup failure means the signal
/// never fires and the shell stays in the awaiting phase.
fn spawn_engine_bringup(app_handle: AppHandle, generation: u64) {
    tauri::async_runtime::spawn(async move {
        let state = app_handle.state::<ShellState>();
        let prepared = match state.engine.lock() {
            Ok(guard) => guard.as_ref().map(SessionEngine::prepare_runtime),
            Err(_) => {
                append_startup_log("engine bringup aborted: engine state is poisoned");
                return;
            }
        };

        match prepared {
            Some(Ok(())) => {
                if let Err(error) =
                    app_handle.emit(ENGINE_READY_EVENT, EngineReadyPayload { generation })
                {
                    append_startup_log(&format!("failed to signal engine readiness: {error}"));
                }
            }
            Some(Err(error)) => {
                append_startup_log(&format!("engine bringup failed: {error}"));
            }
            None => append_startup_log("engine bringup skipped: engine already uninitialized"),
        }
    });
}

/// Readiness continuation, running on the controller's thread. Dismisses
/// the splash, then either quits (selftest) or reveals the application.
pub(crate) fn handle_engine_ready(app_handle: &AppHandle) {
    let state = app_handle.state::<ShellState>();

    let outcome = match state.phase.lock() {
        Ok(mut guard) => guard.readiness_signaled(),
        Err(_) => {
            append_desktop_log("readiness continuation aborted: phase state is poisoned");
            return;
        }
    };
    let restart_queued = match outcome {
        ReadinessOutcome::Ignored => {
            append_desktop_log("ignoring duplicate readiness signal");
            return;
        }
        ReadinessOutcome::FirstSignal { restart_queued } => restart_queued,
    };

    append_startup_log("session engine ready");
    let splash = state
        .windows
        .lock()
        .ok()
        .and_then(|registry| {
            window_registry::find_window(app_handle, &registry, WindowRole::Splash)
        });
    if let Some(splash) = splash {
        if let Err(error) = splash.destroy() {
            append_desktop_log(&format!("failed to dismiss splash window: {error}"));
        }
    }

    if state.startup.selftest {
        request_quit(app_handle);
        return;
    }

    reveal_application(app_handle);

    if restart_queued {
        append_restart_log("draining restart request queued during startup");
        restart(app_handle);
    }
}

fn reveal_application(app_handle: &AppHandle) {
    let state = app_handle.state::<ShellState>();

    // The engine's persisted preference becomes readable only now.
    match state.engine.lock() {
        Ok(guard) => {
            if let Some(engine) = guard.as_ref() {
                state.locale.apply_preferred(engine);
                if engine.enable_handlers() {
                    append_verbose_log("engine ui handlers enabled");
                }
            }
        }
        Err(_) => append_desktop_log("locale re-resolution skipped: engine state is poisoned"),
    }
    window_actions::apply_locale_titles(app_handle, state.locale.table());

    if state.capabilities.tray_icon {
        if let Err(error) = tray_setup::setup_tray(app_handle) {
            append_desktop_log(&format!("tray unavailable, continuing without it: {error}"));
        }
    } else {
        append_desktop_log("tray icon not supported on this platform");
    }

    if platform_caps::should_reveal_on_ready(state.startup.iconified, state.capabilities) {
        window_actions::smart_reveal_main(app_handle);
    } else {
        append_desktop_log("initial reveal suppressed (--iconified)");
    }
}

/// Explicit restart request. Immediate from `Running`, queued while the
/// current startup is still awaiting readiness, rejected elsewhere.
pub(crate) fn restart(app_handle: &AppHandle) {
    let state = app_handle.state::<ShellState>();
    let Some(_guard) = AtomicFlagGuard::try_set(&state.is_restarting) else {
        append_restart_log("restart ignored: another restart is in progress");
        return;
    };

    let decision = match state.phase.lock() {
        Ok(mut guard) => guard.request_restart(),
        Err(_) => {
            append_restart_log("restart aborted: phase state is poisoned");
            return;
        }
    };

    match decision {
        RestartDecision::StartNow => {
            append_restart_log("restarting shell content");
            if let Err(error) = start_content(app_handle) {
                fatal_startup_error(app_handle, &error);
            }
        }
        RestartDecision::QueuedUntilRunning => {
            append_restart_log("restart queued until startup completes");
        }
        RestartDecision::Rejected => {
            append_restart_log("restart rejected in the current phase");
        }
    }
}

/// Invalidate everything the cycle owns, in reverse creation order:
/// readiness wiring, tray, windows, engine.
fn teardown_presentation(app_handle: &AppHandle) {
    let state = app_handle.state::<ShellState>();

    state.readiness.disarm();

    if app_handle.remove_tray_by_id(TRAY_ID).is_some() {
        append_verbose_log("tray icon removed");
    }
    if let Ok(mut guard) = state.tray_items.lock() {
        *guard = None;
    }

    if let Ok(mut registry) = state.windows.lock() {
        let generation = registry.release_all();
        append_verbose_log(&format!(
            "window registry advanced to generation {generation}"
        ));
    }
    window_registry::destroy_all_windows(app_handle);

    let engine = state.engine.lock().ok().and_then(|mut guard| guard.take());
    if let Some(engine) = engine {
        engine.uninit();
    }
}

pub(crate) fn request_quit(app_handle: &AppHandle) {
    let state = app_handle.state::<ShellState>();
    if !state.mark_quitting() {
        return;
    }
    if let Ok(mut guard) = state.phase.lock() {
        guard.begin_shutdown();
    }

    if state.startup.selftest {
        println!("{}", state.locale.table().selftest_result);
    }

    append_shutdown_log("quit requested, exiting desktop process");
    app_handle.exit(0);
}

/// Final cleanup once the runtime decided to exit: the engine is
/// released here so shutdown works the same for every quit path.
pub(crate) fn handle_exit_requested(app_handle: &AppHandle) {
    let state = app_handle.state::<ShellState>();
    state.mark_quitting();
    if let Ok(mut guard) = state.phase.lock() {
        guard.begin_shutdown();
    }

    let engine = state.engine.lock().ok().and_then(|mut guard| guard.take());
    if let Some(engine) = engine {
        engine.uninit();
    }
}

/// Relayed activation from a secondary launch: normalize the main window
/// into the foreground, whatever state it was left in.
pub(crate) fn handle_instance_activation(app_handle: &AppHandle) {
    append_desktop_log("activation relayed from a second launch");
    if let Err(error) =
        ui_dispatch::run_on_main_thread_dispatch(app_handle, "relayed activation", |main_handle| {
            window_actions::smart_reveal_main(main_handle)
        })
    {
        append_desktop_log(&format!("failed to handle relayed activation: {error}"));
    }
}
