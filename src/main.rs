#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_runtime;
mod app_types;
mod backend_readiness;
mod lifecycle;
mod lifecycle_phase;
mod locale_resolver;
mod locale_tables;
mod logging;
mod platform_caps;
mod runtime_paths;
mod session_engine;
mod shell_bridge_commands;
mod startup_config;
mod tray_actions;
mod tray_labels;
mod tray_menu_handler;
mod tray_setup;
mod ui_dispatch;
mod window_actions;
mod window_registry;

pub(crate) use app_constants::*;
pub(crate) use app_types::{AtomicFlagGuard, ShellBridgeResult, ShellState, TrayMenuState};
pub(crate) use logging::{
    append_desktop_log, append_restart_log, append_shutdown_log, append_startup_log,
    append_verbose_log,
};

fn main() {
    app_runtime::run();
}
