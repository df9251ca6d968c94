pub(crate) const APP_DISPLAY_NAME: &str = "Sipline";

pub(crate) const DEFAULT_LOCALE: &str = "en-US";

pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const CALLS_WINDOW_LABEL: &str = "calls";
pub(crate) const SETTINGS_WINDOW_LABEL: &str = "settings";
pub(crate) const SPLASH_WINDOW_LABEL: &str = "splash";

pub(crate) const MAIN_WINDOW_DESCRIPTOR: &str = "main.html";
pub(crate) const CALLS_WINDOW_DESCRIPTOR: &str = "calls.html";
pub(crate) const SETTINGS_WINDOW_DESCRIPTOR: &str = "settings.html";
pub(crate) const SPLASH_WINDOW_DESCRIPTOR: &str = "splash.html";

pub(crate) const TRAY_ID: &str = "sipline-tray";

/// Fired by the session engine exactly once per startup cycle.
pub(crate) const ENGINE_READY_EVENT: &str = "sipline://engine-ready";

pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";

pub(crate) const ROOT_DIR_ENV: &str = "SIPLINE_ROOT";
pub(crate) const LOCALE_ENV: &str = "SIPLINE_DESKTOP_LOCALE";

pub(crate) const ENGINE_CONFIG_FILE: &str = "sipline.json";
