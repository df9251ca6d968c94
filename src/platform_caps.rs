/// Capabilities resolved once at startup so the controller's logic stays
/// uniform across platforms instead of branching at compile time.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlatformCapabilities {
    pub(crate) tray_icon: bool,
    pub(crate) start_iconified: bool,
}

impl PlatformCapabilities {
    pub(crate) fn detect() -> Self {
        Self {
            tray_icon: cfg!(any(windows, target_os = "macos", target_os = "linux")),
            // macOS keeps the app reachable from the dock, so the hidden
            // start flag is not honored there.
            start_iconified: !cfg!(target_os = "macos"),
        }
    }
}

/// Whether the readiness continuation should reveal the main window.
pub(crate) fn should_reveal_on_ready(
    iconified_requested: bool,
    capabilities: PlatformCapabilities,
) -> bool {
    !(iconified_requested && capabilities.start_iconified)
}
