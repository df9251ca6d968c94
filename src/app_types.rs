use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use tauri::menu::MenuItem;

use crate::{
    backend_readiness::ReadinessGate, lifecycle_phase::PhaseMachine,
    locale_resolver::LocaleResolver, platform_caps::PlatformCapabilities,
    session_engine::SessionEngine, startup_config::StartupConfig, window_registry::WindowRegistry,
};

/// Tray menu items kept around so locale changes can relabel them.
/// Rebuilt together with the tray on every presentation cycle.
#[derive(Clone)]
pub(crate) struct TrayMenuState {
    pub(crate) restore_item: MenuItem<tauri::Wry>,
    pub(crate) quit_item: MenuItem<tauri::Wry>,
}

/// The one process-wide shell state, owned by the lifecycle controller
/// and handed to collaborators through tauri's managed-state mechanism.
pub(crate) struct ShellState {
    pub(crate) startup: StartupConfig,
    pub(crate) capabilities: PlatformCapabilities,
    pub(crate) phase: Mutex<PhaseMachine>,
    pub(crate) windows: Mutex<WindowRegistry>,
    pub(crate) locale: LocaleResolver,
    pub(crate) engine: Mutex<Option<SessionEngine>>,
    pub(crate) readiness: ReadinessGate,
    pub(crate) tray_items: Mutex<Option<TrayMenuState>>,
    pub(crate) is_quitting: AtomicBool,
    pub(crate) is_restarting: AtomicBool,
}

impl ShellState {
    pub(crate) fn new(
        startup: StartupConfig,
        capabilities: PlatformCapabilities,
        locale: LocaleResolver,
        phase: PhaseMachine,
    ) -> Self {
        Self {
            startup,
            capabilities,
            phase: Mutex::new(phase),
            windows: Mutex::new(WindowRegistry::new()),
            locale,
            engine: Mutex::new(None),
            readiness: ReadinessGate::new(),
            tray_items: Mutex::new(None),
            is_quitting: AtomicBool::new(false),
            is_restarting: AtomicBool::new(false),
        }
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.is_quitting.load(Ordering::Relaxed)
    }

    /// Returns whether this call flipped the flag.
    pub(crate) fn mark_quitting(&self) -> bool {
        !self.is_quitting.swap(true, Ordering::AcqRel)
    }
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct ShellBridgeResult {
    pub(crate) ok: bool,
    pub(crate) reason: Option<String>,
}

impl ShellBridgeResult {
    pub(crate) fn accepted() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    pub(crate) fn rejected(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}

pub(crate) struct AtomicFlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AtomicFlagGuard<'a> {
    pub(crate) fn try_set(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag })
    }
}

impl Drop for AtomicFlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::AtomicFlagGuard;

    #[test]
    fn atomic_flag_guard_rejects_a_second_set_until_drop() {
        let flag = AtomicBool::new(false);

        let guard = AtomicFlagGuard::try_set(&flag).expect("first set should succeed");
        assert!(flag.load(Ordering::Relaxed));
        assert!(AtomicFlagGuard::try_set(&flag).is_none());

        drop(guard);
        assert!(!flag.load(Ordering::Relaxed));
        assert!(AtomicFlagGuard::try_set(&flag).is_some());
    }
}
