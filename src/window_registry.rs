use std::collections::HashMap;

use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};

use crate::{
    append_verbose_log, CALLS_WINDOW_DESCRIPTOR, CALLS_WINDOW_LABEL, MAIN_WINDOW_DESCRIPTOR,
    MAIN_WINDOW_LABEL, SETTINGS_WINDOW_DESCRIPTOR, SETTINGS_WINDOW_LABEL,
    SPLASH_WINDOW_DESCRIPTOR, SPLASH_WINDOW_LABEL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum WindowRole {
    Main,
    Calls,
    Settings,
    Splash,
}

impl WindowRole {
    pub(crate) fn base_label(self) -> &'static str {
        match self {
            WindowRole::Main => MAIN_WINDOW_LABEL,
            WindowRole::Calls => CALLS_WINDOW_LABEL,
            WindowRole::Settings => SETTINGS_WINDOW_LABEL,
            WindowRole::Splash => SPLASH_WINDOW_LABEL,
        }
    }

    pub(crate) fn descriptor(self) -> &'static str {
        match self {
            WindowRole::Main => MAIN_WINDOW_DESCRIPTOR,
            WindowRole::Calls => CALLS_WINDOW_DESCRIPTOR,
            WindowRole::Settings => SETTINGS_WINDOW_DESCRIPTOR,
            WindowRole::Splash => SPLASH_WINDOW_DESCRIPTOR,
        }
    }

    /// Recover the role from a live window label (`main-3` → `Main`).
    pub(crate) fn from_label(label: &str) -> Option<WindowRole> {
        let base = label.rsplit_once('-').map(|(base, _)| base).unwrap_or(label);
        match base {
            MAIN_WINDOW_LABEL => Some(WindowRole::Main),
            CALLS_WINDOW_LABEL => Some(WindowRole::Calls),
            SETTINGS_WINDOW_LABEL => Some(WindowRole::Settings),
            SPLASH_WINDOW_LABEL => Some(WindowRole::Splash),
            _ => None,
        }
    }
}

/// Owns the role → window mapping for the current presentation
/// generation. Labels carry the generation (`main-3`), so a handle from
/// a torn-down cycle can never be confused with a live one: after
/// `release_all` the stale label simply stops resolving. Destruction of
/// the underlying windows completes asynchronously, which is also why a
/// fresh cycle must not reuse the previous cycle's labels.
#[derive(Debug)]
pub(crate) struct WindowRegistry {
    generation: u64,
    created_in: HashMap<WindowRole, u64>,
}

impl WindowRegistry {
    pub(crate) fn new() -> Self {
        Self {
            generation: 0,
            created_in: HashMap::new(),
        }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Open a fresh presentation generation, forgetting every handle
    /// created in the previous one.
    pub(crate) fn begin_generation(&mut self) -> u64 {
        self.generation += 1;
        self.created_in.clear();
        self.generation
    }

    /// Invalidate all handles ahead of presentation teardown. The next
    /// `label_for` can no longer produce a label that resolves to a
    /// window from the released cycle.
    pub(crate) fn release_all(&mut self) -> u64 {
        self.begin_generation()
    }

    pub(crate) fn label_for(&self, role: WindowRole) -> String {
        format!("{}-{}", role.base_label(), self.generation)
    }

    pub(crate) fn mark_created(&mut self, role: WindowRole) {
        self.created_in.insert(role, self.generation);
    }

    pub(crate) fn is_current(&self, role: WindowRole) -> bool {
        self.created_in.get(&role) == Some(&self.generation)
    }
}

/// Materialize a window from its bundled descriptor. Every window except
/// the splash starts hidden; visibility is driven by the reveal logic.
pub(crate) fn create_window(
    app_handle: &AppHandle,
    registry: &mut WindowRegistry,
    role: WindowRole,
    title: &str,
) -> Result<WebviewWindow, String> {
    let label = registry.label_for(role);
    let builder = WebviewWindowBuilder::new(
        app_handle,
        label.as_str(),
        WebviewUrl::App(role.descriptor().into()),
    )
    .title(title);

    let builder = match role {
        WindowRole::Main => builder
            .inner_size(1060.0, 680.0)
            .min_inner_size(780.0, 480.0)
            .visible(false),
        WindowRole::Calls => builder.inner_size(720.0, 480.0).visible(false),
        WindowRole::Settings => builder.inner_size(640.0, 520.0).visible(false),
        WindowRole::Splash => builder
            .inner_size(420.0, 300.0)
            .resizable(false)
            .decorations(false)
            .center(),
    };

    let window = builder.build().map_err(|error| {
        format!(
            "Failed to materialize the {} window from descriptor {}: {}",
            role.base_label(),
            role.descriptor(),
            error
        )
    })?;
    registry.mark_created(role);
    append_verbose_log(&format!("{label} window created"));
    Ok(window)
}

/// Resolve the live window for a role in the current generation.
pub(crate) fn find_window(
    app_handle: &AppHandle,
    registry: &WindowRegistry,
    role: WindowRole,
) -> Option<WebviewWindow> {
    if !registry.is_current(role) {
        return None;
    }
    app_handle.get_webview_window(&registry.label_for(role))
}

/// Cached lookup for the lazily created calls/settings windows. Within
/// one generation repeated calls return the same live window; after a
/// restart the stale entry is discarded and the window rebuilt.
pub(crate) fn get_or_create(
    app_handle: &AppHandle,
    registry: &mut WindowRegistry,
    role: WindowRole,
    title: &str,
) -> Result<WebviewWindow, String> {
    if let Some(window) = find_window(app_handle, registry, role) {
        return Ok(window);
    }
    create_window(app_handle, registry, role, title)
}

/// Destroy every live window ahead of presentation teardown.
pub(crate) fn destroy_all_windows(app_handle: &AppHandle) {
    for (label, window) in app_handle.webview_windows() {
        if let Err(error) = window.destroy() {
            append_verbose_log(&format!("failed to destroy window {label}: {error}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_map_to_distinct_labels_and_descriptors() {
        let roles = [
            WindowRole::Main,
            WindowRole::Calls,
            WindowRole::Settings,
            WindowRole::Splash,
        ];
        for (index, role) in roles.iter().enumerate() {
            for other in &roles[index + 1..] {
                assert_ne!(role.base_label(), other.base_label());
                assert_ne!(role.descriptor(), other.descriptor());
            }
        }
    }

    #[test]
    fn from_label_recovers_the_role_of_generation_tagged_labels() {
        let mut registry = WindowRegistry::new();
        registry.begin_generation();
        for role in [
            WindowRole::Main,
            WindowRole::Calls,
            WindowRole::Settings,
            WindowRole::Splash,
        ] {
            assert_eq!(WindowRole::from_label(&registry.label_for(role)), Some(role));
        }
        assert_eq!(WindowRole::from_label("inspector-1"), None);
    }

    #[test]
    fn marked_windows_stay_current_within_one_generation() {
        let mut registry = WindowRegistry::new();
        registry.begin_generation();
        registry.mark_created(WindowRole::Settings);
        assert!(registry.is_current(WindowRole::Settings));
        assert!(registry.is_current(WindowRole::Settings));
        assert!(!registry.is_current(WindowRole::Calls));
    }

    #[test]
    fn release_all_invalidates_previous_handles_and_labels() {
        let mut registry = WindowRegistry::new();
        registry.begin_generation();
        registry.mark_created(WindowRole::Settings);
        registry.mark_created(WindowRole::Main);
        let stale_label = registry.label_for(WindowRole::Main);

        registry.release_all();
        assert!(!registry.is_current(WindowRole::Settings));
        assert!(!registry.is_current(WindowRole::Main));
        assert_ne!(registry.label_for(WindowRole::Main), stale_label);
    }

    #[test]
    fn generations_are_strictly_increasing() {
        let mut registry = WindowRegistry::new();
        let first = registry.begin_generation();
        let second = registry.begin_generation();
        assert!(second > first);
    }
}
