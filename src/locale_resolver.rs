use std::sync::Mutex;

use crate::{
    append_desktop_log,
    locale_tables::{self, UiStrings},
    session_engine::SessionEngine,
    DEFAULT_LOCALE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InstalledLocale {
    pub(crate) id: &'static str,
    pub(crate) table: &'static UiStrings,
}

/// Owns the single installed translation table. Installation replaces the
/// previous table in one swap, so readers never observe a gap between
/// tables once the first install has happened.
#[derive(Debug)]
pub(crate) struct LocaleResolver {
    installed: Mutex<Option<InstalledLocale>>,
}

impl LocaleResolver {
    pub(crate) fn new() -> Self {
        Self {
            installed: Mutex::new(None),
        }
    }

    /// Install the first candidate whose translation table loads. Returns
    /// the installed identifier, or an error when no candidate resolves.
    pub(crate) fn resolve(&self, chain: &[&str]) -> Result<&'static str, String> {
        for raw in chain {
            let Some(id) = locale_tables::normalize_locale(raw) else {
                continue;
            };
            let Some(table) = locale_tables::table_for_locale(id) else {
                continue;
            };
            match self.installed.lock() {
                Ok(mut guard) => *guard = Some(InstalledLocale { id, table }),
                Err(_) => return Err("installed locale state is poisoned".to_string()),
            }
            return Ok(id);
        }
        Err(format!("no installable locale in chain {chain:?}"))
    }

    /// Pre-backend chain: system locale first, then the hard-coded
    /// default. Failure here is fatal to the caller.
    pub(crate) fn install_bootstrap_chain(&self) -> Result<&'static str, String> {
        let system = locale_tables::system_locale_raw();
        let mut chain: Vec<&str> = Vec::with_capacity(2);
        if let Some(raw) = system.as_deref() {
            chain.push(raw);
        }
        chain.push(DEFAULT_LOCALE);
        self.resolve(&chain)
    }

    /// Post-backend chain: the persisted preference, if any. An
    /// uninstallable preference is cleared so the next launch does not
    /// retry it; the previously installed locale stays active.
    pub(crate) fn apply_preferred(&self, engine: &SessionEngine) {
        let preference = engine.persisted_locale();
        if preference.is_empty() {
            return;
        }

        match self.resolve(&[preference.as_str()]) {
            Ok(id) => append_desktop_log(&format!("using preferred locale: {id}")),
            Err(_) => {
                append_desktop_log(&format!(
                    "preferred locale '{preference}' has no translation table; clearing preference"
                ));
                if let Err(error) = engine.set_persisted_locale("") {
                    append_desktop_log(&format!("failed to clear locale preference: {error}"));
                }
            }
        }
    }

    pub(crate) fn installed_id(&self) -> &'static str {
        self.installed
            .lock()
            .ok()
            .and_then(|guard| guard.map(|installed| installed.id))
            .unwrap_or(DEFAULT_LOCALE)
    }

    /// The installed table; before the bootstrap chain has run this falls
    /// back to the default-locale table so callers always get strings.
    pub(crate) fn table(&self) -> &'static UiStrings {
        self.installed
            .lock()
            .ok()
            .and_then(|guard| guard.map(|installed| installed.table))
            .or_else(|| locale_tables::table_for_locale(DEFAULT_LOCALE))
            .expect("default locale table is always present")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_installs_first_loadable_candidate() {
        let resolver = LocaleResolver::new();
        assert_eq!(resolver.resolve(&["fr-FR", "en-US"]), Ok("fr-FR"));
        assert_eq!(resolver.installed_id(), "fr-FR");
        assert_eq!(resolver.table().tray_quit, "Quitter");
    }

    #[test]
    fn resolve_falls_through_unsupported_candidates() {
        let resolver = LocaleResolver::new();
        assert_eq!(resolver.resolve(&["ja-JP", "en-US"]), Ok("en-US"));
        assert_eq!(resolver.installed_id(), "en-US");
    }

    #[test]
    fn resolve_fails_when_no_candidate_is_installable() {
        let resolver = LocaleResolver::new();
        assert!(resolver.resolve(&["ja-JP", "ko-KR"]).is_err());
        // No partial install happened.
        assert_eq!(resolver.installed_id(), DEFAULT_LOCALE);
    }

    #[test]
    fn installing_replaces_the_previous_table() {
        let resolver = LocaleResolver::new();
        resolver.resolve(&["en-US"]).unwrap();
        resolver.resolve(&["de-DE"]).unwrap();
        assert_eq!(resolver.installed_id(), "de-DE");
        assert_eq!(resolver.table().tray_quit, "Beenden");
    }

    #[test]
    fn apply_preferred_installs_a_supported_preference() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("sipline.json");
        let engine = SessionEngine::init(Some(&config_path)).unwrap();
        engine.set_persisted_locale("fr-FR").unwrap();

        let resolver = LocaleResolver::new();
        resolver.resolve(&["en-US"]).unwrap();
        resolver.apply_preferred(&engine);

        assert_eq!(resolver.installed_id(), "fr-FR");
        assert_eq!(engine.persisted_locale(), "fr-FR");
    }

    #[test]
    fn apply_preferred_clears_a_broken_preference_and_keeps_bootstrap_locale() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("sipline.json");
        let engine = SessionEngine::init(Some(&config_path)).unwrap();
        engine.set_raw_persisted_locale_for_tests("xx-XX");

        let resolver = LocaleResolver::new();
        resolver.resolve(&["en-US"]).unwrap();
        resolver.apply_preferred(&engine);

        assert_eq!(resolver.installed_id(), "en-US");
        assert_eq!(engine.persisted_locale(), "");
    }

    #[test]
    fn apply_preferred_is_a_no_op_without_a_preference() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("sipline.json");
        let engine = SessionEngine::init(Some(&config_path)).unwrap();

        let resolver = LocaleResolver::new();
        resolver.resolve(&["de-DE"]).unwrap();
        resolver.apply_preferred(&engine);

        assert_eq!(resolver.installed_id(), "de-DE");
    }
}
