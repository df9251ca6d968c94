use std::env;

use crate::LOCALE_ENV;

/// Translated shell strings for one locale. One table is installed at a
/// time; windows and the tray read through the installed table only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UiStrings {
    pub(crate) main_window_title: &'static str,
    pub(crate) calls_window_title: &'static str,
    pub(crate) settings_window_title: &'static str,
    pub(crate) splash_window_title: &'static str,
    pub(crate) tray_tooltip: &'static str,
    pub(crate) tray_show: &'static str,
    pub(crate) tray_hide: &'static str,
    pub(crate) tray_restore: &'static str,
    pub(crate) tray_quit: &'static str,
    pub(crate) selftest_result: &'static str,
}

const EN_US: UiStrings = UiStrings {
    main_window_title: "Sipline",
    calls_window_title: "Sipline — Calls",
    settings_window_title: "Sipline — Settings",
    splash_window_title: "Sipline",
    tray_tooltip: "Sipline",
    tray_show: "Show Sipline",
    tray_hide: "Hide Sipline",
    tray_restore: "Restore",
    tray_quit: "Quit",
    selftest_result: "Sipline selftest passed.",
};

const FR_FR: UiStrings = UiStrings {
    main_window_title: "Sipline",
    calls_window_title: "Sipline — Appels",
    settings_window_title: "Sipline — Préférences",
    splash_window_title: "Sipline",
    tray_tooltip: "Sipline",
    tray_show: "Afficher Sipline",
    tray_hide: "Masquer Sipline",
    tray_restore: "Restaurer",
    tray_quit: "Quitter",
    selftest_result: "Autotest Sipline réussi.",
};

const DE_DE: UiStrings = UiStrings {
    main_window_title: "Sipline",
    calls_window_title: "Sipline — Anrufe",
    settings_window_title: "Sipline — Einstellungen",
    splash_window_title: "Sipline",
    tray_tooltip: "Sipline",
    tray_show: "Sipline anzeigen",
    tray_hide: "Sipline ausblenden",
    tray_restore: "Wiederherstellen",
    tray_quit: "Beenden",
    selftest_result: "Sipline-Selbsttest bestanden.",
};

pub(crate) const AVAILABLE_LOCALES: &[&str] = &["en-US", "fr-FR", "de-DE"];

/// Map a raw identifier (`fr_FR.UTF-8`, `de`, `en-US`) onto a supported
/// locale, or `None` when no translation table exists for it.
pub(crate) fn normalize_locale(raw: &str) -> Option<&'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let lowered = raw.to_ascii_lowercase();
    if lowered.starts_with("en") {
        return Some("en-US");
    }
    if lowered.starts_with("fr") {
        return Some("fr-FR");
    }
    if lowered.starts_with("de") {
        return Some("de-DE");
    }
    None
}

/// Load the translation table for a supported locale identifier.
pub(crate) fn table_for_locale(locale: &str) -> Option<&'static UiStrings> {
    match locale {
        "en-US" => Some(&EN_US),
        "fr-FR" => Some(&FR_FR),
        "de-DE" => Some(&DE_DE),
        _ => None,
    }
}

/// Raw system locale, read from the environment the way the process
/// inherited it. Normalization happens at install time.
pub(crate) fn system_locale_raw() -> Option<String> {
    for env_key in [LOCALE_ENV, "LC_ALL", "LC_MESSAGES", "LANG"] {
        if let Ok(value) = env::var(env_key) {
            let value = value.trim().to_string();
            if !value.is_empty() {
                return Some(value);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_locale_accepts_language_prefixes() {
        assert_eq!(normalize_locale("fr_FR.UTF-8"), Some("fr-FR"));
        assert_eq!(normalize_locale("DE_at"), Some("de-DE"));
        assert_eq!(normalize_locale("en"), Some("en-US"));
    }

    #[test]
    fn normalize_locale_rejects_unsupported_identifiers() {
        assert_eq!(normalize_locale("ja-JP"), None);
        assert_eq!(normalize_locale("C"), None);
        assert_eq!(normalize_locale(""), None);
    }

    #[test]
    fn every_available_locale_has_a_table() {
        for locale in AVAILABLE_LOCALES {
            assert!(table_for_locale(locale).is_some(), "missing table: {locale}");
        }
    }

    #[test]
    fn table_for_locale_returns_translated_tray_copy() {
        assert_eq!(table_for_locale("fr-FR").unwrap().tray_quit, "Quitter");
        assert_eq!(table_for_locale("en-US").unwrap().tray_quit, "Quit");
    }
}
