use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use serde_json::{Map, Value};
use url::Url;

use crate::{append_shutdown_log, append_verbose_log, runtime_paths, ENGINE_CONFIG_FILE};

const UI_SECTION: &str = "ui";
const LOCALE_KEY: &str = "locale";
const ENDPOINT_KEY: &str = "endpoint";

fn empty_config() -> Value {
    Value::Object(Map::new())
}

/// Handle onto the backend session engine. The engine's internal
/// signaling logic is opaque to the shell; this type covers only the
/// surface the lifecycle controller consumes: init/uninit, the persisted
/// UI preferences, and the asynchronous bringup that ends in the
/// readiness signal.
#[derive(Debug)]
pub(crate) struct SessionEngine {
    config_path: PathBuf,
    root_dir: PathBuf,
    document: Mutex<Value>,
    handlers_enabled: AtomicBool,
}

impl SessionEngine {
    /// Synchronous engine initialization. A missing config file starts
    /// from defaults; an unreadable or malformed one is a startup defect
    /// and surfaces as an error the caller treats as fatal.
    pub(crate) fn init(config_path: Option<&Path>) -> Result<Self, String> {
        let (config_path, root_dir) = match config_path {
            Some(path) => {
                let root = path
                    .parent()
                    .filter(|parent| !parent.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .or_else(runtime_paths::default_root_dir)
                    .ok_or_else(|| "cannot resolve an engine root directory".to_string())?;
                (path.to_path_buf(), root)
            }
            None => {
                let root = runtime_paths::default_root_dir()
                    .ok_or_else(|| "cannot resolve an engine root directory".to_string())?;
                (root.join(ENGINE_CONFIG_FILE), root)
            }
        };

        let document = match fs::read_to_string(&config_path) {
            Ok(raw) => serde_json::from_str::<Value>(&raw).map_err(|error| {
                format!(
                    "Malformed engine configuration {}: {}",
                    config_path.display(),
                    error
                )
            })?,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => empty_config(),
            Err(error) => {
                return Err(format!(
                    "Failed to read engine configuration {}: {}",
                    config_path.display(),
                    error
                ));
            }
        };
        if !document.is_object() {
            return Err(format!(
                "Engine configuration {} must hold a JSON object",
                config_path.display()
            ));
        }

        if let Some(endpoint) = document.get(ENDPOINT_KEY).and_then(Value::as_str) {
            Url::parse(endpoint).map_err(|error| {
                format!(
                    "Invalid endpoint URL '{}' in {}: {}",
                    endpoint,
                    config_path.display(),
                    error
                )
            })?;
        }

        Ok(Self {
            config_path,
            root_dir,
            document: Mutex::new(document),
            handlers_enabled: AtomicBool::new(false),
        })
    }

    pub(crate) fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Bringup work that runs on the engine's own execution context after
    /// `init` returned. Completion is reported through the readiness
    /// signal, not through this return value chain.
    pub(crate) fn prepare_runtime(&self) -> Result<(), String> {
        for dir in [self.root_dir.clone(), self.root_dir.join("logs")] {
            fs::create_dir_all(&dir).map_err(|error| {
                format!(
                    "Failed to create engine runtime directory {}: {}",
                    dir.display(),
                    error
                )
            })?;
        }
        append_verbose_log("engine runtime directories prepared");
        Ok(())
    }

    /// The UI-scoped locale preference, or an empty string when unset.
    pub(crate) fn persisted_locale(&self) -> String {
        self.document
            .lock()
            .ok()
            .and_then(|document| {
                document
                    .get(UI_SECTION)?
                    .get(LOCALE_KEY)?
                    .as_str()
                    .map(str::to_string)
            })
            .unwrap_or_default()
    }

    /// Store (or, with an empty string, clear) the locale preference and
    /// flush the configuration file.
    pub(crate) fn set_persisted_locale(&self, locale: &str) -> Result<(), String> {
        let serialized = {
            let mut document = self
                .document
                .lock()
                .map_err(|_| "engine configuration state is poisoned".to_string())?;

            let root = document
                .as_object_mut()
                .ok_or_else(|| "engine configuration lost its object root".to_string())?;
            let section = root
                .entry(UI_SECTION.to_string())
                .or_insert_with(empty_config);
            if !section.is_object() {
                *section = empty_config();
            }
            let section = section
                .as_object_mut()
                .ok_or_else(|| "engine ui section lost its object root".to_string())?;

            if locale.is_empty() {
                section.remove(LOCALE_KEY);
            } else {
                section.insert(LOCALE_KEY.to_string(), Value::String(locale.to_string()));
            }

            serde_json::to_string_pretty(&*document)
                .map_err(|error| format!("Failed to serialize engine configuration: {error}"))?
        };

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create engine configuration directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }
        fs::write(&self.config_path, serialized).map_err(|error| {
            format!(
                "Failed to write engine configuration {}: {}",
                self.config_path.display(),
                error
            )
        })
    }

    /// Turn on the engine's UI-facing event handlers. Idempotent; returns
    /// whether this call was the one that enabled them.
    pub(crate) fn enable_handlers(&self) -> bool {
        !self.handlers_enabled.swap(true, Ordering::AcqRel)
    }

    pub(crate) fn uninit(self) {
        append_shutdown_log("session engine uninitialized");
    }

    #[cfg(test)]
    pub(crate) fn set_raw_persisted_locale_for_tests(&self, locale: &str) {
        let mut document = self.document.lock().unwrap();
        document
            .as_object_mut()
            .unwrap()
            .entry(UI_SECTION.to_string())
            .or_insert_with(empty_config)
            .as_object_mut()
            .unwrap()
            .insert(LOCALE_KEY.to_string(), Value::String(locale.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("sipline.json")
    }

    #[test]
    fn init_starts_from_defaults_when_config_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let engine = SessionEngine::init(Some(&temp_config_path(&dir))).unwrap();
        assert_eq!(engine.persisted_locale(), "");
    }

    #[test]
    fn init_rejects_malformed_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_config_path(&dir);
        fs::write(&path, "{not json").unwrap();
        let error = SessionEngine::init(Some(&path)).unwrap_err();
        assert!(error.contains("Malformed engine configuration"));
    }

    #[test]
    fn init_rejects_non_object_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_config_path(&dir);
        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(SessionEngine::init(Some(&path)).is_err());
    }

    #[test]
    fn init_rejects_invalid_endpoint_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_config_path(&dir);
        fs::write(&path, r#"{"endpoint": "not a url"}"#).unwrap();
        let error = SessionEngine::init(Some(&path)).unwrap_err();
        assert!(error.contains("Invalid endpoint URL"));
    }

    #[test]
    fn init_accepts_a_valid_endpoint_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_config_path(&dir);
        fs::write(&path, r#"{"endpoint": "sips:proxy.example.org"}"#).unwrap();
        assert!(SessionEngine::init(Some(&path)).is_ok());
    }

    #[test]
    fn persisted_locale_survives_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_config_path(&dir);
        {
            let engine = SessionEngine::init(Some(&path)).unwrap();
            engine.set_persisted_locale("de-DE").unwrap();
        }
        let reloaded = SessionEngine::init(Some(&path)).unwrap();
        assert_eq!(reloaded.persisted_locale(), "de-DE");
    }

    #[test]
    fn clearing_the_locale_removes_the_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_config_path(&dir);
        let engine = SessionEngine::init(Some(&path)).unwrap();
        engine.set_persisted_locale("fr-FR").unwrap();
        engine.set_persisted_locale("").unwrap();
        assert_eq!(engine.persisted_locale(), "");

        let raw = fs::read_to_string(&path).unwrap();
        let parsed: Value = serde_json::from_str(&raw).unwrap();
        assert!(parsed.get(UI_SECTION).unwrap().get(LOCALE_KEY).is_none());
    }

    #[test]
    fn set_persisted_locale_keeps_unrelated_config_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_config_path(&dir);
        fs::write(&path, r#"{"endpoint": "sip:proxy.example.org"}"#).unwrap();
        let engine = SessionEngine::init(Some(&path)).unwrap();
        engine.set_persisted_locale("fr-FR").unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let parsed: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            parsed.get(ENDPOINT_KEY).and_then(Value::as_str),
            Some("sip:proxy.example.org")
        );
    }

    #[test]
    fn enable_handlers_reports_only_the_first_call() {
        let dir = tempfile::tempdir().unwrap();
        let engine = SessionEngine::init(Some(&temp_config_path(&dir))).unwrap();
        assert!(engine.enable_handlers());
        assert!(!engine.enable_handlers());
    }

    #[test]
    fn prepare_runtime_creates_the_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        let engine = SessionEngine::init(Some(&temp_config_path(&dir))).unwrap();
        engine.prepare_runtime().unwrap();
        assert!(dir.path().join("logs").is_dir());
    }
}
