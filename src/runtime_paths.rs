use std::{env, path::PathBuf};

use crate::ROOT_DIR_ENV;

/// Root directory for engine-owned state (config, logs). `SIPLINE_ROOT`
/// overrides the per-user default.
pub(crate) fn default_root_dir() -> Option<PathBuf> {
    if let Ok(root) = env::var(ROOT_DIR_ENV) {
        let path = PathBuf::from(root.trim());
        if !path.as_os_str().is_empty() {
            return Some(path);
        }
    }

    home::home_dir().map(|home| home.join(".sipline"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_root_dir_prefers_env_override() {
        let previous = env::var(ROOT_DIR_ENV).ok();
        env::set_var(ROOT_DIR_ENV, "/tmp/sipline-test-root");
        assert_eq!(
            default_root_dir(),
            Some(PathBuf::from("/tmp/sipline-test-root"))
        );
        match previous {
            Some(value) => env::set_var(ROOT_DIR_ENV, value),
            None => env::remove_var(ROOT_DIR_ENV),
        }
    }
}
