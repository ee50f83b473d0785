use std::path::{Path, PathBuf};

use anyhow::Context;

use super::types::AppConfig;

/// Get the default tasks5 data directory: ~/.tasks5
pub fn get_tasks5_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".tasks5"))
}

pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str::<AppConfig>(&s)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.tasks5/config.toml
    // Priority 2: ./tasks5.toml (current directory)
    let home_config = get_tasks5_data_dir().ok().map(|d| d.join("config.toml"));
    let local_config = Path::new("tasks5.toml");

    let mut cfg = match home_config.filter(|p| p.exists()) {
        Some(p) => load_from_path(&p)?,
        None if local_config.exists() => load_from_path(local_config)?,
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok())?;
    Ok(cfg)
}

// Environment variable overrides (Priority 0: highest, below the command line)
fn apply_env_overrides(
    cfg: &mut AppConfig,
    var: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty("TASKS5_DATA_FILE") {
        cfg.store.data_file = v;
    }
    if let Some(v) = non_empty("TASKS5_LOG_LEVEL") {
        cfg.logging.level = v;
    }
    if let Some(v) = non_empty("TASKS5_LOCK_ATTEMPTS") {
        cfg.store.lock_attempts = v
            .trim()
            .parse()
            .with_context(|| format!("TASKS5_LOCK_ATTEMPTS is not a number: {v}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn env_overrides_replace_config_values() {
        let vars = env(&[
            ("TASKS5_DATA_FILE", "/srv/tasks.json"),
            ("TASKS5_LOG_LEVEL", "debug"),
            ("TASKS5_LOCK_ATTEMPTS", "3"),
        ]);
        let mut cfg = AppConfig::default();
        apply_env_overrides(&mut cfg, |k| vars.get(k).cloned()).unwrap();

        assert_eq!(cfg.store.data_file, "/srv/tasks.json");
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.store.lock_attempts, 3);
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let vars = env(&[("TASKS5_DATA_FILE", "  ")]);
        let mut cfg = AppConfig::default();
        apply_env_overrides(&mut cfg, |k| vars.get(k).cloned()).unwrap();
        assert_eq!(cfg.store.data_file, "tasks.json");
    }

    #[test]
    fn bad_lock_attempts_is_an_error() {
        let vars = env(&[("TASKS5_LOCK_ATTEMPTS", "many")]);
        let mut cfg = AppConfig::default();
        let err = apply_env_overrides(&mut cfg, |k| vars.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains("TASKS5_LOCK_ATTEMPTS"));
    }

    #[test]
    fn load_from_path_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store]\ndata_file = \"x.json\"\n").unwrap();

        let cfg = load_from_path(&path).unwrap();
        assert_eq!(cfg.store.data_file, "x.json");
    }

    #[test]
    fn load_from_path_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store\n").unwrap();

        let err = load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }
}
