//! Configuration loading utilities
//!
//! Sources are applied with precedence defaults -> file -> environment.

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::PipelineConfig;
use crate::error::{Error, Result};

/// Environment variables read by [`apply_env_overrides`]
pub const ENV_MAX_RADIUS: &str = "PANELCLEAN_MAX_RADIUS";
pub const ENV_MAX_MISSING: &str = "PANELCLEAN_MAX_MISSING";
pub const ENV_IQR_MULTIPLIER: &str = "PANELCLEAN_IQR_MULTIPLIER";
pub const ENV_ZERO_POLICY: &str = "PANELCLEAN_ZERO_POLICY";
pub const ENV_PARALLEL: &str = "PANELCLEAN_PARALLEL";

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| Error::InvalidConfiguration(format!("Invalid {}: {}", name, e)))
}

/// Applies overrides found through `lookup`
///
/// `lookup` maps a variable name to its value; [`apply_env_overrides`]
/// passes the process environment.
pub fn apply_overrides_from<F>(config: &mut PipelineConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(ENV_MAX_RADIUS) {
        config.max_radius = parse_var(ENV_MAX_RADIUS, &raw)?;
    }

    if let Some(raw) = lookup(ENV_MAX_MISSING) {
        config.max_missing = parse_var(ENV_MAX_MISSING, &raw)?;
    }

    if let Some(raw) = lookup(ENV_IQR_MULTIPLIER) {
        config.iqr_multiplier = parse_var(ENV_IQR_MULTIPLIER, &raw)?;
    }

    if let Some(raw) = lookup(ENV_ZERO_POLICY) {
        config.zero_policy.enabled = parse_var(ENV_ZERO_POLICY, &raw)?;
    }

    if let Some(raw) = lookup(ENV_PARALLEL) {
        config.parallel = parse_var(ENV_PARALLEL, &raw)?;
    }

    Ok(())
}

/// Applies `PANELCLEAN_*` variables from the process environment
pub fn apply_env_overrides(config: &mut PipelineConfig) -> Result<()> {
    apply_overrides_from(config, |name| env::var(name).ok())
}

/// Defaults with environment overrides
pub fn load_from_env() -> Result<PipelineConfig> {
    let mut config = PipelineConfig::default();
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Load configuration from a file (YAML or TOML based on extension)
pub fn load_from_file(path: &Path) -> Result<PipelineConfig> {
    let contents = fs::read_to_string(path)?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => load_from_yaml(&contents),
        Some("toml") => load_from_toml(&contents),
        Some(ext) => Err(Error::ConfigParse(format!(
            "Unsupported config file format: {}",
            ext
        ))),
        None => load_from_yaml(&contents).or_else(|_| load_from_toml(&contents)),
    }
}

/// Missing keys take their default value
pub fn load_from_yaml(yaml: &str) -> Result<PipelineConfig> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Missing keys take their default value
pub fn load_from_toml(text: &str) -> Result<PipelineConfig> {
    Ok(toml::from_str(text)?)
}

/// Load configuration with precedence: defaults -> file -> environment
///
/// The result is validated.
pub fn load_with_precedence<P: AsRef<Path>>(config_file: Option<P>) -> Result<PipelineConfig> {
    let mut config = match config_file {
        Some(path) => load_from_file(path.as_ref())?,
        None => PipelineConfig::default(),
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;

    Ok(config)
}

/// Save configuration to a file; the extension picks the format
pub fn save_to_file(config: &PipelineConfig, path: &Path) -> Result<()> {
    let contents = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => config.to_toml()?,
        Some("yaml") | Some("yml") | None => config.to_yaml()?,
        Some(ext) => {
            return Err(Error::ConfigParse(format!(
                "Unsupported config file format: {}",
                ext
            )))
        }
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = load_from_yaml("max_missing: 12\nzero_policy:\n  enabled: true\n").unwrap();
        assert_eq!(config.max_missing, 12);
        assert_eq!(config.max_radius, 5);
        assert!(config.zero_policy.enabled);
        assert_eq!(config.zero_policy.activity_threshold, 10.0);
    }

    #[test]
    fn test_toml() {
        let text = r#"
max_radius = 3
excluded_years = [2020]

[zero_policy]
enabled = true
missing_band = [11, 12]
"#;
        let config = load_from_toml(text).unwrap();
        assert_eq!(config.max_radius, 3);
        assert_eq!(config.excluded_years, vec![2020]);
        assert_eq!(config.zero_policy.missing_band, Some((11, 12)));
    }

    #[test]
    fn test_negative_threshold_is_rejected_at_parse() {
        match load_from_yaml("max_missing: -1\n") {
            Err(Error::ConfigParse(_)) => {}
            other => panic!("expected ConfigParse, got {:?}", other),
        }
    }

    #[test]
    fn test_overrides() {
        let mut config = PipelineConfig::default();
        let lookup = lookup_in(&[
            (ENV_MAX_MISSING, "12"),
            (ENV_ZERO_POLICY, "true"),
            (ENV_IQR_MULTIPLIER, " 3.0 "),
        ]);
        apply_overrides_from(&mut config, lookup).unwrap();

        assert_eq!(config.max_missing, 12);
        assert!(config.zero_policy.enabled);
        assert_eq!(config.iqr_multiplier, 3.0);
        assert!(!config.parallel);
    }

    #[test]
    fn test_bad_override() {
        let mut config = PipelineConfig::default();
        let result = apply_overrides_from(&mut config, lookup_in(&[(ENV_MAX_RADIUS, "five")]));
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }
}
