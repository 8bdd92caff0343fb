// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use regform_app::{PhoneWidgetConfig, ReferenceData};
use regform_data::{DEFAULT_COUNTRIES_SOURCE, DEFAULT_REGIONS_SOURCE, ReferenceSources};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "regform";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_LOG_LEVEL: &str = "info";
const CONFIG_PATH_ENV: &str = "REGFORM_CONFIG_PATH";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub form: Form,
    #[serde(default)]
    pub phone: Phone,
    #[serde(default)]
    pub logging: Logging,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data: Data::default(),
            form: Form::default(),
            phone: Phone::default(),
            logging: Logging::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Data {
    pub countries: Option<String>,
    pub regions: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            countries: Some(DEFAULT_COUNTRIES_SOURCE.to_owned()),
            regions: Some(DEFAULT_REGIONS_SOURCE.to_owned()),
            timeout: None,
        }
    }
}

/// Initial selections, the values a server would have rendered into the form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Form {
    pub country: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Phone {
    pub preferred_countries: Option<Vec<String>>,
    pub separate_dial_code: Option<bool>,
    pub ready_fallback: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [data], [form], [phone], and [logging]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        self.reference_sources()
            .with_context(|| format!("invalid [data] locations in {}", path.display()))?;

        if let Some(timeout) = &self.data.timeout
            && parse_duration(timeout)? <= Duration::ZERO
        {
            bail!(
                "data.timeout in {} must be positive, got {}",
                path.display(),
                timeout
            );
        }

        if let Some(fallback) = &self.phone.ready_fallback
            && parse_duration(fallback)? <= Duration::ZERO
        {
            bail!(
                "phone.ready_fallback in {} must be positive, got {}",
                path.display(),
                fallback
            );
        }

        if let Some(regions) = &self.phone.preferred_countries
            && let Some(bad) = regions.iter().find(|region| !is_region_code(region))
        {
            bail!(
                "phone.preferred_countries in {} must hold two-letter region codes, got {:?}",
                path.display(),
                bad
            );
        }

        self.log_level()
            .with_context(|| format!("invalid [logging] level in {}", path.display()))?;
        Ok(())
    }

    pub fn reference_sources(&self) -> Result<ReferenceSources> {
        ReferenceSources::parse(
            self.data
                .countries
                .as_deref()
                .unwrap_or(DEFAULT_COUNTRIES_SOURCE),
            self.data.regions.as_deref().unwrap_or(DEFAULT_REGIONS_SOURCE),
        )
    }

    pub fn data_timeout(&self) -> Result<Option<Duration>> {
        self.data.timeout.as_deref().map(parse_duration).transpose()
    }

    pub fn ready_fallback(&self) -> Result<Option<Duration>> {
        self.phone
            .ready_fallback
            .as_deref()
            .map(parse_duration)
            .transpose()
    }

    /// Widget options for `initial_country`, with any `[phone]` overrides applied.
    pub fn phone_widget_config(
        &self,
        data: &ReferenceData,
        initial_country: &str,
    ) -> PhoneWidgetConfig {
        let mut widget = PhoneWidgetConfig::for_initial_country(data, initial_country);
        if let Some(regions) = &self.phone.preferred_countries {
            widget.preferred_countries = regions
                .iter()
                .map(|region| region.to_ascii_lowercase())
                .collect();
        }
        if let Some(separate) = self.phone.separate_dial_code {
            widget.separate_dial_code = separate;
        }
        widget
    }

    pub fn log_level(&self) -> Result<log::LevelFilter> {
        let raw = self.logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL);
        raw.parse().map_err(|_| {
            anyhow!("invalid log level {raw:?}; use one of: off, error, warn, info, debug, trace")
        })
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        match &self.logging.file {
            Some(path) => Ok(PathBuf::from(path)),
            None => default_log_path(),
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# regform config\n# Place this file at: {}\n\nversion = 1\n\n[data]\n# Filesystem paths or http(s) URLs\ncountries = \"{}\"\nregions = \"{}\"\n# timeout = \"5s\"\n\n[form]\n# Initial selections; country defaults to Ecuador\n# country = \"Ecuador\"\n# province = \"Pichincha\"\n# city = \"Quito\"\n\n[phone]\npreferred_countries = [\"ec\", \"us\", \"mx\", \"co\", \"es\"]\nseparate_dial_code = false\n# Re-apply the initial region after this delay for widgets without a ready signal\n# ready_fallback = \"300ms\"\n\n[logging]\nlevel = \"{}\"\n# Optional. Default is platform data dir (for example ~/.local/share/regform/regform.log)\n# file = \"/absolute/path/to/regform.log\"\n",
            path.display(),
            DEFAULT_COUNTRIES_SOURCE,
            DEFAULT_REGIONS_SOURCE,
            DEFAULT_LOG_LEVEL,
        )
    }
}

pub fn default_log_path() -> Result<PathBuf> {
    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set [logging].file to an explicit log path")
    })?;
    Ok(data_root.join(APP_NAME).join(format!("{APP_NAME}.log")))
}

fn is_region_code(raw: &str) -> bool {
    raw.len() == 2 && raw.chars().all(|c| c.is_ascii_alphabetic())
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 300ms or 5s)")
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_duration};
    use anyhow::Result;
    use regform_app::{CountryEntry, ReferenceData};
    use regform_data::ReferenceSource;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.log_level()?, log::LevelFilter::Info);
        assert_eq!(config.data_timeout()?, None);
        assert_eq!(config.ready_fallback()?, None);

        let sources = config.reference_sources()?;
        assert_eq!(
            sources.countries,
            ReferenceSource::File(PathBuf::from("data/countries.json"))
        );
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[form]\ncountry = \"Ecuador\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[data], [form], [phone], and [logging]"));
        Ok(())
    }

    #[test]
    fn v1_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[data]\ncountries = \"https://example.com/static/data/countries.json\"\nregions = \"/srv/provinces.json\"\ntimeout = \"2s\"\n[form]\ncountry = \"Colombia\"\nprovince = \"Antioquia\"\n[phone]\nready_fallback = \"300ms\"\n[logging]\nlevel = \"debug\"\nfile = \"/tmp/regform-test.log\"\n",
        )?;

        let config = Config::load(&path)?;
        assert_eq!(config.data_timeout()?, Some(Duration::from_secs(2)));
        assert_eq!(config.ready_fallback()?, Some(Duration::from_millis(300)));
        assert_eq!(config.form.country.as_deref(), Some("Colombia"));
        assert_eq!(config.form.city, None);
        assert_eq!(config.log_level()?, log::LevelFilter::Debug);
        assert_eq!(config.log_file()?, PathBuf::from("/tmp/regform-test.log"));

        let sources = config.reference_sources()?;
        assert!(matches!(sources.countries, ReferenceSource::Http(_)));
        assert_eq!(
            sources.regions,
            ReferenceSource::File(PathBuf::from("/srv/provinces.json"))
        );
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("REGFORM_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("REGFORM_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn default_path_uses_config_toml_suffix_when_no_env_override() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("REGFORM_CONFIG_PATH");
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("regform/config.toml"));
        Ok(())
    }

    #[test]
    fn unsupported_data_scheme_is_rejected() -> Result<()> {
        let (_temp, path) =
            write_config("version = 1\n[data]\ncountries = \"ftp://example.com/countries.json\"\n")?;
        let error = Config::load(&path).expect_err("ftp source should fail validation");
        assert!(
            format!("{error:#}").contains("unsupported URL scheme"),
            "got {error:#}"
        );
        Ok(())
    }

    #[test]
    fn durations_parse_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("5s")?, Duration::from_secs(5));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        Ok(())
    }

    #[test]
    fn invalid_duration_is_rejected() {
        let error = parse_duration("oops").expect_err("invalid duration should fail");
        assert!(error.to_string().contains("invalid duration"));
    }

    #[test]
    fn non_positive_durations_are_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[data]\ntimeout = \"0s\"\n")?;
        let error = Config::load(&path).expect_err("zero timeout should fail");
        assert!(error.to_string().contains("must be positive"));

        let (_temp, path) = write_config("version = 1\n[phone]\nready_fallback = \"0ms\"\n")?;
        let error = Config::load(&path).expect_err("zero fallback should fail");
        assert!(error.to_string().contains("phone.ready_fallback"));
        Ok(())
    }

    #[test]
    fn preferred_countries_must_be_region_codes() -> Result<()> {
        let (_temp, path) =
            write_config("version = 1\n[phone]\npreferred_countries = [\"ec\", \"usa\"]\n")?;
        let error = Config::load(&path).expect_err("three-letter code should fail");
        assert!(error.to_string().contains("\"usa\""));
        Ok(())
    }

    #[test]
    fn unknown_log_level_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[logging]\nlevel = \"loud\"\n")?;
        let error = Config::load(&path).expect_err("unknown level should fail");
        assert!(format!("{error:#}").contains("invalid log level \"loud\""));
        Ok(())
    }

    #[test]
    fn phone_overrides_apply_on_top_of_initial_region() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[phone]\npreferred_countries = [\"CO\", \"EC\"]\nseparate_dial_code = true\n",
        )?;
        let config = Config::load(&path)?;
        let data = ReferenceData::new(
            vec![
                CountryEntry::new("Ecuador", "EC"),
                CountryEntry::new("Colombia", "CO"),
            ],
            Default::default(),
        );

        let widget = config.phone_widget_config(&data, "Colombia");
        assert_eq!(widget.initial_country, "co");
        assert_eq!(widget.preferred_countries, vec!["co", "ec"]);
        assert!(widget.separate_dial_code);

        let fallback = Config::default().phone_widget_config(&data, "Atlantis");
        assert_eq!(fallback.initial_country, "ec");
        assert!(!fallback.separate_dial_code);
        Ok(())
    }

    #[test]
    fn log_file_defaults_under_data_dir() -> Result<()> {
        let path = Config::default().log_file()?;
        assert!(path.ends_with("regform/regform.log"), "got {}", path.display());
        Ok(())
    }

    #[test]
    fn example_config_includes_required_sections() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[data]"));
        assert!(example.contains("[form]"));
        assert!(example.contains("[phone]"));
        assert!(example.contains("[logging]"));

        let (_temp, written) = write_config(&example)?;
        Config::load(&written)?;
        Ok(())
    }
}
