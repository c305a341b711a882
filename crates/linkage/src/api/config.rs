use std::{
  env::{self, VarError},
  fmt::Display,
  fs,
  str::FromStr,
  time::Duration,
};

use anyhow::Context;
use liblinkage::prelude::*;

use crate::api::errors::AppError;

#[derive(Clone, Debug)]
pub struct Config {
  pub env: Env,
  pub listen_addr: String,
  pub api_key: Option<String>,

  // Match settings
  pub categories_file: Option<String>,
  pub match_threshold: Option<f64>,
  pub max_comparisons: usize,
  pub request_timeout: Duration,

  // Debugging
  pub enable_prometheus: bool,
  pub enable_tracing: bool,
  pub tracing_exporter: TracingExporter,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      env: Env::Dev,
      listen_addr: "0.0.0.0:8000".into(),
      api_key: None,
      categories_file: None,
      match_threshold: None,
      max_comparisons: 25_000_000,
      request_timeout: Duration::from_secs(60),
      enable_prometheus: false,
      enable_tracing: false,
      tracing_exporter: TracingExporter::Otlp,
    }
  }
}

impl Config {
  pub fn from_env() -> Result<Config, AppError> {
    let config = Config {
      env: Env::from(env::var("ENV").unwrap_or("dev".into())),
      listen_addr: env::var("LISTEN_ADDR").unwrap_or("0.0.0.0:8000".into()),
      api_key: env::var("API_KEY").ok().filter(|key| !key.is_empty()),
      categories_file: env::var("CATEGORIES_FILE").ok().filter(|path| !path.is_empty()),
      match_threshold: parse_optional_env("MATCH_THRESHOLD")?,
      max_comparisons: parse_env("MAX_COMPARISONS", 25_000_000)?,
      request_timeout: Duration::from_secs(parse_env("REQUEST_TIMEOUT", 60)?),
      enable_prometheus: env::var("ENABLE_PROMETHEUS").unwrap_or_default() == "1",
      enable_tracing: env::var("ENABLE_TRACING").unwrap_or_default() == "1",
      tracing_exporter: env::var("TRACING_EXPORTER").unwrap_or("otlp".into()).parse()?,
    };

    if config.max_comparisons == 0 {
      return Err(AppError::ConfigError("MAX_COMPARISONS must be greater than zero".into()));
    }

    if config.request_timeout.is_zero() {
      return Err(AppError::ConfigError("REQUEST_TIMEOUT must be greater than zero".into()));
    }

    Ok(config)
  }

  /// Category table the service starts with, from `CATEGORIES_FILE` or the
  /// embedded defaults, with `MATCH_THRESHOLD` applied on top.
  pub fn linkage_config(&self) -> Result<LinkageConfig, AppError> {
    let config = match &self.categories_file {
      Some(path) => {
        let yaml = fs::read_to_string(path).with_context(|| format!("could not read categories file {path}"))?;

        LinkageConfig::from_yaml(&yaml)?
      }

      None => LinkageConfig::default(),
    };

    Ok(match self.match_threshold {
      Some(threshold) => config.with_threshold(threshold),
      None => config,
    })
  }

  /// Checks a caller's bearer token against `API_KEY`. Anyone is let through
  /// when no key is configured.
  pub fn authorize(&self, token: Option<&str>) -> Result<(), AppError> {
    match (self.api_key.as_deref(), token) {
      (None, _) => Ok(()),
      (Some(key), Some(token)) if key == token => Ok(()),

      (Some(_), token) => {
        tracing::debug!(token_provided = token.is_some(), "rejected api credentials");

        Err(AppError::InvalidCredentials)
      }
    }
  }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Env {
  Dev,
  Production,
}

impl From<String> for Env {
  fn from(value: String) -> Self {
    match value.as_ref() {
      "production" => Env::Production,
      _ => Env::Dev,
    }
  }
}

#[derive(Clone, Debug)]
pub enum TracingExporter {
  Otlp,
}

impl FromStr for TracingExporter {
  type Err = AppError;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value {
      "otlp" => Ok(TracingExporter::Otlp),
      other => Err(AppError::ConfigError(format!("unsupported tracing exporter kind: {other}"))),
    }
  }
}

pub fn parse_env<T>(name: &str, default: T) -> anyhow::Result<T>
where
  T: FromStr,
  T::Err: Display,
{
  Ok(parse_optional_env(name)?.unwrap_or(default))
}

fn parse_optional_env<T>(name: &str) -> anyhow::Result<Option<T>>
where
  T: FromStr,
  T::Err: Display,
{
  match env::var(name) {
    Ok(value) if value.is_empty() => Ok(None),
    Ok(value) => Ok(Some(value.parse::<T>().map_err(|err| AppError::ConfigError(format!("could not read {name}: {err}")))?)),
    Err(err) => match err {
      VarError::NotPresent => Ok(None),
      _ => Err(AppError::ConfigError(format!("could not read {name}: {err}")).into()),
    },
  }
}

#[cfg(test)]
mod tests {
  use std::{env, io::Write, net::IpAddr, time::Duration};

  use liblinkage::prelude::*;

  use super::{Config, Env, TracingExporter};
  use crate::api::errors::AppError;

  fn clear() {
    unsafe {
      for name in ["ENV", "LISTEN_ADDR", "API_KEY", "CATEGORIES_FILE", "MATCH_THRESHOLD", "MAX_COMPARISONS", "REQUEST_TIMEOUT", "ENABLE_PROMETHEUS", "ENABLE_TRACING", "TRACING_EXPORTER"] {
        env::remove_var(name);
      }
    }
  }

  #[test]
  #[serial_test::serial]
  fn parse_config_from_env() {
    clear();

    unsafe {
      env::set_var("ENV", "production");
      env::set_var("LISTEN_ADDR", "0.0.0.0:8080");
      env::set_var("API_KEY", "secret");
      env::set_var("MATCH_THRESHOLD", "90.5");
      env::set_var("MAX_COMPARISONS", "1000");
      env::set_var("REQUEST_TIMEOUT", "5");
      env::set_var("ENABLE_PROMETHEUS", "1");
      env::set_var("ENABLE_TRACING", "1");
    }

    let config = Config::from_env().unwrap();

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.listen_addr, "0.0.0.0:8080");
    assert_eq!(config.api_key, Some("secret".to_string()));
    assert_eq!(config.match_threshold, Some(90.5));
    assert_eq!(config.max_comparisons, 1000);
    assert_eq!(config.request_timeout, Duration::from_secs(5));
    assert!(config.enable_prometheus);
    assert!(config.enable_tracing);

    assert_eq!(config.linkage_config().unwrap().threshold, 90.5);

    clear();
  }

  #[test]
  #[serial_test::serial]
  fn defaults() {
    clear();

    let config = Config::from_env().unwrap();

    assert_eq!(config.env, Env::Dev);
    assert_eq!(config.listen_addr, "0.0.0.0:8000");
    assert_eq!(config.api_key, None);
    assert_eq!(config.match_threshold, None);
    assert_eq!(config.max_comparisons, 25_000_000);
    assert_eq!(config.request_timeout, Duration::from_secs(60));
    assert_eq!(config.linkage_config().unwrap(), LinkageConfig::default());
  }

  #[test]
  #[serial_test::serial]
  fn invalid_values() {
    clear();

    for (name, value) in [("MATCH_THRESHOLD", "high"), ("MAX_COMPARISONS", "-1"), ("MAX_COMPARISONS", "0"), ("REQUEST_TIMEOUT", "0"), ("TRACING_EXPORTER", "zipkin")] {
      unsafe {
        env::set_var(name, value);
      }

      assert!(Config::from_env().is_err(), "{name}={value} should be rejected");

      clear();
    }
  }

  #[test]
  #[serial_test::serial]
  fn categories_file() {
    clear();

    let path = env::temp_dir().join(format!("linkage-categories-{}.yml", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();

    writeln!(file, "threshold: 70\ncategories:\n  - category: name\n    weight: 1.0\n    patterns: [name]").unwrap();

    unsafe {
      env::set_var("CATEGORIES_FILE", &path);
    }

    let config = Config::from_env().unwrap().linkage_config().unwrap();

    assert_eq!(config.threshold, 70.0);
    assert_eq!(config.categories.len(), 1);
    assert_eq!(config.categories[0].category, Category::Name);

    unsafe {
      env::set_var("CATEGORIES_FILE", "/nonexistent/categories.yml");
    }

    assert!(Config::from_env().unwrap().linkage_config().is_err());

    let _ = std::fs::remove_file(path);

    clear();
  }

  #[test]
  #[serial_test::serial]
  fn parse_env() {
    unsafe {
      env::set_var("INT", "42");
      env::set_var("BOOL", "true");
      env::set_var("IP", "1.2.3.4");
      env::set_var("EMPTY", "");
    }

    assert_eq!(super::parse_env::<u32>("INT", 0).unwrap(), 42);
    assert!(super::parse_env::<bool>("BOOL", false).unwrap());
    assert_eq!(super::parse_env::<IpAddr>("IP", IpAddr::from([0, 0, 0, 0])).unwrap(), IpAddr::from([1, 2, 3, 4]));
    assert_eq!(super::parse_env::<u32>("EMPTY", 7).unwrap(), 7);
    assert_eq!(super::parse_env::<u32>("UNSET_LINKAGE_VARIABLE", 7).unwrap(), 7);

    assert!(super::parse_env::<u32>("BOOL", 0).is_err());
  }

  #[test]
  fn tracing_exporter_from_str() {
    assert!(matches!("otlp".parse(), Ok(TracingExporter::Otlp)));
    assert!("other".parse::<TracingExporter>().is_err());
  }

  #[test]
  fn authorize() {
    let open = Config::default();

    assert!(open.authorize(None).is_ok());
    assert!(open.authorize(Some("anything")).is_ok());

    let protected = Config {
      api_key: Some("myapikey".into()),
      ..Default::default()
    };

    assert!(protected.authorize(Some("myapikey")).is_ok());
    assert!(matches!(protected.authorize(Some("myapikey ")), Err(AppError::InvalidCredentials)));
    assert!(matches!(protected.authorize(Some("")), Err(AppError::InvalidCredentials)));
    assert!(matches!(protected.authorize(None), Err(AppError::InvalidCredentials)));
  }
}
