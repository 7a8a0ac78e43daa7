use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use chrono::Weekday;
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{
  debug,
  info,
  warn
};

use crate::datetime::parse_timezone;

pub const CONFIG_ENV_VAR: &str =
  "LECTURECHAT_CONFIG";
pub const TIMEZONE_ENV_VAR: &str =
  "LECTURECHAT_TIMEZONE";
const CONFIG_FILE_NAME: &str =
  "lecturechat.toml";
const DEFAULT_TIMEZONE: &str = "UTC";
const DEFAULT_WEEK_START: &str =
  "sunday";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  pub timezone:     String,
  pub color:        bool,
  pub calendar:     CalendarSection,
  #[serde(skip)]
  pub loaded_files: Vec<PathBuf>
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalendarSection {
  pub week_start: String
}

impl Default for Config {
  fn default() -> Self {
    Self {
      timezone:     DEFAULT_TIMEZONE
        .to_string(),
      color:        true,
      calendar:     CalendarSection::default(),
      loaded_files: vec![]
    }
  }
}

impl Default for CalendarSection {
  fn default() -> Self {
    Self {
      week_start: DEFAULT_WEEK_START
        .to_string()
    }
  }
}

impl Config {
  /// Defaults, then the config file, then environment variables.
  #[tracing::instrument(skip(
    override_path
  ))]
  pub fn load(
    override_path: Option<&Path>
  ) -> anyhow::Result<Self> {
    Self::load_with_env(
      override_path,
      |key| std::env::var(key).ok()
    )
  }

  pub fn load_with_env<F>(
    override_path: Option<&Path>,
    env: F
  ) -> anyhow::Result<Self>
  where
    F: Fn(&str) -> Option<String>
  {
    let mut cfg = match resolve_config_path(
      override_path,
      &env
    )? {
      | Some(path) => {
        info!(config = %path.display(), "loading config");
        Self::load_file(&path)?
      }
      | None => {
        info!(
          "no config file found; using \
           defaults"
        );
        Self::default()
      }
    };

    if let Some(raw) =
      env(TIMEZONE_ENV_VAR)
      && !raw.trim().is_empty()
    {
      debug!(timezone = %raw, "timezone from environment");
      cfg.timezone =
        raw.trim().to_string();
    }

    cfg.sanitize();
    Ok(cfg)
  }

  fn load_file(
    path: &Path
  ) -> anyhow::Result<Self> {
    let text =
      fs::read_to_string(path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;
    let mut cfg = Self::from_toml_str(
      &text
    )
    .with_context(|| {
      format!(
        "failed to parse {}",
        path.display()
      )
    })?;
    cfg
      .loaded_files
      .push(path.to_path_buf());
    Ok(cfg)
  }

  pub fn from_toml_str(
    raw: &str
  ) -> anyhow::Result<Self> {
    let mut cfg: Self =
      toml::from_str(raw)?;
    cfg.sanitize();
    Ok(cfg)
  }

  /// Applies `key=value` overrides from the command line.
  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) -> anyhow::Result<()>
  where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (key, value) in overrides {
      debug!(key = %key, value = %value, "applying override");
      match key.as_str() {
        | "timezone" => {
          self.timezone = value;
        }
        | "color" => {
          self.color = parse_bool(&value)
            .ok_or_else(|| {
              anyhow!(
                "invalid color \
                 setting: {value}"
              )
            })?;
        }
        | "calendar.week_start" => {
          self.calendar.week_start =
            value;
        }
        | other => {
          return Err(anyhow!(
            "unknown config key: {other}"
          ));
        }
      }
    }
    self.sanitize();
    Ok(())
  }

  /// The configured time zone, or UTC when the id does not parse.
  #[must_use]
  pub fn time_zone(&self) -> Tz {
    parse_timezone(
      &self.timezone,
      "config"
    )
    .unwrap_or_else(|| {
      warn!(
        timezone = %self.timezone,
        "falling back to UTC"
      );
      chrono_tz::UTC
    })
  }

  #[must_use]
  pub fn week_start(&self) -> Weekday {
    if self
      .calendar
      .week_start
      .eq_ignore_ascii_case("monday")
    {
      Weekday::Mon
    } else {
      Weekday::Sun
    }
  }

  fn sanitize(&mut self) {
    let week_start = self
      .calendar
      .week_start
      .trim()
      .to_ascii_lowercase();
    if week_start != "sunday"
      && week_start != "monday"
    {
      warn!(
        week_start = %self.calendar.week_start,
        "unsupported week start; using sunday"
      );
      self.calendar.week_start =
        DEFAULT_WEEK_START.to_string();
    } else {
      self.calendar.week_start =
        week_start;
    }

    if self.timezone.trim().is_empty() {
      self.timezone =
        DEFAULT_TIMEZONE.to_string();
    }
  }
}

fn resolve_config_path<F>(
  override_path: Option<&Path>,
  env: &F
) -> anyhow::Result<Option<PathBuf>>
where
  F: Fn(&str) -> Option<String>
{
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Some(raw) = env(CONFIG_ENV_VAR)
  {
    let trimmed = raw.trim();
    if trimmed == "/dev/null" {
      return Ok(None);
    }
    if !trimmed.is_empty() {
      return Ok(Some(PathBuf::from(
        trimmed
      )));
    }
  }

  if let Some(dir) = dirs::config_dir() {
    let candidate = dir
      .join("lecturechat")
      .join("config.toml");
    if candidate.exists() {
      return Ok(Some(candidate));
    }
  }

  let cwd = std::env::current_dir()
    .context(
      "cannot determine current \
       directory"
    )?;
  let candidate =
    cwd.join(CONFIG_FILE_NAME);
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

fn parse_bool(s: &str) -> Option<bool> {
  match s
    .trim()
    .to_ascii_lowercase()
    .as_str()
  {
    | "1" | "y" | "yes" | "on"
    | "true" => Some(true),
    | "0" | "n" | "no" | "off"
    | "false" => Some(false),
    | _ => None
  }
}
