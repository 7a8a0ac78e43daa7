use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// One `--set key=value` config override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOverride {
    pub key: String,
    pub value: String,
}

fn parse_set_override(raw: &str) -> anyhow::Result<SetOverride> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(anyhow!("--set expects key=value, got `{raw}`"));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("--set key is empty in `{raw}`"));
    }
    Ok(SetOverride {
        key: key.to_string(),
        value: value.trim().to_string(),
    })
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "lecturecal",
    version,
    about = "Month paging and day agendas for lecturechat events"
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Config file; defaults to $LECTURECHAT_CONFIG or the user config dir.
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Override a config key, e.g. `--set calendar.week_start=monday`.
    #[arg(
        long = "set",
        value_name = "KEY=VALUE",
        value_parser = parse_set_override,
        action = ArgAction::Append,
        global = true
    )]
    pub overrides: Vec<SetOverride>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the month grid, marking days with events.
    Month {
        #[arg(default_value = "this", allow_negative_numbers = true)]
        month: String,
        /// JSON array of events; `-` reads stdin.
        #[arg(long)]
        events: Option<PathBuf>,
    },
    /// Print the month after MONTH.
    Next {
        #[arg(default_value = "this", allow_negative_numbers = true)]
        month: String,
    },
    /// Print the month before MONTH.
    Prev {
        #[arg(default_value = "this", allow_negative_numbers = true)]
        month: String,
    },
    /// Print the number of days in MONTH.
    Days {
        #[arg(default_value = "this", allow_negative_numbers = true)]
        month: String,
    },
    /// List the events starting on DAY, earliest first.
    Agenda {
        #[arg(default_value = "today")]
        day: String,
        #[arg(long)]
        events: PathBuf,
    },
    /// Print the beginning-date/ending-date query bounds of MONTH in epoch millis.
    Window {
        #[arg(default_value = "this", allow_negative_numbers = true)]
        month: String,
    },
}

/// Filter used when `RUST_LOG` is unset. Each `-q` drops a level below
/// the default `warn`, each `-v` raises one; `-q` wins when both are given.
fn default_filter(verbose: u8, quiet: u8) -> &'static str {
    match (quiet, verbose) {
        (0, 0) => "warn",
        (0, 1) => "info",
        (0, 2) => "debug",
        (0, _) => "trace",
        (1, _) => "error",
        (_, _) => "off",
    }
}

/// Installs the stderr subscriber. A subscriber that is already installed
/// (tests, embedding) is left in place.
pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter(verbose, quiet))
            .map_err(|e| anyhow!("bad log filter: {e}"))?,
    };

    let stderr = std::io::stderr();
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(stderr.is_terminal())
        .with_writer(std::io::stderr)
        .try_init()
    {
        debug!(error = %err, "keeping existing tracing subscriber");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Command, GlobalCli, default_filter, parse_set_override};

    #[test]
    fn parses_set_override() {
        let set = parse_set_override("calendar.week_start = monday").expect("parse");
        assert_eq!(set.key, "calendar.week_start");
        assert_eq!(set.value, "monday");
        assert_eq!(parse_set_override("color=").expect("empty value").value, "");
        assert!(parse_set_override("no-equals").is_err());
        assert!(parse_set_override(" =utc").is_err());
    }

    #[test]
    fn verbosity_picks_filter() {
        assert_eq!(default_filter(0, 0), "warn");
        assert_eq!(default_filter(2, 0), "debug");
        assert_eq!(default_filter(5, 0), "trace");
        assert_eq!(default_filter(3, 1), "error");
        assert_eq!(default_filter(0, 2), "off");
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = GlobalCli::try_parse_from([
            "lecturecal",
            "agenda",
            "2020-09-10",
            "--events",
            "events.json",
            "-vv",
            "--set",
            "timezone=Europe/London",
        ])
        .expect("parse args");

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.overrides.len(), 1);
        assert_eq!(
            cli.command,
            Command::Agenda {
                day: "2020-09-10".to_string(),
                events: "events.json".into(),
            }
        );
    }

    #[test]
    fn month_defaults_to_this() {
        let cli = GlobalCli::try_parse_from(["lecturecal", "days"]).expect("parse args");
        assert_eq!(
            cli.command,
            Command::Days {
                month: "this".to_string()
            }
        );
    }

    #[test]
    fn negative_month_offsets_are_positional() {
        let cli = GlobalCli::try_parse_from(["lecturecal", "month", "-1"]).expect("parse args");
        assert_eq!(
            cli.command,
            Command::Month {
                month: "-1".to_string(),
                events: None,
            }
        );

        let cli = GlobalCli::try_parse_from(["lecturecal", "-v", "window", "-12"])
            .expect("parse args");
        assert_eq!(cli.verbose, 1);
        assert_eq!(
            cli.command,
            Command::Window {
                month: "-12".to_string()
            }
        );

        let cli = GlobalCli::try_parse_from(["lecturecal", "prev", "-3", "-q"]).expect("parse args");
        assert_eq!(cli.quiet, 1);
        assert_eq!(
            cli.command,
            Command::Prev {
                month: "-3".to_string()
            }
        );
    }
}
