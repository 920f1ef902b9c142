use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::navigation::Action;
use crate::picker::PickerField;
use crate::view::View;

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

/// `field=value`, e.g. `month=02`.
#[derive(Debug, Clone)]
pub struct FieldChange {
    pub field: PickerField,
    pub value: String,
}

impl std::str::FromStr for FieldChange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kv = s.parse::<KeyVal>()?;
        Ok(Self {
            field: kv.key.parse()?,
            value: kv.value,
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "calnav",
    version,
    about = "Calendar navigation header: period arrows, labels and a date picker",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append,
        global = true
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Print machine readable JSON instead of the terminal bar.
    #[arg(long = "json", global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the navigation bar for a view and date.
    Show(NavArgs),
    /// Press one of the arrow buttons.
    Go {
        #[arg(value_enum)]
        action: Action,
        #[command(flatten)]
        nav: NavArgs,
    },
    /// Print the coarser view the label drills up to.
    Up {
        #[arg(long, value_enum, default_value = "month")]
        view: View,
        /// Comma separated, coarse to fine; defaults to the configured list.
        #[arg(long)]
        views: Option<String>,
    },
    /// Drive the year/month/day picker.
    Pick(PickArgs),
    /// List the selectable days of a month.
    Days { year: i32, month: u32 },
}

#[derive(Args, Debug, Clone)]
pub struct NavArgs {
    #[arg(long, value_enum, default_value = "month")]
    pub view: View,

    /// Any date inside the period to show; defaults to today.
    #[arg(long)]
    pub date: Option<String>,

    #[arg(long = "min-date")]
    pub min_date: Option<String>,

    #[arg(long = "max-date")]
    pub max_date: Option<String>,

    /// Also label the following period.
    #[arg(long)]
    pub double: bool,

    #[arg(long)]
    pub locale: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct PickArgs {
    #[arg(long)]
    pub year: Option<String>,

    #[arg(long)]
    pub month: Option<String>,

    #[arg(long)]
    pub day: Option<String>,

    /// Column change applied in order, e.g. `--set month=02`.
    #[arg(
        long = "set",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<FieldChange>()),
        action = ArgAction::Append
    )]
    pub changes: Vec<FieldChange>,
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_go_with_bounds() {
        let cli = GlobalCli::try_parse_from([
            "calnav",
            "--json",
            "go",
            "prev2",
            "--view",
            "decade",
            "--date",
            "2024-01-01",
            "--min-date",
            "1900-01-01",
        ])
        .expect("parse args");

        assert!(cli.json);
        match cli.command {
            Command::Go { action, nav } => {
                assert_eq!(action, Action::Prev2);
                assert_eq!(nav.view, View::Decade);
                assert_eq!(nav.min_date.as_deref(), Some("1900-01-01"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_view() {
        assert!(GlobalCli::try_parse_from(["calnav", "show", "--view", "week"]).is_err());
    }

    #[test]
    fn parses_picker_changes() {
        let cli = GlobalCli::try_parse_from([
            "calnav", "pick", "--set", "month=02", "--set", "year=2020",
        ])
        .expect("parse args");

        let Command::Pick(args) = cli.command else {
            panic!("expected pick");
        };
        let fields: Vec<_> = args.changes.iter().map(|c| c.field).collect();
        assert_eq!(fields, [PickerField::Month, PickerField::Year]);
        assert!("weekday=3".parse::<FieldChange>().is_err());
    }

    #[test]
    fn rc_override_requires_equals() {
        assert!("labels.prev".parse::<KeyVal>().is_err());
        let kv = "labels.prev = <".parse::<KeyVal>().expect("parse kv");
        assert_eq!(kv.key, "labels.prev");
        assert_eq!(kv.value, "<");
    }
}
