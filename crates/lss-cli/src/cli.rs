use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use lss_core::export::TableFormat;
use lss_core::{Emit, TimeKind};

use crate::config::TableFlags;

#[derive(Parser)]
#[command(name = "lss")]
#[command(about = "Inspect, rewrite and analyze LiveSplit splits files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the CLI config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a run's identity, attempt count and segments
    Inspect {
        /// Splits file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export the segment x attempt table
    Table {
        /// Splits file
        file: PathBuf,
        #[command(flatten)]
        switches: TableSwitches,
        /// Output format (config default when omitted)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Summarize a run: best run, sum of best, per-segment statistics
    Stats {
        /// Splits file
        file: PathBuf,
        /// Use game time instead of real time
        #[arg(long, overrides_with = "real_time")]
        game_time: bool,
        /// Use real time even when the config selects game time
        #[arg(long, overrides_with = "game_time")]
        real_time: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Verify that files survive a read/write round trip unchanged
    Check {
        /// Splits files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Re-serialize a splits file
    Rewrite {
        /// Splits file
        file: PathBuf,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Which fields to write
        #[arg(long, value_enum, default_value_t = EmitMode::ExcludeUnset)]
        emit: EmitMode,
    },
    /// Check whether two runs share game, category and segments
    Compare {
        /// First splits file
        first: PathBuf,
        /// Second splits file
        second: PathBuf,
        /// Only compare segment counts, not names
        #[arg(long)]
        loose: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

/// On/off switches for `lss table`. Each pair overrides the config file;
/// the last one given wins.
#[allow(clippy::struct_excessive_bools)]
#[derive(Args, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TableSwitches {
    /// Use game time instead of real time
    #[arg(long, overrides_with = "real_time")]
    pub game_time: bool,
    /// Use real time even when the config selects game time
    #[arg(long, overrides_with = "game_time")]
    pub real_time: bool,
    /// Keep attempts missing some segment times
    #[arg(long, overrides_with = "no_allow_partial")]
    pub allow_partial: bool,
    /// Drop attempts missing some segment times
    #[arg(long, overrides_with = "allow_partial")]
    pub no_allow_partial: bool,
    /// Keep attempts without any segment time
    #[arg(long, overrides_with = "no_allow_empty")]
    pub allow_empty: bool,
    /// Drop attempts without any segment time
    #[arg(long, overrides_with = "allow_empty")]
    pub no_allow_empty: bool,
    /// Show running totals instead of segment times
    #[arg(long, overrides_with = "no_cumulative")]
    pub cumulative: bool,
    /// Show segment times even when the config asks for running totals
    #[arg(long, overrides_with = "cumulative")]
    pub no_cumulative: bool,
    /// Keep the seven-digit fraction on durations
    #[arg(long, overrides_with = "no_fraction")]
    pub fraction: bool,
    /// Drop the seven-digit fraction from durations
    #[arg(long, overrides_with = "fraction")]
    pub no_fraction: bool,
}

impl TableSwitches {
    pub fn flags(self, format: Option<TableFormat>) -> TableFlags {
        TableFlags {
            time_kind: time_kind_switch(self.game_time, self.real_time),
            allow_partial: switch(self.allow_partial, self.no_allow_partial),
            allow_empty: switch(self.allow_empty, self.no_allow_empty),
            cumulative: switch(self.cumulative, self.no_cumulative),
            include_fraction: switch(self.fraction, self.no_fraction),
            format,
        }
    }
}

/// `Some(true)` for `--x`, `Some(false)` for `--no-x`, `None` for neither.
const fn switch(on: bool, off: bool) -> Option<bool> {
    if on {
        Some(true)
    } else if off {
        Some(false)
    } else {
        None
    }
}

pub const fn time_kind_switch(game_time: bool, real_time: bool) -> Option<TimeKind> {
    match switch(game_time, real_time) {
        Some(true) => Some(TimeKind::GameTime),
        Some(false) => Some(TimeKind::RealTime),
        None => None,
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl From<OutputFormat> for TableFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => Self::Csv,
            OutputFormat::Json => Self::Json,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum EmitMode {
    /// Only fields present in the input
    ExcludeUnset,
    /// Every field holding a value, defaults included
    ExcludeNone,
    /// Every field, empty elements included
    IncludeAll,
}

impl From<EmitMode> for Emit {
    fn from(mode: EmitMode) -> Self {
        match mode {
            EmitMode::ExcludeUnset => Self::ExcludeUnset,
            EmitMode::ExcludeNone => Self::ExcludeNone,
            EmitMode::IncludeAll => Self::IncludeAll,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
