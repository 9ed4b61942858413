//! Command-line definitions.

use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};
use spotfinder_forecast::Weekday;

use crate::navigation::NavEvent;

/// Campus parking occupancy forecast.
#[derive(Parser, Debug)]
#[command(name = "spotfinder", version, about)]
pub struct Cli {
    /// Configuration file (TOML). Defaults to config/default.toml + SPOTFINDER__* env vars
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Asset directory holding the model and feature spec
    #[arg(long, global = true)]
    pub assets: Option<PathBuf>,

    /// Run inference on CPU even if an accelerator is available
    #[arg(long, global = true)]
    pub cpu: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Forecast occupancy at a 24-hour time
    ///
    /// # Examples
    ///
    /// ```bash
    /// spotfinder predict --weekday mon --hour 8 --minute 30
    /// spotfinder predict --weekday 4 --hour 17 --minute 0 --json
    /// ```
    Predict(PredictArgs),

    /// Forecast occupancy at a 12-hour time
    ///
    /// ```bash
    /// spotfinder predict12h --weekday fri --hour 5 --minute 15 --pm
    /// ```
    #[command(name = "predict12h")]
    Predict12h(Predict12hArgs),

    /// Forecast occupancy for the current local time
    Now(NowArgs),

    /// Print the feature vector fed to the model
    Encode(EncodeArgs),

    /// Replay navigation events through the app shell
    ///
    /// ```bash
    /// spotfinder nav splash map menu forecast back
    /// spotfinder nav splash map --tile-ms 800 --json
    /// ```
    Nav(NavArgs),
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Day of week: mon..sat or 0..5
    #[arg(short, long, value_parser = parse_weekday)]
    pub weekday: Weekday,

    /// Hour of day (0-23)
    #[arg(short = 'H', long, allow_negative_numbers = true)]
    pub hour: i32,

    /// Minute (0-59)
    #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
    pub minute: i32,

    /// Output as JSON instead of human-readable
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("meridiem").required(true).args(["am", "pm"])))]
pub struct Predict12hArgs {
    /// Day of week: mon..sat or 0..5
    #[arg(short, long, value_parser = parse_weekday)]
    pub weekday: Weekday,

    /// Hour on a 12-hour clock (1-12)
    #[arg(short = 'H', long, allow_negative_numbers = true)]
    pub hour: i32,

    /// Minute (0-59)
    #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
    pub minute: i32,

    #[arg(long)]
    pub am: bool,

    #[arg(long)]
    pub pm: bool,

    /// Output as JSON instead of human-readable
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct NowArgs {
    /// Output as JSON instead of human-readable
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Day of week: mon..sat or 0..5
    #[arg(short, long, value_parser = parse_weekday)]
    pub weekday: Weekday,

    /// Hour of day (0-23)
    #[arg(short = 'H', long, allow_negative_numbers = true)]
    pub hour: i32,

    /// Minute (0-59)
    #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
    pub minute: i32,
}

#[derive(Args, Debug)]
pub struct NavArgs {
    /// Events: splash, home, map, forecast, menu, back
    #[arg(required = true)]
    pub events: Vec<NavEvent>,

    /// Simulated first map tile latency in milliseconds (never loads if omitted)
    #[arg(long, value_name = "MS")]
    pub tile_ms: Option<u64>,

    /// Output the replay as JSON instead of human-readable
    #[arg(long)]
    pub json: bool,
}

fn parse_weekday(s: &str) -> Result<Weekday, String> {
    Weekday::parse(s).map_err(|e| e.to_string())
}
