//! Command handlers.
//!
//! Each handler returns a process exit code: 0 success, 1 error,
//! 2 invalid input (the caller can re-prompt).

use std::fmt::Write;
use std::time::Duration;

use anyhow::Context;
use serde::Serialize;
use spotfinder_forecast::{Forecast, ForecastConfig, ForecastError, Meridiem, Predictor, TimeInput};
use tracing::{error, info};

use crate::cli::{EncodeArgs, NavArgs, NowArgs, Predict12hArgs, PredictArgs};
use crate::navigation::map::MapView;
use crate::navigation::{BottomBar, NavEvent, NavOutcome, Navigator, Screen, SPLASH_DELAY};

pub const EXIT_OK: i32 = 0;
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_INVALID_INPUT: i32 = 2;

pub fn handle_predict(config: &ForecastConfig, args: PredictArgs) -> i32 {
    let input = match TimeInput::new(args.weekday.index() as i32, args.hour, args.minute) {
        Ok(input) => input,
        Err(e) => return report(&e),
    };
    run_forecast(config, input, args.json)
}

pub fn handle_predict_12h(config: &ForecastConfig, args: Predict12hArgs) -> i32 {
    let meridiem = Meridiem::from_is_am(args.am);
    let input = match TimeInput::from_12h(args.weekday.index() as i32, args.hour, args.minute, meridiem) {
        Ok(input) => input,
        Err(e) => return report(&e),
    };
    run_forecast(config, input, args.json)
}

pub fn handle_now(config: &ForecastConfig, args: NowArgs) -> i32 {
    let now = chrono::Local::now();
    let input = match TimeInput::from_datetime(&now) {
        Ok(input) => input,
        Err(e) => return report(&e),
    };
    info!(at = %now.format("%a %H:%M"), "Forecasting for current local time");
    run_forecast(config, input, args.json)
}

pub fn handle_encode(config: &ForecastConfig, args: EncodeArgs) -> i32 {
    let input = match TimeInput::new(args.weekday.index() as i32, args.hour, args.minute) {
        Ok(input) => input,
        Err(e) => return report(&e),
    };
    let predictor = match Predictor::from_config(config) {
        Ok(p) => p,
        Err(e) => return report(&e),
    };

    print!("{}", format_encoding(&input, &predictor.encode(&input)));
    predictor.release();
    EXIT_OK
}

pub fn handle_nav(args: &NavArgs) -> i32 {
    let first_tile = args.tile_ms.map(Duration::from_millis);
    let replay = replay_navigation(&args.events, first_tile);

    if args.json {
        return match serde_json::to_string_pretty(&replay) {
            Ok(text) => {
                println!("{}", text);
                EXIT_OK
            }
            Err(e) => {
                error!("Failed to serialize navigation replay: {}", e);
                eprintln!("Error: {}", e);
                EXIT_ERROR
            }
        };
    }

    print!("{}", format_replay(&replay));
    EXIT_OK
}

/// One navigation event and what the shell showed afterwards.
#[derive(Debug, Clone, Serialize)]
struct NavStep {
    event: &'static str,
    outcome: &'static str,
    screen: Screen,
    bottom_bar: Option<BottomBar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    map: Option<MapView>,
}

#[derive(Debug, Clone, Serialize)]
struct NavReplay {
    splash_ms: u64,
    steps: Vec<NavStep>,
    history: Vec<Screen>,
}

/// Feed events through a fresh navigator. Stops at the first exit.
fn replay_navigation(events: &[NavEvent], first_tile: Option<Duration>) -> NavReplay {
    let mut nav = Navigator::new();
    let mut steps = Vec::with_capacity(events.len());

    for &event in events {
        let outcome = nav.handle(event);
        let screen = nav.current();
        steps.push(NavStep {
            event: event.name(),
            outcome: match outcome {
                NavOutcome::Showing(_) => "showing",
                NavOutcome::Ignored => "ignored",
                NavOutcome::Exit => "exit",
            },
            screen,
            bottom_bar: nav.bottom_bar(),
            map: match outcome {
                NavOutcome::Showing(Screen::Map) => Some(MapView::opening(first_tile)),
                _ => None,
            },
        });
        if outcome == NavOutcome::Exit {
            break;
        }
    }

    NavReplay {
        splash_ms: SPLASH_DELAY.as_millis() as u64,
        steps,
        history: nav.history().to_vec(),
    }
}

fn format_replay(replay: &NavReplay) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "start: splash (holds for {} ms)", replay.splash_ms);

    for step in &replay.steps {
        match step.outcome {
            "exit" => {
                let _ = writeln!(out, "{} -> exit", step.event);
            }
            "ignored" => {
                let _ = writeln!(out, "{} -> ignored on {}", step.event, step.screen);
            }
            _ => {
                let bar = match step.bottom_bar {
                    Some(BottomBar { selected: Some(tab), .. }) => format!("[tab: {}]", tab.label()),
                    Some(BottomBar { menu_active: true, .. }) => "[menu open]".to_string(),
                    Some(_) => "[no tab]".to_string(),
                    None => "[no bar]".to_string(),
                };
                let _ = writeln!(out, "{} -> {} {}", step.event, step.screen, bar);
            }
        }
        if let Some(view) = step.map {
            let _ = writeln!(
                out,
                "    map at ({:.6}, {:.6}) zoom {}, loading overlay {} ms",
                view.lat, view.lon, view.zoom, view.overlay_ms
            );
        }
    }

    let trail: Vec<&str> = replay.history.iter().map(|s| s.route()).collect();
    let _ = writeln!(out, "history: {}", trail.join(" > "));
    out
}

fn run_forecast(config: &ForecastConfig, input: TimeInput, json: bool) -> i32 {
    match forecast(config, input) {
        Ok(forecast) => {
            if json {
                match serde_json::to_string_pretty(&forecast) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        error!("Failed to serialize forecast: {}", e);
                        eprintln!("Error: {}", e);
                        return EXIT_ERROR;
                    }
                }
            } else {
                println!("{}", format_forecast(&forecast));
            }
            EXIT_OK
        }
        Err(e) => match e.downcast_ref::<ForecastError>() {
            Some(inner) => report(inner),
            None => {
                error!("Forecast failed: {:#}", e);
                eprintln!("Error: {:#}", e);
                EXIT_ERROR
            }
        },
    }
}

fn forecast(config: &ForecastConfig, input: TimeInput) -> anyhow::Result<Forecast> {
    let predictor = Predictor::from_config(config).context("loading forecast model")?;
    let prediction = predictor.predict_input(&input)?;
    predictor.release();
    Ok(Forecast { input, prediction })
}

fn report(err: &ForecastError) -> i32 {
    eprintln!("Error: {}", err);
    if err.is_invalid_input() {
        EXIT_INVALID_INPUT
    } else {
        error!(error = %err, "Forecast command failed");
        EXIT_ERROR
    }
}

/// Human-readable forecast, matching the in-app wording.
fn format_forecast(forecast: &Forecast) -> String {
    format!("{}  ->  {}", forecast.input, forecast.prediction)
}

fn format_encoding(input: &TimeInput, named: &[(&str, f32)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Feature vector for {}", input);
    for (index, (name, value)) in named.iter().enumerate() {
        let _ = writeln!(out, "  [{}] {:<10} {:>9.6}", index, name, value);
    }
    out
}
