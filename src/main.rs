use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{error, info};

mod controller;
mod model;
mod ui;

use controller::Controller;
use dynimg::domain::{AppError, PlaceholderKind, PreviewConfig};
use dynimg::fields::field_options;
use dynimg::html::{panel_html, placeholder_html};
use dynimg::loader::load_data_set;
use dynimg::render::{Panel, Placeholder, render};
use dynimg::{DataSet, PanelOptions, ThresholdEvaluator, TimeFormatter, TimeZoneMode, logging};
use model::{Model, Status};
use ui::TableUI;

#[derive(Parser)]
#[command(name = "dynimg", version)]
#[command(about = "Turn tabular time-series data into dashboard images")]
struct Cli {
    /// More output per occurrence (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Write the log to a file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the panel as json descriptors or html
    Render {
        #[command(flatten)]
        input: Input,

        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Browse the rendered images in the terminal
    Preview {
        #[command(flatten)]
        input: Input,

        /// Event poll interval in ms
        #[arg(long, default_value_t = 100)]
        poll: u64,
    },
    /// List the fields selectable in the panel options
    Fields {
        /// Data files (csv, parquet, arrow), one series each
        #[arg(required = true)]
        files: Vec<String>,
    },
}

#[derive(Args)]
struct Input {
    /// Data files (csv, parquet, arrow), one series each
    #[arg(required = true)]
    files: Vec<String>,

    /// Panel options as json
    #[arg(short, long)]
    config: Option<String>,

    /// Format dates in UTC instead of the configured zone
    #[arg(long)]
    utc: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Html,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum Output<'a> {
    Panel(&'a Panel),
    Placeholder(&'a Placeholder),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(code) => code,
    }
}

fn expand_path(path: &str) -> Result<PathBuf, AppError> {
    shellexpand::full(path)
        .map(|p| PathBuf::from(p.as_ref()))
        .map_err(|e| AppError::LoadingFailed(format!("can't expand '{path}': {e}")))
}

fn load_files(files: &[String]) -> Result<DataSet, AppError> {
    let paths = files
        .iter()
        .map(|f| expand_path(f))
        .collect::<Result<Vec<PathBuf>, AppError>>()?;
    load_data_set(&paths)
}

fn load_options(config: Option<&str>) -> Result<PanelOptions, AppError> {
    match config {
        Some(path) => PanelOptions::load(&expand_path(path)?),
        None => Ok(PanelOptions::default()),
    }
}

fn render_input(input: &Input) -> Result<(DataSet, Result<Panel, Placeholder>), AppError> {
    let data = load_files(&input.files)?;
    let options = load_options(input.config.as_deref())?;
    let zone = if input.utc {
        TimeZoneMode::Utc
    } else {
        options.time_zone
    };
    let panel = render(&data, &options, TimeFormatter::now(zone), &ThresholdEvaluator)
        .map_err(|e| {
            info!("Render pass failed: {e}");
            Placeholder::from(&e)
        });
    Ok((data, panel))
}

fn run(cli: Cli) -> Result<ExitCode, AppError> {
    let log_file = cli.log_file.as_deref().map(expand_path).transpose()?;
    logging::init(cli.verbose, log_file.as_deref())?;

    match cli.command {
        Command::Render { input, format } => {
            let (_, panel) = render_input(&input)?;
            let text = match (&panel, format) {
                (Ok(p), Format::Json) => serde_json::to_string_pretty(&Output::Panel(p))?,
                (Err(p), Format::Json) => serde_json::to_string_pretty(&Output::Placeholder(p))?,
                (Ok(p), Format::Html) => panel_html(p),
                (Err(p), Format::Html) => placeholder_html(p),
            };
            println!("{text}");
            Ok(match panel {
                Err(Placeholder {
                    kind: PlaceholderKind::Error,
                    ..
                }) => ExitCode::from(2),
                _ => ExitCode::SUCCESS,
            })
        }
        Command::Preview { input, poll } => {
            let (data, panel) = render_input(&input)?;
            let name = match data.series.as_slice() {
                [table] => table.display_name().to_string(),
                _ => format!("{} series", data.series.len()),
            };
            preview(Model::init(name, panel), &PreviewConfig { event_poll_time: poll })?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Fields { files } => {
            let data = load_files(&files)?;
            let listing = field_options(&data.series);
            println!("{}", serde_json::to_string_pretty(&listing)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn preview(mut model: Model, cfg: &PreviewConfig) -> Result<(), AppError> {
    let mut ui = TableUI::new();
    let controller = Controller::new(cfg);
    let mut terminal = ratatui::init();

    let result = (|| -> Result<(), AppError> {
        while model.status != Status::QUITTING {
            terminal.draw(|f| ui.draw(&model, f))?;
            let message = controller.handle_event()?;
            model.update(message);
        }
        Ok(())
    })();

    ratatui::restore();
    if let Err(e) = &result {
        error!("Preview failed: {e}");
    }
    result
}
