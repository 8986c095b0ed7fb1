//! Command-line front end.
//!
//! `run` analyzes a URL and prints the results page in one go. `submit`
//! and `show` split the two halves across invocations, handing the result
//! over through a store file.

use clap::{Args, Parser, Subcommand, ValueEnum};
use response_analyzer::body::{Formatting, ViewMode};
use response_analyzer::config::{AnalyzerConfig, DEFAULT_ENDPOINT};
use response_analyzer::flow::{FlowEvent, Subscription, ToastLevel};
use response_analyzer::storage::{HandoffBuffer, InMemoryStorageArea, JsonFileStorageArea, StorageArea};
use response_analyzer::{AnalyzeFlow, HttpAnalyzer, ResultsView};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// Inspect the response of a URL through an analyzer service.
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Analyzer endpoint receiving `POST {"url": ...}`
    #[arg(long, env = "ANALYZER_ENDPOINT", default_value = DEFAULT_ENDPOINT, global = true)]
    endpoint: String,

    /// Give up on the analyzer after this many seconds (no limit by default)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze a URL and print the results
    Run {
        url: String,
        #[clap(flatten)]
        view: ViewArgs,
    },
    /// Analyze a URL and leave the result in a store file for `show`
    Submit {
        url: String,
        #[arg(long, env = "ANALYZER_STORE")]
        store: PathBuf,
    },
    /// Print the results left by `submit`, consuming them
    Show {
        #[arg(long, env = "ANALYZER_STORE")]
        store: PathBuf,
        #[clap(flatten)]
        view: ViewArgs,
    },
}

#[derive(Debug, Args)]
struct ViewArgs {
    /// Show the body as source or as rendered text
    #[arg(long, value_enum, default_value = "code")]
    view: ViewArg,

    /// Markup only: reindent or show as received
    #[arg(long, value_enum, default_value = "pretty")]
    formatting: FormattingArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ViewArg {
    Code,
    Preview,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormattingArg {
    Raw,
    Pretty,
}

impl ViewArgs {
    fn apply(&self, view: &mut ResultsView) {
        let body = view.body_mut();
        body.set_mode(match self.view {
            ViewArg::Code => ViewMode::Code,
            ViewArg::Preview => ViewMode::Preview,
        });
        body.set_formatting(match self.formatting {
            FormattingArg::Raw => Formatting::Raw,
            FormattingArg::Pretty => Formatting::Pretty,
        });
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = AnalyzerConfig::builder()
        .endpoint(cli.endpoint.as_str())
        .with(|c| c.request_timeout = cli.timeout_secs.map(Duration::from_secs))
        .build()?;

    match cli.command {
        Command::Run { url, view } => {
            let area: Arc<dyn StorageArea> = Arc::new(InMemoryStorageArea::new());
            let buffer = HandoffBuffer::new(area, config.handoff_key.clone());
            if !submit(&config, buffer.clone(), &url).await? {
                return Ok(ExitCode::FAILURE);
            }
            show(&buffer, &view);
        }
        Command::Submit { url, store } => {
            let buffer = HandoffBuffer::new(Arc::new(JsonFileStorageArea::new(&store)), config.handoff_key.clone());
            if !submit(&config, buffer, &url).await? {
                return Ok(ExitCode::FAILURE);
            }
            eprintln!("Result stored in {}", store.display());
        }
        Command::Show { store, view } => {
            let buffer = HandoffBuffer::new(Arc::new(JsonFileStorageArea::new(store)), config.handoff_key.clone());
            show(&buffer, &view);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Runs the analyze flow once. Returns whether it succeeded.
async fn submit(config: &AnalyzerConfig, buffer: HandoffBuffer, url: &str) -> anyhow::Result<bool> {
    let flow = AnalyzeFlow::new(HttpAnalyzer::from_config(config)?, buffer);
    let mut events = flow.subscribe();

    let outcome = flow.submit(url).await;
    report(&mut events);
    Ok(outcome.is_ok())
}

fn show(buffer: &HandoffBuffer, args: &ViewArgs) {
    let mut view = ResultsView::load(buffer);
    args.apply(&mut view);
    println!("{}", view.page());
}

fn report(events: &mut Subscription) {
    while let Ok(event) = events.try_recv() {
        match event {
            FlowEvent::Toast { level: ToastLevel::Error, message } => eprintln!("error: {message}"),
            FlowEvent::Toast { level: ToastLevel::Info, message } => eprintln!("{message}"),
            FlowEvent::Navigate { request_id, route } => log::debug!("[{request_id}] navigate to {route}"),
            FlowEvent::Submitted { request_id, url } => log::debug!("[{request_id}] submitted {url}"),
            FlowEvent::Idle => {}
        }
    }
}
