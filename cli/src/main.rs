//! `ballot`: cast a straw-poll vote and follow the live results.

mod render;

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use ballot_client::{
    messages, App, BallotState, ClientConfig, ResultsState, ResultsView, View, VoteStoreClient,
};
use ballot_store::VoteCollection;
use ballot_store_lmdb::{LmdbEnvironment, LmdbFlagStore, LmdbVoteCollection};
use ballot_tally::Dashboard;
use ballot_types::Role;
use ballot_utils::{init_logging, LogFormat};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use crate::render::Renderer;

type LmdbClient = VoteStoreClient<LmdbVoteCollection, LmdbFlagStore>;

#[derive(Parser, Debug)]
#[command(name = "ballot", about = "President / vice-president straw poll")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, global = true, env = "BALLOT_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory holding the vote collection and the local flag.
    #[arg(long, global = true, env = "BALLOT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "BALLOT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "BALLOT_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Disable ANSI colours.
    #[arg(long, global = true, env = "BALLOT_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Cast this installation's vote. Prompts for any office not given.
    Vote {
        /// President: ballot number or candidate id.
        #[arg(long)]
        president: Option<String>,

        /// Vice-president: ballot number or candidate id.
        #[arg(long)]
        vice_president: Option<String>,
    },
    /// Show the current results.
    Results {
        /// Keep redrawing as votes arrive, until Ctrl-C.
        #[arg(long)]
        watch: bool,

        /// Print the tallies as JSON instead.
        #[arg(long, conflicts_with = "watch")]
        json: bool,
    },
    /// Show whether this installation has voted.
    Status,
    /// List the candidates.
    Candidates,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!("loaded config from {}", path.display());
    }

    let registry = Arc::new(config.registry().context("invalid candidate configuration")?);
    let renderer = Renderer::new(config.color);

    match cli.command {
        Command::Candidates => {
            print!("{}", renderer.candidates(&registry));
        }
        Command::Status => {
            let client = open_client(&config)?;
            let votes = client.collection().snapshot()?;
            println!("voted:        {}", if client.has_voted() { "yes" } else { "no" });
            println!("participants: {}", votes.len());
            println!("votes:        {}", config.votes_path().display());
            println!("local flag:   {}", config.local_path().display());
        }
        Command::Results { watch, json } => {
            let client = open_client(&config)?;
            let mut view = ResultsView::new(registry);
            let mut rx = view.watch();
            view.mount(&client)?;
            if json {
                let dashboard = first_dashboard(&mut rx).await?;
                println!("{}", serde_json::to_string_pretty(&dashboard)?);
            } else if watch {
                watch_results(&renderer, &mut rx).await?;
            } else {
                let dashboard = first_dashboard(&mut rx).await?;
                print!("{}", renderer.header());
                print!("{}", renderer.dashboard(&dashboard));
            }
            view.unmount();
        }
        Command::Vote {
            president,
            vice_president,
        } => {
            let client = open_client(&config)?;
            let mut app = App::new(client, registry);
            print!("{}", renderer.header());
            cast_vote(&mut app, &renderer, [president, vice_president]).await?;
            print!("{}", renderer.footer());
        }
    }

    Ok(())
}

/// File config (if any) overlaid with CLI flags and env vars.
fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if cli.no_color {
        config.color = false;
    }
    Ok(config)
}

fn open_client(config: &ClientConfig) -> anyhow::Result<LmdbClient> {
    let local = LmdbEnvironment::open(&config.local_path(), config.map_size_bytes())
        .context("opening local flag store")?;
    let votes = LmdbEnvironment::open(&config.votes_path(), config.map_size_bytes())
        .context("opening vote collection")?;
    Ok(VoteStoreClient::new(
        votes.vote_collection(config.poll_interval())?,
        local.flag_store()?,
    ))
}

async fn cast_vote(
    app: &mut App<LmdbVoteCollection, LmdbFlagStore>,
    renderer: &Renderer,
    presets: [Option<String>; 2],
) -> anyhow::Result<()> {
    if app.view() == View::Dashboard {
        println!("{}\n", messages::ALREADY_VOTED);
        return show_dashboard(app, renderer).await;
    }

    println!("{}", messages::BALLOT_HEADING);
    println!("{}\n", messages::BALLOT_INSTRUCTIONS);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    for (role, preset) in Role::ALL.into_iter().zip(presets) {
        let mut preset = preset;
        loop {
            let input = match preset.take() {
                Some(input) => input,
                None => {
                    print!("{}> ", renderer.choices(app.ballot().registry(), role));
                    std::io::stdout().flush()?;
                    match lines.next_line().await? {
                        Some(line) => line,
                        None => bail!("input closed before a {} was chosen", role.label()),
                    }
                }
            };
            let picked = app
                .ballot()
                .registry()
                .resolve(role, &input)
                .map(|c| c.id.clone());
            match picked {
                Some(id) => {
                    app.ballot_mut().select(role, &id)?;
                    break;
                }
                None => eprintln!("no {} candidate matches {:?}", role.label(), input.trim()),
            }
        }
    }

    println!("{}", messages::SUBMITTING_LABEL);
    match app.submit_ballot()? {
        View::Dashboard => {
            if let BallotState::Submitted(id) = app.ballot().state() {
                tracing::info!(document = %id, "vote recorded");
            }
            println!("{}\n", messages::SUBMIT_LABEL);
            show_dashboard(app, renderer).await
        }
        View::Voting => match app.ballot().notice() {
            Some(notice) => bail!("{}", notice.text()),
            None => bail!("{}", messages::SUBMISSION_FAILED),
        },
    }
}

async fn show_dashboard(
    app: &mut App<LmdbVoteCollection, LmdbFlagStore>,
    renderer: &Renderer,
) -> anyhow::Result<()> {
    let mut rx = app.results().watch();
    app.show_results()?;
    let dashboard = first_dashboard(&mut rx).await?;
    print!("{}", renderer.dashboard(&dashboard));
    Ok(())
}

/// Wait for the first tally after mounting.
async fn first_dashboard(rx: &mut watch::Receiver<ResultsState>) -> anyhow::Result<Dashboard> {
    loop {
        if let ResultsState::Ready(dashboard) = &*rx.borrow_and_update() {
            return Ok(dashboard.clone());
        }
        rx.changed().await?;
    }
}

/// Redraw on every snapshot until Ctrl-C.
async fn watch_results(
    renderer: &Renderer,
    rx: &mut watch::Receiver<ResultsState>,
) -> anyhow::Result<()> {
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut state = rx.borrow_and_update().clone();
    loop {
        print!("{}{}", renderer.clear(), renderer.header());
        print!("{}", renderer.results(&state));
        std::io::stdout().flush()?;

        tokio::select! {
            changed = rx.changed() => {
                changed?;
                state = rx.borrow_and_update().clone();
            }
            _ = &mut shutdown => {
                tracing::info!("received SIGINT, stopping");
                break;
            }
        }
    }
    Ok(())
}
