use anyhow::Context;
use clap::{Parser, Subcommand};
use pacer_core::{classify, PacerConfig, ReactionMode, TemplatePack};
use pacer_limiter::RunFlag;
use pacer_session::{DryRunSink, Session, VecSource};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "pacer.toml", env = "PACER_CONFIG")]
    config: PathBuf,

    /// Emit logs as JSON lines
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a dry-run session over a JSON-lines feed dump
    Run {
        /// One JSON object per line: {"id", "text", "author", "page"}
        #[arg(short, long)]
        feed: PathBuf,

        /// Template pack (JSON), overrides the config file
        #[arg(short, long)]
        templates: Option<PathBuf>,

        /// Seed for reproducible reaction and delay choices
        #[arg(long)]
        seed: Option<u64>,

        /// Keep waiting for more items after the feed is drained
        #[arg(long)]
        follow: bool,
    },
    /// Print the classification of a piece of text
    Classify {
        text: String,

        /// Fixed reaction override ("random" for the weighted draw)
        #[arg(long, default_value = "random")]
        reaction: ReactionMode,

        #[arg(long)]
        seed: Option<u64>,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.json);

    // An existing file must load cleanly; only a missing one falls back.
    let config = if args.config.exists() {
        PacerConfig::load(&args.config)?
    } else {
        PacerConfig::load_or_default(&args.config)
    };

    match args.command {
        Command::Classify {
            text,
            reaction,
            seed,
        } => {
            if let ReactionMode::Fixed(r) = reaction {
                if !r.is_allowed() {
                    anyhow::bail!("reaction {} is not allowed", r);
                }
            }
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let result = classify(&text, reaction, &mut rng);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Run {
            feed,
            templates,
            seed,
            follow,
        } => {
            let source = VecSource::from_jsonl(&feed)?;
            let templates = match templates.or_else(|| config.comments.templates_path.clone()) {
                Some(path) => TemplatePack::load(&path)
                    .with_context(|| format!("Failed to load templates from {}", path.display()))?,
                None => {
                    warn!("No template pack configured, using the built-in fallback");
                    TemplatePack::default()
                }
            };

            let flag = RunFlag::new();
            let stopper = flag.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Stop requested");
                    stopper.stop();
                }
            });

            let mut session = Session::new(
                config,
                Arc::new(source),
                Arc::new(DryRunSink::new()),
                flag.signal(),
            )
            .with_templates(templates);
            if let Some(seed) = seed {
                session = session.with_seed(seed);
            }
            if follow {
                session = session.keep_polling(Duration::from_secs(5));
            }

            let summary = session.run().await;
            println!("{}", serde_json::to_string(&summary)?);
        }
    }

    Ok(())
}
