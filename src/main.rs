//! Synopsis CLI - structured article summarisation
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use std::path::PathBuf;
use synopsis::article::{load_articles, save_articles, write_articles};
use synopsis::progress::TerminalProgress;
use synopsis::prompt::{prepare_content, Prompt};
use synopsis::{backend, logging, Config, Summarizer, FALLBACK_SUMMARY};

#[derive(Parser)]
#[command(name = "synopsis")]
#[command(author, version, about = "Structured article summarisation with LLMs", long_about = None)]
struct Cli {
    /// Path to a synopsis.toml (defaults to ./synopsis.toml, then ~/.config/synopsis/)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a JSON array of articles
    Summarise {
        /// Input file: [{"title": ..., "content": ...}, ...]
        input: PathBuf,
        /// Write the enriched articles here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the prompt that would be sent for one article
    Prompt {
        /// Input file with articles
        input: PathBuf,
        /// Zero-based index of the article
        #[arg(long, default_value_t = 0)]
        index: usize,
    },
    /// Print the resolved configuration
    Config,
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Summarise { input, output } => {
            let config = load_config(cli.config.as_ref())?;
            let mut articles = load_articles(&input)?;

            let llm = backend::from_config(&config)?;
            let summarizer = Summarizer::new(config.pipeline.clone(), llm);
            summarizer
                .summarize_articles(&mut articles, &mut TerminalProgress)
                .await;

            let missing = articles
                .iter()
                .filter(|a| a.summary.as_deref() == Some(FALLBACK_SUMMARY))
                .count();
            if missing > 0 {
                eprintln!(
                    "{} {} of {} articles have no summary",
                    "Warning:".yellow().bold(),
                    missing,
                    articles.len()
                );
            }

            match output {
                Some(path) => {
                    save_articles(&path, &articles)?;
                    eprintln!("Wrote {} articles to {}", articles.len(), path.display());
                }
                None => write_articles(std::io::stdout().lock(), &articles)?,
            }
        }
        Commands::Prompt { input, index } => {
            let config = load_config(cli.config.as_ref())?;
            let articles = load_articles(&input)?;
            let article = articles.get(index).ok_or_else(|| {
                anyhow::anyhow!("no article at index {} ({} loaded)", index, articles.len())
            })?;

            match prepare_content(article.content.as_deref(), &config.pipeline) {
                Some(prepared) => {
                    let prompt = Prompt::build(&article.title, prepared.text, prepared.truncated);
                    println!("{}", "=== System ===".bold());
                    println!("{}\n", prompt.system);
                    println!("{}", "=== User ===".bold());
                    println!("{}", prompt.user);
                }
                None => println!(
                    "Content shorter than {} characters, no prompt would be sent.",
                    config.pipeline.minimum_content_length()
                ),
            }
        }
        Commands::Config => {
            let config = load_config(cli.config.as_ref())?;
            print!("{}", toml::to_string_pretty(&config.redacted())?);
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "synopsis", &mut std::io::stdout());
        }
    }

    Ok(())
}
