//! llmi18n - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use llmi18n::{
    cli::{Args, Commands, Config, Verbosity},
    streaming::OllamaClient,
    telemetry::StatsDisplay,
    translation::Translator,
};
use std::io::Read;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = args.validate() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(2);
    }

    let verbosity = args.verbosity();
    init_logging(verbosity);

    let config = load_config(&args)?;

    match &args.command {
        Some(Commands::Check) => run_check(&config).await,
        Some(Commands::Config) => show_config(&config),
        None => run_translate(&args, config, verbosity).await,
    }
}

/// Install the stderr subscriber; RUST_LOG wins over -v/-q
fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load the configuration file and apply command-line overrides
fn load_config(args: &Args) -> Result<Config> {
    let mut config =
        Config::load(args.config.as_deref()).context("Failed to load configuration")?;

    if let Some(lang) = &args.lang {
        config.translation.target_language = lang.clone();
    }
    if let Some(model) = &args.model {
        config.translation.model = model.clone();
    }
    if let Some(url) = &args.url {
        config.ollama.base_url = url.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn read_input(args: &Args) -> Result<String> {
    if args.reads_stdin() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read stdin")?;
        return Ok(input);
    }

    let path = args.input.as_ref().context("Input file required")?;
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

async fn run_translate(args: &Args, config: Config, verbosity: Verbosity) -> Result<()> {
    let input = read_input(args)?;

    let client = OllamaClient::with_config(config.ollama.client_config())?;
    let translator = Translator::new(client, config.translation);

    let spinner = verbosity.show_progress().then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!(
            "Translating to {} with {}",
            translator.config().target_language,
            translator.config().model
        ));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let result = translator.translate_with_stats(&input).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let translation = result.with_context(|| {
        format!(
            "Translation via {} failed",
            translator.client().generate_url()
        )
    })?;

    println!("{}", translation.text);
    StatsDisplay::new(&translation.stats, verbosity).display_summary();

    Ok(())
}

async fn run_check(config: &Config) -> Result<()> {
    let client = OllamaClient::with_config(config.ollama.client_config())?;

    if !client.health_check().await? {
        eprintln!(
            "{} Ollama is not reachable at {}. Start it with: ollama serve",
            "✗".red().bold(),
            client.base_url()
        );
        std::process::exit(1);
    }
    println!("{} Ollama is running at {}", "✓".green().bold(), client.base_url());

    let models = client.list_models().await?;
    let wanted = config.translation.model.as_str();
    // "mistral" matches "mistral:latest"
    let is_wanted = |name: &str| name == wanted || name.split(':').next() == Some(wanted);

    for model in &models {
        if is_wanted(model) {
            println!("  {} {}", "●".green(), model.bold());
        } else {
            println!("  {} {}", "○".dimmed(), model);
        }
    }

    if !models.iter().any(|m| is_wanted(m)) {
        println!(
            "{} Model {} is not installed. Pull it with: ollama pull {}",
            "!".yellow().bold(),
            wanted,
            wanted
        );
    }

    Ok(())
}

fn show_config(config: &Config) -> Result<()> {
    if let Some(path) = Config::default_path() {
        println!("{} {}", "# Default location:".dimmed(), path.display());
    }
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{}", contents);
    Ok(())
}
