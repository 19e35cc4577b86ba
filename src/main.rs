// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use lingodeck::app_config::{self, Config, TranslationProvider};
use lingodeck::app_controller::Controller;
use lingodeck::file_utils::FileManager;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTranslationProvider {
    Deepl,
    Google,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Deepl => TranslationProvider::DeepL,
            CliTranslationProvider::Google => TranslationProvider::Google,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Options shared by every command that talks to the back-ends
#[derive(Args, Debug)]
struct CommonArgs {
    /// Translation provider used for translation and back-translation
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Second provider whose translations are merged in as alternatives
    #[arg(long, value_enum)]
    alternative_provider: Option<CliTranslationProvider>,

    /// File holding the DeepL authentication key
    #[arg(long, env = "LINGODECK_AUTH_FILE")]
    auth_file: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Args, Debug)]
struct CreateArgs {
    /// Tab-separated vocabulary file (id, phrase, tags...)
    #[arg(short, long, value_name = "PATH")]
    vocab_path: PathBuf,

    /// Language to translate the vocabulary to (e.g. 'el', 'en-gb', 'pt-br')
    #[arg(short, long, value_name = "CODE")]
    target_language: String,

    /// Stable deck id, reuse it to update a deck on re-import
    #[arg(short, long)]
    deck_id: i64,

    /// Language of the vocabulary file
    #[arg(short, long, value_name = "CODE")]
    source_language: Option<String>,

    /// Language of the back-translation, defaults to the source language
    #[arg(long, value_name = "CODE")]
    verification_language: Option<String>,

    /// Deck name, defaults to "Translated <target> vocabulary"
    #[arg(long)]
    deck_name: Option<String>,

    /// Only create source -> target cards
    #[arg(long)]
    no_reverse_cards: bool,

    /// Directory receiving the .apkg and .zip outputs
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a deck from a vocabulary file
    Create(CreateArgs),

    /// List the languages supported by the configured providers
    Languages(CommonArgs),

    /// Generate shell completions for lingodeck
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// lingodeck - translated vocabulary flashcards
///
/// Translates a vocabulary list, back-translates it for verification,
/// synthesizes pronunciations and packages everything as an Anki deck.
#[derive(Parser, Debug)]
#[command(name = "lingodeck")]
#[command(version)]
#[command(about = "Create translated Anki vocabulary decks")]
#[command(long_about = "lingodeck translates a tab-separated vocabulary list, back-translates it for verification,
synthesizes pronunciations and packages everything as an Anki deck plus a plain archive.

EXAMPLES:
    lingodeck create -v vocab.tsv -t el -d 42              # English -> Greek deck
    lingodeck create -v vocab.tsv -t pt-br -d 7 --no-reverse-cards
    lingodeck create -v vocab.tsv -t el -d 42 -p google    # No DeepL key needed
    lingodeck create -v vocab.tsv -t el -d 42 --alternative-provider google
    lingodeck languages                                    # List supported languages
    lingodeck completions bash > lingodeck.bash            # Generate bash completions

VOCABULARY FORMAT:
    One phrase per line: id<TAB>phrase[<TAB>tag]*. Lines starting with '#' are ignored.
    Ids must be unique positive integers and stay the same across runs.

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. The DeepL key is read from .deepl_auth.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI colour for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, colour) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                colour, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() {
    // Logger accepts everything, the effective level is set via set_max_level
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    let result = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "lingodeck", &mut std::io::stdout());
            Ok(())
        }
        Commands::Create(args) => run_create(args).await,
        Commands::Languages(args) => run_languages(args).await,
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Load the configuration file and apply the shared CLI overrides
fn load_config(common: &CommonArgs) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(level) = &common.log_level {
        log::set_max_level(level_filter(&level.clone().into()));
    }

    let mut config = Config::load_or_create(&common.config)?;

    if let Some(provider) = common.provider {
        config.translation.provider = provider.into();
    }
    if let Some(provider) = common.alternative_provider {
        config.translation.alternative_provider = Some(provider.into());
    }
    if let Some(auth_file) = &common.auth_file {
        config.auth_file = Some(auth_file.to_string_lossy().to_string());
    }
    match &common.log_level {
        Some(level) => config.log_level = level.clone().into(),
        None => log::set_max_level(level_filter(&config.log_level)),
    }

    Ok(config)
}

async fn run_create(args: CreateArgs) -> Result<()> {
    let mut config = load_config(&args.common)?;

    config.target_language = args.target_language.clone();
    config.deck.deck_id = Some(args.deck_id);
    if let Some(source_language) = &args.source_language {
        config.source_language = source_language.clone();
    }
    if let Some(verification_language) = &args.verification_language {
        config.verification_language = Some(verification_language.clone());
    }
    if let Some(deck_name) = &args.deck_name {
        config.deck.deck_name = Some(deck_name.clone());
    }
    if args.no_reverse_cards {
        config.deck.bidirectional = false;
    }
    if let Some(output_dir) = &args.output_dir {
        config.deck.output_dir = output_dir.to_string_lossy().to_string();
    }

    if !FileManager::file_exists(&args.vocab_path) {
        return Err(anyhow::anyhow!("Vocabulary file does not exist: {:?}", args.vocab_path));
    }

    let controller = Controller::with_config(config)?;
    let outcome = controller
        .run(&args.vocab_path)
        .await
        .with_context(|| format!("Failed to create deck from {}", args.vocab_path.display()))?;

    if !outcome.failures.is_empty() {
        warn!(
            "Deck created without {} failed phrase(s), see {}",
            outcome.failures.len(),
            outcome
                .failure_log
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "the log above".to_string())
        );
    }
    info!(
        "{} notes, {} cards, {} audio files",
        outcome.deck.summary.notes, outcome.deck.summary.cards, outcome.deck.summary.media
    );

    Ok(())
}

async fn run_languages(args: CommonArgs) -> Result<()> {
    let config = load_config(&args)?;
    let controller = Controller::with_config(config)?;
    let backends = controller.create_backends()?;
    let listing = controller.describe_languages(&backends).await?;
    print!("{}", listing);
    Ok(())
}
