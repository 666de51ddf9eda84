// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use doctra::app_config::{self, Config, DispatchMode, TranslationMode, TranslationProvider};
use doctra::parsing::ContentFormat;
use doctra::pipeline::{DocumentPipeline, RequestInput, TranslationRequest};
use doctra::translation::{BatchProgress, CancellationFlag, Glossary, TranslationService};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Groq,
    Gemini,
    Claude,
    #[value(name = "openai")]
    OpenAI,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Groq => TranslationProvider::Groq,
            CliTranslationProvider::Gemini => TranslationProvider::Gemini,
            CliTranslationProvider::Claude => TranslationProvider::Claude,
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
        }
    }
}

/// CLI Wrapper for TranslationMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationMode {
    Professional,
    Casual,
    Summary,
}

impl From<CliTranslationMode> for TranslationMode {
    fn from(cli_mode: CliTranslationMode) -> Self {
        match cli_mode {
            CliTranslationMode::Professional => TranslationMode::Professional,
            CliTranslationMode::Casual => TranslationMode::Casual,
            CliTranslationMode::Summary => TranslationMode::Summary,
        }
    }
}

/// CLI Wrapper for ContentFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliContentFormat {
    Html,
    Markdown,
    Text,
}

impl From<CliContentFormat> for ContentFormat {
    fn from(cli_format: CliContentFormat) -> Self {
        match cli_format {
            CliContentFormat::Html => ContentFormat::Html,
            CliContentFormat::Markdown => ContentFormat::Markdown,
            CliContentFormat::Text => ContentFormat::Text,
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

/// doctra - structure-preserving document translation
///
/// Parses web pages, HTML, Markdown or plain text into paragraphs and
/// translates them with AI providers, falling back to an offline translator.
#[derive(Parser, Debug)]
#[command(name = "doctra")]
#[command(version)]
#[command(about = "Structure-preserving document translation")]
#[command(long_about = "doctra splits documents into headings, paragraphs, lists and code blocks and translates them batch by batch.

EXAMPLES:
    doctra translate https://docs.example.com/guide#install   # Translate one section of a page
    doctra translate README.md -t ja -o readme.ja.json        # Translate a local file to Japanese
    doctra translate notes.txt -p claude --mode casual        # Use a specific provider and style
    cat page.html | doctra translate - --format html          # Read from stdin
    doctra parse https://docs.example.com/guide               # Show the parsed paragraphs only
    doctra text \"Create a VPC\" -t zh                          # Translate a single text
    doctra completions bash > doctra.bash                     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. API keys may also come from GROQ_API_KEY,
    GEMINI_API_KEY, CLAUDE_API_KEY or OPENAI_API_KEY.

SUPPORTED PROVIDERS:
    gemini  - Google Gemini (default: gemini-2.0-flash)
    claude  - Anthropic Claude (default: claude-3-5-sonnet-20241022)
    openai  - OpenAI (default: gpt-4)
    groq    - Groq OpenAI-compatible API (default: llama-3.3-70b-versatile)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse and translate a document
    Translate(TranslateArgs),

    /// Parse a document and print its paragraphs without translating
    Parse(ParseArgs),

    /// Translate a single text
    Text(TextArgs),

    /// Generate shell completions for doctra
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every command that loads the configuration
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Glossary JSON file replacing the bundled glossary
    #[arg(short, long)]
    glossary: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// URL, file path, or '-' for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Input format, detected when omitted (ignored for URLs)
    #[arg(long, value_enum)]
    format: Option<CliContentFormat>,
}

#[derive(Args, Debug)]
struct TranslateArgs {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    common: CommonArgs,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Translation style
    #[arg(long, value_enum)]
    mode: Option<CliTranslationMode>,

    /// Source language code (e.g., 'en', 'zh', 'ja')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'zh', 'ja')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Paragraphs per batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Call the provider once per paragraph instead of once per batch
    #[arg(long)]
    per_paragraph: bool,

    /// Mark failed paragraphs as errors instead of translating them offline
    #[arg(long)]
    no_fallback: bool,

    /// Write the translated document JSON to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ParseArgs {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct TextArgs {
    /// Text to translate
    text: String,

    #[command(flatten)]
    common: CommonArgs,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Translation style
    #[arg(long, value_enum)]
    mode: Option<CliTranslationMode>,

    /// Source language code
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code
    #[arg(short, long)]
    target_language: Option<String>,
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

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
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
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
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
async fn main() -> Result<()> {
    // Initialize the logger once with the most verbose level the CLI allows,
    // the effective level is applied after loading the config
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "doctra", &mut std::io::stdout());
            Ok(())
        }
        Commands::Translate(args) => run_translate(args).await,
        Commands::Parse(args) => run_parse(args).await,
        Commands::Text(args) => run_text(args).await,
    }
}

/// Load or create the configuration and apply the log level
fn load_config(common: &CommonArgs) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &common.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let config_path = &common.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    // Update log level in config if specified via command line
    if let Some(log_level) = &common.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(level_filter(&config.log_level));
    }

    Ok(config)
}

/// Glossary from the CLI, then the config, then the bundled one
fn load_glossary(common: &CommonArgs, config: &Config) -> Result<Arc<Glossary>> {
    let path = common
        .glossary
        .clone()
        .or_else(|| config.glossary_path.as_ref().map(PathBuf::from));

    let glossary = match path {
        Some(path) => Glossary::from_file(&path)?,
        None => Glossary::bundled(),
    };
    Ok(Arc::new(glossary))
}

/// Turn the positional input into a pipeline input
fn read_input(args: &InputArgs) -> Result<RequestInput> {
    let format = args.format.clone().map(ContentFormat::from);

    if args.input.starts_with("http://") || args.input.starts_with("https://") {
        return Ok(RequestInput::Url(args.input.clone()));
    }

    let content = if args.input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read content from stdin")?;
        buffer
    } else {
        let path = Path::new(&args.input);
        if !path.is_file() {
            return Err(anyhow!("Input path does not exist: {:?}", path));
        }
        std::fs::read_to_string(path).context(format!("Failed to read input file: {}", path.display()))?
    };

    Ok(RequestInput::Content { content, format })
}

fn write_json<T: serde::Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output to JSON")?;
    match output {
        Some(path) => {
            std::fs::write(path, json).context(format!("Failed to write output file: {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn batch_progress_bar() -> ProgressBar {
    let progress_bar = ProgressBar::new(0);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches ({percent}%) {msg}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style.progress_chars("█▓▒░"));
    progress_bar
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let mut config = load_config(&options.common)?;

    // Override config with CLI options if provided
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(model) = &options.model {
        let provider_str = config.translation.provider.to_lowercase_string();
        match config.translation.available_providers.iter_mut().find(|p| p.provider_type == provider_str) {
            Some(provider_config) => provider_config.model = model.clone(),
            None => {
                let mut provider_config = app_config::ProviderConfig::new(config.translation.provider);
                provider_config.model = model.clone();
                config.translation.available_providers.push(provider_config);
            }
        }
    }

    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }

    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }

    let batch = &mut config.translation.common.batch;
    if let Some(batch_size) = options.batch_size {
        batch.batch_size = batch_size;
    }
    if options.per_paragraph {
        batch.mode = DispatchMode::PerParagraph;
    }
    if options.no_fallback {
        batch.fallback_to_offline = false;
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    let glossary = load_glossary(&options.common, &config)?;
    let input = read_input(&options.input)?;

    let mut request = TranslationRequest {
        input,
        source_language: config.source_language.clone(),
        target_language: config.target_language.clone(),
        mode: None,
        provider: None,
    };
    if let Some(mode) = options.mode {
        request = request.with_mode(mode.into());
    }

    info!(
        "🚀 doctra: {} - {} ({} → {})",
        config.translation.provider.display_name(),
        config.translation.get_model(config.translation.provider),
        config.source_language,
        config.target_language
    );

    // Stop dispatching further batches on Ctrl-C
    let cancel = CancellationFlag::new();
    let signal_flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing the current batch");
            signal_flag.cancel();
        }
    });

    let progress_bar = batch_progress_bar();
    progress_bar.set_message("Translating");

    let pipeline = DocumentPipeline::new(config, glossary);
    let result = pipeline
        .translate(&request, &cancel, |progress: &BatchProgress| {
            progress_bar.set_length(progress.total_batches as u64);
            progress_bar.set_position(progress.batch as u64);
        })
        .await;
    progress_bar.finish_and_clear();

    let (document, summary) = result?;
    let (completed, failed) = document.status_counts();
    info!(
        "Done: {} completed, {} failed, {} offline fallbacks{}",
        completed,
        failed,
        summary.fallback,
        if summary.cancelled { " (cancelled)" } else { "" }
    );

    write_json(&document, options.output.as_deref())
}

async fn run_parse(options: ParseArgs) -> Result<()> {
    let config = load_config(&options.common)?;
    let glossary = load_glossary(&options.common, &config)?;
    let input = read_input(&options.input)?;

    let pipeline = DocumentPipeline::new(config, glossary);
    let document = pipeline.parse(&input).await?;

    write_json(&document, None)
}

async fn run_text(options: TextArgs) -> Result<()> {
    let mut config = load_config(&options.common)?;
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(mode) = options.mode {
        config.translation.common.mode = mode.into();
    }
    let source_language = options.source_language.unwrap_or_else(|| config.source_language.clone());
    let target_language = options.target_language.unwrap_or_else(|| config.target_language.clone());

    let glossary = load_glossary(&options.common, &config)?;
    let service = TranslationService::new(&config.translation, glossary);

    let outcome = service
        .translate_text(&options.text, &source_language, &target_language)
        .await?;

    write_json(&outcome, None)
}
