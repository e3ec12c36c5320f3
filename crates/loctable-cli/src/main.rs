use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

mod commands;
mod ui;

#[derive(Parser)]
#[command(
    name = "loctable",
    version,
    about = "Keeps source-code translation keys and a translation sheet in lockstep"
)]
struct Cli {
    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a commented default loctable.toml in the current directory
    Init {
        /// Overwrite an existing config file
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Create a fresh sheet and record its selector in loctable.toml
    NewSheet {
        #[arg(long, default_value = "i18n Language Sheet")]
        title: String,
    },

    /// Scan sources, diff keys against the sheet, optionally emit locale files
    Build {
        /// Scan roots; defaults to scan.roots from the config
        #[arg(short, long)]
        root: Vec<PathBuf>,
        /// Emit per-locale data units after a clean diff
        #[arg(long, default_value_t = false)]
        build: bool,
        /// List every missing key instead of only the count
        #[arg(long, default_value_t = false)]
        missing_keys: bool,
        /// Report missing keys without aborting
        #[arg(long, default_value_t = false)]
        lenient: bool,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Remove the output directory before writing
        #[arg(long, default_value_t = false)]
        clean: bool,
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Write a hand-off CSV with the rows still needing translation
    Export {
        /// Target locale to translate into
        #[arg(long)]
        locale: String,
        /// Source locale column; defaults to source_locale from the config
        #[arg(long)]
        source_locale: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Push a finished hand-off CSV back into the sheet
    Import {
        #[arg(long)]
        file: PathBuf,
        /// Locale column the document was translated into
        #[arg(long)]
        locale: String,
    },

    /// Dump JSON schemas for the report types
    Schema {
        #[arg(long)]
        out_dir: PathBuf,
    },
}

trait Runnable {
    fn run(self, use_color: bool) -> Result<()>;
}

impl Runnable for Commands {
    fn run(self, use_color: bool) -> Result<()> {
        let cmd_name = format!("{:?}", self);
        info!(event = "command_start", command = %cmd_name);

        let result = match self {
            Commands::Init { force } => commands::init::run(force),
            Commands::NewSheet { title } => commands::new_sheet::run(&title),
            Commands::Build {
                root,
                build,
                missing_keys,
                lenient,
                out_dir,
                clean,
                format,
            } => commands::build::run(
                root,
                build,
                missing_keys,
                lenient,
                out_dir,
                clean,
                &format,
                use_color,
            ),
            Commands::Export {
                locale,
                source_locale,
                out,
            } => commands::export::run(&locale, source_locale.as_deref(), out),
            Commands::Import { file, locale } => commands::import::run(&file, &locale),
            Commands::Schema { out_dir } => commands::schema::run(&out_dir),
        };

        match &result {
            Ok(_) => info!(event = "command_done", command = %cmd_name),
            Err(e) => error!(event = "command_failed", command = %cmd_name, error = ?e),
        }

        result
    }
}

fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = rolling::daily("logs", "loctable.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = init_tracing();

    let cli = Cli::parse();

    let use_color = !cli.no_color
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    cli.cmd.run(use_color)
}
