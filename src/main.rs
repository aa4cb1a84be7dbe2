use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::{Layer, Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

use platform_version_resolver::config::ResolverConfig;
use platform_version_resolver::input::parse_platform_dependencies;
use platform_version_resolver::version::resolver::Resolver;

#[derive(Parser)]
#[command(name = "platform-version-resolver")]
#[command(
    version,
    about = "Resolve platform version patterns against upstream release catalogs"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (defaults to $XDG_CONFIG_HOME/platform-version-resolver/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve version patterns per platform and print the result as JSON
    Resolve {
        /// JSON object mapping platform names to arrays of patterns
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        dependencies: Option<String>,

        /// Read the JSON object from a file instead
        #[arg(long)]
        file: Option<PathBuf>,

        #[arg(long)]
        pretty: bool,
    },
    /// Print the release catalog backing a platform, newest first
    Catalog {
        /// Platform name, e.g. PAPER or VELOCITY
        platform: String,

        /// Print at most this many versions
        #[arg(long)]
        limit: Option<usize>,
    },
}

type LogLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

fn init_logging(cli: &Cli) -> anyhow::Result<Option<WorkerGuard>> {
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let json = cli.log_format == LogFormat::Json;

    let mut layers: Vec<LogLayer> = vec![if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    }];

    let guard = match &cli.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);

            layers.push(if json {
                fmt::layer().json().with_writer(writer).boxed()
            } else {
                fmt::layer().with_ansi(false).with_writer(writer).boxed()
            });
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry().with(filter).with(layers).init();

    Ok(guard)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", output);
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ResolverConfig::load_or_default(cli.config.as_deref())?;
    let resolver = Resolver::from_config(&config).context("Failed to build HTTP client")?;

    match cli.command {
        Command::Resolve {
            dependencies,
            file,
            pretty,
        } => {
            let raw = match (dependencies, file) {
                (Some(raw), _) => raw,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => bail!("either --dependencies or --file is required"),
            };

            let dependencies = parse_platform_dependencies(&raw)?;
            let resolution = resolver
                .resolve(&dependencies)
                .await
                .context("Failed to resolve platform versions")?;

            print_json(&resolution.versions, pretty)
        }
        Command::Catalog { platform, limit } => {
            let platform = platform.to_uppercase();
            let Some(catalog) = resolver
                .catalog_for_platform(&platform)
                .await
                .with_context(|| format!("Failed to fetch the {} catalog", platform))?
            else {
                bail!("Platform {} has no release catalog", platform);
            };

            let versions = catalog.versions();
            let versions = &versions[..limit.unwrap_or(versions.len()).min(versions.len())];

            print_json(&versions, true)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(&cli)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}
