mod cli;
mod core;

use clap::{Parser, Subcommand};

use crate::core::config::AppConfig;

#[derive(Parser)]
#[command(name = "alens", about = "Inspect AI agent interaction logs", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format (text|json)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and display interaction logs
    Logs {
        /// Scope to one session and show its header
        #[arg(short, long)]
        session: Option<String>,

        /// Page to display (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: u64,

        /// Rows per page (default: api.page_size from the config)
        #[arg(short, long)]
        limit: Option<u64>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate config file
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load().unwrap_or_default();
    let output_opts = cli::output::OutputOptions {
        format: cli::output::OutputFormat::resolve(
            cli.json,
            cli.format.as_deref(),
            &config.settings.default_format,
        ),
        pretty: cli.pretty,
        use_color: cli::output::detect_color(&config.settings.color, cli.no_color),
        verbose: cli.verbose,
    };

    match cli.command {
        None | Some(Commands::Logs { .. }) => {
            let (session, page, limit) = match cli.command {
                Some(Commands::Logs {
                    session,
                    page,
                    limit,
                }) => (session, page, limit),
                _ => (None, 1, None),
            };
            cli::logs_cmd::run(&config, session, page, limit, &output_opts).await?;
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init => cli::config_cmd::init(&output_opts)?,
            ConfigAction::Check => cli::config_cmd::check(&output_opts)?,
        },
    }

    Ok(())
}
