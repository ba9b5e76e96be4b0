use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use tracing::debug;

use whatver::command::{self, LocalContext, Query, Rendering};
use whatver::config::AppConfig;
use whatver::output::{self, Palette};
use whatver::version::registries::NpmRegistry;

/// Check npm package versions against semver ranges.
///
/// Automatically detects local packages from package.json and shows their
/// installed versions if available.
///
/// Examples:
///   whatver lodash                        # uses the range from package.json if found
///   whatver lodash "^4.17"                # versions of lodash satisfying ^4.17
///   whatver react --all                   # all versions, local range highlighted
///   whatver typescript --show-prerelease  # include prerelease versions
#[derive(Parser, Debug)]
#[command(name = "whatver", version, about, verbatim_doc_comment)]
struct Cli {
    /// The npm package name to check
    package: String,

    /// The semver range to check against (uses local package.json range if not provided)
    range: Option<String>,

    /// Show all versions (including non-matching ones)
    #[arg(short, long)]
    all: bool,

    /// Include prerelease versions (e.g., 1.0.0-alpha.1)
    #[arg(short = 'p', long)]
    show_prerelease: bool,

    /// npm registry URL (defaults to https://registry.npmjs.org)
    #[arg(long, env = "WHATVER_REGISTRY", value_name = "URL")]
    registry: Option<String>,

    /// Config file (defaults to ~/.config/whatver/config.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Write JSON logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = whatver::logging::init(cli.log_file.as_deref())?;

    let config = AppConfig::load(cli.config.as_deref())?;
    let palette = Palette::new(use_color(&cli, &config));

    let registry_url = cli.registry.as_deref().unwrap_or(&config.registry.url);
    debug!("Using registry {}", registry_url);
    let registry = NpmRegistry::new(registry_url);

    let query = Query {
        package: cli.package.clone(),
        range: cli.range.clone(),
        all: cli.all,
        show_prerelease: cli.show_prerelease,
    };
    let local = LocalContext::from_current_dir(&query.package);
    let rendering = Rendering {
        palette,
        width: output::terminal_width(),
    };

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(command::run(&registry, &query, &local, rendering));

    match result {
        Ok(report) => print!("{report}"),
        Err(e) => eprintln!("{}", palette.error(&e.to_string())),
    }
    Ok(())
}

fn use_color(cli: &Cli, config: &AppConfig) -> bool {
    !cli.no_color
        && config.output.color
        && std::env::var_os("NO_COLOR").is_none_or(|v| v.is_empty())
        && std::io::stdout().is_terminal()
}
