//! pagegate CLI - simulate access-gate decisions from the shell.
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`PAGEGATE_*`)
//! 3. Project config (`.pagegate/config.toml` under `--project`)
//! 4. Global config (`~/.pagegate/config.toml`)
//! 5. Default values (lowest priority)
//!
//! # Output
//!
//! Results are printed to stdout as one JSON object. Logs go to stderr.

mod simulate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pagegate_auth::SecurityLevel;
use pagegate_runtime::config::{ConfigLoader, ConfigResolver, GateSettings};
use simulate::{Action, RequestArgs};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// pagegate CLI - page access gate simulator
#[derive(Parser, Debug)]
#[command(name = "pagegate")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Project root directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    project: Option<PathBuf>,

    /// Override the security level (all, guest, user)
    #[arg(long, global = true)]
    security: Option<SecurityLevel>,

    /// Override the redirect page
    #[arg(long, global = true)]
    redirect: Option<String>,

    /// Skip ~/.pagegate/config.toml
    #[arg(long, global = true)]
    no_global_config: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one page request through the gate
    Check(RequestArgs),
    /// Log out the simulated session
    Logout(RequestArgs),
    /// Stop impersonating (or log out) the simulated session
    StopImpersonating(RequestArgs),
    /// Load configuration and check the access policy
    Validate,
}

/// CLI-based configuration resolver.
///
/// Loads file/env config via [`ConfigLoader`] and applies CLI argument
/// overrides as the highest-priority layer.
struct CliConfigResolver {
    project_root: PathBuf,
    skip_global: bool,
    debug: bool,
    security: Option<SecurityLevel>,
    redirect: Option<String>,
}

impl CliConfigResolver {
    fn from_args(args: &Args) -> Self {
        let project_root = args.project.clone().unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to get current directory, using '.'");
                PathBuf::from(".")
            })
        });

        Self {
            project_root,
            skip_global: args.no_global_config,
            debug: args.debug,
            security: args.security,
            redirect: args.redirect.clone(),
        }
    }

    fn resolve(&self) -> Result<GateSettings> {
        let mut loader = ConfigLoader::new().with_project_root(&self.project_root);
        if self.skip_global {
            loader = loader.skip_global_config();
        }

        let mut settings = loader
            .load()
            .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
        self.apply(&mut settings);
        Ok(settings)
    }
}

impl ConfigResolver for CliConfigResolver {
    fn apply(&self, config: &mut GateSettings) {
        if self.debug {
            config.debug = true;
        }
        if let Some(level) = self.security {
            config.access.security = level;
        }
        if let Some(ref page) = self.redirect {
            config.access.redirect = Some(page.clone());
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let resolver = CliConfigResolver::from_args(&args);
    let settings = resolver.resolve()?;

    // Filter: --debug (or config debug) > --verbose > RUST_LOG env > default "warn"
    let filter = if settings.debug {
        EnvFilter::new("debug")
    } else if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_layer.with_filter(filter))
        .init();

    info!(path = %resolver.project_root.display(), "Project root");

    let output = match args.command {
        Command::Check(ref request) => simulate::run(&settings, request, Action::PageEnter)?,
        Command::Logout(ref request) => simulate::run(&settings, request, Action::Logout)?,
        Command::StopImpersonating(ref request) => {
            simulate::run(&settings, request, Action::StopImpersonating)?
        }
        Command::Validate => simulate::validate(&settings)?,
    };

    println!("{output}");
    Ok(())
}
