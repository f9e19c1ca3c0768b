mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{cache, completions, domain, resolve, Context};
use crate::error::{exit_code_for, report_error};
use logomark_config as config;
use logomark_core::time::minutes_to_millis;
use logomark_core::MemoryCache;
use logomark_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "logomark", version, about = "logomark CLI")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Keep the cache in memory for this run only
    #[arg(long, global = true, conflicts_with = "db_path")]
    memory: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Guess the domain(s) for an organization name
    Domain(domain::DomainArgs),
    /// List every logo URL the cascade would try
    Urls(domain::UrlsArgs),
    /// Resolve a logo, probing providers on a cache miss
    Resolve(resolve::ResolveArgs),
    #[command(subcommand)]
    Cache(cache::CacheCommand),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose,
        memory,
        command,
    } = cli;

    let command = match command {
        Command::Completions(args) => return completions::emit(args),
        command => command,
    };

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path.clone()) {
            Ok(path) => {
                if path.exists() {
                    debug!(path = %path.display(), "config resolved");
                } else {
                    debug!(path = %path.display(), "config missing, using defaults");
                }
            }
            Err(err) => {
                debug!(error = %err, "config unavailable");
            }
        }
    }

    let service = app_config.service();
    let ttl_millis = minutes_to_millis(app_config.cache.ttl_minutes);
    let max_entries = app_config.cache.max_entries;

    if memory {
        let mut cache = MemoryCache::with_ttl_millis(ttl_millis).with_context(|| "create cache")?;
        if let Some(max) = max_entries {
            cache = cache.max_entries(max);
        }
        debug!("using in-memory logo cache");
        let ctx = Context {
            cache: &cache,
            service: &service,
            json,
            config: &app_config,
        };
        return dispatch(&ctx, command);
    }

    let db_path = paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;
    if verbose {
        debug!(path = %db_path.display(), "database path resolved");
    }

    let store =
        Store::open(&db_path).with_context(|| format!("open database {}", db_path.display()))?;
    store.migrate().with_context(|| "run migrations")?;
    let cache = store.cache(ttl_millis, max_entries);

    let ctx = Context {
        cache: &cache,
        service: &service,
        json,
        config: &app_config,
    };
    dispatch(&ctx, command)
}

fn dispatch(ctx: &Context<'_>, command: Command) -> Result<()> {
    match command {
        Command::Domain(args) => domain::show_domains(ctx, args),
        Command::Urls(args) => domain::show_urls(ctx, args),
        Command::Resolve(args) => resolve::resolve(ctx, args),
        Command::Cache(cmd) => match cmd {
            cache::CacheCommand::Ls(args) => cache::list_entries(ctx, args),
            cache::CacheCommand::Get(args) => cache::get_entry(ctx, args),
            cache::CacheCommand::Set(args) => cache::set_entry(ctx, args),
            cache::CacheCommand::Rm(args) => cache::remove_entry(ctx, args),
            cache::CacheCommand::Clear(args) => cache::clear_entries(ctx, args),
            cache::CacheCommand::Prune(args) => cache::prune_entries(ctx, args),
        },
        Command::Completions(_) => {
            unreachable!("completions command handled before cache initialization")
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
