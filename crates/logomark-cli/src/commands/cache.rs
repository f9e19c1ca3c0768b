use crate::commands::{print_json, Context};
use crate::error::{invalid_input, not_found};
use crate::util::parse_logo_url;
use anyhow::Result;
use clap::{Args, Subcommand};
use logomark_core::time::{format_age, format_timestamp_millis, now_millis};
use logomark_core::{CacheEntryDto, NormalizedKey};

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// List cached resolutions
    Ls(CacheListArgs),
    /// Show the cached resolution for a name
    Get(CacheKeyArgs),
    /// Record a resolution by hand
    Set(CacheSetArgs),
    Rm(CacheKeyArgs),
    Clear(CacheClearArgs),
    /// Drop entries older than the TTL
    Prune(CachePruneArgs),
}

#[derive(Debug, Args)]
pub struct CacheListArgs {
    /// Hide entries past the TTL
    #[arg(long)]
    pub fresh: bool,
}

#[derive(Debug, Args)]
pub struct CacheKeyArgs {
    pub name: String,
}

#[derive(Debug, Args)]
pub struct CacheSetArgs {
    pub name: String,
    #[arg(required_unless_present = "negative", conflicts_with = "negative")]
    pub url: Option<String>,
    /// Record that no provider has a logo for this name
    #[arg(long)]
    pub negative: bool,
}

#[derive(Debug, Args)]
pub struct CacheClearArgs {}

#[derive(Debug, Args)]
pub struct CachePruneArgs {}

fn parse_key(name: &str) -> Result<NormalizedKey> {
    let key = NormalizedKey::new(name);
    if key.is_empty() {
        return Err(invalid_input("name cannot be empty"));
    }
    Ok(key)
}

pub fn list_entries(ctx: &Context<'_>, args: CacheListArgs) -> Result<()> {
    let now = now_millis();
    let ttl = ctx.cache.ttl_millis();
    let mut items: Vec<CacheEntryDto> = ctx
        .cache
        .entries()
        .iter()
        .map(|(key, entry)| CacheEntryDto::new(key, entry, now, ttl))
        .filter(|item| !args.fresh || item.fresh)
        .collect();
    items.sort_by(|a, b| a.key.cmp(&b.key));

    if ctx.json {
        return print_json(&items);
    }

    if items.is_empty() {
        println!("cache empty");
        return Ok(());
    }
    for item in &items {
        println!(
            "{}\t{}\t{}{}",
            item.key,
            item.url.as_deref().unwrap_or("-"),
            format_age(now, item.timestamp),
            if item.fresh { "" } else { " (stale)" }
        );
    }
    Ok(())
}

pub fn get_entry(ctx: &Context<'_>, args: CacheKeyArgs) -> Result<()> {
    let key = parse_key(&args.name)?;
    let entry = ctx
        .cache
        .peek(&key)
        .ok_or_else(|| not_found(format!("no cache entry for {}", key)))?;
    let now = now_millis();
    let item = CacheEntryDto::new(&key, &entry, now, ctx.cache.ttl_millis());

    if ctx.json {
        return print_json(&item);
    }
    println!("key: {}", item.key);
    println!("url: {}", item.url.as_deref().unwrap_or("(no logo)"));
    println!(
        "written: {} ({} ago)",
        format_timestamp_millis(item.timestamp),
        format_age(now, item.timestamp)
    );
    println!("fresh: {}", item.fresh);
    Ok(())
}

pub fn set_entry(ctx: &Context<'_>, args: CacheSetArgs) -> Result<()> {
    let key = parse_key(&args.name)?;
    let url = if args.negative {
        None
    } else {
        match args.url.as_deref() {
            Some(raw) => Some(parse_logo_url(raw)?),
            None => return Err(invalid_input("provide a url or --negative")),
        }
    };
    ctx.cache.set_at(&key, url.as_deref(), now_millis());

    if ctx.json {
        print_json(&serde_json::json!({ "key": key, "url": url }))?;
    } else {
        println!("cached {}", key);
    }
    Ok(())
}

pub fn remove_entry(ctx: &Context<'_>, args: CacheKeyArgs) -> Result<()> {
    let key = parse_key(&args.name)?;
    if !ctx.cache.remove(&key) {
        return Err(not_found(format!("no cache entry for {}", key)));
    }

    if ctx.json {
        print_json(&serde_json::json!({ "key": key, "removed": true }))?;
    } else {
        println!("removed {}", key);
    }
    Ok(())
}

pub fn clear_entries(ctx: &Context<'_>, _args: CacheClearArgs) -> Result<()> {
    let removed = ctx.cache.clear();
    if ctx.json {
        print_json(&serde_json::json!({ "removed": removed }))?;
    } else {
        println!("removed {} entries", removed);
    }
    Ok(())
}

pub fn prune_entries(ctx: &Context<'_>, _args: CachePruneArgs) -> Result<()> {
    let removed = ctx.cache.prune_expired(now_millis());
    if ctx.json {
        print_json(&serde_json::json!({ "removed": removed }))?;
    } else {
        println!("pruned {} entries", removed);
    }
    Ok(())
}
