use anyhow::Result;
use logomark_config::AppConfig;
use logomark_core::{LogoCache, LogoService};
use serde::Serialize;
use std::io::{self, Write};

pub mod cache;
pub mod completions;
pub mod domain;
pub mod resolve;

pub struct Context<'a> {
    pub cache: &'a dyn LogoCache,
    pub service: &'a LogoService,
    pub json: bool,
    pub config: &'a AppConfig,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
