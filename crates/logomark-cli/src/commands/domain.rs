use crate::commands::{print_json, Context};
use crate::util::{kind_label, organization_kind};
use anyhow::Result;
use clap::Args;
use logomark_core::{Domain, PlanItemDto};
use serde::Serialize;

#[derive(Debug, Args)]
pub struct DomainArgs {
    pub name: String,
    /// Treat the name as a school or university
    #[arg(long)]
    pub institution: bool,
}

#[derive(Debug, Args)]
pub struct UrlsArgs {
    pub name: String,
    #[arg(long)]
    pub institution: bool,
}

#[derive(Debug, Serialize)]
struct DomainReportDto<'a> {
    name: &'a str,
    kind: &'static str,
    domains: &'a [Domain],
}

pub fn show_domains(ctx: &Context<'_>, args: DomainArgs) -> Result<()> {
    let kind = organization_kind(args.institution);
    let domains = ctx.service.domains(kind, &args.name);

    if ctx.json {
        return print_json(&DomainReportDto {
            name: &args.name,
            kind: kind_label(kind),
            domains: &domains,
        });
    }

    if domains.is_empty() {
        println!("no domain");
        return Ok(());
    }
    for domain in &domains {
        println!("{}", domain);
    }
    Ok(())
}

pub fn show_urls(ctx: &Context<'_>, args: UrlsArgs) -> Result<()> {
    let kind = organization_kind(args.institution);
    let items: Vec<PlanItemDto> = ctx
        .service
        .plan(kind, &args.name)
        .into_iter()
        .map(|(domain, tier, url)| PlanItemDto::new(&domain, tier, url))
        .collect();

    if ctx.json {
        return print_json(&items);
    }

    if items.is_empty() {
        println!("no candidates");
        return Ok(());
    }
    for item in &items {
        println!("{}\t{}\t{}", item.domain, item.tier, item.url);
    }
    Ok(())
}
