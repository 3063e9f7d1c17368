use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::{
    cli::{
        flags::{Cli, Command, FilterArg, OutputFormatArg, ProbeArgs},
        input::read_names,
    },
    config::{apply_platform_filter, load_config, AppConfig},
    core::{
        engine::Engine,
        output::{apply_filter, render_records, write_records, OutputFormat, ResultFilter},
    },
    server,
};

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Serve { listen, probe } => {
            let cfg = resolve_config(cli.config.as_deref(), &probe)?;
            let listen = listen.unwrap_or_else(|| cfg.listen_addr.clone());
            let engine = Engine::new(cfg)?;
            server::run(engine, &listen).await
        }
        Command::Check {
            names,
            file,
            format,
            output,
            filter,
            probe,
        } => {
            let cfg = resolve_config(cli.config.as_deref(), &probe)?;
            run_check(cfg, names, file.as_deref(), format, output, filter).await
        }
    }
}

/// Load the config file and layer command-line overrides on top.
pub fn resolve_config(path: Option<&str>, probe: &ProbeArgs) -> Result<AppConfig> {
    let cfg = load_config(path).context("failed to load config")?;
    let mut cfg = apply_platform_filter(cfg, probe.platforms.as_deref())?;
    if let Some(ms) = probe.timeout_ms {
        cfg.timeout_ms = ms;
    }
    if let Some(n) = probe.concurrency {
        cfg.max_concurrent_requests = n;
    }
    if let Some(ttl) = probe.cache_ttl {
        cfg.cache_ttl_seconds = ttl;
    }
    cfg.validate()?;
    Ok(cfg)
}

async fn run_check(
    cfg: AppConfig,
    mut names: Vec<String>,
    file: Option<&Path>,
    format: OutputFormatArg,
    output: Option<PathBuf>,
    filter: FilterArg,
) -> Result<()> {
    if let Some(path) = file {
        names.extend(read_names(path)?);
    }
    if names.is_empty() {
        bail!("no names provided; pass names or --file");
    }

    let platforms = cfg.enabled_platforms();
    let engine = Engine::new(cfg)?;
    let records = engine.probe_batch(&names, &platforms).await?;
    let records = apply_filter(records, ResultFilter::from(filter));
    let format = OutputFormat::from(format);

    match output {
        Some(path) => {
            write_records(&records, &platforms, format, &path)?;
            tracing::info!("{} results written to {}", records.len(), path.display());
        }
        None => print!("{}", render_records(&records, &platforms, format)?),
    }
    Ok(())
}
