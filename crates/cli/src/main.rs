mod cli;

use clap::Parser;
use cli::Cli;
use config::Config;
use tracing::{debug, trace};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // NOTE: The verbosity flag takes precedence over the environment variable
    // for log control. `CRASH_ENRICH_LOG` can only set the log level per
    // crate, e.g. `CRASH_ENRICH_LOG=enricher=debug crash-enrich -q ...`.
    let env_filter = EnvFilter::builder()
        .with_env_var("CRASH_ENRICH_LOG")
        .from_env()?
        .add_directive(cli.verbosity.log_level_filter().as_str().parse()?);

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_level(true)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(layer)
        .with(env_filter)
        .init();

    // load config
    let config = match &cli.conffile {
        Some(path) => Config::load(path)?,
        _ => {
            let mut candidates = glob::glob("/etc/crash-enrich/config.d/*.toml")?
                .filter_map(Result::ok)
                .collect::<Vec<_>>();
            candidates.insert(0, "/etc/crash-enrich/config.toml".into());
            trace!(?candidates, "config file candidates");
            Config::load_multiple(candidates)?
        }
    };
    debug!(?config, ?cli);

    run(&cli, &config)
}

#[cfg(target_os = "linux")]
fn run(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    use anyhow::Context;
    use enricher::{EnrichOutcome, Enricher, ExceptionRecord, ProcfsSnapshot};
    use tracing::{info, warn};

    let mut snapshot = ProcfsSnapshot::capture(cli.pid)
        .with_context(|| format!("failed to capture process {}", cli.pid))?;
    if let (Some(address), Some(code)) = (cli.exception_address, cli.exception_code) {
        let mut record = ExceptionRecord::new(address, code);
        if let Some(flags) = cli.exception_flags {
            record = record.with_flags(flags);
        }
        snapshot.exception = Some(record);
    }

    match Enricher::for_host(config).enrich(&snapshot, &cli.attachments) {
        EnrichOutcome::Complete { merged } => info!(?merged, "enrichment complete"),
        EnrichOutcome::Partial {
            merged,
            omitted,
            failed,
        } => warn!(
            ?merged,
            omitted = omitted.len(),
            failed = failed.len(),
            "enrichment incomplete"
        ),
        EnrichOutcome::NoOp => debug!("nothing to enrich"),
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn run(cli: &Cli, _config: &Config) -> anyhow::Result<()> {
    anyhow::bail!(
        "capturing process {} is not supported on this platform",
        cli.pid
    )
}
