//! helm-census: Reports the Helm and ArgoCD charts installed in a cluster

use census_agent::{RunOptions, deliver_snapshot, install_crypto_provider, run};
use census_core::CensusConfig;
use census_kube::{ClientMode, DuplicatePolicy, KubeSource, create_k8s_client};
use clap::Parser;
use color_eyre::Result;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, prelude::*};

/// helm-census: Snapshot installed charts and send them to a collector
#[derive(Parser, Debug)]
#[command(name = "helm-census")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Print the snapshot to stdout instead of sending it
    #[arg(long)]
    dry_run: bool,

    /// Report only the newest deployed revision of each release
    #[arg(long)]
    dedup_revisions: bool,

    /// Use the local kubeconfig instead of the in-cluster service account
    #[arg(long)]
    kubeconfig: bool,

    /// Log file path (default: stderr)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize error handling
    color_eyre::install()?;

    init_logging(cli.debug, cli.log_file.as_ref())?;

    tracing::info!("Starting helm-census");

    install_crypto_provider();

    let config = CensusConfig::from_env();
    let client = create_k8s_client(client_mode(cli.kubeconfig)).await?;
    let source = KubeSource::new(client);

    let options = RunOptions {
        duplicate_policy: duplicate_policy(cli.dedup_revisions),
    };
    let snapshot = run(&source, &config, options).await?;
    let body = snapshot.to_pretty_json()?;

    if cli.dry_run {
        println!("{}", body);
    } else {
        deliver_snapshot(&config, &body).await;
    }

    tracing::info!(
        "Census complete: {} chart record(s)",
        snapshot.chart_records.len()
    );
    Ok(())
}

/// Log to stderr, or to a file when one is given
fn init_logging(debug: bool, log_file: Option<&PathBuf>) -> Result<()> {
    // Build filter: set base level, but quiet down noisy HTTP/TLS libraries
    let filter = if debug {
        EnvFilter::from_default_env()
            .add_directive(Level::DEBUG.into())
            .add_directive("hyper=info".parse()?)
            .add_directive("hyper_util=info".parse()?)
            .add_directive("tower=info".parse()?)
            .add_directive("rustls=info".parse()?)
            .add_directive("kube_client=info".parse()?)
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    let (writer, ansi) = match log_file {
        Some(path) => (BoxMakeWriter::new(Arc::new(File::create(path)?)), false),
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi)
                .with_target(false),
        )
        .with(filter)
        .init();

    Ok(())
}

fn client_mode(kubeconfig: bool) -> ClientMode {
    if kubeconfig {
        ClientMode::Kubeconfig
    } else {
        ClientMode::InCluster
    }
}

fn duplicate_policy(dedup_revisions: bool) -> DuplicatePolicy {
    if dedup_revisions {
        DuplicatePolicy::LatestRevision
    } else {
        DuplicatePolicy::KeepAll
    }
}
