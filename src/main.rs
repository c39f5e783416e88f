use anyhow::Context;
use clap::Parser;
use hlsdl::{
    config::ClientConfig,
    download::{select_variant, Downloader},
    fetch::HttpClient,
    hls::MasterPlaylist,
    Error,
};
use std::process::ExitCode;
use tokio::io::AsyncWriteExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod progress;

use cli::CliArgs;
use progress::MergerProgress;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let default_filter = if args.verbose { "hlsdl=debug" } else { "hlsdl=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<Error>() {
                Some(e) => tracing::error!(code = e.error_code(), "{:#}", err),
                None => tracing::error!("{:#}", err),
            }
            let parse_failure = err
                .downcast_ref::<Error>()
                .is_some_and(Error::is_parse_error);
            ExitCode::from(if parse_failure { 2 } else { 1 })
        }
    }
}

async fn run(args: CliArgs) -> anyhow::Result<()> {
    let config = args.client_config(ClientConfig::from_env()?);
    let downloader = Downloader::new(HttpClient::new(&config)?);

    if args.info {
        let master = downloader.master(&args.url).await?;
        print_info(&master, args.json)?;
        return Ok(());
    }

    let Some(path) = args.output.as_deref() else {
        anyhow::bail!("an output file is required");
    };

    let merger = downloader
        .open(&args.url, &args.quality, args.start, args.end)
        .await?;

    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .with_context(|| format!("Cannot create {}", path.display()))?;

    tracing::info!("Downloading: {} ({}) -> {}", args.url, args.quality, path.display());

    let mut reader = MergerProgress::new(merger);
    let copied = match tokio::io::copy(&mut reader, &mut file).await {
        Ok(copied) => copied,
        Err(e) => {
            reader.abandon();
            return Err(match Error::from_io(&e) {
                Some(err) => anyhow::Error::new(err.clone()),
                None => e.into(),
            });
        }
    };
    file.flush().await?;
    reader.finish();

    tracing::info!("Done: {} bytes written to {}", copied, path.display());
    Ok(())
}

fn print_info(master: &MasterPlaylist, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&master.variants)?);
        return Ok(());
    }

    let best = select_variant(master, hlsdl::download::BEST_QUALITY).ok();
    for variant in &master.variants {
        let resolution = variant
            .resolution
            .map(|r| format!("{}x{}", r.width, r.height))
            .unwrap_or_else(|| "-".to_string());
        for alternative in &variant.alternatives {
            let marker = if best.is_some_and(|b| std::ptr::eq(b, variant)) {
                " (best)"
            } else {
                ""
            };
            println!(
                "{:<12} {:>10} {:>12} bps  {}{}",
                alternative.name,
                resolution,
                variant.bandwidth,
                variant.codecs.join(","),
                marker
            );
        }
    }
    Ok(())
}
