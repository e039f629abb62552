use anyhow::Context;
use chrono::{Datelike, Local};
use cip_listings::config::{MAX_DAYS_LIMIT, Settings};
use cip_listings::crawl::{HttpPageSource, crawl_all};
use cip_listings::html::render_page;
use cip_listings::listing::ListingExtractor;
use cip_listings::model::write_artifact;
use cip_listings::render::RenderData;
use cip_listings::upload::{HttpUploader, Uploader};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "cip-listings", about = "Crawl CIP cinema listings and publish them as HTML")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Crawl every listing page and write the JSON artifact.
    Crawl {
        #[arg(long, default_value = "movies.json")]
        out: PathBuf,
    },
    /// Render an artifact to HTML.
    Render {
        #[arg(long, default_value = "movies.json")]
        artifact: PathBuf,
        #[arg(long, default_value = "index.html")]
        out: PathBuf,
        /// Days after today to keep (overrides MAX_DAYS).
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_DAYS_LIMIT)))]
        max_days: Option<u32>,
    },
    /// Crawl, render and upload (when UPLOAD_URL is set).
    Run {
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_DAYS_LIMIT)))]
        max_days: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let settings = Settings::from_env().context("reading settings")?;

    match args.command {
        Command::Crawl { out } => crawl(&settings, &out).await,
        Command::Render {
            artifact,
            out,
            max_days,
        } => render(&artifact, &out, max_days.unwrap_or(settings.max_days)),
        Command::Run { out_dir, max_days } => {
            std::fs::create_dir_all(&out_dir)
                .with_context(|| format!("creating {}", out_dir.display()))?;
            let artifact = out_dir.join("movies.json");
            let page = out_dir.join("index.html");

            crawl(&settings, &artifact).await?;
            render(&artifact, &page, max_days.unwrap_or(settings.max_days))?;

            match &settings.upload_url {
                Some(endpoint) => {
                    let uploader = HttpUploader::new(endpoint.clone())?;
                    uploader
                        .upload(&page, &settings.upload_object_name)
                        .await
                        .context("uploading page")?;
                }
                None => tracing::info!("UPLOAD_URL not set; skipping upload"),
            }
            Ok(())
        }
    }
}

async fn crawl(settings: &Settings, out: &Path) -> anyhow::Result<()> {
    let year = Local::now().year();
    let extractor = ListingExtractor::new(settings.base_url.clone(), year)?;
    let source = HttpPageSource::new()?;

    let records = crawl_all(&source, &extractor, &settings.start_urls)
        .await
        .context("crawling listings")?;
    write_artifact(out, &records).with_context(|| format!("writing {}", out.display()))?;
    tracing::info!(path = %out.display(), records = records.len(), "artifact written");
    Ok(())
}

fn render(artifact: &Path, out: &Path, max_days: u32) -> anyhow::Result<()> {
    let data = RenderData::assemble_today(artifact, max_days)
        .with_context(|| format!("assembling {}", artifact.display()))?;
    let html = render_page(&data.context());
    std::fs::write(out, html).with_context(|| format!("writing {}", out.display()))?;
    tracing::info!(path = %out.display(), movies = data.movies.len(), "page rendered");
    Ok(())
}
