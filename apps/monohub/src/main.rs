use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    build_http_client, parse_base_url, render::render_document, ActionStatus, HeatmapSource,
    HttpGitHubClient, HttpImageLoader, LookupController, LookupView,
};
use shared::{domain::Profile, error::LookupError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, Settings};

/// Look up a GitHub profile and its most recently updated repositories.
#[derive(Parser, Debug)]
#[command(name = "monohub")]
struct Args {
    /// Username to look up. Without it, commands are read from stdin.
    username: Option<String>,
    /// Extra pages to load after the first one.
    #[arg(long, default_value_t = 0)]
    more: u32,
    /// Load pages until none are left.
    #[arg(long)]
    all: bool,
    /// File the rendered page is written to.
    #[arg(long, default_value = "monohub.html")]
    output: PathBuf,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    no_heatmap: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(api_url) = &args.api_url {
        settings.api_base_url = api_url.clone();
    }
    if args.no_heatmap {
        settings.heatmap_enabled = false;
    }

    let controller = build_controller(&settings)?;
    match args.username.as_deref() {
        Some(username) => run_once(&controller, username, &args).await,
        None => run_interactive(&controller, &args.output).await,
    }
}

fn build_controller(settings: &Settings) -> Result<Arc<LookupController>> {
    let http = build_http_client(&settings.client_options())?;
    let api_base = parse_base_url(&settings.api_base_url).context("invalid api_base_url")?;
    let api = HttpGitHubClient::with_http(http.clone(), api_base);

    let heatmap = if settings.heatmap_enabled {
        let base = parse_base_url(&settings.heatmap_base_url)
            .context("invalid heatmap_base_url")?;
        Some(HeatmapSource::new(
            base,
            Arc::new(HttpImageLoader::new(http)),
        ))
    } else {
        None
    };

    info!(
        api = %settings.api_base_url,
        heatmap = settings.heatmap_enabled,
        "monohub: ready"
    );
    Ok(LookupController::new(Arc::new(api), heatmap))
}

async fn run_once(controller: &Arc<LookupController>, username: &str, args: &Args) -> Result<()> {
    let mut failure: Option<LookupError> = controller.search(username).await.err();

    let mut remaining = if args.all { u32::MAX } else { args.more };
    while failure.is_none() && remaining > 0 {
        match controller.load_more().await {
            Ok(ActionStatus::Completed) => remaining -= 1,
            Ok(ActionStatus::Skipped | ActionStatus::Discarded) => break,
            Err(err) => failure = Some(err),
        }
    }

    controller.wait_for_heatmap().await;
    let view = controller.view().await;
    publish(&view, &args.output)?;
    print_status(&view, controller.current_profile().await.as_ref());

    match failure {
        Some(err) => Err(anyhow::Error::new(err)
            .context(format!("lookup of '{}' failed", username.trim()))),
        None => Ok(()),
    }
}

async fn run_interactive(controller: &Arc<LookupController>, output: &Path) -> Result<()> {
    println!("Enter a GitHub username, `more` for the next page, or `quit` to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let outcome = match line.trim() {
            "quit" | "exit" => break,
            "more" | "m" => controller.load_more().await,
            input => controller.search(input).await,
        };

        if let Ok(ActionStatus::Skipped) = outcome {
            println!("Nothing more to load.");
            continue;
        }
        if let Err(err) = &outcome {
            warn!(error = ?err, "monohub: action failed");
        }

        controller.wait_for_heatmap().await;
        let view = controller.view().await;
        publish(&view, output)?;
        print_status(&view, controller.current_profile().await.as_ref());
    }

    Ok(())
}

fn publish(view: &LookupView, output: &Path) -> Result<()> {
    fs::write(output, render_document(view))
        .with_context(|| format!("failed to write '{}'", output.display()))
}

fn print_status(view: &LookupView, profile: Option<&Profile>) {
    if let Some(error) = &view.error {
        println!("error: {error}");
    }
    if let Some(profile) = profile {
        println!(
            "{} (@{}): {} public repositories, {} followers, {} following",
            profile.display_name(),
            profile.login,
            profile.public_repos,
            profile.followers,
            profile.following
        );
        println!(
            "showing {} of {} repositories",
            view.repositories.entry_count(),
            profile.public_repos
        );
    }
    if let Some(url) = view.heatmap.visible_url() {
        println!("contributions: {url}");
    }
    if view.show_more {
        println!("more repositories available");
    }
}
