mod app;
mod cli;
mod config;
mod constants;
mod core;
mod facts;
mod fetch;
mod gallery;
mod media;
mod modal;
mod surface;
mod tui;
mod utils;

use anyhow::bail;
use app::App;
use clap::Parser;
use config::AppConfig;
use fetch::HttpFetcher;
use gallery::{CardInput, Gallery};
use media::classify_and_normalize;
use surface::{GalleryPane, Surface};
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    let mut cfg = AppConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.data_url {
        cfg.data_url = url;
    }

    match cli.cmd.unwrap_or(cli::Command::Browse) {
        cli::Command::Browse => {
            let banner = cfg.show_fact.then(|| facts::banner_fact().to_string());
            let app = App::new(Gallery::new(cfg.data_url.clone(), cfg.trigger_label), banner);
            let fetcher = HttpFetcher::new(cfg.request_timeout)?;
            tui::run_tui(app, fetcher).await?;
        }
        cli::Command::List => {
            let app = fetch_once(&cfg).await?;
            print_gallery(&app.surface);
        }
        cli::Command::Show { index, json } => {
            let mut app = fetch_once(&cfg).await?;
            if index == 0 || index > app.surface.card_count() {
                print_gallery(&app.surface);
                bail!("no card #{index}; {} available", app.surface.card_count());
            }
            if json {
                if let Some(record) = app.gallery.record(index - 1) {
                    println!("{}", serde_json::to_string_pretty(record)?);
                }
                return Ok(());
            }
            app.activate_card(index - 1, CardInput::Pointer);
            print_overlay(&app.surface);
        }
        cli::Command::Classify { url } => {
            let normalized = classify_and_normalize(&url);
            println!("{}\t{}", normalized.kind.as_str(), normalized.url);
        }
    }
    Ok(())
}

async fn fetch_once(cfg: &AppConfig) -> anyhow::Result<App> {
    let fetcher = HttpFetcher::new(cfg.request_timeout)?;
    let mut app = App::new(
        Gallery::new(cfg.data_url.clone(), cfg.trigger_label.clone()),
        None,
    );
    app.refresh(&fetcher).await;
    debug!(
        state = app.gallery.state().name(),
        cards = app.gallery.cards().len(),
        "gallery settled"
    );
    Ok(app)
}

fn print_gallery(surface: &Surface) {
    match &surface.gallery {
        GalleryPane::Blank => {}
        GalleryPane::Placeholder(placeholder) => println!("{}", placeholder.message()),
        GalleryPane::Cards(cards) => {
            for card in cards {
                let badge = if card.thumbnail.is_video { " [Video]" } else { "" };
                println!("{:>3}. {}{badge}", card.index + 1, card.title);
                println!("     {}", card.date);
                for line in tui::media_lines(&card.thumbnail.media) {
                    println!("     {line}");
                }
            }
        }
    }
}

fn print_overlay(surface: &Surface) {
    let overlay = &surface.overlay;
    println!("{}", overlay.title);
    println!("{}", overlay.date);
    if let Some(media) = &overlay.media {
        println!();
        for line in tui::modal_media_lines(media) {
            println!("{line}");
        }
    }
    println!();
    println!("{}", overlay.text);
}
