//! recu-scraper - scrape recu.me video pages and optionally download the video
//!
//! Runs as a command-line tool by default; `--gui` opens the desktop window.

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use recu_scraper::downloader::{DownloadProgress, Downloader};
use recu_scraper::extractor::{Extractor, RecuMeExtractor, VideoRecord};
use recu_scraper::gui;
use recu_scraper::session::Session;
use recu_scraper::utils::persistence::{default_output_path, save_record};
use recu_scraper::utils::{AppSettings, ScrapeError};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "recu-scraper", version, about = "Recu.me Video Scraper")]
struct Args {
    /// URL of the video to scrape
    #[arg(required_unless_present = "gui")]
    url: Option<String>,

    /// Download the video after scraping
    #[arg(short, long)]
    download: bool,

    /// Output JSON file for scraped data (default: scraped_data_TIMESTAMP.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Account name to log in with before scraping
    #[arg(short, long)]
    username: Option<String>,

    /// Account password (prompted without echo when omitted)
    #[arg(short, long)]
    password: Option<String>,

    /// Log in before scraping, prompting for any missing credentials
    #[arg(long)]
    login: bool,

    /// Settings file (default: <config dir>/recu-scraper/settings.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Open the graphical interface instead
    #[arg(long)]
    gui: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let settings = AppSettings::load(args.config.as_deref())?;

    if args.gui {
        gui::app::run(settings)?;
        return Ok(());
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_cli(args, settings))
}

async fn run_cli(args: Args, settings: AppSettings) -> Result<()> {
    let url = args.url.clone().context("A URL is required")?;
    let session = Session::new(&settings)?;

    if let Some((username, password)) = resolve_credentials(&args)? {
        if !session.login(&username, &password).await? {
            return Err(ScrapeError::Login(format!("credentials rejected for {}", username)).into());
        }
        println!("Logged in as {}", username);
    }

    println!("Scraping URL: {}", url);
    let record = RecuMeExtractor::new().extract_info(&session, &url).await?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(Local::now()));
    if !save_record(&record, &output).await {
        bail!("Error saving scraped data");
    }
    println!("\nScraped data saved to: {}", output.display());

    print_summary(&record);

    if args.download {
        if !record.has_video_url() {
            bail!("No video URL found");
        }

        let downloader = Downloader::new(Arc::new(session), &settings)?;
        println!("\nStarting video download...");
        let file = downloader
            .download(&record, print_progress)
            .await
            .context("Download error")?;

        println!("\nDownload complete: {}", file.filename);
        println!("File saved to: {}", file.filepath.display());
        println!("File size: {:.2} MB", file.size as f64 / (1024.0 * 1024.0));
    }

    Ok(())
}

/// Credentials to log in with, prompting for whatever the flags left out
fn resolve_credentials(args: &Args) -> Result<Option<(String, String)>> {
    let wants_login = args.login || args.username.is_some() || args.password.is_some();
    if !wants_login {
        return Ok(None);
    }

    let username = match &args.username {
        Some(u) => u.clone(),
        None => prompt("Username")?,
    };
    let password = match &args.password {
        Some(p) => p.clone(),
        None => {
            print!("Password: ");
            io::stdout().flush()?;
            rpassword::read_password().context("Failed to read password")?
        }
    };

    if username.is_empty() {
        bail!("Username must not be empty");
    }
    Ok(Some((username, password)))
}

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn print_summary(record: &VideoRecord) {
    fn or_na<T: ToString>(value: &Option<T>) -> String {
        value
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "N/A".to_string())
    }

    println!("\nScraped Information:");
    println!("{}", "-".repeat(50));
    println!("Performer: {}", or_na(&record.performer));
    println!("Title: {}", or_na(&record.title));
    println!("Date: {}", or_na(&record.date));
    println!("Duration: {}", or_na(&record.duration));
    println!("Views: {}", or_na(&record.views));
    println!("Likes: {}", or_na(&record.likes_percentage));
    println!("Bookmarks: {}", or_na(&record.bookmarks));
    println!("{}", "-".repeat(50));
}

fn print_progress(progress: DownloadProgress) {
    print!("\r{}", progress);
    let _ = io::stdout().flush();
}
