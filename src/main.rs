// src/main.rs

use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use portfolio_notion::spotify::{
    sync_listening_history, SpotifyAuth, SpotifyClient, SpotifyConfig, TokenCache,
};
use portfolio_notion::{
    AppError, Command, CommandLineInput, ContentQueries, NotionHttpClient, NotionRepository,
    SiteConfig,
};
use serde::Serialize;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("portfolio_notion.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    // stderr, so JSON on stdout stays pipeable
    let console_appender = ConsoleAppender::builder()
        .target(log4rs::append::console::Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Shows the authorization URL and reads the redirect's `code` from stdin.
fn prompt_for_code(url: &str) -> Result<String, AppError> {
    println!("Open this URL to authorize Spotify access:\n\n{}\n", url);
    print!("Paste the 'code' parameter from the redirect URL: ");
    io::stdout().flush()?;

    let mut code = String::new();
    io::stdin().lock().read_line(&mut code)?;
    Ok(code.trim().to_string())
}

async fn sync_spotify(
    queries: &ContentQueries,
    token_cache: &Path,
    limit: u32,
) -> Result<(), AppError> {
    let source = queries.sources().listening.clone().ok_or_else(|| {
        AppError::MissingConfiguration(
            "NOTION_MUSIC_DATABASE_ID environment variable not set".to_string(),
        )
    })?;
    let spotify_config = SpotifyConfig::resolve()?;

    let http = reqwest::Client::new();
    let auth = SpotifyAuth::new(http.clone(), spotify_config, TokenCache::new(token_cache));
    let access_token = auth.access_token(prompt_for_code).await?;

    let plays = SpotifyClient::new(http)
        .recently_played(&access_token, limit)
        .await?;
    let report = sync_listening_history(queries.repository(), &source, &plays).await?;

    println!(
        "✓ Added {} of {} recent plays to {}",
        report.added, report.fetched, source
    );
    Ok(())
}

async fn run(command: Command, config: SiteConfig) -> Result<(), AppError> {
    let repo: Arc<dyn NotionRepository> = Arc::new(NotionHttpClient::new(&config.api_key)?);
    let queries = ContentQueries::new(repo, config.sources);

    match command {
        Command::Writing { cursor, page_size } => {
            print_json(&queries.try_writing_items(cursor, page_size).await?)
        }
        Command::Listening { cursor, limit } => {
            print_json(&queries.try_listening_history(cursor, limit).await?)
        }
        Command::Post { slug } => match queries.try_writing_post_by_slug(&slug).await? {
            Some(post) => print_json(&post),
            None => {
                eprintln!("No post with slug '{}'", slug);
                Ok(())
            }
        },
        Command::Page { id } => match queries.full_content(&id).await {
            Some(content) => print_json(&content),
            None => {
                eprintln!("Page {} not found or unreadable", id);
                Ok(())
            }
        },
        Command::Serve { addr } => portfolio_notion::serve(queries, &addr).await,
        Command::SyncSpotify { token_cache, limit } => {
            sync_spotify(&queries, &token_cache, limit).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = SiteConfig::resolve()?;

    run(cli.command, config).await?;

    Ok(())
}
