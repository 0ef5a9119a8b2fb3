// src/main.rs

use anyhow::Context;
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
use notion2astro::config::load_env_file;
use notion2astro::export::ensure_directory;
use notion2astro::{BatchExporter, CommandLineInput, ImageStore, NotionHttpClient, PipelineConfig};
use std::fs;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("notion2astro.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Exports every configured target, blog before diary.
async fn run(config: &PipelineConfig) -> anyhow::Result<()> {
    ensure_directory(&config.images.directory).with_context(|| {
        format!(
            "failed to create images directory {}",
            config.images.directory.display()
        )
    })?;

    let client = NotionHttpClient::new(&config.api_key)?;
    let images = ImageStore::new(&config.images)?;
    let exporter = BatchExporter::new(client, images);

    let mut failed_targets = Vec::new();
    for target in &config.targets {
        log::info!("Exporting {} entries to {}", target.category, target.output_dir.display());
        match exporter.export_target(target).await {
            Ok(report) => log::info!(
                "{}: {} written, {} skipped, {} failed",
                report.database_title,
                report.written.len(),
                report.skipped.len(),
                report.failed.len()
            ),
            Err(e) => {
                log::error!("{} export aborted: {}", target.category, e);
                failed_targets.push(target.category.to_string());
            }
        }
    }

    if !failed_targets.is_empty() {
        anyhow::bail!("export failed for: {}", failed_targets.join(", "));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    match load_env_file(None) {
        Some(_) => log::info!("Loaded environment variables from .env file"),
        None => log::info!("No .env file found, using system environment variables"),
    }

    let config = PipelineConfig::resolve(cli)?;

    run(&config).await?;

    Ok(())
}
