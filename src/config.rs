// src/config.rs
use crate::error::AppError;
use crate::model::Category;
use crate::types::{ApiKey, NotionId};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

pub const ENV_API_TOKEN: &str = "NOTION_API_TOKEN";
pub const ENV_BLOG_DATABASE_ID: &str = "NOTION_BLOG_DATABASE_ID";
pub const ENV_DIARY_DATABASE_ID: &str = "NOTION_DIARY_DATABASE_ID";
pub const ENV_BLOG_OUTPUT_DIR: &str = "BLOG_OUTPUT_DIR";
pub const ENV_DIARY_OUTPUT_DIR: &str = "DIARY_OUTPUT_DIR";
pub const ENV_IMAGES_DIR: &str = "IMAGES_DIR";
pub const ENV_IMAGES_URL_PREFIX: &str = "IMAGES_URL_PREFIX";

const DEFAULT_BLOG_OUTPUT_DIR: &str = "./content/blog";
const DEFAULT_DIARY_OUTPUT_DIR: &str = "./content/diary";
const DEFAULT_IMAGES_DIR: &str = "./public/images";
const DEFAULT_IMAGES_URL_PREFIX: &str = "/images";

/// Which databases a run exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportKind {
    Blog,
    Diary,
    All,
}

impl ExportKind {
    fn includes(self, category: Category) -> bool {
        match self {
            ExportKind::All => true,
            ExportKind::Blog => category == Category::Blog,
            ExportKind::Diary => category == Category::Diary,
        }
    }
}

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Which database to export
    #[arg(short = 't', long = "type", value_enum, default_value_t = ExportKind::All)]
    pub export_kind: ExportKind,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// One database to export and where its files go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    pub category: Category,
    pub database_id: NotionId,
    pub output_dir: PathBuf,
}

/// Where downloaded images are stored and how pages link to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSettings {
    pub directory: PathBuf,
    pub url_prefix: String,
}

/// Loads variables from `path`, or from a `.env` in the working directory or
/// its parents when `path` is `None`. Variables already set in the process
/// environment are kept. Returns the file that was loaded.
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => dotenvy::from_path(path).ok().map(|_| path.to_path_buf()),
        None => dotenvy::dotenv().ok(),
    }
}

/// Resolved configuration, validated before any network traffic.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub api_key: ApiKey,
    /// Export targets in processing order (blog before diary).
    pub targets: Vec<ExportTarget>,
    pub images: ImageSettings,
    pub verbose: bool,
}

impl PipelineConfig {
    /// Resolves a complete configuration from CLI input and the process environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with(cli, |name| std::env::var(name).ok())
    }

    /// Resolves against an arbitrary variable lookup.
    pub fn resolve_with<F>(cli: CommandLineInput, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key_str = var(ENV_API_TOKEN).ok_or_else(|| {
            AppError::MissingConfiguration(format!("{} environment variable not set", ENV_API_TOKEN))
        })?;
        let api_key = ApiKey::new(api_key_str)?;

        let mut targets = Vec::new();
        for (category, id_var, dir_var, default_dir) in [
            (
                Category::Blog,
                ENV_BLOG_DATABASE_ID,
                ENV_BLOG_OUTPUT_DIR,
                DEFAULT_BLOG_OUTPUT_DIR,
            ),
            (
                Category::Diary,
                ENV_DIARY_DATABASE_ID,
                ENV_DIARY_OUTPUT_DIR,
                DEFAULT_DIARY_OUTPUT_DIR,
            ),
        ] {
            if !cli.export_kind.includes(category) {
                continue;
            }

            let raw_id = var(id_var).ok_or_else(|| {
                AppError::MissingConfiguration(format!(
                    "{} environment variable not set (required for {} export)",
                    id_var, category
                ))
            })?;

            targets.push(ExportTarget {
                category,
                database_id: NotionId::parse(&raw_id)?,
                output_dir: PathBuf::from(var(dir_var).unwrap_or_else(|| default_dir.to_string())),
            });
        }

        let images = ImageSettings {
            directory: PathBuf::from(
                var(ENV_IMAGES_DIR).unwrap_or_else(|| DEFAULT_IMAGES_DIR.to_string()),
            ),
            url_prefix: var(ENV_IMAGES_URL_PREFIX)
                .unwrap_or_else(|| DEFAULT_IMAGES_URL_PREFIX.to_string())
                .trim_end_matches('/')
                .to_string(),
        };

        Ok(PipelineConfig {
            api_key,
            targets,
            images,
            verbose: cli.verbose,
        })
    }
}
