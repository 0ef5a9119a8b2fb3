// src/export.rs
//! Runs one export target end to end: query, convert, write.

use crate::api::{NotionRepository, PublicationFilter};
use crate::config::ExportTarget;
use crate::error::{classify_database_fetch_failure, AppError};
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::formatting::{assemble, ConversionReporter, LogReporter};
use crate::images::{localize_images, ImageLocalizer};
use crate::model::{Category, Entry, EntryContent, PageRecord};
use crate::output::{deliver, entry_filename, DeliveryTarget, OutputPlan};
use std::path::{Path, PathBuf};

/// Creates `path` and its parents.
pub fn ensure_directory(path: &Path) -> Result<(), AppError> {
    let report = deliver(OutputPlan::new().with_operation(DeliveryTarget::CreateDirectory {
        path: path.to_path_buf(),
    }));
    if report.is_success() {
        Ok(())
    } else {
        Err(AppError::DeliveryFailed {
            failures: report.failure_messages(),
        })
    }
}

/// Outcome of exporting one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub category: Category,
    pub database_title: String,
    /// Files written, in processing order.
    pub written: Vec<PathBuf>,
    /// Rows that were not converted, with the reason.
    pub skipped: Vec<String>,
    /// Rows that converted but could not be written.
    pub failed: Vec<String>,
}

impl ExportReport {
    fn new(category: Category, database_title: String) -> Self {
        Self {
            category,
            database_title,
            written: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        }
    }
}

enum EntryOutcome {
    Written(PathBuf),
    Skipped(String),
    Failed(String),
}

/// Converts the rows of export databases into Markdown files.
pub struct BatchExporter<R, L> {
    repository: R,
    images: L,
    filter: PublicationFilter,
    retry: RetryPolicy,
    reporter: Box<dyn ConversionReporter>,
}

impl<R, L> BatchExporter<R, L>
where
    R: NotionRepository,
    L: ImageLocalizer,
{
    pub fn new(repository: R, images: L) -> Self {
        Self {
            repository,
            images,
            filter: PublicationFilter::default(),
            retry: RetryPolicy::default(),
            reporter: Box::new(LogReporter),
        }
    }

    pub fn with_filter(mut self, filter: PublicationFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_reporter(mut self, reporter: Box<dyn ConversionReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Exports every eligible row of the target's database.
    ///
    /// Fails only when the output directory cannot be created or the database
    /// cannot be read; per-row problems are reported and counted.
    pub async fn export_target(&self, target: &ExportTarget) -> Result<ExportReport, AppError> {
        ensure_directory(&target.output_dir)?;

        let database_title = self
            .repository
            .retrieve_database_title(&target.database_id)
            .await
            .map_err(|e| self.database_failure(target, e))?;
        log::info!("Found database: {}", database_title);

        let records = self
            .repository
            .query_entries(&target.database_id, &self.filter)
            .await
            .map_err(|e| self.database_failure(target, e))?;
        log::info!("Found {} articles", records.len());

        let mut report = ExportReport::new(target.category, database_title);
        for record in &records {
            match self.export_record(record, target).await {
                EntryOutcome::Written(path) => report.written.push(path),
                EntryOutcome::Skipped(reason) => report.skipped.push(reason),
                EntryOutcome::Failed(reason) => report.failed.push(reason),
            }
        }

        log::debug!(
            "{} export finished: {} written, {} skipped, {} failed",
            target.category,
            report.written.len(),
            report.skipped.len(),
            report.failed.len()
        );
        Ok(report)
    }

    fn database_failure(&self, target: &ExportTarget, error: AppError) -> AppError {
        log::error!(
            "Cannot read {} database {}: {}",
            target.category,
            target.database_id,
            classify_database_fetch_failure(&error)
        );
        error
    }

    async fn fetch_content(&self, record: &PageRecord) -> EntryContent {
        let result = retry_with_backoff(
            || self.repository.retrieve_children(&record.id),
            self.retry,
        )
        .await;

        match result {
            Ok(blocks) => EntryContent::Blocks(blocks),
            Err(e) => {
                self.reporter.warn(&format!(
                    "Failed to fetch content for page {}: {}",
                    record.id.to_hyphenated(),
                    e
                ));
                EntryContent::Unavailable
            }
        }
    }

    fn skip(&self, record: &PageRecord, error: AppError) -> EntryOutcome {
        let reason = format!("Skipping page {}: {}", record.id.to_hyphenated(), error);
        self.reporter.warn(&reason);
        EntryOutcome::Skipped(reason)
    }

    async fn export_record(&self, record: &PageRecord, target: &ExportTarget) -> EntryOutcome {
        // Untitled rows are dropped before any content request.
        if let Err(e) = record.title() {
            return self.skip(record, e);
        }

        let content = self.fetch_content(record).await;
        let entry = match Entry::from_record(record, target.category, content) {
            Ok(entry) => entry,
            Err(e) => return self.skip(record, e),
        };

        let images = localize_images(&self.images, entry.content.blocks(), &entry.page_id).await;
        for (url, error) in images.failures() {
            self.reporter
                .warn(&format!("Failed to download image {}: {}", url, error));
        }

        let document = match assemble(&entry, &images, self.reporter.as_ref()) {
            Ok(document) => document,
            Err(e) => {
                let reason = format!("Failed to build frontmatter for {}: {}", entry.title, e);
                self.reporter.warn(&reason);
                return EntryOutcome::Skipped(reason);
            }
        };

        let filename = entry_filename(&entry.title, entry.category, entry.created_at.date_naive());
        let path = target.output_dir.join(filename);
        let report = deliver(OutputPlan::new().with_operation(DeliveryTarget::WriteFile {
            path: path.clone(),
            content: document.file_content(),
        }));

        if !report.is_success() {
            let reason = format!(
                "Failed to write {}: {}",
                path.display(),
                report.failure_messages().join("; ")
            );
            self.reporter.warn(&reason);
            return EntryOutcome::Failed(reason);
        }

        self.reporter.notice(&format!(
            "Successfully converted article: {}",
            path.display()
        ));
        EntryOutcome::Written(path)
    }
}
