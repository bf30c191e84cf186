//! Import pipeline: one attempt from raw text to an aggregated report.
//!
//! Stages run synchronously in order (normalize, validate, resolve category,
//! merge overrides, build submissions). The only suspension point is the
//! remote call, and a cancelled token short-circuits before it is issued.
//! The pipeline holds no per-attempt state, so one instance can serve
//! concurrent attempts.

use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::{ImportError, Result};
use crate::overrides::{extract_overrides, merge_overrides, MergeStats, OverrideEntry, OverrideField};
use crate::payload::normalize;
use crate::report::{aggregate, ImportReport};
use crate::schema::{Category, CategoryCatalog};
use crate::submit::{build_submissions, submit_batch, RuleSink, RuleSubmission, SubmitOptions};
use crate::validation::{
    check_categories, resolve_category, validate_batch, CategoryCheck, ValidationResult,
    ValidationWarning,
};

/// Everything the caller supplies for one import attempt.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub payload: String,
    /// Target business group.
    pub group_id: i64,
    /// Explicit category; required only when none can be inferred.
    pub category: Option<Category>,
    pub enabled: bool,
    pub overrides: Vec<OverrideEntry>,
    pub datasource_queries: Option<Value>,
}

impl ImportRequest {
    /// Request with defaults: disabled, no overrides, inferred category.
    pub fn new(payload: impl Into<String>, group_id: i64) -> Self {
        Self {
            payload: payload.into(),
            group_id,
            category: None,
            enabled: false,
            overrides: Vec::new(),
            datasource_queries: None,
        }
    }
}

/// What the caller needs to collect choices before importing.
#[derive(Debug, Clone, Serialize)]
pub struct ImportPreview {
    pub records: usize,
    pub categories: CategoryCheck,
    pub allow_submit: bool,
    pub fields: Vec<OverrideField>,
    pub validation: ValidationResult,
}

/// A batch that passed every local check and is ready to send.
#[derive(Debug, Clone)]
pub struct PreparedBatch {
    pub group_id: i64,
    pub category: Option<Category>,
    pub submissions: Vec<RuleSubmission>,
    pub merge: MergeStats,
    pub warnings: Vec<ValidationWarning>,
}

/// Runs import attempts against one rule sink.
pub struct ImportPipeline<S> {
    sink: S,
    catalog: CategoryCatalog,
}

impl<S: RuleSink> ImportPipeline<S> {
    pub fn new(sink: S, catalog: CategoryCatalog) -> Self {
        Self { sink, catalog }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Inspect a payload without merging or submitting anything.
    pub fn preview(&self, raw: &str) -> Result<ImportPreview> {
        let records = normalize(raw)?;
        let categories = check_categories(&records);
        Ok(ImportPreview {
            records: records.len(),
            allow_submit: categories.allows_submit(),
            categories,
            fields: extract_overrides(&records),
            validation: validate_batch(&records),
        })
    }

    /// Run every local stage. Nothing leaves the process.
    pub fn prepare(&self, request: &ImportRequest) -> Result<PreparedBatch> {
        if request.group_id <= 0 {
            return Err(ImportError::InvalidGroup(request.group_id));
        }

        let mut records = normalize(&request.payload)?;

        let validation = validate_batch(&records);
        if !validation.valid {
            warn!(errors = validation.errors.len(), "batch rejected by structural validation");
            return Err(ImportError::InvalidBatch {
                errors: validation.errors,
            });
        }

        let category = resolve_category(&records, request.category.as_ref(), &self.catalog)?;
        let merge = merge_overrides(&mut records, &request.overrides)?;

        let options = SubmitOptions {
            category: category.clone(),
            enabled: request.enabled,
            datasource_queries: request.datasource_queries.clone(),
        };
        let submissions = build_submissions(records, &options);

        info!(
            rules = submissions.len(),
            category = category.as_ref().map(Category::as_str).unwrap_or("host"),
            enabled = request.enabled,
            matched = merge.matched,
            "import batch prepared"
        );

        Ok(PreparedBatch {
            group_id: request.group_id,
            category,
            submissions,
            merge,
            warnings: validation.warnings,
        })
    }

    /// Send a prepared batch and aggregate the per-item result.
    ///
    /// Returns [`ImportError::Cancelled`] without any network call when the
    /// token is already cancelled. Once issued, the call is not interrupted.
    pub async fn submit(
        &self,
        prepared: &PreparedBatch,
        cancel: &CancellationToken,
    ) -> Result<ImportReport> {
        if cancel.is_cancelled() {
            info!("import cancelled before submission");
            return Err(ImportError::Cancelled);
        }
        let result = submit_batch(&self.sink, prepared.group_id, &prepared.submissions).await?;
        Ok(aggregate(&result))
    }

    /// Prepare and submit in one go.
    pub async fn run(
        &self,
        request: &ImportRequest,
        cancel: &CancellationToken,
    ) -> Result<ImportReport> {
        let prepared = self.prepare(request)?;
        self.submit(&prepared, cancel).await
    }
}

#[cfg(test)]
mod tests;
