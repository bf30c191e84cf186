//! Pipeline tests against a recording in-memory sink.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::*;
use crate::overrides::MergeKey;
use crate::report::{BatchResult, ImportStatus};
use crate::submit::SinkError;

/// Sink that records every batch it receives and answers from a script.
struct RecordingSink {
    calls: AtomicUsize,
    batches: Mutex<Vec<(i64, Vec<RuleSubmission>)>>,
    answer: fn(&[RuleSubmission]) -> std::result::Result<BatchResult, SinkError>,
}

impl RecordingSink {
    fn answering(answer: fn(&[RuleSubmission]) -> std::result::Result<BatchResult, SinkError>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            batches: Mutex::new(Vec::new()),
            answer,
        }
    }

    fn all_ok() -> Self {
        Self::answering(|rules| Ok((0..rules.len()).map(|i| (i.to_string(), "")).collect()))
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_batch(&self) -> (i64, Vec<RuleSubmission>) {
        self.batches.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait::async_trait]
impl RuleSink for RecordingSink {
    async fn create_batch(
        &self,
        group_id: i64,
        rules: &[RuleSubmission],
    ) -> std::result::Result<BatchResult, SinkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().unwrap().push((group_id, rules.to_vec()));
        (self.answer)(rules)
    }

    fn sink_name(&self) -> &str {
        "recording"
    }
}

const PROM_BATCH: &str = r#"[
  {"id": 1, "group_id": 9, "name": "cpu high", "cate": "prometheus", "disabled": 0,
   "rule_config": {"queries": [
     {"prom_ql": "cpu > $host", "var_enabled": true,
      "var_config": {"param_val": [{"id": 1, "name": "host", "query": ["old"]}]}}
   ]}},
  {"id": 2, "name": "agent down", "cate": "host", "rule_config": {"queries": []}}
]"#;

const MIXED_BATCH: &str = r#"[
  {"name": "a", "cate": "prometheus", "rule_config": {"queries": []}},
  {"name": "b", "cate": "elasticsearch", "rule_config": {"queries": []}}
]"#;

fn pipeline(sink: RecordingSink) -> ImportPipeline<RecordingSink> {
    ImportPipeline::new(sink, CategoryCatalog::default())
}

#[tokio::test]
async fn imports_batch_in_one_call() {
    let pipeline = pipeline(RecordingSink::all_ok());
    let mut request = ImportRequest::new(PROM_BATCH, 4);
    request.enabled = true;
    request.overrides = vec![OverrideEntry::new(
        MergeKey::from_ids([1]),
        vec!["web-1".into(), "web-2".into()],
    )];

    let report = pipeline.run(&request, &CancellationToken::new()).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.succeeded, 2);
    assert_eq!(pipeline.sink().calls(), 1);

    let (group_id, rules) = pipeline.sink().last_batch();
    assert_eq!(group_id, 4);
    assert_eq!(rules.len(), 2);
    let first = serde_json::to_value(&rules[0]).unwrap();
    assert_eq!(first["cate"], json!("prometheus"));
    assert_eq!(first["disabled"], json!(0));
    assert!(first.get("id").is_none());
    assert!(first.get("group_id").is_none());
    assert_eq!(
        first["rule_config"]["queries"][0]["var_config"]["param_val"][0]["query"],
        json!(["web-1", "web-2"])
    );
    assert_eq!(rules[1].cate, Some(Category::host()));
}

#[tokio::test]
async fn mixed_categories_never_reach_the_sink() {
    let pipeline = pipeline(RecordingSink::all_ok());
    let request = ImportRequest::new(MIXED_BATCH, 1);

    let err = pipeline.run(&request, &CancellationToken::new()).await.unwrap_err();

    assert!(matches!(err, ImportError::CategoryConflict { .. }));
    assert_eq!(pipeline.sink().calls(), 0);
}

#[tokio::test]
async fn cancelled_token_stops_before_the_call() {
    let pipeline = pipeline(RecordingSink::all_ok());
    let request = ImportRequest::new(PROM_BATCH, 1);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = pipeline.run(&request, &cancel).await.unwrap_err();

    assert!(matches!(err, ImportError::Cancelled));
    assert_eq!(pipeline.sink().calls(), 0);
}

#[tokio::test]
async fn item_failures_become_partial_report() {
    let pipeline = pipeline(RecordingSink::answering(|_| {
        Ok([("0", ""), ("1", "duplicate name")].into_iter().collect())
    }));
    let request = ImportRequest::new(PROM_BATCH, 1);

    let report = pipeline.run(&request, &CancellationToken::new()).await.unwrap();

    assert_eq!(report.status, ImportStatus::PartialOrTotalFailure);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failures[0].key, "1");
    assert_eq!(report.failures[0].message, "duplicate name");
}

#[tokio::test]
async fn sink_failure_is_propagated() {
    let pipeline = pipeline(RecordingSink::answering(|_| {
        Err(SinkError::Remote("forbidden".into()))
    }));
    let request = ImportRequest::new(PROM_BATCH, 1);

    let err = pipeline.run(&request, &CancellationToken::new()).await.unwrap_err();

    assert!(matches!(err, ImportError::Sink(SinkError::Remote(_))));
    assert_eq!(pipeline.sink().calls(), 1);
}

#[tokio::test]
async fn default_request_submits_disabled_rules() {
    let pipeline = pipeline(RecordingSink::all_ok());
    let request = ImportRequest::new(PROM_BATCH, 1);

    pipeline.run(&request, &CancellationToken::new()).await.unwrap();

    let (_, rules) = pipeline.sink().last_batch();
    assert!(rules.iter().all(|r| r.disabled == 1));
}

#[test]
fn invalid_group_is_rejected() {
    let pipeline = pipeline(RecordingSink::all_ok());
    let err = pipeline.prepare(&ImportRequest::new(PROM_BATCH, 0)).unwrap_err();
    assert!(matches!(err, ImportError::InvalidGroup(0)));
}

#[test]
fn malformed_payload_is_rejected() {
    let pipeline = pipeline(RecordingSink::all_ok());
    let err = pipeline.prepare(&ImportRequest::new("{not json", 1)).unwrap_err();
    assert!(matches!(err, ImportError::MalformedPayload(_)));
}

#[test]
fn structural_errors_block_the_batch() {
    let pipeline = pipeline(RecordingSink::all_ok());
    let payload = r#"{"name": "dup", "cate": "prometheus", "rule_config": {"queries": [
      {"var_enabled": true, "var_config": {"param_val": [{"id": 1, "name": "a"}, {"id": 1, "name": "b"}]}}
    ]}}"#;

    let err = pipeline.prepare(&ImportRequest::new(payload, 1)).unwrap_err();

    match err {
        ImportError::InvalidBatch { errors } => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].path.ends_with("param_val[1].id"));
        }
        other => panic!("expected InvalidBatch, got {other:?}"),
    }
}

#[test]
fn unresolved_category_needs_a_choice() {
    let pipeline = pipeline(RecordingSink::all_ok());
    let payload = r#"[{"name": "no cate", "rule_config": {"queries": []}}]"#;

    let err = pipeline.prepare(&ImportRequest::new(payload, 1)).unwrap_err();
    assert!(matches!(err, ImportError::CategoryUnresolved));

    let mut request = ImportRequest::new(payload, 1);
    request.category = Some(Category::new("loki"));
    let prepared = pipeline.prepare(&request).unwrap();
    assert_eq!(prepared.category, Some(Category::new("loki")));
    assert_eq!(prepared.submissions[0].cate, Some(Category::new("loki")));
}

#[test]
fn catalog_rejects_unsupported_category() {
    let pipeline = ImportPipeline::new(
        RecordingSink::all_ok(),
        CategoryCatalog::from_alert_categories(["prometheus", "loki"]),
    );
    let payload = r#"[{"name": "x", "cate": "promethus", "rule_config": {"queries": []}}]"#;

    let err = pipeline.prepare(&ImportRequest::new(payload, 1)).unwrap_err();

    match err {
        ImportError::UnsupportedCategory { suggestion, .. } => {
            assert_eq!(suggestion.as_deref(), Some("prometheus"));
        }
        other => panic!("expected UnsupportedCategory, got {other:?}"),
    }
}

#[test]
fn prepare_reports_merge_stats_and_warnings() {
    let pipeline = pipeline(RecordingSink::all_ok());
    let mut request = ImportRequest::new(PROM_BATCH, 1);
    request.overrides = vec![
        OverrideEntry::new(MergeKey::from_ids([1]), vec!["a".into()]),
        OverrideEntry::new(MergeKey::from_ids([77]), vec!["b".into()]),
    ];

    let prepared = pipeline.prepare(&request).unwrap();

    assert_eq!(prepared.merge.matched, 1);
    assert_eq!(prepared.merge.unused, 1);
    assert_eq!(prepared.group_id, 1);
    assert_eq!(prepared.category, Some(Category::new("prometheus")));
}

#[test]
fn preview_lists_fields_and_category() {
    let pipeline = pipeline(RecordingSink::all_ok());

    let preview = pipeline.preview(PROM_BATCH).unwrap();

    assert_eq!(preview.records, 2);
    assert!(preview.allow_submit);
    assert_eq!(preview.categories, CategoryCheck::Inferred(Category::new("prometheus")));
    assert_eq!(preview.fields.len(), 1);
    assert_eq!(preview.fields[0].names, "host");
    assert_eq!(preview.fields[0].initial, "old");
    assert!(preview.validation.valid);
    assert_eq!(pipeline.sink().calls(), 0);
}

#[test]
fn preview_flags_mixed_batches() {
    let pipeline = pipeline(RecordingSink::all_ok());
    let preview = pipeline.preview(MIXED_BATCH).unwrap();
    assert!(!preview.allow_submit);
    assert!(matches!(preview.categories, CategoryCheck::Conflict(_)));
}

fn echo_labels(preview: &ImportPreview) -> Vec<OverrideEntry> {
    preview
        .fields
        .iter()
        .map(|field| {
            serde_json::from_value(json!({"param_val_ids": field.ids_label, "query": "v"})).unwrap()
        })
        .collect()
}

#[test]
fn echoed_labels_match_their_parameters() {
    let pipeline = pipeline(RecordingSink::all_ok());
    let payload = r#"{"name": "x", "cate": "loki", "rule_config": {"queries": [
      {"var_enabled": true, "var_config": {"param_val": [{"id": "job", "name": "j"}, {"id": 7, "name": "n"}]}}
    ]}}"#;

    let preview = pipeline.preview(payload).unwrap();
    let mut request = ImportRequest::new(payload, 1);
    request.overrides = echo_labels(&preview);
    let prepared = pipeline.prepare(&request).unwrap();

    assert_eq!(prepared.merge.matched, 2);
    assert_eq!(prepared.merge.cleared, 0);
    let value = serde_json::to_value(&prepared.submissions[0]).unwrap();
    assert_eq!(
        value["rule_config"]["queries"][0]["var_config"]["param_val"][0]["query"],
        json!(["v"])
    );
}

#[test]
fn ids_that_cannot_round_trip_a_label_fail_up_front() {
    let pipeline = pipeline(RecordingSink::all_ok());
    let payload = r#"{"name": "x", "cate": "loki", "rule_config": {"queries": [
      {"var_enabled": true, "var_config": {"param_val": [{"id": "a,b", "name": "j"}]}}
    ]}}"#;

    let preview = pipeline.preview(payload).unwrap();
    assert!(!preview.validation.valid);
    assert_eq!(preview.fields[0].ids_label, "a,b");

    let mut request = ImportRequest::new(payload, 1);
    request.overrides = echo_labels(&preview);
    let err = pipeline.prepare(&request).unwrap_err();

    match err {
        ImportError::InvalidBatch { errors } => {
            assert!(errors[0].path.ends_with("param_val[0].id"));
        }
        other => panic!("expected InvalidBatch, got {other:?}"),
    }
    assert_eq!(pipeline.sink().calls(), 0);
}
