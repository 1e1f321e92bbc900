//! Tests for outcome aggregation, report rendering, and persistence.

use std::time::Duration;

use stampede::dispatch::RequestOutcome;
use stampede::report::AggregateReport;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn empty_outcome_set_has_zero_rates_and_mean() {
    let report = AggregateReport::from_outcomes(0, ms(10), &[]);

    assert_eq!(report.total_requests, 0);
    assert_eq!(report.success_count, 0);
    assert_eq!(report.error_count, 0);
    assert_eq!(report.success_rate, 0.0);
    assert_eq!(report.error_rate, 0.0);
    assert_eq!(report.mean_response_time, Duration::ZERO);
    assert!(report.errors.is_empty());
    assert!(report.responses.is_empty());
}

#[test]
fn rates_are_complementary_and_relative_to_configured_count() {
    let outcomes = vec![
        RequestOutcome::success(1, ms(100), "a".into()),
        RequestOutcome::success(2, ms(200), "b".into()),
        RequestOutcome::http_error(3, ms(300), 500, "internal error".into()),
        RequestOutcome::transport_failure(4, ms(400), "connection refused".into()),
    ];
    let report = AggregateReport::from_outcomes(4, ms(450), &outcomes);

    assert_eq!(report.success_count, 2);
    assert_eq!(report.error_count, 2);
    assert_eq!(report.success_rate, 50.0);
    assert_eq!(report.error_rate, 50.0);
    assert!((report.success_rate + report.error_rate - 100.0).abs() < 1e-9);
    // Mean over every outcome's elapsed, not just successes.
    assert_eq!(report.mean_response_time, ms(250));
}

#[test]
fn render_contains_summary_and_no_errors_marker() {
    let outcomes = vec![RequestOutcome::success(1, ms(120), "hello there".into())];
    let report = AggregateReport::from_outcomes(1, ms(130), &outcomes);
    let rendered = report.render();

    assert!(rendered.starts_with("=== LOAD TEST REPORT ===\n"));
    assert!(rendered.contains("Total Requests: 1\n"));
    assert!(rendered.contains("Successful Requests: 1\n"));
    assert!(rendered.contains("Failed Requests: 0\n"));
    assert!(rendered.contains("Success Rate: 100.00%\n"));
    assert!(rendered.contains("Error Rate: 0.00%\n"));
    assert!(rendered.contains("=== ERROR DETAILS ===\nNo errors encountered.\n"));
    assert!(rendered.contains("Request 1: SUCCESS (0.12 sec)\nResponse:\nhello there\n"));
}

#[test]
fn render_lists_every_error_detail() {
    let outcomes = vec![
        RequestOutcome::http_error(1, ms(50), 500, "internal error".into()),
        RequestOutcome::transport_failure(2, ms(60), "connection reset by peer".into()),
        RequestOutcome::success(3, ms(70), "fine".into()),
    ];
    let report = AggregateReport::from_outcomes(3, ms(100), &outcomes);
    let rendered = report.render();

    assert!(rendered.contains("Request 1: ERROR 500 - internal error\n"));
    assert!(rendered.contains("Request 2: FAILED - connection reset by peer\n"));
    assert!(!rendered.contains("No errors encountered."));
    // Error block precedes the response listing.
    let errors_at = rendered.find("=== ERROR DETAILS ===").unwrap();
    let response_at = rendered.find("Request 3: SUCCESS").unwrap();
    assert!(errors_at < response_at);
}

#[test]
fn responses_keep_completion_order() {
    let outcomes = vec![
        RequestOutcome::success(5, ms(10), "finished first".into()),
        RequestOutcome::success(2, ms(20), "finished second".into()),
    ];
    let report = AggregateReport::from_outcomes(2, ms(30), &outcomes);

    assert!(report.responses[0].contains("Request 5"));
    assert!(report.responses[1].contains("Request 2"));
}

#[tokio::test]
async fn persist_writes_report_atomically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("load_test_report.txt");

    let outcomes = vec![RequestOutcome::success(1, ms(40), "persisted".into())];
    let report = AggregateReport::from_outcomes(1, ms(50), &outcomes);
    report.persist(&path).await.unwrap();

    let written = tokio::fs::read_to_string(&path).await.unwrap();
    assert_eq!(written, report.render());
    // No temp file left behind.
    assert!(!path.with_extension("tmp").exists());
}

#[tokio::test]
async fn persist_failure_is_surfaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("report.txt");

    let report = AggregateReport::from_outcomes(0, ms(1), &[]);
    let err = report.persist(&path).await.unwrap_err();
    assert!(err.to_string().contains("failed to write report"));
}
