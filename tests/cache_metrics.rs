mod support;

use std::collections::HashSet;

use chunt_schedule::{
    cache::{CacheConfig, metrics as cache_metrics},
    domain::types::Bucket,
    infra::telemetry,
};
use metrics_util::debugging::DebuggingRecorder;
use support::{Harness, NOW, record, three_shows};
use time::Duration;

#[tokio::test]
async fn cache_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");
    telemetry::describe_metrics();

    let mut rows = three_shows();
    let mut broken = record(4, NOW, NOW, "{}");
    broken.stop = None;
    rows.push(broken);
    let harness = Harness::new(rows, CacheConfig::default());

    // Cold read: miss plus direct scan.
    assert_eq!(harness.schedule.get_bucket(Bucket::Now).await.len(), 1);

    // Refresh (skipping the broken row), then a hit.
    let report = harness.schedule.force_refresh().await.expect("refresh");
    assert_eq!(report.skipped, 1);
    assert_eq!(harness.schedule.get_bucket(Bucket::All).await.len(), 3);

    // Failed refresh.
    harness.clock.advance(Duration::seconds(1));
    harness.store.set_down(true);
    assert!(harness.schedule.force_refresh().await.is_err());

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        cache_metrics::METRIC_CACHE_HIT,
        cache_metrics::METRIC_CACHE_MISS,
        cache_metrics::METRIC_CACHE_REFRESH,
        cache_metrics::METRIC_CACHE_REFRESH_FAILED,
        cache_metrics::METRIC_CACHE_REFRESH_MS,
        cache_metrics::METRIC_ROWS_SKIPPED,
        cache_metrics::METRIC_DIRECT_SCAN,
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}
