use std::collections::BTreeSet;

use topic_placement::config::PlacementConfig;
use topic_placement::error::PlacementError;
use topic_placement::metadata::SnapshotFileProvider;
use topic_placement::render::OutputFormat;
use topic_placement::topology::{
    BrokerId, ClusterTopology, MetadataSnapshot, PartitionId, PartitionRecord, TopicRecord,
};
use topic_placement::validator::{validate, ExitStatus, Policy};
use topic_placement::RunOptions;

fn ids(ids: &[i32]) -> Vec<BrokerId> {
    ids.iter().copied().map(BrokerId).collect()
}

fn cluster(topics: Vec<TopicRecord>) -> ClusterTopology {
    ClusterTopology::from_snapshot(MetadataSnapshot {
        topics,
        ..Default::default()
    })
    .unwrap()
}

fn fixture(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn scenario_a_disallowed_replica() {
    let topology = cluster(vec![TopicRecord::new(
        "poc_orders",
        vec![PartitionRecord::new(0, 1, vec![1, 2, 4], vec![1, 2, 4])],
    )]);
    let report = validate(&topology, &Policy::default());

    assert!(!report.passed);
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].invalid_brokers, ids(&[4]));
    assert_eq!(report.violations[0].all_replicas, ids(&[1, 2, 4]));
    assert_eq!(report.exit_status(), ExitStatus::Failed);
    assert_eq!(report.exit_status().code(), 1);
}

#[test]
fn scenario_b_compliant() {
    let topology = cluster(vec![TopicRecord::new(
        "poc_orders",
        vec![PartitionRecord::new(0, 1, vec![1, 2], vec![1, 2])],
    )]);
    let report = validate(&topology, &Policy::default());

    assert!(report.passed);
    assert!(report.violations.is_empty());
    assert_eq!(report.exit_status().code(), 0);
}

#[test]
fn scenario_c_nothing_matches() {
    let topology = cluster(vec![TopicRecord::new(
        "other_topic",
        vec![PartitionRecord::new(0, 9, vec![9], vec![9])],
    )]);
    let report = validate(&topology, &Policy::default());

    assert_eq!(report.topics_checked, 0);
    assert_eq!(report.partitions_checked, 0);
    assert!(report.passed);
    assert!(report.is_vacuous());
    assert_eq!(report.exit_status().code(), 0);
}

#[test]
fn scenario_d_internal_topic_with_internal_prefix() {
    let topology = cluster(vec![TopicRecord::new(
        "__consumer_offsets",
        vec![PartitionRecord::new(0, 9, vec![9, 10], vec![9, 10])],
    )]);
    let report = validate(&topology, &Policy::new("__", ids(&[1, 2, 3])));

    assert_eq!(report.topics_checked, 0);
    assert!(report.passed);
}

#[test]
fn scenario_e_partitions_are_reordered() {
    let topology = cluster(vec![TopicRecord::new(
        "poc_orders",
        vec![
            PartitionRecord::new(1, 1, vec![1, 2], vec![1, 2]),
            PartitionRecord::new(0, 1, vec![1, 5], vec![1]),
        ],
    )]);
    let report = validate(&topology, &Policy::default());

    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].partition, PartitionId(0));
    let order: Vec<_> = report.topic_details[0]
        .partitions
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(order, vec![PartitionId(0), PartitionId(1)]);
    assert_eq!(report.topic_details[0].partitions[0].violating_brokers, ids(&[5]));
    assert!(report.topic_details[0].partitions[1].violating_brokers.is_empty());
}

#[test]
fn allowed_equals_replicas_always_passes() {
    let topology = cluster(vec![
        TopicRecord::new(
            "poc_a",
            vec![
                PartitionRecord::new(0, 1, vec![1, 2], vec![1]),
                PartitionRecord::new(1, 2, vec![2, 3], vec![2]),
            ],
        ),
        TopicRecord::new("poc_b", vec![PartitionRecord::new(0, 3, vec![3, 1], vec![3])]),
    ]);
    let replicas: BTreeSet<BrokerId> = topology
        .topics()
        .flat_map(|t| t.partitions())
        .flat_map(|p| p.replicas.iter().copied())
        .collect();
    let report = validate(&topology, &Policy::new("poc_", replicas));

    assert!(report.passed);
    assert!(report.violations.is_empty());
    assert_eq!(report.partitions_checked, 3);
}

#[test]
fn one_violation_per_partition_without_duplicates() {
    let topology = cluster(vec![TopicRecord::new(
        "poc_a",
        vec![
            PartitionRecord::new(0, 7, vec![7, 7, 9, 1, 9], vec![7]),
            PartitionRecord::new(1, 8, vec![8, 1], vec![8]),
        ],
    )]);
    let report = validate(&topology, &Policy::default());

    assert_eq!(report.violations.len(), 2);
    assert_eq!(report.violations[0].invalid_brokers, ids(&[7, 9]));
    assert_eq!(report.violations[0].all_replicas, ids(&[1, 7, 9]));
    assert_eq!(report.violations[1].invalid_brokers, ids(&[8]));
}

#[test]
fn validation_is_idempotent() {
    let snapshot: MetadataSnapshot =
        serde_json::from_slice(&std::fs::read(fixture("mixed.json")).unwrap()).unwrap();
    let topology = ClusterTopology::from_snapshot(snapshot).unwrap();
    let policy = Policy::default();

    let first = validate(&topology, &policy);
    let second = validate(&topology, &policy);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn fixture_report() {
    let snapshot: MetadataSnapshot =
        serde_json::from_slice(&std::fs::read(fixture("mixed.json")).unwrap()).unwrap();
    let topology = ClusterTopology::from_snapshot(snapshot).unwrap();
    let report = validate(&topology, &Policy::default());

    let names: Vec<_> = report.topic_details.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["poc_orders", "poc_payments"]);
    assert_eq!(report.topics_checked, 2);
    assert_eq!(report.partitions_checked, 3);
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].topic, "poc_orders");
    assert!(report.topic_details[0].has_violations);
    assert!(!report.topic_details[1].has_violations);
}

async fn run_fixture(config: &PlacementConfig, name: &str) -> (ExitStatus, String) {
    let provider = SnapshotFileProvider::new(fixture(name));
    let mut out = Vec::new();
    let status = topic_placement::run(config, &provider, &RunOptions::default(), &mut out)
        .await
        .unwrap();
    (status, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn run_reports_failure() {
    let (status, out) = run_fixture(&PlacementConfig::default(), "mixed.json").await;
    assert_eq!(status, ExitStatus::Failed);
    assert!(out.contains("=== Cluster Brokers ==="));
    assert!(out.contains("Topic: poc_orders [FAIL]"));
    assert!(out.contains("Topic: poc_payments [PASS]"));
    assert!(!out.contains("__consumer_offsets"));
    assert!(out.contains("VALIDATION FAILED"));
}

#[tokio::test]
async fn run_quiet() {
    let mut config = PlacementConfig::default();
    config.quiet = true;
    let (status, out) = run_fixture(&config, "mixed.json").await;
    assert_eq!(status, ExitStatus::Failed);
    assert_eq!(out, "FAILED: 1 violations\n");

    config.topic_prefix = "poc_payments".to_string();
    let (status, out) = run_fixture(&config, "mixed.json").await;
    assert_eq!(status, ExitStatus::Passed);
    assert_eq!(out, "PASSED\n");
}

#[tokio::test]
async fn run_without_matching_topics() {
    let mut config = PlacementConfig::default();
    config.topic_prefix = "tenant_".to_string();
    let (status, out) = run_fixture(&config, "mixed.json").await;
    assert_eq!(status, ExitStatus::Passed);
    assert!(out.contains("No topics found with prefix 'tenant_'"));
    assert!(!out.contains("VALIDATION"));
}

#[tokio::test]
async fn run_json() {
    let mut config = PlacementConfig::default();
    config.format = OutputFormat::Json;
    let (status, out) = run_fixture(&config, "mixed.json").await;
    assert_eq!(status, ExitStatus::Failed);

    let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(doc["cluster_id"], "fixture-cluster");
    assert_eq!(doc["violations"][0]["partition"], 0);
    assert_eq!(doc["brokers"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn malformed_snapshot_is_not_a_pass() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(
        &path,
        r#"{"brokers": [], "topics": [{"name": "poc_a", "partitions": [{"id": 0, "leader": 1, "isr": [1]}]}]}"#,
    )
    .unwrap();

    let provider = SnapshotFileProvider::new(&path);
    let mut out = Vec::new();
    let err = topic_placement::run(
        &PlacementConfig::default(),
        &provider,
        &RunOptions::default(),
        &mut out,
    )
    .await
    .unwrap_err();

    assert_eq!(err.exit_status(), ExitStatus::MetadataUnavailable);
    assert!(err.to_string().contains("missing required field `replicas`"));
    assert!(out.is_empty());
}

#[tokio::test]
async fn snapshot_without_topics_is_not_a_pass() {
    let dir = tempfile::tempdir().unwrap();
    for (name, body) in [
        ("empty.json", "{}"),
        ("array.json", "[]"),
        (
            "typo.json",
            r#"{"brokers": [], "topcis": [{"name": "poc_a", "partitions": [{"id": 0, "leader": 4, "replicas": [4], "isr": [4]}]}]}"#,
        ),
    ] {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();

        let provider = SnapshotFileProvider::new(&path);
        let mut out = Vec::new();
        let err = topic_placement::run(
            &PlacementConfig::default(),
            &provider,
            &RunOptions::default(),
            &mut out,
        )
        .await
        .unwrap_err();

        assert!(
            matches!(err, PlacementError::Snapshot { .. }),
            "{}: {}",
            name,
            err
        );
        assert_eq!(err.exit_status(), ExitStatus::MetadataUnavailable);
        assert!(out.is_empty());
    }
}

#[tokio::test]
async fn dump_snapshot_writes_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("dump.json");
    let provider = SnapshotFileProvider::new(fixture("mixed.json"));
    let options = RunOptions {
        snapshot: None,
        dump_snapshot: Some(dump.clone()),
    };
    let mut out = Vec::new();
    topic_placement::run(&PlacementConfig::default(), &provider, &options, &mut out)
        .await
        .unwrap();

    let original: MetadataSnapshot =
        serde_json::from_slice(&std::fs::read(fixture("mixed.json")).unwrap()).unwrap();
    let dumped: MetadataSnapshot = serde_json::from_slice(&std::fs::read(&dump).unwrap()).unwrap();
    assert_eq!(original, dumped);
}
