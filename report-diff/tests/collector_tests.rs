//! Branch page extraction and multi-branch collection

mod common;

use common::*;
use report_diff::types::OrderedMap;
use report_diff::{parse_branch_page, Collector, Document, ReportClient, ReportDiffError};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const PAGE_URL: &str = "https://example.com/wmi/analyse_branch.html";

#[test]
fn test_metadata_and_segments() {
    let report = parse_branch_page(sample_branch_page(), PAGE_URL);

    assert_eq!(report.metadata.page_title.as_deref(), Some("Analysis for ['wmi', 'master']"));
    assert_eq!(report.metadata.branch_name.as_deref(), Some("wmi"));
    assert_eq!(report.metadata.url.as_deref(), Some(PAGE_URL));
    assert_eq!(report.segments.total, 12840);
    assert_eq!(report.segments.chill_mode, 8003);
    assert_eq!(report.segments.experimental_mode, 4837);
}

#[test]
fn test_engagement_sections() {
    let report = parse_branch_page(sample_branch_page(), PAGE_URL);

    let time = report.sections.engagement_time.expect("time section");
    assert_eq!(time.title, "Engagement Rate Analysis (time)");
    assert_eq!(time.overall, 63.0);
    assert_eq!(time.overall_detail, "1561 hours");
    assert_eq!(time.chill_mode, 58.1);
    assert_eq!(time.experimental_mode_detail, "584 hours");

    // the distance section has no overall rate, so it is dropped
    assert!(report.sections.engagement_distance.is_none());
}

#[test]
fn test_tables() {
    let report = parse_branch_page(sample_branch_page(), PAGE_URL);

    let keys: Vec<&str> = report.tables.keys().collect();
    assert_eq!(keys, vec!["engagement_by_car_model", "disengagement_reasons"]);

    let models = report.tables.get("engagement_by_car_model").unwrap();
    assert_eq!(models.title, "Engagement by Car Model");
    assert_eq!(models.headers, vec!["Car Model", "Engagement (time)", "Segments"]);
    // the trailing row only has <th> cells and is skipped
    assert_eq!(models.rows.len(), 2);
    assert_eq!(models.rows[1].identifier("Car Model"), Some("toyota corolla (2020)".to_string()));
    assert_eq!(models.rows[1].raw("Segments"), Some("1 840".to_string()));
    assert_eq!(models.rows[0].get("Engagement (time)").numeric(), Some(57.5));
}

#[test]
fn test_page_without_markers() {
    let report = parse_branch_page("<html><body><p>nothing here</p></body></html>", PAGE_URL);

    assert!(report.metadata.page_title.is_none());
    assert!(report.metadata.branch_name.is_none());
    assert_eq!(report.segments.total, 0);
    assert!(report.sections.engagement_time.is_none());
    assert!(report.tables.is_empty());
}

#[tokio::test]
async fn test_collect_all_skips_failed_branches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wmi/analyse_branch.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_branch_page()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/master/analyse_branch.html"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sources: OrderedMap<String> = [
        ("master".to_string(), format!("{}/master/analyse_branch.html", server.uri())),
        ("wmi".to_string(), format!("{}/wmi/analyse_branch.html", server.uri())),
    ]
    .into_iter()
    .collect();

    let collector = Collector::new(ReportClient::new(5).unwrap());
    let mut outcomes = Vec::new();
    let document = collector
        .collect_all(&sources, |branch, outcome| {
            outcomes.push((branch.to_string(), outcome.is_ok()))
        })
        .await
        .unwrap();

    assert_eq!(
        outcomes,
        vec![("master".to_string(), false), ("wmi".to_string(), true)]
    );
    assert_eq!(document.data.keys().collect::<Vec<_>>(), vec!["wmi"]);

    // the collected document survives a JSON round trip through validation
    let json = serde_json::to_string_pretty(&document).unwrap();
    let reparsed = Document::from_json(&json).unwrap();
    assert_eq!(reparsed.data.get("wmi").unwrap().segments.total, 12840);
}

#[tokio::test]
async fn test_collect_all_fails_when_nothing_collected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let sources: OrderedMap<String> = [("master".to_string(), format!("{}/master", server.uri()))]
        .into_iter()
        .collect();

    let collector = Collector::new(ReportClient::new(5).unwrap());
    let err = collector.collect_all(&sources, |_, _| {}).await.unwrap_err();

    assert!(matches!(err, ReportDiffError::NothingCollected));
}
