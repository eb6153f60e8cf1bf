use tabular_insight::analysis::{
    chart, statistics, summary, ChartConfig, ChartType, ColumnType, DataAnalyzer, SeriesData,
};
use tabular_insight::dataset::Dataset;
use tabular_insight::ingestion::{ingest, ingest_from_path, IngestionOptions};

fn from_csv(body: &str) -> Dataset {
    ingest("t.csv", body.as_bytes(), "csv", &IngestionOptions::default()).unwrap()
}

#[test]
fn statistics_means_for_two_numeric_columns() {
    let ds = from_csv("a,b\n1,10\n2,20\n3,30\n");
    let s = statistics(&ds);

    assert_eq!(s.column_statistics["a"].mean, 2.0);
    assert_eq!(s.column_statistics["b"].mean, 20.0);
    assert_eq!(s.column_statistics["a"].median, s.column_statistics["a"].q2);
    assert_eq!(s.correlation_matrix.len(), 1);
    assert!((s.correlation_matrix["a_b"] - 1.0).abs() < 1e-12);
}

#[test]
fn constant_column_correlates_to_zero() {
    let ds = from_csv("x,k\n1,5\n2,5\n3,5\n");
    let s = statistics(&ds);
    assert_eq!(s.correlation_matrix["x_k"], 0.0);
    assert_eq!(s.column_statistics["k"].std_dev, 0.0);
    assert_eq!(s.column_statistics["k"].skewness, 0.0);
}

#[test]
fn outlier_columns_follow_schema_order() {
    let ds = from_csv("b,a\n1,1\n2,2\n3,3\n4,4\n100,100\n");
    let s = statistics(&ds);
    assert_eq!(s.outlier_columns, vec!["b", "a"]);
    assert_eq!(s.column_statistics["a"].outlier_count, 1);
}

#[test]
fn summary_of_fixture() {
    let ds = ingest_from_path("tests/fixtures/people.csv", &IngestionOptions::default()).unwrap();
    let s = summary(&ds);

    assert_eq!(s.total_rows, 2);
    assert_eq!(s.total_columns, 4);
    assert_eq!(s.missing_values, 0);
    assert_eq!(s.duplicate_rows, 0);
    let types: Vec<_> = s.column_summaries.iter().map(|c| c.inferred_type).collect();
    assert_eq!(
        types,
        vec![
            ColumnType::Numeric,
            ColumnType::String,
            ColumnType::Numeric,
            ColumnType::Boolean
        ]
    );
}

#[test]
fn unprocessed_dataset_summarizes_to_nothing() {
    let ds = ingest("bad.json", b"not json", "json", &IngestionOptions::default()).unwrap();
    assert!(!ds.processed);
    let s = summary(&ds);
    assert_eq!(s.total_rows, 0);
    assert!(statistics(&ds).column_statistics.is_empty());
    let c = chart(&ds, ChartType::Bar, &ChartConfig::default());
    assert!(c.labels.is_empty());
}

#[test]
fn xml_attributes_and_children_are_profiled_as_numbers() {
    let ds = ingest_from_path("tests/fixtures/people.xml", &IngestionOptions::default()).unwrap();
    let s = statistics(&ds);
    assert_eq!(s.column_statistics.keys().collect::<Vec<_>>(), vec!["id", "score"]);
    assert_eq!(s.column_statistics["score"].max, 98.5);
}

#[test]
fn all_text_dataset_charts_use_index_series() {
    let ds = from_csv("name,city\nAda,London\nGrace,Arlington\n");

    for kind in ["bar", "line", "area", "pie", "doughnut"] {
        let c = chart(&ds, kind.parse().unwrap(), &ChartConfig::default());
        assert_eq!(c.labels, vec!["Row 1", "Row 2"], "{kind}");
        assert_eq!(c.series[0].data, SeriesData::Values(vec![1.0, 2.0]), "{kind}");
    }
}

#[test]
fn serialized_summaries_use_camel_case() {
    let ds = from_csv("a,b\n1,2\n2,4\n");
    let json = serde_json::to_value(statistics(&ds)).unwrap();
    assert!(json["columnStatistics"]["a"]["stdDev"].is_number());
    assert!(json["correlationMatrix"]["a_b"].is_number());

    let c = chart(&ds, ChartType::Scatter, &ChartConfig::default());
    let json = serde_json::to_value(&c).unwrap();
    assert_eq!(json["chartType"], "scatter");
    assert_eq!(json["series"][0]["data"][0]["x"], 1.0);
}

#[test]
fn analyzer_matches_free_functions() {
    let ds = from_csv("a,b\n1,10\n2,20\n3,30\n");
    let analyzer = DataAnalyzer::default();
    assert_eq!(analyzer.statistics(&ds), statistics(&ds));
    assert_eq!(analyzer.summary(&ds), summary(&ds));
    assert_eq!(
        analyzer.chart(&ds, ChartType::Line, &ChartConfig::default()),
        chart(&ds, ChartType::Line, &ChartConfig::default())
    );
}
