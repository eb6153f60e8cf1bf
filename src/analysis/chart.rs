//! Chart-ready series shaping.
//!
//! Every chart kind degrades to a synthetic index series when the dataset lacks the numeric
//! columns it needs, so a chart request never fails on data shape.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::AnalysisError;
use crate::types::{CellValue, Table};

use super::correlation::NumericColumn;
use super::summary::{limit_rows, numeric_columns};
use super::DEFAULT_MAX_DATA_POINTS;

/// Supported chart kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Area,
    Pie,
    Donut,
    Scatter,
    Bubble,
}

impl ChartType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Area => "area",
            Self::Pie => "pie",
            Self::Donut => "donut",
            Self::Scatter => "scatter",
            Self::Bubble => "bubble",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(Self::Bar),
            "line" => Ok(Self::Line),
            "area" => Ok(Self::Area),
            "pie" => Ok(Self::Pie),
            "donut" | "doughnut" => Ok(Self::Donut),
            "scatter" => Ok(Self::Scatter),
            "bubble" => Ok(Self::Bubble),
            _ => Err(AnalysisError::UnknownChartType { name: s.to_owned() }),
        }
    }
}

/// Presentation options echoed back in [`ChartDataset::configuration`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    pub title: Option<String>,
    /// Colors assigned to series in order, cycling when there are more series than colors.
    pub colors: Vec<String>,
    /// Overrides the analysis-wide data-point cap.
    pub max_data_points: Option<usize>,
    pub show_legend: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: None,
            colors: Vec::new(),
            max_data_points: None,
            show_legend: true,
        }
    }
}

/// An x/y point; bubble charts also carry a radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<f64>,
}

/// Values of one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesData {
    /// One value per label.
    Values(Vec<f64>),
    /// Free-standing points (scatter and bubble charts).
    Points(Vec<Point>),
}

impl SeriesData {
    pub fn len(&self) -> usize {
        match self {
            Self::Values(v) => v.len(),
            Self::Points(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub name: String,
    pub data: SeriesData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Chart-ready structure for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub dataset_id: String,
    pub chart_type: ChartType,
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub configuration: ChartConfig,
}

/// Shape the first `max_data_points` records of `dataset` for `chart_type`.
pub fn chart(dataset: &Dataset, chart_type: ChartType, config: &ChartConfig) -> ChartDataset {
    chart_with_default_limit(dataset, chart_type, config, DEFAULT_MAX_DATA_POINTS)
}

/// Like [`chart`], with the cap used when `config.max_data_points` is unset.
pub fn chart_with_default_limit(
    dataset: &Dataset,
    chart_type: ChartType,
    config: &ChartConfig,
    default_max_data_points: usize,
) -> ChartDataset {
    let limit = config.max_data_points.unwrap_or(default_max_data_points);
    let table = limit_rows(&dataset.records, limit);
    let numeric = numeric_columns(&table);

    let (labels, mut series) = match chart_type {
        ChartType::Bar | ChartType::Line | ChartType::Area => categorical(&table, &numeric, false),
        ChartType::Pie | ChartType::Donut => categorical(&table, &numeric, true),
        ChartType::Scatter => points(&table, &numeric, false),
        ChartType::Bubble => points(&table, &numeric, true),
    };

    if !config.colors.is_empty() {
        for (i, s) in series.iter_mut().enumerate() {
            s.color = Some(config.colors[i % config.colors.len()].clone());
        }
    }

    ChartDataset {
        dataset_id: dataset.key().to_owned(),
        chart_type,
        labels,
        series,
        configuration: config.clone(),
    }
}

fn categorical(table: &Table, numeric: &[NumericColumn], first_only: bool) -> (Vec<String>, Vec<ChartSeries>) {
    if numeric.is_empty() {
        return index_fallback(table.row_count());
    }

    let label_idx = if first_only {
        0
    } else {
        table
            .schema
            .field_names()
            .position(|name| numeric.iter().all(|c| c.name != name))
            .unwrap_or(0)
    };
    let labels = table.column_values(label_idx).map(CellValue::to_string).collect();

    let take = if first_only { 1 } else { numeric.len() };
    let series = numeric
        .iter()
        .take(take)
        .map(|c| ChartSeries {
            name: c.name.clone(),
            data: SeriesData::Values(c.values.iter().map(|v| v.unwrap_or(0.0)).collect()),
            color: None,
        })
        .collect();
    (labels, series)
}

fn points(table: &Table, numeric: &[NumericColumn], with_radius: bool) -> (Vec<String>, Vec<ChartSeries>) {
    let [x, y, rest @ ..] = numeric else {
        let n = table.row_count();
        let labels = row_labels(n);
        let pts = (1..=n)
            .map(|i| Point {
                x: i as f64,
                y: i as f64,
                r: None,
            })
            .collect();
        let series = vec![ChartSeries {
            name: "Index".to_string(),
            data: SeriesData::Points(pts),
            color: None,
        }];
        return (labels, series);
    };
    let radius = if with_radius { rest.first() } else { None };

    let pts = x
        .values
        .iter()
        .zip(&y.values)
        .enumerate()
        .filter_map(|(row, (xv, yv))| {
            Some(Point {
                x: (*xv)?,
                y: (*yv)?,
                r: radius.and_then(|r| r.values.get(row).copied().flatten()),
            })
        })
        .collect();

    let series = vec![ChartSeries {
        name: format!("{} vs {}", x.name, y.name),
        data: SeriesData::Points(pts),
        color: None,
    }];
    (Vec::new(), series)
}

fn index_fallback(n: usize) -> (Vec<String>, Vec<ChartSeries>) {
    let series = vec![ChartSeries {
        name: "Count".to_string(),
        data: SeriesData::Values((1..=n).map(|i| i as f64).collect()),
        color: None,
    }];
    (row_labels(n), series)
}

fn row_labels(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("Row {i}")).collect()
}

#[cfg(test)]
mod tests {
    use super::{chart, ChartConfig, ChartType, Point, SeriesData};
    use crate::analysis::classify::as_number;
    use crate::error::AnalysisError;
    use crate::ingestion::{ingest, IngestionOptions};

    fn csv(body: &str) -> crate::dataset::Dataset {
        ingest("c.csv", body.as_bytes(), "csv", &IngestionOptions::default()).unwrap()
    }

    #[test]
    fn chart_type_names() {
        assert_eq!("Doughnut".parse::<ChartType>(), Ok(ChartType::Donut));
        assert_eq!(" BAR ".parse::<ChartType>(), Ok(ChartType::Bar));
        assert_eq!(
            "radar".parse::<ChartType>(),
            Err(AnalysisError::UnknownChartType {
                name: "radar".to_string()
            })
        );
    }

    #[test]
    fn bar_uses_first_text_column_for_labels() {
        let ds = csv("id,region,sales,units\n1,north,10,x\n2,south,20,y\n");
        let c = chart(&ds, ChartType::Bar, &ChartConfig::default());
        assert_eq!(c.labels, vec!["north", "south"]);
        let names: Vec<_> = c.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["id", "sales"]);
        assert_eq!(c.series[1].data, SeriesData::Values(vec![10.0, 20.0]));
    }

    #[test]
    fn all_text_dataset_falls_back_to_row_index() {
        let ds = csv("name,city\nAda,London\nGrace,Arlington\nLinus,Helsinki\n");
        for kind in [ChartType::Line, ChartType::Pie] {
            let c = chart(&ds, kind, &ChartConfig::default());
            assert_eq!(c.labels, vec!["Row 1", "Row 2", "Row 3"]);
            assert_eq!(c.series.len(), 1);
            assert_eq!(c.series[0].name, "Count");
            assert_eq!(c.series[0].data, SeriesData::Values(vec![1.0, 2.0, 3.0]));
        }

        let c = chart(&ds, ChartType::Scatter, &ChartConfig::default());
        assert_eq!(
            c.series[0].data,
            SeriesData::Points(vec![
                Point { x: 1.0, y: 1.0, r: None },
                Point { x: 2.0, y: 2.0, r: None },
                Point { x: 3.0, y: 3.0, r: None },
            ])
        );
    }

    #[test]
    fn one_numeric_column_is_not_enough_for_points() {
        let ds = csv("name,score\nAda,90\nGrace,85\n");
        for kind in [ChartType::Scatter, ChartType::Bubble] {
            let c = chart(&ds, kind, &ChartConfig::default());
            assert_eq!(c.labels, vec!["Row 1", "Row 2"], "{kind}");
            assert_eq!(c.series.len(), 1);
            assert_eq!(c.series[0].name, "Index");
            assert_eq!(
                c.series[0].data,
                SeriesData::Points(vec![
                    Point { x: 1.0, y: 1.0, r: None },
                    Point { x: 2.0, y: 2.0, r: None },
                ])
            );
        }
    }

    #[test]
    fn pie_takes_first_numeric_column_only() {
        let ds = csv("fruit,count,weight\napple,3,1.5\npear,5,2.5\n");
        let c = chart(&ds, ChartType::Donut, &ChartConfig::default());
        assert_eq!(c.labels, vec!["apple", "pear"]);
        assert_eq!(c.series.len(), 1);
        assert_eq!(c.series[0].name, "count");
    }

    #[test]
    fn scatter_skips_incomplete_rows_and_bubble_reads_radius() {
        let ds = csv("x,y,size\n1,2,5\n3,,6\n4,8,7\n");
        let c = chart(&ds, ChartType::Scatter, &ChartConfig::default());
        assert_eq!(c.series[0].data.len(), 2);

        let c = chart(&ds, ChartType::Bubble, &ChartConfig::default());
        let SeriesData::Points(pts) = &c.series[0].data else {
            panic!("expected points");
        };
        assert_eq!(pts[1], Point { x: 4.0, y: 8.0, r: Some(7.0) });
    }

    #[test]
    fn colors_cycle_and_cap_applies() {
        let ds = csv("k,a,b,c\nr1,1,2,3\nr2,4,5,6\nr3,7,8,9\n");
        let config = ChartConfig {
            colors: vec!["#111".to_string(), "#222".to_string()],
            max_data_points: Some(2),
            ..Default::default()
        };
        let c = chart(&ds, ChartType::Line, &config);
        let colors: Vec<_> = c.series.iter().map(|s| s.color.as_deref()).collect();
        assert_eq!(colors, vec![Some("#111"), Some("#222"), Some("#111")]);
        assert_eq!(c.labels.len(), 2);
        assert_eq!(c.configuration, config);
        assert_eq!(c.dataset_id, ds.key());
    }

    #[test]
    fn series_values_match_numeric_cells() {
        let ds = csv("label,v\na,1.5\nb,2\n");
        let c = chart(&ds, ChartType::Area, &ChartConfig::default());
        let expected: Vec<f64> = ds.records.column_values(1).filter_map(as_number).collect();
        assert_eq!(c.series[0].data, SeriesData::Values(expected));
    }
}
