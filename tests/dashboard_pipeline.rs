use chrono::NaiveDate;

use nrw_dashboard::charts::{self, ChartId, ChartOutcome};
use nrw_dashboard::config::DashboardConfig;
use nrw_dashboard::dashboard::Dashboard;
use nrw_dashboard::loader::DatasetSource;
use nrw_dashboard::processing::{FilterSelection, ReduceOp, reduce};
use nrw_dashboard::render::{Notice, SnapshotRenderer};
use nrw_dashboard::types::Value;

fn source(path: &str) -> DatasetSource {
    DatasetSource::new(DashboardConfig {
        log_to_stderr: false,
        ..DashboardConfig::for_source(path)
    })
}

fn approx(a: Option<f64>, b: f64) -> bool {
    a.is_some_and(|a| (a - b).abs() < 1e-9)
}

#[test]
fn loads_fixture_and_lists_filter_options() {
    let src = source("tests/fixtures/nrw_sample.csv");
    let dash = Dashboard::from_source(&src).unwrap();
    assert!(src.is_loaded());

    let opts = dash.filter_options();
    assert_eq!(
        opts[1].values,
        vec![Value::from("A1"), Value::from("A2"), Value::from("A3"), Value::from("A4")]
    );
    assert_eq!(
        opts[3].values,
        vec![Value::from("Sunny"), Value::from("Rainy"), Value::from("Cloudy")]
    );
}

#[test]
fn monthly_consumption_sums_per_area() {
    let dash = Dashboard::from_source(&source("tests/fixtures/nrw_sample.csv")).unwrap();
    let chart = charts::monthly_consumption_by_area(dash.data()).unwrap();

    let points: Vec<_> = chart
        .series
        .points
        .iter()
        .map(|p| (p.date, p.dimension.as_deref(), p.value()))
        .collect();
    let jan = NaiveDate::from_ymd_opt(2023, 1, 1);
    let feb = NaiveDate::from_ymd_opt(2023, 2, 1);
    let next_jan = NaiveDate::from_ymd_opt(2024, 1, 1);
    assert_eq!(
        points,
        vec![
            (jan, Some("A1"), Some(30.0)),
            (jan, Some("A2"), Some(30.0)),
            (feb, Some("A1"), Some(15.0)),
            (feb, Some("A2"), Some(25.0)),
            (feb, Some("A3"), Some(35.0)),
            (next_jan, Some("A4"), Some(90.0)),
        ]
    );

    let total: f64 = chart.series.points.iter().filter_map(|p| p.value()).sum();
    assert_eq!(total, 225.0);
    assert_eq!(
        reduce(dash.data(), "Hourly_Water_Consumption", ReduceOp::Sum),
        Some(Value::Float64(total))
    );
}

#[test]
fn yearly_consumption_respects_filters() {
    let dash = Dashboard::from_source(&source("tests/fixtures/nrw_sample.csv")).unwrap();
    let sel = FilterSelection::new()
        .with("Area_Code", ["A1", "A2"])
        .with("Weather_Condition", ["Sunny", "Rainy"]);

    let chart = charts::yearly_consumption_by_area(&dash.filtered(&sel)).unwrap();
    let points: Vec<_> = chart
        .series
        .points
        .iter()
        .map(|p| (p.year, p.dimension.as_deref(), p.value()))
        .collect();
    assert_eq!(
        points,
        vec![(2023, Some("A1"), Some(30.0)), (2023, Some("A2"), Some(55.0))]
    );
}

#[test]
fn pressure_means_skip_blank_readings() {
    let dash = Dashboard::from_source(&source("tests/fixtures/nrw_sample.csv")).unwrap();
    let outcome = charts::pressure(dash.data()).unwrap();
    let ChartOutcome::Ready(chart) = outcome else {
        panic!("expected pressure chart, got {outcome:?}");
    };

    let feb = chart
        .series
        .points
        .iter()
        .find(|p| p.year == 2023 && p.month == Some(2))
        .unwrap();
    let user = chart.series.metric_values("User_Pressure").unwrap();
    let idx = chart.series.points.iter().position(|p| p == feb).unwrap();
    assert!(approx(user[idx], 0.95));
    assert_eq!(feb.rows, 3);
}

#[test]
fn dataset_without_pressure_renders_warning() {
    let dash = Dashboard::from_source(&source("tests/fixtures/nrw_no_pressure.csv")).unwrap();
    let mut page = SnapshotRenderer::new();
    dash.render(&FilterSelection::new(), &mut page);

    let notices: Vec<_> = page.notices().collect();
    assert_eq!(notices.len(), 1);
    assert!(matches!(notices[0], Notice::MissingColumns(_)));
    assert!(
        notices[0]
            .to_string()
            .starts_with("Pressure data columns not found.")
    );
    assert_eq!(page.charts().count(), ChartId::ALL.len() - 1);
}

#[test]
fn shared_source_serves_every_dashboard() {
    let src = source("tests/fixtures/nrw_sample.csv");
    let a = Dashboard::from_source(&src).unwrap();
    let b = Dashboard::from_source(&src).unwrap();
    assert!(std::ptr::eq(a.data(), b.data()));
}
