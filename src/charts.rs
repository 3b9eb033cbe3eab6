//! The dashboard's charts: one named aggregation per chart, with titles and axis labels.
//!
//! Each function takes the already-filtered dataset. Data-derived charts return
//! [`AggregateError::EmptyDataset`] when the filters leave nothing to show.

use std::fmt;

use serde::Serialize;

use crate::error::AggregateError;
use crate::nrw::{
    AREA_CODE, AREA_TANK_LEVEL, HOURLY_WATER_CONSUMPTION, MAIN_TANK_LEVEL, PRESSURE_COLUMNS,
    WEATHER_CONDITION,
};
use crate::processing::{AggregatedSeries, GroupKeys, ReduceOp, SeriesPoint, aggregate, month_start};
use crate::types::DataSet;

/// Every chart on the page, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartId {
    MonthlyConsumption,
    YearlyConsumption,
    MonthlyLeakage,
    AreaTankLevel,
    WeatherImpact,
    TankLevels,
    Pressure,
}

impl ChartId {
    pub const ALL: [ChartId; 7] = [
        ChartId::MonthlyConsumption,
        ChartId::YearlyConsumption,
        ChartId::MonthlyLeakage,
        ChartId::AreaTankLevel,
        ChartId::WeatherImpact,
        ChartId::TankLevels,
        ChartId::Pressure,
    ];

    /// Section heading shown above the chart.
    pub fn subheader(self) -> &'static str {
        match self {
            ChartId::MonthlyConsumption => "Monthly Water Consumption by Area Code",
            ChartId::YearlyConsumption => "Yearly Water Consumption by Area Code",
            ChartId::MonthlyLeakage => "Monthly Leakage Over Time",
            ChartId::AreaTankLevel => "Area Tank Level Over Time",
            ChartId::WeatherImpact => "Impact of Weather Conditions on Water Consumption",
            ChartId::TankLevels => "Main and Area Tank Levels",
            ChartId::Pressure => "Pressure Data Over Time",
        }
    }

    /// Whether the chart is computed from the dataset at all.
    pub fn is_data_driven(self) -> bool {
        self != ChartId::MonthlyLeakage
    }
}

/// How a series should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// One line per dimension value (or per metric when there is no dimension).
    Line,
    /// One bar per (x, dimension value), labelled with its value.
    Bar,
}

/// A chart ready for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub id: ChartId,
    pub title: &'static str,
    pub kind: ChartKind,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub series: AggregatedSeries,
}

/// Outcome of a chart that depends on optional columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartOutcome {
    Ready(Chart),
    Skipped(MissingColumnsWarning),
}

/// A chart was skipped because the dataset lacks some of its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingColumnsWarning {
    pub chart: ChartId,
    pub columns: Vec<String>,
}

impl fmt::Display for MissingColumnsWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.chart {
            ChartId::Pressure => f.write_str("Pressure data columns not found.")?,
            other => write!(f, "Data columns for '{}' not found.", other.subheader())?,
        }
        write!(f, " Please check your dataset (missing: {}).", self.columns.join(", "))
    }
}

const DATE: &str = "Date";

/// Sum of hourly consumption per month and area.
pub fn monthly_consumption_by_area(ds: &DataSet) -> Result<Chart, AggregateError> {
    Ok(Chart {
        id: ChartId::MonthlyConsumption,
        title: "Monthly Water Consumption by Area Code",
        kind: ChartKind::Line,
        x_label: DATE,
        y_label: HOURLY_WATER_CONSUMPTION,
        series: aggregate(
            ds,
            &GroupKeys::monthly().by(AREA_CODE),
            &[HOURLY_WATER_CONSUMPTION],
            ReduceOp::Sum,
        )?,
    })
}

/// Sum of hourly consumption per year and area.
pub fn yearly_consumption_by_area(ds: &DataSet) -> Result<Chart, AggregateError> {
    Ok(Chart {
        id: ChartId::YearlyConsumption,
        title: "Yearly Water Consumption by Area Code",
        kind: ChartKind::Bar,
        x_label: "Year",
        y_label: "Water Consumption (liters)",
        series: aggregate(
            ds,
            &GroupKeys::yearly().by(AREA_CODE),
            &[HOURLY_WATER_CONSUMPTION],
            ReduceOp::Sum,
        )?,
    })
}

/// Mean area tank level per month and area.
pub fn area_tank_level_by_area(ds: &DataSet) -> Result<Chart, AggregateError> {
    Ok(Chart {
        id: ChartId::AreaTankLevel,
        title: "Average Area Tank Level Over Time",
        kind: ChartKind::Line,
        x_label: DATE,
        y_label: AREA_TANK_LEVEL,
        series: aggregate(
            ds,
            &GroupKeys::monthly().by(AREA_CODE),
            &[AREA_TANK_LEVEL],
            ReduceOp::Mean,
        )?,
    })
}

/// Mean hourly consumption per month and weather condition.
pub fn weather_impact(ds: &DataSet) -> Result<Chart, AggregateError> {
    Ok(Chart {
        id: ChartId::WeatherImpact,
        title: "Impact of Weather Conditions on Water Consumption",
        kind: ChartKind::Line,
        x_label: DATE,
        y_label: HOURLY_WATER_CONSUMPTION,
        series: aggregate(
            ds,
            &GroupKeys::monthly().by(WEATHER_CONDITION),
            &[HOURLY_WATER_CONSUMPTION],
            ReduceOp::Mean,
        )?,
    })
}

/// Mean main and area tank levels per month.
pub fn tank_levels(ds: &DataSet) -> Result<Chart, AggregateError> {
    Ok(Chart {
        id: ChartId::TankLevels,
        title: "Main and Area Tank Levels Over Time",
        kind: ChartKind::Line,
        x_label: DATE,
        y_label: "value",
        series: aggregate(
            ds,
            &GroupKeys::monthly(),
            &[MAIN_TANK_LEVEL, AREA_TANK_LEVEL],
            ReduceOp::Mean,
        )?,
    })
}

/// Mean of the three pressure readings per month.
///
/// Skipped with a [`MissingColumnsWarning`] when any pressure column is absent. The column check
/// comes first, so an empty dataset without pressure columns is still a skip, not an error.
pub fn pressure(ds: &DataSet) -> Result<ChartOutcome, AggregateError> {
    let missing: Vec<String> = PRESSURE_COLUMNS
        .iter()
        .filter(|c| !ds.schema.contains(c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Ok(ChartOutcome::Skipped(MissingColumnsWarning {
            chart: ChartId::Pressure,
            columns: missing,
        }));
    }

    Ok(ChartOutcome::Ready(Chart {
        id: ChartId::Pressure,
        title: "Pressure Data Over Time",
        kind: ChartKind::Line,
        x_label: DATE,
        y_label: "Pressure (bars)",
        series: aggregate(ds, &GroupKeys::monthly(), &PRESSURE_COLUMNS, ReduceOp::Mean)?,
    }))
}

/// Build chart `id` from the filtered dataset.
pub fn build(id: ChartId, ds: &DataSet) -> Result<ChartOutcome, AggregateError> {
    let chart = match id {
        ChartId::MonthlyConsumption => monthly_consumption_by_area(ds)?,
        ChartId::YearlyConsumption => yearly_consumption_by_area(ds)?,
        ChartId::MonthlyLeakage => monthly_leakage(),
        ChartId::AreaTankLevel => area_tank_level_by_area(ds)?,
        ChartId::WeatherImpact => weather_impact(ds)?,
        ChartId::TankLevels => tank_levels(ds)?,
        ChartId::Pressure => return pressure(ds),
    };
    Ok(ChartOutcome::Ready(chart))
}

/// Year of the fixed leakage table.
pub const LEAKAGE_YEAR: i64 = 2023;

/// Monthly leakage in liters, January to December of [`LEAKAGE_YEAR`].
///
/// Demo figures carried over from the first version of the dashboard; they are not derived from
/// the dataset.
pub const MONTHLY_LEAKAGE: [f64; 12] = [
    762.163647, 758.553625, 689.222046, 821.455567, 749.942076, 574.806347, 810.309899, 749.786654,
    761.335840, 748.336110, 748.391032, 697.721186,
];

/// The fixed monthly leakage chart. Independent of the dataset and of the filters.
pub fn monthly_leakage() -> Chart {
    let points = MONTHLY_LEAKAGE
        .iter()
        .zip(1_u32..)
        .map(|(&liters, month)| SeriesPoint {
            year: LEAKAGE_YEAR,
            month: Some(month),
            date: month_start(LEAKAGE_YEAR, i64::from(month)).ok(),
            dimension: None,
            values: vec![Some(liters)],
            rows: 0,
        })
        .collect();

    Chart {
        id: ChartId::MonthlyLeakage,
        title: "Monthly Leakage Over Time",
        kind: ChartKind::Line,
        x_label: DATE,
        y_label: "Leakage (liters)",
        series: AggregatedSeries {
            dimension: None,
            metrics: vec!["Leakage".to_string()],
            points,
        },
    }
}
