//! Page assembly: filters in, charts out.

use std::sync::Arc;

use serde::Serialize;

use crate::charts::{self, ChartId, ChartOutcome};
use crate::error::{AggregateError, LoadResult};
use crate::loader::DatasetSource;
use crate::nrw::FILTER_COLUMNS;
use crate::processing::{FilterSelection, apply, unique_values};
use crate::render::{ChartRenderer, Notice};
use crate::topology::TopologyGraph;
use crate::types::{DataSet, Value};

/// Page title.
pub const TITLE: &str = "Water Consumption Dashboard";
/// Heading of the sidebar holding the filters.
pub const FILTERS_HEADER: &str = "Filters";
/// Heading above the network diagram.
pub const DIAGRAM_SUBHEADER: &str = "Water Distribution Flowchart";

/// Multi-select labels, aligned with [`FILTER_COLUMNS`].
const FILTER_LABELS: [&str; 4] = [
    "Select User IDs",
    "Select Area Codes",
    "Select Device IDs",
    "Select Weather Conditions",
];

/// Options for one sidebar multi-select.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub column: &'static str,
    pub label: &'static str,
    pub values: Vec<Value>,
}

/// The dashboard over one loaded dataset.
#[derive(Debug, Clone)]
pub struct Dashboard {
    data: Arc<DataSet>,
    topology: TopologyGraph,
}

impl Dashboard {
    pub fn new(data: Arc<DataSet>) -> Self {
        Self {
            data,
            topology: TopologyGraph::build(),
        }
    }

    /// Load (or reuse) the dataset behind `source`.
    pub fn from_source(source: &DatasetSource) -> LoadResult<Self> {
        Ok(Self::new(source.load()?))
    }

    /// The unfiltered dataset.
    pub fn data(&self) -> &DataSet {
        &self.data
    }

    pub fn topology(&self) -> &TopologyGraph {
        &self.topology
    }

    /// Sidebar multi-selects in display order. Options come from the unfiltered dataset.
    pub fn filter_options(&self) -> Vec<FilterOptions> {
        FILTER_COLUMNS
            .into_iter()
            .zip(FILTER_LABELS)
            .map(|(column, label)| FilterOptions {
                column,
                label,
                values: unique_values(&self.data, column),
            })
            .collect()
    }

    /// Rows left after applying `selection`.
    pub fn filtered(&self, selection: &FilterSelection) -> DataSet {
        apply(&self.data, selection)
    }

    /// Every chart for `selection`, in page order.
    pub fn charts(
        &self,
        selection: &FilterSelection,
    ) -> Vec<(ChartId, Result<ChartOutcome, AggregateError>)> {
        let filtered = self.filtered(selection);
        ChartId::ALL
            .into_iter()
            .map(|id| (id, charts::build(id, &filtered)))
            .collect()
    }

    /// Render the whole page for `selection`.
    ///
    /// Charts that cannot be drawn become notices; the rest of the page is unaffected.
    pub fn render<R: ChartRenderer + ?Sized>(&self, selection: &FilterSelection, renderer: &mut R) {
        renderer.title(TITLE);

        for (id, outcome) in self.charts(selection) {
            renderer.subheader(id.subheader());
            match outcome {
                Ok(ChartOutcome::Ready(chart)) => renderer.chart(&chart),
                Ok(ChartOutcome::Skipped(warning)) => {
                    renderer.notice(&Notice::MissingColumns(warning))
                }
                Err(AggregateError::EmptyDataset) => renderer.notice(&Notice::NoData { chart: id }),
                Err(e) => renderer.notice(&Notice::Failed {
                    chart: id,
                    message: e.to_string(),
                }),
            }
        }

        renderer.subheader(DIAGRAM_SUBHEADER);
        renderer.diagram(&self.topology);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{DIAGRAM_SUBHEADER, Dashboard, TITLE};
    use crate::charts::ChartId;
    use crate::nrw::{FILTER_COLUMNS, PRESSURE_COLUMNS, nrw_schema};
    use crate::processing::FilterSelection;
    use crate::render::{Notice, RenderedItem, SnapshotRenderer};
    use crate::types::{DataSet, Schema, Value};

    fn row(user: &str, area: &str, device: &str, weather: &str, month: i64, c: f64) -> Vec<Value> {
        let mut r = vec![
            Value::from(user),
            Value::from(area),
            Value::from(device),
            Value::from(weather),
            Value::Int64(2023),
            Value::Int64(month),
            Value::Float64(c),
            Value::Float64(60.0),
            Value::Float64(80.0),
        ];
        r.extend([Value::Float64(3.2), Value::Float64(2.1), Value::Float64(1.4)]);
        r
    }

    fn dashboard() -> Dashboard {
        let ds = DataSet::new(
            nrw_schema(),
            vec![
                row("1", "A1", "Device_1", "Sunny", 1, 10.0),
                row("2", "A1", "Device_2", "Rainy", 1, 20.0),
                row("4", "A2", "Device_4", "Sunny", 2, 30.0),
            ],
        );
        Dashboard::new(Arc::new(ds))
    }

    fn without_pressure(dash: &Dashboard) -> Dashboard {
        let ds = dash.data();
        let n = ds.schema.fields.len() - PRESSURE_COLUMNS.len();
        let schema = Schema::new(ds.schema.fields[..n].to_vec());
        let rows = ds.rows.iter().map(|r| r[..n].to_vec()).collect();
        Dashboard::new(Arc::new(DataSet::new(schema, rows)))
    }

    #[test]
    fn filter_options_list_distinct_values() {
        let opts = dashboard().filter_options();
        let columns: Vec<_> = opts.iter().map(|o| o.column).collect();
        assert_eq!(columns, vec!["User_ID", "Area_Code", "Device_ID", "Weather_Condition"]);
        assert_eq!(columns, FILTER_COLUMNS.to_vec());
        assert_eq!(opts[0].label, "Select User IDs");
        assert_eq!(opts[1].values, vec![Value::from("A1"), Value::from("A2")]);
        assert_eq!(opts[3].label, "Select Weather Conditions");
    }

    #[test]
    fn full_page_renders_in_order() {
        let mut r = SnapshotRenderer::new();
        dashboard().render(&FilterSelection::new(), &mut r);

        assert_eq!(r.items.first(), Some(&RenderedItem::Title { text: TITLE.to_string() }));
        let ids: Vec<_> = r.charts().map(|c| c.id).collect();
        assert_eq!(ids, ChartId::ALL.to_vec());
        assert_eq!(r.notices().count(), 0);

        match r.items.last() {
            Some(RenderedItem::Diagram { nodes, edges, .. }) => {
                assert_eq!((*nodes, *edges), (34, 33));
            }
            other => panic!("expected diagram last, got {other:?}"),
        }
        assert_eq!(
            r.items[r.items.len() - 2],
            RenderedItem::Subheader { text: DIAGRAM_SUBHEADER.to_string() }
        );
    }

    #[test]
    fn filters_narrow_every_data_chart() {
        let dash = dashboard();
        let sel = FilterSelection::new().with("Area_Code", ["A1"]);
        let mut r = SnapshotRenderer::new();
        dash.render(&sel, &mut r);

        let monthly = r.charts().find(|c| c.id == ChartId::MonthlyConsumption).unwrap();
        assert_eq!(monthly.series.len(), 1);
        assert_eq!(monthly.series.points[0].value(), Some(30.0));
        assert_eq!(dash.data().row_count(), 3);
    }

    #[test]
    fn empty_selection_result_shows_notices_but_keeps_fixed_content() {
        let sel = FilterSelection::new().with("User_ID", ["999"]);
        let mut r = SnapshotRenderer::new();
        dashboard().render(&sel, &mut r);

        let charts: Vec<_> = r.charts().map(|c| c.id).collect();
        assert_eq!(charts, vec![ChartId::MonthlyLeakage]);
        let notices: Vec<_> = r.notices().collect();
        assert_eq!(notices.len(), 6);
        assert!(notices.iter().all(|n| matches!(n, Notice::NoData { .. })));
        assert!(matches!(r.items.last(), Some(RenderedItem::Diagram { .. })));
    }

    #[test]
    fn missing_pressure_columns_become_a_warning() {
        let dash = without_pressure(&dashboard());
        let mut r = SnapshotRenderer::new();
        dash.render(&FilterSelection::new(), &mut r);

        let notices: Vec<_> = r.notices().collect();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].chart(), ChartId::Pressure);
        assert!(matches!(notices[0], Notice::MissingColumns(_)));
        assert_eq!(r.charts().count(), 6);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let mut r = SnapshotRenderer::new();
        dashboard().render(&FilterSelection::new(), &mut r);
        let json = r.to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let items = parsed.as_array().unwrap();
        assert_eq!(items[0]["type"], "title");
        assert!(json.contains("\"date\": \"2023-01-01\""));
        assert!(json.contains("rankdir=LR"));
    }
}
