//! The boundary to whatever draws the page.
//!
//! [`crate::dashboard::Dashboard::render`] walks the page top to bottom and calls a
//! [`ChartRenderer`] for each element. [`SnapshotRenderer`] records the calls as serializable
//! items, which is how a web front end (or a test) receives the page.

use std::fmt;

use serde::Serialize;

use crate::charts::{Chart, ChartId, MissingColumnsWarning};
use crate::topology::TopologyGraph;

/// Something shown in place of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum Notice {
    /// The chart needs columns the dataset does not have.
    MissingColumns(MissingColumnsWarning),
    /// The filters exclude every row.
    NoData { chart: ChartId },
    /// The chart could not be computed.
    Failed { chart: ChartId, message: String },
}

impl Notice {
    pub fn chart(&self) -> ChartId {
        match self {
            Notice::MissingColumns(w) => w.chart,
            Notice::NoData { chart } | Notice::Failed { chart, .. } => *chart,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::MissingColumns(w) => fmt::Display::fmt(w, f),
            Notice::NoData { .. } => f.write_str("No records match the selected filters."),
            Notice::Failed { message, .. } => write!(f, "Chart unavailable: {message}"),
        }
    }
}

/// Receives the page elements in display order.
pub trait ChartRenderer {
    /// Page title.
    fn title(&mut self, _text: &str) {}

    /// Section heading.
    fn subheader(&mut self, _text: &str) {}

    fn chart(&mut self, chart: &Chart);

    fn diagram(&mut self, graph: &TopologyGraph);

    fn notice(&mut self, notice: &Notice);
}

/// One recorded page element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderedItem {
    Title { text: String },
    Subheader { text: String },
    Chart { chart: Chart },
    Diagram { dot: String, nodes: usize, edges: usize },
    Notice { message: String, detail: Notice },
}

/// Records every call for later inspection or serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapshotRenderer {
    pub items: Vec<RenderedItem>,
}

impl SnapshotRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded charts in page order.
    pub fn charts(&self) -> impl Iterator<Item = &Chart> {
        self.items.iter().filter_map(|item| match item {
            RenderedItem::Chart { chart } => Some(chart),
            _ => None,
        })
    }

    /// Recorded notices in page order.
    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter().filter_map(|item| match item {
            RenderedItem::Notice { detail, .. } => Some(detail),
            _ => None,
        })
    }

    /// The page as a JSON document.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.items)
    }
}

impl ChartRenderer for SnapshotRenderer {
    fn title(&mut self, text: &str) {
        self.items.push(RenderedItem::Title {
            text: text.to_string(),
        });
    }

    fn subheader(&mut self, text: &str) {
        self.items.push(RenderedItem::Subheader {
            text: text.to_string(),
        });
    }

    fn chart(&mut self, chart: &Chart) {
        self.items.push(RenderedItem::Chart {
            chart: chart.clone(),
        });
    }

    fn diagram(&mut self, graph: &TopologyGraph) {
        self.items.push(RenderedItem::Diagram {
            dot: graph.to_dot(),
            nodes: graph.node_count(),
            edges: graph.edge_count(),
        });
    }

    fn notice(&mut self, notice: &Notice) {
        self.items.push(RenderedItem::Notice {
            message: notice.to_string(),
            detail: notice.clone(),
        });
    }
}
