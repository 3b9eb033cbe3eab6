//! The water distribution network diagram.
//!
//! The network is fixed: one tank feeds a main device, which feeds four area devices, each
//! supplying one area of three users, each user metered by one device. Nothing here reads the
//! dataset.

use std::collections::HashMap;
use std::fmt::Write as _;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

/// Number of areas (and area devices).
pub const AREA_COUNT: u32 = 4;
/// Users supplied by each area.
pub const USERS_PER_AREA: u32 = 3;
/// Number of users (and user devices).
pub const USER_COUNT: u32 = AREA_COUNT * USERS_PER_AREA;
/// Tank capacity in liters; also the daily supply on the tank edge.
pub const TANK_CAPACITY_LITERS: u32 = 100_000;
/// Tank fill percentages that raise an alert.
pub const TANK_ALERT_LEVELS: [u32; 4] = [25, 50, 75, 100];

/// Area that supplies user `user`. Both indices start at 1; `None` for user 0.
pub fn area_of_user(user: u32) -> Option<u32> {
    Some(user.checked_sub(1)? / USERS_PER_AREA + 1)
}

/// What a node stands for. Indices are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum NodeKind {
    Tank,
    MainDevice,
    AreaDevice(u32),
    Area(u32),
    User(u32),
    UserDevice(u32),
}

impl NodeKind {
    /// Stable identifier, also used as the DOT node name.
    pub fn id(self) -> String {
        match self {
            NodeKind::Tank => "Tank".to_string(),
            NodeKind::MainDevice => "MainDevice".to_string(),
            NodeKind::AreaDevice(i) => format!("AreaDevice{i}"),
            NodeKind::Area(i) => format!("Area{i}"),
            NodeKind::User(i) => format!("User{i}"),
            NodeKind::UserDevice(i) => format!("Device{i}"),
        }
    }

    fn label(self) -> String {
        match self {
            NodeKind::Tank => {
                let levels: Vec<String> =
                    TANK_ALERT_LEVELS.iter().map(|l| format!("{l}%")).collect();
                format!(
                    "Water Tank\nCapacity: {} liters\nAlert Levels: {}",
                    thousands(TANK_CAPACITY_LITERS),
                    levels.join(", ")
                )
            }
            NodeKind::MainDevice => "Main Device\nDevice ID: Main_Device".to_string(),
            NodeKind::AreaDevice(i) => format!("Area Device {i}\nConnected Pipeline {i}"),
            NodeKind::Area(i) => format!("Area {i}\nPopulation: {}", 100 + i * 50),
            NodeKind::User(i) => format!("User {i}\nUsage: {} liters/day", 100 + i * 10),
            NodeKind::UserDevice(i) => format!("Device {i}\nID: Device_{i}"),
        }
    }

    fn shape(self) -> Shape {
        match self {
            NodeKind::Area(_) | NodeKind::User(_) => Shape::Ellipse,
            _ => Shape::Box,
        }
    }

    fn fill(self) -> Option<&'static str> {
        match self {
            NodeKind::Tank => Some("lightblue"),
            NodeKind::MainDevice => Some("lightgrey"),
            NodeKind::AreaDevice(_) => Some("purple"),
            NodeKind::Area(_) => Some("yellow"),
            NodeKind::User(_) => None,
            NodeKind::UserDevice(_) => Some("lightpink"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Box,
    Ellipse,
}

/// A node of the diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologyNode {
    pub kind: NodeKind,
    pub id: String,
    pub label: String,
    pub shape: Shape,
    /// Fill colour; unfilled when `None`.
    pub fill: Option<&'static str>,
}

impl TopologyNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            id: kind.id(),
            label: kind.label(),
            shape: kind.shape(),
            fill: kind.fill(),
        }
    }
}

/// A water-flow edge of the diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologyEdge {
    pub label: String,
}

/// The fixed network diagram.
#[derive(Debug, Clone)]
pub struct TopologyGraph {
    graph: DiGraph<TopologyNode, TopologyEdge>,
    indices: HashMap<String, NodeIndex>,
}

impl Default for TopologyGraph {
    fn default() -> Self {
        Self::build()
    }
}

impl TopologyGraph {
    /// Build the diagram. Always 34 nodes and 33 edges.
    pub fn build() -> Self {
        let mut topo = Self {
            graph: DiGraph::new(),
            indices: HashMap::new(),
        };

        let tank = topo.add_node(NodeKind::Tank);
        let main = topo.add_node(NodeKind::MainDevice);
        let area_devices: Vec<_> = (1..=AREA_COUNT)
            .map(|i| topo.add_node(NodeKind::AreaDevice(i)))
            .collect();
        let areas: Vec<_> = (1..=AREA_COUNT)
            .map(|i| topo.add_node(NodeKind::Area(i)))
            .collect();
        let mut users = Vec::with_capacity(USER_COUNT as usize);
        let mut devices = Vec::with_capacity(USER_COUNT as usize);
        for i in 1..=USER_COUNT {
            users.push(topo.add_node(NodeKind::User(i)));
            devices.push(topo.add_node(NodeKind::UserDevice(i)));
        }

        topo.add_edge(
            tank,
            main,
            format!(
                "Water Supply\nTotal: {} liters/day",
                thousands(TANK_CAPACITY_LITERS)
            ),
        );
        for (i, (&device, &area)) in (1..).zip(area_devices.iter().zip(&areas)) {
            topo.add_edge(main, device, format!("Pipeline {i}"));
            topo.add_edge(device, area, format!("To Area {i}"));
        }
        for (u, (&user, &device)) in (1..).zip(users.iter().zip(&devices)) {
            if let Some(&area) = area_of_user(u).and_then(|a| areas.get(a as usize - 1)) {
                topo.add_edge(area, user, format!("Supply to User {u}"));
            }
            topo.add_edge(user, device, format!("Connected to Device {u}"));
        }

        topo
    }

    fn add_node(&mut self, kind: NodeKind) -> NodeIndex {
        let node = TopologyNode::new(kind);
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.indices.insert(id, idx);
        idx
    }

    fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, label: String) {
        self.graph.add_edge(from, to, TopologyEdge { label });
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &TopologyNode> {
        self.graph.raw_nodes().iter().map(|n| &n.weight)
    }

    /// Edges in insertion order as `(from, to, edge)`.
    pub fn edges(&self) -> impl Iterator<Item = (&TopologyNode, &TopologyNode, &TopologyEdge)> {
        self.graph
            .raw_edges()
            .iter()
            .map(|e| (&self.graph[e.source()], &self.graph[e.target()], &e.weight))
    }

    /// Node by id (e.g. `"Area2"`).
    pub fn node(&self, id: &str) -> Option<&TopologyNode> {
        self.indices.get(id).map(|&idx| &self.graph[idx])
    }

    /// Nodes fed directly by `id`, in the order the edges were added.
    pub fn successors(&self, id: &str) -> Vec<&TopologyNode> {
        let Some(&idx) = self.indices.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<&TopologyNode> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|n| &self.graph[n])
            .collect();
        // petgraph walks adjacency lists newest-first.
        out.reverse();
        out
    }

    /// Graphviz DOT source for the diagram, laid out left to right.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        out.push_str("// Water Distribution Network\ndigraph {\n\trankdir=LR\n");
        for node in self.nodes() {
            let _ = write!(
                out,
                "\t{} [label=\"{}\" shape={}",
                node.id,
                escape(&node.label),
                match node.shape {
                    Shape::Box => "box",
                    Shape::Ellipse => "ellipse",
                }
            );
            if let Some(fill) = node.fill {
                let _ = write!(out, " color={fill} style=filled");
            }
            out.push_str("]\n");
        }
        for (from, to, edge) in self.edges() {
            let _ = writeln!(out, "\t{} -> {} [label=\"{}\"]", from.id, to.id, escape(&edge.label));
        }
        out.push_str("}\n");
        out
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
