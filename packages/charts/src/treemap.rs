//! Treemap option for the barangay / incident type / offense type
//! hierarchy.
//!
//! Built as a raw option object: area and colour both follow the leaf
//! counts, with parents summing their children.

use accident_dashboard_analytics_models::HierarchyCount;
use serde_json::{Value, json};

use crate::gradient::VIRIDIS;

/// A node of the nested treemap data.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    name: String,
    value: u64,
    children: Vec<Self>,
}

impl Node {
    fn child(&mut self, name: &str) -> &mut Self {
        // Input is sorted by path, so a matching sibling is always the last.
        if self.children.last().is_none_or(|c| c.name != name) {
            self.children.push(Self {
                name: name.to_owned(),
                value: 0,
                children: Vec::new(),
            });
        }
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    fn to_json(&self) -> Value {
        if self.children.is_empty() {
            json!({ "name": self.name, "value": self.value })
        } else {
            json!({
                "name": self.name,
                "value": self.value,
                "children": self.children.iter().map(Self::to_json).collect::<Vec<_>>(),
            })
        }
    }
}

/// Nests path counts (sorted by path) into barangay → incident type →
/// offense type nodes.
fn nest(paths: &[HierarchyCount]) -> Vec<Node> {
    let mut root = Node {
        name: String::new(),
        value: 0,
        children: Vec::new(),
    };
    for path in paths {
        let barangay = root.child(&path.barangay);
        barangay.value += path.count;
        let incident = barangay.child(&path.incident_type);
        incident.value += path.count;
        let offense = incident.child(&path.offense_type);
        offense.value += path.count;
    }
    root.children
}

/// Builds the ECharts treemap option for the hierarchy counts.
#[must_use]
pub fn offense_treemap_options(paths: &[HierarchyCount]) -> Value {
    let nodes = nest(paths);
    let max = paths.iter().map(|p| p.count).max().unwrap_or(0);
    let min = paths.iter().map(|p| p.count).min().unwrap_or(0);
    let level = json!({
        "color": VIRIDIS,
        "colorMappingBy": "value",
        "itemStyle": { "borderWidth": 2, "gapWidth": 2 },
        "upperLabel": { "show": true },
    });

    json!({
        "tooltip": { "trigger": "item" },
        "series": [{
            "type": "treemap",
            "name": "count",
            "width": 800,
            "height": 650,
            "top": 50,
            "left": 25,
            "right": 25,
            "bottom": 25,
            "visualMin": min,
            "visualMax": max,
            "visualDimension": 0,
            "leafDepth": null,
            "breadcrumb": { "show": true },
            "levels": [level.clone(), level.clone(), level],
            "data": nodes.iter().map(Node::to_json).collect::<Vec<_>>(),
        }],
    })
}
