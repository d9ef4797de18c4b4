//! Graph export for dependency visualization.
//!
//! A [`DependencyGraph`] is computed from a [`Catalog`] alone: edges are
//! derived with the same provider selection the wirer uses, but nothing is
//! instantiated. The result can be rendered as JSON, YAML or Graphviz DOT.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::descriptors::{Injection, TypeDescriptor};
use crate::error::{DiError, DiResult};

/// A manageable type in the dependency graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Stable identifier, unique within the graph
    pub id: String,
    pub type_name: String,
    pub module: String,
    /// `singleton` or `prototype`
    pub lifetime: String,
    /// Capabilities declared by the type itself
    pub capabilities: Vec<String>,
    pub supertype: Option<String>,
}

/// Kind of injection behind an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyType {
    /// Field typed by a concrete managed type
    Concrete,
    /// Field typed by a capability, resolved by declaration
    Capability,
    /// Capability field with an explicit target
    Targeted,
}

/// A marked field of `from`, satisfied by an instance of `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub field: String,
    /// Declared type of the field
    pub declared_type: String,
    pub dependency_type: DependencyType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetadata {
    pub node_count: usize,
    pub edge_count: usize,
    pub singleton_count: usize,
    pub prototype_count: usize,
    /// RFC 3339 timestamp
    pub exported_at: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub metadata: GraphMetadata,
}

/// Export formats supported for dependency graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
    /// Graphviz
    Dot,
}

impl DependencyGraph {
    /// Computes the graph of every manageable type in `catalog`.
    ///
    /// Fails with the same error wiring would raise when a marked field has no
    /// provider.
    pub fn from_catalog(catalog: &Catalog) -> DiResult<Self> {
        let mut ids = HashMap::new();
        let mut nodes = Vec::with_capacity(catalog.len());
        for descriptor in catalog.iter() {
            let id = format!("type_{}", nodes.len());
            ids.insert(descriptor.key(), id.clone());
            nodes.push(GraphNode {
                id,
                type_name: descriptor.name().to_string(),
                module: descriptor.module().to_string(),
                lifetime: descriptor
                    .lifetime()
                    .map(|l| l.to_string())
                    .unwrap_or_default(),
                capabilities: descriptor
                    .capabilities()
                    .iter()
                    .map(|c| c.display_name().to_string())
                    .collect(),
                supertype: descriptor.supertype().map(|s| s.display_name().to_string()),
            });
        }

        let mut edges = Vec::new();
        for descriptor in catalog.iter() {
            let from = &ids[&descriptor.key()];
            let mut layer: Option<&TypeDescriptor> = Some(descriptor.as_ref());
            while let Some(current) = layer {
                for field in current.fields().iter().filter(|f| f.is_marked()) {
                    let provider = catalog.provider_for(field)?;
                    let to = ids.get(&provider.key()).ok_or_else(|| {
                        DiError::Consistency(format!("{} is not manageable", provider.name()))
                    })?;
                    let dependency_type = match field.injection() {
                        Some(Injection::Capability { target: Some(_) }) => DependencyType::Targeted,
                        Some(Injection::Capability { target: None }) => DependencyType::Capability,
                        _ => DependencyType::Concrete,
                    };
                    edges.push(GraphEdge {
                        from: from.clone(),
                        to: to.clone(),
                        field: field.name().to_string(),
                        declared_type: field.declared_type().display_name().to_string(),
                        dependency_type,
                    });
                }
                layer = catalog.supertype_of(current).map(|s| s.as_ref());
            }
        }

        let singleton_count = catalog.singletons().count();
        let metadata = GraphMetadata {
            node_count: nodes.len(),
            edge_count: edges.len(),
            singleton_count,
            prototype_count: nodes.len() - singleton_count,
            exported_at: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        };

        Ok(Self {
            nodes,
            edges,
            metadata,
        })
    }

    pub fn export(&self, format: ExportFormat) -> DiResult<String> {
        match format {
            ExportFormat::Json => self.to_json(),
            ExportFormat::Yaml => self.to_yaml(),
            ExportFormat::Dot => Ok(self.to_dot()),
        }
    }

    pub fn to_json(&self) -> DiResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DiError::TypeMismatch(format!("JSON serialization failed: {e}")))
    }

    pub fn to_yaml(&self) -> DiResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| DiError::TypeMismatch(format!("YAML serialization failed: {e}")))
    }

    /// Renders the graph for Graphviz. Singletons are blue boxes, prototypes
    /// yellow; capability edges are dashed.
    pub fn to_dot(&self) -> String {
        let mut output = String::new();
        output.push_str("digraph DependencyGraph {\n");
        output.push_str("  rankdir=TB;\n");
        output.push_str("  node [shape=box, style=filled];\n\n");

        for node in &self.nodes {
            let color = match node.lifetime.as_str() {
                "singleton" => "lightblue",
                "prototype" => "lightyellow",
                _ => "white",
            };
            output.push_str(&format!(
                "  \"{}\" [label=\"{}\\n({})\", fillcolor={}];\n",
                node.id,
                escape(&node.type_name),
                node.lifetime,
                color
            ));
        }

        output.push('\n');

        for edge in &self.edges {
            let style = match edge.dependency_type {
                DependencyType::Concrete => "solid",
                DependencyType::Capability => "dashed",
                DependencyType::Targeted => "bold",
            };
            output.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{}\", style={}];\n",
                edge.from,
                edge.to,
                escape(&edge.field),
                style
            ));
        }

        output.push_str("}\n");
        output
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
