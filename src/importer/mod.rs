//! The import pipeline.
//!
//! Four strictly sequential passes per import call: variable materialization,
//! node translation, output binding, structural validation. Later passes rely
//! on every write of the earlier ones being visible, so the ordering is an
//! invariant. Any error aborts the entire import; the partially built graph
//! is dropped and never reaches the caller.

pub mod graph_loader;
pub mod materializer;
pub mod output_binder;
pub mod resolver;
pub mod translator;
pub mod validator;

use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;
use crate::foreign::{GraphAccessor, WireGraph};
use crate::model::ImportedGraph;
use crate::ops::{OpRegistry, PropertyMappings};

/// Import policy knobs
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Operation-type tags whose nodes are not translated
    pub ops_to_ignore: HashSet<String>,
    /// Node names exempt from the ignore set
    pub ignore_exempt_nodes: HashSet<String>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        let ops_to_ignore = ["NoOp", "Assert"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        ImportOptions {
            ops_to_ignore,
            ignore_exempt_nodes: HashSet::new(),
        }
    }
}

/// Mutable state threaded through the import passes.
///
/// Owns the graph under construction; [`ImportState::into_graph`] is the only
/// way the graph escapes, and the pipeline calls it only after validation.
pub struct ImportState {
    graph: ImportedGraph,
    /// String-typed variable names and whether each is a constant, collected
    /// during materialization for the binder's substitution pass
    string_vars: Vec<(String, bool)>,
    synthesized_ops: usize,
}

impl ImportState {
    fn new() -> Self {
        ImportState {
            graph: ImportedGraph::new(),
            string_vars: Vec::new(),
            synthesized_ops: 0,
        }
    }

    pub fn graph(&self) -> &ImportedGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut ImportedGraph {
        &mut self.graph
    }

    pub(crate) fn record_string_var(&mut self, name: &str, is_constant: bool) {
        self.string_vars.push((name.to_string(), is_constant));
    }

    pub(crate) fn string_vars(&self) -> &[(String, bool)] {
        &self.string_vars
    }

    /// Deterministic name for a foreign node that carries none
    pub(crate) fn synth_op_name(&mut self, op_type: &str) -> String {
        let name = format!("{}_{}", op_type.to_ascii_lowercase(), self.synthesized_ops);
        self.synthesized_ops += 1;
        name
    }

    fn into_graph(self) -> ImportedGraph {
        self.graph
    }
}

/// Imports foreign graphs into [`ImportedGraph`] instances.
///
/// The registry and the property mapping table are injected collaborators;
/// [`GraphImporter::new`] wires in the standard ones.
pub struct GraphImporter {
    registry: OpRegistry,
    mappings: PropertyMappings,
    options: ImportOptions,
}

impl Default for GraphImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphImporter {
    pub fn new() -> Self {
        GraphImporter {
            registry: OpRegistry::with_standard_ops(),
            mappings: PropertyMappings::standard(),
            options: ImportOptions::default(),
        }
    }

    pub fn with_collaborators(
        registry: OpRegistry,
        mappings: PropertyMappings,
        options: ImportOptions,
    ) -> Self {
        GraphImporter {
            registry,
            mappings,
            options,
        }
    }

    /// Import a serialized foreign graph from a file
    pub fn import_path(&self, path: &Path) -> Result<ImportedGraph> {
        let def = graph_loader::load_graph_file(path)?;
        self.import(&WireGraph::new(def))
    }

    /// Import a serialized foreign graph from bytes, trying the binary
    /// encoding first and falling back to the text encoding
    pub fn import_bytes(&self, bytes: &[u8]) -> Result<ImportedGraph> {
        let def = graph_loader::load_graph_bytes(bytes)?;
        self.import(&WireGraph::new(def))
    }

    /// Import an already in-memory foreign graph
    pub fn import<A: GraphAccessor>(&self, foreign: &A) -> Result<ImportedGraph> {
        let mut state = ImportState::new();

        materializer::materialize_all(foreign, &mut state)?;

        for node in foreign.nodes() {
            if self.options.ops_to_ignore.contains(&node.op_type)
                && !self.options.ignore_exempt_nodes.contains(&node.name)
            {
                continue;
            }
            translator::translate(node, &mut state, &self.registry, &self.mappings)?;
        }

        output_binder::bind_outputs(&mut state, &self.registry)?;

        validator::validate(state.graph())?;

        Ok(state.into_graph())
    }
}
