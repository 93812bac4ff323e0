use log::debug;

use crate::error::{Error, Result};
use crate::model::{ImportedGraph, VariableKind};

/// Pass 4: check structural integrity of the fully materialized graph.
/// Inspects only; never mutates.
pub fn validate(graph: &ImportedGraph) -> Result<()> {
    // Placeholder/producer consistency. A variable added with no shape can be
    // mistaken for a placeholder when the shape simply was not available at
    // import time, so a placeholder that turns out to be an operation output
    // is noted, not rejected; the producer reference is authoritative.
    for variable in graph.variables() {
        if variable.kind == VariableKind::Placeholder {
            if let Some(producer) = &variable.output_of {
                debug!(
                    "variable \"{}\" is classified as a placeholder but is the output of \"{}\"",
                    variable.name, producer
                );
            }
        }

        for dep in &variable.control_deps {
            if graph.variable(dep).is_none() {
                debug!(
                    "control dependency \"{}\" of variable \"{}\" does not resolve to a variable",
                    dep, variable.name
                );
            }
        }
    }

    // Every operation input must resolve to a real variable
    for op in graph.operations() {
        for input in &op.inputs {
            if graph.variable(input).is_none() {
                return Err(Error::DanglingInput {
                    op: op.name.clone(),
                    op_type: op.op_type.clone(),
                    input: input.clone(),
                });
            }
        }
    }

    Ok(())
}
