use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::foreign::ForeignNode;
use crate::importer::ImportState;
use crate::model::Operation;
use crate::ops::{OpRegistry, PropertyMappings};

/// Pass 2: translate one foreign node into an internal operation.
///
/// Inputs are bound by name without an existence check; foreign input lists
/// routinely reference entities declared later, so resolution is deferred to
/// the structural validator.
pub fn translate(
    node: &ForeignNode,
    state: &mut ImportState,
    registry: &OpRegistry,
    mappings: &PropertyMappings,
) -> Result<()> {
    if registry.lookup(&node.op_type).is_none() {
        return Err(Error::UnknownOperation {
            node: node.name.clone(),
            op_type: node.op_type.clone(),
        });
    }

    let name = if node.name.is_empty() {
        state.synth_op_name(&node.op_type)
    } else {
        node.name.clone()
    };

    let mut properties = HashMap::new();
    if let Some(rules) = mappings.for_op(&node.op_type) {
        for rule in rules {
            if let Some(attr) = node.attrs.get(&rule.foreign_attr) {
                properties.insert(rule.field.clone(), rule.transform.apply(attr)?);
            }
        }
    }

    state.graph_mut().add_operation(Operation {
        name,
        op_type: node.op_type.clone(),
        inputs: node.inputs.clone(),
        outputs: node.outputs.clone(),
        properties,
    })
}
