use crate::error::{Error, Result};
use crate::foreign::GraphAccessor;
use crate::importer::{resolver, ImportState};
use crate::model::{DataType, Variable, VariableKind};

/// Pass 1: create an internal variable for every foreign value entity.
///
/// Runs exactly once, before any node translation, iterating tensors in the
/// order the accessor exposes them. Entities the format's skip policy flags
/// are omitted from the graph entirely; that is policy, not an error.
pub fn materialize_all<A: GraphAccessor>(foreign: &A, state: &mut ImportState) -> Result<()> {
    for tensor in foreign.tensors() {
        if foreign.should_skip(tensor) {
            continue;
        }

        let resolution = resolver::resolve(tensor)?;

        let value = match resolution.kind {
            VariableKind::Placeholder => None,
            VariableKind::Constant => Some(tensor.value.clone().ok_or_else(|| {
                Error::MissingConstantValue {
                    tensor: tensor.name.clone(),
                }
            })?),
            // A cached value on a computed tensor is attached as an initial
            // value without changing the kind
            VariableKind::Array | VariableKind::Ordinary => tensor.value.clone(),
        };

        if resolution.data_type == DataType::String {
            state.record_string_var(&tensor.name, resolution.kind == VariableKind::Constant);
        }

        let variable = Variable {
            name: tensor.name.clone(),
            kind: resolution.kind,
            data_type: resolution.data_type,
            shape: resolution.shape,
            value,
            output_of: None,
            // Stored verbatim; the referenced names need not exist yet
            control_deps: foreign.control_deps(tensor),
        };

        state.graph_mut().add_variable(variable)?;
    }

    Ok(())
}
