use log::{debug, warn};

use crate::error::{Error, Result};
use crate::importer::ImportState;
use crate::model::{DataType, TensorValue, Variable, VariableKind};
use crate::ops::OpRegistry;

/// Pass 3: resolve, for every operation, which variables are its outputs.
///
/// Operations lacking declared output names get deterministic synthesized
/// ones: slot 0 reuses the operation's own name, further slots append the
/// slot index. Repeated imports of the same foreign graph therefore produce
/// identical names.
pub fn bind_outputs(state: &mut ImportState, registry: &OpRegistry) -> Result<()> {
    let op_names: Vec<String> = state.graph().operations().map(|o| o.name.clone()).collect();

    for op_name in &op_names {
        // Clone what the binding needs before mutating the variable arena
        let (op_type, inputs, declared) = {
            let op = state
                .graph()
                .operation(op_name)
                .ok_or_else(|| Error::InvalidGraph(format!("operation \"{}\" vanished", op_name)))?;
            (op.op_type.clone(), op.inputs.clone(), op.outputs.clone())
        };

        let outputs = if declared.is_empty() {
            // Registered output count; translation already proved the lookup
            let count = registry
                .lookup(&op_type)
                .map(|d| d.output_count.max(1))
                .unwrap_or(1);
            (0..count)
                .map(|slot| {
                    if slot == 0 {
                        op_name.clone()
                    } else {
                        format!("{}:{}", op_name, slot)
                    }
                })
                .collect()
        } else {
            declared
        };

        // New output variables inherit the data type of the first input that
        // resolves to a materialized variable
        let inferred_dtype = inputs
            .iter()
            .find_map(|i| state.graph().variable(i).map(|v| v.data_type))
            .unwrap_or(DataType::Float32);

        for output in &outputs {
            let existing = state
                .graph()
                .variable(output)
                .map(|v| (v.output_of.clone(), v.kind));
            if let Some((prior_producer, kind)) = existing {
                if let Some(first) = prior_producer {
                    if first != *op_name {
                        return Err(Error::DuplicateOutput {
                            output: output.clone(),
                            first,
                            second: op_name.clone(),
                        });
                    }
                }
                if kind == VariableKind::Placeholder {
                    // Apparent placeholder that is actually produced by an
                    // operation; the producer reference is authoritative
                    debug!(
                        "placeholder \"{}\" is also the output of \"{}\"",
                        output, op_name
                    );
                }
                if let Some(variable) = state.graph_mut().variable_mut(output) {
                    variable.output_of = Some(op_name.clone());
                }
            } else {
                state.graph_mut().add_variable(Variable {
                    name: output.clone(),
                    kind: VariableKind::Array,
                    data_type: inferred_dtype,
                    shape: None,
                    value: None,
                    output_of: Some(op_name.clone()),
                    control_deps: Vec::new(),
                })?;
            }
        }

        if let Some(op) = state.graph_mut().operation_mut(op_name) {
            op.outputs = outputs;
        }
    }

    substitute_string_constants(state);

    Ok(())
}

/// String values that are not the output of any operation cannot be used in
/// numeric execution, but downstream consumers still expect *a* value there.
/// They are imported as scalar 0 rather than rejected. Deliberate fidelity
/// tradeoff, kept as documented behavior.
fn substitute_string_constants(state: &mut ImportState) {
    let names: Vec<String> = state
        .string_vars()
        .iter()
        .filter(|(_, is_constant)| *is_constant)
        .map(|(name, _)| name.clone())
        .collect();

    for name in names {
        if let Some(variable) = state.graph_mut().variable_mut(&name) {
            if variable.output_of.is_none() {
                warn!(
                    "string variable \"{}\" imported as a fixed scalar 0 value",
                    name
                );
                variable.value = Some(TensorValue::scalar_f32(0.0));
            }
        }
    }
}
