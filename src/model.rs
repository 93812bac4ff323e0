use std::collections::{HashMap, VecDeque};

use half::{bf16, f16};
use ndarray::{ArrayD, IxDyn};
use num_traits::ToPrimitive;

use crate::error::{Error, Result};

/// Data types a variable can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Undefined,
    Float32,
    Float64,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Bool,
    String,
    Float16,
    BFloat16,
}

impl DataType {
    /// Decode the wire-format type tag. Unrecognized tags map to `Undefined`,
    /// which the type resolver treats as fatal.
    pub fn from_wire(tag: i32) -> Self {
        match tag {
            1 => DataType::Float32,
            2 => DataType::Float64,
            3 => DataType::Int8,
            4 => DataType::Int16,
            5 => DataType::Int32,
            6 => DataType::Int64,
            7 => DataType::Uint8,
            8 => DataType::Uint16,
            9 => DataType::Uint32,
            10 => DataType::Uint64,
            11 => DataType::Bool,
            12 => DataType::String,
            13 => DataType::Float16,
            14 => DataType::BFloat16,
            _ => DataType::Undefined,
        }
    }

    /// Check if the data type is a floating point type
    pub fn is_floating_point(&self) -> bool {
        matches!(
            self,
            DataType::Float32 | DataType::Float64 | DataType::Float16 | DataType::BFloat16
        )
    }

    /// Check if the data type is an integer type
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::Uint8
                | DataType::Uint16
                | DataType::Uint32
                | DataType::Uint64
        )
    }

    /// Width of one element in bytes, if the type has a fixed width.
    pub fn byte_width(&self) -> Option<usize> {
        match self {
            DataType::Int8 | DataType::Uint8 | DataType::Bool => Some(1),
            DataType::Int16 | DataType::Uint16 | DataType::Float16 | DataType::BFloat16 => Some(2),
            DataType::Float32 | DataType::Int32 | DataType::Uint32 => Some(4),
            DataType::Float64 | DataType::Int64 | DataType::Uint64 => Some(8),
            DataType::String | DataType::Undefined => None,
        }
    }
}

/// Classification of an imported variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// Externally supplied input; has a type, possibly a shape, never a value
    Placeholder,
    /// Fixed value known at import time
    Constant,
    /// Symbolic value with unknown shape (typically the output of an operation)
    Array,
    /// Symbolic value with a known shape
    Ordinary,
}

/// Materialized tensor data, stored as little-endian bytes
#[derive(Debug, Clone, PartialEq)]
pub struct TensorValue {
    pub data_type: DataType,
    pub dims: Vec<i64>,
    pub data: Vec<u8>,
}

impl TensorValue {
    /// A rank-0 f32 value
    pub fn scalar_f32(value: f32) -> Self {
        TensorValue {
            data_type: DataType::Float32,
            dims: Vec::new(),
            data: value.to_le_bytes().to_vec(),
        }
    }

    pub fn element_count(&self) -> usize {
        self.dims.iter().product::<i64>().max(1) as usize
    }

    /// Decode the payload into f32 elements. Integer and half-precision
    /// payloads are widened; string payloads cannot be decoded numerically.
    pub fn as_f32_vec(&self) -> Result<Vec<f32>> {
        let widen_err = || {
            Error::InvalidGraph(format!(
                "cannot decode {:?} tensor payload as numeric data",
                self.data_type
            ))
        };

        match self.data_type {
            DataType::Float32 => Ok(self
                .data
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect()),
            DataType::Float64 => Ok(self
                .data
                .chunks_exact(8)
                .map(|c| {
                    f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]) as f32
                })
                .collect()),
            DataType::Float16 => Ok(self
                .data
                .chunks_exact(2)
                .map(|c| f16::from_le_bytes([c[0], c[1]]).to_f32())
                .collect()),
            DataType::BFloat16 => Ok(self
                .data
                .chunks_exact(2)
                .map(|c| bf16::from_le_bytes([c[0], c[1]]).to_f32())
                .collect()),
            DataType::Int32 => Ok(self
                .data
                .chunks_exact(4)
                .map(|c| {
                    i32::from_le_bytes([c[0], c[1], c[2], c[3]])
                        .to_f32()
                        .unwrap_or(f32::NAN)
                })
                .collect()),
            DataType::Int64 => Ok(self
                .data
                .chunks_exact(8)
                .map(|c| {
                    i64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
                        .to_f32()
                        .unwrap_or(f32::NAN)
                })
                .collect()),
            DataType::Uint8 | DataType::Bool => {
                Ok(self.data.iter().map(|&b| b as f32).collect())
            }
            _ => Err(widen_err()),
        }
    }

    /// View the payload as an n-dimensional f32 array
    pub fn to_ndarray(&self) -> Result<ArrayD<f32>> {
        let elements = self.as_f32_vec()?;
        let shape: Vec<usize> = self.dims.iter().map(|&d| d.max(0) as usize).collect();
        ArrayD::from_shape_vec(IxDyn(&shape), elements)
            .map_err(|e| Error::InvalidGraph(format!("tensor payload/shape mismatch: {}", e)))
    }
}

/// Operation property value, produced by the property mapping table
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Float(f64),
    Int(i64),
    Bool(bool),
    Str(String),
    Ints(Vec<i64>),
}

/// One node in the internal data-dependency graph
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub kind: VariableKind,
    pub data_type: DataType,
    /// `None` means the shape is unknown at import time, not that it is scalar
    pub shape: Option<Vec<i64>>,
    pub value: Option<TensorValue>,
    /// Name of the operation whose output this variable is, if any
    pub output_of: Option<String>,
    /// Control-dependency predecessors, stored as plain names and resolved late
    pub control_deps: Vec<String>,
}

/// One node in the internal computation graph
#[derive(Debug, Clone)]
pub struct Operation {
    pub name: String,
    pub op_type: String,
    pub inputs: Vec<String>,
    /// Empty until the output binder runs, unless the foreign node declared them
    pub outputs: Vec<String>,
    pub properties: HashMap<String, PropertyValue>,
}

/// The imported computation graph.
///
/// Variables and operations live in arenas ordered by insertion (declaration
/// order of the foreign graph); name indices give O(1) lookup. The importer
/// owns the graph while it is under construction and hands it to the caller
/// only once every pass has succeeded.
#[derive(Debug, Default)]
pub struct ImportedGraph {
    variables: Vec<Variable>,
    var_index: HashMap<String, usize>,
    operations: Vec<Operation>,
    op_index: HashMap<String, usize>,
}

impl ImportedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_variable(&mut self, variable: Variable) -> Result<()> {
        if self.var_index.contains_key(&variable.name) {
            return Err(Error::InvalidGraph(format!(
                "variable \"{}\" declared twice",
                variable.name
            )));
        }
        self.var_index
            .insert(variable.name.clone(), self.variables.len());
        self.variables.push(variable);
        Ok(())
    }

    pub fn add_operation(&mut self, operation: Operation) -> Result<()> {
        if self.op_index.contains_key(&operation.name) {
            return Err(Error::InvalidGraph(format!(
                "operation \"{}\" declared twice",
                operation.name
            )));
        }
        self.op_index
            .insert(operation.name.clone(), self.operations.len());
        self.operations.push(operation);
        Ok(())
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.var_index.get(name).map(|&i| &self.variables[i])
    }

    pub fn variable_mut(&mut self, name: &str) -> Option<&mut Variable> {
        let idx = *self.var_index.get(name)?;
        Some(&mut self.variables[idx])
    }

    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.op_index.get(name).map(|&i| &self.operations[i])
    }

    pub fn operation_mut(&mut self, name: &str) -> Option<&mut Operation> {
        let idx = *self.op_index.get(name)?;
        Some(&mut self.operations[idx])
    }

    /// Variables in insertion order
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    /// Operations in insertion order
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &Variable> {
        self.variables
            .iter()
            .filter(|v| v.kind == VariableKind::Placeholder)
    }

    /// The operation that produces the named variable, if any
    pub fn op_for_output(&self, name: &str) -> Option<&Operation> {
        let producer = self.variable(name)?.output_of.as_deref()?;
        self.operation(producer)
    }

    /// Operations in a data-dependency topological order (Kahn's algorithm).
    /// Ties are broken by insertion order, so the result is deterministic for
    /// a given import.
    pub fn execution_order(&self) -> Result<Vec<&Operation>> {
        // Producer of each variable, as an operation arena index
        let mut producers: HashMap<&str, usize> = HashMap::new();
        for (idx, op) in self.operations.iter().enumerate() {
            for output in &op.outputs {
                producers.insert(output.as_str(), idx);
            }
        }

        let mut consumers: Vec<Vec<usize>> = vec![Vec::new(); self.operations.len()];
        let mut in_degree: Vec<usize> = vec![0; self.operations.len()];
        for (idx, op) in self.operations.iter().enumerate() {
            for input in &op.inputs {
                if let Some(&producer_idx) = producers.get(input.as_str()) {
                    consumers[producer_idx].push(idx);
                    in_degree[idx] += 1;
                }
                // Inputs without a producer are graph-level variables
            }
        }

        let mut queue: VecDeque<usize> = (0..self.operations.len())
            .filter(|&i| in_degree[i] == 0)
            .collect();
        let mut sorted = Vec::with_capacity(self.operations.len());

        while let Some(idx) = queue.pop_front() {
            sorted.push(&self.operations[idx]);
            for &consumer in &consumers[idx] {
                in_degree[consumer] -= 1;
                if in_degree[consumer] == 0 {
                    queue.push_back(consumer);
                }
            }
        }

        if sorted.len() != self.operations.len() {
            return Err(Error::InvalidGraph(
                "graph contains a data-dependency cycle".to_string(),
            ));
        }

        Ok(sorted)
    }
}
