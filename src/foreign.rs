//! Read-only access to a foreign graph.
//!
//! Each foreign format implements [`GraphAccessor`], a small capability set
//! (enumerate tensors, enumerate nodes, control dependencies, skip policy)
//! consumed by the import passes. [`WireGraph`] is the accessor over the wire
//! schema in [`crate::proto`]; an already-deserialized graph object can be
//! imported through any other implementation.

use std::collections::HashMap;

use crate::model::{DataType, TensorValue};
use crate::proto::{attr_def, GraphDef, NodeDef, TensorDef};

/// Normalized view of one foreign value entity
#[derive(Debug, Clone)]
pub struct ForeignTensor {
    pub name: String,
    pub dtype: DataType,
    pub shape: Option<Vec<i64>>,
    pub value: Option<TensorValue>,
    pub placeholder: bool,
    pub constant: bool,
    pub auxiliary: bool,
}

/// Normalized view of one foreign operation node
#[derive(Debug, Clone)]
pub struct ForeignNode {
    pub name: String,
    pub op_type: String,
    pub inputs: Vec<String>,
    pub control_inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub attrs: HashMap<String, AttrValue>,
}

/// Attribute value attached to a foreign node
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Float(f32),
    Int(i64),
    Str(String),
    Bool(bool),
    Ints(Vec<i64>),
}

/// Capability set a foreign format must provide to be importable
pub trait GraphAccessor {
    /// Graph-level value entities, in declaration order
    fn tensors(&self) -> &[ForeignTensor];

    /// Operation nodes, in declaration order
    fn nodes(&self) -> &[ForeignNode];

    /// Control-dependency predecessors declared for the node producing this
    /// tensor. Names may reference entities not yet materialized; they are
    /// resolved late.
    fn control_deps(&self, tensor: &ForeignTensor) -> Vec<String>;

    /// Format-specific policy: entities the internal operation set consumes
    /// as plain numeric arguments rather than as graph variables
    fn should_skip(&self, tensor: &ForeignTensor) -> bool;
}

/// Accessor over the wire schema
pub struct WireGraph {
    tensors: Vec<ForeignTensor>,
    nodes: Vec<ForeignNode>,
    /// Node arena index by node name, for control-dependency lookup
    node_index: HashMap<String, usize>,
}

impl WireGraph {
    pub fn new(def: GraphDef) -> Self {
        let tensors = def.tensor.into_iter().map(Self::view_tensor).collect();
        let nodes: Vec<ForeignNode> = def.node.into_iter().map(Self::view_node).collect();
        let node_index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.name.clone(), i))
            .collect();
        WireGraph {
            tensors,
            nodes,
            node_index,
        }
    }

    fn view_tensor(def: TensorDef) -> ForeignTensor {
        ForeignTensor {
            name: def.name,
            dtype: DataType::from_wire(def.dtype),
            shape: def.shape.map(|s| s.dim),
            value: def.value.map(|v| TensorValue {
                data_type: DataType::from_wire(v.dtype),
                dims: v.dim,
                data: v.data,
            }),
            placeholder: def.placeholder,
            constant: def.constant,
            auxiliary: def.auxiliary,
        }
    }

    fn view_node(def: NodeDef) -> ForeignNode {
        let attrs = def
            .attr
            .into_iter()
            .filter_map(|a| {
                let value = match a.value? {
                    attr_def::Value::F(v) => AttrValue::Float(v),
                    attr_def::Value::I(v) => AttrValue::Int(v),
                    attr_def::Value::S(v) => AttrValue::Str(v),
                    attr_def::Value::B(v) => AttrValue::Bool(v),
                    attr_def::Value::Ints(list) => AttrValue::Ints(list.value),
                };
                Some((a.name, value))
            })
            .collect();

        ForeignNode {
            name: def.name,
            op_type: def.op,
            inputs: def.input,
            control_inputs: def.control_input,
            outputs: def.output,
            attrs,
        }
    }

    /// The node producing a tensor is the node carrying the tensor's base
    /// name (the `name:slot` output convention of the wire format).
    fn producing_node(&self, tensor_name: &str) -> Option<&ForeignNode> {
        let base = tensor_name.split(':').next().unwrap_or(tensor_name);
        self.node_index.get(base).map(|&i| &self.nodes[i])
    }
}

impl GraphAccessor for WireGraph {
    fn tensors(&self) -> &[ForeignTensor] {
        &self.tensors
    }

    fn nodes(&self) -> &[ForeignNode] {
        &self.nodes
    }

    fn control_deps(&self, tensor: &ForeignTensor) -> Vec<String> {
        self.producing_node(&tensor.name)
            .map(|n| n.control_inputs.clone())
            .unwrap_or_default()
    }

    fn should_skip(&self, tensor: &ForeignTensor) -> bool {
        tensor.auxiliary
    }
}
