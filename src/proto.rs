//! Wire schema for the foreign graph format.
//!
//! The same schema has two encodings: a protobuf binary encoding (prost
//! messages, hand-written rather than build-generated) and a JSON text
//! encoding (serde on the same structs). The loader tries binary first and
//! falls back to text.

use serde::{Deserialize, Serialize};

/// Serialized foreign graph: graph-level value entities plus operation nodes
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct GraphDef {
    #[prost(string, tag = "1")]
    #[serde(default)]
    pub name: String,
    #[prost(message, repeated, tag = "2")]
    #[serde(default)]
    pub tensor: Vec<TensorDef>,
    #[prost(message, repeated, tag = "3")]
    #[serde(default)]
    pub node: Vec<NodeDef>,
}

/// One graph-level value entity
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct TensorDef {
    #[prost(string, tag = "1")]
    #[serde(default)]
    pub name: String,
    /// Data type tag; 0 is the explicit "undefined" sentinel
    #[prost(int32, tag = "2")]
    #[serde(default)]
    pub dtype: i32,
    /// Absent shape means unknown, not scalar
    #[prost(message, optional, tag = "3")]
    pub shape: Option<ShapeDef>,
    #[prost(message, optional, tag = "4")]
    pub value: Option<TensorValueDef>,
    /// Explicitly declared as an externally supplied input
    #[prost(bool, tag = "5")]
    #[serde(default)]
    pub placeholder: bool,
    /// Explicitly declared as a constant; a value payload is then mandatory
    #[prost(bool, tag = "6")]
    #[serde(default)]
    pub constant: bool,
    /// Auxiliary entities (e.g. reduction index lists) are consumed as plain
    /// numeric arguments by the internal operation set, not as variables
    #[prost(bool, tag = "7")]
    #[serde(default)]
    pub auxiliary: bool,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct ShapeDef {
    #[prost(int64, repeated, tag = "1")]
    #[serde(default)]
    pub dim: Vec<i64>,
}

/// Materialized tensor data, little-endian element bytes
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct TensorValueDef {
    #[prost(int32, tag = "1")]
    #[serde(default)]
    pub dtype: i32,
    #[prost(int64, repeated, tag = "2")]
    #[serde(default)]
    pub dim: Vec<i64>,
    #[prost(bytes = "vec", tag = "3")]
    #[serde(default)]
    pub data: Vec<u8>,
}

/// One foreign operation node
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct NodeDef {
    #[prost(string, tag = "1")]
    #[serde(default)]
    pub name: String,
    #[prost(string, tag = "2")]
    #[serde(default)]
    pub op: String,
    #[prost(string, repeated, tag = "3")]
    #[serde(default)]
    pub input: Vec<String>,
    #[prost(string, repeated, tag = "4")]
    #[serde(default)]
    pub control_input: Vec<String>,
    /// Declared output names; may be empty, in which case the output binder
    /// synthesizes them
    #[prost(string, repeated, tag = "5")]
    #[serde(default)]
    pub output: Vec<String>,
    #[prost(message, repeated, tag = "6")]
    #[serde(default)]
    pub attr: Vec<AttrDef>,
}

/// One node attribute
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct AttrDef {
    #[prost(string, tag = "1")]
    #[serde(default)]
    pub name: String,
    #[prost(oneof = "attr_def::Value", tags = "2, 3, 4, 5, 6")]
    pub value: Option<attr_def::Value>,
}

pub mod attr_def {
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, ::prost::Oneof, Serialize, Deserialize)]
    pub enum Value {
        #[prost(float, tag = "2")]
        F(f32),
        #[prost(int64, tag = "3")]
        I(i64),
        #[prost(string, tag = "4")]
        S(String),
        #[prost(bool, tag = "5")]
        B(bool),
        #[prost(message, tag = "6")]
        Ints(super::IntList),
    }
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct IntList {
    #[prost(int64, repeated, tag = "1")]
    #[serde(default)]
    pub value: Vec<i64>,
}
