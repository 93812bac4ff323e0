use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::foreign::AttrValue;
use crate::model::PropertyValue;

/// Conversion applied when copying a foreign attribute into an internal field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Copy the value unchanged
    Identity,
    /// Foreign integer flag to internal boolean
    IntToBool,
    /// Multiply a numeric value by a fixed factor (unit conversion)
    Scale(f64),
}

impl Transform {
    pub fn apply(&self, attr: &AttrValue) -> Result<PropertyValue> {
        let mismatch = || {
            Error::InvalidGraph(format!(
                "attribute value {:?} is incompatible with {:?} conversion",
                attr, self
            ))
        };

        match self {
            Transform::Identity => Ok(match attr {
                AttrValue::Float(v) => PropertyValue::Float(f64::from(*v)),
                AttrValue::Int(v) => PropertyValue::Int(*v),
                AttrValue::Str(v) => PropertyValue::Str(v.clone()),
                AttrValue::Bool(v) => PropertyValue::Bool(*v),
                AttrValue::Ints(v) => PropertyValue::Ints(v.clone()),
            }),
            Transform::IntToBool => match attr {
                AttrValue::Int(v) => Ok(PropertyValue::Bool(*v != 0)),
                AttrValue::Bool(v) => Ok(PropertyValue::Bool(*v)),
                _ => Err(mismatch()),
            },
            Transform::Scale(factor) => match attr {
                AttrValue::Float(v) => Ok(PropertyValue::Float(f64::from(*v) * factor)),
                AttrValue::Int(v) => Ok(PropertyValue::Float(*v as f64 * factor)),
                _ => Err(mismatch()),
            },
        }
    }
}

/// One declared attribute-to-field binding
#[derive(Debug, Clone)]
pub struct PropertyRule {
    pub foreign_attr: String,
    pub field: String,
    pub transform: Transform,
}

impl PropertyRule {
    pub fn new(foreign_attr: &str, field: &str, transform: Transform) -> Self {
        PropertyRule {
            foreign_attr: foreign_attr.to_string(),
            field: field.to_string(),
            transform,
        }
    }
}

/// Declarative per-operation-type property mapping table.
///
/// Absence of an entry for an operation type is legal: the operation simply
/// needs no extra properties.
#[derive(Debug, Default)]
pub struct PropertyMappings {
    rules: HashMap<String, Vec<PropertyRule>>,
}

impl PropertyMappings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, op_type: &str, rules: Vec<PropertyRule>) {
        self.rules.insert(op_type.to_string(), rules);
    }

    pub fn for_op(&self, op_type: &str) -> Option<&[PropertyRule]> {
        self.rules.get(op_type).map(|r| r.as_slice())
    }

    /// Mapping table for the standard operation set
    pub fn standard() -> Self {
        let mut mappings = Self::new();

        mappings.register(
            "MatMul",
            vec![
                PropertyRule::new("transpose_a", "transpose_a", Transform::IntToBool),
                PropertyRule::new("transpose_b", "transpose_b", Transform::IntToBool),
            ],
        );
        mappings.register(
            "Conv2D",
            vec![
                PropertyRule::new("strides", "strides", Transform::Identity),
                PropertyRule::new("padding", "padding", Transform::Identity),
                PropertyRule::new("dilations", "dilations", Transform::Identity),
            ],
        );
        mappings.register(
            "Concat",
            vec![PropertyRule::new("axis", "axis", Transform::Identity)],
        );
        mappings.register(
            "Softmax",
            vec![PropertyRule::new("axis", "axis", Transform::Identity)],
        );
        mappings.register(
            "Transpose",
            vec![PropertyRule::new("perm", "permutation", Transform::Identity)],
        );
        mappings.register(
            "Mean",
            vec![PropertyRule::new("keep_dims", "keep_dims", Transform::IntToBool)],
        );
        mappings.register(
            "Sum",
            vec![PropertyRule::new("keep_dims", "keep_dims", Transform::IntToBool)],
        );
        mappings.register(
            "Split",
            vec![PropertyRule::new("num_split", "num_outputs", Transform::Identity)],
        );
        mappings.register(
            "TopK",
            vec![PropertyRule::new("sorted", "sorted", Transform::IntToBool)],
        );

        mappings
    }
}
