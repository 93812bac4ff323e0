use std::collections::HashMap;

use crate::error::{Error, Result};

/// Broad category of an operation, reported to the importer for ignore-set
/// decisions upstream of translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCategory {
    Math,
    Activation,
    Shape,
    Control,
    Logging,
}

/// Registered translation for one foreign operation-type tag
#[derive(Debug, Clone)]
pub struct OpDescriptor {
    pub op_type: String,
    pub category: OpCategory,
    /// Number of outputs to synthesize when the foreign node declares none
    pub output_count: usize,
}

/// Registry mapping foreign operation-type tags to internal descriptors
#[derive(Debug, Default)]
pub struct OpRegistry {
    descriptors: HashMap<String, OpDescriptor>,
}

impl OpRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor for an operation-type tag
    pub fn register(&mut self, tag: &str, category: OpCategory, output_count: usize) -> Result<()> {
        if self.descriptors.contains_key(tag) {
            return Err(Error::InvalidGraph(format!(
                "operation type \"{}\" is already registered",
                tag
            )));
        }
        self.descriptors.insert(
            tag.to_string(),
            OpDescriptor {
                op_type: tag.to_string(),
                category,
                output_count,
            },
        );
        Ok(())
    }

    pub fn lookup(&self, tag: &str) -> Option<&OpDescriptor> {
        self.descriptors.get(tag)
    }

    pub fn category(&self, tag: &str) -> Option<OpCategory> {
        self.descriptors.get(tag).map(|d| d.category)
    }

    /// Registry preloaded with the standard operation set
    pub fn with_standard_ops() -> Self {
        let mut registry = Self::new();

        let standard: &[(&str, OpCategory, usize)] = &[
            ("Add", OpCategory::Math, 1),
            ("Sub", OpCategory::Math, 1),
            ("Mul", OpCategory::Math, 1),
            ("Div", OpCategory::Math, 1),
            ("MatMul", OpCategory::Math, 1),
            ("Conv2D", OpCategory::Math, 1),
            ("BiasAdd", OpCategory::Math, 1),
            ("Mean", OpCategory::Math, 1),
            ("Sum", OpCategory::Math, 1),
            ("Relu", OpCategory::Activation, 1),
            ("Sigmoid", OpCategory::Activation, 1),
            ("Tanh", OpCategory::Activation, 1),
            ("Softmax", OpCategory::Activation, 1),
            ("Reshape", OpCategory::Shape, 1),
            ("Transpose", OpCategory::Shape, 1),
            ("Concat", OpCategory::Shape, 1),
            ("Squeeze", OpCategory::Shape, 1),
            ("ExpandDims", OpCategory::Shape, 1),
            ("Identity", OpCategory::Shape, 1),
            // Multi-output operations
            ("TopK", OpCategory::Math, 2),
            ("Split", OpCategory::Shape, 2),
            // Ignorable by default, registered so exempt nodes still translate
            ("NoOp", OpCategory::Control, 1),
            ("Assert", OpCategory::Logging, 1),
        ];

        for &(tag, category, outputs) in standard {
            // Tags above are unique, so registration cannot fail
            let _ = registry.register(tag, category, outputs);
        }

        registry
    }
}
