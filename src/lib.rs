pub mod error;
pub mod foreign;
pub mod importer;
pub mod model;
pub mod ops;
pub mod proto;

// Re-export commonly used types
pub use error::{Error, Result};
pub use foreign::{AttrValue, ForeignNode, ForeignTensor, GraphAccessor, WireGraph};
pub use importer::{GraphImporter, ImportOptions};
pub use model::{
    DataType, ImportedGraph, Operation, PropertyValue, TensorValue, Variable, VariableKind,
};
pub use ops::{OpCategory, OpRegistry, PropertyMappings, PropertyRule, Transform};
