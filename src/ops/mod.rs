pub mod mapping;
pub mod registry;

pub use mapping::{PropertyMappings, PropertyRule, Transform};
pub use registry::{OpCategory, OpDescriptor, OpRegistry};
