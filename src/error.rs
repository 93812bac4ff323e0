use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to deserialize foreign graph: {0}")]
    Deserialization(String),

    #[error("Cannot resolve data type for tensor \"{tensor}\": {reason}")]
    TypeResolution { tensor: String, reason: String },

    #[error("Tensor \"{tensor}\" is classified as a constant but carries no value")]
    MissingConstantValue { tensor: String },

    #[error("Node \"{node}\" has operation type \"{op_type}\" with no registered translation")]
    UnknownOperation { node: String, op_type: String },

    #[error("Output \"{output}\" is claimed by both operation \"{first}\" and operation \"{second}\"")]
    DuplicateOutput {
        output: String,
        first: String,
        second: String,
    },

    #[error("Import validation failed: operation \"{op}\" of type {op_type} has input \"{input}\" that does not have a corresponding variable in the graph")]
    DanglingInput {
        op: String,
        op_type: String,
        input: String,
    },

    #[error("Invalid graph structure: {0}")]
    InvalidGraph(String),
}
