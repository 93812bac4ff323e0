use std::fs::File;
use std::io::Read;
use std::path::Path;

use prost::Message;

use crate::error::{Error, Result};
use crate::proto::GraphDef;

/// Read and deserialize a foreign graph file
pub fn load_graph_file(path: &Path) -> Result<GraphDef> {
    let mut file = File::open(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    load_graph_bytes(&buffer)
}

/// Deserialize foreign graph bytes.
///
/// The binary encoding is attempted first; on failure the same bytes are
/// handed to a fresh text-format decoder. Only when both fail is the input
/// rejected.
pub fn load_graph_bytes(bytes: &[u8]) -> Result<GraphDef> {
    match GraphDef::decode(bytes) {
        Ok(def) => Ok(def),
        Err(binary_err) => serde_json::from_slice::<GraphDef>(bytes).map_err(|text_err| {
            Error::Deserialization(format!(
                "binary decode failed ({}); text decode failed ({})",
                binary_err, text_err
            ))
        }),
    }
}
