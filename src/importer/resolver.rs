use crate::error::{Error, Result};
use crate::foreign::ForeignTensor;
use crate::model::{DataType, VariableKind};

/// Resolved type, shape and classification for one foreign tensor
#[derive(Debug, Clone)]
pub struct Resolution {
    pub data_type: DataType,
    pub shape: Option<Vec<i64>>,
    pub kind: VariableKind,
}

/// Determine data type, shape and classification for a foreign tensor.
///
/// A missing or explicitly undefined data type is fatal for the whole import.
/// A missing shape is not: many ordinary tensors only acquire a shape at a
/// later stage, so absence is recorded as `None`.
///
/// Classification precedence: explicit placeholder declaration wins, then
/// explicit constant declaration, then shape presence decides between the
/// symbolic kinds.
pub fn resolve(tensor: &ForeignTensor) -> Result<Resolution> {
    if tensor.dtype == DataType::Undefined {
        return Err(Error::TypeResolution {
            tensor: tensor.name.clone(),
            reason: "data type is missing or explicitly undefined".to_string(),
        });
    }

    let kind = if tensor.placeholder {
        VariableKind::Placeholder
    } else if tensor.constant {
        VariableKind::Constant
    } else if tensor.shape.is_none() {
        VariableKind::Array
    } else {
        VariableKind::Ordinary
    };

    Ok(Resolution {
        data_type: tensor.dtype,
        shape: tensor.shape.clone(),
        kind,
    })
}
