#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Missing required field `{0}`")]
    MissingField(String),

    #[error("Invalid field `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Document does not match the Presentation 3 model: {0}")]
    Model(#[from] serde_json::Error),
}

impl SchemaError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    #[error("Coordinate output could not be decoded: {error}")]
    Undecodable { error: String, raw: String },
}
