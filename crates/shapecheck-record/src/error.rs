use shapecheck_solver::Mismatch;

/// Why a record could not be constructed.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConstructError {
    #[error("arg \"{field}\" not passed")]
    MissingArgument { field: String },

    #[error("{source}")]
    TypeMismatch {
        field: String,
        #[source]
        source: Mismatch,
    },

    #[error("unexpected arg \"{name}\" for \"{record}\"")]
    UnexpectedArgument { name: String, record: String },
}

impl ConstructError {
    /// The field or argument name the failure is about.
    pub fn field(&self) -> &str {
        match self {
            ConstructError::MissingArgument { field } | ConstructError::TypeMismatch { field, .. } => {
                field
            }
            ConstructError::UnexpectedArgument { name, .. } => name,
        }
    }
}
