use thiserror::Error;

use crate::ObjectKind;

/// Errors raised while assembling domain objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A relation member role exceeded [`crate::MAX_ROLE_LENGTH`] bytes.
    #[error("member role is {length} bytes long, the limit is {max}")]
    RoleTooLong {
        /// Length of the rejected role in bytes.
        length: usize,
        /// Maximum accepted length in bytes.
        max: usize,
    },
    /// An object was finished before an identifier was set.
    #[error("{kind} is missing its identifier")]
    MissingIdentifier {
        /// Kind of the incomplete object.
        kind: ObjectKind,
    },
    /// An object was finished while none was in progress.
    #[error("no object is in progress")]
    NothingInProgress,
}
