use crate::model::LockState;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DrawError {
    #[error("prize index {index} is out of range for a catalog of {total}")]
    OutOfRange { index: u32, total: u32 },

    #[error("cannot {action} while {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: LockState,
    },

    #[error("required element `{0}` is missing")]
    MissingAnchor(&'static str),

    #[error("prize catalog: {0}")]
    Catalog(String),

    #[error("storage: {0}")]
    Storage(String),
}
