use crate::groups::GroupHandle;
use thiserror::Error;

/// Errors that can occur while changing group membership.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    #[error("{handle} is not a live group")]
    UnknownGroup { handle: GroupHandle },
}
