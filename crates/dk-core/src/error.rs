use crate::id::{ItemId, LocationId, ObjectId};

/// Alias for `Result<T, DomainError>`.
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors raised when a state change violates the world's rules.
///
/// A well-formed choice never reaches these: its conditions should
/// guarantee every effect succeeds. Seeing one means the content is wrong.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// The inventory does not hold enough units of the item.
    #[error("item not held: {0}")]
    ItemNotHeld(ItemId),

    /// The item is not lying at the player's location.
    #[error("item {item} is not listed at location {location}")]
    ItemNotAtLocation {
        /// The requested item.
        item: ItemId,
        /// The player's current location.
        location: LocationId,
    },

    /// No object with this id exists in the content.
    #[error("object not found: {0}")]
    UnknownObject(ObjectId),

    /// The object exists, but somewhere other than the player's location.
    #[error("object {object} not found in current location {location}")]
    ObjectNotHere {
        /// The requested object.
        object: ObjectId,
        /// The player's current location.
        location: LocationId,
    },

    /// No location with this id exists in the content.
    #[error("location {0} does not exist")]
    UnknownLocation(LocationId),

    /// The object's definition does not allow the requested action.
    #[error("{object} cannot be {action}")]
    NotPermitted {
        /// The object acted upon.
        object: ObjectId,
        /// Past participle of the refused action ("opened", "locked", ...).
        action: &'static str,
    },

    /// The object is locked.
    #[error("{0} is locked")]
    Locked(ObjectId),

    /// The object has to be closed first.
    #[error("{0} is open")]
    NotClosed(ObjectId),
}
