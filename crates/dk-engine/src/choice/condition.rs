//! Condition evaluation for choice availability.

use dk_core::state::TURNED_ON;
use dk_core::{DomainError, DomainResult, GameContent, GameState, ItemId, LocationId, ObjectId};

use super::rule::Target;

/// A read-only predicate over state and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// The inventory holds at least one unit of the item.
    HasItem {
        /// Item id.
        item: ItemId,
    },
    /// The inventory holds none of the item.
    NotHasItem {
        /// Item id.
        item: ItemId,
    },
    /// A lockable object in the current location is locked.
    ContainerLocked {
        /// Object id.
        object: ObjectId,
    },
    /// An openable object in the current location is open.
    IsOpen {
        /// Object id.
        object: ObjectId,
    },
    /// An openable object in the current location is closed.
    IsClosed {
        /// Object id.
        object: ObjectId,
    },
    /// A turnable object in the current location is on.
    IsTurnedOn {
        /// Object id.
        object: ObjectId,
    },
    /// The player stands in the location.
    InLocation {
        /// Location id.
        location: LocationId,
    },
    /// The player has been to the location.
    Visited {
        /// Location id.
        location: LocationId,
    },
    /// A narrative flag is set.
    FlagSet {
        /// Flag name.
        flag: String,
    },
    /// A narrative flag is not set.
    FlagUnset {
        /// Flag name.
        flag: String,
    },
}

impl Condition {
    /// The registry name of this condition.
    pub fn name(&self) -> &'static str {
        match self {
            Condition::HasItem { .. } => "has_item",
            Condition::NotHasItem { .. } => "not_has_item",
            Condition::ContainerLocked { .. } => "container_locked",
            Condition::IsOpen { .. } => "is_open",
            Condition::IsClosed { .. } => "is_closed",
            Condition::IsTurnedOn { .. } => "is_turned_on",
            Condition::InLocation { .. } => "in_location",
            Condition::Visited { .. } => "visited",
            Condition::FlagSet { .. } => "flag_set",
            Condition::FlagUnset { .. } => "flag_unset",
        }
    }

    /// The world entity this condition refers to, if any.
    pub fn target(&self) -> Option<Target<'_>> {
        match self {
            Condition::HasItem { item } | Condition::NotHasItem { item } => Some(Target::Item(item)),
            Condition::ContainerLocked { object }
            | Condition::IsOpen { object }
            | Condition::IsClosed { object }
            | Condition::IsTurnedOn { object } => Some(Target::Object(object)),
            Condition::InLocation { location } | Condition::Visited { location } => {
                Some(Target::Location(location))
            }
            Condition::FlagSet { .. } | Condition::FlagUnset { .. } => None,
        }
    }

    /// Evaluate the condition.
    ///
    /// Object conditions only see furniture in the current location and
    /// fail if the object is elsewhere, unknown, or lacks the capability
    /// being asked about.
    pub fn evaluate(&self, state: &GameState, content: &GameContent) -> DomainResult<bool> {
        match self {
            Condition::HasItem { item } => Ok(state.inventory().has(item)),
            Condition::NotHasItem { item } => Ok(!state.inventory().has(item)),
            Condition::ContainerLocked { object } => {
                let (def, obj) = state.object_here(content, object)?;
                if !def.can_lock {
                    return Err(DomainError::NotPermitted {
                        object: object.clone(),
                        action: "locked",
                    });
                }
                Ok(obj.locked)
            }
            Condition::IsOpen { object } | Condition::IsClosed { object } => {
                let (def, obj) = state.object_here(content, object)?;
                if !def.can_open {
                    return Err(DomainError::NotPermitted {
                        object: object.clone(),
                        action: "opened",
                    });
                }
                Ok(obj.open == matches!(self, Condition::IsOpen { .. }))
            }
            Condition::IsTurnedOn { object } => {
                let (def, obj) = state.object_here(content, object)?;
                if !def.turnable {
                    return Err(DomainError::NotPermitted {
                        object: object.clone(),
                        action: "turned",
                    });
                }
                Ok(obj.flag(TURNED_ON))
            }
            Condition::InLocation { location } => Ok(state.current_location() == location),
            Condition::Visited { location } => Ok(state.has_visited(location)),
            Condition::FlagSet { flag } => Ok(state.flag(flag)),
            Condition::FlagUnset { flag } => Ok(!state.flag(flag)),
        }
    }
}
