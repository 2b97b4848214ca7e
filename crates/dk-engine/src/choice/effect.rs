//! Effects that modify the game state.

use dk_core::state::TURNED_ON;
use dk_core::{DomainError, DomainResult, GameContent, GameState, ItemId, LocationId, ObjectId};

use super::rule::Target;

/// A state mutation applied when a choice is taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Remove one unit of an item from the inventory.
    ConsumeItem {
        /// Item id.
        item: ItemId,
    },
    /// Pick an item up from the current location.
    GetItem {
        /// Item id.
        item: ItemId,
    },
    /// Unlock an object and open it. The object must allow both.
    UnlockContainer {
        /// Object id.
        object: ObjectId,
    },
    /// Lock a closed object.
    LockObject {
        /// Object id.
        object: ObjectId,
    },
    /// Open an object.
    OpenObject {
        /// Object id.
        object: ObjectId,
    },
    /// Close an object.
    CloseObject {
        /// Object id.
        object: ObjectId,
    },
    /// Move an object's contents into the inventory.
    RevealContents {
        /// Object id.
        object: ObjectId,
    },
    /// Move the player.
    MoveTo {
        /// Target location id.
        location: LocationId,
    },
    /// Set a narrative flag.
    SetFlag {
        /// Flag name.
        flag: String,
        /// New value.
        value: bool,
    },
    /// Turn a device on.
    TurnOn {
        /// Object id.
        object: ObjectId,
    },
    /// Turn a device off.
    TurnOff {
        /// Object id.
        object: ObjectId,
    },
}

impl Effect {
    /// The registry name of this effect.
    pub fn name(&self) -> &'static str {
        match self {
            Effect::ConsumeItem { .. } => "consume_item",
            Effect::GetItem { .. } => "get_item",
            Effect::UnlockContainer { .. } => "unlock_container",
            Effect::LockObject { .. } => "lock_object",
            Effect::OpenObject { .. } => "open_object",
            Effect::CloseObject { .. } => "close_object",
            Effect::RevealContents { .. } => "reveal_contents",
            Effect::MoveTo { .. } => "move_to",
            Effect::SetFlag { .. } => "set_flag",
            Effect::TurnOn { .. } => "turn_on",
            Effect::TurnOff { .. } => "turn_off",
        }
    }

    /// The world entity this effect refers to, if any.
    pub fn target(&self) -> Option<Target<'_>> {
        match self {
            Effect::ConsumeItem { item } | Effect::GetItem { item } => Some(Target::Item(item)),
            Effect::UnlockContainer { object }
            | Effect::LockObject { object }
            | Effect::OpenObject { object }
            | Effect::CloseObject { object }
            | Effect::RevealContents { object }
            | Effect::TurnOn { object }
            | Effect::TurnOff { object } => Some(Target::Object(object)),
            Effect::MoveTo { location } => Some(Target::Location(location)),
            Effect::SetFlag { .. } => None,
        }
    }

    /// Apply the effect. On error the state may be partially modified;
    /// [`Choice::apply`](super::Choice::apply) stages effects on a copy.
    pub fn apply(&self, state: &mut GameState, content: &GameContent) -> DomainResult<()> {
        match self {
            Effect::ConsumeItem { item } => state.inventory_mut().remove(item, 1),
            Effect::GetItem { item } => {
                state.take_item_here(item)?;
                state.inventory_mut().add(item.clone(), 1);
                Ok(())
            }
            Effect::UnlockContainer { object } => set_locked(state, content, object, false),
            Effect::LockObject { object } => set_locked(state, content, object, true),
            Effect::OpenObject { object } => set_open(state, content, object, true),
            Effect::CloseObject { object } => set_open(state, content, object, false),
            Effect::RevealContents { object } => {
                let (_, obj) = state.object_here_mut(content, object)?;
                let contents = std::mem::take(&mut obj.contents);
                for item in contents {
                    state.inventory_mut().add(item, 1);
                }
                Ok(())
            }
            Effect::MoveTo { location } => state.move_to(content, location),
            Effect::SetFlag { flag, value } => {
                state.set_flag(flag.clone(), *value);
                Ok(())
            }
            Effect::TurnOn { object } => set_turned_on(state, content, object, true),
            Effect::TurnOff { object } => set_turned_on(state, content, object, false),
        }
    }
}

fn set_open(
    state: &mut GameState,
    content: &GameContent,
    object: &ObjectId,
    open: bool,
) -> DomainResult<()> {
    let (def, obj) = state.object_here_mut(content, object)?;
    if !def.can_open {
        return Err(DomainError::NotPermitted {
            object: object.clone(),
            action: "opened",
        });
    }
    if open && obj.locked {
        return Err(DomainError::Locked(object.clone()));
    }
    obj.open = open;

    if let Some(pair) = door_pair(content, object) {
        if let Some(other) = state.object_mut(pair) {
            other.open = open;
        }
    }
    Ok(())
}

fn set_locked(
    state: &mut GameState,
    content: &GameContent,
    object: &ObjectId,
    locked: bool,
) -> DomainResult<()> {
    let (def, obj) = state.object_here_mut(content, object)?;
    if !def.can_lock {
        return Err(DomainError::NotPermitted {
            object: object.clone(),
            action: if locked { "locked" } else { "unlocked" },
        });
    }
    // Unlocking swings the object open as well.
    if !locked && !def.can_open {
        return Err(DomainError::NotPermitted {
            object: object.clone(),
            action: "opened",
        });
    }
    if locked && obj.open {
        return Err(DomainError::NotClosed(object.clone()));
    }
    obj.locked = locked;
    if !locked {
        obj.open = true;
    }

    if let Some(pair) = door_pair(content, object) {
        if let Some(other) = state.object_mut(pair) {
            other.locked = locked;
            if !locked {
                other.open = true;
            }
        }
    }
    Ok(())
}

fn set_turned_on(
    state: &mut GameState,
    content: &GameContent,
    object: &ObjectId,
    on: bool,
) -> DomainResult<()> {
    let (def, obj) = state.object_here_mut(content, object)?;
    if !def.turnable {
        return Err(DomainError::NotPermitted {
            object: object.clone(),
            action: "turned",
        });
    }
    obj.set_flag(TURNED_ON, on);
    Ok(())
}

/// The far side of a door, if the object is a linked door.
fn door_pair<'a>(content: &'a GameContent, object: &ObjectId) -> Option<&'a ObjectId> {
    content
        .furniture(object)
        .filter(|def| def.is_door())
        .and_then(|def| def.link_to.as_ref())
}
