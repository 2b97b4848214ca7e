use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::content::{FurnitureDef, GameContent};
use crate::error::{DomainError, DomainResult};
use crate::id::{ItemId, LocationId, ObjectId};

/// Device flag set by `turn_on` and cleared by `turn_off`.
pub const TURNED_ON: &str = "turned_on";

/// The player's inventory: item id to a positive quantity.
///
/// Ids with no units left are removed, so every stored quantity is at
/// least one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: BTreeMap<ItemId, u32>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Units held of an item.
    pub fn quantity(&self, item: &ItemId) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    /// Check whether at least one unit is held.
    pub fn has(&self, item: &ItemId) -> bool {
        self.quantity(item) > 0
    }

    /// Add units of an item. Adding zero does nothing.
    pub fn add(&mut self, item: ItemId, qty: u32) {
        if qty == 0 {
            return;
        }
        *self.items.entry(item).or_insert(0) += qty;
    }

    /// Remove units of an item.
    pub fn remove(&mut self, item: &ItemId, qty: u32) -> DomainResult<()> {
        let held = self.quantity(item);
        if held < qty || held == 0 {
            return Err(DomainError::ItemNotHeld(item.clone()));
        }
        if held == qty {
            self.items.remove(item);
        } else {
            self.items.insert(item.clone(), held - qty);
        }
        Ok(())
    }

    /// Iterate over held items in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, u32)> {
        self.items.iter().map(|(id, qty)| (id, *qty))
    }

    /// Number of distinct items held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is held.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<(ItemId, u32)> for Inventory {
    fn from_iter<T: IntoIterator<Item = (ItemId, u32)>>(iter: T) -> Self {
        let mut inventory = Inventory::new();
        for (item, qty) in iter {
            inventory.add(item, qty);
        }
        inventory
    }
}

/// Mutable state of one piece of furniture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectState {
    /// Currently open.
    pub open: bool,
    /// Currently locked.
    pub locked: bool,
    /// Device-specific flags such as [`TURNED_ON`].
    pub flags: BTreeMap<String, bool>,
    /// Items inside, for container-like objects.
    pub contents: Vec<ItemId>,
}

impl ObjectState {
    /// A closed object, optionally locked.
    pub fn closed(locked: bool) -> Self {
        Self {
            open: false,
            locked,
            ..Self::default()
        }
    }

    /// An open, unlocked object.
    pub fn opened() -> Self {
        Self {
            open: true,
            ..Self::default()
        }
    }

    /// Add an item to the contents.
    pub fn with_content(mut self, item: impl Into<ItemId>) -> Self {
        self.contents.push(item.into());
        self
    }

    /// Read a device flag. Unset flags are false.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Set a device flag.
    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        self.flags.insert(name.into(), value);
    }
}

/// The mutable half of the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    current_location: LocationId,
    inventory: Inventory,
    location_items: HashMap<LocationId, Vec<ItemId>>,
    objects: HashMap<ObjectId, ObjectState>,
    visited: HashSet<LocationId>,
    flags: HashMap<String, bool>,
}

impl GameState {
    /// Seed the runtime state from content.
    ///
    /// Location item lists are copied from the location definitions. Every
    /// piece of furniture gets exactly one [`ObjectState`]: the one supplied
    /// in `objects`, or a default (closed, unlocked, empty) one.
    pub fn seed(
        content: &GameContent,
        start: LocationId,
        inventory: Inventory,
        mut objects: HashMap<ObjectId, ObjectState>,
    ) -> DomainResult<Self> {
        content.require_location(&start)?;

        let location_items = content
            .locations()
            .map(|loc| (loc.id.clone(), loc.items.clone()))
            .collect();

        let objects = content
            .all_furniture()
            .map(|def| {
                let state = objects.remove(&def.id).unwrap_or_default();
                (def.id.clone(), state)
            })
            .collect();

        Ok(Self {
            current_location: start,
            inventory,
            location_items,
            objects,
            visited: HashSet::new(),
            flags: HashMap::new(),
        })
    }

    // -----------------------------------------------------------------------
    // Location
    // -----------------------------------------------------------------------

    /// The player's current location.
    pub fn current_location(&self) -> &LocationId {
        &self.current_location
    }

    /// Move the player. Fails without changing anything if the location is
    /// unknown.
    pub fn move_to(&mut self, content: &GameContent, location: &LocationId) -> DomainResult<()> {
        content.require_location(location)?;
        self.current_location = location.clone();
        Ok(())
    }

    /// Record the current location as visited. Returns true on the first visit.
    pub fn visit_current(&mut self) -> bool {
        self.visited.insert(self.current_location.clone())
    }

    /// Check whether a location has been visited.
    pub fn has_visited(&self, location: &LocationId) -> bool {
        self.visited.contains(location)
    }

    // -----------------------------------------------------------------------
    // Items
    // -----------------------------------------------------------------------

    /// The inventory.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Mutable access to the inventory.
    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// Items lying at a location.
    pub fn items_at(&self, location: &LocationId) -> &[ItemId] {
        self.location_items
            .get(location)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Items lying at the current location.
    pub fn items_here(&self) -> &[ItemId] {
        self.items_at(&self.current_location)
    }

    /// Remove an item from the current location's item list.
    pub fn take_item_here(&mut self, item: &ItemId) -> DomainResult<()> {
        let not_here = || DomainError::ItemNotAtLocation {
            item: item.clone(),
            location: self.current_location.clone(),
        };
        let items = self
            .location_items
            .get_mut(&self.current_location)
            .ok_or_else(not_here)?;
        match items.iter().position(|i| i == item) {
            Some(pos) => {
                items.remove(pos);
                Ok(())
            }
            None => Err(not_here()),
        }
    }

    // -----------------------------------------------------------------------
    // Objects
    // -----------------------------------------------------------------------

    /// State of an object, wherever it stands.
    pub fn object(&self, id: &ObjectId) -> Option<&ObjectState> {
        self.objects.get(id)
    }

    /// Mutable state of an object, wherever it stands.
    pub fn object_mut(&mut self, id: &ObjectId) -> Option<&mut ObjectState> {
        self.objects.get_mut(id)
    }

    /// Definition and state of an object in the current location.
    ///
    /// The player can only touch furniture where they stand: objects
    /// elsewhere fail with [`DomainError::ObjectNotHere`].
    pub fn object_here<'s, 'c>(
        &'s self,
        content: &'c GameContent,
        id: &ObjectId,
    ) -> DomainResult<(&'c FurnitureDef, &'s ObjectState)> {
        let def = self.locate(content, id)?;
        let state = self
            .objects
            .get(id)
            .ok_or_else(|| DomainError::UnknownObject(id.clone()))?;
        Ok((def, state))
    }

    /// Mutable variant of [`GameState::object_here`].
    pub fn object_here_mut<'s, 'c>(
        &'s mut self,
        content: &'c GameContent,
        id: &ObjectId,
    ) -> DomainResult<(&'c FurnitureDef, &'s mut ObjectState)> {
        let def = self.locate(content, id)?;
        let state = self
            .objects
            .get_mut(id)
            .ok_or_else(|| DomainError::UnknownObject(id.clone()))?;
        Ok((def, state))
    }

    fn locate<'c>(&self, content: &'c GameContent, id: &ObjectId) -> DomainResult<&'c FurnitureDef> {
        let def = content
            .furniture(id)
            .ok_or_else(|| DomainError::UnknownObject(id.clone()))?;
        let here = content
            .location(&self.current_location)
            .is_some_and(|loc| loc.objects.contains(id));
        if !here {
            return Err(DomainError::ObjectNotHere {
                object: id.clone(),
                location: self.current_location.clone(),
            });
        }
        Ok(def)
    }

    // -----------------------------------------------------------------------
    // Narrative flags
    // -----------------------------------------------------------------------

    /// Read a narrative flag. Unset flags are false.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Set a narrative flag.
    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        self.flags.insert(name.into(), value);
    }
}
