use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::{ItemId, LocationId, ObjectId};

/// Definition of an item that can lie around or be carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    /// Unique identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Whether using the item uses it up.
    pub consumable: bool,
}

impl ItemDef {
    /// Create an item definition with an empty description.
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            consumable: false,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark the item as consumable.
    pub fn consumable(mut self) -> Self {
        self.consumable = true;
        self
    }
}

/// The kind of a piece of furniture. Unknown kinds load as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FurnitureKind {
    /// A door; its `link_to` pair on the other side mirrors its state.
    Door,
    /// A box, chest, wardrobe, ...
    Container,
    /// An open shelf.
    Shelf,
    /// A jar with a lid.
    Jar,
    /// Something that can be turned on and off.
    Switch,
    /// Any furniture kind without special engine behaviour.
    #[serde(other)]
    Other,
}

impl FurnitureKind {
    /// Parse a kind name. Unrecognised names map to `Other`.
    pub fn parse(s: &str) -> Self {
        match s {
            "door" => Self::Door,
            "container" => Self::Container,
            "shelf" => Self::Shelf,
            "jar" => Self::Jar,
            "switch" => Self::Switch,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for FurnitureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Door => write!(f, "door"),
            Self::Container => write!(f, "container"),
            Self::Shelf => write!(f, "shelf"),
            Self::Jar => write!(f, "jar"),
            Self::Switch => write!(f, "switch"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Definition of a piece of furniture and what may be done with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnitureDef {
    /// Unique identifier.
    pub id: ObjectId,
    /// What sort of furniture this is.
    pub kind: FurnitureKind,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Can be opened and closed.
    pub can_open: bool,
    /// Can be locked and unlocked.
    pub can_lock: bool,
    /// Holds items.
    pub is_container: bool,
    /// Contents are visible while closed.
    pub is_transparent: bool,
    /// Can be turned on and off.
    pub turnable: bool,
    /// The other side of a door.
    pub link_to: Option<ObjectId>,
}

impl FurnitureDef {
    /// Create a definition with every capability switched off.
    pub fn new(id: impl Into<ObjectId>, kind: FurnitureKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            description: String::new(),
            can_open: false,
            can_lock: false,
            is_container: false,
            is_transparent: false,
            turnable: false,
            link_to: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Allow opening and closing.
    pub fn openable(mut self) -> Self {
        self.can_open = true;
        self
    }

    /// Allow locking and unlocking.
    pub fn lockable(mut self) -> Self {
        self.can_lock = true;
        self
    }

    /// Make the object hold items.
    pub fn container(mut self) -> Self {
        self.is_container = true;
        self
    }

    /// Make the contents visible while closed.
    pub fn transparent(mut self) -> Self {
        self.is_transparent = true;
        self
    }

    /// Allow turning on and off.
    pub fn turnable(mut self) -> Self {
        self.turnable = true;
        self
    }

    /// Pair this object with another (the far side of a door).
    pub fn linked_to(mut self, other: impl Into<ObjectId>) -> Self {
        self.link_to = Some(other.into());
        self
    }

    /// Returns true for door-kind objects.
    pub fn is_door(&self) -> bool {
        self.kind == FurnitureKind::Door
    }
}

/// Definition of a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDef {
    /// Unique identifier.
    pub id: LocationId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Furniture in this location, in presentation order.
    pub objects: Vec<ObjectId>,
    /// Items lying here at load time. Only used to seed the state.
    pub items: Vec<ItemId>,
}

impl LocationDef {
    /// Create an empty location.
    pub fn new(id: impl Into<LocationId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            objects: Vec::new(),
            items: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add an item lying here at the start.
    pub fn with_item(mut self, item: impl Into<ItemId>) -> Self {
        self.items.push(item.into());
        self
    }
}

/// All static world definitions. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct GameContent {
    items: HashMap<ItemId, ItemDef>,
    furniture: HashMap<ObjectId, FurnitureDef>,
    locations: HashMap<LocationId, LocationDef>,

    // Index
    object_home: HashMap<ObjectId, LocationId>,
}

impl GameContent {
    /// Create empty content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item definition, replacing any previous one with the same id.
    pub fn add_item(&mut self, item: ItemDef) {
        self.items.insert(item.id.clone(), item);
    }

    /// Add a location together with the furniture standing in it.
    ///
    /// Furniture ids are appended to the location's object list in order.
    pub fn add_location(&mut self, mut location: LocationDef, furniture: Vec<FurnitureDef>) {
        for def in furniture {
            if !location.objects.contains(&def.id) {
                location.objects.push(def.id.clone());
            }
            self.object_home.insert(def.id.clone(), location.id.clone());
            self.furniture.insert(def.id.clone(), def);
        }
        self.locations.insert(location.id.clone(), location);
    }

    /// Builder form of [`GameContent::add_item`].
    pub fn with_item(mut self, item: ItemDef) -> Self {
        self.add_item(item);
        self
    }

    /// Builder form of [`GameContent::add_location`].
    pub fn with_location(mut self, location: LocationDef, furniture: Vec<FurnitureDef>) -> Self {
        self.add_location(location, furniture);
        self
    }

    /// Look up an item definition.
    pub fn item(&self, id: &ItemId) -> Option<&ItemDef> {
        self.items.get(id)
    }

    /// Look up a furniture definition.
    pub fn furniture(&self, id: &ObjectId) -> Option<&FurnitureDef> {
        self.furniture.get(id)
    }

    /// Look up a location definition.
    pub fn location(&self, id: &LocationId) -> Option<&LocationDef> {
        self.locations.get(id)
    }

    /// Look up a location, failing with [`DomainError::UnknownLocation`].
    pub fn require_location(&self, id: &LocationId) -> DomainResult<&LocationDef> {
        self.locations
            .get(id)
            .ok_or_else(|| DomainError::UnknownLocation(id.clone()))
    }

    /// The location a piece of furniture stands in.
    pub fn object_location(&self, id: &ObjectId) -> Option<&LocationId> {
        self.object_home.get(id)
    }

    /// Iterate over all item definitions.
    pub fn items(&self) -> impl Iterator<Item = &ItemDef> {
        self.items.values()
    }

    /// Iterate over all furniture definitions.
    pub fn all_furniture(&self) -> impl Iterator<Item = &FurnitureDef> {
        self.furniture.values()
    }

    /// Iterate over all location definitions.
    pub fn locations(&self) -> impl Iterator<Item = &LocationDef> {
        self.locations.values()
    }

    /// Display name of an item, falling back to its id.
    pub fn item_name<'a>(&'a self, id: &'a ItemId) -> &'a str {
        self.items.get(id).map_or(id.as_str(), |i| i.name.as_str())
    }

    /// Display name of a piece of furniture, falling back to its id.
    pub fn object_name<'a>(&'a self, id: &'a ObjectId) -> &'a str {
        self.furniture.get(id).map_or(id.as_str(), |f| f.name.as_str())
    }

    /// Display name of a location, falling back to its id.
    pub fn location_name<'a>(&'a self, id: &'a LocationId) -> &'a str {
        self.locations.get(id).map_or(id.as_str(), |l| l.name.as_str())
    }

    /// Resolve a raw id string to a display name, trying items first,
    /// then furniture, then locations.
    pub fn display_name(&self, raw: &str) -> Option<&str> {
        if let Some(item) = self.items.get(&ItemId::new(raw)) {
            return Some(&item.name);
        }
        if let Some(def) = self.furniture.get(&ObjectId::new(raw)) {
            return Some(&def.name);
        }
        self.locations
            .get(&LocationId::new(raw))
            .map(|l| l.name.as_str())
    }

    /// Number of item definitions.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Number of furniture definitions.
    pub fn furniture_count(&self) -> usize {
        self.furniture.len()
    }

    /// Number of location definitions.
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> GameContent {
        GameContent::new()
            .with_item(ItemDef::new("gold_ring", "gold ring"))
            .with_location(
                LocationDef::new("attic", "Attic"),
                vec![
                    FurnitureDef::new("wooden_box", FurnitureKind::Container, "wooden box")
                        .openable()
                        .lockable()
                        .container(),
                ],
            )
    }

    #[test]
    fn kind_parse_known_and_unknown() {
        assert_eq!(FurnitureKind::parse("door"), FurnitureKind::Door);
        assert_eq!(FurnitureKind::parse("jar"), FurnitureKind::Jar);
        assert_eq!(FurnitureKind::parse("wardrobe"), FurnitureKind::Other);
    }

    #[test]
    fn add_location_records_objects_and_home() {
        let content = content();
        let attic = content.location(&LocationId::new("attic")).unwrap();
        assert_eq!(attic.objects, vec![ObjectId::new("wooden_box")]);
        assert_eq!(
            content.object_location(&ObjectId::new("wooden_box")),
            Some(&LocationId::new("attic"))
        );
    }

    #[test]
    fn display_name_resolves_every_kind() {
        let content = content();
        assert_eq!(content.display_name("gold_ring"), Some("gold ring"));
        assert_eq!(content.display_name("wooden_box"), Some("wooden box"));
        assert_eq!(content.display_name("attic"), Some("Attic"));
        assert_eq!(content.display_name("nowhere"), None);
    }

    #[test]
    fn require_location_reports_unknown() {
        let content = content();
        let err = content.require_location(&LocationId::new("cellar")).unwrap_err();
        assert_eq!(err, DomainError::UnknownLocation(LocationId::new("cellar")));
    }
}
