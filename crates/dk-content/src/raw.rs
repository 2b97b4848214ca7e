//! Serialized content as it appears on disk, before linking.
//!
//! Everything here is plain data with string ids. Nothing is checked
//! until [`crate::link`] turns it into typed content.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// The whole content bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawContent {
    /// World name, start location and narrator overrides.
    pub manifest: RawManifest,
    /// Item definitions by id.
    pub items: BTreeMap<String, RawItem>,
    /// Location definitions by id.
    pub locations: BTreeMap<String, RawLocation>,
    /// Starting inventory.
    pub inventory: RawInventory,
    /// Declared choices by id.
    pub choices: BTreeMap<String, RawChoice>,
}

/// `world.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawManifest {
    /// Display name of the world.
    pub name: String,
    /// Id of the start location.
    pub start: Option<String>,
    /// Result template overrides by key.
    pub templates: BTreeMap<String, String>,
}

/// An item definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Used up on use.
    #[serde(default)]
    pub consumable: bool,
}

/// A location definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLocation {
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Furniture standing here, by id, in authoring order.
    #[serde(default)]
    pub furniture: FurnitureMap,
    /// Ids of items lying here at the start.
    #[serde(default)]
    pub items: Vec<String>,
    /// Ways out, in presentation order.
    #[serde(default)]
    pub exits: Vec<RawExit>,
}

/// Furniture of one location keyed by id.
///
/// Unlike a JSON object read into a map, entries keep the order they were
/// written in, and that order is how a location presents its furniture.
/// Repeated ids are kept so the linker can report them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FurnitureMap(Vec<(String, RawFurniture)>);

impl FurnitureMap {
    /// Append an entry.
    pub fn insert(&mut self, id: impl Into<String>, furniture: RawFurniture) {
        self.0.push((id.into(), furniture));
    }

    /// Entries in authoring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawFurniture)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, RawFurniture)> for FurnitureMap {
    fn from_iter<I: IntoIterator<Item = (K, RawFurniture)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Serialize for FurnitureMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, furniture) in &self.0 {
            map.serialize_entry(id, furniture)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FurnitureMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FurnitureMapVisitor;

        impl<'de> Visitor<'de> for FurnitureMapVisitor {
            type Value = FurnitureMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object of furniture keyed by id")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, RawFurniture>()? {
                    entries.push(entry);
                }
                Ok(FurnitureMap(entries))
            }
        }

        deserializer.deserialize_map(FurnitureMapVisitor)
    }
}

/// A piece of furniture, with both its definition and its starting state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFurniture {
    /// Kind name, e.g. `door` or `container`.
    pub kind: String,
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
    /// Contents visible while closed.
    pub is_transparent: bool,
    /// Can be turned on and off.
    pub turnable: bool,
    /// Id of the other side of a door.
    pub link_to: Option<String>,
    /// Starts locked.
    pub locked: bool,
    /// Starts open. Defaults to open unless the object starts locked.
    pub open: Option<bool>,
    /// Ids of items inside at the start.
    pub contents: Vec<String>,
}

/// An exit from one location to another.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawExit {
    /// Direction label, e.g. `down`.
    pub direction: String,
    /// Destination location id.
    pub to: String,
    /// Option text override.
    #[serde(default)]
    pub text: Option<String>,
    /// Conditions guarding the exit.
    #[serde(default)]
    pub conditions: Vec<RawRule>,
}

/// `inventory.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInventory {
    /// Starting stacks.
    pub items: Vec<RawStack>,
}

/// A stack of one item in the starting inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStack {
    /// Item id.
    pub item: String,
    /// Quantity; must be at least one.
    #[serde(default = "default_qty")]
    pub qty: i64,
}

fn default_qty() -> i64 {
    1
}

/// A declared choice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawChoice {
    /// Option text.
    pub text: String,
    /// Conditions, all of which must hold.
    #[serde(default)]
    pub conditions: Vec<RawRule>,
    /// Effects, applied in order.
    #[serde(default)]
    pub effects: Vec<RawRule>,
    /// Fixed result text.
    #[serde(default)]
    pub result_text: Option<String>,
    /// Templated result text. Takes precedence over `result_text`.
    #[serde(default)]
    pub result_renderer: Option<RawRenderer>,
}

/// A reference to a narrator template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRenderer {
    /// Template key.
    pub template: String,
    /// Placeholder values: ids are shown by display name.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

/// A condition or effect entry: `{"type": "has_item", "item": "rusty_key"}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRule {
    /// Registered type name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Every other key.
    #[serde(flatten)]
    pub params: Map<String, Value>,
}
