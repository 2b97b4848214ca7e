//! Name-to-constructor tables for conditions and effects.
//!
//! Content refers to conditions and effects by a `type` string plus
//! parameters. A [`Registry`] maps each type name to a plain constructor
//! function. It is built once at startup and handed to the content loader;
//! there is no global table.

use std::collections::HashMap;

use dk_core::{ItemId, LocationId, ObjectId};
use serde_json::{Map, Value};

use crate::choice::{Condition, Effect};
use crate::error::ConfigError;

/// Builds a [`Condition`] from its parameters.
pub type ConditionFactory = fn(&Params<'_>) -> Result<Condition, ConfigError>;

/// Builds an [`Effect`] from its parameters.
pub type EffectFactory = fn(&Params<'_>) -> Result<Effect, ConfigError>;

/// Parameters of one condition or effect entry.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    rule: &'a str,
    values: &'a Map<String, Value>,
}

impl<'a> Params<'a> {
    /// Wrap the parameter map of the rule named `rule`.
    pub fn new(rule: &'a str, values: &'a Map<String, Value>) -> Self {
        Self { rule, values }
    }

    /// A required string parameter.
    pub fn string(&self, key: &'static str) -> Result<&'a str, ConfigError> {
        match self.values.get(key) {
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(self.invalid(key, "string")),
            None => Err(ConfigError::MissingParam {
                rule: self.rule.to_string(),
                param: key,
            }),
        }
    }

    /// An optional boolean parameter.
    pub fn bool_or(&self, key: &'static str, default: bool) -> Result<bool, ConfigError> {
        match self.values.get(key) {
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(self.invalid(key, "boolean")),
            None => Ok(default),
        }
    }

    /// The `item` parameter.
    pub fn item(&self) -> Result<ItemId, ConfigError> {
        self.string("item").map(ItemId::new)
    }

    /// The `object` parameter. `container` is accepted as an alias.
    pub fn object(&self) -> Result<ObjectId, ConfigError> {
        if self.values.contains_key("container") && !self.values.contains_key("object") {
            return self.string("container").map(ObjectId::new);
        }
        self.string("object").map(ObjectId::new)
    }

    /// The `location` parameter.
    pub fn location(&self) -> Result<LocationId, ConfigError> {
        self.string("location").map(LocationId::new)
    }

    /// The `flag` parameter.
    pub fn flag(&self) -> Result<String, ConfigError> {
        self.string("flag").map(str::to_string)
    }

    fn invalid(&self, key: &str, expected: &'static str) -> ConfigError {
        ConfigError::InvalidParam {
            rule: self.rule.to_string(),
            param: key.to_string(),
            expected,
        }
    }
}

/// Dispatch tables from type name to constructor.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    conditions: HashMap<&'static str, ConditionFactory>,
    effects: HashMap<&'static str, EffectFactory>,
}

impl Registry {
    /// A registry with nothing registered.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry with every built-in condition and effect.
    pub fn standard() -> Self {
        Self::empty()
            .with_condition("has_item", |p| Ok(Condition::HasItem { item: p.item()? }))
            .with_condition("not_has_item", |p| {
                Ok(Condition::NotHasItem { item: p.item()? })
            })
            .with_condition("container_locked", |p| {
                Ok(Condition::ContainerLocked {
                    object: p.object()?,
                })
            })
            .with_condition("is_open", |p| {
                Ok(Condition::IsOpen {
                    object: p.object()?,
                })
            })
            .with_condition("is_closed", |p| {
                Ok(Condition::IsClosed {
                    object: p.object()?,
                })
            })
            .with_condition("is_turned_on", |p| {
                Ok(Condition::IsTurnedOn {
                    object: p.object()?,
                })
            })
            .with_condition("in_location", |p| {
                Ok(Condition::InLocation {
                    location: p.location()?,
                })
            })
            .with_condition("visited", |p| {
                Ok(Condition::Visited {
                    location: p.location()?,
                })
            })
            .with_condition("flag_set", |p| Ok(Condition::FlagSet { flag: p.flag()? }))
            .with_condition("flag_unset", |p| {
                Ok(Condition::FlagUnset { flag: p.flag()? })
            })
            .with_effect("consume_item", |p| {
                Ok(Effect::ConsumeItem { item: p.item()? })
            })
            .with_effect("get_item", |p| Ok(Effect::GetItem { item: p.item()? }))
            .with_effect("unlock_container", |p| {
                Ok(Effect::UnlockContainer {
                    object: p.object()?,
                })
            })
            .with_effect("lock_object", |p| {
                Ok(Effect::LockObject {
                    object: p.object()?,
                })
            })
            .with_effect("open_object", |p| {
                Ok(Effect::OpenObject {
                    object: p.object()?,
                })
            })
            .with_effect("close_object", |p| {
                Ok(Effect::CloseObject {
                    object: p.object()?,
                })
            })
            .with_effect("reveal_contents", |p| {
                Ok(Effect::RevealContents {
                    object: p.object()?,
                })
            })
            .with_effect("move_to", |p| {
                Ok(Effect::MoveTo {
                    location: p.location()?,
                })
            })
            .with_effect("set_flag", |p| {
                Ok(Effect::SetFlag {
                    flag: p.flag()?,
                    value: p.bool_or("value", true)?,
                })
            })
            .with_effect("turn_on", |p| {
                Ok(Effect::TurnOn {
                    object: p.object()?,
                })
            })
            .with_effect("turn_off", |p| {
                Ok(Effect::TurnOff {
                    object: p.object()?,
                })
            })
    }

    /// Register a condition constructor, replacing any previous one.
    pub fn with_condition(mut self, name: &'static str, factory: ConditionFactory) -> Self {
        self.conditions.insert(name, factory);
        self
    }

    /// Register an effect constructor, replacing any previous one.
    pub fn with_effect(mut self, name: &'static str, factory: EffectFactory) -> Self {
        self.effects.insert(name, factory);
        self
    }

    /// Build a condition by exact type name.
    pub fn make_condition(
        &self,
        kind: &str,
        params: &Map<String, Value>,
    ) -> Result<Condition, ConfigError> {
        let factory = self
            .conditions
            .get(kind)
            .ok_or_else(|| ConfigError::UnknownCondition(kind.to_string()))?;
        factory(&Params::new(kind, params))
    }

    /// Build an effect by exact type name.
    pub fn make_effect(&self, kind: &str, params: &Map<String, Value>) -> Result<Effect, ConfigError> {
        let factory = self
            .effects
            .get(kind)
            .ok_or_else(|| ConfigError::UnknownEffect(kind.to_string()))?;
        factory(&Params::new(kind, params))
    }

    /// Registered condition names, sorted.
    pub fn condition_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.conditions.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Registered effect names, sorted.
    pub fn effect_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.effects.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
