//! Turns raw content into a playable world.
//!
//! Linking runs in two passes. The first builds every definition and
//! remembers where each item was placed; the second resolves references
//! that may point forward (door links, exits, choice targets). Problems are
//! collected rather than returned one at a time, so a single run reports
//! everything that is wrong with the content.

use std::collections::{BTreeMap, HashMap, HashSet};

use dk_core::{
    FurnitureDef, FurnitureKind, GameContent, GameState, Inventory, ItemDef, ItemId, LocationDef,
    LocationId, ObjectId, ObjectState,
};
use dk_engine::choice::Target;
use dk_engine::{
    Choice, Condition, ConfigError, Exit, NarratorConfig, Registry, ResultText, RuleSet,
    TemplateRegistry,
};
use tracing::{info, warn};

use crate::diagnostics::Diagnostic;
use crate::error::{LoadError, LoadResult};
use crate::raw::{RawChoice, RawContent, RawExit, RawFurniture, RawLocation, RawRule};

/// A linked world, ready to start a session.
#[derive(Debug, Clone)]
pub struct LoadedWorld {
    /// Display name from the manifest.
    pub name: String,
    /// Static definitions.
    pub content: GameContent,
    /// Declared choices and exits.
    pub rules: RuleSet,
    /// Initial state at the start location.
    pub state: GameState,
    /// Narrator settings from the manifest.
    pub narrator: NarratorConfig,
    /// Non-fatal problems.
    pub warnings: Vec<Diagnostic>,
}

/// Link raw content against a registry.
///
/// Fails with [`LoadError::Invalid`] listing every error (and warning)
/// found, or returns the world together with its warnings.
pub fn link(raw: RawContent, registry: &Registry) -> LoadResult<LoadedWorld> {
    let mut linker = Linker::new(registry);
    match linker.run(raw) {
        Some(mut world) if !linker.has_errors() => {
            for w in &linker.issues {
                warn!(path = %w.path, "{}", w.message);
            }
            world.warnings = linker.issues;
            Ok(world)
        }
        _ => Err(LoadError::Invalid {
            issues: linker.issues,
        }),
    }
}

struct Linker<'r> {
    registry: &'r Registry,
    issues: Vec<Diagnostic>,
    // item -> path where it was first placed
    placed: HashMap<ItemId, String>,
}

impl<'r> Linker<'r> {
    fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            issues: Vec::new(),
            placed: HashMap::new(),
        }
    }

    fn report(&mut self, diag: Diagnostic) {
        self.issues.push(diag);
    }

    fn has_errors(&self) -> bool {
        self.issues.iter().any(Diagnostic::is_error)
    }

    fn run(&mut self, raw: RawContent) -> Option<LoadedWorld> {
        let mut content = GameContent::new();
        for (id, item) in &raw.items {
            let mut def = ItemDef::new(id.as_str(), item.name.clone())
                .with_description(item.description.clone());
            def.consumable = item.consumable;
            content.add_item(def);
        }

        // Pass 1: locations, furniture, placements.
        let mut objects = HashMap::new();
        for (lid, location) in &raw.locations {
            self.link_location(&mut content, &mut objects, lid, location);
        }
        let inventory = self.link_inventory(&content, &raw);

        // Pass 2: forward references.
        self.check_door_links(&content, &objects);
        let mut rules = RuleSet::new();
        for (lid, location) in &raw.locations {
            for (i, exit) in location.exits.iter().enumerate() {
                let path = format!("locations.{lid}.exits[{i}]");
                if let Some(exit) = self.link_exit(&content, &path, exit) {
                    rules.add_exit(LocationId::new(lid.as_str()), exit);
                }
            }
            self.check_duplicate_directions(lid, location);
        }

        let narrator = raw
            .manifest
            .templates
            .iter()
            .fold(NarratorConfig::new(), |config, (key, text)| {
                config.with_template(key.as_str(), text.as_str())
            });
        let templates = TemplateRegistry::new(&narrator);
        let generated = generated_ids(&content, &raw);
        for (cid, raw_choice) in &raw.choices {
            let path = format!("choices.{cid}");
            if generated.contains(cid.as_str()) {
                self.report(
                    Diagnostic::warning(
                        &path,
                        format!("\"{cid}\" is also the id of a generated choice"),
                    )
                    .with_help("both may be offered at once; pick another id"),
                );
            }
            let mut choice = Choice::new(cid.as_str(), raw_choice.text.clone());
            for (i, rule) in raw_choice.conditions.iter().enumerate() {
                let rule_path = format!("{path}.conditions[{i}]");
                if let Some(cond) = self.build_condition(&content, &rule_path, rule) {
                    choice = choice.with_condition(cond);
                }
            }
            for (i, rule) in raw_choice.effects.iter().enumerate() {
                let rule_path = format!("{path}.effects[{i}]");
                match self.registry.make_effect(&rule.kind, &rule.params) {
                    Ok(effect) => {
                        self.check_target(&content, &rule_path, effect.target());
                        choice = choice.with_effect(effect);
                    }
                    Err(e) => self.config_error(&rule_path, e),
                }
            }
            choice.result = self.link_result(&templates, &path, raw_choice);
            rules.add_choice(choice);
        }

        let start = self.link_start(&content, &raw);

        if self.has_errors() {
            return None;
        }
        let start = start?;
        let state = match GameState::seed(&content, start, inventory, objects) {
            Ok(state) => state,
            Err(e) => {
                self.report(Diagnostic::error("manifest.start", e.to_string()));
                return None;
            }
        };

        info!(
            world = %raw.manifest.name,
            items = content.item_count(),
            locations = content.location_count(),
            furniture = content.furniture_count(),
            choices = rules.choices().len(),
            exits = rules.exit_count(),
            "world loaded"
        );

        Some(LoadedWorld {
            name: raw.manifest.name,
            content,
            rules,
            state,
            narrator,
            warnings: Vec::new(),
        })
    }

    fn link_location(
        &mut self,
        content: &mut GameContent,
        objects: &mut HashMap<ObjectId, ObjectState>,
        lid: &str,
        raw: &RawLocation,
    ) {
        let path = format!("locations.{lid}");
        let mut location =
            LocationDef::new(lid, raw.name.clone()).with_description(raw.description.clone());

        for (i, item) in raw.items.iter().enumerate() {
            let item_path = format!("{path}.items[{i}]");
            if self.place_item(content, &item_path, item) {
                location = location.with_item(item.as_str());
            }
        }

        let mut furniture: Vec<FurnitureDef> = Vec::new();
        for (fid, raw_furniture) in raw.furniture.iter() {
            let furniture_path = format!("{path}.furniture.{fid}");
            let id = ObjectId::new(fid);
            if furniture.iter().any(|def| def.id == id) {
                self.report(Diagnostic::error(
                    &furniture_path,
                    format!("object \"{fid}\" is defined twice in this location"),
                ));
                continue;
            }
            if let Some(home) = content.object_location(&id) {
                self.report(Diagnostic::error(
                    &furniture_path,
                    format!("object \"{fid}\" is already defined in location \"{home}\""),
                ));
                continue;
            }
            let state = self.link_object_state(content, &furniture_path, raw_furniture);
            objects.insert(id.clone(), state);
            furniture.push(furniture_def(id, raw_furniture));
        }

        content.add_location(location, furniture);
    }

    fn link_object_state(
        &mut self,
        content: &GameContent,
        path: &str,
        raw: &RawFurniture,
    ) -> ObjectState {
        if raw.locked && !raw.can_lock {
            self.report(
                Diagnostic::error(path, "starts locked but cannot be locked")
                    .with_help("set \"can_lock\": true or drop \"locked\""),
            );
        }
        if raw.locked && raw.open == Some(true) {
            self.report(Diagnostic::error(path, "cannot start both locked and open"));
        }
        if !raw.contents.is_empty() && !raw.is_container {
            self.report(
                Diagnostic::warning(path, "has contents but is not a container")
                    .with_help("set \"is_container\": true"),
            );
        }

        let mut state = ObjectState {
            open: raw.open.unwrap_or(!raw.locked),
            locked: raw.locked,
            ..ObjectState::default()
        };
        for (i, item) in raw.contents.iter().enumerate() {
            let item_path = format!("{path}.contents[{i}]");
            if self.place_item(content, &item_path, item) {
                state.contents.push(ItemId::new(item.as_str()));
            }
        }
        state
    }

    /// Record that `item` is placed at `path`. Returns false (and records an
    /// error) for unknown or already placed items.
    fn place_item(&mut self, content: &GameContent, path: &str, item: &str) -> bool {
        let id = ItemId::new(item);
        if content.item(&id).is_none() {
            self.report(Diagnostic::error(path, format!("unknown item \"{item}\"")));
            return false;
        }
        if let Some(first) = self.placed.get(&id) {
            let diag = Diagnostic::error(path, format!("item \"{item}\" is placed twice"))
                .with_help(format!("it is already placed at {first}"));
            self.report(diag);
            return false;
        }
        self.placed.insert(id, path.to_string());
        true
    }

    fn link_inventory(&mut self, content: &GameContent, raw: &RawContent) -> Inventory {
        let mut inventory = Inventory::new();
        for (i, stack) in raw.inventory.items.iter().enumerate() {
            let path = format!("inventory.items[{i}]");
            let qty = match u32::try_from(stack.qty) {
                Ok(qty) if qty >= 1 => qty,
                _ => {
                    self.report(Diagnostic::error(
                        &path,
                        format!("quantity must be at least 1, got {}", stack.qty),
                    ));
                    continue;
                }
            };
            if self.place_item(content, &path, &stack.item) {
                inventory.add(ItemId::new(stack.item.as_str()), qty);
            }
        }
        inventory
    }

    fn check_door_links(
        &mut self,
        content: &GameContent,
        objects: &HashMap<ObjectId, ObjectState>,
    ) {
        let mut furniture: Vec<&FurnitureDef> = content.all_furniture().collect();
        furniture.sort_by(|a, b| a.id.cmp(&b.id));

        for def in furniture {
            let Some(target) = &def.link_to else {
                continue;
            };
            let path = match content.object_location(&def.id) {
                Some(home) => format!("locations.{home}.furniture.{}", def.id),
                None => format!("furniture.{}", def.id),
            };
            if !def.is_door() {
                self.report(
                    Diagnostic::warning(&path, "link_to is ignored")
                        .with_help("only doors have another side"),
                );
                continue;
            }
            if target == &def.id {
                self.report(Diagnostic::error(&path, "door is linked to itself"));
                continue;
            }
            match content.furniture(target) {
                None => self.report(Diagnostic::error(
                    &path,
                    format!("link_to names unknown object \"{target}\""),
                )),
                Some(other) if other.link_to.as_ref() != Some(&def.id) => {
                    self.report(
                        Diagnostic::warning(
                            &path,
                            format!("\"{target}\" does not link back to \"{}\"", def.id),
                        )
                        .with_help("opening one side will not be mirrored symmetrically"),
                    );
                }
                // Each pair is compared once, from the side with the smaller id.
                Some(_) if def.id < *target => {
                    let (Some(this), Some(that)) = (objects.get(&def.id), objects.get(target))
                    else {
                        continue;
                    };
                    if this.open != that.open || this.locked != that.locked {
                        self.report(
                            Diagnostic::error(
                                &path,
                                format!(
                                    "door starts {} but its other side \"{target}\" starts {}",
                                    door_state(this),
                                    door_state(that)
                                ),
                            )
                            .with_help("give both sides the same \"open\" and \"locked\""),
                        );
                    }
                }
                Some(_) => {}
            }
        }
    }

    fn link_exit(&mut self, content: &GameContent, path: &str, raw: &RawExit) -> Option<Exit> {
        let mut ok = true;
        if raw.direction.trim().is_empty() {
            self.report(Diagnostic::error(path, "exit has no direction"));
            ok = false;
        }
        let to = LocationId::new(raw.to.as_str());
        if content.location(&to).is_none() {
            self.report(Diagnostic::error(
                path,
                format!("exit leads to unknown location \"{}\"", raw.to),
            ));
            ok = false;
        }

        let mut exit = Exit::new(raw.direction.as_str(), to);
        exit.text = raw.text.clone();
        for (i, rule) in raw.conditions.iter().enumerate() {
            let rule_path = format!("{path}.conditions[{i}]");
            match self.build_condition(content, &rule_path, rule) {
                Some(cond) => exit = exit.with_condition(cond),
                None => ok = false,
            }
        }
        ok.then_some(exit)
    }

    fn check_duplicate_directions(&mut self, lid: &str, raw: &RawLocation) {
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for (i, exit) in raw.exits.iter().enumerate() {
            if let Some(first) = seen.insert(exit.direction.as_str(), i) {
                self.report(Diagnostic::error(
                    format!("locations.{lid}.exits[{i}]"),
                    format!(
                        "direction \"{}\" is already used by exits[{first}]",
                        exit.direction
                    ),
                ));
            }
        }
    }

    fn build_condition(
        &mut self,
        content: &GameContent,
        path: &str,
        rule: &RawRule,
    ) -> Option<Condition> {
        match self.registry.make_condition(&rule.kind, &rule.params) {
            Ok(cond) => {
                self.check_target(content, path, cond.target());
                Some(cond)
            }
            Err(e) => {
                self.config_error(path, e);
                None
            }
        }
    }

    fn config_error(&mut self, path: &str, err: ConfigError) {
        let diag = Diagnostic::error(path, err.to_string());
        let diag = match &err {
            ConfigError::UnknownCondition(_) => diag.with_help(format!(
                "known conditions: {}",
                self.registry.condition_names().join(", ")
            )),
            ConfigError::UnknownEffect(_) => diag.with_help(format!(
                "known effects: {}",
                self.registry.effect_names().join(", ")
            )),
            _ => diag,
        };
        self.report(diag);
    }

    fn check_target(&mut self, content: &GameContent, path: &str, target: Option<Target<'_>>) {
        let missing = match target {
            Some(Target::Item(id)) if content.item(id).is_none() => format!("unknown item \"{id}\""),
            Some(Target::Object(id)) if content.furniture(id).is_none() => {
                format!("unknown object \"{id}\"")
            }
            Some(Target::Location(id)) if content.location(id).is_none() => {
                format!("unknown location \"{id}\"")
            }
            _ => return,
        };
        self.report(Diagnostic::error(path, missing));
    }

    fn link_result(
        &mut self,
        templates: &TemplateRegistry,
        path: &str,
        raw: &RawChoice,
    ) -> ResultText {
        match (&raw.result_renderer, &raw.result_text) {
            (Some(renderer), text) => {
                if text.is_some() {
                    self.report(Diagnostic::warning(
                        path,
                        "both result_text and result_renderer are set; result_text is ignored",
                    ));
                }
                if !templates.contains(&renderer.template) {
                    self.report(Diagnostic::error(
                        format!("{path}.result_renderer"),
                        ConfigError::UnknownTemplate(renderer.template.clone()).to_string(),
                    ));
                }
                ResultText::Template {
                    key: renderer.template.clone(),
                    params: renderer.params.clone(),
                }
            }
            (None, Some(text)) => ResultText::Literal(text.clone()),
            (None, None) => ResultText::default(),
        }
    }

    fn link_start(&mut self, content: &GameContent, raw: &RawContent) -> Option<LocationId> {
        let Some(start) = &raw.manifest.start else {
            self.report(
                Diagnostic::error("manifest.start", "no start location")
                    .with_help("add \"start\": \"<location id>\" to world.json"),
            );
            return None;
        };
        let start = LocationId::new(start.as_str());
        if content.location(&start).is_none() {
            self.report(Diagnostic::error(
                "manifest.start",
                format!("start location \"{start}\" does not exist"),
            ));
            return None;
        }
        Some(start)
    }
}

/// Ids the pick up, open and travel generators can produce for this content.
fn generated_ids(content: &GameContent, raw: &RawContent) -> HashSet<String> {
    let pickups = content.items().map(|item| format!("pick_up_{}", item.id));
    let opens = content
        .all_furniture()
        .filter(|def| def.can_open)
        .map(|def| format!("open_{}", def.id));
    let travels = raw
        .locations
        .values()
        .flat_map(|location| &location.exits)
        .map(|exit| format!("go_{}", exit.direction));
    pickups.chain(opens).chain(travels).collect()
}

fn door_state(obj: &ObjectState) -> &'static str {
    match (obj.open, obj.locked) {
        (true, _) => "open",
        (false, true) => "closed and locked",
        (false, false) => "closed",
    }
}

fn furniture_def(id: ObjectId, raw: &RawFurniture) -> FurnitureDef {
    let mut def = FurnitureDef::new(id, FurnitureKind::parse(&raw.kind), raw.name.clone())
        .with_description(raw.description.clone());
    def.can_open = raw.can_open;
    def.can_lock = raw.can_lock;
    def.is_container = raw.is_container;
    def.is_transparent = raw.is_transparent;
    def.turnable = raw.turnable;
    def.link_to = raw.link_to.as_deref().map(ObjectId::new);
    def
}
