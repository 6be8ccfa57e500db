//! Process-wide effect catalog and the loader that validates content into it.

use crate::core::descriptor::{EffectDescriptor, EffectFlag, EffectKind, FieldSlot, Hook, HookFn};
use crate::core::events::EventKind;
use crate::core::utils::is_valid_id;
use crate::error::{BattleError, ContentError};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Finalized, read-only set of effect descriptors.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    effects: HashMap<String, Arc<EffectDescriptor>>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Built-in conditions plus the bundled custom ability/item pack.
    pub fn load_default() -> (Self, LoadReport) {
        let mut builder = Self::builder();
        crate::core::statuses::register(&mut builder);
        crate::core::abilities::register(&mut builder);
        crate::core::items::register(&mut builder);
        builder.load_yaml_str(include_str!("../../data/content/slrb.yaml"));
        builder.build_with_report()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<EffectDescriptor>> {
        self.effects.get(id)
    }

    pub fn require(&self, id: &str) -> Result<&Arc<EffectDescriptor>, BattleError> {
        self.effects
            .get(id)
            .ok_or_else(|| BattleError::UnknownEffect(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.effects.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.effects.keys().map(String::as_str)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub rejected: Vec<ContentError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Content metadata as it appears in YAML.
#[derive(Debug, Deserialize)]
struct RawDescriptor {
    id: String,
    name: String,
    kind: EffectKind,
    #[serde(default)]
    slot: Option<FieldSlot>,
    #[serde(default)]
    flags: Vec<String>,
    #[serde(default)]
    priorities: BTreeMap<String, i32>,
    #[serde(default)]
    sub_orders: BTreeMap<String, i32>,
    #[serde(default)]
    duration: Option<u32>,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    extra: BTreeMap<String, Value>,
}

#[derive(Default)]
struct Ordering {
    priorities: BTreeMap<EventKind, i32>,
    sub_orders: BTreeMap<EventKind, i32>,
}

#[derive(Default)]
pub struct CatalogBuilder {
    entries: Vec<EffectDescriptor>,
    bindings: Vec<(String, EventKind, HookFn)>,
    ordering: HashMap<String, Ordering>,
    errors: Vec<ContentError>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a descriptor built in code.
    pub fn add(&mut self, descriptor: EffectDescriptor) -> &mut Self {
        self.entries.push(descriptor);
        self
    }

    /// Binds a hook to an effect that is (or will be) loaded from metadata.
    pub fn hook(&mut self, id: &str, event: EventKind, callback: HookFn) -> &mut Self {
        self.bindings.push((id.to_string(), event, callback));
        self
    }

    /// Loads a YAML sequence of descriptor metadata. Bad entries are recorded and skipped.
    pub fn load_yaml_str(&mut self, yaml: &str) -> usize {
        let document: serde_yaml::Value = match serde_yaml::from_str(yaml) {
            Ok(doc) => doc,
            Err(err) => {
                self.reject(ContentError::Malformed(err.to_string()));
                return 0;
            }
        };
        let Some(entries) = document.as_sequence() else {
            self.reject(ContentError::Malformed("content document must be a sequence".to_string()));
            return 0;
        };

        let mut accepted = 0;
        for entry in entries {
            let raw: RawDescriptor = match serde_yaml::from_value(entry.clone()) {
                Ok(raw) => raw,
                Err(err) => {
                    self.reject(ContentError::Malformed(err.to_string()));
                    continue;
                }
            };
            match Self::convert(raw) {
                Ok((descriptor, ordering)) => {
                    self.ordering.insert(descriptor.id.clone(), ordering);
                    self.entries.push(descriptor);
                    accepted += 1;
                }
                Err(err) => self.reject(err),
            }
        }
        accepted
    }

    fn convert(raw: RawDescriptor) -> Result<(EffectDescriptor, Ordering), ContentError> {
        let mut descriptor = EffectDescriptor::new(raw.id.clone(), raw.name, raw.kind);
        descriptor.slot = raw.slot;
        descriptor.duration = raw.duration;
        descriptor.desc = raw.desc;
        descriptor.extra = raw.extra;
        for flag in &raw.flags {
            let parsed: EffectFlag = flag.parse().map_err(|_| ContentError::UnknownFlag {
                id: raw.id.clone(),
                flag: flag.clone(),
            })?;
            descriptor.flags.insert(parsed);
        }

        let parse_event = |name: &String| -> Result<EventKind, ContentError> {
            name.parse().map_err(|_| ContentError::UnknownEvent {
                id: raw.id.clone(),
                event: name.clone(),
            })
        };
        let mut ordering = Ordering::default();
        for (event, priority) in &raw.priorities {
            ordering.priorities.insert(parse_event(event)?, *priority);
        }
        for (event, sub_order) in &raw.sub_orders {
            ordering.sub_orders.insert(parse_event(event)?, *sub_order);
        }
        Ok((descriptor, ordering))
    }

    fn reject(&mut self, error: ContentError) {
        warn!(%error, "rejected content");
        self.errors.push(error);
    }

    pub fn build(self) -> Catalog {
        self.build_with_report().0
    }

    pub fn build_with_report(mut self) -> (Catalog, LoadReport) {
        let mut effects: HashMap<String, EffectDescriptor> = HashMap::new();
        let entries = std::mem::take(&mut self.entries);
        for descriptor in entries {
            if !is_valid_id(&descriptor.id) {
                self.reject(ContentError::InvalidId(descriptor.id.clone()));
                continue;
            }
            if effects.contains_key(&descriptor.id) {
                self.reject(ContentError::DuplicateId(descriptor.id.clone()));
                continue;
            }
            if descriptor.kind == EffectKind::FieldCondition && descriptor.slot.is_none() {
                self.reject(ContentError::Malformed(format!(
                    "field condition '{}' has no slot",
                    descriptor.id
                )));
                continue;
            }
            effects.insert(descriptor.id.clone(), descriptor);
        }

        let bindings = std::mem::take(&mut self.bindings);
        for (id, event, callback) in bindings {
            match effects.get_mut(&id) {
                Some(descriptor) => {
                    let existing = descriptor.hooks.get(&event).copied();
                    descriptor.hooks.insert(
                        event,
                        Hook {
                            callback,
                            priority: existing.map(|h| h.priority).unwrap_or(0),
                            sub_order: existing.map(|h| h.sub_order).unwrap_or(0),
                        },
                    );
                }
                None => self.reject(ContentError::UnboundHook {
                    id,
                    event: event.to_string(),
                }),
            }
        }

        let ordering = std::mem::take(&mut self.ordering);
        let mut orphaned = HashSet::new();
        for (id, order) in ordering {
            let Some(descriptor) = effects.get_mut(&id) else {
                continue;
            };
            let declared = order.priorities.keys().chain(order.sub_orders.keys());
            if let Some(missing) = declared.copied().find(|event| !descriptor.hooks.contains_key(event)) {
                self.reject(ContentError::OrphanPriority {
                    id: id.clone(),
                    event: missing.to_string(),
                });
                orphaned.insert(id);
                continue;
            }
            for (event, priority) in order.priorities {
                if let Some(hook) = descriptor.hooks.get_mut(&event) {
                    hook.priority = priority;
                }
            }
            for (event, sub_order) in order.sub_orders {
                if let Some(hook) = descriptor.hooks.get_mut(&event) {
                    hook.sub_order = sub_order;
                }
            }
        }
        for id in orphaned {
            effects.remove(&id);
        }

        let report = LoadReport {
            loaded: effects.len(),
            rejected: self.errors,
        };
        debug!(loaded = report.loaded, rejected = report.rejected.len(), "catalog built");
        let catalog = Catalog {
            effects: effects
                .into_iter()
                .map(|(id, descriptor)| (id, Arc::new(descriptor)))
                .collect(),
        };
        (catalog, report)
    }
}
