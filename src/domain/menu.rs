//! Menu graph - rebuilds menus and targets from one query's log records

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use super::{Action, ContractInstance, Field, LogRecord, LogValue, RecordKind, Resolver};
use crate::error::{Error, Result};

/// One raw content entry, in emission order
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub field: Field,
    pub args: Vec<LogValue>,
}

impl MenuItem {
    pub fn new(field: Field, args: Vec<LogValue>) -> Self {
        Self { field, args }
    }
}

/// A selectable option within a menu
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// Owning menu id
    pub menu: String,
    pub id: String,
    /// Display label, falls back to `id`
    pub button: Option<String>,
    pub note: Vec<String>,
    pub action: Option<Action>,
}

impl Target {
    pub fn label(&self) -> &str {
        self.button.as_deref().unwrap_or(&self.id)
    }

    fn from_raw(
        raw: &RawTarget,
        context: &ContractInstance,
        resolver: &Resolver<'_>,
    ) -> Result<Self> {
        let mut menu = None;
        let mut id = None;
        let mut button = None;
        let mut note = Vec::new();
        let mut action = None;

        for item in &raw.entries {
            let value = item.args.first();
            match item.field {
                // A bare `Menu`/`Id` record only confirms the key it was sent with.
                Field::Menu => {
                    if let Some(value) = value {
                        menu = Some(expect_text(value, "target menu")?.to_string());
                    }
                }
                Field::Id => {
                    if let Some(value) = value {
                        id = Some(expect_text(value, "target id")?.to_string());
                    }
                }
                Field::Note => note.push(value.map(ToString::to_string).unwrap_or_default()),
                Field::Button => {
                    let value = value.ok_or_else(|| Error::MalformedTarget {
                        key: raw.key(),
                        reason: "button without a label".into(),
                    })?;
                    button = Some(value.to_string());
                }
                Field::Action => action = Some(resolver.resolve(&item.args, context)?),
                _ => debug!(target_key = %raw.key(), field = %item.field, "ignoring target field"),
            }
        }

        let (Some(menu), Some(id)) = (menu, id) else {
            return Err(Error::MalformedTarget {
                key: raw.key(),
                reason: "no id or menu provided".into(),
            });
        };
        if menu.is_empty() || id.is_empty() {
            return Err(Error::MalformedTarget {
                key: raw.key(),
                reason: "empty id or menu".into(),
            });
        }

        Ok(Self {
            menu,
            id,
            button,
            note,
            action,
        })
    }
}

/// A menu: its content in emission order plus its targets by id
#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
    pub id: String,
    pub items: Vec<MenuItem>,
    pub targets: IndexMap<String, Target>,
}

/// All menus produced by one query, in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuGraph {
    menus: IndexMap<String, Menu>,
}

/// Target records accumulated under one `(menu, id)` key
#[derive(Debug)]
struct RawTarget {
    menu: String,
    id: String,
    entries: Vec<MenuItem>,
}

impl RawTarget {
    fn new(menu: &str, id: &str) -> Self {
        Self {
            menu: menu.to_string(),
            id: id.to_string(),
            entries: vec![
                MenuItem::new(Field::Menu, vec![LogValue::text(menu)]),
                MenuItem::new(Field::Id, vec![LogValue::text(id)]),
            ],
        }
    }

    fn key(&self) -> String {
        format!("{}/{}", self.menu, self.id)
    }
}

impl MenuGraph {
    /// Build the graph from one query's records.
    ///
    /// Records may arrive interleaved, so menus and targets are accumulated
    /// first and assembled in a second pass. Malformed keys are skipped;
    /// a target that cannot be constructed aborts the build. Actions without
    /// a contract override bind to `context`, the instance that was queried.
    pub fn build(
        logs: &[LogRecord],
        context: &ContractInstance,
        resolver: &Resolver<'_>,
    ) -> Result<Self> {
        let mut menus_raw: IndexMap<String, Vec<MenuItem>> = IndexMap::new();
        let mut targets_raw: IndexMap<(String, String), RawTarget> = IndexMap::new();

        for record in logs {
            let Some((kind, field)) = record.kind() else {
                debug!(name = %record.name, origin = %record.origin, "ignoring non-menu record");
                continue;
            };
            let Some((key, rest)) = record.args.split_first() else {
                warn!(name = %record.name, origin = %record.origin, "record has no key argument");
                continue;
            };

            match kind {
                RecordKind::Target => {
                    let Some((menu_id, target_id)) = target_key(key) else {
                        warn!(name = %record.name, key = %key, "target key is not a (menu, id) pair");
                        continue;
                    };
                    let raw = targets_raw
                        .entry((menu_id.to_string(), target_id.to_string()))
                        .or_insert_with(|| {
                            menus_raw.entry(menu_id.to_string()).or_default().push(
                                MenuItem::new(Field::Target, vec![LogValue::text(target_id)]),
                            );
                            RawTarget::new(menu_id, target_id)
                        });
                    raw.entries.push(MenuItem::new(field, rest.to_vec()));
                }
                RecordKind::Menu => {
                    let Some(menu_id) = key.as_text() else {
                        warn!(name = %record.name, key = %key, "menu id is not text");
                        continue;
                    };
                    menus_raw
                        .entry(menu_id.to_string())
                        .or_insert_with(|| vec![MenuItem::new(Field::Id, vec![key.clone()])])
                        .push(MenuItem::new(field, rest.to_vec()));
                }
            }
        }

        let mut menus = IndexMap::with_capacity(menus_raw.len());
        for (menu_id, items) in menus_raw {
            let mut targets = IndexMap::new();
            for ((target_menu, target_id), raw) in &targets_raw {
                if *target_menu != menu_id {
                    trace!(menu = %menu_id, target_id = %target_id, "skipping target of another menu");
                    continue;
                }
                let target = Target::from_raw(raw, context, resolver)?;
                if target.menu != menu_id {
                    warn!(
                        menu = %menu_id,
                        target_id = %target.id,
                        declared = %target.menu,
                        "dropping target declared for a different menu"
                    );
                    continue;
                }
                targets.insert(target.id.clone(), target);
            }
            menus.insert(
                menu_id.clone(),
                Menu {
                    id: menu_id,
                    items,
                    targets,
                },
            );
        }

        Ok(Self { menus })
    }

    pub fn menus(&self) -> impl Iterator<Item = &Menu> {
        self.menus.values()
    }

    pub fn get(&self, menu_id: &str) -> Option<&Menu> {
        self.menus.get(menu_id)
    }

    pub fn len(&self) -> usize {
        self.menus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }
}

fn target_key(value: &LogValue) -> Option<(&str, &str)> {
    match value.as_list()? {
        [menu, id] => Some((menu.as_text()?, id.as_text()?)),
        _ => None,
    }
}

fn expect_text<'v>(value: &'v LogValue, field: &'static str) -> Result<&'v str> {
    value.as_text().ok_or_else(|| Error::UnexpectedValue {
        field,
        expected: "text",
        found: value.kind().to_string(),
    })
}
