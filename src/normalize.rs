use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::diagnostics::Diagnostics;
use crate::model::{Group, Section, UnitName};

/// Walks a raw progress structure and produces the canonical section list.
///
/// Only three conditions are fatal and yield `None`: a non-mapping root, a
/// missing `sections` key, and a non-mapping `sections` value. Everything
/// else is repaired with a default and recorded in `diag`; a malformed
/// group or section skips only that element.
pub fn normalize(raw: &Value, diag: &mut Diagnostics) -> Option<Vec<Section>> {
    let Some(root) = raw.as_object() else {
        diag.error("top-level progress structure must be a mapping");
        return None;
    };
    let Some(sections_raw) = field(root, "sections") else {
        diag.error("missing top-level 'sections' key");
        return None;
    };
    let Some(sections_map) = sections_raw.as_object() else {
        diag.error("'sections' must be a mapping");
        return None;
    };

    let mut sections = Vec::new();
    for (key, value) in sections_map {
        if let Some(section) = normalize_section(key, value, diag) {
            sections.push(section);
        }
    }
    Some(sections)
}

fn normalize_section(key: &str, value: &Value, diag: &mut Diagnostics) -> Option<Section> {
    let Some(obj) = value.as_object() else {
        diag.error(format!("section '{key}' must be a mapping; skipping"));
        return None;
    };

    let title = match field(obj, "title") {
        None => String::new(),
        Some(Value::String(title)) => title.clone(),
        Some(_) => {
            diag.error(format!(
                "section '{key}': 'title' must be a string; using empty string"
            ));
            String::new()
        }
    };

    let unit = match field(obj, "unit") {
        None => {
            diag.error(format!(
                "section '{key}': missing 'unit' mapping; using empty placeholders"
            ));
            UnitName::empty()
        }
        Some(value) => match value.as_object() {
            Some(map) => {
                if !map.contains_key("name") {
                    diag.error(format!(
                        "section '{key}': 'unit' must be a mapping with at least 'name'; normalising"
                    ));
                }
                UnitName {
                    name: string_or_empty(map.get("name")),
                    plural: string_or_empty(map.get("plural")),
                }
            }
            None => {
                diag.error(format!(
                    "section '{key}': 'unit' must be a mapping with at least 'name'; normalising"
                ));
                UnitName::empty()
            }
        },
    };

    let mut states = BTreeMap::new();
    if let Some(value) = field(obj, "states") {
        match value.as_object() {
            Some(map) => {
                for (state_key, label) in map {
                    let Ok(state) = state_key.trim().parse::<u32>() else {
                        diag.error(format!(
                            "section '{key}': state key '{state_key}' is not an integer; skipping"
                        ));
                        continue;
                    };
                    let label = match label {
                        Value::String(label) => label.clone(),
                        other => {
                            diag.error(format!(
                                "section '{key}': state label for '{state_key}' should be a string; casting"
                            ));
                            stringify(other)
                        }
                    };
                    states.insert(state, label);
                }
            }
            None => {
                diag.error(format!(
                    "section '{key}': 'states' must be a mapping; defaulting to empty"
                ));
            }
        }
    }

    let final_state = match field(obj, "final_state") {
        None => None,
        Some(value) => match coerce_u32(value) {
            Some(state) => Some(state),
            None => {
                diag.error(format!(
                    "section '{key}': 'final_state' must be an integer; setting to none"
                ));
                None
            }
        },
    };

    let groups = match field(obj, "groups") {
        None => Vec::new(),
        Some(value) => {
            let items: &[Value] = match value.as_array() {
                Some(items) => items,
                None => {
                    diag.error(format!("section '{key}': 'groups' must be a list"));
                    &[]
                }
            };
            if items.is_empty() {
                diag.warning(format!("section '{key}': 'groups' is empty"));
            }
            let context = format!("section '{key}'");
            items
                .iter()
                .enumerate()
                .filter_map(|(index, group)| normalize_group(&context, index, group, diag))
                .collect()
        }
    };

    let units = match field(obj, "units") {
        None => None,
        Some(value) => Some(match value.as_object() {
            Some(map) => parse_unit_states(map),
            None => {
                diag.error(format!(
                    "section '{key}': top-level 'units' must be a mapping; using empty dict"
                ));
                BTreeMap::new()
            }
        }),
    };
    if let Some(map) = &units {
        if map.is_empty() {
            diag.warning(format!("section '{key}': top-level 'units' is empty"));
        }
    }

    Some(Section {
        id: key.to_string(),
        title,
        unit,
        states,
        final_state,
        groups,
        units,
    })
}

fn normalize_group(
    context: &str,
    index: usize,
    value: &Value,
    diag: &mut Diagnostics,
) -> Option<Group> {
    let Some(obj) = value.as_object() else {
        diag.error(format!(
            "{context}: group at index {index} must be a mapping; skipping"
        ));
        return None;
    };
    let Some(id) = field(obj, "id").and_then(Value::as_str) else {
        diag.error(format!(
            "{context}: group at index {index} missing a string 'id'; skipping"
        ));
        return None;
    };
    let label = string_or_empty(obj.get("label"));

    // A 'subgroups' key makes this a container; any group-level total/units
    // are not authoritative and are dropped.
    if let Some(value) = field(obj, "subgroups") {
        let items: &[Value] = match value.as_array() {
            Some(items) => items,
            None => {
                diag.error(format!("{context}, group '{id}': 'subgroups' must be a list"));
                &[]
            }
        };
        let child_context = format!("{context}, group '{id}'");
        let subgroups = items
            .iter()
            .enumerate()
            .filter_map(|(child_index, child)| {
                normalize_group(&child_context, child_index, child, diag)
            })
            .collect();
        return Some(Group::Container {
            id: id.to_string(),
            label,
            subgroups,
        });
    }

    let total = match field(obj, "total") {
        None => {
            diag.warning(format!(
                "{context}, group '{id}': missing 'total'; setting to 0"
            ));
            0
        }
        Some(value) => match coerce_u32(value) {
            Some(total) => total,
            None => {
                diag.error(format!(
                    "{context}, group '{id}': 'total' is not an integer; setting to 0"
                ));
                0
            }
        },
    };

    let mut units = match field(obj, "units") {
        None => BTreeMap::new(),
        Some(value) => match value.as_object() {
            Some(map) => parse_unit_states(map),
            None => {
                diag.error(format!(
                    "{context}, group '{id}': 'units' must be a mapping; using empty dict"
                ));
                BTreeMap::new()
            }
        },
    };
    pad_missing_units(id, total, &mut units);

    Some(Group::Leaf {
        id: id.to_string(),
        label,
        total,
        units,
    })
}

/// Declared capacity above the listed unit count is filled with placeholder
/// zero-state units so the grid and the counters agree on what exists.
fn pad_missing_units(group_id: &str, total: u32, units: &mut BTreeMap<String, u32>) {
    let capacity = total as usize;
    let mut next = 1usize;
    while units.len() < capacity {
        let placeholder = format!("{group_id}-{next:03}");
        units.entry(placeholder).or_insert(0);
        next += 1;
    }
}

fn parse_unit_states(map: &Map<String, Value>) -> BTreeMap<String, u32> {
    map.iter()
        .map(|(id, state)| (id.clone(), coerce_u32(state).unwrap_or(0)))
        .collect()
}

/// `null` counts as absent everywhere.
fn field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|value| !value.is_null())
}

fn coerce_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn string_or_empty(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).unwrap_or_default().to_string()
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
