use std::collections::BTreeMap;

use crate::model::{Group, Section};

/// Completion counter for one non-baseline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTally {
    /// Leaf units whose state is at least the counter's state value.
    pub completed: usize,
    /// Leaf units in the whole section tree.
    pub total: usize,
}

/// Computes per-state completion counters for one section.
///
/// Every declared state except the baseline (0) gets a tally; the second
/// return value is the total leaf unit count. A section with explicit groups
/// is counted from its tree; a flat section is counted from its top-level
/// unit mapping. Empty trees produce empty counters and a zero total.
pub fn state_counters(section: &Section) -> (BTreeMap<u32, StateTally>, usize) {
    let mut unit_states = Vec::new();
    if section.groups.is_empty() {
        if let Some(units) = &section.units {
            unit_states.extend(units.values().copied());
        }
    } else {
        for group in &section.groups {
            collect_unit_states(group, &mut unit_states);
        }
    }

    let total = unit_states.len();
    let mut counters = BTreeMap::new();
    for &state in section.states.keys() {
        if state == 0 {
            continue;
        }
        let completed = unit_states.iter().filter(|&&value| value >= state).count();
        counters.insert(state, StateTally { completed, total });
    }
    (counters, total)
}

fn collect_unit_states(group: &Group, out: &mut Vec<u32>) {
    match group {
        Group::Container { subgroups, .. } => {
            for sub in subgroups {
                collect_unit_states(sub, out);
            }
        }
        Group::Leaf { units, .. } => out.extend(units.values().copied()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UnitName;
    use std::collections::BTreeMap;

    fn section_with_states(states: &[(u32, &str)]) -> Section {
        Section {
            id: "s".to_string(),
            title: String::new(),
            unit: UnitName::empty(),
            states: states
                .iter()
                .map(|(k, v)| (*k, v.to_string()))
                .collect(),
            final_state: None,
            groups: Vec::new(),
            units: None,
        }
    }

    fn leaf(id: &str, units: &[(&str, u32)]) -> Group {
        Group::Leaf {
            id: id.to_string(),
            label: id.to_string(),
            total: units.len() as u32,
            units: units
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }

    #[test]
    fn flat_section_counts_top_level_units() {
        let mut section = section_with_states(&[(0, "todo"), (1, "done")]);
        let mut units = BTreeMap::new();
        units.insert("a".to_string(), 0);
        units.insert("b".to_string(), 1);
        units.insert("c".to_string(), 1);
        section.units = Some(units);

        let (counters, total) = state_counters(&section);
        assert_eq!(total, 3);
        assert_eq!(counters[&1], StateTally { completed: 2, total: 3 });
        assert!(!counters.contains_key(&0));
    }

    #[test]
    fn tree_is_collected_recursively() {
        let mut section = section_with_states(&[(0, "todo"), (1, "scanned"), (2, "reviewed")]);
        section.groups = vec![
            leaf("a", &[("a1", 2), ("a2", 1)]),
            Group::Container {
                id: "c".to_string(),
                label: "c".to_string(),
                subgroups: vec![leaf("b", &[("b1", 0), ("b2", 2)])],
            },
        ];

        let (counters, total) = state_counters(&section);
        assert_eq!(total, 4);
        assert_eq!(counters[&1], StateTally { completed: 3, total: 4 });
        assert_eq!(counters[&2], StateTally { completed: 2, total: 4 });
    }

    #[test]
    fn completed_is_monotonically_non_increasing() {
        let mut section =
            section_with_states(&[(0, "a"), (1, "b"), (2, "c"), (3, "d")]);
        section.groups = vec![leaf("g", &[("u1", 3), ("u2", 1), ("u3", 2), ("u4", 0)])];

        let (counters, total) = state_counters(&section);
        let mut previous = total;
        for (_, tally) in counters.iter() {
            assert!(tally.completed <= tally.total);
            assert!(tally.completed <= previous);
            previous = tally.completed;
        }
    }

    #[test]
    fn empty_section_yields_zero_totals() {
        let section = section_with_states(&[(0, "todo"), (1, "done")]);
        let (counters, total) = state_counters(&section);
        assert_eq!(total, 0);
        assert_eq!(counters[&1], StateTally { completed: 0, total: 0 });
    }
}
