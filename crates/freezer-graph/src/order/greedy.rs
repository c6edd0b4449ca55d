//! The greedy pass shared by package- and module-level ordering.
//!
//! Each round picks the pending keys with the fewest unsatisfied
//! successors. Among keys with that count only those whose remaining
//! successors were all picked earlier in the same round are admitted, in
//! pending order. A key that is not admissible still lowers the count for
//! the rest of the round. Picked keys are removed from the successor lists
//! of everything still referencing them.

use std::hash::Hash;

use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

/// Outcome of one greedy phase.
#[derive(Debug)]
pub(crate) struct Phase<K> {
    pub ordered: Vec<K>,
    /// Stalled keys whose unsatisfied successors are all stalled members of
    /// this phase: they sit on or behind a cycle.
    pub cyclic: Vec<K>,
    /// Stalled keys waiting, directly or through other stalled members, on
    /// something outside this phase that hasn't been placed yet.
    pub deferred: Vec<K>,
}

impl<K> Phase<K> {
    pub fn stalled(self) -> Vec<K> {
        let mut stalled = self.cyclic;
        stalled.extend(self.deferred);
        stalled
    }
}

/// Order `members` given each key's successor list.
///
/// Works on a private copy of the successor lists with everything in
/// `placed` pruned. Keys ordered by this phase are added to `placed`;
/// stalled keys are not.
pub(crate) fn run_phase<K, F>(members: Vec<K>, successors: F, placed: &mut HashSet<K>) -> Phase<K>
where
    K: Clone + Eq + Hash,
    F: Fn(&K) -> Vec<K>,
{
    let mut unsatisfied: HashMap<K, Vec<K>> = HashMap::default();
    let mut predecessors: HashMap<K, Vec<K>> = HashMap::default();

    for key in &members {
        let deps: Vec<K> = successors(key)
            .into_iter()
            .filter(|dep| dep != key && !placed.contains(dep))
            .collect();
        for dep in &deps {
            predecessors.entry(dep.clone()).or_default().push(key.clone());
        }
        unsatisfied.insert(key.clone(), deps);
    }

    let mut pending = members;
    let mut ordered = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let mut min_count = usize::MAX;
        let mut chosen: Vec<usize> = Vec::new();
        let mut chosen_keys: HashSet<K> = HashSet::default();

        for (index, key) in pending.iter().enumerate() {
            let deps = unsatisfied.get(key).map(Vec::as_slice).unwrap_or_default();
            let count = deps.len();
            if count > min_count {
                continue;
            }

            let admissible = deps
                .iter()
                .all(|dep| placed.contains(dep) || chosen_keys.contains(dep));

            if count == min_count && admissible {
                chosen.push(index);
                chosen_keys.insert(key.clone());
                continue;
            }

            min_count = count;
            if !admissible {
                continue;
            }
            chosen.clear();
            chosen.push(index);
            chosen_keys.clear();
            chosen_keys.insert(key.clone());
        }

        if chosen.is_empty() {
            break;
        }

        let picked: Vec<K> = chosen.iter().map(|&index| pending[index].clone()).collect();
        pending.retain(|key| !chosen_keys.contains(key));

        for key in &picked {
            placed.insert(key.clone());
            if let Some(preds) = predecessors.get(key) {
                for pred in preds {
                    if let Some(deps) = unsatisfied.get_mut(pred) {
                        deps.retain(|dep| dep != key);
                    }
                }
            }
        }
        ordered.extend(picked);
    }

    let (cyclic, deferred) = split_stalled(pending, &unsatisfied);
    Phase {
        ordered,
        cyclic,
        deferred,
    }
}

fn split_stalled<K>(stalled: Vec<K>, unsatisfied: &HashMap<K, Vec<K>>) -> (Vec<K>, Vec<K>)
where
    K: Clone + Eq + Hash,
{
    if stalled.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let members: HashSet<&K> = stalled.iter().collect();
    let deps_of = |key: &K| unsatisfied.get(key).map(Vec::as_slice).unwrap_or_default();

    let mut waiting: HashSet<K> = stalled
        .iter()
        .filter(|key| deps_of(key).iter().any(|dep| !members.contains(dep)))
        .cloned()
        .collect();

    loop {
        let before = waiting.len();
        for key in &stalled {
            if !waiting.contains(key) && deps_of(key).iter().any(|dep| waiting.contains(dep)) {
                waiting.insert(key.clone());
            }
        }
        if waiting.len() == before {
            break;
        }
    }

    stalled.into_iter().partition(|key| !waiting.contains(key))
}
