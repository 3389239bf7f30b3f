use ebi_objects::Activity;
use std::collections::{HashMap, HashSet};

/// A non-empty sequence of observed activities. Compared element-wise.
pub type Prefix = Vec<Activity>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrefixStatistics {
    /// Activities observed directly after the prefix.
    pub followers: HashSet<Activity>,
    /// Number of traces in which the prefix is followed by an activity.
    pub count: u64,
}

/// For every observed prefix: which activities followed it and how often it occurred.
/// Built once from the model-reproduced sequences, read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrefixAutomaton {
    prefix2statistics: HashMap<Prefix, PrefixStatistics>,
}

impl PrefixAutomaton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the automaton from (sequence, weight) pairs.
    pub fn build<'a>(sequences: impl IntoIterator<Item = (&'a [Activity], u64)>) -> Self {
        let mut result = Self::new();
        for (sequence, weight) in sequences {
            result.add_sequence(sequence, weight);
        }
        log::debug!("prefix automaton has {} prefixes", result.len());
        result
    }

    fn add_sequence(&mut self, sequence: &[Activity], weight: u64) {
        // the last activity has no successor
        for (i, next) in sequence.iter().enumerate().skip(1) {
            let prefix = &sequence[..i];
            match self.prefix2statistics.get_mut(prefix) {
                Some(statistics) => {
                    statistics.followers.insert(*next);
                    statistics.count += weight;
                }
                None => {
                    self.prefix2statistics.insert(
                        prefix.to_vec(),
                        PrefixStatistics {
                            followers: HashSet::from([*next]),
                            count: weight,
                        },
                    );
                }
            }
        }
    }

    pub fn get(&self, prefix: &[Activity]) -> Option<&PrefixStatistics> {
        self.prefix2statistics.get(prefix)
    }

    /// Activities observed after the prefix; None if the prefix was never followed.
    pub fn get_followers(&self, prefix: &[Activity]) -> Option<&HashSet<Activity>> {
        self.get(prefix).map(|statistics| &statistics.followers)
    }

    /// How often the prefix occurred with a successor, 0 if never.
    pub fn get_count(&self, prefix: &[Activity]) -> u64 {
        self.get(prefix).map_or(0, |statistics| statistics.count)
    }

    pub fn len(&self) -> usize {
        self.prefix2statistics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefix2statistics.is_empty()
    }
}
