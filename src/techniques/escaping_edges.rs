use anyhow::{anyhow, Context, Result};
use ebi_objects::{ebi_objects::language_of_alignments::Move, Activity};
use std::{
    collections::{HashMap, HashSet},
    hash::Hash,
};

use crate::{
    objects::alignment::{get_synchronous_activity, last_synchronous_move},
    semantics::semantics::Semantics,
    techniques::prefix_automaton::{Prefix, PrefixAutomaton},
};

/// Memoises, per model state, the activities that are eventually enabled.
#[derive(Debug)]
pub struct StateCache<State: Clone + Hash + Eq> {
    state2enabled: HashMap<State, HashSet<Activity>>,
}

impl<State: Clone + Hash + Eq> StateCache<State> {
    pub fn new() -> Self {
        Self {
            state2enabled: HashMap::new(),
        }
    }

    pub fn get_enabled_activities<S>(&mut self, semantics: &S, state: &State) -> Result<&HashSet<Activity>>
    where
        S: Semantics<SemState = State> + ?Sized,
    {
        if !self.state2enabled.contains_key(state) {
            let enabled = semantics.get_activities_eventually_enabled(state)?;
            self.state2enabled.insert(state.clone(), enabled);
        }
        self.state2enabled
            .get(state)
            .ok_or_else(|| anyhow!("state vanished from the cache"))
    }

    pub fn len(&self) -> usize {
        self.state2enabled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state2enabled.is_empty()
    }
}

impl<State: Clone + Hash + Eq> Default for StateCache<State> {
    fn default() -> Self {
        Self::new()
    }
}

/// Weighted sums gathered while replaying the alignments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplayTotals {
    pub sum_enabled: u64,
    pub sum_escaping: u64,
    /// Escaping activities of every processed prefix; may be empty sets.
    pub escaping_edges: HashMap<Prefix, HashSet<Activity>>,
}

/// Second pass: walks every alignment through the model and, the first time a
/// prefix is seen, compares what the model enables with what the log shows next.
pub struct EscapingEdgesReplay<'a, S: Semantics + ?Sized> {
    semantics: &'a S,
    automaton: &'a PrefixAutomaton,
    state_cache: StateCache<S::SemState>,
    processed_prefixes: HashSet<Prefix>,
    totals: ReplayTotals,
}

impl<'a, S: Semantics + ?Sized> EscapingEdgesReplay<'a, S> {
    pub fn new(semantics: &'a S, automaton: &'a PrefixAutomaton) -> Self {
        Self {
            semantics,
            automaton,
            state_cache: StateCache::new(),
            processed_prefixes: HashSet::new(),
            totals: ReplayTotals::default(),
        }
    }

    pub fn replay(&mut self, alignment: &[Move]) -> Result<()> {
        // moves after the last synchronous one add no evidence
        let last = match last_synchronous_move(alignment) {
            Some(last) => last,
            None => return Ok(()),
        };

        let mut state = self
            .semantics
            .get_initial_state()
            .ok_or_else(|| anyhow!("the model has no initial state"))?;
        let mut prefix: Prefix = vec![];

        for (index, step) in alignment[..last].iter().enumerate() {
            if let Some(transition) = step.get_transition() {
                self.semantics
                    .execute_transition(&mut state, transition)
                    .with_context(|| format!("replaying move {} of the alignment", index))?;
            }

            if let Some(activity) = get_synchronous_activity(step) {
                prefix.push(activity);
                if !self.processed_prefixes.contains(&prefix) {
                    self.process_prefix(&prefix, &state)?;
                    self.processed_prefixes.insert(prefix.clone());
                }
            }
        }

        Ok(())
    }

    fn process_prefix(&mut self, prefix: &[Activity], state: &S::SemState) -> Result<()> {
        let enabled = self.state_cache.get_enabled_activities(self.semantics, state)?;
        let escaping: HashSet<Activity> = match self.automaton.get_followers(prefix) {
            Some(observed) => enabled.difference(observed).copied().collect(),
            None => enabled.clone(),
        };
        let multiplicity = self.automaton.get_count(prefix);

        log::trace!(
            "prefix {:?} in {}: {} enabled, {} escaping, multiplicity {}",
            prefix,
            state,
            enabled.len(),
            escaping.len(),
            multiplicity
        );

        self.totals.sum_enabled += enabled.len() as u64 * multiplicity;
        self.totals.sum_escaping += escaping.len() as u64 * multiplicity;
        self.totals.escaping_edges.insert(prefix.to_vec(), escaping);
        Ok(())
    }

    pub fn get_state_cache_mut(&mut self) -> &mut StateCache<S::SemState> {
        &mut self.state_cache
    }

    pub fn get_number_of_processed_prefixes(&self) -> usize {
        self.processed_prefixes.len()
    }

    pub fn into_totals(self) -> ReplayTotals {
        log::debug!(
            "replay processed {} prefixes over {} distinct states",
            self.processed_prefixes.len(),
            self.state_cache.len()
        );
        self.totals
    }
}
