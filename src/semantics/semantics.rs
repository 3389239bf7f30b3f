use anyhow::Result;
use ebi_objects::{ebi_objects::labelled_petri_net::TransitionIndex, Activity, ActivityKey};
use std::{
    collections::{HashSet, VecDeque},
    fmt::{Debug, Display},
    hash::Hash,
};

/// Execution engine of a process model: which transitions are enabled in a
/// state, what firing one does, and which activity (if any) it carries.
pub trait Semantics {
    type SemState: Display + Debug + Clone + Hash + Eq;

    fn activity_key_mut(&mut self) -> &mut ActivityKey;

    /// None if the model has no initial state.
    fn get_initial_state(&self) -> Option<Self::SemState>;

    fn is_final_state(&self, state: &Self::SemState) -> bool;

    /// Fires the transition. Fails if it is not enabled in the state.
    fn execute_transition(&self, state: &mut Self::SemState, transition: TransitionIndex) -> Result<()>;

    fn get_enabled_transitions(&self, state: &Self::SemState) -> Vec<TransitionIndex>;

    fn get_transition_activity(&self, transition: TransitionIndex) -> Option<Activity>;

    fn is_transition_silent(&self, transition: TransitionIndex) -> bool {
        self.get_transition_activity(transition).is_none()
    }

    /// The activities of all labelled transitions that become enabled after
    /// firing zero or more silent transitions from `state`. Every state
    /// reachable through silent transitions only is visited once, so silent
    /// cycles terminate.
    fn get_activities_eventually_enabled(&self, state: &Self::SemState) -> Result<HashSet<Activity>> {
        let mut result = HashSet::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        visited.insert(state.clone());
        queue.push_back(state.clone());

        while let Some(current) = queue.pop_front() {
            for transition in self.get_enabled_transitions(&current) {
                if self.is_transition_silent(transition) {
                    let mut next = current.clone();
                    self.execute_transition(&mut next, transition)?;
                    if !visited.contains(&next) {
                        visited.insert(next.clone());
                        queue.push_back(next);
                    }
                } else if let Some(activity) = self.get_transition_activity(transition) {
                    result.insert(activity);
                }
            }
        }

        log::trace!(
            "{} activities eventually enabled in {}, {} silently reachable states",
            result.len(),
            state,
            visited.len()
        );
        Ok(result)
    }
}
