use anyhow::{anyhow, Context, Result};
use ebi_objects::{
    ebi_objects::labelled_petri_net::TransitionIndex, marking::Marking, Activity, ActivityKey,
};

use crate::{objects::accepting_petri_net::AcceptingPetriNet, semantics::semantics::Semantics};

impl AcceptingPetriNet {
    pub fn is_transition_enabled(&self, marking: &Marking, transition: TransitionIndex) -> bool {
        match self.net.get_incoming_places(transition) {
            Some(mut arcs) => arcs.all(|(place, cardinality)| {
                marking
                    .get_place2token()
                    .get(place)
                    .is_some_and(|tokens| *tokens >= cardinality)
            }),
            None => false,
        }
    }
}

impl Semantics for AcceptingPetriNet {
    type SemState = Marking;

    fn activity_key_mut(&mut self) -> &mut ActivityKey {
        &mut self.net.activity_key
    }

    fn get_initial_state(&self) -> Option<Marking> {
        self.net.get_initial_marking().clone()
    }

    fn is_final_state(&self, state: &Marking) -> bool {
        state == self.get_final_marking()
    }

    fn execute_transition(&self, state: &mut Marking, transition: TransitionIndex) -> Result<()> {
        if !self.is_transition_enabled(state, transition) {
            return Err(anyhow!(
                "transition {} is not enabled in marking {}",
                transition,
                state
            ));
        }

        if let Some(arcs) = self.net.get_incoming_places(transition) {
            for (place, cardinality) in arcs {
                state.decrease(place, cardinality)?;
            }
        }
        if let Some(arcs) = self.net.get_outgoing_places(transition) {
            for (place, cardinality) in arcs {
                if place >= state.get_place2token().len() {
                    return Err(anyhow!(
                        "transition {} produces in place {}, which marking {} does not have",
                        transition,
                        place,
                        state
                    ));
                }
                state
                    .increase(place, cardinality)
                    .with_context(|| format!("firing transition {}", transition))?;
            }
        }
        Ok(())
    }

    fn get_enabled_transitions(&self, state: &Marking) -> Vec<TransitionIndex> {
        (0..self.net.get_number_of_transitions())
            .filter(|transition| self.is_transition_enabled(state, *transition))
            .collect()
    }

    fn get_transition_activity(&self, transition: TransitionIndex) -> Option<Activity> {
        self.net.labels.get(transition).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use ebi_objects::{marking::Marking, LabelledPetriNet};

    use crate::{
        objects::accepting_petri_net::AcceptingPetriNet,
        semantics::semantics::Semantics,
        tests::{optional_b_net, sequence_net},
    };

    #[test]
    fn firing_moves_tokens() {
        let (net, [a, b, _c]) = sequence_net();
        let mut marking = net.get_initial_state().unwrap();

        assert_eq!(net.get_enabled_transitions(&marking), vec![a]);
        net.execute_transition(&mut marking, a).unwrap();
        assert_eq!(marking, Marking::from_vec(vec![0, 1, 0, 0]));
        assert_eq!(net.get_enabled_transitions(&marking), vec![b]);
    }

    #[test]
    fn firing_a_disabled_transition_fails() {
        let (net, [_a, b, _c]) = sequence_net();
        let mut marking = net.get_initial_state().unwrap();
        assert!(net.execute_transition(&mut marking, b).is_err());
        assert!(net.execute_transition(&mut marking, 42).is_err());
        assert_eq!(Some(marking), net.get_initial_state());
    }

    #[test]
    fn final_state_is_the_final_marking() {
        let (net, [a, b, c]) = sequence_net();
        let mut marking = net.get_initial_state().unwrap();
        for transition in [a, b, c] {
            assert!(!net.is_final_state(&marking));
            net.execute_transition(&mut marking, transition).unwrap();
        }
        assert!(net.is_final_state(&marking));
        assert!(net.get_activities_eventually_enabled(&marking).unwrap().is_empty());
    }

    #[test]
    fn eventually_enabled_looks_through_silent_transitions() {
        let (net, [a, b, tau, c]) = optional_b_net();
        assert!(net.is_transition_silent(tau));
        assert!(!net.is_transition_silent(b));

        let mut marking = net.get_initial_state().unwrap();
        net.execute_transition(&mut marking, a).unwrap();

        let enabled = net.get_activities_eventually_enabled(&marking).unwrap();
        let expected: HashSet<_> = [b, c]
            .iter()
            .filter_map(|transition| net.get_transition_activity(*transition))
            .collect();
        assert_eq!(enabled, expected);
    }

    #[test]
    fn eventually_enabled_terminates_on_silent_cycles() {
        let mut net = LabelledPetriNet::new();
        let p0 = net.add_place();
        let p1 = net.add_place();
        let tau1 = net.add_transition(None);
        let tau2 = net.add_transition(None);
        let x_activity = net.activity_key.process_activity("X");
        let x = net.add_transition(Some(x_activity));
        net.add_place_transition_arc(p0, tau1, 1).unwrap();
        net.add_transition_place_arc(tau1, p1, 1).unwrap();
        net.add_place_transition_arc(p1, tau2, 1).unwrap();
        net.add_transition_place_arc(tau2, p0, 1).unwrap();
        net.add_place_transition_arc(p1, x, 1).unwrap();
        net.initial_marking = Some(Marking::from_vec(vec![1, 0]));
        let net = AcceptingPetriNet::new(net, Marking::new(2)).unwrap();

        let initial = net.get_initial_state().unwrap();
        let enabled = net.get_activities_eventually_enabled(&initial).unwrap();
        assert_eq!(enabled, HashSet::from([x_activity]));
    }

    #[test]
    fn missing_initial_marking_means_no_initial_state() {
        let mut net = LabelledPetriNet::new();
        net.add_place();
        net.initial_marking = None;
        let net = AcceptingPetriNet::new(net, Marking::new(1)).unwrap();
        assert!(net.get_initial_state().is_none());
    }
}
