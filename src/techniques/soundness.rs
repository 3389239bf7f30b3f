use anyhow::{anyhow, Result};
use ebi_objects::marking::Marking;
use std::collections::{HashSet, VecDeque};

use crate::{objects::accepting_petri_net::AcceptingPetriNet, semantics::semantics::Semantics};

/// Upper bound on the number of markings explored when looking for the final marking.
pub const MAX_SOUNDNESS_STATES: usize = 1_000_000;

pub trait EasySoundness {
    /// Whether the model is a workflow net in which the final marking can be
    /// reached from the initial marking.
    fn is_easy_sound_workflow_net(&self) -> Result<bool>;
}

impl EasySoundness for AcceptingPetriNet {
    fn is_easy_sound_workflow_net(&self) -> Result<bool> {
        if !self.is_workflow_net() {
            return Ok(false);
        }
        self.is_final_marking_reachable()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum Node {
    Place(usize),
    Transition(usize),
}

impl AcceptingPetriNet {
    /// One source place marked with a single token, one sink place that is the
    /// only marked place of the final marking, and every node on a path between them.
    pub fn is_workflow_net(&self) -> bool {
        let net = self.get_net();
        let number_of_places = net.get_number_of_places();
        let mut has_input = vec![false; number_of_places];
        let mut has_output = vec![false; number_of_places];
        for (inputs, outputs) in net
            .transition2input_places
            .iter()
            .zip(net.transition2output_places.iter())
        {
            if inputs.is_empty() || outputs.is_empty() {
                return false;
            }
            for place in inputs {
                has_output[*place] = true;
            }
            for place in outputs {
                has_input[*place] = true;
            }
        }

        let sources: Vec<usize> = (0..number_of_places).filter(|p| !has_input[*p]).collect();
        let sinks: Vec<usize> = (0..number_of_places).filter(|p| !has_output[*p]).collect();
        let (source, sink) = match (sources.as_slice(), sinks.as_slice()) {
            ([source], [sink]) if source != sink => (*source, *sink),
            _ => {
                log::debug!("net has sources {:?} and sinks {:?}", sources, sinks);
                return false;
            }
        };

        let mut expected_initial = Marking::new(number_of_places);
        expected_initial.place2token[source] = 1;
        let mut expected_final = Marking::new(number_of_places);
        expected_final.place2token[sink] = 1;
        if net.get_initial_marking().as_ref() != Some(&expected_initial)
            || self.get_final_marking() != &expected_final
        {
            log::debug!("initial or final marking does not match the source and sink place");
            return false;
        }

        let number_of_nodes = number_of_places + net.get_number_of_transitions();
        let forward = self.reachable_nodes(Node::Place(source), true);
        let backward = self.reachable_nodes(Node::Place(sink), false);
        forward.len() == number_of_nodes && backward.len() == number_of_nodes
    }

    fn reachable_nodes(&self, start: Node, forward: bool) -> HashSet<Node> {
        let net = self.get_net();
        let (consuming, producing) = if forward {
            (&net.transition2input_places, &net.transition2output_places)
        } else {
            (&net.transition2output_places, &net.transition2input_places)
        };

        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            let next: Vec<Node> = match node {
                Node::Place(place) => consuming
                    .iter()
                    .enumerate()
                    .filter(|(_, places)| places.contains(&place))
                    .map(|(transition, _)| Node::Transition(transition))
                    .collect(),
                Node::Transition(transition) => producing[transition]
                    .iter()
                    .map(|place| Node::Place(*place))
                    .collect(),
            };
            for node in next {
                if visited.insert(node) {
                    queue.push_back(node);
                }
            }
        }
        visited
    }

    fn is_final_marking_reachable(&self) -> Result<bool> {
        let initial = match self.get_initial_state() {
            Some(initial) => initial,
            None => return Ok(false),
        };

        let mut visited = HashSet::from([initial.clone()]);
        let mut queue = VecDeque::from([initial]);
        while let Some(marking) = queue.pop_front() {
            if self.is_final_state(&marking) {
                return Ok(true);
            }
            for transition in self.get_enabled_transitions(&marking) {
                let mut next = marking.clone();
                self.execute_transition(&mut next, transition)?;
                if !visited.contains(&next) {
                    if visited.len() >= MAX_SOUNDNESS_STATES {
                        return Err(anyhow!(
                            "more than {} reachable markings; the net is likely unbounded",
                            MAX_SOUNDNESS_STATES
                        ));
                    }
                    visited.insert(next.clone());
                    queue.push_back(next);
                }
            }
        }
        Ok(false)
    }
}
