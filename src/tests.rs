use anyhow::{anyhow, Result};
use ebi_objects::{
    ebi_objects::{labelled_petri_net::TransitionIndex, language_of_alignments::Move},
    marking::Marking,
    Activity, ActivityKey, EventLog, LabelledPetriNet,
};
use std::collections::{HashSet, VecDeque};

use crate::{
    objects::{
        accepting_petri_net::AcceptingPetriNet,
        alignment::{Alignment, AlignmentOracle},
    },
    parameters::AlignmentParameters,
    semantics::semantics::Semantics,
};

/// Builds a net in which every transition moves one token between two places.
/// The first place is marked initially and the last one finally.
fn workflow_net(
    number_of_places: usize,
    arcs: &[(usize, Option<&str>, usize)],
) -> (AcceptingPetriNet, Vec<TransitionIndex>) {
    let mut net = LabelledPetriNet::new();
    let places: Vec<usize> = (0..number_of_places).map(|_| net.add_place()).collect();
    let mut transitions = vec![];
    for (from, label, to) in arcs {
        let activity = label.map(|label| net.activity_key.process_activity(label));
        let transition = net.add_transition(activity);
        net.add_place_transition_arc(places[*from], transition, 1).unwrap();
        net.add_transition_place_arc(transition, places[*to], 1).unwrap();
        transitions.push(transition);
    }

    let mut initial_marking = Marking::new(number_of_places);
    initial_marking.increase(places[0], 1).unwrap();
    net.initial_marking = Some(initial_marking);
    let mut final_marking = Marking::new(number_of_places);
    final_marking.increase(places[number_of_places - 1], 1).unwrap();

    (AcceptingPetriNet::new(net, final_marking).unwrap(), transitions)
}

/// Places p0..p3 with A, B, C in sequence.
pub fn sequence_net() -> (AcceptingPetriNet, [TransitionIndex; 3]) {
    let (net, t) = workflow_net(4, &[(0, Some("A"), 1), (1, Some("B"), 2), (2, Some("C"), 3)]);
    (net, [t[0], t[1], t[2]])
}

/// A, then B or a silent skip, then C.
pub fn optional_b_net() -> (AcceptingPetriNet, [TransitionIndex; 4]) {
    let (net, t) = workflow_net(
        4,
        &[(0, Some("A"), 1), (1, Some("B"), 2), (1, None, 2), (2, Some("C"), 3)],
    );
    (net, [t[0], t[1], t[2], t[3]])
}

/// A or X, then B.
pub fn initial_choice_net() -> (AcceptingPetriNet, [TransitionIndex; 3]) {
    let (net, t) = workflow_net(3, &[(0, Some("A"), 1), (0, Some("X"), 1), (1, Some("B"), 2)]);
    (net, [t[0], t[1], t[2]])
}

/// A log with every trace repeated the given number of times.
pub fn log_of(traces: &[(Vec<&str>, u64)]) -> EventLog {
    let mut activity_key = ActivityKey::new();
    let mut log_traces = vec![];
    for (trace, count) in traces {
        let activities = activity_key.process_trace_ref(trace);
        for _ in 0..*count {
            log_traces.push(activities.clone());
        }
    }
    EventLog {
        activity_key,
        traces: log_traces,
    }
}

/// Aligns traces that fit the model perfectly, by breadth-first search over
/// (trace position, marking). Silent transitions become silent moves.
pub struct FittingTraceOracle;

impl AlignmentOracle<AcceptingPetriNet> for FittingTraceOracle {
    fn align_variants(
        &self,
        semantics: &AcceptingPetriNet,
        traces: &[Vec<Activity>],
        _parameters: &AlignmentParameters,
    ) -> Result<Vec<Alignment>> {
        traces
            .iter()
            .map(|trace| align_fitting_trace(semantics, trace))
            .collect()
    }
}

fn align_fitting_trace(net: &AcceptingPetriNet, trace: &[Activity]) -> Result<Alignment> {
    let initial = net
        .get_initial_state()
        .ok_or_else(|| anyhow!("no initial state"))?;
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([(0usize, initial, Alignment::new())]);

    while let Some((position, marking, alignment)) = queue.pop_front() {
        if position == trace.len() && net.is_final_state(&marking) {
            return Ok(alignment);
        }
        if !seen.insert((position, marking.clone())) {
            continue;
        }
        for transition in net.get_enabled_transitions(&marking) {
            let mut next = marking.clone();
            net.execute_transition(&mut next, transition)?;
            match net.get_transition_activity(transition) {
                None => {
                    let mut extended = alignment.clone();
                    extended.push(Move::SilentMove { transition });
                    queue.push_back((position, next, extended));
                }
                Some(activity) if trace.get(position) == Some(&activity) => {
                    let mut extended = alignment.clone();
                    extended.push(Move::SynchronousMove {
                        activity,
                        transition,
                    });
                    queue.push_back((position + 1, next, extended));
                }
                Some(_) => {}
            }
        }
    }

    Err(anyhow!("trace does not fit the model"))
}
