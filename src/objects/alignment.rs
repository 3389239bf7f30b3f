use anyhow::Result;
use ebi_objects::{ebi_objects::language_of_alignments::Move, Activity};

use crate::{parameters::AlignmentParameters, semantics::semantics::Semantics};

pub type Alignment = Vec<Move>;

/// Computes optimal alignments of traces on a model.
pub trait AlignmentOracle<S: Semantics + ?Sized> {
    /// Returns exactly one alignment per trace, in the order of `traces`.
    fn align_variants(
        &self,
        semantics: &S,
        traces: &[Vec<Activity>],
        parameters: &AlignmentParameters,
    ) -> Result<Vec<Alignment>>;
}

/// The log activity that the model reproduced with this move. Only
/// synchronous moves carry one.
pub fn get_synchronous_activity(step: &Move) -> Option<Activity> {
    match step {
        Move::SynchronousMove { activity, .. } => Some(*activity),
        _ => None,
    }
}

/// The activities of the trace that the model reproduced step by step, in order.
pub fn extract_model_sequence(alignment: &[Move]) -> Vec<Activity> {
    alignment.iter().filter_map(get_synchronous_activity).collect()
}

/// Position of the last synchronous move of the alignment.
pub fn last_synchronous_move(alignment: &[Move]) -> Option<usize> {
    alignment
        .iter()
        .rposition(|step| matches!(step, Move::SynchronousMove { .. }))
}
