use anyhow::{anyhow, Context, Result};
use ebi_objects::Activity;
use std::collections::{HashMap, HashSet};

use crate::{
    objects::{
        alignment::{extract_model_sequence, AlignmentOracle},
        event_log::ToTraceVariants,
    },
    parameters::PrecisionParameters,
    semantics::semantics::Semantics,
    techniques::{
        escaping_edges::EscapingEdgesReplay,
        prefix_automaton::{Prefix, PrefixAutomaton},
        soundness::EasySoundness,
    },
};

#[derive(Clone, Debug, PartialEq)]
pub struct EscapingEdgesPrecision {
    pub precision: f64,
    /// Weighted number of activities the model enables over all visited prefixes
    /// and the initial state.
    pub sum_enabled: u64,
    /// Weighted number of those that were never observed at that point in the log.
    pub sum_escaping: u64,
    pub escaping_edges: HashMap<Prefix, HashSet<Activity>>,
    /// Activities enabled initially that start no trace of the log.
    pub initial_escaping: HashSet<Activity>,
}

impl EscapingEdgesPrecision {
    /// 1.0 when nothing is enabled anywhere.
    pub fn from_sums(sum_enabled: u64, sum_escaping: u64) -> f64 {
        if sum_enabled == 0 {
            1.0
        } else {
            1.0 - sum_escaping as f64 / sum_enabled as f64
        }
    }
}

/// Number of progress lines reported over a full replay.
const PROGRESS_STEPS: usize = 100;

fn is_progress_step(done: usize, total: usize) -> bool {
    done == total || done % (total / PROGRESS_STEPS).max(1) == 0
}

pub trait AlignEtcPrecision: Semantics + EasySoundness {
    /// Escaping-edges precision of the model with respect to the log, based on
    /// alignments provided by the oracle.
    fn align_etc_precision<L, O>(
        &mut self,
        log: &L,
        oracle: &O,
        parameters: &PrecisionParameters,
    ) -> Result<f64>
    where
        L: ToTraceVariants + ?Sized,
        O: AlignmentOracle<Self> + ?Sized,
    {
        Ok(self
            .compute_escaping_edges_precision(log, oracle, parameters)?
            .precision)
    }

    /// As `align_etc_precision`, but also returns the counts and the escaping
    /// activities per prefix.
    fn compute_escaping_edges_precision<L, O>(
        &mut self,
        log: &L,
        oracle: &O,
        parameters: &PrecisionParameters,
    ) -> Result<EscapingEdgesPrecision>
    where
        L: ToTraceVariants + ?Sized,
        O: AlignmentOracle<Self> + ?Sized;
}

impl<T> AlignEtcPrecision for T
where
    T: Semantics + EasySoundness,
{
    fn compute_escaping_edges_precision<L, O>(
        &mut self,
        log: &L,
        oracle: &O,
        parameters: &PrecisionParameters,
    ) -> Result<EscapingEdgesPrecision>
    where
        L: ToTraceVariants + ?Sized,
        O: AlignmentOracle<Self> + ?Sized,
    {
        if !self
            .is_easy_sound_workflow_net()
            .context("checking soundness of the model")?
        {
            return Err(anyhow!(
                "align ETC precision can only be applied on a Petri net that is a sound workflow net (easy sound)"
            ));
        }

        let variants = log
            .to_trace_variants(self.activity_key_mut(), parameters)
            .context("grouping the log into trace variants")?;
        log::debug!(
            "{} traces in {} variants",
            variants.number_of_traces,
            variants.len()
        );

        let model: &T = &*self;

        let alignments = oracle
            .align_variants(model, &variants.get_traces(), &parameters.alignment_parameters())
            .context("aligning the trace variants")?;
        if alignments.len() != variants.len() {
            return Err(anyhow!(
                "the alignment oracle returned {} alignments for {} trace variants",
                alignments.len(),
                variants.len()
            ));
        }

        // first pass: what the log shows after every prefix
        let sequences: Vec<Vec<Activity>> = alignments
            .iter()
            .map(|alignment| extract_model_sequence(alignment))
            .collect();
        let automaton = PrefixAutomaton::build(
            sequences
                .iter()
                .zip(variants.variants.iter())
                .map(|(sequence, variant)| (sequence.as_slice(), variant.frequency)),
        );

        // second pass: what the model enables after every prefix
        let mut replay = EscapingEdgesReplay::new(model, &automaton);
        for (index, alignment) in alignments.iter().enumerate() {
            replay
                .replay(alignment)
                .with_context(|| format!("replaying the alignment of variant {}", index))?;
            if parameters.show_progress && is_progress_step(index + 1, alignments.len()) {
                log::info!("replayed {}/{} variants", index + 1, alignments.len());
            }
        }

        // what the model enables before anything happened
        let initial_state = model
            .get_initial_state()
            .ok_or_else(|| anyhow!("the model has no initial state"))?;
        let enabled_initial = replay
            .get_state_cache_mut()
            .get_enabled_activities(model, &initial_state)?
            .clone();
        let initial_escaping: HashSet<Activity> = enabled_initial
            .difference(&variants.start_activities)
            .copied()
            .collect();

        let totals = replay.into_totals();
        let sum_enabled = totals.sum_enabled + enabled_initial.len() as u64 * variants.number_of_traces;
        let sum_escaping = totals.sum_escaping + initial_escaping.len() as u64 * variants.number_of_traces;
        let precision = EscapingEdgesPrecision::from_sums(sum_enabled, sum_escaping);

        if parameters.debug_level > 0 {
            log::info!(
                "[align ETC precision] enabled={} escaping={} precision={:.5}",
                sum_enabled,
                sum_escaping,
                precision
            );
        }

        Ok(EscapingEdgesPrecision {
            precision,
            sum_enabled,
            sum_escaping,
            escaping_edges: totals.escaping_edges,
            initial_escaping,
        })
    }
}
