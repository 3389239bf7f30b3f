use anyhow::{anyhow, Result};
use ebi_objects::{Activity, ActivityKey, ActivityKeyTranslator, EventLog};
use std::collections::{HashMap, HashSet};

use crate::parameters::PrecisionParameters;

pub type Event = HashMap<String, String>;

/// A flat table of events. Rows with the same case identifier form one trace,
/// in row order.
#[derive(Clone, Debug, Default)]
pub struct EventTable {
    pub rows: Vec<Event>,
}

impl EventTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: Event) {
        self.rows.push(row);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceVariant {
    pub activities: Vec<Activity>,
    /// Number of traces of the log that have exactly these activities.
    pub frequency: u64,
}

#[derive(Clone, Debug, Default)]
pub struct TraceVariants {
    /// In order of first appearance in the log.
    pub variants: Vec<TraceVariant>,
    /// Activities that start at least one trace.
    pub start_activities: HashSet<Activity>,
    pub number_of_traces: u64,
}

impl TraceVariants {
    pub fn from_traces(traces: impl IntoIterator<Item = Vec<Activity>>) -> Self {
        let mut result = Self::default();
        let mut variant2index: HashMap<Vec<Activity>, usize> = HashMap::new();

        for trace in traces {
            result.number_of_traces += 1;
            if let Some(first) = trace.first() {
                result.start_activities.insert(*first);
            }

            match variant2index.get(&trace) {
                Some(index) => result.variants[*index].frequency += 1,
                None => {
                    variant2index.insert(trace.clone(), result.variants.len());
                    result.variants.push(TraceVariant {
                        activities: trace,
                        frequency: 1,
                    });
                }
            }
        }

        result
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn get_traces(&self) -> Vec<Vec<Activity>> {
        self.variants
            .iter()
            .map(|variant| variant.activities.clone())
            .collect()
    }
}

pub trait ToTraceVariants {
    /// Groups the log into variants, interning activity labels into `activity_key`.
    fn to_trace_variants(
        &self,
        activity_key: &mut ActivityKey,
        parameters: &PrecisionParameters,
    ) -> Result<TraceVariants>;
}

impl ToTraceVariants for EventLog {
    fn to_trace_variants(
        &self,
        activity_key: &mut ActivityKey,
        _parameters: &PrecisionParameters,
    ) -> Result<TraceVariants> {
        let translator = ActivityKeyTranslator::new(&self.activity_key, activity_key);
        Ok(TraceVariants::from_traces(
            self.traces.iter().map(|trace| translator.translate_trace(trace)),
        ))
    }
}

impl ToTraceVariants for EventTable {
    fn to_trace_variants(
        &self,
        activity_key: &mut ActivityKey,
        parameters: &PrecisionParameters,
    ) -> Result<TraceVariants> {
        let mut case2index: HashMap<&str, usize> = HashMap::new();
        let mut traces: Vec<Vec<Activity>> = vec![];

        for (row_index, row) in self.rows.iter().enumerate() {
            let case_id = row.get(&parameters.case_id_key).ok_or_else(|| {
                anyhow!(
                    "row {} has no case identifier attribute `{}`",
                    row_index,
                    parameters.case_id_key
                )
            })?;
            let label = row.get(&parameters.activity_key).ok_or_else(|| {
                anyhow!(
                    "row {} has no activity attribute `{}`",
                    row_index,
                    parameters.activity_key
                )
            })?;
            let activity = activity_key.process_activity(label);

            let index = *case2index.entry(case_id.as_str()).or_insert_with(|| {
                traces.push(vec![]);
                traces.len() - 1
            });
            traces[index].push(activity);
        }

        Ok(TraceVariants::from_traces(traces))
    }
}
