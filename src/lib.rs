pub mod objects {
    pub mod accepting_petri_net;
    pub mod alignment;
    pub mod event_log;
}
pub mod semantics {
    pub mod labelled_petri_net_semantics;
    pub mod semantics;
}
pub mod techniques {
    pub mod align_etc_precision;
    pub mod escaping_edges;
    pub mod prefix_automaton;
    pub mod soundness;
}
pub mod parameters;

#[cfg(test)]
pub mod tests;

pub use crate::objects::accepting_petri_net::AcceptingPetriNet;
pub use crate::objects::alignment::{Alignment, AlignmentOracle};
pub use crate::objects::event_log::{EventTable, ToTraceVariants, TraceVariants};
pub use crate::parameters::{AlignmentParameters, AlignmentVariant, PrecisionParameters};
pub use crate::semantics::semantics::Semantics;
pub use crate::techniques::align_etc_precision::{AlignEtcPrecision, EscapingEdgesPrecision};
pub use crate::techniques::prefix_automaton::{Prefix, PrefixAutomaton};
pub use crate::techniques::soundness::EasySoundness;
