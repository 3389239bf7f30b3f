use std::fmt::{Display, Formatter};

pub const DEFAULT_ACTIVITY_KEY: &str = "concept:name";
pub const DEFAULT_CASE_ID_KEY: &str = "case:concept:name";

/// Search strategy requested from the alignment oracle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AlignmentVariant {
    #[default]
    StateEquationAStar,
    DijkstraNoHeuristics,
    DijkstraLessMemory,
    TweakedStateEquationAStar,
    DiscountedAStar,
}

impl Display for AlignmentVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AlignmentVariant::StateEquationAStar => write!(f, "state equation A*"),
            AlignmentVariant::DijkstraNoHeuristics => write!(f, "Dijkstra without heuristics"),
            AlignmentVariant::DijkstraLessMemory => write!(f, "Dijkstra with less memory"),
            AlignmentVariant::TweakedStateEquationAStar => write!(f, "tweaked state equation A*"),
            AlignmentVariant::DiscountedAStar => write!(f, "discounted A*"),
        }
    }
}

/// The part of the parameters that is handed to the alignment oracle.
/// None of these fields influence the precision computation itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlignmentParameters {
    pub variant: AlignmentVariant,
    pub cleaning_token_flood: bool,
    pub show_progress: bool,
    pub multiprocessing: bool,
    pub cores: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrecisionParameters {
    /// Event attribute that holds the activity label.
    pub activity_key: String,
    /// Event attribute that groups the rows of a table into traces.
    pub case_id_key: String,
    pub alignment_variant: AlignmentVariant,
    pub cleaning_token_flood: bool,
    pub show_progress: bool,
    pub multiprocessing: bool,
    pub cores: Option<usize>,
    /// When > 0, a single line with the final counts and the precision is logged.
    pub debug_level: u32,
}

impl Default for PrecisionParameters {
    fn default() -> Self {
        Self {
            activity_key: DEFAULT_ACTIVITY_KEY.to_string(),
            case_id_key: DEFAULT_CASE_ID_KEY.to_string(),
            alignment_variant: AlignmentVariant::default(),
            cleaning_token_flood: false,
            show_progress: false,
            multiprocessing: false,
            cores: None,
            debug_level: 0,
        }
    }
}

impl PrecisionParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_activity_key(mut self, activity_key: impl Into<String>) -> Self {
        self.activity_key = activity_key.into();
        self
    }

    pub fn with_case_id_key(mut self, case_id_key: impl Into<String>) -> Self {
        self.case_id_key = case_id_key.into();
        self
    }

    pub fn with_alignment_variant(mut self, variant: AlignmentVariant) -> Self {
        self.alignment_variant = variant;
        self
    }

    pub fn with_cleaning_token_flood(mut self, cleaning_token_flood: bool) -> Self {
        self.cleaning_token_flood = cleaning_token_flood;
        self
    }

    pub fn with_show_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Multiprocessing with `cores = None` leaves the number of workers to the oracle.
    pub fn with_multiprocessing(mut self, multiprocessing: bool, cores: Option<usize>) -> Self {
        self.multiprocessing = multiprocessing;
        self.cores = cores;
        self
    }

    pub fn with_debug_level(mut self, debug_level: u32) -> Self {
        self.debug_level = debug_level;
        self
    }

    pub fn alignment_parameters(&self) -> AlignmentParameters {
        AlignmentParameters {
            variant: self.alignment_variant,
            cleaning_token_flood: self.cleaning_token_flood,
            show_progress: self.show_progress,
            multiprocessing: self.multiprocessing,
            cores: self.cores,
        }
    }
}
