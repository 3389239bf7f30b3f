use anyhow::{anyhow, Result};
use ebi_objects::{marking::Marking, LabelledPetriNet};
use std::fmt::{self, Display};

/// A labelled Petri net together with the marking in which its runs end.
#[derive(Clone, Debug)]
pub struct AcceptingPetriNet {
    pub net: LabelledPetriNet,
    pub final_marking: Marking,
}

impl AcceptingPetriNet {
    pub fn new(net: LabelledPetriNet, final_marking: Marking) -> Result<Self> {
        if final_marking.get_place2token().len() != net.get_number_of_places() {
            return Err(anyhow!(
                "final marking {} covers {} places, while the net has {}",
                final_marking,
                final_marking.get_place2token().len(),
                net.get_number_of_places()
            ));
        }
        Ok(Self { net, final_marking })
    }

    pub fn get_net(&self) -> &LabelledPetriNet {
        &self.net
    }

    pub fn get_final_marking(&self) -> &Marking {
        &self.final_marking
    }
}

impl Display for AcceptingPetriNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.net)?;
        write!(f, "final marking {}", self.final_marking)
    }
}
