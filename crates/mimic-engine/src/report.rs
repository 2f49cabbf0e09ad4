use serde::{Deserialize, Serialize};

use crate::MimicPhase;

/// Outcome of one copy procedure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseReport {
    pub added: usize,
    pub skipped: usize,
}

/// Per-phase outcome of a full `mimic_class` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MimicReport {
    pub interfaces: PhaseReport,
    pub fields: PhaseReport,
    pub constructors: PhaseReport,
    pub methods: PhaseReport,
}

impl MimicReport {
    pub fn phase(&self, phase: MimicPhase) -> &PhaseReport {
        match phase {
            MimicPhase::Interfaces => &self.interfaces,
            MimicPhase::Fields => &self.fields,
            MimicPhase::Constructors => &self.constructors,
            MimicPhase::Methods => &self.methods,
        }
    }

    pub fn added(&self) -> usize {
        MimicPhase::ALL.iter().map(|p| self.phase(*p).added).sum()
    }

    pub fn skipped(&self) -> usize {
        MimicPhase::ALL.iter().map(|p| self.phase(*p).skipped).sum()
    }

    /// Nothing was added: the destination already mimicked the source.
    pub fn is_noop(&self) -> bool {
        self.added() == 0
    }
}
