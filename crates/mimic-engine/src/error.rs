use std::fmt::{Display, Formatter};

use mimic_core::ast::Ident;
use mimic_core::error::ClassModelError;
use mimic_core::MemberKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four copy procedures, in the order `mimic_class` runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MimicPhase {
    Interfaces,
    Fields,
    Constructors,
    Methods,
}

impl MimicPhase {
    pub const ALL: [MimicPhase; 4] = [
        MimicPhase::Interfaces,
        MimicPhase::Fields,
        MimicPhase::Constructors,
        MimicPhase::Methods,
    ];
}

impl Display for MimicPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MimicPhase::Interfaces => write!(f, "interfaces"),
            MimicPhase::Fields => write!(f, "fields"),
            MimicPhase::Constructors => write!(f, "constructors"),
            MimicPhase::Methods => write!(f, "methods"),
        }
    }
}

/// A member could not be copied for any reason other than already being
/// present in the destination.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to mimic {phase} of {source_class} into {destination} ({member}): {cause}")]
pub struct MimicError {
    pub phase: MimicPhase,
    pub source_class: Ident,
    pub destination: Ident,
    pub member: MemberKey,
    #[source]
    pub cause: ClassModelError,
}

pub type Result<T> = std::result::Result<T, MimicError>;
