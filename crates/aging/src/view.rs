use std::str::FromStr;

use serde::Serialize;

use crate::error::AgingError;

/// Processing mode selecting the filter and reconciliation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Every account with a disconnection date.
    Disconnected,
    /// Disconnected accounts that carry a revisit date.
    Revisit,
    /// Disconnected minus revisited. Aggregate-only.
    #[serde(rename = "belumrevisit")]
    BelumRevisit,
}

impl View {
    pub const ALL: [View; 3] = [View::Disconnected, View::Revisit, View::BelumRevisit];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Revisit => "revisit",
            Self::BelumRevisit => "belumrevisit",
        }
    }

    /// Whether the view has a per-record (classified) form.
    pub fn has_records(&self) -> bool {
        !matches!(self, Self::BelumRevisit)
    }

    /// Only keep rows that carry a revisit date before classifying.
    pub fn requires_revisit_date(&self) -> bool {
        matches!(self, Self::Revisit)
    }
}

impl FromStr for View {
    type Err = AgingError;

    /// Exact, case-sensitive match on the three view tokens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disconnected" => Ok(Self::Disconnected),
            "revisit" => Ok(Self::Revisit),
            "belumrevisit" => Ok(Self::BelumRevisit),
            other => Err(AgingError::InvalidView(other.to_string())),
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
