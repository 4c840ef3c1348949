use serde::{Deserialize, Serialize};

/// Pipeline stage for a job application.
///
/// Stages form a fixed, ordered pipeline. The ordering here is the ordering
/// of board columns; it is configuration, not persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    ToApply,
    Applied,
    HrScreen,
    Interview,
    Offer,
    Rejected,
    Ghosted,
}

impl Stage {
    /// All stages in board order.
    pub const ALL: [Stage; 7] = [
        Stage::ToApply,
        Stage::Applied,
        Stage::HrScreen,
        Stage::Interview,
        Stage::Offer,
        Stage::Rejected,
        Stage::Ghosted,
    ];

    /// Number of stages in the pipeline.
    pub const COUNT: usize = Self::ALL.len();

    /// Stable storage identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::ToApply => "to-apply",
            Stage::Applied => "applied",
            Stage::HrScreen => "hr-screen",
            Stage::Interview => "interview",
            Stage::Offer => "offer",
            Stage::Rejected => "rejected",
            Stage::Ghosted => "ghosted",
        }
    }

    /// Human-readable column title.
    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::ToApply => "To Apply",
            Stage::Applied => "Applied",
            Stage::HrScreen => "HR Screen",
            Stage::Interview => "Interview",
            Stage::Offer => "Offer",
            Stage::Rejected => "Rejected",
            Stage::Ghosted => "Ghosted",
        }
    }

    /// Parse a stage identifier. Case-insensitive; accepts both the dashed
    /// storage form and an underscore/space variant typed on the CLI.
    pub fn from_str(s: &str) -> Option<Self> {
        let norm = s.trim().to_lowercase().replace(['_', ' '], "-");
        match norm.as_str() {
            "to-apply" => Some(Stage::ToApply),
            "applied" => Some(Stage::Applied),
            "hr-screen" => Some(Stage::HrScreen),
            "interview" => Some(Stage::Interview),
            "offer" => Some(Stage::Offer),
            "rejected" => Some(Stage::Rejected),
            "ghosted" => Some(Stage::Ghosted),
            _ => None,
        }
    }

    /// Position of this stage in [`Stage::ALL`].
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    /// Terminal stages never progress further in the pipeline.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Rejected | Stage::Ghosted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_conversion() {
        assert_eq!(Stage::ToApply.as_str(), "to-apply");
        assert_eq!(Stage::from_str("to-apply"), Some(Stage::ToApply));
        assert_eq!(Stage::from_str("TO_APPLY"), Some(Stage::ToApply));
        assert_eq!(Stage::from_str("hr screen"), Some(Stage::HrScreen));
        assert_eq!(Stage::from_str("Offer"), Some(Stage::Offer));
        assert_eq!(Stage::from_str("nonsense"), None);
    }

    #[test]
    fn test_stage_roundtrip() {
        for stage in Stage::ALL {
            assert_eq!(Stage::from_str(stage.as_str()), Some(stage));
        }
    }

    #[test]
    fn test_stage_index_matches_order() {
        for (i, stage) in Stage::ALL.iter().enumerate() {
            assert_eq!(stage.index(), i);
        }
    }

    #[test]
    fn test_stage_terminal() {
        assert!(!Stage::Applied.is_terminal());
        assert!(!Stage::Offer.is_terminal());
        assert!(Stage::Rejected.is_terminal());
        assert!(Stage::Ghosted.is_terminal());
    }
}
