/// Visit state definitions for category nodes
///
/// This module defines the lifecycle states a category moves through
/// during traversal.
use std::fmt;

/// Represents where a category is in the traversal lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitState {
    /// Category has been discovered but not yet worked
    New,

    /// Category (or an ancestor subtree containing it) is being worked
    InProgress,

    /// Category is done. Leaves reach this via explicit paging-finished
    /// signalling; internal nodes only via bottom-up propagation once
    /// every child is visited.
    Visited,
}

impl VisitState {
    /// Returns true if this category still has work ahead of it
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::New | Self::InProgress)
    }

    /// Converts the visit state to a database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Visited => "visited",
        }
    }

    /// Parses a visit state from a database string representation
    ///
    /// Returns None if the string doesn't match any known state.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "in_progress" => Some(Self::InProgress),
            "visited" => Some(Self::Visited),
            _ => None,
        }
    }

    /// Returns all possible visit states
    pub fn all_states() -> Vec<Self> {
        vec![Self::New, Self::InProgress, Self::Visited]
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pending() {
        assert!(VisitState::New.is_pending());
        assert!(VisitState::InProgress.is_pending());
        assert!(!VisitState::Visited.is_pending());
    }

    #[test]
    fn test_to_db_string() {
        assert_eq!(VisitState::New.to_db_string(), "new");
        assert_eq!(VisitState::InProgress.to_db_string(), "in_progress");
        assert_eq!(VisitState::Visited.to_db_string(), "visited");
    }

    #[test]
    fn test_from_db_string() {
        assert_eq!(VisitState::from_db_string("new"), Some(VisitState::New));
        assert_eq!(
            VisitState::from_db_string("in_progress"),
            Some(VisitState::InProgress)
        );
        assert_eq!(
            VisitState::from_db_string("visited"),
            Some(VisitState::Visited)
        );
        assert_eq!(VisitState::from_db_string("invalid"), None);
    }

    #[test]
    fn test_roundtrip_db_string() {
        for state in VisitState::all_states() {
            let db_str = state.to_db_string();
            let parsed = VisitState::from_db_string(db_str);
            assert_eq!(Some(state), parsed, "Failed roundtrip for {:?}", state);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", VisitState::New), "new");
        assert_eq!(format!("{}", VisitState::InProgress), "in_progress");
        assert_eq!(format!("{}", VisitState::Visited), "visited");
    }
}
