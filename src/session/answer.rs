//! Yes/no answer parsing

use std::fmt;

/// Responses accepted as a positive answer, after trimming and lower-casing
const YES_RESPONSES: &[&str] = &["y", "yes"];

/// Responses accepted as a negative answer, after trimming and lower-casing
const NO_RESPONSES: &[&str] = &["n", "no"];

/// Outcome of a yes/no question
///
/// `Undetermined` means the user never gave a recognizable answer. Callers
/// should treat it like `No` wherever acting on it would change anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNoAnswer {
    Yes,
    No,
    Undetermined,
}

impl YesNoAnswer {
    /// Interpret a single raw response, returning `None` when it is not recognized
    pub fn parse(response: &str) -> Option<Self> {
        let normalized = response.trim().to_lowercase();

        if YES_RESPONSES.contains(&normalized.as_str()) {
            Some(Self::Yes)
        } else if NO_RESPONSES.contains(&normalized.as_str()) {
            Some(Self::No)
        } else {
            None
        }
    }

    /// True only for an explicit yes
    pub fn is_yes(self) -> bool {
        self == Self::Yes
    }

    pub fn is_determined(self) -> bool {
        self != Self::Undetermined
    }
}

impl fmt::Display for YesNoAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Undetermined => "undetermined",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepted_forms() {
        assert_eq!(YesNoAnswer::parse("y"), Some(YesNoAnswer::Yes));
        assert_eq!(YesNoAnswer::parse("yes"), Some(YesNoAnswer::Yes));
        assert_eq!(YesNoAnswer::parse("n"), Some(YesNoAnswer::No));
        assert_eq!(YesNoAnswer::parse("no"), Some(YesNoAnswer::No));
    }

    #[test]
    fn test_parse_is_case_insensitive_and_trimmed() {
        assert_eq!(YesNoAnswer::parse(" YES \n"), Some(YesNoAnswer::Yes));
        assert_eq!(YesNoAnswer::parse("Yes"), Some(YesNoAnswer::Yes));
        assert_eq!(YesNoAnswer::parse("No"), Some(YesNoAnswer::No));
        assert_eq!(YesNoAnswer::parse(" n "), Some(YesNoAnswer::No));
    }

    #[test]
    fn test_parse_rejects_everything_else() {
        assert_eq!(YesNoAnswer::parse(""), None);
        assert_eq!(YesNoAnswer::parse("yep"), None);
        assert_eq!(YesNoAnswer::parse("true"), None);
        assert_eq!(YesNoAnswer::parse("y e s"), None);
    }

    #[test]
    fn test_only_yes_is_yes() {
        assert!(YesNoAnswer::Yes.is_yes());
        assert!(!YesNoAnswer::No.is_yes());
        assert!(!YesNoAnswer::Undetermined.is_yes());
        assert!(!YesNoAnswer::Undetermined.is_determined());
    }
}
