//! Lifecycle status transitions.
//!
//! Status enums list their allowed successors once; checking and applying a
//! transition is shared.

use super::ValidationError;

/// A status enum with a fixed transition table.
///
/// ```ignore
/// let next = SessionStatus::Pending.transition_to(SessionStatus::Completed)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug + 'static {
    /// States reachable from `self` in one step.
    fn successors(&self) -> &'static [Self];

    fn can_transition_to(&self, target: &Self) -> bool {
        self.successors().contains(target)
    }

    /// Returns `target` if the table allows it, otherwise a validation error
    /// naming both states.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if !self.can_transition_to(&target) {
            return Err(ValidationError::invalid_format(
                "status",
                format!("{:?} cannot become {:?}", self, target),
            ));
        }
        Ok(target)
    }

    /// True when no further transition exists.
    fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Delivery {
        Queued,
        Sent,
        Failed,
    }

    impl StateMachine for Delivery {
        fn successors(&self) -> &'static [Self] {
            match self {
                Delivery::Queued => &[Delivery::Sent, Delivery::Failed],
                Delivery::Failed => &[Delivery::Queued],
                Delivery::Sent => &[],
            }
        }
    }

    #[test]
    fn allowed_transition_returns_target() {
        assert_eq!(Delivery::Queued.transition_to(Delivery::Sent), Ok(Delivery::Sent));
        assert!(Delivery::Failed.can_transition_to(&Delivery::Queued));
    }

    #[test]
    fn disallowed_transition_names_both_states() {
        let err = Delivery::Sent.transition_to(Delivery::Queued).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Sent"));
        assert!(message.contains("Queued"));
    }

    #[test]
    fn terminal_states_have_no_successors() {
        assert!(Delivery::Sent.is_terminal());
        assert!(!Delivery::Failed.is_terminal());
    }
}
