use crate::value::Value;

/// Lifecycle state of a future.
///
/// A future starts `Pending` and moves to exactly one of the two terminal
/// states. Once terminal, the state never changes again.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum State {
    /// Not settled yet. Reactions registered now are queued.
    #[default]
    Pending,

    /// Settled successfully with a value.
    Fulfilled(Value),

    /// Settled with a failure reason.
    Rejected(Value),
}

impl State {
    /// Returns `true` for [`State::Pending`].
    pub fn is_pending(&self) -> bool {
        matches!(self, State::Pending)
    }

    /// Returns `true` for either terminal state.
    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }

    /// Returns `true` for [`State::Fulfilled`].
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, State::Fulfilled(_))
    }

    /// Returns `true` for [`State::Rejected`].
    pub fn is_rejected(&self) -> bool {
        matches!(self, State::Rejected(_))
    }

    /// Terminal outcome, or `None` while pending.
    pub(crate) fn settled(&self) -> Option<Settled> {
        match self {
            State::Pending => None,
            State::Fulfilled(value) => Some(Settled::Fulfilled(value.clone())),
            State::Rejected(reason) => Some(Settled::Rejected(reason.clone())),
        }
    }
}

/// A terminal outcome, as handed to a reaction during flush.
#[derive(Debug, Clone)]
pub(crate) enum Settled {
    Fulfilled(Value),
    Rejected(Value),
}

impl From<Settled> for State {
    fn from(outcome: Settled) -> Self {
        match outcome {
            Settled::Fulfilled(value) => State::Fulfilled(value),
            Settled::Rejected(reason) => State::Rejected(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_is_not_settled() {
        let state = State::Pending;
        assert!(state.is_pending());
        assert!(!state.is_settled());
        assert!(state.settled().is_none());
    }

    #[test]
    fn terminal_states_expose_only_their_payload() {
        let fulfilled = State::Fulfilled(Value::from(1));
        assert!(fulfilled.is_fulfilled() && !fulfilled.is_rejected());
        assert!(matches!(fulfilled.settled(), Some(Settled::Fulfilled(v)) if v == Value::from(1)));

        let rejected = State::Rejected(Value::from("e"));
        assert!(rejected.is_rejected() && !rejected.is_fulfilled());
        assert!(matches!(rejected.settled(), Some(Settled::Rejected(r)) if r == Value::from("e")));
    }
}
