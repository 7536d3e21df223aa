//! Async action state - the loading/success/error lifecycle of one network operation
//!
//! Every user-triggered call (form submit, upload, screen-load fetch) owns one
//! [`AsyncActionState`]. The machine does no I/O: the caller starts it, sends the
//! request tagged with the returned [`RequestTicket`], and feeds the outcome back
//! through [`AsyncActionState::succeed`] or [`AsyncActionState::fail`].
//!
//! ```text
//! Idle --start--> Pending --succeed--> Succeeded
//!                    |  \--fail-----> Failed
//! Succeeded/Failed --start--> Pending     any --reset--> Idle
//! ```
//!
//! Tickets are unique for the whole process. Settling with a ticket that is no
//! longer the pending one is a no-op, which drops replies from calls that were
//! reset or abandoned.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use crate::constants::{INVALID_DATA_MESSAGE, TIMEOUT_MESSAGE, UNAUTHORIZED_MESSAGE};
use crate::error::{ApiError, ValidationErrors};

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Identifies one in-flight request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    fn issue() -> Self {
        RequestTicket(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("a request is already in flight")]
    AlreadyPending,
}

/// Failure classification shown to the user
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    Unauthorized,
    Validation,
    RequestFailed,
    Timeout,
}

/// A failure as data: classification plus the banner text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Failure::new(FailureKind::Unauthorized, UNAUTHORIZED_MESSAGE)
    }

    /// 401 and timeouts get fixed wording, everything else is surfaced verbatim
    pub fn from_api(err: &ApiError) -> Self {
        match err {
            ApiError::Unauthorized => Failure::unauthorized(),
            ApiError::Timeout => Failure::new(FailureKind::Timeout, TIMEOUT_MESSAGE),
            other => Failure::new(FailureKind::RequestFailed, other.to_string()),
        }
    }

    pub fn validation(_errors: &ValidationErrors) -> Self {
        Failure::new(FailureKind::Validation, INVALID_DATA_MESSAGE)
    }

    /// Replace the text but keep the classification
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == FailureKind::Unauthorized
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Lifecycle of one network operation
#[derive(Clone, Debug)]
pub enum AsyncActionState<T> {
    Idle,
    Pending {
        ticket: RequestTicket,
    },
    Succeeded {
        data: T,
        message: Option<String>,
    },
    Failed {
        failure: Failure,
    },
}

impl<T> Default for AsyncActionState<T> {
    fn default() -> Self {
        AsyncActionState::Idle
    }
}

impl<T> AsyncActionState<T> {
    pub fn new() -> Self {
        AsyncActionState::Idle
    }

    /// Enter `Pending`, dropping any previous result or error
    pub fn start(&mut self) -> Result<RequestTicket, ActionError> {
        if self.is_pending() {
            return Err(ActionError::AlreadyPending);
        }
        let ticket = RequestTicket::issue();
        *self = AsyncActionState::Pending { ticket };
        Ok(ticket)
    }

    /// Returns false if the ticket is stale and the result was discarded
    pub fn succeed(&mut self, ticket: RequestTicket, data: T) -> bool {
        self.settle(ticket, AsyncActionState::Succeeded { data, message: None })
    }

    pub fn succeed_with(
        &mut self,
        ticket: RequestTicket,
        data: T,
        message: impl Into<String>,
    ) -> bool {
        self.settle(
            ticket,
            AsyncActionState::Succeeded {
                data,
                message: Some(message.into()),
            },
        )
    }

    pub fn fail(&mut self, ticket: RequestTicket, failure: Failure) -> bool {
        self.settle(ticket, AsyncActionState::Failed { failure })
    }

    pub fn reset(&mut self) {
        *self = AsyncActionState::Idle;
    }

    fn settle(&mut self, ticket: RequestTicket, next: AsyncActionState<T>) -> bool {
        if !self.is_awaiting(ticket) {
            tracing::debug!(%ticket, "discarding stale reply");
            return false;
        }
        *self = next;
        true
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, AsyncActionState::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, AsyncActionState::Pending { .. })
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, AsyncActionState::Succeeded { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AsyncActionState::Failed { .. })
    }

    /// True when `ticket` is the request this state is waiting on
    pub fn is_awaiting(&self, ticket: RequestTicket) -> bool {
        matches!(self, AsyncActionState::Pending { ticket: t } if *t == ticket)
    }

    pub fn ticket(&self) -> Option<RequestTicket> {
        match self {
            AsyncActionState::Pending { ticket } => Some(*ticket),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            AsyncActionState::Succeeded { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            AsyncActionState::Succeeded { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            AsyncActionState::Failed { failure } => Some(failure),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.failure().map(|f| f.message.as_str())
    }

    pub fn success_message(&self) -> Option<&str> {
        match self {
            AsyncActionState::Succeeded { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_invariants(state: &AsyncActionState<u32>) {
        assert!(!(state.is_succeeded() && state.is_failed()));
        if state.is_failed() {
            assert!(state.data().is_none());
        }
        if state.data().is_some() {
            assert!(state.failure().is_none());
        }
    }

    #[test]
    fn test_start_succeed() {
        let mut state = AsyncActionState::new();
        let ticket = state.start().unwrap();
        assert!(state.is_pending());
        assert!(state.succeed_with(ticket, 7u32, "done"));
        assert_eq!(state.data(), Some(&7));
        assert_eq!(state.success_message(), Some("done"));
        assert_eq!(state.error_message(), None);
    }

    #[test]
    fn test_start_rejected_while_pending() {
        let mut state: AsyncActionState<u32> = AsyncActionState::new();
        let first = state.start().unwrap();
        assert_eq!(state.start(), Err(ActionError::AlreadyPending));
        // The original request is still the one being awaited
        assert!(state.is_awaiting(first));
    }

    #[test]
    fn test_retry_after_failure_clears_error() {
        let mut state: AsyncActionState<u32> = AsyncActionState::new();
        let ticket = state.start().unwrap();
        state.fail(ticket, Failure::new(FailureKind::RequestFailed, "boom"));
        assert_eq!(state.error_message(), Some("boom"));

        let retry = state.start().unwrap();
        assert_ne!(retry, ticket);
        assert_eq!(state.error_message(), None);
        assert!(state.succeed(retry, 1));
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut state: AsyncActionState<u32> = AsyncActionState::new();
        let ticket = state.start().unwrap();
        state.reset();
        assert!(!state.succeed(ticket, 3));
        assert!(state.is_idle());

        let fresh = state.start().unwrap();
        assert!(!state.fail(ticket, Failure::unauthorized()));
        assert!(state.is_awaiting(fresh));
    }

    #[test]
    fn test_settle_outside_pending_is_ignored() {
        let mut state: AsyncActionState<u32> = AsyncActionState::new();
        let ticket = state.start().unwrap();
        assert!(state.succeed(ticket, 1));
        assert!(!state.fail(ticket, Failure::unauthorized()));
        assert_eq!(state.data(), Some(&1));
    }

    #[test]
    fn test_unauthorized_message_ignores_transport_text() {
        let failure = Failure::from_api(&ApiError::Unauthorized);
        assert_eq!(failure.kind, FailureKind::Unauthorized);
        assert_eq!(failure.message, UNAUTHORIZED_MESSAGE);

        let failure = Failure::from_api(&ApiError::from_status(401, "token expired".into()));
        assert_eq!(failure.message, UNAUTHORIZED_MESSAGE);
    }

    #[test]
    fn test_unauthorized_message_text() {
        assert_eq!(
            Failure::unauthorized().message,
            "Your are unauthorized to access this page, please login with admin account to access it."
        );
    }

    #[test]
    fn test_other_errors_are_verbatim() {
        let err = ApiError::Connect("connection refused".into());
        let failure = Failure::from_api(&err);
        assert_eq!(failure.kind, FailureKind::RequestFailed);
        assert_eq!(failure.message, err.to_string());

        let failure = Failure::from_api(&ApiError::Timeout);
        assert_eq!(failure.kind, FailureKind::Timeout);
        assert_eq!(failure.message, TIMEOUT_MESSAGE);
    }

    #[test]
    fn test_invariants_hold_for_all_short_sequences() {
        // 0 = start, 1 = succeed, 2 = fail, 3 = reset, 4 = settle with stale ticket
        let ops = [0u8, 1, 2, 3, 4];
        for a in ops {
            for b in ops {
                for c in ops {
                    for d in ops {
                        let mut state: AsyncActionState<u32> = AsyncActionState::new();
                        let mut last = None;
                        let stale = {
                            let mut other: AsyncActionState<u32> = AsyncActionState::new();
                            other.start().unwrap()
                        };
                        for op in [a, b, c, d] {
                            match op {
                                0 => {
                                    if let Ok(t) = state.start() {
                                        last = Some(t);
                                    }
                                }
                                1 => {
                                    if let Some(t) = last {
                                        state.succeed(t, 9);
                                    }
                                }
                                2 => {
                                    if let Some(t) = last {
                                        state.fail(t, Failure::unauthorized());
                                    }
                                }
                                3 => state.reset(),
                                _ => {
                                    assert!(!state.succeed(stale, 1));
                                }
                            }
                            check_invariants(&state);
                        }
                    }
                }
            }
        }
    }
}
