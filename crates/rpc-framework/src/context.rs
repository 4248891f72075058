//! # Call Context
//!
//! A [`CallContext`] travels with every request. It carries an optional deadline and a
//! cancellation token so that a caller's decision to give up reaches every service the
//! request fans into.
//!
//! Contexts form a tree: [`CallContext::child`] shares the parent's deadline and is
//! cancelled whenever the parent is, but cancelling the child leaves the parent alone.

use crate::status::Status;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};

/// Deadline and cancellation state propagated with a call.
#[derive(Debug, Clone)]
pub struct CallContext {
    deadline: Option<Instant>,
    token: CancellationToken,
}

impl Default for CallContext {
    fn default() -> Self {
        Self::background()
    }
}

impl CallContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self {
            deadline: None,
            token: CancellationToken::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            token: CancellationToken::new(),
        }
    }

    /// Derives a context that is cancelled with `self` and keeps its deadline.
    pub fn child(&self) -> Self {
        Self {
            deadline: self.deadline,
            token: self.token.child_token(),
        }
    }

    /// Derives a child whose deadline is the earlier of the parent's and `now + timeout`.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let local = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(parent) if parent < local => parent,
            _ => local,
        };
        Self {
            deadline: Some(deadline),
            token: self.token.child_token(),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Reports why the context is finished, if it already is.
    pub fn err(&self) -> Option<Status> {
        if self.token.is_cancelled() {
            return Some(Status::cancelled());
        }
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => Some(Status::deadline_exceeded()),
            _ => None,
        }
    }

    /// Cancels this context when the returned guard is dropped.
    pub fn cancel_on_drop(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }

    /// Resolves once the context is cancelled or its deadline passes.
    ///
    /// Never resolves for a background context that nobody cancels.
    pub async fn done(&self) -> Status {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.token.cancelled() => Status::cancelled(),
                _ = tokio::time::sleep_until(deadline) => Status::deadline_exceeded(),
            },
            None => {
                self.token.cancelled().await;
                Status::cancelled()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Code;

    #[tokio::test]
    async fn test_child_cancelled_with_parent() {
        let parent = CallContext::background();
        let child = parent.child();

        parent.cancel();

        assert!(child.is_cancelled());
        assert_eq!(child.done().await.code(), Code::Cancelled);
    }

    #[tokio::test]
    async fn test_cancelling_child_leaves_parent_alone() {
        let parent = CallContext::background();
        let child = parent.child();

        child.cancel();

        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
        assert!(parent.err().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_reports_deadline_exceeded() {
        let ctx = CallContext::with_timeout(Duration::from_millis(50));
        assert!(ctx.err().is_none());

        let status = ctx.done().await;

        assert_eq!(status.code(), Code::DeadlineExceeded);
        assert_eq!(ctx.err().map(|s| s.code()), Some(Code::DeadlineExceeded));
    }

    #[tokio::test(start_paused = true)]
    async fn test_child_with_timeout_keeps_earliest_deadline() {
        let parent = CallContext::with_timeout(Duration::from_millis(10));
        let child = parent.child_with_timeout(Duration::from_secs(10));
        assert_eq!(child.deadline(), parent.deadline());

        let relaxed = CallContext::background().child_with_timeout(Duration::from_millis(10));
        assert!(relaxed.deadline().is_some());
    }

    #[tokio::test]
    async fn test_cancel_on_drop() {
        let ctx = CallContext::background();
        {
            let _guard = ctx.cancel_on_drop();
            assert!(!ctx.is_cancelled());
        }
        assert!(ctx.is_cancelled());
    }
}
