#![allow(dead_code)]

use issuetrack::error::{StoreError, StoreResult};
use issuetrack::gateway::IssueGateway;
use issuetrack::model::{Issue, IssuePatch, NewIssue, Status};
use chrono::{DateTime, TimeZone, Utc};
use std::cell::Cell;
use std::rc::Rc;

/// Fixed reference time for deterministic fixtures (2025-01-01 00:00:00 UTC).
pub fn base_time() -> DateTime<Utc> {
    Utc.timestamp_opt(1_735_689_600, 0).unwrap()
}

pub fn new_issue(title: &str) -> NewIssue {
    NewIssue::new(title, format!("{title} description"), Status::Open)
}

/// Which gateway calls a [`FlakyGateway`] should fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct Failures {
    pub list: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

/// Wraps a real gateway, failing selected calls and counting every call
/// that reaches it. The switches are shared so a test can flip them after
/// handing the gateway to a view.
#[derive(Debug, Clone)]
pub struct FlakyGateway<G> {
    inner: G,
    pub failures: Rc<Cell<Failures>>,
    pub calls: Rc<Cell<usize>>,
}

impl<G> FlakyGateway<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            failures: Rc::new(Cell::new(Failures::default())),
            calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    fn enter(&self, fail: impl Fn(Failures) -> bool) -> StoreResult<()> {
        self.calls.set(self.calls.get() + 1);
        if fail(self.failures.get()) {
            Err(StoreError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl<G: IssueGateway> IssueGateway for FlakyGateway<G> {
    fn list(&self, owner_id: &str) -> StoreResult<Vec<Issue>> {
        self.enter(|f| f.list)?;
        self.inner.list(owner_id)
    }

    fn create(&mut self, owner_id: &str, new_issue: &NewIssue) -> StoreResult<Issue> {
        self.enter(|f| f.create)?;
        self.inner.create(owner_id, new_issue)
    }

    fn update(&mut self, owner_id: &str, issue_id: &str, patch: &IssuePatch) -> StoreResult<Issue> {
        self.enter(|f| f.update)?;
        self.inner.update(owner_id, issue_id, patch)
    }

    fn delete(&mut self, owner_id: &str, issue_id: &str) -> StoreResult<()> {
        self.enter(|f| f.delete)?;
        self.inner.delete(owner_id, issue_id)
    }
}
