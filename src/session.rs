//! Caller-owned state for the query currently on screen.
//!
//! Requests are never cancelled. Each query gets a ticket carrying a
//! sequence number, and a completion is applied only when its ticket is
//! the latest one issued. Older completions are dropped.

use log::debug;

use crate::openlibrary::{SearchError, SearchResponse};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub enum QueryState {
    #[default]
    Idle,
    Pending(Ticket),
    Success(SearchResponse),
    Failed(SearchError),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Applied {
    Current,
    Stale,
}

#[derive(Debug, Default)]
pub struct QuerySession {
    latest: u64,
    state: QueryState,
}

impl QuerySession {
    pub fn new() -> QuerySession {
        QuerySession::default()
    }

    /// Starts a new query. Whatever was shown before is dropped.
    pub fn begin(&mut self) -> Ticket {
        self.latest += 1;
        let ticket = Ticket(self.latest);
        self.state = QueryState::Pending(ticket);
        ticket
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<SearchResponse, SearchError>,
    ) -> Applied {
        if !self.is_current(ticket) {
            debug!(
                "Discarding result of query #{} (latest is #{})",
                ticket.0, self.latest
            );
            return Applied::Stale;
        }
        self.state = match result {
            Ok(results) => QueryState::Success(results),
            Err(err) => QueryState::Failed(err),
        };
        Applied::Current
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, QueryState::Pending(_))
    }

    /// The results on screen, if the latest query succeeded.
    pub fn results(&self) -> Option<&SearchResponse> {
        match &self.state {
            QueryState::Success(results) => Some(results),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map};

    use super::*;
    use crate::validate::validate;

    fn response(num_found: u64) -> SearchResponse {
        SearchResponse {
            num_found,
            docs: vec![],
            extra: Map::new(),
        }
    }

    #[test]
    fn starts_idle() {
        let session = QuerySession::new();
        assert!(matches!(session.state(), QueryState::Idle));
        assert!(session.results().is_none());
    }

    #[test]
    fn applies_latest_result() {
        let mut session = QuerySession::new();
        let ticket = session.begin();
        assert!(session.is_pending());
        assert_eq!(session.complete(ticket, Ok(response(3))), Applied::Current);
        assert_eq!(session.results().map(|r| r.num_found), Some(3));
    }

    #[test]
    fn stale_result_never_overwrites_newer_query() {
        let mut session = QuerySession::new();
        let first = session.begin();
        let second = session.begin();
        assert!(first < second);

        assert_eq!(session.complete(second, Ok(response(2))), Applied::Current);
        assert_eq!(session.complete(first, Ok(response(1))), Applied::Stale);
        assert_eq!(session.results().map(|r| r.num_found), Some(2));
    }

    #[test]
    fn stale_result_while_newer_pending_is_dropped() {
        let mut session = QuerySession::new();
        let first = session.begin();
        let _second = session.begin();
        assert_eq!(session.complete(first, Ok(response(1))), Applied::Stale);
        assert!(session.is_pending());
    }

    #[test]
    fn new_query_clears_previous_results() {
        let mut session = QuerySession::new();
        let ticket = session.begin();
        session.complete(ticket, Ok(response(5)));
        session.begin();
        assert!(session.results().is_none());
    }

    #[test]
    fn failure_leaves_session_ready() {
        let mut session = QuerySession::new();
        let ticket = session.begin();
        let err = validate(&json!({"docs": []})).unwrap_err();
        session.complete(ticket, Err(err.into()));
        assert!(matches!(session.state(), QueryState::Failed(SearchError::Validation(_))));

        let ticket = session.begin();
        assert_eq!(session.complete(ticket, Ok(response(0))), Applied::Current);
        assert!(session.results().is_some());
    }
}
