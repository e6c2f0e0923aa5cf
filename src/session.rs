//! Planner session: the single owner of query, answer and busy state.
//!
//! State only changes through the transitions below, which mirror the
//! actions of the interactive client:
//!
//! | Transition | Effect |
//! |------------|--------|
//! | [`Session::set_query`] | replace the query text |
//! | [`Session::begin`]     | mark busy, clear answer and days |
//! | [`Session::succeed`]   | store the answer and its day list, clear busy |
//! | [`Session::fail`]      | store the fixed error text, clear busy |
//! | [`Session::clear`]     | drop the answer, keep the query ("Clear") |
//! | [`Session::reset`]     | drop query and answer ("New Plan") |
//!
//! [`Session::submit`] chains `begin → ask → succeed | fail`. The busy flag
//! is advisory: it stops a second `submit` while one is marked in flight,
//! nothing more.

use crate::error::DispatchError;
use crate::pipeline::dispatch::{is_blank, AnswerSource};
use crate::pipeline::segment::{self, ItinerarySection};
use serde::Serialize;
use tracing::{debug, info};

/// Everything the client shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlannerState {
    pub query: String,
    pub answer: String,
    /// Day list of the current answer (empty when it has no day markers).
    pub days: Vec<ItinerarySection>,
    pub loading: bool,
}

/// What a call to [`Session::submit`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The query was blank; nothing was sent and nothing changed.
    Skipped,
    /// A request is already marked in flight; nothing was sent.
    Busy,
    /// The answer was stored.
    Answered,
    /// The request failed; the fixed error text was stored as the answer.
    Failed(DispatchError),
}

/// A planning session over some [`AnswerSource`].
pub struct Session<S> {
    source: S,
    state: PlannerState,
}

impl<S: AnswerSource> Session<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: PlannerState::default(),
        }
    }

    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.state.query = query.into();
    }

    pub fn has_answer(&self) -> bool {
        !self.state.answer.is_empty()
    }

    /// Cards to draw for the current answer; none when there is no answer.
    pub fn cards(&self) -> Vec<ItinerarySection> {
        if self.has_answer() {
            segment::split_cards(&self.state.answer)
        } else {
            Vec::new()
        }
    }

    /// Mark a request in flight. Returns the question to send, or `None`
    /// (and changes nothing) when the query is blank or a request is
    /// already in flight.
    pub fn begin(&mut self) -> Option<String> {
        if is_blank(&self.state.query) || self.state.loading {
            return None;
        }
        self.state.loading = true;
        self.state.answer.clear();
        self.state.days.clear();
        Some(self.state.query.clone())
    }

    pub fn succeed(&mut self, answer: String) {
        self.state.days = segment::parse_days(&answer);
        debug!("Answer has {} day sections", self.state.days.len());
        self.state.answer = answer;
        self.state.loading = false;
    }

    pub fn fail(&mut self, error: &DispatchError) {
        self.state.answer = error.user_message().to_string();
        self.state.days.clear();
        self.state.loading = false;
    }

    /// Send the current query and store the outcome.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if is_blank(&self.state.query) {
            return SubmitOutcome::Skipped;
        }
        let Some(question) = self.begin() else {
            return SubmitOutcome::Busy;
        };

        match self.source.ask(&question).await {
            Ok(answer) => {
                self.succeed(answer);
                info!("Itinerary received ({} days)", self.state.days.len());
                SubmitOutcome::Answered
            }
            Err(e) => {
                self.fail(&e);
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// "Clear": drop the answer, keep the query for editing.
    pub fn clear(&mut self) {
        self.state.answer.clear();
        self.state.days.clear();
    }

    /// "New Plan": drop both query and answer.
    pub fn reset(&mut self) {
        self.state.query.clear();
        self.clear();
    }
}
