//! Lookup state machine driving a [`WeatherClient`].
//!
//! The controller never awaits while holding `&mut self`. [`LookupController::submit`]
//! performs the synchronous `Idle/Success/Failed -> Loading` transition and hands back a
//! [`PendingLookup`]; the event loop runs it and feeds the [`Completion`] back through
//! [`LookupController::complete`]. Each submit takes a fresh ticket, and a completion
//! whose ticket is not the latest one is discarded, so a slow response from a
//! superseded submit can never overwrite newer state.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    LookupError, WeatherResult,
    client::WeatherClient,
    model::{LookupState, normalize_query},
};

/// Identifies one submit. Later submits always get larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// A lookup that has been dispatched by [`LookupController::submit`] but not yet run.
#[must_use = "a pending lookup does nothing until it is run and completed"]
#[derive(Debug)]
pub struct PendingLookup {
    ticket: Ticket,
    query: String,
    client: Arc<dyn WeatherClient>,
}

impl PendingLookup {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Perform the network call. Exactly one request per lookup.
    pub async fn run(self) -> Completion {
        let outcome = self.client.fetch(&self.query).await;
        Completion { ticket: self.ticket, outcome }
    }
}

/// Outcome of a [`PendingLookup`], tagged with the ticket it was issued under.
#[derive(Debug)]
pub struct Completion {
    ticket: Ticket,
    outcome: Result<WeatherResult, LookupError>,
}

impl Completion {
    pub fn new(ticket: Ticket, outcome: Result<WeatherResult, LookupError>) -> Self {
        Self { ticket, outcome }
    }

    pub fn ticket(&self) -> Ticket {
        self.ticket
    }
}

/// What [`LookupController::complete`] did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The completion belonged to the latest submit and updated the state.
    Current,
    /// A newer submit exists; the completion was dropped.
    Stale,
}

#[derive(Debug)]
pub struct LookupController {
    client: Arc<dyn WeatherClient>,
    query_text: String,
    state: LookupState,
    issued: u64,
    focus_requested: bool,
}

impl LookupController {
    pub fn new(client: Arc<dyn WeatherClient>) -> Self {
        Self {
            client,
            query_text: String::new(),
            state: LookupState::Idle,
            issued: 0,
            focus_requested: false,
        }
    }

    /// Create the controller and issue the automatic lookup for `seed`.
    pub fn start(client: Arc<dyn WeatherClient>, seed: &str) -> (Self, Option<PendingLookup>) {
        let mut controller = Self::new(client);
        controller.set_query_text(seed);
        let pending = controller.submit();
        (controller, pending)
    }

    pub fn state(&self) -> &LookupState {
        &self.state
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    /// Replace the pending query text. Never touches the lookup state.
    pub fn set_query_text(&mut self, text: impl Into<String>) {
        self.query_text = text.into();
    }

    /// Start a lookup for the current query text.
    ///
    /// Returns `None` without any transition if the text is blank. Otherwise the
    /// state is `Loading` by the time this returns, and any lookup still in flight
    /// is superseded.
    pub fn submit(&mut self) -> Option<PendingLookup> {
        let Some(query) = normalize_query(&self.query_text).map(str::to_owned) else {
            debug!("ignoring submit with blank query");
            return None;
        };

        if self.state.is_loading() {
            debug!(superseded = self.issued, "new submit supersedes in-flight lookup");
        }

        self.issued += 1;
        let ticket = Ticket(self.issued);
        debug!(ticket = ticket.0, %query, "dispatching lookup");

        self.state = LookupState::Loading { query: query.clone() };

        Some(PendingLookup { ticket, query, client: Arc::clone(&self.client) })
    }

    /// Apply the outcome of a lookup, unless a newer submit has already started.
    pub fn complete(&mut self, completion: Completion) -> Applied {
        if completion.ticket != Ticket(self.issued) || !self.state.is_loading() {
            debug!(
                ticket = completion.ticket.0,
                latest = self.issued,
                "discarding stale lookup response"
            );
            return Applied::Stale;
        }

        match completion.outcome {
            Ok(result) => {
                info!(city = %result.city_name, "lookup succeeded");
                self.state = LookupState::Success { result };
                self.query_text.clear();
                self.focus_requested = true;
            }
            Err(error) => {
                warn!(kind = %error.kind(), "lookup failed: {error}");
                self.state = LookupState::Failed { error };
            }
        }

        Applied::Current
    }

    /// Submit and drive the lookup to completion. Returns `None` for a blank query.
    pub async fn submit_and_wait(&mut self) -> Option<Applied> {
        let pending = self.submit()?;
        let completion = pending.run().await;
        Some(self.complete(completion))
    }

    /// True once after each successful lookup: the input field should regain focus.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::{
        collections::HashMap,
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
    };

    #[derive(Debug, Default)]
    struct StubClient {
        responses: HashMap<String, Result<WeatherResult, LookupError>>,
        calls: AtomicUsize,
        queries: Mutex<Vec<String>>,
    }

    impl StubClient {
        fn with(mut self, query: &str, outcome: Result<WeatherResult, LookupError>) -> Self {
            self.responses.insert(query.to_string(), outcome);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherClient for StubClient {
        async fn fetch(&self, city_name: &str) -> Result<WeatherResult, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(city_name.to_string());
            self.responses
                .get(city_name)
                .cloned()
                .unwrap_or_else(|| Err(LookupError::http_status()))
        }
    }

    fn weather(city: &str, temp: f64) -> WeatherResult {
        WeatherResult {
            city_name: city.to_string(),
            temperature_c: temp,
            humidity_pct: 50,
            wind_speed_kph: 10.0,
        }
    }

    fn controller(stub: StubClient) -> (LookupController, Arc<StubClient>) {
        let stub = Arc::new(stub);
        (LookupController::new(stub.clone()), stub)
    }

    #[test]
    fn submit_enters_loading_before_the_call_resolves() {
        let (mut ctl, stub) = controller(StubClient::default());
        ctl.set_query_text("  Berlin ");

        let pending = ctl.submit().expect("non-blank query dispatches");

        assert_eq!(ctl.state(), &LookupState::Loading { query: "Berlin".into() });
        assert_eq!(pending.query(), "Berlin");
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn blank_submit_is_a_no_op() {
        let (mut ctl, stub) = controller(StubClient::default());

        for text in ["", "   ", "\t\n"] {
            ctl.set_query_text(text);
            assert!(ctl.submit().is_none());
            assert!(ctl.submit_and_wait().await.is_none());
            assert_eq!(ctl.state(), &LookupState::Idle);
        }

        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn blank_submit_keeps_previous_result() {
        let stub = StubClient::default().with("Rome", Ok(weather("Rome", 24.0)));
        let (mut ctl, stub) = controller(stub);

        ctl.set_query_text("Rome");
        ctl.submit_and_wait().await;
        ctl.set_query_text("  ");
        assert!(ctl.submit().is_none());

        assert_eq!(ctl.state().result(), Some(&weather("Rome", 24.0)));
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn success_keeps_provider_city_name() {
        let stub = StubClient::default().with("Paris", Ok(weather("Paris, FR", 18.0)));
        let (mut ctl, _) = controller(stub);

        ctl.set_query_text("Paris");
        let applied = ctl.submit_and_wait().await;

        assert_eq!(applied, Some(Applied::Current));
        let result = ctl.state().result().expect("lookup should succeed");
        assert_eq!(result.city_name, "Paris, FR");
    }

    #[tokio::test]
    async fn success_clears_query_and_requests_focus() {
        let stub = StubClient::default().with("Oslo", Ok(weather("Oslo", -3.0)));
        let (mut ctl, _) = controller(stub);

        ctl.set_query_text("Oslo");
        ctl.submit_and_wait().await;

        assert_eq!(ctl.query_text(), "");
        assert!(ctl.take_focus_request());
        assert!(!ctl.take_focus_request());
    }

    #[tokio::test]
    async fn failure_stores_message_and_keeps_query() {
        let stub = StubClient::default().with("Nowhere", Err(LookupError::transport("timeout")));
        let (mut ctl, _) = controller(stub);

        ctl.set_query_text("Nowhere");
        ctl.submit_and_wait().await;

        let error = ctl.state().error().expect("lookup should fail");
        assert_eq!(error.message(), "timeout");
        assert_eq!(ctl.query_text(), "Nowhere");
        assert!(!ctl.take_focus_request());
    }

    #[tokio::test]
    async fn failed_state_recovers_on_next_submit() {
        let stub = StubClient::default()
            .with("Nowhere", Err(LookupError::transport("timeout")))
            .with("Madrid", Ok(weather("Madrid", 30.0)));
        let (mut ctl, stub) = controller(stub);

        ctl.set_query_text("Nowhere");
        ctl.submit_and_wait().await;
        assert!(ctl.state().error().is_some());

        ctl.set_query_text("Madrid");
        let pending = ctl.submit().unwrap();
        assert!(ctl.state().is_loading());
        let applied = ctl.complete(pending.run().await);

        assert_eq!(applied, Applied::Current);
        assert_eq!(ctl.state().result().map(|r| r.city_name.as_str()), Some("Madrid"));
        assert_eq!(stub.calls(), 2);
    }

    #[tokio::test]
    async fn stale_response_never_overwrites_newer_submit() {
        let stub = StubClient::default()
            .with("A", Ok(weather("A", 1.0)))
            .with("B", Ok(weather("B", 2.0)));
        let (mut ctl, _) = controller(stub);

        ctl.set_query_text("A");
        let a = ctl.submit().unwrap();
        ctl.set_query_text("B");
        let b = ctl.submit().unwrap();
        assert_eq!(ctl.state(), &LookupState::Loading { query: "B".into() });
        assert!(b.ticket() > a.ticket());

        assert_eq!(ctl.complete(b.run().await), Applied::Current);
        assert_eq!(ctl.complete(a.run().await), Applied::Stale);

        assert_eq!(ctl.state().result(), Some(&weather("B", 2.0)));
    }

    #[tokio::test]
    async fn stale_response_is_dropped_while_newer_still_loading() {
        let stub = StubClient::default()
            .with("A", Err(LookupError::transport("connection reset")))
            .with("B", Ok(weather("B", 2.0)));
        let (mut ctl, _) = controller(stub);

        ctl.set_query_text("A");
        let a = ctl.submit().unwrap();
        ctl.set_query_text("B");
        let b = ctl.submit().unwrap();

        assert_eq!(ctl.complete(a.run().await), Applied::Stale);
        assert_eq!(ctl.state(), &LookupState::Loading { query: "B".into() });

        assert_eq!(ctl.complete(b.run().await), Applied::Current);
        assert_eq!(ctl.state().result().map(|r| r.city_name.as_str()), Some("B"));
    }

    #[test]
    fn duplicate_completion_is_ignored() {
        let (mut ctl, _) = controller(StubClient::default());
        ctl.set_query_text("Lima");
        let pending = ctl.submit().unwrap();
        let ticket = pending.ticket();

        let first = Completion::new(ticket, Ok(weather("Lima", 20.0)));
        let second = Completion::new(ticket, Err(LookupError::transport("late")));

        assert_eq!(ctl.complete(first), Applied::Current);
        assert_eq!(ctl.complete(second), Applied::Stale);
        assert!(ctl.state().result().is_some());
    }

    #[test]
    fn set_query_text_never_changes_state() {
        let (mut ctl, stub) = controller(StubClient::default());

        for text in ["L", "Lo", "Lon", "", "London"] {
            ctl.set_query_text(text);
            assert_eq!(ctl.state(), &LookupState::Idle);
        }
        assert_eq!(ctl.query_text(), "London");

        let _pending = ctl.submit().unwrap();
        ctl.set_query_text("Leeds");
        assert_eq!(ctl.state(), &LookupState::Loading { query: "London".into() });
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn start_issues_seed_lookup() {
        let stub = Arc::new(StubClient::default().with("London", Ok(weather("London", 11.0))));

        let (mut ctl, pending) = LookupController::start(stub.clone(), "London");
        let pending = pending.expect("seed lookup is dispatched");
        assert_eq!(ctl.state(), &LookupState::Loading { query: "London".into() });
        assert_eq!(ctl.query_text(), "London");

        ctl.complete(pending.run().await);

        assert_eq!(ctl.state().result().map(|r| r.city_name.as_str()), Some("London"));
        assert_eq!(ctl.query_text(), "");
        assert_eq!(*stub.queries.lock().unwrap(), vec!["London".to_string()]);
    }

    #[test]
    fn start_with_blank_seed_stays_idle() {
        let (ctl, pending) = LookupController::start(Arc::new(StubClient::default()), " ");

        assert!(pending.is_none());
        assert_eq!(ctl.state(), &LookupState::Idle);
    }
}
