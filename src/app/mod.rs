//! Application state and logic for the TUI.
//!
//! [`App`] wraps the dashboard in the authentication gate:
//! - the gate decides whether the routed shell may render at all
//! - [`FormState`] holds what the user types into the gate's forms
//! - the router and [`PageStore`] drive the shell once authenticated
//!
//! Provider calls and page fetches run as spawned tasks; their results come
//! back as [`AppMessage`]s over an unbounded channel and are applied in
//! arrival order by [`App::handle_message`].

mod actions;
mod form;
mod handlers;
mod messages;

pub use form::{contact_options, FormField, FormKind, FormState};
pub use messages::AppMessage;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

use crate::api::ApiClient;
use crate::auth::{AuthGate, PendingCall};
use crate::pages::{PageKind, PageState, PageStore};
use crate::router::{NavigationState, RouteTable};
use crate::traits::IdentityProvider;

/// Main application state
pub struct App {
    /// Authentication gate wrapping the whole shell
    pub gate: AuthGate,
    /// Input on the current gate form
    pub form: FormState,
    /// Static route list
    pub routes: RouteTable,
    /// Current path and back-history
    pub nav: NavigationState,
    /// Per-path page load state
    pub pages: PageStore,
    /// Highlighted sidebar entry
    pub sidebar_index: usize,
    /// Text of the open path prompt, if any
    pub path_prompt: Option<String>,
    /// One-line status shown in the footer
    pub status: Option<String>,
    /// First visible row of the page table
    pub page_scroll: usize,
    /// Flag to track if the app should quit
    pub should_quit: bool,
    /// Set when state changed and the frame must be redrawn
    pub needs_redraw: bool,
    /// Tick counter for the spinner
    pub tick_count: u64,
    /// Sender for results of spawned work
    pub message_tx: mpsc::UnboundedSender<AppMessage>,
    /// Receiver, taken by the event loop
    pub message_rx: Option<mpsc::UnboundedReceiver<AppMessage>>,
    identity: Arc<dyn IdentityProvider>,
    api: ApiClient,
    api_name: String,
    startup_call: Option<PendingCall>,
}

impl App {
    /// Build the app with the gate in `Loading`. Call [`App::start`] from
    /// inside the runtime to run the session probe.
    pub fn new(identity: Arc<dyn IdentityProvider>, api: ApiClient, initial_path: &str) -> Self {
        let (gate, probe) = AuthGate::start();
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let routes = RouteTable::default();
        let nav = NavigationState::new(initial_path);
        let api_name = match api.config().primary_endpoint() {
            Some(endpoint) => endpoint.name.clone(),
            None => {
                warn!("No API endpoint configured; pages will fail to load");
                String::new()
            }
        };

        let mut form = FormState::default();
        form.sync(gate.state());

        Self {
            sidebar_index: routes.index_of(nav.current()).unwrap_or(0),
            gate,
            form,
            routes,
            nav,
            pages: PageStore::new(),
            path_prompt: None,
            status: None,
            page_scroll: 0,
            should_quit: false,
            needs_redraw: true,
            tick_count: 0,
            message_tx,
            message_rx: Some(message_rx),
            identity,
            api,
            api_name,
            startup_call: Some(probe),
        }
    }

    /// Dispatch the startup session probe.
    pub fn start(&mut self) {
        if let Some(call) = self.startup_call.take() {
            self.spawn_auth_call(call);
        }
    }

    /// Name of the API endpoint pages fetch from.
    pub fn api_name(&self) -> &str {
        &self.api_name
    }

    /// Page component for the current path, if any route matches.
    pub fn current_page(&self) -> Option<PageKind> {
        self.routes.resolve(self.nav.current()).ok().map(|route| route.page)
    }

    pub fn current_page_state(&self) -> &PageState {
        self.pages.state(self.nav.current())
    }

    /// Whether a spinner should animate.
    pub fn is_busy(&self) -> bool {
        self.gate.pending().is_some() || matches!(self.current_page_state(), PageState::Loading)
    }

    pub fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        if self.is_busy() && self.tick_count % 6 == 0 {
            self.mark_dirty();
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Wait for the next spawned result and apply it. Returns false when the
    /// channel is closed or the receiver was taken.
    pub async fn pump_one(&mut self) -> bool {
        let Some(rx) = self.message_rx.as_mut() else {
            return false;
        };
        match rx.recv().await {
            Some(msg) => {
                self.handle_message(msg);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockIdentityProvider, MockResponse};
    use crate::auth::{AuthPhase, AuthUser};
    use crate::config::{ApiEndpoint, ApiSettings, AppConfiguration};
    use crate::error::AuthError;
    use crate::session::SessionManager;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use serde_json::json;

    const API_URL: &str = "https://api.test/prod";

    fn build(identity: MockIdentityProvider, http: MockHttpClient, path: &str) -> App {
        let identity: Arc<dyn IdentityProvider> = Arc::new(identity);
        let config = AppConfiguration {
            api: ApiSettings {
                endpoints: vec![ApiEndpoint::new("inventory", API_URL)],
            },
            ..Default::default()
        }
        .with_header_augmenter(Arc::new(SessionManager::new(Arc::clone(&identity))));
        let api = ApiClient::new(Arc::new(http), Arc::new(config));
        App::new(identity, api, path)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[tokio::test]
    async fn test_startup_without_session_shows_sign_in() {
        let mut app = build(MockIdentityProvider::new(), MockHttpClient::new(), "/");
        assert_eq!(app.gate.phase(), AuthPhase::Loading);
        assert_eq!(app.form.kind(), FormKind::Waiting);

        app.start();
        assert!(app.pump_one().await);
        assert_eq!(app.gate.phase(), AuthPhase::Unauthenticated);
        assert_eq!(app.form.kind(), FormKind::SignIn);
    }

    #[tokio::test]
    async fn test_existing_session_loads_initial_page() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::json(200, json!([{"InstanceId": "i-1"}])));
        let identity = MockIdentityProvider::signed_in(AuthUser::new("alice"));
        let mut app = build(identity, http.clone(), "/allec2");

        app.start();
        app.pump_one().await;
        assert_eq!(app.gate.phase(), AuthPhase::Authenticated);
        assert_eq!(app.current_page_state(), &PageState::Loading);

        app.pump_one().await;
        match app.current_page_state() {
            PageState::Loaded(table) => assert_eq!(table.rows, vec![vec!["i-1".to_string()]]),
            other => panic!("expected table, got {:?}", other),
        }

        let request = &http.get_requests()[0];
        assert_eq!(request.url, format!("{}/?function=ec2", API_URL));
        assert!(request.header("Authorization").is_some());
    }

    #[tokio::test]
    async fn test_sign_in_through_form() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::json(200, json!([])));
        let mut app = build(MockIdentityProvider::new(), http, "/");
        app.start();
        app.pump_one().await;

        type_text(&mut app, "alice");
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "secret");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.gate.phase(), AuthPhase::Loading);

        // Enter again while loading is refused.
        app.handle_key(key(KeyCode::Enter));
        assert!(app.status.is_some());

        app.pump_one().await;
        assert!(app.gate.may_render_children());
        assert_eq!(app.form.kind(), FormKind::Hidden);
        // Home does not fetch.
        assert_eq!(app.current_page_state(), &PageState::Idle);
    }

    #[tokio::test]
    async fn test_empty_credentials_show_message() {
        let identity = MockIdentityProvider::new();
        let mut app = build(identity.clone(), MockHttpClient::new(), "/");
        app.start();
        app.pump_one().await;

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.gate.phase(), AuthPhase::Unauthenticated);
        assert!(app.form.message.is_some());
        assert_eq!(identity.call_count("sign_in"), 0);
    }

    #[tokio::test]
    async fn test_page_without_session_returns_to_sign_in() {
        let identity = MockIdentityProvider::signed_in(AuthUser::new("alice"));
        let mut app = build(identity.clone(), MockHttpClient::new(), "/");
        app.start();
        app.pump_one().await;
        assert!(app.gate.may_render_children());

        identity.set_session_error(Some(AuthError::NoActiveSession));
        app.navigate("/alls3");
        app.pump_one().await;

        assert_eq!(app.gate.phase(), AuthPhase::Unauthenticated);
        assert_eq!(app.form.kind(), FormKind::SignIn);
        assert_eq!(app.current_page_state(), &PageState::Idle);
    }

    #[tokio::test]
    async fn test_stale_page_result_is_dropped() {
        let http = MockHttpClient::new();
        http.push_response(MockResponse::json(200, json!([{"a": "first"}])));
        http.push_response(MockResponse::json(200, json!([{"a": "second"}])));
        let identity = MockIdentityProvider::signed_in(AuthUser::new("alice"));
        let mut app = build(identity, http, "/allrds");
        app.start();
        app.pump_one().await;

        // Reload before the first fetch is applied.
        app.reload();
        app.pump_one().await;
        app.pump_one().await;

        match app.current_page_state() {
            PageState::Loaded(table) => assert_eq!(table.len(), 1),
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_path_renders_nothing_and_fetches_nothing() {
        let http = MockHttpClient::new();
        let identity = MockIdentityProvider::signed_in(AuthUser::new("alice"));
        let mut app = build(identity, http.clone(), "/unknown-path");
        app.start();
        app.pump_one().await;

        assert!(app.gate.may_render_children());
        assert_eq!(app.current_page(), None);
        assert!(http.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_sign_out_key() {
        let identity = MockIdentityProvider::signed_in(AuthUser::new("alice"));
        let mut app = build(identity.clone(), MockHttpClient::new(), "/");
        app.start();
        app.pump_one().await;
        app.navigate("/refresh");

        app.handle_key(key(KeyCode::Char('o')));
        app.pump_one().await;
        // The refresh fetch may land first; drain until signed out.
        while app.gate.phase() != AuthPhase::Unauthenticated {
            assert!(app.pump_one().await);
        }
        assert_eq!(app.nav.current(), "/");
        assert!(identity.session().is_none());
    }
}
