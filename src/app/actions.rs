//! Spawning work and applying its results.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{App, AppMessage};
use crate::auth::{execute, AuthPhase, AuthSubmission, Dispatch, PendingCall};
use crate::pages::{fetch_page, PageState};

impl App {
    /// Run an identity provider call in the background.
    pub(super) fn spawn_auth_call(&self, call: PendingCall) {
        let identity = Arc::clone(&self.identity);
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let outcome = execute(identity.as_ref(), call.request).await;
            let _ = tx.send(AppMessage::AuthResolved { id: call.id, outcome });
        });
    }

    /// Hand a form action to the gate.
    pub fn submit_auth(&mut self, submission: AuthSubmission) {
        let from = self.gate.phase();
        match self.gate.submit(submission) {
            Dispatch::Call(call) => {
                self.status = None;
                self.spawn_auth_call(call);
                self.after_gate_change(from);
            }
            Dispatch::Applied => {
                self.status = None;
                self.after_gate_change(from);
            }
            Dispatch::Busy => {
                self.status = Some("Please wait...".to_string());
            }
            Dispatch::Rejected(reason) => {
                self.form.message = Some(reason);
            }
        }
        self.mark_dirty();
    }

    /// Keep the form and the shell in step with the gate.
    fn after_gate_change(&mut self, from: AuthPhase) {
        self.form.sync(self.gate.state());
        let now = self.gate.phase();
        if from == now {
            return;
        }
        if now == AuthPhase::Authenticated {
            if let Some(user) = self.gate.state().user() {
                info!(user = user.display_name(), "Signed in");
            }
            self.load_current_page();
        } else if from == AuthPhase::Authenticated {
            self.pages.clear();
            self.path_prompt = None;
        }
    }

    /// Go to `path` and load its page.
    pub fn navigate(&mut self, path: &str) {
        if self.nav.navigate(path) {
            self.on_path_changed();
        }
    }

    /// Return to the previous path.
    pub fn go_back(&mut self) {
        if self.nav.back() {
            self.on_path_changed();
        }
    }

    /// Fetch the current page again.
    pub fn reload(&mut self) {
        self.load_current_page();
        self.mark_dirty();
    }

    pub fn sign_out(&mut self) {
        if self.gate.may_render_children() {
            self.nav.reset("/");
            self.sidebar_index = 0;
            self.submit_auth(AuthSubmission::SignOut);
        }
    }

    fn on_path_changed(&mut self) {
        if let Some(index) = self.routes.index_of(self.nav.current()) {
            self.sidebar_index = index;
        }
        self.page_scroll = 0;
        self.load_current_page();
        self.mark_dirty();
    }

    /// Start fetching the current page. Only an authenticated shell fetches.
    fn load_current_page(&mut self) {
        if !self.gate.may_render_children() {
            return;
        }
        let path = self.nav.current().to_string();
        let route = match self.routes.resolve(&path) {
            Ok(route) => route,
            Err(err) => {
                warn!(error = %err, "No route matches");
                return;
            }
        };
        if !route.page.fetches() {
            return;
        }

        let generation = self.pages.begin(&path);
        let api = self.api.clone();
        let api_name = self.api_name.clone();
        let page = route.page;
        let tx = self.message_tx.clone();
        debug!(path = %path, generation, "Loading page");
        tokio::spawn(async move {
            let outcome = fetch_page(&api, &api_name, page).await;
            let _ = tx.send(AppMessage::PageLoaded {
                path,
                generation,
                outcome,
            });
        });
    }

    /// Handle an incoming async message
    pub fn handle_message(&mut self, msg: AppMessage) {
        self.mark_dirty();
        match msg {
            AppMessage::AuthResolved { id, outcome } => {
                let from = self.gate.phase();
                if self.gate.complete(id, outcome).is_some() {
                    self.after_gate_change(from);
                }
            }
            AppMessage::PageLoaded {
                path,
                generation,
                outcome,
            } => {
                if !self.pages.is_current(&path, generation) {
                    debug!(path = %path, generation, "Dropping stale page result");
                    return;
                }
                match outcome {
                    Ok(content) => {
                        self.pages.finish(&path, generation, content.into());
                    }
                    Err(err) if err.is_no_active_session() => {
                        let from = self.gate.phase();
                        if self.gate.session_lost().is_some() {
                            self.after_gate_change(from);
                        }
                    }
                    Err(err) => {
                        warn!(path = %path, code = err.error_code(), error = %err, "Page load failed");
                        self.pages
                            .finish(&path, generation, PageState::Failed(err.user_message()));
                    }
                }
            }
        }
    }
}
