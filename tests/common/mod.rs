//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use cloudinv::adapters::mock::{MockHttpClient, MockIdentityProvider};
use cloudinv::api::ApiClient;
use cloudinv::app::App;
use cloudinv::config::{ApiEndpoint, ApiSettings, AppConfiguration};
use cloudinv::session::SessionManager;
use cloudinv::traits::{HttpClient, IdentityProvider};
use cloudinv::ui;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};

pub const API_NAME: &str = "inventory";
pub const API_URL: &str = "https://api.test/prod";

/// Configuration with one endpoint whose headers come from `identity`.
pub fn config_for(identity: Arc<dyn IdentityProvider>, url: &str) -> Arc<AppConfiguration> {
    let config = AppConfiguration {
        api: ApiSettings {
            endpoints: vec![ApiEndpoint::new(API_NAME, url)],
        },
        ..Default::default()
    }
    .with_header_augmenter(Arc::new(SessionManager::new(identity)));
    Arc::new(config)
}

pub fn api_client(identity: Arc<dyn IdentityProvider>, http: Arc<dyn HttpClient>, url: &str) -> ApiClient {
    ApiClient::new(http, config_for(identity, url))
}

/// App wired to mocks, not yet started.
pub fn test_app(identity: &MockIdentityProvider, http: &MockHttpClient, path: &str) -> App {
    let identity: Arc<dyn IdentityProvider> = Arc::new(identity.clone());
    let api = api_client(Arc::clone(&identity), Arc::new(http.clone()), API_URL);
    App::new(identity, api, path)
}

/// App with the startup probe already applied.
pub async fn started_app(identity: &MockIdentityProvider, http: &MockHttpClient, path: &str) -> App {
    let mut app = test_app(identity, http, path);
    app.start();
    assert!(app.pump_one().await);
    app
}

pub fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

pub fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

/// Render to a 100x30 test terminal and return the screen as text.
pub fn draw(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|f| ui::render(f, app)).unwrap();
    let buffer = terminal.backend().buffer().clone();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}
