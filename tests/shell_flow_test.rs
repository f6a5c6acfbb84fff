//! Keyboard-driven journeys through the gate and the routed shell,
//! checked on a rendered test terminal.

mod common;

use cloudinv::adapters::mock::{MockHttpClient, MockIdentityProvider, MockResponse};
use cloudinv::auth::{AuthPhase, AuthUser};
use cloudinv::pages::PageState;
use common::{draw, press, started_app, type_text, API_URL};
use crossterm::event::KeyCode;
use serde_json::json;

fn ec2_response() -> MockResponse {
    MockResponse::json(
        200,
        json!([
            {"InstanceId": "i-0aaa", "InstanceType": "t3.micro", "State": "running"},
            {"InstanceId": "i-0bbb", "InstanceType": "m5.large", "State": "stopped"}
        ]),
    )
}

#[tokio::test]
async fn test_sign_in_then_browse_to_a_resource_page() {
    let identity = MockIdentityProvider::new();
    let http = MockHttpClient::new();
    http.set_response(&format!("{}/?function=ec2", API_URL), ec2_response());
    let mut app = started_app(&identity, &http, "/").await;

    let screen = draw(&app);
    assert!(screen.contains("Sign in to your account"));
    assert!(!screen.contains("Navigation"));

    type_text(&mut app, "alice");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "secret");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.gate.phase(), AuthPhase::Loading);
    assert!(draw(&app).contains("Signing in"));

    assert!(app.pump_one().await);
    let screen = draw(&app);
    assert!(screen.contains("Welcome, alice"));
    assert!(screen.contains("Navigation"));
    assert!(http.get_requests().is_empty());

    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.nav.current(), "/allec2");
    assert!(draw(&app).contains("Loading EC2 Instances"));

    assert!(app.pump_one().await);
    let screen = draw(&app);
    assert!(screen.contains("InstanceType"));
    assert!(screen.contains("i-0bbb"));
    assert!(screen.contains("m5.large"));

    let requests = http.get_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].header("Authorization"), Some("mock-id-token"));
}

#[tokio::test]
async fn test_expired_session_returns_to_sign_in_and_back() {
    let identity = MockIdentityProvider::signed_in(AuthUser::new("alice"));
    let http = MockHttpClient::new();
    http.set_default_response(ec2_response());
    let mut app = started_app(&identity, &http, "/allec2").await;
    assert!(app.pump_one().await);
    assert!(matches!(app.current_page_state(), PageState::Loaded(_)));

    identity.set_session(None);
    press(&mut app, KeyCode::Char('r'));
    assert!(app.pump_one().await);

    assert_eq!(app.gate.phase(), AuthPhase::Unauthenticated);
    let screen = draw(&app);
    assert!(screen.contains("Your session has expired"));
    assert!(!screen.contains("i-0aaa"));
    assert_eq!(app.nav.current(), "/allec2");

    type_text(&mut app, "alice");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "secret");
    press(&mut app, KeyCode::Enter);
    assert!(app.pump_one().await);
    assert!(app.gate.may_render_children());

    // Back on the page the user was looking at.
    assert!(app.pump_one().await);
    assert!(draw(&app).contains("i-0aaa"));
}

#[tokio::test]
async fn test_failed_page_can_be_retried() {
    let identity = MockIdentityProvider::signed_in(AuthUser::new("alice"));
    let http = MockHttpClient::new();
    http.push_response(MockResponse::json(503, json!({"message": "Service Unavailable"})));
    http.set_default_response(MockResponse::json(200, json!([])));
    let mut app = started_app(&identity, &http, "/allrds").await;

    assert!(app.pump_one().await);
    assert!(matches!(app.current_page_state(), PageState::Failed(_)));
    let screen = draw(&app);
    assert!(screen.contains("[r] Retry"));
    assert!(app.gate.may_render_children());

    press(&mut app, KeyCode::Char('r'));
    assert!(app.pump_one().await);
    assert!(draw(&app).contains("No resources found."));
}

#[tokio::test]
async fn test_refresh_page_shows_backend_message() {
    let identity = MockIdentityProvider::signed_in(AuthUser::new("alice"));
    let http = MockHttpClient::new();
    http.set_response(
        &format!("{}/?function=cron", API_URL),
        MockResponse::json(200, json!({"message": "Inventory refresh started"})),
    );
    let mut app = started_app(&identity, &http, "/refresh").await;
    assert!(app.pump_one().await);

    assert!(draw(&app).contains("Inventory refresh started"));
}

#[tokio::test]
async fn test_path_prompt_navigation_and_history() {
    let identity = MockIdentityProvider::signed_in(AuthUser::new("alice"));
    let http = MockHttpClient::new();
    http.set_default_response(MockResponse::json(200, json!([])));
    let mut app = started_app(&identity, &http, "/").await;

    press(&mut app, KeyCode::Char('/'));
    assert!(draw(&app).contains("Go to: /"));
    type_text(&mut app, "allsubnets/extra");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.nav.current(), "/allsubnets/extra");
    assert!(app.pump_one().await);
    assert!(draw(&app).contains("Subnets"));

    press(&mut app, KeyCode::Char('/'));
    press(&mut app, KeyCode::Esc);
    assert!(app.path_prompt.is_none());
    assert_eq!(app.nav.current(), "/allsubnets/extra");

    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.nav.current(), "/");
    assert!(draw(&app).contains("Welcome, alice"));
}

#[tokio::test]
async fn test_sign_out_shows_sign_in_and_resets_path() {
    let identity = MockIdentityProvider::signed_in(AuthUser::new("alice"));
    let http = MockHttpClient::new();
    http.set_default_response(ec2_response());
    let mut app = started_app(&identity, &http, "/allec2").await;
    assert!(app.pump_one().await);

    press(&mut app, KeyCode::Char('o'));
    assert!(app.pump_one().await);

    assert_eq!(app.gate.phase(), AuthPhase::Unauthenticated);
    assert_eq!(app.nav.current(), "/");
    assert!(identity.session().is_none());
    let screen = draw(&app);
    assert!(screen.contains("Sign in to your account"));
    assert!(!screen.contains("i-0aaa"));
}
