//! Performance benchmarks for page rendering
//!
//! Measures table building, column sizing, route resolution and full-frame
//! draws of the shell at different row counts.
//! Run with: cargo bench

use std::sync::Arc;

use cloudinv::adapters::mock::{MockHttpClient, MockIdentityProvider, MockResponse};
use cloudinv::api::ApiClient;
use cloudinv::app::App;
use cloudinv::auth::AuthUser;
use cloudinv::config::{ApiEndpoint, ApiSettings, AppConfiguration};
use cloudinv::pages::ResourceTable;
use cloudinv::router::RouteTable;
use cloudinv::session::SessionManager;
use cloudinv::traits::IdentityProvider;
use cloudinv::ui::{self, column_widths};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ratatui::{backend::TestBackend, Terminal};
use serde_json::{json, Value};

/// EC2-like listing with `rows` instances.
fn generate_instances(rows: usize) -> Value {
    Value::Array(
        (0..rows)
            .map(|i| {
                json!({
                    "InstanceId": format!("i-{:017x}", i),
                    "InstanceType": if i % 3 == 0 { "m5.large" } else { "t3.micro" },
                    "State": if i % 7 == 0 { "stopped" } else { "running" },
                    "PrivateIpAddress": format!("10.0.{}.{}", i / 256, i % 256),
                    "Tags": [{"Key": "Name", "Value": format!("web-{}", i)}],
                    "LaunchTime": "2024-01-01T00:00:00Z"
                })
            })
            .collect(),
    )
}

/// Signed-in app showing the EC2 page with `rows` rows.
fn loaded_app(runtime: &tokio::runtime::Runtime, rows: usize) -> App {
    let http = MockHttpClient::new();
    http.set_default_response(MockResponse::json(200, generate_instances(rows)));
    let identity: Arc<dyn IdentityProvider> =
        Arc::new(MockIdentityProvider::signed_in(AuthUser::new("bench")));
    let config = AppConfiguration {
        api: ApiSettings {
            endpoints: vec![ApiEndpoint::new("inventory", "https://api.bench/prod")],
        },
        ..Default::default()
    }
    .with_header_augmenter(Arc::new(SessionManager::new(Arc::clone(&identity))));
    let api = ApiClient::new(Arc::new(http), Arc::new(config));

    let mut app = App::new(identity, api, "/allec2");
    runtime.block_on(async {
        app.start();
        app.pump_one().await;
        app.pump_one().await;
    });
    app
}

fn bench_table_from_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_from_json");

    for rows in [10, 100, 1000].iter() {
        let value = generate_instances(*rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &value, |b, value| {
            b.iter(|| black_box(ResourceTable::from_json(black_box(value))));
        });
    }

    group.finish();
}

fn bench_column_widths(c: &mut Criterion) {
    let table = ResourceTable::from_json(&generate_instances(1000));
    c.bench_function("column_widths_1000_rows", |b| {
        b.iter(|| black_box(column_widths(black_box(&table.columns), black_box(&table.rows))));
    });
}

fn bench_route_resolution(c: &mut Criterion) {
    let routes = RouteTable::default();
    let paths = ["/", "/allec2", "/alllightsail/extra", "/Table?x=1", "/unknown"];
    c.bench_function("route_resolution", |b| {
        b.iter(|| {
            for path in paths.iter() {
                let _ = black_box(routes.resolve(black_box(path)));
            }
        });
    });
}

fn bench_shell_frame(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let mut group = c.benchmark_group("shell_frame");

    for rows in [10, 100, 1000].iter() {
        let app = loaded_app(&runtime, *rows);
        let mut terminal = Terminal::new(TestBackend::new(160, 48)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(rows), &app, |b, app| {
            b.iter(|| {
                terminal.draw(|f| ui::render(f, app)).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_sign_in_frame(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let identity: Arc<dyn IdentityProvider> = Arc::new(MockIdentityProvider::new());
    let api = ApiClient::new(
        Arc::new(MockHttpClient::new()),
        Arc::new(AppConfiguration::default()),
    );
    let mut app = App::new(identity, api, "/");
    runtime.block_on(async {
        app.start();
        app.pump_one().await;
    });
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

    c.bench_function("sign_in_frame", |b| {
        b.iter(|| {
            terminal.draw(|f| ui::render(f, &app)).unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_table_from_json,
    bench_column_widths,
    bench_route_resolution,
    bench_shell_frame,
    bench_sign_in_frame,
);
criterion_main!(benches);
