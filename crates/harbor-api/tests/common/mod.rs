//! Minimal scripted HTTP services on `127.0.0.1:0` for client tests.

#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use harbor_config::HarborConfig;

/// A request as seen by the scripted service.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: String,
    pub url: String,
    pub authorization: Option<String>,
    pub body: String,
}

/// What the scripted service answers.
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self::json(status, "")
    }

    pub fn slow(status: u16, delay: Duration) -> Self {
        Self {
            status,
            body: String::new(),
            delay: Some(delay),
        }
    }
}

pub struct MockService {
    pub base_url: String,
    pub seen: Arc<Mutex<Vec<Seen>>>,
}

impl MockService {
    pub fn requests(&self) -> Vec<Seen> {
        self.seen.lock().expect("seen lock").clone()
    }
}

/// Serve `handler` on a background thread until the test process exits.
pub fn serve<F>(handler: F) -> MockService
where
    F: Fn(&Seen) -> Reply + Send + 'static,
{
    let server = tiny_http::Server::http("127.0.0.1:0").expect("bind mock service");
    let port = server
        .server_addr()
        .to_ip()
        .map(|addr| addr.port())
        .expect("mock service port");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    std::thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            let authorization = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("Authorization"))
                .map(|h| h.value.as_str().to_string());
            let entry = Seen {
                method: request.method().as_str().to_string(),
                url: request.url().to_string(),
                authorization,
                body,
            };
            log.lock().expect("seen lock").push(entry.clone());

            let reply = handler(&entry);
            if let Some(delay) = reply.delay {
                std::thread::sleep(delay);
            }
            let response = tiny_http::Response::from_string(reply.body)
                .with_status_code(reply.status)
                .with_header(
                    tiny_http::Header::from_bytes("Content-Type", "application/json")
                        .expect("header"),
                );
            let _ = request.respond(response);
        }
    });

    MockService {
        base_url: format!("http://127.0.0.1:{port}"),
        seen,
    }
}

/// A base URL nothing is listening on.
pub fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// Config pointing the three services at the given base URLs.
pub fn config_for(users: &str, catalog: &str, bookings: &str) -> HarborConfig {
    let mut config = HarborConfig::default();
    config.services.users_url = users.to_string();
    config.services.catalog_url = catalog.to_string();
    config.services.bookings_url = bookings.to_string();
    config.http.probe_timeout_secs = 1;
    config.http.request_timeout_secs = 1;
    config
}
