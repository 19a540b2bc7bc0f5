#![allow(dead_code)]

//! Scripted stand-in for the hosted table and auth API.

use std::thread::{self, JoinHandle};

/// One request as the server saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A server that answers each request with the next scripted response.
pub struct FakeRest {
    pub base_url: String,
    handle: JoinHandle<Vec<Recorded>>,
}

impl FakeRest {
    /// Serve `responses` as `(status, json body)` in order, then stop.
    pub fn serve(responses: Vec<(u16, String)>) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind fake server");
        let addr = server.server_addr().to_ip().expect("ip listener");
        let base_url = format!("http://{addr}");

        let handle = thread::spawn(move || {
            let mut recorded = Vec::new();
            for (status, body) in responses {
                let Ok(mut request) = server.recv() else {
                    break;
                };
                let mut request_body = String::new();
                let _ = request.as_reader().read_to_string(&mut request_body);
                recorded.push(Recorded {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    headers: request
                        .headers()
                        .iter()
                        .map(|h| (h.field.to_string(), h.value.to_string()))
                        .collect(),
                    body: request_body,
                });

                let response = tiny_http::Response::from_string(body)
                    .with_status_code(status)
                    .with_header(
                        tiny_http::Header::from_bytes("Content-Type", "application/json").unwrap(),
                    );
                let _ = request.respond(response);
            }
            recorded
        });

        Self { base_url, handle }
    }

    /// Wait for the script to finish and return what was received.
    pub fn requests(self) -> Vec<Recorded> {
        self.handle.join().expect("fake server thread")
    }
}

/// A table row as PostgREST returns it.
pub fn row(id: &str, title: &str, status: &str, user_id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "description": format!("{title} description"),
        "status": status,
        "created_at": "2026-01-05T10:00:00.123456+00:00",
        "user_id": user_id,
    })
}
