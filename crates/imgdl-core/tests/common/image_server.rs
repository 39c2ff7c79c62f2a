//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed table of routes (status, content type, body, optional
//! redirect target) and counts requests. Unknown paths get 404. Each
//! connection is handled on its own thread and closed after one response.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub location: Option<String>,
}

impl Route {
    pub fn image(content_type: &str, body: &[u8]) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type.to_string()),
            body: body.to_vec(),
            location: None,
        }
    }

    pub fn page(content_type: &str, body: &str) -> Self {
        Self::image(content_type, body.as_bytes())
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: Some("text/plain".to_string()),
            body: format!("status {}", status).into_bytes(),
            location: None,
        }
    }

    pub fn redirect(to: &str) -> Self {
        Self {
            status: 302,
            content_type: Some("text/html".to_string()),
            body: b"<a>moved</a>".to_vec(),
            location: Some(to.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    /// If set, requests whose User-Agent does not contain this get 403.
    pub required_user_agent: Option<String>,
}

pub struct ImageServer {
    base: String,
    hits: Arc<AtomicUsize>,
}

impl ImageServer {
    /// Base URL without trailing slash, e.g. "http://127.0.0.1:12345".
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub fn start(routes: Vec<(&str, Route)>) -> ImageServer {
    start_with_options(routes, ServerOptions::default())
}

/// Starts the server in a background thread; it runs until the process exits.
pub fn start_with_options(routes: Vec<(&str, Route)>, opts: ServerOptions) -> ImageServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(p, r)| (p.to_string(), r))
            .collect(),
    );
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_srv = Arc::clone(&hits);
    let opts = Arc::new(opts);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&hits_srv);
            let opts = Arc::clone(&opts);
            thread::spawn(move || {
                hits.fetch_add(1, Ordering::SeqCst);
                handle(stream, &routes, &opts);
            });
        }
    });
    ImageServer {
        base: format!("http://127.0.0.1:{}", port),
        hits,
    }
}

/// URL on a port nothing listens on (connection refused).
pub fn closed_port_url(path: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}{}", port, path)
}

fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
        if data.len() > 64 * 1024 {
            break;
        }
    }
    String::from_utf8(data).ok()
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>, opts: &ServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let request = match read_request(&mut stream) {
        Some(r) if !r.is_empty() => r,
        _ => return,
    };
    let (path, user_agent) = parse_request(&request);

    let forbidden = Route::status(403);
    let not_found = Route::status(404);
    let route = match &opts.required_user_agent {
        Some(required) if !user_agent.contains(required.as_str()) => &forbidden,
        _ => routes.get(path).unwrap_or(&not_found),
    };

    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        route.status,
        reason(route.status),
        route.body.len()
    );
    if let Some(ct) = &route.content_type {
        head.push_str(&format!("Content-Type: {}\r\n", ct));
    }
    if let Some(loc) = &route.location {
        head.push_str(&format!("Location: {}\r\n", loc));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&route.body);
    let _ = stream.flush();
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Returns (path without query, user agent).
fn parse_request(request: &str) -> (&str, &str) {
    let mut path = "";
    let mut user_agent = "";
    for (i, line) in request.lines().enumerate() {
        let line = line.trim();
        if i == 0 {
            let target = line.split_whitespace().nth(1).unwrap_or("");
            path = target.split('?').next().unwrap_or("");
            continue;
        }
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("user-agent") {
                user_agent = value.trim();
            }
        }
    }
    (path, user_agent)
}
