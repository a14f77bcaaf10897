//! Minimal HTTP/1.1 server that supports HEAD and Range GET for integration tests.
//!
//! Serves a fixed set of paths. Responds to HEAD with Content-Length and
//! Accept-Ranges: bytes; responds to GET with Range with 206 Partial Content,
//! or 416 when the range starts past the end. Every request is recorded so
//! tests can assert what was (or was not) asked for.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// One served path.
#[derive(Debug, Clone)]
pub struct Route {
    pub body: Vec<u8>,
    /// If set, every request to this path is answered with this status and no body.
    pub status: Option<u16>,
    /// Like `status`, but only for GET; HEAD is answered normally.
    pub get_status: Option<u16>,
    /// Ranged GETs are answered from this offset, whatever was asked for.
    pub serve_from: Option<u64>,
    /// If false, GET ignores Range and always returns 200 with the full body.
    pub support_ranges: bool,
}

impl Route {
    pub fn new(body: Vec<u8>) -> Self {
        Self {
            body,
            status: None,
            get_status: None,
            serve_from: None,
            support_ranges: true,
        }
    }

    pub fn status(code: u16) -> Self {
        Self {
            status: Some(code),
            ..Self::new(Vec::new())
        }
    }

    pub fn with_get_status(mut self, code: u16) -> Self {
        self.get_status = Some(code);
        self
    }

    pub fn serving_from(mut self, offset: u64) -> Self {
        self.serve_from = Some(offset);
        self
    }

    pub fn without_ranges(mut self) -> Self {
        self.support_ranges = false;
        self
    }
}

/// A request as seen by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub path: String,
    /// Raw `Range` header value, e.g. `bytes=100-`.
    pub range: Option<String>,
}

pub struct RangeServer {
    base_url: String,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl RangeServer {
    /// Starts a server in a background thread serving `routes` (path → route).
    /// The server runs until the process exits; unknown paths get 404.
    pub fn start(routes: Vec<(&str, Route)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let routes: Arc<HashMap<String, Route>> = Arc::new(
            routes
                .into_iter()
                .map(|(path, route)| (path.to_string(), route))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let log = Arc::clone(&log);
                thread::spawn(move || handle(stream, &routes, &log));
            }
        });
        Self {
            base_url: format!("http://127.0.0.1:{}/", port),
            requests,
        }
    }

    /// Base URL with a trailing slash, e.g. `http://127.0.0.1:12345/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>, log: &Mutex<Vec<Request>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(text) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let request = parse_request(text);
    log.lock().unwrap().push(request.clone());

    let Some(route) = routes.get(&request.path) else {
        respond(&mut stream, "404 Not Found", &[], &[]);
        return;
    };
    if let Some(code) = route.status {
        respond(&mut stream, &format!("{} Forced", code), &[], &[]);
        return;
    }

    let body = route.body.as_slice();
    let total = body.len() as u64;
    let accept = ("Accept-Ranges", "bytes".to_string());
    let is_head = request.method.eq_ignore_ascii_case("HEAD");

    if is_head {
        let mut headers = vec![("Content-Length", total.to_string())];
        if route.support_ranges {
            headers.push(accept);
        }
        respond_head(&mut stream, "200 OK", &headers);
        return;
    }
    if !request.method.eq_ignore_ascii_case("GET") {
        respond(&mut stream, "405 Method Not Allowed", &[], &[]);
        return;
    }
    if let Some(code) = route.get_status {
        respond(&mut stream, &format!("{} Forced", code), &[], &[]);
        return;
    }

    let range_start = request
        .range
        .as_deref()
        .filter(|_| route.support_ranges)
        .and_then(range_start)
        .map(|start| route.serve_from.unwrap_or(start));
    match range_start {
        Some(start) if start >= total => {
            let headers = [("Content-Range", format!("bytes */{}", total))];
            respond(&mut stream, "416 Range Not Satisfiable", &headers, &[]);
        }
        Some(start) => {
            let slice = &body[start as usize..];
            let headers = [
                (
                    "Content-Range",
                    format!("bytes {}-{}/{}", start, total - 1, total),
                ),
                accept,
            ];
            respond(&mut stream, "206 Partial Content", &headers, slice);
        }
        None => {
            let mut headers = Vec::new();
            if route.support_ranges {
                headers.push(accept);
            }
            respond(&mut stream, "200 OK", &headers, body);
        }
    }
}

fn respond(stream: &mut TcpStream, status: &str, headers: &[(&str, String)], body: &[u8]) {
    let mut all: Vec<(&str, String)> = headers.to_vec();
    all.push(("Content-Length", body.len().to_string()));
    respond_head(stream, status, &all);
    let _ = stream.write_all(body);
}

fn respond_head(stream: &mut TcpStream, status: &str, headers: &[(&str, String)]) {
    let mut head = format!("HTTP/1.1 {}\r\nConnection: close\r\n", status);
    for (name, value) in headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
}

fn parse_request(text: &str) -> Request {
    let mut lines = text.lines();
    let mut first = lines.next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("").to_string();
    let path = first.next().unwrap_or("").to_string();
    let mut range = None;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("range") {
                range = Some(value.trim().to_string());
            }
        }
    }
    Request {
        method,
        path,
        range,
    }
}

/// Start offset of an open-ended `bytes=X-` range.
fn range_start(value: &str) -> Option<u64> {
    let spec = value.trim().strip_prefix("bytes=")?;
    let (start, _) = spec.split_once('-')?;
    start.trim().parse().ok()
}
