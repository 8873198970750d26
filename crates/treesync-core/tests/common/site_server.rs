//! Minimal HTTP/1.1 server with a fixed route table for integration tests.
//!
//! Answers GET only. Each path maps to a body, a redirect or a bare status;
//! unknown paths get 404. Every request path is recorded.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Route {
    Body(Vec<u8>),
    /// 302 with this `Location` (relative paths are fine) and an HTML body,
    /// like the "moved" page shorteners send.
    Redirect(String),
    Status(u16),
}

#[derive(Default)]
struct State {
    routes: HashMap<String, Route>,
    hits: Vec<String>,
}

pub struct SiteServer {
    base: String,
    state: Arc<Mutex<State>>,
}

impl SiteServer {
    /// Starts the server in a background thread; it runs until the process exits.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(Mutex::new(State::default()));
        let shared = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&shared);
                thread::spawn(move || handle(stream, &state));
            }
        });
        Self {
            base: format!("http://127.0.0.1:{}", port),
            state,
        }
    }

    /// Absolute URL for `path` (which starts with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn route(&self, path: &str, route: Route) {
        self.state
            .lock()
            .unwrap()
            .routes
            .insert(path.to_string(), route);
    }

    pub fn hits(&self) -> Vec<String> {
        self.state.lock().unwrap().hits.clone()
    }
}

fn handle(mut stream: TcpStream, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let mut first = request.lines().next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("");
    let path = first.next().unwrap_or("/").to_string();
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }

    let route = {
        let mut state = state.lock().unwrap();
        state.hits.push(path.clone());
        state.routes.get(&path).cloned()
    };
    let (status, extra, body) = match route {
        Some(Route::Body(body)) => ("200 OK".to_string(), String::new(), body),
        Some(Route::Redirect(location)) => (
            "302 Found".to_string(),
            format!("Location: {}\r\nContent-Type: text/html\r\n", location),
            moved_page(&location),
        ),
        Some(Route::Status(code)) => {
            (format!("{} Error", code), String::new(), b"error page".to_vec())
        }
        None => ("404 Not Found".to_string(), String::new(), b"not found".to_vec()),
    };
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n",
        status,
        body.len(),
        extra
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&body);
}

/// A 20 KiB "moved" page pointing at `location`.
fn moved_page(location: &str) -> Vec<u8> {
    let mut page = format!(
        "<html><head><title>Moved</title></head><body><a href=\"{}\">moved here</a>",
        location
    );
    while page.len() < 20 * 1024 {
        page.push_str("<p>This link has moved.</p>");
    }
    page.push_str("</body></html>");
    page.into_bytes()
}
