//! Loopback HTTP server serving canned registry responses

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::config::RegistryConfig;

#[derive(Debug, Clone)]
enum Length {
    Exact,
    Claimed(u64),
    Omitted,
}

#[derive(Debug, Clone)]
pub(crate) struct Route {
    status: u16,
    body: Vec<u8>,
    length: Length,
}

impl Route {
    pub(crate) fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            length: Length::Exact,
        }
    }

    pub(crate) fn json(value: serde_json::Value) -> Self {
        Self::ok(value.to_string())
    }

    pub(crate) fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
            length: Length::Exact,
        }
    }

    /// Send this `Content-Length` regardless of the real body size
    pub(crate) fn claim_length(mut self, length: u64) -> Self {
        self.length = Length::Claimed(length);
        self
    }

    /// No `Content-Length`; the body ends when the connection closes
    pub(crate) fn without_length(mut self) -> Self {
        self.length = Length::Omitted;
        self
    }
}

/// Serves `routes` keyed by request path (query string excluded). Unknown
/// paths get a 404.
pub(crate) struct TestRegistry {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestRegistry {
    pub(crate) async fn start(routes: Vec<(&str, Route)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes: Arc<HashMap<String, Route>> = Arc::new(
            routes
                .into_iter()
                .map(|(path, route)| (path.to_string(), route))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = requests.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = routes.clone();
                let seen = seen.clone();
                tokio::spawn(async move { serve(stream, &routes, &seen).await });
            }
        });

        Self { addr, requests }
    }

    pub(crate) fn url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub(crate) fn config(&self) -> RegistryConfig {
        RegistryConfig {
            url: self.url(),
            ..Default::default()
        }
    }

    /// Request targets in arrival order, query strings included
    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn serve(mut stream: TcpStream, routes: &HashMap<String, Route>, seen: &Mutex<Vec<String>>) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let request = String::from_utf8_lossy(&request);
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    seen.lock().unwrap().push(target.clone());

    let path = target.split('?').next().unwrap_or("/");
    let route = routes
        .get(path)
        .cloned()
        .unwrap_or_else(|| Route::status(404));

    let mut head = format!("HTTP/1.1 {} Canned\r\nConnection: close\r\n", route.status);
    match route.length {
        Length::Exact => head.push_str(&format!("Content-Length: {}\r\n", route.body.len())),
        Length::Claimed(n) => head.push_str(&format!("Content-Length: {}\r\n", n)),
        Length::Omitted => {}
    }
    head.push_str("\r\n");

    let _ = stream.write_all(head.as_bytes()).await;
    let _ = stream.write_all(&route.body).await;
    let _ = stream.shutdown().await;
}
