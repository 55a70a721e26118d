//! In-process HTTP stub standing in for the token and reporting endpoints.

#![allow(dead_code)]

use analytics_reporter::ReportingConfig;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const TEST_KEY: &str = include_str!("../fixtures/test_key.pem");

pub const TOKEN_BODY: &str =
    r#"{"access_token":"ya29.test-token","expires_in":3599,"token_type":"Bearer"}"#;

pub const PIZZA_REPORT: &str = r#"{
    "reports": [{
        "columnHeader": {
            "dimensions": ["ga:eventLabel"],
            "metricHeader": {
                "metricHeaderEntries": [{"name": "ga:totalEvents", "type": "INTEGER"}]
            }
        },
        "data": {
            "rows": [{"dimensions": ["Pizza"], "metrics": [{"values": ["7"]}]}],
            "totals": [{"values": ["7"]}],
            "rowCount": 1
        }
    }]
}"#;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct StubRoute {
    pub path: String,
    pub status: u16,
    pub body: String,
}

impl StubRoute {
    pub fn new(path: &str, status: u16, body: &str) -> Self {
        Self {
            path: path.to_string(),
            status,
            body: body.to_string(),
        }
    }
}

pub struct StubServer {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: tokio::task::JoinHandle<()>,
}

impl StubServer {
    pub async fn start(routes: Vec<StubRoute>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        let handle = tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let Some(request) = read_request(&mut socket).await else {
                    continue;
                };

                let (status, body) = routes
                    .iter()
                    .find(|route| route.path == request.path)
                    .map(|route| (route.status, route.body.clone()))
                    .unwrap_or((404, r#"{"error":{"code":404,"message":"Not Found"}}"#.to_string()));

                recorded.lock().unwrap().push(request);

                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason(status),
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        _ => "Internal Server Error",
    }
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);

    while buffer.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
    }

    let body_end = buffer.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buffer[header_end..body_end]).to_string();

    Some(RecordedRequest {
        method,
        path,
        headers,
        body,
    })
}

/// Write a service account key whose token endpoint is `token_uri`
pub fn write_key_file(dir: &Path, token_uri: &str) -> std::path::PathBuf {
    let key = serde_json::json!({
        "type": "service_account",
        "project_id": "myserviceapp-123456",
        "private_key_id": "123456789abc",
        "private_key": TEST_KEY,
        "client_email": "reporter@myserviceapp-123456.iam.gserviceaccount.com",
        "client_id": "1234567890",
        "auth_uri": "https://accounts.google.com/o/oauth2/auth",
        "token_uri": token_uri,
    });

    let path = dir.join("myserviceapp-123456-123456789abc.json");
    std::fs::write(&path, key.to_string()).unwrap();
    path
}

/// Config pointing both endpoints at `server`
pub fn stub_config(server: &StubServer, dir: &Path) -> ReportingConfig {
    ReportingConfig {
        key_file_path: write_key_file(dir, &format!("{}/token", server.url())),
        endpoint: server.url(),
        request_timeout_secs: Some(10),
        ..Default::default()
    }
}
