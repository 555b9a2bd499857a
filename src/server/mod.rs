//! Static file server for the browser build of the editor.
//!
//! Serves files below a fixed root, one connection at a time on the calling
//! thread. Paths are joined onto the root as given; there is no traversal
//! protection, range support or caching, so bind it to loopback.

mod mime;

pub use mime::{DEFAULT_CONTENT_TYPE, content_type};

use std::fmt::Write as _;
use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const INDEX_FILE: &str = "index.html";
pub const NOT_FOUND_BODY: &str = "<h1>404 - 文件未找到</h1>";

const READ_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_HEADER_LINES: usize = 100;

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to accept connection: {0}")]
    Accept(#[source] io::Error),
    #[error("failed to read listener address: {0}")]
    LocalAddr(#[source] io::Error),
}

/// A complete HTTP response, body included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    /// `None` sends no `Content-Type` header.
    pub content_type: Option<&'static str>,
    pub body: Vec<u8>,
}

impl Response {
    fn ok(content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type),
            body,
        }
    }

    fn not_found() -> Self {
        Self {
            status: 404,
            content_type: Some("text/html"),
            body: NOT_FOUND_BODY.as_bytes().to_vec(),
        }
    }

    fn server_error(err: &io::Error) -> Self {
        Self {
            status: 500,
            content_type: None,
            body: format!("服务器错误: {:?} ..\n", err.kind()).into_bytes(),
        }
    }

    fn bad_request() -> Self {
        Self {
            status: 400,
            content_type: None,
            body: b"Bad Request\n".to_vec(),
        }
    }

    pub const fn reason(&self) -> &'static str {
        match self.status {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            _ => "Internal Server Error",
        }
    }

    /// Serialize status line, headers and body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {} {}\r\n", self.status, self.reason());
        if let Some(content_type) = self.content_type {
            let _ = write!(head, "Content-Type: {content_type}\r\n");
        }
        let _ = write!(head, "Content-Length: {}\r\n", self.body.len());
        head.push_str("Connection: close\r\n\r\n");
        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }
}

/// Map a request target onto a path below `root`.
///
/// The query string and fragment are dropped and `/` becomes the index file.
pub fn resolve(root: &Path, target: &str) -> PathBuf {
    let path = target.split(['?', '#']).next().unwrap_or_default();
    let relative = path.trim_start_matches('/');
    if relative.is_empty() {
        root.join(INDEX_FILE)
    } else {
        root.join(relative)
    }
}

/// Build the response for `target`, reading the whole file into memory.
pub fn handle_request(root: &Path, target: &str) -> Response {
    let path = resolve(root, target);
    match fs::read(&path) {
        Ok(body) => Response::ok(content_type(&path), body),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Response::not_found(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read file");
            Response::server_error(&err)
        }
    }
}

pub struct Server {
    listener: TcpListener,
    root: PathBuf,
}

impl Server {
    /// Bind to `host:port`. Port 0 picks a free port.
    ///
    /// # Errors
    ///
    /// Returns [`ServeError::Bind`] if the address cannot be bound.
    pub fn bind(host: &str, port: u16, root: impl Into<PathBuf>) -> Result<Self, ServeError> {
        let addr = format!("{host}:{port}");
        let listener = TcpListener::bind(&addr).map_err(|source| ServeError::Bind {
            addr: addr.clone(),
            source,
        })?;
        let root = root.into();
        info!(%addr, root = %root.display(), "server listening");
        Ok(Self { listener, root })
    }

    /// # Errors
    ///
    /// Returns [`ServeError::LocalAddr`] if the socket address is unavailable.
    pub fn local_addr(&self) -> Result<SocketAddr, ServeError> {
        self.listener.local_addr().map_err(ServeError::LocalAddr)
    }

    /// Serve connections until accepting one fails.
    ///
    /// # Errors
    ///
    /// Returns [`ServeError::Accept`] when the listener stops accepting.
    pub fn serve_forever(&self) -> Result<(), ServeError> {
        loop {
            self.accept_one()?;
        }
    }

    /// Accept and answer a single connection.
    ///
    /// I/O failures on the connection itself are logged and swallowed.
    ///
    /// # Errors
    ///
    /// Returns [`ServeError::Accept`] if no connection could be accepted.
    pub fn accept_one(&self) -> Result<(), ServeError> {
        let (stream, peer) = self.listener.accept().map_err(ServeError::Accept)?;
        if let Err(err) = self.handle_connection(stream) {
            warn!(%peer, error = %err, "connection failed");
        }
        Ok(())
    }

    fn handle_connection(&self, mut stream: TcpStream) -> io::Result<()> {
        let started = Instant::now();
        stream.set_read_timeout(Some(READ_TIMEOUT))?;
        let request_line = read_request_head(&stream)?;

        let Some((method, target)) = parse_request_line(&request_line) else {
            debug!(line = %request_line.trim_end(), "malformed request");
            stream.write_all(&Response::bad_request().to_bytes())?;
            return stream.flush();
        };

        let response = handle_request(&self.root, target);
        info!(
            method,
            target,
            status = response.status,
            bytes = response.body.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "request"
        );
        stream.write_all(&response.to_bytes())?;
        stream.flush()
    }
}

/// Read the request line and skip the headers that follow it.
fn read_request_head(stream: &TcpStream) -> io::Result<String> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    let mut header = String::new();
    for _ in 0..MAX_HEADER_LINES {
        header.clear();
        if reader.read_line(&mut header)? == 0 || header.trim_end().is_empty() {
            break;
        }
    }
    Ok(request_line)
}

fn parse_request_line(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split_whitespace();
    let method = parts.next()?;
    let target = parts.next()?;
    parts.next()?.starts_with("HTTP/").then_some((method, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::thread;
    use tempfile::tempdir;

    fn site() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
        fs::write(dir.path().join("styles.css"), "body {}").unwrap();
        fs::create_dir(dir.path().join("assets")).unwrap();
        dir
    }

    #[test]
    fn test_root_resolves_to_index() {
        let root = Path::new("/srv/site");
        assert_eq!(resolve(root, "/"), root.join("index.html"));
        assert_eq!(resolve(root, "/?v=2"), root.join("index.html"));
        assert_eq!(resolve(root, "/css/a.css?v=2"), root.join("css/a.css"));
    }

    #[test]
    fn test_serves_file_with_content_type() {
        let dir = site();
        let response = handle_request(dir.path(), "/styles.css");
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, Some("text/css"));
        assert_eq!(response.body, b"body {}");
    }

    #[test]
    fn test_missing_file_is_chinese_not_found() {
        let dir = site();
        let response = handle_request(dir.path(), "/nope.html");
        assert_eq!(response.status, 404);
        assert_eq!(response.content_type, Some("text/html"));
        assert_eq!(response.body, NOT_FOUND_BODY.as_bytes());
    }

    #[test]
    fn test_unreadable_path_is_server_error() {
        let dir = site();
        let response = handle_request(dir.path(), "/assets");
        assert_eq!(response.status, 500);
        assert_eq!(response.content_type, None);
        let body = String::from_utf8(response.body).unwrap();
        assert!(body.starts_with("服务器错误: "), "{body}");
        assert!(body.ends_with(" ..\n"), "{body}");
    }

    #[test]
    fn test_response_bytes_carry_length_and_close() {
        let bytes = Response::ok("text/css", b"abc".to_vec()).to_bytes();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Type: text/css\r\n"));
        assert!(text.contains("Content-Length: 3\r\n"));
        assert!(text.ends_with("Connection: close\r\n\r\nabc"));
    }

    #[test]
    fn test_parse_request_line() {
        assert_eq!(
            parse_request_line("GET /a.css HTTP/1.1\r\n"),
            Some(("GET", "/a.css"))
        );
        assert_eq!(parse_request_line("GET /a.css\r\n"), None);
        assert_eq!(parse_request_line("\r\n"), None);
    }

    #[test]
    fn test_bind_failure_names_address() {
        let taken = Server::bind("127.0.0.1", 0, ".").unwrap();
        let port = taken.local_addr().unwrap().port();
        let err = Server::bind("127.0.0.1", port, ".").err().unwrap();
        assert!(matches!(err, ServeError::Bind { .. }));
        assert!(err.to_string().contains(&format!("127.0.0.1:{port}")));
    }

    #[test]
    fn test_serves_over_socket() {
        let dir = site();
        let server = Server::bind("127.0.0.1", 0, dir.path()).unwrap();
        let addr = server.local_addr().unwrap();

        let client = thread::spawn(move || {
            let mut stream = TcpStream::connect(addr).unwrap();
            stream
                .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n")
                .unwrap();
            let mut reply = String::new();
            stream.read_to_string(&mut reply).unwrap();
            reply
        });

        server.accept_one().unwrap();
        let reply = client.join().unwrap();
        assert!(reply.starts_with("HTTP/1.1 200 OK"), "{reply}");
        assert!(reply.contains("Content-Type: text/html"));
        assert!(reply.ends_with("<h1>home</h1>"));
    }
}
