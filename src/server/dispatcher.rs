//! # Dispatcher
//! src/server/dispatcher.rs
//!
//! Corre en el thread que acepta conexiones. Por cada conexión:
//!
//! 1. Lee el request (request line + headers)
//! 2. Traduce la URI a un path dentro del directorio raíz
//! 3. Valida método, traversal, existencia y permisos
//! 4. Si todo está bien encola un `RequestItem`; si no, responde el error
//!    en el mismo thread sin tocar la cola

use crate::error::SubmitError;
use crate::http::{Method, ParseError, Request, Response, StatusCode};
use crate::metrics::MetricsCollector;
use crate::queue::{BoundedQueue, RequestItem};
use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Archivo servido cuando la URI termina en `/`
const INDEX_FILE: &str = "index.html";

/// Motivo por el cual un request no llega a la cola
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub status: StatusCode,
    pub cause: String,
    pub message: &'static str,
}

impl Rejection {
    fn new(status: StatusCode, cause: impl Into<String>, message: &'static str) -> Self {
        Self {
            status,
            cause: cause.into(),
            message,
        }
    }

    pub fn to_response(&self) -> Response {
        Response::error_page(self.status, &self.cause, self.message)
    }
}

/// Archivo validado listo para encolar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub path: String,
    pub size: u64,
}

/// Valida requests y los entrega a la cola
pub struct Dispatcher<H> {
    root: PathBuf,
    max_path_len: usize,
    queue: Arc<BoundedQueue<H>>,
    metrics: MetricsCollector,
}

impl<H> Dispatcher<H>
where
    H: Read + Write,
{
    pub fn new(
        root: impl Into<PathBuf>,
        max_path_len: usize,
        queue: Arc<BoundedQueue<H>>,
        metrics: MetricsCollector,
    ) -> Self {
        Self {
            root: root.into(),
            max_path_len,
            queue,
            metrics,
        }
    }

    /// Procesa una conexión aceptada.
    ///
    /// Solo bloquea si la cola está llena (backpressure hacia el accept).
    pub fn handle(&self, mut conn: H) {
        let request = {
            let reader = BufReader::new(&mut conn);
            Request::read_from(reader)
        };

        let resolved = match request {
            Ok(request) => {
                tracing::debug!(
                    method = request.method().as_str(),
                    uri = request.uri(),
                    version = request.version(),
                    "request"
                );
                self.resolve(&request)
            }
            Err(ParseError::EmptyRequest) => {
                tracing::debug!("peer closed without sending a request");
                return;
            }
            Err(ParseError::Io(e)) => {
                tracing::debug!(error = %e, "failed reading request");
                return;
            }
            Err(ParseError::UnsupportedMethod(method)) => Err(Rejection::new(
                StatusCode::NotImplemented,
                method,
                "server does not implement this method",
            )),
            Err(e) => Err(Rejection::new(
                StatusCode::BadRequest,
                e.to_string(),
                "server could not parse the request",
            )),
        };

        match resolved {
            Ok(Resolved { path, size }) => self.enqueue(conn, path, size),
            Err(rejection) => self.reject(conn, &rejection),
        }
    }

    fn enqueue(&self, conn: H, path: String, size: u64) {
        let Err(rejected) = self.queue.submit(RequestItem::new(conn, path, size)) else {
            return;
        };

        let rejection = match &rejected.error {
            SubmitError::Closed => Rejection::new(
                StatusCode::ServiceUnavailable,
                rejected.error.to_string(),
                "server is shutting down",
            ),
            // resolve() ya filtra los paths inválidos
            error => Rejection::new(
                StatusCode::InternalServerError,
                error.to_string(),
                "server could not queue this request",
            ),
        };
        self.reject(rejected.item.into_handle(), &rejection);
    }

    fn reject(&self, mut conn: H, rejection: &Rejection) {
        if rejection.status.is_server_error() {
            tracing::warn!(
                status = rejection.status.as_u16(),
                cause = %rejection.cause,
                "{}",
                rejection.message
            );
        } else {
            tracing::info!(
                status = rejection.status.as_u16(),
                cause = %rejection.cause,
                "{}",
                rejection.message
            );
        }
        self.metrics.record_rejected();

        let bytes = rejection.to_response().to_bytes();
        if let Err(e) = conn.write_all(&bytes).and_then(|_| conn.flush()) {
            tracing::debug!(error = %e, "failed writing error response");
        }
    }

    /// Valida el request y calcula el path y tamaño del archivo
    pub fn resolve(&self, request: &Request) -> Result<Resolved, Rejection> {
        if request.method() != Method::GET {
            return Err(Rejection::new(
                StatusCode::NotImplemented,
                request.method().as_str(),
                "server does not implement this method",
            ));
        }

        let uri = percent_decode(request.path());
        if !uri.starts_with('/') || has_parent_component(&uri) {
            return Err(Rejection::new(
                StatusCode::Forbidden,
                uri,
                "directory traversal attempt detected",
            ));
        }

        let mut relative = uri.trim_start_matches('/').to_string();
        if uri.ends_with('/') {
            relative.push_str(INDEX_FILE);
        }
        let path = self.root.join(&relative).to_string_lossy().into_owned();

        if path.len() > self.max_path_len {
            return Err(Rejection::new(
                StatusCode::BadRequest,
                format!("{} bytes", path.len()),
                "requested path is too long",
            ));
        }

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Rejection::new(
                    StatusCode::NotFound,
                    path,
                    "server could not find this file",
                ));
            }
            Err(_) => {
                return Err(Rejection::new(
                    StatusCode::Forbidden,
                    path,
                    "server could not read this file",
                ));
            }
        };

        if uri.contains("cgi") {
            return Err(Rejection::new(
                StatusCode::NotImplemented,
                path,
                "server does not serve dynamic content request",
            ));
        }

        if !metadata.is_file() || File::open(&path).is_err() {
            return Err(Rejection::new(
                StatusCode::Forbidden,
                path,
                "server could not read this file",
            ));
        }

        Ok(Resolved {
            path,
            size: metadata.len(),
        })
    }
}

fn has_parent_component(uri: &str) -> bool {
    Path::new(uri)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
}

/// Decodifica secuencias `%XX`; las inválidas se dejan tal cual
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            out.push(hex_value(bytes[i + 1]) << 4 | hex_value(bytes[i + 2]));
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit.to_ascii_uppercase() - b'A' + 10,
    }
}
