//! # Envío de Archivos Estáticos
//! src/serve/mod.rs
//!
//! El paso que ejecuta un worker con cada item desencolado: infiere el
//! Content-Type, escribe la cabecera y copia exactamente `size_hint`
//! bytes del archivo a la conexión. El handle se suelta (y la conexión
//! se cierra) en todos los caminos de salida.

use crate::error::ServeError;
use crate::http::Response;
use crate::pool::Serve;
use crate::queue::RequestItem;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

/// Infiere el Content-Type a partir de la extensión
///
/// # Ejemplo
/// ```
/// use static_server::serve::content_type;
///
/// assert_eq!(content_type("./docs/index.html"), "text/html");
/// assert_eq!(content_type("./README"), "text/plain");
/// ```
pub fn content_type(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html",
        Some("gif") => "image/gif",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        _ => "text/plain",
    }
}

/// Serve de archivos estáticos sobre cualquier conexión que implemente `Write`
#[derive(Debug, Clone, Copy, Default)]
pub struct FileServer;

impl FileServer {
    pub fn new() -> Self {
        Self
    }

    /// Escribe cabecera + contenido de `path` en `out`.
    ///
    /// Retorna los bytes de archivo enviados (sin contar la cabecera).
    pub fn send_file<W: Write>(out: &mut W, path: &str, size: u64) -> Result<u64, ServeError> {
        let io_err = |source: io::Error| ServeError::Io {
            path: path.to_string(),
            source,
        };

        let file = File::open(path).map_err(io_err)?;

        let head = Response::file(content_type(path), size).head_bytes();
        out.write_all(&head).map_err(io_err)?;

        let mut reader = BufReader::new(file).take(size);
        let sent = io::copy(&mut reader, out).map_err(io_err)?;
        out.flush().map_err(io_err)?;

        if sent < size {
            return Err(ServeError::ShortRead {
                path: path.to_string(),
                expected: size,
                sent,
            });
        }
        Ok(sent)
    }
}

impl<W: Write> Serve<W> for FileServer {
    fn serve(&self, item: RequestItem<W>) -> Result<u64, ServeError> {
        let (mut conn, path, size) = item.into_parts();
        Self::send_file(&mut conn, &path, size)
        // `conn` se suelta acá: la conexión se cierra haya error o no
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("static_server_serve_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type("./a.html"), "text/html");
        assert_eq!(content_type("./a.HTML"), "text/html");
        assert_eq!(content_type("./img/cat.gif"), "image/gif");
        assert_eq!(content_type("./img/cat.jpg"), "image/jpeg");
        assert_eq!(content_type("./img/cat.jpeg"), "image/jpeg");
        assert_eq!(content_type("./img/cat.png"), "image/png");
        assert_eq!(content_type("./style.css"), "text/css");
        assert_eq!(content_type("./app.js"), "application/javascript");
        assert_eq!(content_type("./notes.txt"), "text/plain");
        assert_eq!(content_type("./Makefile"), "text/plain");
    }

    #[test]
    fn test_send_file() {
        let path = temp_file("hello.html", b"<h1>hola</h1>");
        let path = path.to_str().unwrap();

        let mut out = Vec::new();
        let sent = FileServer::send_file(&mut out, path, 13).unwrap();
        assert_eq!(sent, 13);

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("HTTP/1.0 200 OK\r\n"));
        assert!(text.contains("Content-Length: 13\r\n"));
        assert!(text.contains("Content-Type: text/html\r\n"));
        assert!(text.ends_with("\r\n\r\n<h1>hola</h1>"));
    }

    #[test]
    fn test_send_file_never_exceeds_size_hint() {
        let path = temp_file("grown.txt", b"0123456789");
        let mut out = Vec::new();
        let sent = FileServer::send_file(&mut out, path.to_str().unwrap(), 4).unwrap();
        assert_eq!(sent, 4);
        assert!(out.ends_with(b"\r\n\r\n0123"));
    }

    #[test]
    fn test_send_file_short_read() {
        let path = temp_file("shrunk.txt", b"abc");
        let mut out = Vec::new();
        let result = FileServer::send_file(&mut out, path.to_str().unwrap(), 10);
        assert!(matches!(
            result,
            Err(ServeError::ShortRead { expected: 10, sent: 3, .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut out = Vec::new();
        let result = FileServer::send_file(&mut out, "./definitely/not/here.txt", 1);
        assert!(matches!(result, Err(ServeError::Io { .. })));
        assert!(out.is_empty());
    }

    #[test]
    fn test_serve_trait_consumes_item() {
        let path = temp_file("item.txt", b"data");
        let item = RequestItem::new(Vec::new(), path.to_str().unwrap(), 4);
        assert_eq!(FileServer::new().serve(item).unwrap(), 4);
    }
}
