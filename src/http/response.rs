//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! Arma la cabecera (status line + headers) y, para páginas de error, el
//! cuerpo HTML completo. Los archivos estáticos no pasan por acá: el
//! worker escribe `head_bytes()` y después copia el archivo al socket.
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Server: static_server\r\n
//! Content-Length: 1234\r\n
//! Content-Type: text/html\r\n
//! \r\n
//! <bytes del archivo>
//! ```

use super::StatusCode;

/// Valor del header `Server`
pub const SERVER_NAME: &str = "static_server";

/// Una respuesta HTTP/1.0
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,

    /// Headers en orden de inserción, sin duplicados
    headers: Vec<(String, String)>,

    body: Vec<u8>,
}

impl Response {
    /// Crea una respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Agrega un header; si ya existe se sobrescribe.
    ///
    /// # Ejemplo
    /// ```
    /// use static_server::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::Ok)
    ///     .with_header("Content-Type", "text/plain");
    /// assert_eq!(response.header("Content-Type"), Some("text/plain"));
    /// ```
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    pub fn add_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            Some((_, v)) => *v = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Establece el body y su `Content-Length`
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.as_bytes().to_vec();
        let len = self.body.len().to_string();
        self.add_header("Content-Length", &len);
        self
    }

    /// Cabecera de un archivo estático que se enviará por streaming
    pub fn file(content_type: &str, content_length: u64) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Server", SERVER_NAME)
            .with_header("Content-Length", &content_length.to_string())
            .with_header("Content-Type", content_type)
    }

    /// Página de error HTML
    ///
    /// `cause` es lo que provocó el error (el método, el path, ...) y
    /// `long_msg` la explicación para el usuario.
    ///
    /// # Ejemplo
    /// ```
    /// use static_server::http::{Response, StatusCode};
    ///
    /// let response = Response::error_page(
    ///     StatusCode::NotFound,
    ///     "./missing.html",
    ///     "server could not find this file",
    /// );
    /// assert_eq!(response.header("Content-Type"), Some("text/html"));
    /// ```
    pub fn error_page(status: StatusCode, cause: &str, long_msg: &str) -> Self {
        let body = format!(
            "<!doctype html>\r\n\
             <head>\r\n  <title>{server} Error</title>\r\n</head>\r\n\
             <body>\r\n  <h2>{code}: {short}</h2>\r\n  <p>{long}: {cause}</p>\r\n</body>\r\n\
             </html>\r\n",
            server = SERVER_NAME,
            code = status.as_u16(),
            short = status.reason_phrase(),
            long = long_msg,
            cause = escape_html(cause),
        );
        Self::new(status)
            .with_header("Server", SERVER_NAME)
            .with_header("Content-Type", "text/html")
            .with_body(&body)
    }

    /// Status line + headers + línea vacía, sin body
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut result = format!("HTTP/1.0 {}\r\n", self.status).into_bytes();
        for (name, value) in &self.headers {
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }
        result.extend_from_slice(b"\r\n");
        result
    }

    /// Respuesta completa lista para el socket
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = self.head_bytes();
        result.extend_from_slice(&self.body);
        result
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_overwrite() {
        let response = Response::new(StatusCode::Ok)
            .with_header("Content-Type", "text/plain")
            .with_header("content-type", "text/html");

        assert_eq!(response.header("Content-Type"), Some("text/html"));
        assert_eq!(response.headers.len(), 1);
    }

    #[test]
    fn test_file_head() {
        let response = Response::file("image/gif", 42);
        let text = String::from_utf8(response.head_bytes()).unwrap();

        assert!(text.starts_with("HTTP/1.0 200 OK\r\n"));
        assert!(text.contains("Server: static_server\r\n"));
        assert!(text.contains("Content-Length: 42\r\n"));
        assert!(text.contains("Content-Type: image/gif\r\n"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_error_page() {
        let response = Response::error_page(
            StatusCode::Forbidden,
            "./../etc/passwd",
            "directory traversal attempt detected",
        );
        let text = String::from_utf8(response.to_bytes()).unwrap();

        assert!(text.starts_with("HTTP/1.0 403 Forbidden\r\n"));
        assert!(text.contains("<h2>403: Forbidden</h2>"));
        assert!(text.contains("directory traversal attempt detected: ./../etc/passwd"));

        let expected_len = response.body().len().to_string();
        assert_eq!(response.header("Content-Length"), Some(expected_len.as_str()));
    }

    #[test]
    fn test_error_page_escapes_cause() {
        let response = Response::error_page(StatusCode::NotFound, "<script>", "nope");
        let body = String::from_utf8(response.body().to_vec()).unwrap();
        assert!(body.contains("&lt;script&gt;"));
        assert!(!body.contains("<script>"));
    }
}
