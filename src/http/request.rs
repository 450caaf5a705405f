//! # Parsing de Requests HTTP/1.0
//! src/http/request.rs
//!
//! Lee la request line y descarta los headers hasta la línea vacía. El
//! servidor solo sirve archivos, así que no hace falta guardar headers
//! ni body.
//!
//! ```text
//! GET /docs/index.html HTTP/1.0\r\n
//! Host: localhost:8080\r\n
//! \r\n
//! ```

use crate::error::ParseError;
use std::io::{BufRead, Read};

/// Largo máximo de una línea del request (request line o header)
pub const MAX_LINE: usize = 8192;

/// Métodos HTTP reconocidos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    GET,
    HEAD,
    POST,
}

impl Method {
    /// Parsea un método HTTP (sin distinguir mayúsculas)
    fn parse(s: &str) -> Result<Self, ParseError> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "HEAD" => Ok(Method::HEAD),
            "POST" => Ok(Method::POST),
            _ => Err(ParseError::UnsupportedMethod(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
        }
    }
}

/// Request line parseada
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,

    /// URI tal como llegó (ej: "/index.html?x=1")
    uri: String,

    version: String,
}

impl Request {
    /// Lee un request completo: request line + headers hasta `\r\n\r\n`.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use static_server::http::Request;
    ///
    /// let raw: &[u8] = b"GET /index.html HTTP/1.0\r\nHost: x\r\n\r\n";
    /// let request = Request::read_from(raw).unwrap();
    /// assert_eq!(request.uri(), "/index.html");
    /// ```
    pub fn read_from<R: BufRead>(mut reader: R) -> Result<Self, ParseError> {
        let line = match read_line(&mut reader)? {
            Some(line) if !line.trim().is_empty() => line,
            _ => return Err(ParseError::EmptyRequest),
        };

        let request = Self::parse_request_line(&line)?;

        // Descartar headers hasta la línea vacía (o EOF)
        while let Some(header) = read_line(&mut reader)? {
            if header.trim().is_empty() {
                break;
            }
        }

        Ok(request)
    }

    /// Parsea la request line
    ///
    /// Formato: `GET /path HTTP/1.0`
    pub fn parse_request_line(line: &str) -> Result<Self, ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        // Debe tener exactamente 3 partes: METHOD URI VERSION
        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        let method = Method::parse(parts[0])?;

        let version = parts[2].to_string();
        if version != "HTTP/1.0" && version != "HTTP/1.1" {
            return Err(ParseError::InvalidHttpVersion(version));
        }

        Ok(Request {
            method,
            uri: parts[1].to_string(),
            version,
        })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// URI sin la query string
    pub fn path(&self) -> &str {
        match self.uri.find('?') {
            Some(idx) => &self.uri[..idx],
            None => &self.uri,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Lee una línea terminada en `\n` de a lo sumo `MAX_LINE` bytes.
///
/// Retorna `None` en EOF.
fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>, ParseError> {
    let mut buf = Vec::new();
    let read = reader
        .by_ref()
        .take(MAX_LINE as u64 + 1)
        .read_until(b'\n', &mut buf)?;

    if read == 0 {
        return Ok(None);
    }
    if buf.len() > MAX_LINE {
        return Err(ParseError::LineTooLong);
    }

    String::from_utf8(buf)
        .map(Some)
        .map_err(|_| ParseError::InvalidRequestLine)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &[u8]) -> Result<Request, ParseError> {
        Request::read_from(raw)
    }

    #[test]
    fn test_parse_simple_get() {
        let request = parse(b"GET / HTTP/1.0\r\n\r\n").unwrap();
        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.uri(), "/");
        assert_eq!(request.version(), "HTTP/1.0");
    }

    #[test]
    fn test_skips_headers() {
        let raw = b"GET /a.html HTTP/1.1\r\nHost: localhost:8080\r\nUser-Agent: test\r\n\r\n";
        let request = parse(raw).unwrap();
        assert_eq!(request.uri(), "/a.html");
    }

    #[test]
    fn test_lowercase_method() {
        let request = parse(b"get /x HTTP/1.0\r\n\r\n").unwrap();
        assert_eq!(request.method(), Method::GET);
    }

    #[test]
    fn test_path_strips_query() {
        let request = parse(b"GET /dir/page.html?x=1&y=2 HTTP/1.0\r\n\r\n").unwrap();
        assert_eq!(request.path(), "/dir/page.html");
        assert_eq!(request.uri(), "/dir/page.html?x=1&y=2");
    }

    #[test]
    fn test_unknown_method() {
        let result = parse(b"DELETE / HTTP/1.0\r\n\r\n");
        assert!(matches!(result, Err(ParseError::UnsupportedMethod(m)) if m == "DELETE"));
    }

    #[test]
    fn test_invalid_version() {
        let result = parse(b"GET / HTTP/2.0\r\n\r\n");
        assert!(matches!(result, Err(ParseError::InvalidHttpVersion(_))));
    }

    #[test]
    fn test_empty_request() {
        assert!(matches!(parse(b""), Err(ParseError::EmptyRequest)));
        assert!(matches!(parse(b"\r\n"), Err(ParseError::EmptyRequest)));
    }

    #[test]
    fn test_invalid_request_line() {
        assert!(matches!(parse(b"GET\r\n\r\n"), Err(ParseError::InvalidRequestLine)));
    }

    #[test]
    fn test_line_too_long() {
        let mut raw = b"GET /".to_vec();
        raw.extend(std::iter::repeat(b'a').take(MAX_LINE + 10));
        raw.extend_from_slice(b" HTTP/1.0\r\n\r\n");
        assert!(matches!(parse(&raw), Err(ParseError::LineTooLong)));
    }

    #[test]
    fn test_missing_blank_line_is_tolerated() {
        let request = parse(b"GET /x HTTP/1.0\r\nHost: a\r\n").unwrap();
        assert_eq!(request.uri(), "/x");
    }
}
