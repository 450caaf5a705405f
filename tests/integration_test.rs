//! Tests de integración para el servidor de archivos
//! tests/integration_test.rs
//!
//! Cada test levanta su propio servidor en `127.0.0.1:0` sobre un
//! directorio temporal y habla HTTP/1.0 con él por TCP.

use static_server::config::Config;
use static_server::queue::SchedPolicy;
use static_server::server::Server;
use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Crea el directorio raíz con algunos archivos
fn doc_root(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!(
        "static_server_it_{}_{}",
        name,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&root);
    fs::create_dir_all(root.join("img")).unwrap();
    fs::write(root.join("index.html"), "<h1>bienvenido</h1>").unwrap();
    fs::write(root.join("notes.txt"), "linea 1\nlinea 2\n").unwrap();
    fs::write(root.join("img/pixel.gif"), b"GIF89a").unwrap();
    root
}

/// Levanta el servidor en un thread y retorna su dirección
fn start_server(root: &PathBuf, threads: usize, buffers: usize, policy: SchedPolicy) -> SocketAddr {
    let config = Config {
        port: 0,
        root_dir: root.to_string_lossy().into_owned(),
        threads,
        buffers,
        policy,
        seed: Some(1),
        ..Config::default()
    };

    let server = Server::bind(&config).expect("bind");
    let addr = server.local_addr().unwrap();
    thread::spawn(move || server.run());
    addr
}

/// Helper: envía un request y retorna la respuesta completa (bytes)
fn send_raw(addr: SocketAddr, raw: &str) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).expect("connect");
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream.write_all(raw.as_bytes()).unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).expect("read response");
    response
}

fn get(addr: SocketAddr, path: &str) -> String {
    let raw = format!("GET {} HTTP/1.0\r\nHost: localhost\r\n\r\n", path);
    String::from_utf8_lossy(&send_raw(addr, &raw)).into_owned()
}

/// Helper: extrae el body de una response HTTP
fn extract_body(response: &str) -> &str {
    match response.find("\r\n\r\n") {
        Some(pos) => &response[pos + 4..],
        None => "",
    }
}

#[test]
fn test_serves_index_for_root() {
    let root = doc_root("index");
    let addr = start_server(&root, 2, 4, SchedPolicy::Fifo);

    let response = get(addr, "/");
    assert!(response.starts_with("HTTP/1.0 200 OK\r\n"), "got: {}", response);
    assert!(response.contains("Content-Type: text/html\r\n"));
    assert!(response.contains("Content-Length: 19\r\n"));
    assert_eq!(extract_body(&response), "<h1>bienvenido</h1>");
}

#[test]
fn test_serves_binary_file() {
    let root = doc_root("binary");
    let addr = start_server(&root, 1, 1, SchedPolicy::Sff);

    let response = send_raw(addr, "GET /img/pixel.gif HTTP/1.0\r\n\r\n");
    let text = String::from_utf8_lossy(&response);
    assert!(text.contains("Content-Type: image/gif\r\n"));
    assert!(response.ends_with(b"\r\n\r\nGIF89a"));
}

#[test]
fn test_not_found() {
    let root = doc_root("notfound");
    let addr = start_server(&root, 1, 1, SchedPolicy::Fifo);

    let response = get(addr, "/nonexistent.html");
    assert!(response.starts_with("HTTP/1.0 404 Not Found\r\n"));
    assert!(extract_body(&response).contains("server could not find this file"));
}

#[test]
fn test_traversal_forbidden() {
    let root = doc_root("traversal");
    let addr = start_server(&root, 1, 1, SchedPolicy::Fifo);

    let response = get(addr, "/../../etc/passwd");
    assert!(response.starts_with("HTTP/1.0 403 Forbidden\r\n"));
}

#[test]
fn test_post_not_implemented() {
    let root = doc_root("post");
    let addr = start_server(&root, 1, 1, SchedPolicy::Fifo);

    let response = String::from_utf8_lossy(&send_raw(addr, "POST /index.html HTTP/1.0\r\n\r\n")).into_owned();
    assert!(response.starts_with("HTTP/1.0 501 Not Implemented\r\n"));
}

#[test]
fn test_many_concurrent_clients() {
    let root = doc_root("concurrent");
    let addr = start_server(&root, 4, 2, SchedPolicy::Random);

    let clients: Vec<_> = (0..24)
        .map(|i| {
            thread::spawn(move || {
                let path = if i % 2 == 0 { "/index.html" } else { "/notes.txt" };
                (path, get(addr, path))
            })
        })
        .collect();

    for client in clients {
        let (path, response) = client.join().unwrap();
        assert!(response.starts_with("HTTP/1.0 200 OK\r\n"), "{} -> {}", path, response);
        let expected = if path == "/index.html" {
            "<h1>bienvenido</h1>"
        } else {
            "linea 1\nlinea 2\n"
        };
        assert_eq!(extract_body(&response), expected);
    }
}

#[test]
fn test_multiple_requests_sequentially() {
    let root = doc_root("sequential");
    let addr = start_server(&root, 2, 1, SchedPolicy::Sff);

    for i in 0..5 {
        let response = get(addr, "/notes.txt");
        assert!(response.contains("200 OK"), "Request {} failed", i);
        assert!(response.contains("Content-Type: text/plain\r\n"));
    }
}

#[test]
fn test_invalid_root_rejected() {
    let config = Config {
        port: 0,
        root_dir: "./no/such/root".to_string(),
        ..Config::default()
    };
    assert!(Server::bind(&config).is_err());
}
