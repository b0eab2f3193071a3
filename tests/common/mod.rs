//! Shared utilities for integration testing.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use locale_gateway::config::schema::{GatewayConfig, PathnameConfig};

/// Start a mock upstream renderer that echoes the forwarded request:
/// the response body is `path=<path> locale=<x-locale> route=<x-canonical-route>`.
pub async fn start_echo_upstream(addr: SocketAddr) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = Vec::new();
                        let mut chunk = [0u8; 1024];
                        loop {
                            match socket.read(&mut chunk).await {
                                Ok(0) => break,
                                Ok(n) => {
                                    buf.extend_from_slice(&chunk[..n]);
                                    if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                                        break;
                                    }
                                }
                                Err(_) => return,
                            }
                        }

                        let head = String::from_utf8_lossy(&buf);
                        let path = head
                            .lines()
                            .next()
                            .and_then(|line| line.split_whitespace().nth(1))
                            .unwrap_or("?")
                            .to_string();
                        let header = |name: &str| {
                            head.lines()
                                .find_map(|line| {
                                    let (key, value) = line.split_once(':')?;
                                    key.trim()
                                        .eq_ignore_ascii_case(name)
                                        .then(|| value.trim().to_string())
                                })
                                .unwrap_or_else(|| "-".to_string())
                        };

                        let body = format!(
                            "path={} locale={} route={}",
                            path,
                            header("x-locale"),
                            header("x-canonical-route")
                        );
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Gateway configuration used across the integration tests: locales
/// ru/en/de (default ru), a root route, a localized `/pathnames` route,
/// and a parameterized `/news/:id` route.
#[allow(dead_code)]
pub fn sample_config(bind: SocketAddr, upstream: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = bind.to_string();
    config.upstream.address = upstream.to_string();
    config.locales.supported = vec!["ru".into(), "en".into(), "de".into()];
    config.locales.default = "ru".into();
    config.pathnames = vec![
        PathnameConfig {
            canonical: "/".into(),
            pattern: None,
            locales: None,
        },
        PathnameConfig {
            canonical: "/pathnames".into(),
            pattern: None,
            locales: Some(BTreeMap::from([
                ("ru".to_string(), "/pathnames".to_string()),
                ("en".to_string(), "/pathnames".to_string()),
                ("de".to_string(), "/pfadnamen".to_string()),
            ])),
        },
        PathnameConfig {
            canonical: "/news/:id".into(),
            pattern: None,
            locales: Some(BTreeMap::from([
                ("ru".to_string(), "/news/:id".to_string()),
                ("en".to_string(), "/news/:id".to_string()),
                ("de".to_string(), "/nachrichten/:id".to_string()),
            ])),
        },
    ];
    config
}
