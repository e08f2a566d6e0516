//! End-to-end tests against a real listener on an ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crumb::prelude::*;
use http::StatusCode;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

struct Running {
    addr: SocketAddr,
    shutdown: ShutdownSignal,
    handle: JoinHandle<Result<(), ServerError>>,
}

impl Running {
    async fn stop(self) {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server should stop")
            .expect("server task should not panic")
            .expect("server should exit cleanly");
    }
}

async fn start(mut app: App, options: ListenOptions) -> Running {
    let options = options
        .with_hostname("127.0.0.1")
        .with_port(0)
        .with_shutdown_timeout(Duration::from_millis(200));
    let bound = app.bind(options).await.expect("bind");
    assert!(app.routes().is_empty());

    let addr = bound.local_addr();
    let shutdown = ShutdownSignal::new();
    let handle = tokio::spawn(bound.serve(shutdown.clone()));
    Running {
        addr,
        shutdown,
        handle,
    }
}

async fn exchange(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();
    raw
}

fn post(path: &str, content_type: &str, body: &str) -> String {
    format!(
        "POST {path} HTTP/1.1\r\nHost: test\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn get(path: &str) -> String {
    format!("GET {path} HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n")
}

fn status_line(raw: &str) -> &str {
    raw.lines().next().unwrap_or_default()
}

fn body(raw: &str) -> &str {
    raw.split_once("\r\n\r\n").map_or("", |(_, body)| body)
}

fn products() -> App {
    let mut app = App::new();
    app.create_route(
        RouteOptions::new(HttpMethod::Post, "/products", |req: RouteRequest, res: RouteResponse| async move {
            let product = req.body().await?;
            res.send(json!({"created": product}));
            anyhow::Ok(())
        })
        .schema(json!({"price": 100})),
    );
    app.get("/products/:id", sync_handler(|req: &RouteRequest, res: &RouteResponse| {
        res.send(format!("product {}", req.param("id").unwrap_or("?")));
        Ok(())
    }));
    app
}

fn same_price_type() -> ListenOptions {
    ListenOptions::default()
        .with_schema_validator(|data: &Value, schema: &Value| {
            data["price"].is_number() == schema["price"].is_number()
        })
}

#[tokio::test]
async fn test_schema_round_trip_over_tcp() {
    let server = start(products(), same_price_type()).await;

    let raw = exchange(server.addr, &post("/products", "application/json", r#"{"price":"100"}"#)).await;
    assert_eq!(status_line(&raw), "HTTP/1.1 400 Bad Request");
    assert_eq!(body(&raw), "Request does not match schema");

    let raw = exchange(server.addr, &post("/products", "application/json; charset=utf-8", r#"{"price":100}"#)).await;
    assert_eq!(status_line(&raw), "HTTP/1.1 200 OK");
    let created: Value = serde_json::from_str(body(&raw)).unwrap();
    assert_eq!(created, json!({"created": {"price": 100}}));

    let raw = exchange(server.addr, &post("/products", "image/png", "png")).await;
    assert_eq!(status_line(&raw), "HTTP/1.1 415 Unsupported Media Type");

    server.stop().await;
}

#[tokio::test]
async fn test_path_params_and_host_errors() {
    let server = start(products(), ListenOptions::default()).await;

    let raw = exchange(server.addr, &get("/products/42")).await;
    assert_eq!(body(&raw), "product 42");

    let raw = exchange(server.addr, &get("/nowhere")).await;
    assert_eq!(status_line(&raw), "HTTP/1.1 404 Not Found");

    let raw = exchange(server.addr, &get("/products")).await;
    assert_eq!(status_line(&raw), "HTTP/1.1 405 Method Not Allowed");
    assert!(raw.to_ascii_lowercase().contains("\r\nallow: post\r\n"));

    server.stop().await;
}

#[tokio::test]
async fn test_hooks_and_custom_status_text() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let (first, second, third) = (Arc::clone(&order), Arc::clone(&order), Arc::clone(&order));

    let mut app = App::new();
    app.create_route(
        RouteOptions::new(HttpMethod::Delete, "/items/{id}", sync_handler(move |_: &RouteRequest, res: &RouteResponse| {
            third.lock().push("handler");
            res.send_with("", SendOptions::status(StatusCode::ACCEPTED).with_status_text("Queued"));
            Ok(())
        }))
        .on_request(sync_handler(move |_: &RouteRequest, res: &RouteResponse| {
            first.lock().push("on_request");
            res.set_header("X-Trace", "1");
            Ok(())
        }))
        .pre_handler(sync_handler(move |_: &RouteRequest, _: &RouteResponse| {
            second.lock().push("pre_handler");
            Ok(())
        })),
    );
    let server = start(app, ListenOptions::default()).await;

    let raw = exchange(server.addr, "DELETE /items/9 HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n").await;
    assert_eq!(status_line(&raw), "HTTP/1.1 202 Queued");
    assert!(raw.to_ascii_lowercase().contains("\r\nx-trace: 1\r\n"));
    assert_eq!(*order.lock(), vec!["on_request", "pre_handler", "handler"]);

    server.stop().await;
}

#[tokio::test]
async fn test_keep_alive_requests_share_a_connection() {
    let server = start(products(), ListenOptions::default()).await;

    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    let pipelined = "GET /products/1 HTTP/1.1\r\nHost: test\r\n\r\nGET /products/2 HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n";
    stream.write_all(pipelined.as_bytes()).await.unwrap();

    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();
    assert_eq!(raw.matches("HTTP/1.1 200 OK").count(), 2);
    assert!(raw.contains("product 1"));
    assert!(raw.ends_with("product 2"));

    server.stop().await;
}

#[tokio::test]
async fn test_shutdown_with_idle_connection_open() {
    let server = start(products(), ListenOptions::default()).await;
    let _idle = TcpStream::connect(server.addr).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    server.stop().await;
}
