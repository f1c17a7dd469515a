#![forbid(unsafe_code)]

//! Blocking single-threaded JSON API. Every request is its own render pass
//! with its own store connection.

use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::render::{explain_request, render_request};
use crate::{planned_json, request_json};
use cv_core::{NavRequest, Page, sidebar};
use cv_storage::SqliteStore;
use serde_json::{Value, json};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::time::Duration;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info, warn};

const MAX_HEADER_BYTES: usize = 8192;
const MAX_PARAM_BYTES: usize = 256;

pub fn serve(config: &DashboardConfig) -> Result<(), DashboardError> {
    let listener = TcpListener::bind(config.listen.as_str())?;
    info!(listen = %listener.local_addr()?, "dashboard listening");
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                if let Err(err) = handle_connection(stream, config) {
                    debug!(error = %err, "connection dropped");
                }
            }
            Err(err) => warn!(error = %err, "accept failed"),
        }
    }
    Ok(())
}

fn handle_connection(mut stream: TcpStream, config: &DashboardConfig) -> std::io::Result<()> {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(request) = read_request(&stream)? else {
        return Ok(());
    };
    let response = respond(&request.method, &request.target, config);
    debug!(
        method = request.method.as_str(),
        target = request.target.as_str(),
        status = response.status,
        "request"
    );
    write_response(&mut stream, &response, request.method == "HEAD")
}

struct HttpRequest {
    method: String,
    target: String,
}

#[derive(Debug, PartialEq)]
pub(crate) struct Response {
    pub status: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl Response {
    fn json(status: &'static str, value: &Value) -> Self {
        Self {
            status,
            content_type: "application/json; charset=utf-8",
            body: value.to_string(),
        }
    }

    fn error(status: &'static str, code: &str, message: &str) -> Self {
        Self::json(
            status,
            &json!({
                "error": {
                    "code": code,
                    "message": message,
                }
            }),
        )
    }

    fn from_error(err: &DashboardError) -> Self {
        Self::error(err.http_status(), err.code(), &err.to_string())
    }
}

pub(crate) fn respond(method: &str, target: &str, config: &DashboardConfig) -> Response {
    if method != "GET" && method != "HEAD" {
        return Response::error(
            "405 Method Not Allowed",
            "METHOD_NOT_ALLOWED",
            "only GET and HEAD are supported",
        );
    }

    let result = match normalize_path(target).as_str() {
        "/api/health" => health(config),
        "/api/pages" => serde_json::to_value(sidebar()).map_err(DashboardError::from),
        "/api/page" => nav_request(target).and_then(|request| {
            let view = render_request(config, &request)?;
            Ok(serde_json::to_value(view)?)
        }),
        "/api/plan" => nav_request(target).and_then(|request| {
            let planned = explain_request(config, &request)?;
            Ok(json!({
                "request": request_json(&request),
                "queries": planned.iter().map(planned_json).collect::<Vec<_>>(),
            }))
        }),
        _ => {
            return Response::error("404 Not Found", "NOT_FOUND", "no such endpoint");
        }
    };

    match result {
        Ok(value) => Response::json("200 OK", &value),
        Err(err) => {
            warn!(code = err.code(), error = %err, "request failed");
            Response::from_error(&err)
        }
    }
}

fn health(config: &DashboardConfig) -> Result<Value, DashboardError> {
    let store = SqliteStore::open(config.database()?)?;
    let checked_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    Ok(json!({
        "status": "ok",
        "database": store.path().display().to_string(),
        "checked_at": checked_at,
    }))
}

/// `name` picks the page (the landing page when absent); the remaining
/// parameters are raw dropdown values.
fn nav_request(target: &str) -> Result<NavRequest, DashboardError> {
    let param = |key: &str| {
        extract_query_param_raw(target, key)
            .as_deref()
            .and_then(decode_query_value)
    };
    let page = match param("name") {
        Some(name) => Page::parse(&name)?,
        None => Page::default(),
    };
    Ok(NavRequest {
        page,
        district: param("district"),
        location: param("location"),
        question: param("question"),
    })
}

/// Reads the request head up to the blank line and keeps the request line.
/// Bodies are never read; every endpoint is a GET.
fn read_request(stream: &TcpStream) -> std::io::Result<Option<HttpRequest>> {
    let mut reader = BufReader::new(Read::take(stream, MAX_HEADER_BYTES as u64));
    let mut head = String::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 || line.trim_end().is_empty() {
            break;
        }
        head.push_str(&line);
    }
    Ok(parse_request_line(&head))
}

fn parse_request_line(head: &str) -> Option<HttpRequest> {
    let mut parts = head.lines().next()?.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next().unwrap_or("/").to_string();
    Some(HttpRequest { method, target })
}

fn normalize_path(raw: &str) -> String {
    let raw = raw.trim();
    let raw = raw.split('?').next().unwrap_or(raw).trim();
    if raw.is_empty() || raw.len() > MAX_PARAM_BYTES || raw.contains("..") || raw.contains('\\') {
        return "/".to_string();
    }
    raw.trim_end_matches('/').to_string()
}

fn extract_query_param_raw(raw: &str, key: &str) -> Option<String> {
    let query = raw.split_once('?')?.1;
    for pair in query.split('&') {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        if name.trim() != key {
            continue;
        }
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        return Some(value.to_string());
    }
    None
}

/// Percent-decoding with `+` as space. Oversized or malformed values decode
/// to nothing.
fn decode_query_value(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.len() > MAX_PARAM_BYTES * 3 {
        return None;
    }

    let hex = |b: u8| match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    };
    let bytes = value.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut idx = 0usize;
    while idx < bytes.len() {
        match bytes[idx] {
            b'+' => {
                out.push(b' ');
                idx += 1;
            }
            b'%' => {
                let hi = hex(*bytes.get(idx + 1)?)?;
                let lo = hex(*bytes.get(idx + 2)?)?;
                out.push((hi << 4) | lo);
                idx += 3;
            }
            byte => {
                out.push(byte);
                idx += 1;
            }
        }
    }
    String::from_utf8(out).ok()
}

fn write_response(
    mut out: impl Write,
    response: &Response,
    head_only: bool,
) -> std::io::Result<()> {
    write!(
        out,
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n\
         Cache-Control: no-store\r\nConnection: close\r\n\r\n",
        response.status,
        response.content_type,
        response.body.len(),
    )?;
    if !head_only {
        out.write_all(response.body.as_bytes())?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn missing_db_config() -> DashboardConfig {
        DashboardConfig::default().with_database(PathBuf::from("/nonexistent/crimes.sqlite"))
    }

    fn body(response: &Response) -> Value {
        serde_json::from_str(&response.body).expect("json body")
    }

    #[test]
    fn query_values_are_percent_decoded() {
        assert_eq!(
            decode_query_value("What+is%3F").as_deref(),
            Some("What is?")
        );
        assert_eq!(decode_query_value("ALLEY").as_deref(), Some("ALLEY"));
        assert_eq!(decode_query_value("%zz"), None);
        assert_eq!(decode_query_value("50%"), None);
        assert_eq!(decode_query_value("  "), None);
    }

    #[test]
    fn query_params_are_matched_by_exact_name() {
        let target = "/api/page?name=district&district=7&location=";
        assert_eq!(
            extract_query_param_raw(target, "district").as_deref(),
            Some("7")
        );
        assert_eq!(extract_query_param_raw(target, "location"), None);
        assert_eq!(extract_query_param_raw(target, "dist"), None);
        assert_eq!(extract_query_param_raw("/api/page", "name"), None);
    }

    #[test]
    fn paths_are_normalized() {
        assert_eq!(normalize_path("/api/page?name=faqs"), "/api/page");
        assert_eq!(normalize_path("/api/pages/"), "/api/pages");
        assert_eq!(normalize_path("/../etc/passwd"), "/");
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn request_line_is_parsed() {
        let request =
            parse_request_line("HEAD /api/health HTTP/1.1\r\nHost: x\r\n").expect("request");
        assert_eq!(request.method, "HEAD");
        assert_eq!(request.target, "/api/health");
        assert!(parse_request_line("").is_none());
    }

    #[test]
    fn head_responses_carry_length_but_no_body() {
        let response = Response::json("200 OK", &json!({ "status": "ok" }));
        let mut out = Vec::new();
        write_response(&mut out, &response, false).expect("write");
        let text = String::from_utf8(out).expect("utf-8");
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"), "{text}");
        assert!(text.contains("Content-Length: 15\r\n"), "{text}");
        assert!(text.ends_with("\r\n\r\n{\"status\":\"ok\"}"), "{text}");

        let mut out = Vec::new();
        write_response(&mut out, &response, true).expect("write");
        let text = String::from_utf8(out).expect("utf-8");
        assert!(text.contains("Content-Length: 15\r\n"), "{text}");
        assert!(text.ends_with("\r\n\r\n"), "{text}");
    }

    #[test]
    fn nav_request_reads_page_and_selectors() {
        let request =
            nav_request("/api/page?name=District+Crime+Breakdown&district=3&location=ALLEY")
                .expect("request");
        assert_eq!(request.page, Page::DistrictBreakdown);
        assert_eq!(request.district.as_deref(), Some("3"));
        assert_eq!(request.location.as_deref(), Some("ALLEY"));
        assert_eq!(nav_request("/api/page").expect("default").page, Page::Overview);
    }

    #[test]
    fn routes_map_to_status_codes() {
        let config = missing_db_config();

        assert_eq!(respond("POST", "/api/page", &config).status, "405 Method Not Allowed");
        assert_eq!(respond("GET", "/nope", &config).status, "404 Not Found");

        let pages = respond("GET", "/api/pages", &config);
        assert_eq!(pages.status, "200 OK");
        assert_eq!(body(&pages)["items"][0]["slug"], json!("overview"));

        let unknown = respond("GET", "/api/page?name=settings", &config);
        assert_eq!(unknown.status, "400 Bad Request");
        assert_eq!(body(&unknown)["error"]["code"], json!("UNKNOWN_PAGE"));
    }

    #[test]
    fn overview_renders_without_a_database() {
        let config = DashboardConfig::default();
        let response = respond("GET", "/api/page?name=overview", &config);
        assert_eq!(response.status, "200 OK");
        let value = body(&response);
        assert_eq!(value["title"], json!("Crime Overview"));
        assert_eq!(value["sections"][1]["charts"][0]["kind"], json!("map"));
    }

    #[test]
    fn unavailable_store_is_a_503() {
        let config = missing_db_config();
        for target in ["/api/page?name=insights", "/api/health", "/api/plan?name=faqs"] {
            let response = respond("GET", target, &config);
            assert_eq!(response.status, "503 Service Unavailable", "{target}");
            assert_eq!(
                body(&response)["error"]["code"],
                json!("STORE_UNAVAILABLE"),
                "{target}"
            );
        }

        let unconfigured = respond("HEAD", "/api/health", &DashboardConfig::default());
        assert_eq!(unconfigured.status, "503 Service Unavailable");
        assert_eq!(body(&unconfigured)["error"]["code"], json!("INVALID_CONFIG"));
    }
}
