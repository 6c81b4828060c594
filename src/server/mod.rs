use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};

use crate::advisor::{GeminiClient, TextGenerator, UnconfiguredGenerator};
use crate::config::AppConfig;
use crate::data::load_catalog;

pub mod api;
pub mod routes;

pub use api::AppState;

/// Request bodies above this size are rejected; attachment uploads are the largest legitimate case.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Build server state from configuration: load the catalog and pick a text generator.
pub fn state_from_config(config: AppConfig) -> AppState {
    let catalog = load_catalog(&config.catalog_path.to_string_lossy());
    let generator: Box<dyn TextGenerator> = match GeminiClient::from_config(&config.advisor) {
        Some(client) => Box::new(client),
        None => {
            tracing::warn!("no API key configured; advisor endpoints will return fallback text");
            Box::new(UnconfiguredGenerator)
        }
    };
    AppState::new(config, catalog, generator)
}

pub fn run_server(state: &AppState) -> std::io::Result<()> {
    let bind_addr = state.config.bind.as_str();
    let listener = TcpListener::bind(bind_addr)?;
    tracing::info!(
        addr = %bind_addr,
        data_dir = %state.store.root().display(),
        vendors = state.catalog.vendors.len(),
        "riadesk server listening"
    );

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(state, &mut stream) {
                    tracing::warn!(%err, "request error");
                }
            }
            Err(err) => tracing::warn!(%err, "connection failed"),
        }
    }

    Ok(())
}

fn handle_connection(state: &AppState, stream: &mut TcpStream) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line)? == 0 {
        return Ok(());
    }
    let mut request_parts = request_line.split_whitespace();
    let method = request_parts.next().unwrap_or("GET").to_string();
    let path = request_parts.next().unwrap_or("/").to_string();

    let mut content_length = 0_usize;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 {
            break;
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    let response = if content_length > MAX_BODY_BYTES {
        routes::HttpResponse {
            status_code: 413,
            status_text: "Payload Too Large",
            content_type: "application/json",
            attachment_name: None,
            body: "{\n  \"status\": \"error\",\n  \"message\": \"Request body too large\"\n}"
                .to_string(),
        }
    } else {
        let mut body = vec![0_u8; content_length];
        reader.read_exact(&mut body)?;
        let body = String::from_utf8_lossy(&body);
        let response = routes::route_request(state, &method, &path, &body);
        tracing::info!(%method, %path, status = response.status_code, "handled request");
        response
    };

    stream.write_all(response.to_http_string().as_bytes())?;
    stream.flush()?;
    Ok(())
}
