use crate::export::MATRIX_FILE_NAME;
use crate::server::api::{self, ApiError, AppState};

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    /// When set, the body is offered as a download under this file name.
    pub attachment_name: Option<&'static str>,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        let disposition = self
            .attachment_name
            .map(|name| format!("Content-Disposition: attachment; filename=\"{name}\"\r\n"))
            .unwrap_or_default();
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            disposition,
            self.body.len(),
            self.body
        )
    }
}

const ATTACHMENTS_PREFIX: &str = "/api/attachments/";

pub fn route_request(state: &AppState, method: &str, path: &str, body: &str) -> HttpResponse {
    let path = path.split('?').next().unwrap_or(path);
    match (method, path) {
        ("GET", "/") => HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "text/html; charset=utf-8",
            attachment_name: None,
            body: index_html(),
        },
        ("GET", "/api/health") => json_response(api::health_payload()),
        ("GET", "/api/categories") => json_response(api::categories_payload(state)),
        ("GET", "/api/vendors") => json_response(api::vendors_payload(state)),
        ("POST", "/api/score") => json_response(api::score_payload(state, body)),
        ("GET", "/api/calculator") => json_response(api::calculator_get_payload(state)),
        ("PUT", "/api/calculator") => json_response(api::calculator_put_payload(state, body)),
        ("GET", "/api/goals") => json_response(api::goals_get_payload(state)),
        ("PUT", "/api/goals") => json_response(api::goals_put_payload(state, body)),
        ("POST", "/api/goals/toggle") => json_response(api::goals_toggle_payload(state, body)),
        ("POST", "/api/goals/priority") => {
            json_response(api::goals_priority_payload(state, body))
        }
        ("POST", "/api/simulate") => json_response(api::simulate_payload(state, body)),
        ("GET", "/api/export/csv") => match api::export_csv_payload(state) {
            Ok(csv) => HttpResponse {
                status_code: 200,
                status_text: "OK",
                content_type: "text/csv; charset=utf-8",
                attachment_name: Some(MATRIX_FILE_NAME),
                body: csv,
            },
            Err(err) => api_error_response(err),
        },
        ("POST", "/api/advisor/analyze") => {
            json_response(api::advisor_analyze_payload(state, body))
        }
        ("POST", "/api/advisor/compare") => {
            json_response(api::advisor_compare_payload(state, body))
        }
        ("POST", "/api/advisor/insight") => {
            json_response(api::advisor_insight_payload(state, body))
        }
        ("POST", "/api/chat") => json_response(api::chat_payload(state, body)),
        ("GET", path) if path.starts_with(ATTACHMENTS_PREFIX) => json_response(
            api::attachments_get_payload(state, &path[ATTACHMENTS_PREFIX.len()..]),
        ),
        ("PUT", path) if path.starts_with(ATTACHMENTS_PREFIX) => json_response(
            api::attachments_put_payload(state, &path[ATTACHMENTS_PREFIX.len()..], body),
        ),
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn json_response(result: Result<String, ApiError>) -> HttpResponse {
    match result {
        Ok(payload) => HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            attachment_name: None,
            body: payload,
        },
        Err(err) => api_error_response(err),
    }
}

fn api_error_response(err: ApiError) -> HttpResponse {
    match err {
        ApiError::Parse(err) => {
            error_response(400, "Bad Request", &format!("Invalid request body: {err}"))
        }
        ApiError::Validation(validation) => {
            validation_error_response(400, "Bad Request", validation)
        }
        ApiError::NotFound(message) => error_response(404, "Not Found", &message),
        other => {
            tracing::error!(error = %other, "request failed");
            error_response(500, "Internal Server Error", &other.to_string())
        }
    }
}

fn validation_error_response(
    status_code: u16,
    status_text: &'static str,
    payload: api::ValidationErrorResponse,
) -> HttpResponse {
    let fallback =
        "{\n  \"status\": \"error\",\n  \"message\": \"Validation failed\"\n}".to_string();

    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        attachment_name: None,
        body: serde_json::to_string_pretty(&payload).unwrap_or(fallback),
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        attachment_name: None,
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}

fn index_html() -> String {
    r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>RIA Desk Console</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 900px; margin: 24px auto; padding: 0 12px; }
    h1 { margin-bottom: 8px; }
    .card { border: 1px solid #ddd; border-radius: 8px; padding: 14px; margin: 14px 0; }
    label { display:block; margin: 8px 0 4px; font-weight: 600; }
    input, textarea { width: 100%; padding: 8px; box-sizing: border-box; }
    button { margin-top: 12px; padding: 8px 14px; }
    pre { background: #111; color: #aef2ae; padding: 12px; overflow: auto; border-radius: 6px; min-height: 180px; }
  </style>
</head>
<body>
  <h1>RIA Desk</h1>
  <p>Vendor scoring, goal projection and advisory endpoints.</p>

  <div class="card">
    <strong>Vendor matrix</strong>
    <label for="weights">Weights (JSON, category id to percent)</label>
    <textarea id="weights" rows="3">{"plan": 15, "crm": 15, "agg": 12, "rep": 10, "ui": 10, "int": 10, "work": 8, "bill": 5, "comp": 5, "onb": 5, "price": 5}</textarea>
    <div>
      <button id="score-btn">POST /api/score</button>
      <button id="analyze-btn">POST /api/advisor/analyze</button>
      <a href="/api/export/csv"><button type="button">Download CSV</button></a>
    </div>
  </div>

  <div class="card">
    <strong>Goal designer</strong>
    <div>
      <button id="goals-btn">GET /api/goals</button>
      <button id="simulate-btn">POST /api/simulate</button>
    </div>
  </div>

  <div class="card">
    <strong>Assistant</strong>
    <label for="message">Message</label>
    <input id="message" value="Which vendor is cheapest for a small firm?" />
    <div><button id="chat-btn">POST /api/chat</button></div>
  </div>

  <pre id="output">Ready.</pre>

  <script>
    const output = document.getElementById('output');
    const weightsEl = document.getElementById('weights');
    let history = [];

    function weights() {
      try { return JSON.parse(weightsEl.value); } catch (e) { return undefined; }
    }

    async function request(path, options) {
      output.textContent = 'Loading…';
      const response = await fetch(path, options);
      const text = await response.text();
      output.textContent = 'HTTP ' + response.status + '\n' + text;
      return response.ok ? JSON.parse(text) : null;
    }

    function post(path, payload) {
      return request(path, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(payload),
      });
    }

    document.getElementById('score-btn').addEventListener('click', () => post('/api/score', { weights: weights() }));
    document.getElementById('analyze-btn').addEventListener('click', () => post('/api/advisor/analyze', { weights: weights() }));
    document.getElementById('goals-btn').addEventListener('click', () => request('/api/goals', { method: 'GET' }));
    document.getElementById('simulate-btn').addEventListener('click', () => post('/api/simulate', {}));
    document.getElementById('chat-btn').addEventListener('click', async () => {
      const message = document.getElementById('message').value;
      const data = await post('/api/chat', { history, message, weights: weights() });
      if (data) history = data.history;
    });
  </script>
</body>
</html>
"#
    .to_string()
}
