use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::advisor::{Advisor, ChatMessage, ChatSession, TextGenerator};
use crate::config::AppConfig;
use crate::data::catalog::{Catalog, Category, Narrative};
use crate::data::goals::{priority_label, Goal, GoalBoard, MAX_PRIORITY, MIN_PRIORITY};
use crate::export::{export_matrix_csv, CsvError};
use crate::planning::{plan_insight, simulate_goals, PlanAssumptions, PlanInsight, SimulationOutcome};
use crate::scoring::{find_result, score_catalog, VendorResult, WeightState};
use crate::storage::{
    vendor_images_key, AttachmentSlot, JsonStore, StorageError, CALCULATOR_KEY, GOALS_KEY,
};

/// Longest accepted chat message, in characters.
const MAX_CHAT_MESSAGE_CHARS: usize = 4_000;

/// Everything a request handler needs. Built once at startup.
pub struct AppState {
    pub config: AppConfig,
    pub catalog: Catalog,
    pub store: JsonStore,
    pub generator: Box<dyn TextGenerator>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        catalog: Catalog,
        generator: Box<dyn TextGenerator>,
    ) -> Self {
        let store = JsonStore::new(config.data_dir.clone());
        Self {
            config,
            catalog,
            store,
            generator,
        }
    }

    fn advisor(&self) -> Advisor<'_> {
        Advisor::new(self.generator.as_ref())
    }

    fn assumptions(&self) -> &PlanAssumptions {
        &self.config.planning
    }

    fn saved_calculator(&self) -> CalculatorState {
        self.store.get_or_default(CALCULATOR_KEY)
    }

    /// Saved calculator weights, else catalog defaults.
    pub fn current_weights(&self) -> WeightState {
        let saved = self.saved_calculator().weights;
        if saved.is_empty() {
            WeightState::from_defaults(&self.catalog.categories)
        } else {
            saved
        }
    }

    /// Request weights if given, else [AppState::current_weights].
    fn resolve_weights(&self, requested: Option<WeightState>) -> Result<WeightState, ApiError> {
        if let Some(weights) = requested {
            validate_weights(&weights, &self.catalog.categories)?;
            return Ok(weights);
        }
        Ok(self.current_weights())
    }

    fn goal_board(&self) -> GoalBoard {
        self.store.get_or_default(GOALS_KEY)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationErrorResponse {
    fn new(errors: Vec<ValidationIssue>) -> Self {
        Self {
            status: "error",
            message: "Validation failed",
            errors,
        }
    }

    fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![ValidationIssue {
            field: field.into(),
            messages: vec![message.into()],
        }])
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Parse(serde_json::Error),
    #[error("invalid request")]
    Validation(ValidationErrorResponse),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Csv(#[from] CsvError),
    #[error("{0}")]
    Serialize(serde_json::Error),
}

fn parse_body<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "{}" } else { body };
    serde_json::from_str(body).map_err(ApiError::Parse)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(ApiError::Serialize)
}

pub fn validate_weights(weights: &WeightState, categories: &[Category]) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    for key in weights.invalid_keys() {
        errors.push(ValidationIssue {
            field: format!("weights.{key}"),
            messages: vec!["must be a non-negative number".to_string()],
        });
    }
    for key in weights.unknown_keys(categories) {
        errors.push(ValidationIssue {
            field: format!("weights.{key}"),
            messages: vec!["unknown category".to_string()],
        });
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(ValidationErrorResponse::new(errors)))
    }
}

pub fn health_payload() -> Result<String, ApiError> {
    to_json(&serde_json::json!({
        "status": "ok",
        "service": "riadesk-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn categories_payload(state: &AppState) -> Result<String, ApiError> {
    to_json(&serde_json::json!({ "categories": state.catalog.categories }))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorListItem<'a> {
    pub name: &'a str,
    pub scores: &'a [u8],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<&'a Narrative>,
}

pub fn vendors_payload(state: &AppState) -> Result<String, ApiError> {
    let list: Vec<VendorListItem<'_>> = state
        .catalog
        .vendors
        .iter()
        .map(|v| VendorListItem {
            name: &v.name,
            scores: &v.scores,
            narrative: state.catalog.narrative(&v.name),
        })
        .collect();
    to_json(&serde_json::json!({ "vendors": list }))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreRequest {
    pub weights: Option<WeightState>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResponse {
    pub status: &'static str,
    pub weights: WeightState,
    pub results: Vec<VendorResult>,
}

pub fn score_payload(state: &AppState, body: &str) -> Result<String, ApiError> {
    let request: ScoreRequest = parse_body(body)?;
    let weights = state.resolve_weights(request.weights)?;
    let results = score_catalog(&state.catalog, &weights);
    to_json(&ScoreResponse {
        status: "ok",
        weights,
        results,
    })
}

/// Saved calculator view state. Scores are not part of it; they are derived on read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorState {
    #[serde(default)]
    pub weights: WeightState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

pub fn calculator_get_payload(state: &AppState) -> Result<String, ApiError> {
    to_json(&state.saved_calculator())
}

pub fn calculator_put_payload(state: &AppState, body: &str) -> Result<String, ApiError> {
    let mut incoming: CalculatorState = parse_body(body)?;
    validate_weights(&incoming.weights, &state.catalog.categories)?;
    if let Some(name) = incoming.selected_vendor.clone() {
        let vendor = state.catalog.find_vendor(&name).ok_or_else(|| {
            ApiError::Validation(ValidationErrorResponse::single(
                "selectedVendor",
                format!("unknown vendor '{name}'"),
            ))
        })?;
        incoming.selected_vendor = Some(vendor.name.clone());
    }
    incoming.saved_at = Some(Utc::now());
    state.store.put(CALCULATOR_KEY, &incoming)?;
    to_json(&incoming)
}

pub fn goals_get_payload(state: &AppState) -> Result<String, ApiError> {
    to_json(&state.goal_board())
}

fn validate_goals(goals: &[Goal]) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    for (index, goal) in goals.iter().enumerate() {
        let mut messages = Vec::new();
        if goal.id.trim().is_empty() {
            messages.push("id must not be empty".to_string());
        } else if goals[..index].iter().any(|g| g.id == goal.id) {
            messages.push(format!("duplicate id '{}'", goal.id));
        }
        if !goal.cost.is_finite() || goal.cost < 0.0 {
            messages.push("cost must be a non-negative number".to_string());
        }
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&goal.priority) {
            messages.push(format!(
                "priority must be between {MIN_PRIORITY} and {MAX_PRIORITY}"
            ));
        }
        if !messages.is_empty() {
            errors.push(ValidationIssue {
                field: format!("goals[{index}]"),
                messages,
            });
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(ValidationErrorResponse::new(errors)))
    }
}

pub fn goals_put_payload(state: &AppState, body: &str) -> Result<String, ApiError> {
    let board: GoalBoard = serde_json::from_str(body).map_err(ApiError::Parse)?;
    validate_goals(&board.goals)?;
    state.store.put(GOALS_KEY, &board)?;
    to_json(&board)
}

#[derive(Debug, Deserialize)]
struct GoalToggleRequest {
    id: String,
}

pub fn goals_toggle_payload(state: &AppState, body: &str) -> Result<String, ApiError> {
    let request: GoalToggleRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let mut board = state.goal_board();
    let active = board
        .toggle(&request.id)
        .ok_or_else(|| ApiError::NotFound(format!("Goal '{}' not found", request.id)))?;
    state.store.put(GOALS_KEY, &board)?;
    to_json(&serde_json::json!({ "id": request.id, "active": active, "goals": board.goals }))
}

#[derive(Debug, Deserialize)]
struct GoalPriorityRequest {
    id: String,
    priority: i64,
}

pub fn goals_priority_payload(state: &AppState, body: &str) -> Result<String, ApiError> {
    let request: GoalPriorityRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let mut board = state.goal_board();
    let priority = board
        .set_priority(&request.id, request.priority)
        .ok_or_else(|| ApiError::NotFound(format!("Goal '{}' not found", request.id)))?;
    state.store.put(GOALS_KEY, &board)?;
    to_json(&serde_json::json!({
        "id": request.id,
        "priority": priority,
        "label": priority_label(priority),
        "goals": board.goals
    }))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimulateRequest {
    /// Full goal list to project; defaults to the saved board.
    pub goals: Option<Vec<Goal>>,
    /// Ids to treat as active, replacing each goal's own flag.
    pub active: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateResponse<'a> {
    pub status: &'static str,
    pub projection_status: &'static str,
    pub assumptions: &'a PlanAssumptions,
    pub outcome: SimulationOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<PlanInsight>,
}

pub fn simulate_payload(state: &AppState, body: &str) -> Result<String, ApiError> {
    let request: SimulateRequest = parse_body(body)?;
    let mut board = match request.goals {
        Some(goals) => {
            validate_goals(&goals)?;
            GoalBoard { goals }
        }
        None => state.goal_board(),
    };
    if let Some(active) = &request.active {
        let errors: Vec<ValidationIssue> = active
            .iter()
            .enumerate()
            .filter(|(_, id)| !board.contains(id))
            .map(|(i, id)| ValidationIssue {
                field: format!("active[{i}]"),
                messages: vec![format!("unknown goal '{id}'")],
            })
            .collect();
        if !errors.is_empty() {
            return Err(ApiError::Validation(ValidationErrorResponse::new(errors)));
        }
        board = board.with_active_ids(active);
    }
    let outcome = simulate_goals(&board.goals, state.assumptions());
    let insight = plan_insight(&board.goals, &outcome);
    to_json(&SimulateResponse {
        status: "ok",
        projection_status: outcome.status_label(),
        assumptions: state.assumptions(),
        outcome,
        insight,
    })
}

pub fn export_csv_payload(state: &AppState) -> Result<String, ApiError> {
    Ok(export_matrix_csv(&state.catalog)?)
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvisorResponse {
    pub status: &'static str,
    pub vendor: String,
    pub text: String,
}

fn lookup_result<'a>(
    results: &'a [VendorResult],
    field: &str,
    name: &str,
) -> Result<&'a VendorResult, ApiError> {
    find_result(results, name).ok_or_else(|| {
        ApiError::Validation(ValidationErrorResponse::single(
            field,
            format!("unknown vendor '{name}'"),
        ))
    })
}

fn top_result(results: &[VendorResult]) -> Result<&VendorResult, ApiError> {
    results
        .first()
        .ok_or_else(|| ApiError::NotFound("No vendors in catalog".to_string()))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    pub weights: Option<WeightState>,
    /// Vendor to justify; defaults to the top-ranked one.
    pub vendor: Option<String>,
}

pub fn advisor_analyze_payload(state: &AppState, body: &str) -> Result<String, ApiError> {
    let request: AnalyzeRequest = parse_body(body)?;
    let weights = state.resolve_weights(request.weights)?;
    let results = score_catalog(&state.catalog, &weights);
    let winner = match &request.vendor {
        Some(name) => lookup_result(&results, "vendor", name)?,
        None => top_result(&results)?,
    };
    let text = state.advisor().analyze_selection(winner, &weights, &results);
    to_json(&AdvisorResponse {
        status: "ok",
        vendor: winner.name.clone(),
        text,
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompareRequest {
    pub target: String,
    pub weights: Option<WeightState>,
}

pub fn advisor_compare_payload(state: &AppState, body: &str) -> Result<String, ApiError> {
    let request: CompareRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let weights = state.resolve_weights(request.weights)?;
    let results = score_catalog(&state.catalog, &weights);
    let winner = top_result(&results)?;
    let target = lookup_result(&results, "target", &request.target)?;
    let text = state.advisor().compare_vendors(target, winner, &weights);
    to_json(&AdvisorResponse {
        status: "ok",
        vendor: target.name.clone(),
        text,
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsightRequest {
    pub vendor: String,
    pub weights: Option<WeightState>,
}

pub fn advisor_insight_payload(state: &AppState, body: &str) -> Result<String, ApiError> {
    let request: InsightRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let weights = state.resolve_weights(request.weights)?;
    let results = score_catalog(&state.catalog, &weights);
    let vendor = lookup_result(&results, "vendor", &request.vendor)?;
    let text = state.advisor().vendor_insight(vendor, &weights);
    to_json(&AdvisorResponse {
        status: "ok",
        vendor: vendor.name.clone(),
        text,
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    pub message: String,
    pub weights: Option<WeightState>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub status: &'static str,
    pub reply: String,
    pub history: Vec<ChatMessage>,
}

pub fn chat_payload(state: &AppState, body: &str) -> Result<String, ApiError> {
    let request: ChatRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let message = request.message.trim();
    if message.is_empty() {
        return Err(ApiError::Validation(ValidationErrorResponse::single(
            "message",
            "must not be empty",
        )));
    }
    if message.chars().count() > MAX_CHAT_MESSAGE_CHARS {
        return Err(ApiError::Validation(ValidationErrorResponse::single(
            "message",
            format!("must be at most {MAX_CHAT_MESSAGE_CHARS} characters"),
        )));
    }
    let weights = state.resolve_weights(request.weights)?;
    let results = score_catalog(&state.catalog, &weights);

    let mut session = ChatSession::new();
    if !request.history.is_empty() {
        session.messages = request.history;
    }
    let reply = session
        .send(&state.advisor(), message, &weights, &results)
        .map(|m| m.text.clone())
        .unwrap_or_default();
    to_json(&ChatResponse {
        status: "ok",
        reply,
        history: session.messages,
    })
}

/// Split `<vendor>/<slot>` from an attachments path tail.
fn attachment_target<'a>(
    state: &'a AppState,
    tail: &str,
) -> Result<(&'a str, AttachmentSlot), ApiError> {
    let mut parts = tail.trim_matches('/').rsplitn(2, '/');
    let slot_raw = parts.next().unwrap_or_default();
    let vendor_raw = percent_decode(parts.next().unwrap_or_default());
    let slot = AttachmentSlot::parse(slot_raw)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown attachment slot '{slot_raw}'")))?;
    let vendor = state
        .catalog
        .find_vendor(&vendor_raw)
        .ok_or_else(|| ApiError::NotFound(format!("Vendor '{vendor_raw}' not found")))?;
    Ok((vendor.name.as_str(), slot))
}

pub fn attachments_get_payload(state: &AppState, tail: &str) -> Result<String, ApiError> {
    let (vendor, slot) = attachment_target(state, tail)?;
    let images: Vec<String> = state.store.get_or_default(&vendor_images_key(vendor, slot));
    to_json(&serde_json::json!({ "vendor": vendor, "slot": slot.as_str(), "images": images }))
}

pub fn attachments_put_payload(
    state: &AppState,
    tail: &str,
    body: &str,
) -> Result<String, ApiError> {
    let (vendor, slot) = attachment_target(state, tail)?;
    let images: Vec<String> = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let errors: Vec<ValidationIssue> = images
        .iter()
        .enumerate()
        .filter(|(_, img)| !img.starts_with("data:image/"))
        .map(|(i, _)| ValidationIssue {
            field: format!("images[{i}]"),
            messages: vec!["must be a data:image/... URL".to_string()],
        })
        .collect();
    if !errors.is_empty() {
        return Err(ApiError::Validation(ValidationErrorResponse::new(errors)));
    }
    let key = vendor_images_key(vendor, slot);
    if images.is_empty() {
        state.store.remove(&key)?;
    } else {
        state.store.put(&key, &images)?;
    }
    to_json(&serde_json::json!({ "vendor": vendor, "slot": slot.as_str(), "images": images }))
}

/// Minimal `%XX` decoding for path segments. `+` is literal here.
fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(b) => {
                        out.push(b);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
