//! REST handlers. Responses use the `{status: "success" | "error", ...}`
//! envelope throughout.

use axum::{
    Json,
    extract::{Multipart, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use wagate_bridge::ConnectionStatus;
use wagate_session::{
    chat::ChatId,
    types::{ButtonSpec, ListSection, LocationPayload, MediaPayload},
};

use crate::{bulk, error::ApiError, qr, server::AppState};

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Reject session-proxy calls unless the session is fully connected.
async fn require_ready(state: &AppState) -> Result<(), ApiError> {
    let status = state.bridge.status().await;
    if status != ConnectionStatus::Ready {
        return Err(ApiError::NotReady(status));
    }
    Ok(())
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::BadRequest(format!("Missing \"{field}\" in request body")))
}

/// Coordinates arrive as JSON numbers or numeric strings.
fn parse_coord(value: &serde_json::Value, field: &str) -> Result<f64, ApiError> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ApiError::BadRequest(format!("Invalid \"{field}\"")))
}

// ── Public routes ────────────────────────────────────────────────────────────

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": state.version,
        "whatsapp": state.bridge.status().await,
    }))
}

/// Current pairing QR as PNG. Only meaningful while a scan is pending.
pub async fn qr_code(State(state): State<AppState>) -> Result<Response, ApiError> {
    let status = state.bridge.status().await;
    if status == ConnectionStatus::QrReceived {
        if let Some(code) = state.bridge.qr().await {
            let png = qr::render_png(&code)?;
            return Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response());
        }
    }
    if status.is_authenticated() {
        return Ok(Json(json!({
            "status": "success",
            "message": "Client is already authenticated and ready.",
        }))
        .into_response());
    }
    Err(ApiError::NotFound(format!(
        "QR code not currently available (status: {status})"
    )))
}

// ── Status ───────────────────────────────────────────────────────────────────

pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.bridge.status().await;
    let info = if status.is_authenticated() {
        state.bridge.client_info().await
    } else {
        None
    };
    // Single read so `configured` and `url` cannot disagree under a
    // concurrent remove.
    let webhook_url = state.bridge.webhook_url().await;
    Json(json!({
        "status": "success",
        "whatsapp": {
            "status": status,
            "since": state.bridge.status_since().await.to_rfc3339(),
            "info": info,
        },
        "webhook": {
            "configured": webhook_url.is_some(),
            "url": webhook_url,
        },
    }))
}

pub async fn client_info(State(state): State<AppState>) -> Result<Response, ApiError> {
    let status = state.bridge.status().await;
    if !status.is_authenticated() {
        return Err(ApiError::NotFound(format!(
            "Client info not available (status: {status})"
        )));
    }
    let info = state.session.client_info().await;
    Ok(Json(json!({ "status": "success", "info": info })).into_response())
}

// ── Sending ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendMessageRequest {
    number: Option<String>,
    message: Option<String>,
}

pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Response, ApiError> {
    require_ready(&state).await?;
    let number = required(req.number, "number")?;
    let message = required(req.message, "message")?;

    let chat = ChatId::normalize(&number);
    info!(chat = %chat, "sending message");
    let sent = state.session.send_text(&chat, &message).await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Message sent successfully",
        "response": sent,
    }))
    .into_response())
}

/// Multipart: a `file` part plus `number` and optional `caption` fields.
pub async fn send_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    require_ready(&state).await?;

    let mut number = None;
    let mut caption = None;
    let mut media = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("number") => {
                number = field.text().await.ok();
            },
            Some("caption") => {
                caption = field.text().await.ok();
            },
            Some("file") => {
                let mimetype = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let filename = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {e}")))?;
                media = Some(MediaPayload {
                    mimetype,
                    filename,
                    data: data.to_vec(),
                });
            },
            _ => {},
        }
    }

    let number = required(number, "number")?;
    let media = required(media, "file")?;

    let chat = ChatId::normalize(&number);
    info!(chat = %chat, bytes = media.data.len(), "sending media");
    let sent = state
        .session
        .send_media(&chat, media, caption.as_deref())
        .await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Media sent successfully",
        "response": sent,
    }))
    .into_response())
}

#[derive(Deserialize)]
pub struct SendLocationRequest {
    number: Option<String>,
    latitude: Option<serde_json::Value>,
    longitude: Option<serde_json::Value>,
    name: Option<String>,
    address: Option<String>,
}

pub async fn send_location(
    State(state): State<AppState>,
    Json(req): Json<SendLocationRequest>,
) -> Result<Response, ApiError> {
    require_ready(&state).await?;
    let number = required(req.number, "number")?;
    let latitude = parse_coord(&required(req.latitude, "latitude")?, "latitude")?;
    let longitude = parse_coord(&required(req.longitude, "longitude")?, "longitude")?;

    let chat = ChatId::normalize(&number);
    let location = LocationPayload {
        latitude,
        longitude,
        name: req.name,
        address: req.address,
    };
    let sent = state.session.send_location(&chat, location).await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Location sent successfully",
        "response": sent,
    }))
    .into_response())
}

#[derive(Deserialize)]
pub struct SendButtonsRequest {
    number: Option<String>,
    body: Option<String>,
    buttons: Option<Vec<ButtonSpec>>,
    title: Option<String>,
    footer: Option<String>,
}

pub async fn send_buttons(
    State(state): State<AppState>,
    Json(req): Json<SendButtonsRequest>,
) -> Result<Response, ApiError> {
    require_ready(&state).await?;
    let number = required(req.number, "number")?;
    let body = required(req.body, "body")?;
    let buttons = required(req.buttons, "buttons")?;
    if buttons.is_empty() {
        return Err(ApiError::BadRequest("\"buttons\" must not be empty".into()));
    }

    let chat = ChatId::normalize(&number);
    let sent = state
        .session
        .send_buttons(
            &chat,
            &body,
            &buttons,
            req.title.as_deref(),
            req.footer.as_deref(),
        )
        .await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Buttons sent successfully",
        "response": sent,
    }))
    .into_response())
}

#[derive(Deserialize)]
pub struct SendListRequest {
    number: Option<String>,
    body: Option<String>,
    button_text: Option<String>,
    sections: Option<Vec<ListSection>>,
    title: Option<String>,
    footer: Option<String>,
}

pub async fn send_list(
    State(state): State<AppState>,
    Json(req): Json<SendListRequest>,
) -> Result<Response, ApiError> {
    require_ready(&state).await?;
    let number = required(req.number, "number")?;
    let body = required(req.body, "body")?;
    let button_text = required(req.button_text, "button_text")?;
    let sections = required(req.sections, "sections")?;
    if sections.is_empty() {
        return Err(ApiError::BadRequest("\"sections\" must not be empty".into()));
    }

    let chat = ChatId::normalize(&number);
    let sent = state
        .session
        .send_list(
            &chat,
            &body,
            &button_text,
            &sections,
            req.title.as_deref(),
            req.footer.as_deref(),
        )
        .await?;
    Ok(Json(json!({
        "status": "success",
        "message": "List sent successfully",
        "response": sent,
    }))
    .into_response())
}

// ── Chats ────────────────────────────────────────────────────────────────────

pub async fn chats(State(state): State<AppState>) -> Result<Response, ApiError> {
    require_ready(&state).await?;
    let chats = state.session.chats().await?;
    Ok(Json(json!({
        "status": "success",
        "count": chats.len(),
        "chats": chats,
    }))
    .into_response())
}

// ── Bulk sending ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendBulkRequest {
    message: Option<String>,
    /// Explicit recipient list; falls back to the configured recipients file.
    numbers: Option<Vec<String>>,
}

pub async fn send_bulk(
    State(state): State<AppState>,
    Json(req): Json<SendBulkRequest>,
) -> Result<Response, ApiError> {
    require_ready(&state).await?;
    let message = required(req.message, "message")?;

    let recipients = match req.numbers {
        Some(numbers) if !numbers.is_empty() => numbers,
        _ => {
            let path = state.recipients_file.as_deref().ok_or_else(|| {
                ApiError::BadRequest(
                    "No \"numbers\" given and no recipients file configured".into(),
                )
            })?;
            bulk::load_recipients(path)?
        },
    };
    if recipients.is_empty() {
        return Err(ApiError::BadRequest("Recipient list is empty".into()));
    }

    let delays = *state.delays.read().await;
    info!(count = recipients.len(), "starting bulk send");
    let report = bulk::send_to_all(&state.session, &recipients, Some(&message), None, delays).await;

    Ok(Json(json!({
        "status": "success",
        "message": "Bulk send finished",
        "report": report,
    }))
    .into_response())
}

#[derive(Deserialize)]
pub struct DelaySettingsRequest {
    delay_min_ms: Option<u64>,
    delay_max_ms: Option<u64>,
}

pub async fn update_delays(
    State(state): State<AppState>,
    Json(req): Json<DelaySettingsRequest>,
) -> Result<Response, ApiError> {
    let delay_min_ms = required(req.delay_min_ms, "delay_min_ms")?;
    let delay_max_ms = required(req.delay_max_ms, "delay_max_ms")?;
    if delay_min_ms > delay_max_ms {
        return Err(ApiError::BadRequest(
            "\"delay_min_ms\" must not exceed \"delay_max_ms\"".into(),
        ));
    }

    {
        let mut delays = state.delays.write().await;
        delays.delay_min_ms = delay_min_ms;
        delays.delay_max_ms = delay_max_ms;
    }
    // Best-effort persistence; the in-memory settings are already live.
    // File I/O happens under a blocking lock, so keep it off the async
    // workers.
    let persisted = tokio::task::spawn_blocking(move || {
        wagate_config::update_config(|cfg| {
            cfg.bulk.delay_min_ms = delay_min_ms;
            cfg.bulk.delay_max_ms = delay_max_ms;
        })
    })
    .await
    .map_err(anyhow::Error::from)
    .and_then(|r| r);
    if let Err(e) = persisted {
        warn!(error = %e, "failed to persist delay settings");
    }

    Ok(Json(json!({
        "status": "success",
        "message": "Delay settings updated",
        "delay_min_ms": delay_min_ms,
        "delay_max_ms": delay_max_ms,
    }))
    .into_response())
}

// ── Webhook administration ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetWebhookRequest {
    url: Option<String>,
}

pub async fn set_webhook(
    State(state): State<AppState>,
    Json(req): Json<SetWebhookRequest>,
) -> Result<Response, ApiError> {
    let url = required(req.url, "url")?;
    state
        .bridge
        .set_webhook_url(&url)
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    info!(%url, "webhook URL updated");
    Ok(Json(json!({
        "status": "success",
        "message": "Webhook URL updated successfully.",
        "webhook_url": url,
    }))
    .into_response())
}

pub async fn remove_webhook(State(state): State<AppState>) -> Result<Response, ApiError> {
    let previous = state
        .bridge
        .clear_webhook_url()
        .await
        .ok_or_else(|| ApiError::NotFound("Webhook URL is not currently set.".into()))?;
    info!(url = %previous, "webhook URL removed");
    Ok(Json(json!({
        "status": "success",
        "message": "Webhook URL removed.",
    }))
    .into_response())
}

// ── Session management ───────────────────────────────────────────────────────

/// Log out and clear credentials; the next initialize needs a QR scan.
pub async fn logout(State(state): State<AppState>) -> Result<Response, ApiError> {
    info!("logging out session");
    state.session.logout().await?;
    state.bridge.set_status(ConnectionStatus::Disconnected).await;
    state.bridge.set_qr(None).await;
    Ok(Json(json!({
        "status": "success",
        "message": "Logged out successfully. Session data cleared.",
    }))
    .into_response())
}

/// Close the connection but keep session data for a faster reconnect.
pub async fn disconnect(State(state): State<AppState>) -> Result<Response, ApiError> {
    info!("destroying session connection");
    state.session.destroy().await?;
    state.bridge.set_status(ConnectionStatus::Disconnected).await;
    state.bridge.set_qr(None).await;
    Ok(Json(json!({
        "status": "success",
        "message": "Client connection closed. Session data preserved.",
    }))
    .into_response())
}

pub async fn reconnect(State(state): State<AppState>) -> Result<Response, ApiError> {
    let status = state.bridge.status().await;
    if matches!(
        status,
        ConnectionStatus::Ready | ConnectionStatus::Authenticated | ConnectionStatus::Initializing
    ) {
        return Err(ApiError::BadRequest(format!(
            "Client is already {status}. Use /disconnect first if needed."
        )));
    }

    info!("re-initializing session on request");
    state.bridge.set_status(ConnectionStatus::Initializing).await;
    state.bridge.set_qr(None).await;
    if let Err(e) = state.session.initialize().await {
        state.bridge.set_status(ConnectionStatus::AuthFailure).await;
        return Err(e.into());
    }
    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "status": "success",
            "message": "Client initialization triggered. Monitor /status or logs.",
        })),
    )
        .into_response())
}
