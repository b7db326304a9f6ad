//! Actix Web HTTP server.
//!
//! Exposes OpenAI-compatible endpoints:
//! - `POST /v1/chat/completions`
//! - `GET /v1/models`
//! - `GET /health`

use actix_cors::Cors;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use anyhow::{Context, Result};
use chrono::Utc;
use cursor_agent_client::AgentInvocation;
use futures::StreamExt;
use serde_json::json;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::{
    auth,
    config::ProxyConfig,
    credentials, streaming, transcript,
    types::{
        AssistantMessage, ChatCompletionRequest, ChatCompletionResponse, Choice, Model,
        ModelsResponse, Usage,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: ProxyConfig,
    pub client: reqwest::Client,
}

pub async fn serve(config: ProxyConfig) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.port);
    info!(addr = %addr, "cursor-proxy listening");

    let client = reqwest::Client::new();
    let state = web::Data::new(AppState { config, client });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .route("/health", web::get().to(health_check))
            .route("/v1/models", web::get().to(handle_models))
            .route(
                "/v1/chat/completions",
                web::post().to(handle_chat_completions),
            )
    })
    .bind(&addr)
    .with_context(|| format!("failed to bind {}", addr))?
    .run()
    .await
    .context("server error")?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn handle_models(state: web::Data<AppState>, req_http: HttpRequest) -> HttpResponse {
    if let Err(resp) = auth::check(&req_http, state.config.auth_token.as_deref()) {
        return resp;
    }

    let created = Utc::now().timestamp();
    let data = state
        .config
        .models
        .iter()
        .map(|id| Model {
            id: id.clone(),
            object: "model".to_string(),
            created,
            owned_by: String::new(),
            permission: None,
            root: String::new(),
            parent: String::new(),
        })
        .collect();

    HttpResponse::Ok().json(ModelsResponse {
        object: "list".to_string(),
        data,
    })
}

async fn handle_chat_completions(
    state: web::Data<AppState>,
    req_http: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    if let Err(resp) = auth::check(&req_http, state.config.auth_token.as_deref()) {
        return resp;
    }

    // Parse by hand so malformed bodies get the documented error object
    // before anything is spawned.
    let req: ChatCompletionRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => {
            debug!(error = %e, "rejecting malformed request body");
            return HttpResponse::BadRequest().json(json!({"error": "Invalid request format"}));
        }
    };

    if req.wants_stream() {
        handle_stream_chat(&state, req).await
    } else {
        handle_sync_chat(&state, req).await
    }
}

async fn handle_sync_chat(state: &AppState, req: ChatCompletionRequest) -> HttpResponse {
    let api_key = match resolve_api_key(state).await {
        Ok(key) => key,
        Err(resp) => return resp,
    };

    let transcript = transcript::build_transcript(&req.messages);
    info!(input = %transcript, "chat");
    debug!(
        model = %req.model,
        api_key = %credentials::mask_key(&api_key),
        "invoking agent"
    );

    let invocation = AgentInvocation::new(&state.config.agent_path, &req.model, &api_key);
    let content = match invocation.run_sync(transcript).await {
        Ok(out) => out,
        Err(e) => {
            error!(error = %e, "agent invocation failed");
            return HttpResponse::InternalServerError().json(json!({"error": e.to_string()}));
        }
    };
    info!(output = %content, "chat");

    HttpResponse::Ok().json(ChatCompletionResponse {
        id: format!("chatcmpl-{}", Uuid::new_v4()),
        object: "chat.completion".to_string(),
        created: Utc::now().timestamp(),
        model: req.model,
        choices: vec![Choice {
            index: 0,
            message: AssistantMessage {
                role: "assistant".to_string(),
                content,
            },
            finish_reason: "stop".to_string(),
        }],
        usage: Usage::placeholder(),
    })
}

async fn handle_stream_chat(state: &AppState, req: ChatCompletionRequest) -> HttpResponse {
    let api_key = match resolve_api_key(state).await {
        Ok(key) => key,
        Err(resp) => return resp,
    };

    let stream_id = Uuid::new_v4().to_string();
    let created = Utc::now().timestamp();

    let transcript = transcript::build_transcript(&req.messages);
    info!(input = %transcript, "chat");
    debug!(
        stream_id = %stream_id,
        model = %req.model,
        api_key = %credentials::mask_key(&api_key),
        "invoking agent"
    );

    let invocation = AgentInvocation::new(&state.config.agent_path, &req.model, &api_key);
    let lines = match invocation.spawn_stream(transcript).await {
        Ok(rx) => rx,
        Err(e) => {
            error!(error = %e, "agent invocation failed");
            return HttpResponse::InternalServerError().json(json!({"error": e.to_string()}));
        }
    };

    let frames = streaming::sse_stream(stream_id, created, req.model, lines).map(|r| {
        r.map(web::Bytes::from)
            .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))
    });

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("cache-control", "no-cache"))
        .insert_header(("connection", "keep-alive"))
        .streaming(frames)
}

async fn resolve_api_key(state: &AppState) -> Result<String, HttpResponse> {
    let Some(source) = state.config.credentials.as_ref() else {
        error!("no credential source configured");
        return Err(HttpResponse::InternalServerError().json(json!({
            "error": "CURSOR_API_KEY or CURSOR_API_KEY_URL or CURSOR_API_KEY_SCRIPT is not set"
        })));
    };

    source.resolve(&state.client).await.map_err(|e| {
        error!(error = %e, "failed to resolve api key");
        HttpResponse::InternalServerError().json(json!({"error": e.to_string()}))
    })
}
