//! HTTP surface: the analysis endpoint plus a liveness probe. Collaborator
//! failures never become error payloads here; the recommendation chain
//! absorbs them and the response always carries a track list.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use base64::Engine;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::engine::Recommender;
use crate::vision::ImageAnalyzer;

pub struct AppContext {
    pub recommender: Recommender,
    pub analyzer: ImageAnalyzer,
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    filename: String,
    /// Base64-encoded image payload; heuristics take over without it.
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    playlist_url: Option<String>,
}

pub async fn run(addr: &str, ctx: Arc<AppContext>) -> Result<()> {
    let addr: SocketAddr = addr.parse().context("invalid bind address")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let ctx = ctx.clone();
        tokio::spawn(async move {
            let service = service_fn(move |req| handle(req, ctx.clone()));
            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                warn!(error = %e, "connection error");
            }
        });
    }
}

async fn handle(
    req: Request<Incoming>,
    ctx: Arc<AppContext>,
) -> std::result::Result<Response<Full<Bytes>>, hyper::Error> {
    match (req.method(), req.uri().path()) {
        (&Method::GET, "/api/health") => Ok(json_response(StatusCode::OK, json!({ "status": "ok" }))),
        (&Method::OPTIONS, _) => Ok(preflight()),
        (&Method::POST, "/api/analyze") => analyze(req, ctx).await,
        _ => Ok(json_response(
            StatusCode::NOT_FOUND,
            json!({ "error": "not found" }),
        )),
    }
}

async fn analyze(
    req: Request<Incoming>,
    ctx: Arc<AppContext>,
) -> std::result::Result<Response<Full<Bytes>>, hyper::Error> {
    let body = req.into_body().collect().await?.to_bytes();
    let request: AnalyzeRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            return Ok(json_response(
                StatusCode::BAD_REQUEST,
                json!({ "error": format!("invalid request body: {e}") }),
            ));
        }
    };

    let image = request
        .image
        .as_deref()
        .and_then(|b64| base64::engine::general_purpose::STANDARD.decode(b64).ok());

    let analysis = ctx.analyzer.analyze(&request.filename, image.as_deref()).await;
    let recommendation = ctx
        .recommender
        .recommend(&analysis, request.playlist_url.as_deref())
        .await;

    info!(
        filename = %request.filename,
        source = %recommendation.source,
        tracks = recommendation.tracks.len(),
        "analysis request complete"
    );

    Ok(json_response(
        StatusCode::OK,
        json!({
            "analysis": analysis,
            "source": recommendation.source,
            "tracks": recommendation.tracks,
        }),
    ))
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body.to_string())))
        .expect("static response headers")
}

fn preflight() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Full::new(Bytes::new()))
        .expect("static response headers")
}
