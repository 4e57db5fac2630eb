//! InferenceClient - multipart upload to the remote detection endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use yodash_core::config::DashConfig;
use yodash_core::model::{DetectionBox, ImageFile, ModelVersion};
use yodash_core::ports::{ANONYMOUS_USER, InferencePort};
use yodash_core::{DashError, Result};

use crate::http::{build_client, check_status, transport_error};

/// Client for `POST /inference`.
#[derive(Clone)]
pub struct InferenceClient {
    client: Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct InferenceResponse {
    /// Absent when the backend reports "No detections found in the image."
    #[serde(default)]
    detections: Option<Vec<DetectionBox>>,
    #[serde(default)]
    message: Option<String>,
}

impl InferenceClient {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &DashConfig) -> Result<Self> {
        Self::new(config.inference_url.clone(), config.request_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_form(image: &ImageFile, model: ModelVersion, user: Option<&str>) -> Result<Form> {
        let image_part = Part::bytes(image.bytes().to_vec())
            .file_name(image.name().to_string())
            .mime_str(image.mime_type())
            .map_err(|err| {
                DashError::invalid_input(format!(
                    "Unsupported MIME type {:?}: {err}",
                    image.mime_type()
                ))
            })?;

        Ok(Form::new()
            .text("user", user.unwrap_or(ANONYMOUS_USER).to_string())
            .part("image", image_part)
            .text("model", model.as_str().to_string()))
    }
}

#[async_trait]
impl InferencePort for InferenceClient {
    async fn submit(
        &self,
        image: &ImageFile,
        model: ModelVersion,
        user: Option<&str>,
    ) -> Result<Vec<DetectionBox>> {
        let form = Self::build_form(image, model, user)?;

        tracing::info!(
            "[InferenceClient] Submitting {} ({} bytes) with {}",
            image.name(),
            image.len(),
            model
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|err| transport_error("Inference request", err))?;

        check_status(&response)?;

        let body = response
            .text()
            .await
            .map_err(|err| transport_error("Reading inference response", err))?;

        let parsed: InferenceResponse = serde_json::from_str(&body).map_err(|err| {
            DashError::decode(format!("Failed to parse inference response: {err}"))
        })?;

        match parsed.detections {
            Some(detections) => {
                tracing::info!("[InferenceClient] Received {} detections", detections.len());
                Ok(detections)
            }
            None => {
                tracing::info!(
                    "[InferenceClient] No detections: {}",
                    parsed.message.as_deref().unwrap_or("(no message)")
                );
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_support::{dead_url, serve};
    use axum::extract::{Multipart, State};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<HashMap<String, (Option<String>, Vec<u8>)>>>;

    async fn record_fields(State(seen): State<Seen>, mut multipart: Multipart) -> Json<Value> {
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let data = field.bytes().await.unwrap().to_vec();
            seen.lock().unwrap().insert(name, (file_name, data));
        }
        Json(json!({
            "detections": [
                {
                    "file_id": "0190a4c2", "bbox_id": 1, "label": "person",
                    "confidence": 0.9, "bbox": {"x": 10, "y": 20, "width": 30, "height": 40},
                    "status": "complete", "source": "photo", "model": "yolov12-medium",
                    "color": "border-green-500"
                },
                {
                    "file_id": "0190a4c2", "bbox_id": 2, "label": "dog",
                    "confidence": 0.5, "bbox": {"x": 1, "y": 2, "width": 3, "height": 4},
                    "status": "complete", "source": "photo", "model": "yolov12-medium",
                    "color": "border-green-500"
                }
            ]
        }))
    }

    fn photo() -> ImageFile {
        ImageFile::new("photo.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0])
    }

    #[tokio::test]
    async fn test_submit_sends_multipart_fields_and_parses_boxes() {
        let seen: Seen = Arc::default();
        let router = Router::new()
            .route("/inference", post(record_fields))
            .with_state(seen.clone());
        let base = serve(router).await;

        let client = InferenceClient::new(format!("{base}/inference"), None).unwrap();
        let boxes = client
            .submit(&photo(), ModelVersion::Medium, Some("ada@example.com"))
            .await
            .unwrap();

        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].label, "person");
        assert_eq!(boxes[1].bbox_id, 2);

        let seen = seen.lock().unwrap();
        assert_eq!(seen["user"].1, b"ada@example.com");
        assert_eq!(seen["model"].1, b"yolov12-medium");
        assert_eq!(seen["image"].0.as_deref(), Some("photo.jpg"));
        assert_eq!(seen["image"].1, vec![0xFF, 0xD8, 0xFF, 0xE0]);
    }

    #[tokio::test]
    async fn test_missing_identity_uses_placeholder() {
        let seen: Seen = Arc::default();
        let router = Router::new()
            .route("/inference", post(record_fields))
            .with_state(seen.clone());
        let base = serve(router).await;

        let client = InferenceClient::new(format!("{base}/inference"), None).unwrap();
        client.submit(&photo(), ModelVersion::Small, None).await.unwrap();

        assert_eq!(seen.lock().unwrap()["user"].1, b"anonymous");
    }

    #[tokio::test]
    async fn test_non_success_status_is_backend_error() {
        let router = Router::new().route(
            "/inference",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let base = serve(router).await;

        let client = InferenceClient::new(format!("{base}/inference"), None).unwrap();
        let err = client
            .submit(&photo(), ModelVersion::Small, None)
            .await
            .unwrap_err();

        assert_eq!(err, DashError::backend(502, "Bad Gateway"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let router = Router::new().route("/inference", post(|| async { "<html>oops</html>" }));
        let base = serve(router).await;

        let client = InferenceClient::new(format!("{base}/inference"), None).unwrap();
        let err = client
            .submit(&photo(), ModelVersion::Small, None)
            .await
            .unwrap_err();

        assert!(err.is_decode(), "got {err:?}");
    }

    #[tokio::test]
    async fn test_no_detections_message_yields_empty_list() {
        let router = Router::new().route(
            "/inference",
            post(|| async { Json(json!({"message": "No detections found in the image."})) }),
        );
        let base = serve(router).await;

        let client = InferenceClient::new(format!("{base}/inference"), None).unwrap();
        let boxes = client
            .submit(&photo(), ModelVersion::Small, None)
            .await
            .unwrap();

        assert!(boxes.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let base = dead_url().await;
        let client = InferenceClient::new(format!("{base}/inference"), None).unwrap();
        let err = client
            .submit(&photo(), ModelVersion::Small, None)
            .await
            .unwrap_err();

        assert!(err.is_transport(), "got {err:?}");
    }
}
