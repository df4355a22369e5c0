use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::{http::header, test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};

use thumbgenai::{
    models::{
        Candidate, Content, GenerateContentResponse, ImageGenerationRequest, InlineData, Part,
        TextGenerationRequest,
    },
    server::{self, AppState},
    ImageGenerator, Result, TextGenerator, ThumbnailError, ThumbnailOrchestrator, UploadResponse,
};

const BOUNDARY: &str = "----thumbgenaitestboundary";
const PHOTO: &[u8] = b"\x89PNG fake photo bytes";

struct ScriptedText {
    reply: Option<&'static str>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl TextGenerator for ScriptedText {
    async fn generate(&self, request: TextGenerationRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt);
        self.reply
            .map(str::to_string)
            .ok_or_else(|| ThumbnailError::TextGeneration("401 invalid key".into()))
    }

    fn model_name(&self) -> &str {
        "scripted-text"
    }
}

struct ScriptedImage {
    images: Option<Vec<(&'static str, &'static str)>>,
    calls: AtomicUsize,
    instructions: Mutex<Vec<String>>,
}

#[async_trait]
impl ImageGenerator for ScriptedImage {
    async fn generate(&self, request: ImageGenerationRequest) -> Result<GenerateContentResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.instructions.lock().unwrap().push(request.instruction);
        let images = self
            .images
            .clone()
            .ok_or_else(|| ThumbnailError::ImageGeneration("503 overloaded".into()))?;

        Ok(GenerateContentResponse {
            candidates: images
                .into_iter()
                .map(|(mime_type, data)| Candidate {
                    content: Some(Content {
                        role: Some("model".into()),
                        parts: vec![Part::InlineData {
                            inline_data: InlineData {
                                mime_type: mime_type.into(),
                                data: data.into(),
                            },
                        }],
                    }),
                    finish_reason: Some("STOP".into()),
                })
                .collect(),
        })
    }

    fn model_name(&self) -> &str {
        "scripted-image"
    }
}

struct Harness {
    text: Arc<ScriptedText>,
    image: Arc<ScriptedImage>,
    max_photo_bytes: usize,
}

impl Harness {
    fn new(
        reply: Option<&'static str>,
        images: Option<Vec<(&'static str, &'static str)>>,
    ) -> Self {
        Self {
            text: Arc::new(ScriptedText {
                reply,
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }),
            image: Arc::new(ScriptedImage {
                images,
                calls: AtomicUsize::new(0),
                instructions: Mutex::new(Vec::new()),
            }),
            max_photo_bytes: 1024,
        }
    }

    fn state(&self) -> AppState {
        AppState::new(
            ThumbnailOrchestrator::new(self.text.clone(), self.image.clone()),
            self.max_photo_bytes,
        )
    }

    fn text_calls(&self) -> usize {
        self.text.calls.load(Ordering::SeqCst)
    }

    fn image_calls(&self) -> usize {
        self.image.calls.load(Ordering::SeqCst)
    }
}

fn part(name: &str, value: &[u8]) -> Vec<u8> {
    let mut bytes = format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n",
        BOUNDARY, name
    )
    .into_bytes();
    bytes.extend_from_slice(value);
    bytes.extend_from_slice(b"\r\n");
    bytes
}

fn multipart_body(fields: &[(&str, &str)], photo: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend(part(name, value.as_bytes()));
    }
    if let Some(bytes) = photo {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"me.png\"\r\nContent-Type: image/png\r\n\r\n",
                BOUNDARY
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn post(uri: &str, body: Vec<u8>) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(body)
}

macro_rules! app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($harness.state()))
                .configure(server::routes),
        )
        .await
    };
}

#[actix_web::test]
async fn upload_end_to_end_youtube() {
    let harness = Harness::new(
        Some("A cyberpunk cityscape portrait"),
        Some(vec![("image/png", "iVBORw0KGgo=")]),
    );
    let app = app!(harness);

    let body = multipart_body(
        &[("outputFormat", "youtube"), ("customPrompt", "cyberpunk city")],
        Some(PHOTO),
    );
    let resp = test::call_service(&app, post("/upload", body).to_request()).await;
    assert_eq!(resp.status(), 200);

    let body: UploadResponse = test::read_body_json(resp).await;
    assert_eq!(body.message, "Thumbnails generated!");
    assert_eq!(body.rewritten_prompt, "A cyberpunk cityscape portrait");
    assert_eq!(body.output_format, "youtube");
    assert_eq!(body.images, vec!["data:image/png;base64,iVBORw0KGgo="]);

    let prompts = harness.text.prompts.lock().unwrap();
    assert!(prompts[0].ends_with("User Custom Prompt: cyberpunk city"));
    let instructions = harness.image.instructions.lock().unwrap();
    assert_eq!(
        instructions[0],
        "A cyberpunk cityscape portrait. Generate image in resolution 1280x720"
    );
}

#[actix_web::test]
async fn upload_shorts_uses_portrait_resolution() {
    let harness = Harness::new(Some("Vertical cover"), Some(vec![]));
    let app = app!(harness);

    let body = multipart_body(
        &[
            ("videoType", "Vlog"),
            ("mood", "Calm"),
            ("style", "Minimal"),
            ("placement", "Center"),
            ("outputFormat", "shorts"),
        ],
        Some(PHOTO),
    );
    let resp = test::call_service(&app, post("/upload", body).to_request()).await;
    assert_eq!(resp.status(), 200);

    let body: UploadResponse = test::read_body_json(resp).await;
    assert_eq!(body.output_format, "shorts");
    assert!(body.images.is_empty());

    let prompts = harness.text.prompts.lock().unwrap();
    assert_eq!(
        prompts[0],
        "Video type: Vlog\nMood: Calm\nStyle: Minimal\nPlacement: Center"
    );
    assert!(harness.image.instructions.lock().unwrap()[0].ends_with("1080x1920"));
}

#[actix_web::test]
async fn upload_two_candidates_in_order() {
    let harness = Harness::new(
        Some("prompt"),
        Some(vec![("image/png", "ONE"), ("image/jpeg", "TWO")]),
    );
    let app = app!(harness);

    let body = multipart_body(&[], Some(PHOTO));
    let resp = test::call_service(&app, post("/upload", body).to_request()).await;
    assert_eq!(resp.status(), 200);

    let body: UploadResponse = test::read_body_json(resp).await;
    assert_eq!(
        body.images,
        vec!["data:image/png;base64,ONE", "data:image/jpeg;base64,TWO"]
    );
    assert_eq!(body.output_format, "");
}

#[actix_web::test]
async fn upload_without_photo_is_rejected_before_upstream() {
    let harness = Harness::new(Some("unused"), Some(vec![]));
    let app = app!(harness);

    let body = multipart_body(&[("mood", "Happy")], None);
    let resp = test::call_service(&app, post("/upload", body).to_request()).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "No photo was attached to the request" }));
    assert_eq!(harness.text_calls(), 0);
    assert_eq!(harness.image_calls(), 0);
}

#[actix_web::test]
async fn upload_oversized_photo_is_rejected() {
    let mut harness = Harness::new(Some("unused"), Some(vec![]));
    harness.max_photo_bytes = 8;
    let app = app!(harness);

    let body = multipart_body(&[], Some(PHOTO));
    let resp = test::call_service(&app, post("/upload", body).to_request()).await;
    assert_eq!(resp.status(), 413);
    assert_eq!(harness.text_calls(), 0);
    assert_eq!(harness.image_calls(), 0);
}

#[actix_web::test]
async fn upload_non_utf8_text_field_is_rejected() {
    let harness = Harness::new(Some("unused"), Some(vec![]));
    let app = app!(harness);

    let mut body = part("customPrompt", b"\xff\xfe");
    body.extend(multipart_body(&[], Some(PHOTO)));
    let resp = test::call_service(&app, post("/upload", body).to_request()).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Invalid form: customPrompt is not valid UTF-8" }));
    assert_eq!(harness.text_calls(), 0);
    assert_eq!(harness.image_calls(), 0);
}

#[actix_web::test]
async fn upload_overlong_text_field_is_rejected() {
    let harness = Harness::new(Some("unused"), Some(vec![]));
    let app = app!(harness);

    let mood = "a".repeat(17 * 1024);
    let body = multipart_body(&[("mood", &mood)], Some(PHOTO));
    let resp = test::call_service(&app, post("/upload", body).to_request()).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Invalid form: mood is too long" }));
    assert_eq!(harness.text_calls(), 0);
}

#[actix_web::test]
async fn upload_ignores_unknown_fields() {
    let harness = Harness::new(Some("prompt"), Some(vec![("image/png", "OK")]));
    let app = app!(harness);

    let body = multipart_body(&[("foo", "bar"), ("mood", "Happy")], Some(PHOTO));
    let resp = test::call_service(&app, post("/upload", body).to_request()).await;
    assert_eq!(resp.status(), 200);

    let prompts = harness.text.prompts.lock().unwrap();
    assert!(!prompts[0].contains("bar"));
    assert!(prompts[0].contains("Mood: Happy"));
}

#[actix_web::test]
async fn upload_truncated_body_is_rejected() {
    let harness = Harness::new(Some("unused"), Some(vec![]));
    let app = app!(harness);

    let mut body = multipart_body(&[("mood", "Happy")], Some(PHOTO));
    let closing = format!("--{}--\r\n", BOUNDARY);
    body.truncate(body.len() - closing.len());
    let resp = test::call_service(&app, post("/upload", body).to_request()).await;
    assert_eq!(resp.status(), 400);
    assert_eq!(harness.text_calls(), 0);
    assert_eq!(harness.image_calls(), 0);
}

#[actix_web::test]
async fn prompt_failure_reports_prompt_stage() {
    let harness = Harness::new(None, Some(vec![]));
    let app = app!(harness);

    let body = multipart_body(&[], Some(PHOTO));
    let resp = test::call_service(&app, post("/upload", body).to_request()).await;
    assert_eq!(resp.status(), 500);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({ "error": "Something went wrong with thumbnail generation", "stage": "prompt" })
    );
    assert_eq!(harness.image_calls(), 0);
}

#[actix_web::test]
async fn image_failure_reports_image_stage() {
    let harness = Harness::new(Some("prompt"), None);
    let app = app!(harness);

    let body = multipart_body(&[], Some(PHOTO));
    let resp = test::call_service(&app, post("/upload", body).to_request()).await;
    assert_eq!(resp.status(), 500);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["stage"], "image");
    assert_eq!(harness.text_calls(), 1);
    assert_eq!(harness.image_calls(), 1);
}

#[actix_web::test]
async fn refine_ignores_structured_fields() {
    let harness = Harness::new(Some("Brighter"), Some(vec![("image/png", "R")]));
    let app = app!(harness);

    let body = multipart_body(
        &[
            ("videoType", "Gaming"),
            ("mood", "Dark"),
            ("customPrompt", "make the sky brighter"),
        ],
        Some(PHOTO),
    );
    let resp = test::call_service(&app, post("/refine", body).to_request()).await;
    assert_eq!(resp.status(), 200);

    let prompts = harness.text.prompts.lock().unwrap();
    assert_eq!(
        prompts[0],
        "Video type: Not specified\nMood: Not specified\nStyle: Not specified\nPlacement: Not specified\nUser Custom Prompt: make the sky brighter"
    );
}

#[actix_web::test]
async fn refine_requires_instruction() {
    let harness = Harness::new(Some("unused"), Some(vec![]));
    let app = app!(harness);

    let body = multipart_body(&[("customPrompt", "   ")], Some(PHOTO));
    let resp = test::call_service(&app, post("/refine", body).to_request()).await;
    assert_eq!(resp.status(), 400);
    assert_eq!(harness.text_calls(), 0);
}

#[actix_web::test]
async fn health_reports_ok() {
    let harness = Harness::new(None, None);
    let app = app!(harness);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}
