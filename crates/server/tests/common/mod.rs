//! # Common Test Utilities
//!
//! A full application harness for the integration tests: spawns the real
//! server on a random port, configured against an `httpmock::MockServer`
//! standing in for the completion API and the sheet log sink, plus a helper
//! for synthesizing multi-page PDFs in memory.

#![allow(unused)]

use anyhow::Result;
use httpmock::MockServer;
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};
use reqwest::Client;
use rfpnav_server::{config, router::create_router, state::build_app_state};
use std::{fs::File, io::Write, net::SocketAddr};
use tempfile::TempDir;
use tokio::{net::TcpListener, task::JoinHandle};

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
}

impl TestApp {
    /// Spawns the application with the completion API and log sink pointed
    /// at the given URLs (usually an `httpmock` server; an unreachable URL
    /// simulates an outage).
    pub async fn spawn(completion_url: &str, sink_url: &str) -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let config_dir = tempfile::tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
request_timeout_secs: 2
max_prompt_words: 6000
max_context_words: 2000
include_page_markers: false
completion:
  provider: "openai"
  api_url: "{completion_url}"
  api_key: "test-key"
  model: "mock-chat-model"
log_sink:
  api_url: "{sink_url}"
"#
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = config::get_config(Some(config_path.to_str().unwrap()))?;
        let app_state = build_app_state(config)?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let server_handle = tokio::spawn(async move {
            let app = create_router(app_state);
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            _config_dir: config_dir,
            _server_handle: server_handle,
        })
    }

    /// Convenience wrapper: both collaborators served by one mock server,
    /// with the conventional paths used across the tests.
    pub async fn spawn_with_mocks(mock_server: &MockServer) -> Result<Self> {
        Self::spawn(
            &mock_server.url("/v1/chat/completions"),
            &mock_server.url("/append"),
        )
        .await
    }

    /// Creates a session and returns its id.
    pub async fn create_session(&self, email: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/session", self.address))
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;
        anyhow::ensure!(response.status().is_success(), "session create failed");
        let body: serde_json::Value = response.json().await?;
        Ok(body["result"]["session_id"].as_str().unwrap().to_string())
    }

    /// Uploads a PDF to the session via the multipart endpoint.
    pub async fn upload_pdf(
        &self,
        session_id: &str,
        file_name: &str,
        pdf_data: Vec<u8>,
    ) -> Result<reqwest::Response> {
        let part = reqwest::multipart::Part::bytes(pdf_data)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new().part("file", part);
        Ok(self
            .client
            .post(format!("{}/session/{session_id}/document", self.address))
            .multipart(form)
            .send()
            .await?)
    }

    /// Fetches the conversation view for assertions.
    pub async fn conversation(&self, session_id: &str) -> Result<serde_json::Value> {
        let response = self
            .client
            .get(format!(
                "{}/session/{session_id}/conversation",
                self.address
            ))
            .send()
            .await?;
        anyhow::ensure!(response.status().is_success(), "conversation read failed");
        let body: serde_json::Value = response.json().await?;
        Ok(body["result"].clone())
    }
}

/// Generates a PDF with one page of Helvetica text per entry.
pub fn generate_test_pdf(pages: &[&str]) -> Vec<u8> {
    let mut pdf = Pdf::new();

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let font_id = Ref::new(3);
    let mut next_id = 4;

    let mut page_ids = Vec::new();
    let mut content_ids = Vec::new();
    for _ in pages {
        page_ids.push(Ref::new(next_id));
        content_ids.push(Ref::new(next_id + 1));
        next_id += 2;
    }

    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(pages.len() as i32);
    pdf.type1_font(font_id).base_font(Name(b"Helvetica"));

    let font_name = Name(b"F1");
    for ((text, page_id), content_id) in pages.iter().zip(&page_ids).zip(&content_ids) {
        let mut page = pdf.page(*page_id);
        page.media_box(Rect::new(0.0, 0.0, 595.0, 842.0));
        page.parent(page_tree_id);
        page.contents(*content_id);
        page.resources().fonts().pair(font_name, font_id);
        page.finish();

        let mut content = Content::new();
        content.begin_text();
        content.set_font(font_name, 14.0);
        content.next_line(108.0, 734.0);
        content.show(Str(text.as_bytes()));
        content.end_text();
        pdf.stream(*content_id, &content.finish());
    }

    pdf.finish()
}
