//! GitHub-gist state backend.
//!
//! The state lives as one JSON file inside a private gist, read with a GET
//! and written back with a PATCH. Plain overwrite, no version precondition:
//! the design assumes at most one active run (see [`super::StateStore`]).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::StoreError;

use super::{AlertState, StateStore};

const GIST_API: &str = "https://api.github.com/gists";
const STATE_FILE: &str = "kimp-state.json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct GistResponse {
    files: HashMap<String, GistFile>,
}

#[derive(Debug, Deserialize)]
struct GistFile {
    content: String,
}

pub struct GistStore {
    client: reqwest::Client,
    gist_id: String,
    token: String,
}

impl GistStore {
    pub fn new(gist_id: impl Into<String>, token: impl Into<String>) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("kimp-monitor"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            gist_id: gist_id.into(),
            token: token.into(),
        })
    }

    fn url(&self) -> String {
        format!("{GIST_API}/{}", self.gist_id)
    }

    fn auth(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

#[async_trait]
impl StateStore for GistStore {
    fn name(&self) -> &'static str {
        "gist"
    }

    async fn load(&self) -> Result<AlertState, StoreError> {
        let response = self
            .client
            .get(self.url())
            .header(AUTHORIZATION, self.auth())
            .send()
            .await?
            .error_for_status()?;

        let gist: GistResponse = response.json().await?;
        let Some(file) = gist.files.get(STATE_FILE) else {
            // Fresh gist without the state file yet: first-ever run.
            debug!(file = STATE_FILE, "state file absent in gist, starting empty");
            return Ok(AlertState::default());
        };

        let state: AlertState = serde_json::from_str(&file.content)?;
        debug!(entries = state.len(), "alert state loaded from gist");
        Ok(state)
    }

    async fn save(&self, state: &AlertState) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(state)?;
        let body = json!({
            "files": { STATE_FILE: { "content": content } }
        });

        let response = self
            .client
            .patch(self.url())
            .header(AUTHORIZATION, self.auth())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::Response(format!(
                "gist update returned {}",
                response.status()
            )));
        }

        debug!(entries = state.len(), "alert state saved to gist");
        Ok(())
    }
}
