//! Jumpstart session DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::Money;
use domain_jumpstart::{ActiveSession, JumpstartMode, JumpstartPrompt, JumpstartSession};

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub mode: String,
}

#[derive(Debug, Deserialize)]
pub struct CompletePromptRequest {
    /// Inventory asset created from this prompt, when one was captured
    pub asset_id: Option<Uuid>,
    pub value: Money,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub mode: String,
    pub mode_label: String,
    pub items_target: i32,
    pub items_completed: i32,
    pub total_value: Money,
    pub progress_percent: u8,
    pub completed: bool,
    pub skipped: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionResponse {
    pub fn from_session(session: JumpstartSession) -> Self {
        let progress_percent = session.progress_percent();
        Self {
            id: Uuid::from(session.id),
            mode: session.mode.as_str().to_string(),
            mode_label: session.mode.label().to_string(),
            items_target: session.items_target,
            items_completed: session.items_completed,
            total_value: session.total_value,
            progress_percent,
            completed: session.completed,
            skipped: session.skipped,
            started_at: session.started_at,
            completed_at: session.completed_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub prompt_index: i32,
    pub prompt_key: String,
    pub label: String,
    pub hint: String,
    pub completed: bool,
    pub skipped: bool,
    pub asset_id: Option<Uuid>,
}

impl PromptResponse {
    /// Joins the stored prompt row with its mode's display copy
    fn from_prompt(mode: JumpstartMode, prompt: &JumpstartPrompt) -> Self {
        let spec = mode.prompts().iter().find(|s| s.key == prompt.prompt_key);
        Self {
            prompt_index: prompt.prompt_index,
            prompt_key: prompt.prompt_key.clone(),
            label: spec
                .map(|s| s.label.to_string())
                .unwrap_or_else(|| prompt.prompt_key.clone()),
            hint: spec.map(|s| s.hint.to_string()).unwrap_or_default(),
            completed: prompt.completed,
            skipped: prompt.skipped,
            asset_id: prompt.asset_id.map(Uuid::from),
        }
    }
}

/// A session with its prompts and resume position
#[derive(Debug, Serialize)]
pub struct ActiveSessionResponse {
    pub session: SessionResponse,
    pub prompts: Vec<PromptResponse>,
    /// First pending prompt; equals the prompt count once exhausted
    pub current_prompt_index: usize,
    pub exhausted: bool,
}

impl ActiveSessionResponse {
    pub fn from_active(active: ActiveSession) -> Self {
        let mode = active.session.mode;
        let current_prompt_index = active.current_prompt_index();
        let exhausted = active.is_exhausted();
        let prompts = active
            .prompts
            .iter()
            .map(|p| PromptResponse::from_prompt(mode, p))
            .collect();

        Self {
            session: SessionResponse::from_session(active.session),
            prompts,
            current_prompt_index,
            exhausted,
        }
    }
}
