//! Jumpstart session and prompt entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{
    AssetId, Currency, JumpstartPromptId, JumpstartSessionId, Money, UserId,
};

use crate::mode::JumpstartMode;

/// One prompt row, created at session start and mutated at most once
///
/// A prompt moves from pending to exactly one of completed or skipped;
/// neither transition is reversible. `completed_at` stamps whichever
/// terminal state the prompt reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JumpstartPrompt {
    pub id: JumpstartPromptId,
    pub session_id: JumpstartSessionId,
    /// 0-based position; defines the capture order
    pub prompt_index: i32,
    /// Key of the mode's `PromptSpec` this row tracks
    pub prompt_key: String,
    pub completed: bool,
    pub skipped: bool,
    /// Asset created from this prompt, set on completion
    pub asset_id: Option<AssetId>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl JumpstartPrompt {
    pub fn is_pending(&self) -> bool {
        !self.completed && !self.skipped
    }
}

/// A user's guided capture session
///
/// `items_completed` and `total_value` only grow, and only through
/// server-side arithmetic at the store; this struct never computes a
/// counter value itself. Totals accumulate in USD.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JumpstartSession {
    pub id: JumpstartSessionId,
    pub user_id: UserId,
    pub mode: JumpstartMode,
    /// Equals the mode's prompt list length, fixed at creation
    pub items_target: i32,
    pub items_completed: i32,
    pub total_value: Money,
    pub completed: bool,
    /// Session-level "skip for now", independent of per-prompt skips
    pub skipped: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl JumpstartSession {
    /// Creates a fresh session with one prompt row per mode prompt
    ///
    /// The target comes from the same list the prompt rows are built
    /// from, so the two cannot drift apart.
    pub fn start(user_id: UserId, mode: JumpstartMode) -> (Self, Vec<JumpstartPrompt>) {
        let id = JumpstartSessionId::new_v7();
        let prompts: Vec<JumpstartPrompt> = mode
            .prompts()
            .iter()
            .enumerate()
            .map(|(index, spec)| JumpstartPrompt {
                id: JumpstartPromptId::new_v7(),
                session_id: id,
                prompt_index: index as i32,
                prompt_key: spec.key.to_string(),
                completed: false,
                skipped: false,
                asset_id: None,
                completed_at: None,
            })
            .collect();

        let session = Self {
            id,
            user_id,
            mode,
            items_target: prompts.len() as i32,
            items_completed: 0,
            total_value: Money::zero(Currency::USD),
            completed: false,
            skipped: false,
            started_at: Utc::now(),
            completed_at: None,
        };
        (session, prompts)
    }

    /// Whether resumption should offer this session
    pub fn is_resumable(&self) -> bool {
        !self.completed && !self.skipped
    }

    /// Completion percentage, rounded, never above 100
    pub fn progress_percent(&self) -> u8 {
        if self.items_target <= 0 {
            return 0;
        }
        let ratio = f64::from(self.items_completed) / f64::from(self.items_target);
        (ratio * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// A session loaded together with its ordered prompt rows
#[derive(Debug, Clone, Serialize)]
pub struct ActiveSession {
    pub session: JumpstartSession,
    /// Ordered by `prompt_index`
    pub prompts: Vec<JumpstartPrompt>,
}

impl ActiveSession {
    pub fn new(session: JumpstartSession, mut prompts: Vec<JumpstartPrompt>) -> Self {
        prompts.sort_by_key(|p| p.prompt_index);
        Self { session, prompts }
    }

    /// Index of the first pending prompt, or the prompt count when none
    /// remain pending
    pub fn current_prompt_index(&self) -> usize {
        self.prompts
            .iter()
            .position(JumpstartPrompt::is_pending)
            .unwrap_or(self.prompts.len())
    }

    pub fn current_prompt(&self) -> Option<&JumpstartPrompt> {
        self.prompts.iter().find(|p| p.is_pending())
    }

    /// True once every prompt has reached a terminal state
    pub fn is_exhausted(&self) -> bool {
        self.current_prompt().is_none()
    }

    pub fn progress_percent(&self) -> u8 {
        self.session.progress_percent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_builds_one_prompt_per_mode_entry() {
        let (session, prompts) = JumpstartSession::start(UserId::new(), JumpstartMode::HighValue);

        assert_eq!(session.items_target, 5);
        assert_eq!(prompts.len(), 5);
        assert_eq!(session.items_completed, 0);
        assert!(session.total_value.is_zero());
        assert!(session.is_resumable());

        for (i, prompt) in prompts.iter().enumerate() {
            assert_eq!(prompt.prompt_index, i as i32);
            assert_eq!(prompt.session_id, session.id);
            assert!(prompt.is_pending());
            assert_eq!(
                prompt.prompt_key,
                JumpstartMode::HighValue.prompts()[i].key
            );
        }
    }

    #[test]
    fn test_current_index_is_first_pending_not_terminal_count() {
        let (session, mut prompts) = JumpstartSession::start(UserId::new(), JumpstartMode::HighValue);
        prompts[0].completed = true;
        prompts[1].skipped = true;
        prompts[3].completed = true;

        let active = ActiveSession::new(session, prompts);
        assert_eq!(active.current_prompt_index(), 2);
        assert_eq!(active.current_prompt().unwrap().prompt_index, 2);
    }

    #[test]
    fn test_exhausted_session_reports_prompt_count_as_index() {
        let (session, mut prompts) = JumpstartSession::start(UserId::new(), JumpstartMode::QuickWin);
        for prompt in &mut prompts {
            prompt.skipped = true;
        }

        let active = ActiveSession::new(session, prompts);
        assert_eq!(active.current_prompt_index(), 3);
        assert!(active.is_exhausted());
        assert!(active.current_prompt().is_none());
    }

    #[test]
    fn test_prompts_reordered_on_load() {
        let (session, mut prompts) = JumpstartSession::start(UserId::new(), JumpstartMode::QuickWin);
        prompts.reverse();

        let active = ActiveSession::new(session, prompts);
        let indices: Vec<i32> = active.prompts.iter().map(|p| p.prompt_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_progress_percent_rounds_and_clamps() {
        let (mut session, _) = JumpstartSession::start(UserId::new(), JumpstartMode::QuickWin);
        assert_eq!(session.progress_percent(), 0);

        session.items_completed = 1;
        assert_eq!(session.progress_percent(), 33);

        session.items_completed = 2;
        assert_eq!(session.progress_percent(), 67);

        session.items_completed = 3;
        assert_eq!(session.progress_percent(), 100);

        // Counter past target cannot push the figure above 100
        session.items_completed = 4;
        assert_eq!(session.progress_percent(), 100);
    }
}
