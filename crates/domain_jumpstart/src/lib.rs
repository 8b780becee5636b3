//! Jumpstart domain - guided inventory capture sessions
//!
//! A Jumpstart session walks a user through a fixed, ordered list of
//! capture prompts for one of three modes. Progress is persisted after
//! every step so the session survives page reloads and can be resumed
//! days later. Prompts are completed or skipped exactly once; the
//! session accumulates a running count and value total of completed
//! items.

pub mod error;
pub mod mode;
pub mod ports;
pub mod service;
pub mod session;

pub use error::JumpstartError;
pub use mode::{JumpstartMode, PromptSpec};
pub use ports::JumpstartStore;
pub use service::JumpstartService;
pub use session::{ActiveSession, JumpstartPrompt, JumpstartSession};
