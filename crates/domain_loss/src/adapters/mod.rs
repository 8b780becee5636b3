//! External adapters for the loss event domain

pub mod smtp_mailer;

pub use smtp_mailer::{SmtpMailerConfig, SmtpReminderMailer};
