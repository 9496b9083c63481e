//! Outbound notifications.

pub mod smtp;
pub mod template;

pub use smtp::SmtpNotificationSink;
pub use template::{EmailMessage, code_email};
