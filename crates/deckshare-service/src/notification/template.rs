//! Email templates.

use std::time::Duration;

/// A rendered plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Render the verification code email.
pub fn code_email(product_name: &str, code: &str, valid_for: Duration) -> EmailMessage {
    let minutes = valid_for.as_secs().div_ceil(60);
    EmailMessage {
        subject: format!("Your {product_name} verification code"),
        body: format!(
            "Your verification code is: {code}\n\n\
             This code expires in {minutes} minutes and can be used once.\n\
             If you did not request access to a shared deck, you can ignore this email.\n"
        ),
    }
}
