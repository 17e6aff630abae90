//! Newsletter signup feedback
//!
//! No network: a submission is validated locally and answered with a
//! notification.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::notify::NotificationKind;

pub const THANKS_MESSAGE: &str = "¡Gracias por suscribirte!";
pub const INVALID_MESSAGE: &str = "Por favor, ingresa un email válido";

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// Basic shape check: something@something.something, no whitespace
pub fn validate_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Result of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub accepted: bool,
    pub message: &'static str,
    pub kind: NotificationKind,
}

impl Submission {
    /// Whether the caller should clear the input field
    pub fn clears_input(&self) -> bool {
        self.accepted
    }
}

pub fn submit(raw: &str) -> Submission {
    if validate_email(raw.trim()) {
        Submission {
            accepted: true,
            message: THANKS_MESSAGE,
            kind: NotificationKind::Success,
        }
    } else {
        Submission {
            accepted: false,
            message: INVALID_MESSAGE,
            kind: NotificationKind::Warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(validate_email("ana@sabor.sv"));
        assert!(validate_email("a.b+c@mail.example.com"));
        assert!(!validate_email(""));
        assert!(!validate_email("ana@sabor"));
        assert!(!validate_email("ana sabor@x.sv"));
        assert!(!validate_email("@sabor.sv"));
    }

    #[test]
    fn test_submit_trims_input() {
        let ok = submit("  ana@sabor.sv \n");
        assert!(ok.clears_input());
        assert_eq!(ok.kind, NotificationKind::Success);

        let bad = submit("no-es-email");
        assert!(!bad.clears_input());
        assert_eq!(bad.message, INVALID_MESSAGE);
        assert_eq!(bad.kind, NotificationKind::Warning);
    }
}
