//! User-visible notices.
//!
//! Maps the error taxonomy to the messages shown to the user. Only the fetch
//! banner echoes backend text; every other notice is a fixed message.

use serde::{Deserialize, Serialize};

use crate::error::LeadmapError;

pub const FETCH_FALLBACK: &str = "Erro ao carregar dados do banco.";
pub const SIGN_IN_FAILED: &str = "E-mail ou senha incorretos";
pub const SIGN_UP_CONFLICT: &str = "Este e-mail já está cadastrado";
pub const SIGN_UP_FAILED: &str = "Erro ao criar conta. Tente novamente.";
pub const SIGN_UP_SUCCEEDED: &str =
    "Conta criada! Aguarde a liberação de acesso pelo administrador.";
pub const AUTOMATION_SENT: &str = "Automação enviada! Os dados aparecerão em breve.";
pub const AUTOMATION_FAILED: &str = "Erro ao disparar automação. Tente novamente.";
pub const ACCESS_PENDING: &str = "Sua conta ainda não foi autorizada.";

pub fn password_too_short(min_len: usize) -> String {
    format!("A senha deve ter pelo menos {min_len} caracteres")
}

/// Substring the auth backend uses for duplicate accounts.
pub const ALREADY_REGISTERED_MARKER: &str = "already registered";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Error,
}

/// A message for the user plus how it should be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
    /// Inline banners stay until the condition clears; modals can be dismissed
    pub dismissible: bool,
}

impl Notice {
    fn new(severity: Severity, message: impl Into<String>, dismissible: bool) -> Self {
        Self {
            severity,
            message: message.into(),
            dismissible,
        }
    }

    /// Persistent banner for a failed lead fetch, carrying the raw message.
    pub fn fetch_failed(error: &LeadmapError) -> Self {
        let detail = error.detail();
        let message = if detail.trim().is_empty() {
            FETCH_FALLBACK.to_string()
        } else {
            detail
        };
        Self::new(Severity::Error, message, false)
    }

    /// Generic message for any sign-in failure; backend detail is never shown.
    pub fn sign_in_failed() -> Self {
        Self::new(Severity::Error, SIGN_IN_FAILED, true)
    }

    /// Distinguishes duplicate accounts and short passwords from other failures.
    pub fn sign_up_failed(error: &LeadmapError) -> Self {
        let message = match error {
            LeadmapError::Conflict(_) => SIGN_UP_CONFLICT.to_string(),
            LeadmapError::PasswordTooShort { min_len } => password_too_short(*min_len),
            other if other.detail().contains(ALREADY_REGISTERED_MARKER) => {
                SIGN_UP_CONFLICT.to_string()
            }
            _ => SIGN_UP_FAILED.to_string(),
        };
        Self::new(Severity::Error, message, true)
    }

    pub fn sign_up_succeeded() -> Self {
        Self::new(Severity::Success, SIGN_UP_SUCCEEDED, true)
    }

    pub fn automation_sent() -> Self {
        Self::new(Severity::Success, AUTOMATION_SENT, true)
    }

    pub fn automation_failed() -> Self {
        Self::new(Severity::Error, AUTOMATION_FAILED, true)
    }

    pub fn access_pending() -> Self {
        Self::new(Severity::Info, ACCESS_PENDING, false)
    }
}
