//! Which top-level screen the current session is allowed to see.

use leadmap_core::notice::Notice;

use crate::session_store::{SessionPhase, SessionSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessGate {
    /// Session or profile still resolving
    Loading,
    SignIn,
    /// Signed in, but the profile is missing or not yet authorized
    NoAccess { email: Option<String> },
    Dashboard,
}

impl AccessGate {
    pub fn evaluate(snapshot: &SessionSnapshot) -> Self {
        match snapshot.phase() {
            SessionPhase::Initializing => Self::Loading,
            SessionPhase::Unauthenticated => Self::SignIn,
            SessionPhase::Unauthorized => Self::NoAccess {
                email: snapshot
                    .session
                    .as_ref()
                    .and_then(|session| session.user.email.clone()),
            },
            SessionPhase::Authorized => Self::Dashboard,
        }
    }

    pub fn allows_dashboard(&self) -> bool {
        matches!(self, Self::Dashboard)
    }

    /// Banner shown on the no-access screen.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::NoAccess { .. } => Some(Notice::access_pending()),
            _ => None,
        }
    }
}
