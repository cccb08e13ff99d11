pub mod change_feed;
pub mod config_service;
pub mod logging;
pub mod paths;
pub mod session_file;
pub mod supabase;
pub mod webhook;

pub use crate::change_feed::BroadcastChangeFeed;
pub use crate::config_service::ConfigService;
pub use crate::paths::LeadmapPaths;
pub use crate::session_file::SessionFile;
pub use crate::supabase::{
    GoTrueAuthService, PostgrestLeadRepository, PostgrestProfileRepository, SupabaseClient,
};
pub use crate::webhook::WebhookAutomationTrigger;
