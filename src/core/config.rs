use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Configuration constants for the bot
///
/// Every value is read once from the environment on first access and cached
/// for the lifetime of the process.
/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: quizdesk.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "quizdesk.log".to_string()));

/// Webhook URL for Telegram updates
/// Read from WEBHOOK_URL environment variable; long polling is used when unset
pub static WEBHOOK_URL: Lazy<Option<String>> = Lazy::new(|| env::var("WEBHOOK_URL").ok());

/// Port the webhook listener binds to
/// Read from PORT environment variable
/// Default: 8443
pub static PORT: Lazy<u16> = Lazy::new(|| {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8443)
});

/// Which store backend to run against
/// Read from STORE_BACKEND environment variable: "firestore" (default) or
/// "memory" (volatile, local development only)
pub static STORE_BACKEND: Lazy<String> =
    Lazy::new(|| env::var("STORE_BACKEND").unwrap_or_else(|_| "firestore".to_string()));

/// Admin configuration
pub mod admin {
    use super::*;

    /// Telegram user id allowed to use the bot.
    /// Read from ADMIN_USER_ID environment variable.
    /// 0 disables the gate (every chat is treated as the admin).
    pub static ADMIN_USER_ID: Lazy<i64> = Lazy::new(|| {
        env::var("ADMIN_USER_ID")
            .ok()
            .and_then(|id| id.parse().ok())
            .unwrap_or(0)
    });
}

/// Firebase project configuration
pub mod firebase {
    use super::*;

    /// Firestore project id
    /// Read from FIREBASE_PROJECT_ID environment variable; required for the
    /// firestore backend, startup aborts when missing
    pub static PROJECT_ID: Lazy<String> =
        Lazy::new(|| env::var("FIREBASE_PROJECT_ID").unwrap_or_else(|_| String::new()));

    /// Storage bucket for uploaded blobs
    /// Read from FIREBASE_STORAGE_BUCKET environment variable
    /// Default: {FIREBASE_PROJECT_ID}.appspot.com
    pub static STORAGE_BUCKET: Lazy<String> = Lazy::new(|| {
        env::var("FIREBASE_STORAGE_BUCKET").unwrap_or_else(|_| format!("{}.appspot.com", *PROJECT_ID))
    });

    /// OAuth bearer token for Firestore/Storage REST calls.
    /// Read from FIREBASE_ACCESS_TOKEN environment variable. Token refresh is
    /// an external concern (metadata server, gcloud, sidecar); unset means
    /// the project's security rules must allow unauthenticated access.
    pub static ACCESS_TOKEN: Lazy<Option<String>> = Lazy::new(|| env::var("FIREBASE_ACCESS_TOKEN").ok());
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Timeout for outbound HTTP requests (Bot API, Firestore, Storage)
    pub const TIMEOUT_SECS: u64 = 60;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(TIMEOUT_SECS)
    }
}

/// Startup retry configuration
pub mod retry {
    use super::Duration;

    /// Maximum attempts to reach the Bot API before giving up at startup
    pub const MAX_STARTUP_RETRIES: u32 = 12;

    /// Delay between startup connection attempts (in seconds)
    pub const STARTUP_RETRY_DELAY_SECS: u64 = 5;

    /// Startup retry delay duration
    pub fn startup_delay() -> Duration {
        Duration::from_secs(STARTUP_RETRY_DELAY_SECS)
    }
}
