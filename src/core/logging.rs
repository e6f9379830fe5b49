//! Logging initialization and startup configuration checking

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to initialize logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the store and admin configuration at application startup
///
/// Validates and logs:
/// - Selected store backend
/// - Firebase project / bucket configuration
/// - Whether an access token is present
/// - Whether the admin gate is active
pub fn log_store_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("🗄️  Store Configuration Check");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    match config::STORE_BACKEND.as_str() {
        "memory" => {
            log::warn!("⚠️  STORE_BACKEND=memory — all content is volatile and lost on restart");
        }
        backend => {
            log::info!("✅ Store backend: {}", backend);
            if config::firebase::PROJECT_ID.is_empty() {
                log::error!("❌ FIREBASE_PROJECT_ID: not set — startup will abort");
            } else {
                log::info!("✅ FIREBASE_PROJECT_ID: {}", *config::firebase::PROJECT_ID);
                log::info!("✅ Storage bucket: {}", *config::firebase::STORAGE_BUCKET);
            }
            if config::firebase::ACCESS_TOKEN.is_some() {
                log::info!("✅ FIREBASE_ACCESS_TOKEN: present");
            } else {
                log::warn!("⚠️  FIREBASE_ACCESS_TOKEN: not set — requests go out unauthenticated");
            }
        }
    }

    let admin_id = *config::admin::ADMIN_USER_ID;
    if admin_id == 0 {
        log::warn!("⚠️  ADMIN_USER_ID not set — the bot will answer every chat");
    } else {
        log::info!("✅ Admin gate active for user {}", admin_id);
    }
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_creates_log_file() {
        let path = std::env::temp_dir().join("quizdesk_logger_test.log");
        let path_str = path.to_string_lossy().to_string();

        // The global logger may already be set by another test; both outcomes
        // are acceptable here, we only verify the call does not panic.
        let result = init_logger(&path_str);
        assert!(result.is_ok() || result.is_err());

        let _ = std::fs::remove_file(path);
    }
}
