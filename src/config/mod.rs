//! Configuration module for the Himawari backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the GitHub REST API
    pub github_api_url: String,
    /// Personal access token for the content repository (required in production)
    pub github_token: Option<String>,
    /// Owner of the content repository
    pub github_owner: String,
    /// Name of the content repository
    pub github_repo: String,
    /// Branch that content commits land on
    pub github_branch: String,
    /// Admin login name
    pub admin_user: String,
    /// Argon2 PHC hash of the admin password (login is disabled without it)
    pub admin_pass_hash: Option<String>,
    /// HMAC secret for session tokens (login is disabled without it)
    pub session_secret: Option<String>,
    /// Mark session/CSRF cookies as Secure (enable behind HTTPS)
    pub cookie_secure: bool,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let github_api_url = env::var("GITHUB_API_URL")
            .unwrap_or_else(|_| "https://api.github.com".to_string());

        let github_token = env::var("GITHUB_TOKEN").ok();

        let github_owner = env::var("GITHUB_OWNER").unwrap_or_default();
        let github_repo = env::var("GITHUB_REPO").unwrap_or_default();
        let github_branch = env::var("GITHUB_BRANCH").unwrap_or_else(|_| "main".to_string());

        let admin_user = env::var("ADMIN_USER").unwrap_or_else(|_| "admin".to_string());
        let admin_pass_hash = env::var("ADMIN_PASS_HASH").ok();
        let session_secret = env::var("SESSION_SECRET").ok();

        let cookie_secure = env::var("HIMAWARI_COOKIE_SECURE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let bind_addr = env::var("HIMAWARI_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid HIMAWARI_BIND_ADDR format");

        let log_level = env::var("HIMAWARI_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            github_api_url,
            github_token,
            github_owner,
            github_repo,
            github_branch,
            admin_user,
            admin_pass_hash,
            session_secret,
            cookie_secure,
            bind_addr,
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("GITHUB_API_URL");
        env::remove_var("GITHUB_TOKEN");
        env::remove_var("GITHUB_OWNER");
        env::remove_var("GITHUB_REPO");
        env::remove_var("GITHUB_BRANCH");
        env::remove_var("ADMIN_USER");
        env::remove_var("ADMIN_PASS_HASH");
        env::remove_var("SESSION_SECRET");
        env::remove_var("HIMAWARI_COOKIE_SECURE");
        env::remove_var("HIMAWARI_BIND_ADDR");
        env::remove_var("HIMAWARI_LOG_LEVEL");

        let config = Config::from_env();

        assert_eq!(config.github_api_url, "https://api.github.com");
        assert!(config.github_token.is_none());
        assert_eq!(config.github_branch, "main");
        assert_eq!(config.admin_user, "admin");
        assert!(config.admin_pass_hash.is_none());
        assert!(config.session_secret.is_none());
        assert!(!config.cookie_secure);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
    }
}
