use std::net::SocketAddr;

use oauth2::{AuthUrl, ClientId, ClientSecret, RedirectUrl, Scope, TokenUrl};
use oauth2::url::Url;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v1/userinfo";

/// Must match a redirect URI registered with the provider.
pub const REDIRECT_URL: &str = "http://localhost:8000/auth/callback";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_SCOPES: &[&str] = &["openid", "profile", "email"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name}: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: oauth2::url::ParseError,
    },

    #[error("LISTEN_ADDR is not a socket address: {0:?}")]
    InvalidListenAddr(String),

    #[error("{name} is not a boolean: {value:?}")]
    InvalidBool { name: &'static str, value: String },
}

/// The three provider endpoints the login flow talks to.
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    pub auth_url: AuthUrl,
    pub token_url: TokenUrl,
    pub userinfo_url: Url,
}

impl ProviderEndpoints {
    pub fn google() -> Result<Self, ConfigError> {
        Self::new(GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL, GOOGLE_USERINFO_URL)
    }

    /// Roots every endpoint under `base`, using Google's paths. Used to aim
    /// the service at a stand-in provider.
    pub fn with_base(base: &str) -> Result<Self, ConfigError> {
        let base = base.trim_end_matches('/');
        Self::new(
            &format!("{base}/o/oauth2/v2/auth"),
            &format!("{base}/token"),
            &format!("{base}/oauth2/v1/userinfo"),
        )
    }

    fn new(auth_url: &str, token_url: &str, userinfo_url: &str) -> Result<Self, ConfigError> {
        let auth_url = AuthUrl::new(auth_url.to_string())
            .map_err(|source| ConfigError::InvalidUrl { name: "authorization url", source })?;
        let token_url = TokenUrl::new(token_url.to_string())
            .map_err(|source| ConfigError::InvalidUrl { name: "token url", source })?;
        let userinfo_url = Url::parse(userinfo_url)
            .map_err(|source| ConfigError::InvalidUrl { name: "userinfo url", source })?;

        Ok(Self {
            auth_url,
            token_url,
            userinfo_url,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client_id: Option<ClientId>,
    pub client_secret: Option<ClientSecret>,
    pub redirect_url: RedirectUrl,
    pub scopes: Vec<Scope>,
    pub endpoints: ProviderEndpoints,
    pub listen_addr: SocketAddr,
    /// Fail the callback with 401 when the token endpoint hands back no
    /// access token, instead of fetching the profile without one.
    pub require_access_token: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        use dotenvy::dotenv;
        use std::env;

        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let client_id = non_empty("GOOGLE_CLIENT_ID").map(ClientId::new);
        let client_secret = non_empty("GOOGLE_CLIENT_SECRET").map(ClientSecret::new);

        let listen_addr = non_empty("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = listen_addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidListenAddr(listen_addr.clone()))?;

        let require_access_token = match non_empty("OAUTH_REQUIRE_ACCESS_TOKEN") {
            Some(value) => parse_bool("OAUTH_REQUIRE_ACCESS_TOKEN", &value)?,
            None => false,
        };

        Ok(Self {
            listen_addr,
            require_access_token,
            ..Self::new(client_id, client_secret, ProviderEndpoints::google()?)?
        })
    }

    /// A configuration with default scopes, redirect and listen address.
    pub fn new(
        client_id: Option<ClientId>,
        client_secret: Option<ClientSecret>,
        endpoints: ProviderEndpoints,
    ) -> Result<Self, ConfigError> {
        let redirect_url = RedirectUrl::new(REDIRECT_URL.to_string())
            .map_err(|source| ConfigError::InvalidUrl { name: "redirect url", source })?;
        let listen_addr = DEFAULT_LISTEN_ADDR
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidListenAddr(DEFAULT_LISTEN_ADDR.to_string()))?;

        Ok(Self {
            client_id,
            client_secret,
            redirect_url,
            scopes: DEFAULT_SCOPES.iter().map(|s| Scope::new(s.to_string())).collect(),
            endpoints,
            listen_addr,
            require_access_token: false,
        })
    }

    pub fn client_id_str(&self) -> &str {
        self.client_id.as_ref().map(|id| id.as_str()).unwrap_or_default()
    }

    pub fn client_secret_str(&self) -> &str {
        self.client_secret
            .as_ref()
            .map(|secret| secret.secret().as_str())
            .unwrap_or_default()
    }

    /// Space separated, in the order they were configured.
    pub fn scope_param(&self) -> String {
        self.scopes
            .iter()
            .map(|scope| scope.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            name,
            value: value.to_string(),
        }),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn reads_credentials_and_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("GOOGLE_CLIENT_ID", "abc.apps.googleusercontent.com"),
            ("GOOGLE_CLIENT_SECRET", "shh"),
        ]))
        .unwrap();

        assert_eq!(config.client_id_str(), "abc.apps.googleusercontent.com");
        assert_eq!(config.client_secret_str(), "shh");
        assert_eq!(config.redirect_url.as_str(), REDIRECT_URL);
        assert_eq!(config.scope_param(), "openid profile email");
        assert_eq!(config.listen_addr.port(), 8000);
        assert!(!config.require_access_token);
        assert_eq!(config.endpoints.token_url.as_str(), GOOGLE_TOKEN_URL);
    }

    #[test]
    fn missing_credentials_are_not_an_error() {
        let config = AppConfig::from_lookup(lookup(&[("GOOGLE_CLIENT_ID", "")])).unwrap();

        assert!(config.client_id.is_none());
        assert!(config.client_secret.is_none());
        assert_eq!(config.client_id_str(), "");
        assert_eq!(config.client_secret_str(), "");
    }

    #[test]
    fn secret_is_redacted_in_debug_output() {
        let config = AppConfig::from_lookup(lookup(&[("GOOGLE_CLIENT_SECRET", "hunter2")])).unwrap();

        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn parses_listen_addr_and_strict_mode() {
        let config = AppConfig::from_lookup(lookup(&[
            ("LISTEN_ADDR", "127.0.0.1:9001"),
            ("OAUTH_REQUIRE_ACCESS_TOKEN", "TRUE"),
        ]))
        .unwrap();

        assert_eq!(config.listen_addr.to_string(), "127.0.0.1:9001");
        assert!(config.require_access_token);
    }

    #[test]
    fn rejects_bad_values() {
        let err = AppConfig::from_lookup(lookup(&[("LISTEN_ADDR", "localhost")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidListenAddr(_)));

        let err =
            AppConfig::from_lookup(lookup(&[("OAUTH_REQUIRE_ACCESS_TOKEN", "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBool { .. }));
    }

    #[test]
    fn base_override_keeps_provider_paths() {
        let endpoints = ProviderEndpoints::with_base("http://127.0.0.1:4444/").unwrap();

        assert_eq!(endpoints.auth_url.as_str(), "http://127.0.0.1:4444/o/oauth2/v2/auth");
        assert_eq!(endpoints.token_url.as_str(), "http://127.0.0.1:4444/token");
        assert_eq!(endpoints.userinfo_url.as_str(), "http://127.0.0.1:4444/oauth2/v1/userinfo");
    }
}
