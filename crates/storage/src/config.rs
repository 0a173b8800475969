const DEFAULT_COMPLETION_URL: &str = "https://api.openai.com/v1";

/// Endpoints and keys of the external services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend_url: String,
    /// Public key sent with every backend request.
    pub backend_key: String,
    pub completion_url: String,
    pub completion_key: String,
}

impl Config {
    #[must_use]
    pub fn new(
        backend_url: &str,
        backend_key: &str,
        completion_url: &str,
        completion_key: &str,
    ) -> Self {
        let completion_url = completion_url.trim();
        Self {
            backend_url: backend_url.trim().trim_end_matches('/').to_string(),
            backend_key: backend_key.trim().to_string(),
            completion_url: if completion_url.is_empty() {
                DEFAULT_COMPLETION_URL
            } else {
                completion_url.trim_end_matches('/')
            }
            .to_string(),
            completion_key: completion_key.trim().to_string(),
        }
    }

    /// Read the `VIBEFIT_*` variables set at build time.
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::new(
            option_env!("VIBEFIT_BACKEND_URL").unwrap_or_default(),
            option_env!("VIBEFIT_BACKEND_KEY").unwrap_or_default(),
            option_env!("VIBEFIT_COMPLETION_URL").unwrap_or_default(),
            option_env!("VIBEFIT_COMPLETION_KEY").unwrap_or_default(),
        )
    }

    pub(crate) fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{path}", self.backend_url)
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.backend_url)
    }

    pub(crate) fn storage_url(&self, path: &str) -> String {
        format!("{}/storage/v1/{path}", self.backend_url)
    }

    pub(crate) fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.completion_url)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_build_env()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", DEFAULT_COMPLETION_URL)]
    #[case("  ", DEFAULT_COMPLETION_URL)]
    #[case("http://localhost:8080/v1/", "http://localhost:8080/v1")]
    fn test_completion_url(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(
            Config::new("https://db.test", "key", url, "secret").completion_url,
            expected
        );
    }

    #[test]
    fn test_urls() {
        let config = Config::new(" https://db.test/ ", " key ", "", "secret");
        assert_eq!(config.backend_key, "key");
        assert_eq!(config.rest_url("profiles"), "https://db.test/rest/v1/profiles");
        assert_eq!(
            config.rest_url("rpc/remove_friendship"),
            "https://db.test/rest/v1/rpc/remove_friendship"
        );
        assert_eq!(config.auth_url("logout"), "https://db.test/auth/v1/logout");
        assert_eq!(
            config.storage_url("object/profile-pictures"),
            "https://db.test/storage/v1/object/profile-pictures"
        );
        assert_eq!(
            config.chat_completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }
}
