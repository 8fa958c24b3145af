//! Configuration for the Xcode Cloud client.

use std::time::Duration;

use url::Url;

/// Production App Store Connect API endpoint.
pub const APP_STORE_CONNECT_API_BASE: &str = "https://api.appstoreconnect.apple.com";

/// Configuration for [`crate::XcodeCloudClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the App Store Connect API.
    pub base_url: Url,
    /// Transport-level request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration with the given base URL and default timeout.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(30),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        // The constant is a valid URL; parsing it cannot fail.
        Self::new(Url::parse(APP_STORE_CONNECT_API_BASE).expect("valid base URL"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();

        assert_eq!(config.base_url.as_str(), "https://api.appstoreconnect.apple.com/");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
