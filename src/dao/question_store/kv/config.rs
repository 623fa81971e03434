/// Runtime configuration describing how to reach the REST key-value store.
#[derive(Debug, Clone)]
pub struct KvConfig {
    /// Base URL of the REST endpoint, without a trailing slash.
    pub base_url: String,
    /// Bearer token used to authenticate every request.
    pub token: String,
}

impl KvConfig {
    /// Construct a configuration from an explicit endpoint and token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
        }
    }
}
