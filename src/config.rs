/// Backend used by `cargo build` / `trunk serve` during development.
pub const DEV_API_BASE: &str = "http://localhost:8000";

/// Where the backend API lives. Fixed when the client is built; there is no
/// runtime override.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self { base_url: base_url.trim_end_matches('/').to_string() }
    }

    /// Reads `PDF_LENS_API_URL` at compile time. Without it, debug builds talk
    /// to the local backend and release builds to the origin serving the page.
    pub fn from_build_env() -> Self {
        match option_env!("PDF_LENS_API_URL") {
            Some(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ if cfg!(debug_assertions) => Self::new(DEV_API_BASE),
            _ => Self::new(""),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `path` onto the base URL. An empty base yields an origin-relative path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_build_env()
    }
}
