//! Configuration for rendering résumés and talking to the model.
//!
//! Every knob lives in [`AppConfig`], built via [`AppConfigBuilder`] or
//! loaded with [`AppConfig::from_env`]. The binary maps its CLI flags onto
//! the same builder, so the library, the CLI and the web surface all share
//! one set of defaults.

use crate::error::TalkCvError;
use std::fmt;
use std::path::PathBuf;

/// Default Gemini model. Fast, cheap and vision-capable.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Public Gemini REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Configuration shared by the extractor, the model backends and the server.
///
/// # Example
/// ```rust
/// use talk_to_cv::AppConfig;
///
/// let config = AppConfig::builder()
///     .api_key("AIza...")
///     .model("gemini-1.5-pro")
///     .jpeg_quality(90)
///     .build()
///     .unwrap();
/// assert_eq!(config.model, "gemini-1.5-pro");
/// ```
#[derive(Clone)]
pub struct AppConfig {
    /// Gemini API key. Not validated up front: a missing key only shows up
    /// as an `"Error with Gemini API: …"` result on the first request.
    pub api_key: Option<String>,

    /// Model identifier. Default: `gemini-1.5-flash`.
    pub model: String,

    /// Base URL of the Gemini REST API. Overridable for proxies.
    pub api_base: String,

    /// When set, requests go through the named `edgequake-llm` provider
    /// (e.g. `"openai"`, `"anthropic"`) instead of the native Gemini client.
    pub provider_name: Option<String>,

    /// Maximum rendered image dimension (width or height) in pixels. Default: 2000.
    ///
    /// Caps either dimension and scales the other proportionally, so a
    /// poster-sized page never exhausts memory.
    pub max_rendered_pixels: u32,

    /// JPEG quality for the page image (1–100). Default: 75.
    pub jpeg_quality: u8,

    /// Explicit path to a pdfium shared library. When `None`, the library
    /// is looked up next to the binary and then on the system path.
    pub pdfium_lib_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            provider_name: None,
            max_rendered_pixels: 2000,
            jpeg_quality: 75,
            pdfium_lib_path: None,
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("provider_name", &self.provider_name)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .finish()
    }
}

impl AppConfig {
    /// Create a new builder for `AppConfig`.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder {
            config: Self::default(),
        }
    }

    /// Reopen a built config for further overrides; `build()` re-validates.
    pub fn into_builder(self) -> AppConfigBuilder {
        AppConfigBuilder { config: self }
    }

    /// Load configuration from the process environment.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `GOOGLE_API_KEY` (fallback `GEMINI_API_KEY`) | `api_key` |
    /// | `TALKCV_MODEL` | `model` |
    /// | `TALKCV_API_BASE` | `api_base` |
    /// | `TALKCV_PROVIDER` | `provider_name` |
    /// | `TALKCV_MAX_PIXELS` | `max_rendered_pixels` |
    /// | `TALKCV_JPEG_QUALITY` | `jpeg_quality` |
    /// | `PDFIUM_LIB_PATH` | `pdfium_lib_path` |
    ///
    /// Loading a `.env` file is the caller's job (the binary does it with
    /// `dotenvy` before calling this).
    pub fn from_env() -> Result<Self, TalkCvError> {
        let mut builder = Self::builder();

        if let Some(key) = non_empty_env("GOOGLE_API_KEY").or_else(|| non_empty_env("GEMINI_API_KEY")) {
            builder = builder.api_key(key);
        }
        if let Some(model) = non_empty_env("TALKCV_MODEL") {
            builder = builder.model(model);
        }
        if let Some(base) = non_empty_env("TALKCV_API_BASE") {
            builder = builder.api_base(base);
        }
        if let Some(provider) = non_empty_env("TALKCV_PROVIDER") {
            builder = builder.provider_name(provider);
        }
        if let Some(px) = non_empty_env("TALKCV_MAX_PIXELS") {
            let px = px.parse::<u32>().map_err(|_| {
                TalkCvError::InvalidConfig(format!("TALKCV_MAX_PIXELS must be an integer, got '{px}'"))
            })?;
            builder = builder.max_rendered_pixels(px);
        }
        if let Some(q) = non_empty_env("TALKCV_JPEG_QUALITY") {
            let q = q.parse::<u8>().map_err(|_| {
                TalkCvError::InvalidConfig(format!("TALKCV_JPEG_QUALITY must be 1–100, got '{q}'"))
            })?;
            builder = builder.jpeg_quality(q);
        }
        if let Some(path) = non_empty_env("PDFIUM_LIB_PATH") {
            builder = builder.pdfium_lib_path(path);
        }

        builder.build()
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Builder for [`AppConfig`].
#[derive(Debug)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.config.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn jpeg_quality(mut self, q: u8) -> Self {
        self.config.jpeg_quality = q.clamp(1, 100);
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AppConfig, TalkCvError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(TalkCvError::InvalidConfig("Model must not be empty".into()));
        }
        if !(c.api_base.starts_with("http://") || c.api_base.starts_with("https://")) {
            return Err(TalkCvError::InvalidConfig(format!(
                "API base must be an HTTP/HTTPS URL, got '{}'",
                c.api_base
            )));
        }
        Ok(self.config)
    }
}
