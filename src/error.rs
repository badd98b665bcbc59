use thiserror::Error;

/// Every failure the app can surface. Payloads are plain strings so the
/// error stays `Clone` and can be stored in component state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("file is too large ({size} bytes); the limit is {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("unsupported image: {0}")]
    UnsupportedImage(String),

    #[error("image processing failed: {0}")]
    ImageProcessing(String),

    #[error("crop region is empty")]
    DegenerateCrop,

    #[error("network error: {0}")]
    Network(String),

    #[error("server responded {status}: {message}")]
    Server { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Deserialization(String),

    #[error("browser API unavailable: {0}")]
    Browser(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Server { status: 404, .. })
    }

    /// Converts a thrown JS value into a browser error.
    pub fn from_js(value: wasm_bindgen::JsValue) -> Self {
        AppError::Browser(
            value
                .as_string()
                .unwrap_or_else(|| format!("{:?}", value)),
        )
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::ImageProcessing(err.to_string())
    }
}

impl From<gloo_net::Error> for AppError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => AppError::Deserialization(e.to_string()),
            other => AppError::Network(other.to_string()),
        }
    }
}
