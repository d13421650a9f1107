pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    UtilsError(#[from] av_utils::Error),

    #[error("Network '{0}' not found in your networks file.")]
    NetworkNotFound(String),

    #[error("Failed to render QR code. (Error: {0:?})")]
    QrCode(#[from] qrcode::types::QrError),

    #[error("Failed to serialize the balance history. (Error: {0:?})")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_connect(&self) -> bool {
        matches!(self, Error::UtilsError(e) if e.is_connect())
    }
}
