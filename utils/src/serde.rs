use serde::de::DeserializeOwned;

pub type SerdePathError = serde_path_to_error::Error<serde_json::Error>;

/// Parses a response body reporting the JSON path of the first mismatch,
/// which is far more useful than serde_json's line/column for API payloads.
pub trait SerdeResponseParseAsync {
    type Error;

    fn serde_parse_custom<T>(
        self,
    ) -> impl std::future::Future<Output = Result<T, Self::Error>> + Send
    where
        T: DeserializeOwned;
}

impl SerdeResponseParseAsync for &str {
    type Error = SerdePathError;

    async fn serde_parse_custom<T>(self) -> Result<T, SerdePathError>
    where
        T: DeserializeOwned,
    {
        serde_response_parse::<T>(self)
    }
}

pub fn serde_response_parse<T>(s: &str) -> Result<T, SerdePathError>
where
    T: DeserializeOwned,
{
    serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_str(s))
}
