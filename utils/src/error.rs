use std::path::PathBuf;

use url::Url;

use crate::reqwest::{ReqwestErrorContext, ReqwestInnerError, ReqwestStage};

pub type Result<T> = std::result::Result<T, UtilsError>;

#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    #[error("Address '{0}' is not a valid Ethereum address.")]
    InvalidAddress(String),

    #[error("'{0}' is neither an Ethereum address nor an ENS name.")]
    InvalidSearchQuery(String),

    #[error("ENS name '{0}' was not found or does not resolve to an address.")]
    EnsNameNotFound(String),

    #[error("Failed to resolve ENS name '{name}'. (Error: {error:?})")]
    EnsResolutionFailed {
        name: String,
        error: Box<alloy::contract::Error>,
    },

    #[error("Failed to fetch native balance on {network}. (Error: {error:?})")]
    NativeBalanceFailed {
        network: String,
        error: Box<alloy::transports::RpcError<alloy::transports::TransportErrorKind>>,
    },

    #[error("Covalent API key not set, pass --covalent-api-key or set it in the config.")]
    CovalentApiKeyNotSet,

    #[error("Covalent returned an error for '{url}': {message}")]
    CovalentResponse { url: String, message: String },

    #[error("Covalent returned no data for '{0}'.")]
    CovalentNoData(String),

    #[error("Token balance '{0}' is not an unsigned integer.")]
    InvalidTokenBalance(String),

    #[error(transparent)]
    FormatUnits(#[from] alloy::primitives::utils::UnitsError),

    #[error(transparent)]
    ParseFloatError(#[from] std::num::ParseFloatError),

    #[error("Network not found: {0}.")]
    NetworkNotFound(String),

    #[error("Network {0} has no Covalent chain name configured.")]
    CovalentChainNameNotSet(String),

    #[error("Rpc URL not found for network {network} with chain id {chain_id}. Please add it in the networks.")]
    RpcUrlNotFound { network: String, chain_id: u32 },

    #[error("Failed to get base directories.")]
    BaseDirsFailed,

    #[error("Failed to create directory: {0:?}. (Error: {1:?})")]
    CreateDirAllFailed(PathBuf, std::io::Error),

    #[error("Failed to read the file: {0}. (Error: {1:?})")]
    FileReadFailed(PathBuf, std::io::Error),

    #[error("Failed to write to the file: {0}. (Error: {1:?})")]
    FileWriteFailed(PathBuf, std::io::Error),

    #[error("Parsing the toml file failed: {0}. (Error: {1:?})")]
    TomlParsingFailed(PathBuf, toml::de::Error),

    #[error("Formatting to toml format failed: {0}. (Error: {1:?})")]
    TomlFormattingFailed(String, toml::ser::Error),

    #[error("Parsing the yaml file failed: {0}. (Error: {1:?})")]
    YamlParsingFailed(PathBuf, serde_yaml::Error),

    #[error("Formatting to yaml format failed: {0}. (Error: {1:?})")]
    YamlFormattingFailed(String, serde_yaml::Error),

    #[error("Failed to parse URL: {0}. (Error: {1:?})")]
    UrlParsingFailed(String, url::ParseError),

    #[error(transparent)]
    SerdePathToError(#[from] serde_path_to_error::Error<serde_json::Error>),

    #[error("Please check your internet connection, the URL seems to be unreachable: {0}")]
    Internet(Url),

    #[error("Request '{url}' failed at stage '{stage:?}' (Error='{inner:?}', Context='{context:?}')", url = context.url)]
    ReqwestFailed {
        stage: ReqwestStage,
        context: Box<ReqwestErrorContext>,
        inner: ReqwestInnerError,
    },

    #[error("Reqwest builder missing error context, this is a bug please report it.")]
    ReqwestErrorContextMissing,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Job was cancelled before it produced a result.")]
    JobCancelled,
}

impl UtilsError {
    pub fn is_connect(&self) -> bool {
        match self {
            Self::Internet(_) => true,
            Self::ReqwestFailed { inner, .. } => inner.is_connect(),
            _ => false,
        }
    }
}
