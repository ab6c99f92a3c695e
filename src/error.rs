use std::error::Error as StdError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
pub type SignResult<T> = std::result::Result<T, SignError>;
pub type TokenReaderResult<T> = std::result::Result<T, TokenReaderError>;
pub type TransportResult<T> = std::result::Result<T, TransportError>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration : {0}")]
    Config(#[from] ConfigError),
    #[error("token acquisition failed : {0}")]
    TokenReader(#[from] TokenReaderError),
    #[error("OAuth sign failed : {0}")]
    Signer(#[from] SignError),
    #[error("request failed : {0}")]
    Transport(#[from] TransportError),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.into())
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Error::Transport(err.into())
    }
}

/// Rejected configuration values. The previous value is always left in place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("consumer key must not be empty.")]
    MissingConsumerKey,
    #[error("consumer secret must not be empty.")]
    MissingConsumerSecret,
    #[error("unsupported signature method {0}, must be one of HMAC-SHA1, RSA-SHA1 or PLAINTEXT.")]
    UnknownSignatureMethod(String),
    #[error("unsupported request method {0}, must be GET or POST.")]
    UnknownRequestMethod(String),
    #[error("unsupported request scheme {0}, must be one of header, postbody or querystring.")]
    UnknownRequestScheme(String),
    #[error("{field} is not a valid URL ({value}) : {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{field} must be an absolute URL, but {value} is not.")]
    NotAbsoluteUrl { field: &'static str, value: String },
    #[error("{0} is not configured.")]
    MissingEndpoint(&'static str),
    #[error("OAuth parameters are configured to travel in the POST body, but the request method is {0}.")]
    SchemeMethodMismatch(String),
    #[error("RSA-SHA1 needs a PKCS#8 or PKCS#1 PEM encoded private key as consumer secret.")]
    InvalidPrivateKey,
}

#[derive(Error, Debug)]
pub enum SignError {
    #[error("consumer secret is not a PKCS#8 or PKCS#1 PEM encoded RSA private key.")]
    InvalidPrivateKey,
    #[error("RSA-SHA1 signing failed : {0}")]
    Rsa(#[from] rsa::signature::Error),
    #[error("HMAC-SHA1 key could not be initialized.")]
    InvalidKeyLength,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenReaderError {
    #[error("response has malformed format: not found {0} in {1}")]
    TokenKeyNotFound(&'static str, String),
    #[error("authorized token {actual} does not match the request token {expected}.")]
    TokenMismatch { expected: String, actual: String },
    #[error("no request token is available; obtain one before continuing the flow.")]
    MissingRequestToken,
    #[error("response carries an empty {0} : {1}")]
    EmptyToken(&'static str, String),
    #[error("provider rejected the token request with status {status} : {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("request could not be built : {0}")]
    Http(#[from] http::Error),
    #[error(transparent)]
    Other(Box<dyn StdError + Send + Sync>),
}

impl TransportError {
    /// Wraps an error raised by a custom [`Transport`](crate::Transport).
    pub fn other<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        TransportError::Other(Box::new(err))
    }
}
