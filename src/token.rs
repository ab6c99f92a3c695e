use std::{collections::HashMap, ops::Deref};

use serde::{Deserialize, Serialize};

use crate::{
    signer::url_encode, TokenReaderError, TokenReaderResult, OAUTH_CALLBACK_CONFIRMED_KEY,
    OAUTH_TOKEN_KEY, OAUTH_TOKEN_SECRET_KEY, OAUTH_VERIFIER_KEY,
};

/// Token and secret issued by a provider plus whatever else it sent along.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "oauth_token")]
    token: String,
    #[serde(rename = "oauth_token_secret", default)]
    token_secret: String,
    #[serde(flatten)]
    params: HashMap<String, String>,
}

impl Token {
    /// Restores a token obtained earlier, e.g. from storage.
    pub fn new<TToken, TSecret>(token: TToken, token_secret: TSecret) -> Self
    where
        TToken: Into<String>,
        TSecret: Into<String>,
    {
        Token {
            token: token.into(),
            token_secret: token_secret.into(),
            params: HashMap::new(),
        }
    }

    /// Parses a `key=value&key2=value2` response body.
    ///
    /// A missing or empty `oauth_token` is an error.
    pub fn parse(body: &str) -> TokenReaderResult<Self> {
        let mut destructured: HashMap<String, String> =
            url::form_urlencoded::parse(body.trim().as_bytes())
                .into_owned()
                .collect();
        let token = destructured
            .remove(OAUTH_TOKEN_KEY)
            .ok_or_else(|| TokenReaderError::TokenKeyNotFound(OAUTH_TOKEN_KEY, body.to_string()))?;
        if token.is_empty() {
            return Err(TokenReaderError::EmptyToken(OAUTH_TOKEN_KEY, body.to_string()));
        }
        let token_secret = destructured
            .remove(OAUTH_TOKEN_SECRET_KEY)
            .unwrap_or_default();
        Ok(Token {
            token,
            token_secret,
            params: destructured,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn token_secret(&self) -> &str {
        &self.token_secret
    }

    /// Looks up any response parameter, including `oauth_token` and `oauth_token_secret`.
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            OAUTH_TOKEN_KEY => Some(&self.token),
            OAUTH_TOKEN_SECRET_KEY => Some(&self.token_secret),
            _ => self.params.get(name).map(String::as_str),
        }
    }

    /// Parameters other than the token and its secret.
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn is_valid(&self) -> bool {
        !self.token.is_empty()
    }

    /// Encodes the token back into the form [`Token::parse`] reads.
    pub fn to_query_string(&self) -> String {
        let mut extras: Vec<(&String, &String)> = self.params.iter().collect();
        extras.sort();

        [
            (OAUTH_TOKEN_KEY, self.token.as_str()),
            (OAUTH_TOKEN_SECRET_KEY, self.token_secret.as_str()),
        ]
        .iter()
        .copied()
        .chain(extras.into_iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .map(|(k, v)| format!("{}={}", url_encode(k), url_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
    }
}

/// Short-lived token returned by the request-token endpoint.
///
/// Carries whether the provider confirmed the callback (OAuth 1.0a), so later
/// steps of the same flow can act on it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestToken {
    #[serde(flatten)]
    token: Token,
}

impl RequestToken {
    pub fn parse(body: &str) -> TokenReaderResult<Self> {
        Ok(RequestToken {
            token: Token::parse(body)?,
        })
    }

    /// `true` when the provider answered with `oauth_callback_confirmed=true`.
    pub fn provider_supports_1_0a(&self) -> bool {
        self.token.get(OAUTH_CALLBACK_CONFIRMED_KEY) == Some("true")
    }

    pub fn into_inner(self) -> Token {
        self.token
    }
}

impl From<Token> for RequestToken {
    fn from(token: Token) -> Self {
        RequestToken { token }
    }
}

impl Deref for RequestToken {
    type Target = Token;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

/// Long-lived token used to sign protected resource requests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    #[serde(flatten)]
    token: Token,
}

impl AccessToken {
    pub fn parse(body: &str) -> TokenReaderResult<Self> {
        Ok(AccessToken {
            token: Token::parse(body)?,
        })
    }

    pub fn into_inner(self) -> Token {
        self.token
    }
}

impl From<Token> for AccessToken {
    fn from(token: Token) -> Self {
        AccessToken { token }
    }
}

impl Deref for AccessToken {
    type Target = Token;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

/// Parameters the provider appends to the callback URL once the user authorized
/// the request token.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthorizedRequest {
    token: Option<String>,
    verifier: Option<String>,
    params: HashMap<String, String>,
}

impl AuthorizedRequest {
    /// Reads the callback query string (without the leading `?`).
    pub fn from_query(query: &str) -> Self {
        Self::from_pairs(
            url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()).into_owned(),
        )
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        AuthorizedRequest {
            token: params.remove(OAUTH_TOKEN_KEY),
            verifier: params.remove(OAUTH_VERIFIER_KEY),
            params,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The 1.0a `oauth_verifier`, absent with OAuth 1.0 providers.
    pub fn verifier(&self) -> Option<&str> {
        self.verifier.as_deref()
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Checks that the provider authorized `request_token` and not some other token.
    pub fn validate(&self, request_token: &RequestToken) -> TokenReaderResult<()> {
        match self.token() {
            Some(token) if !token.is_empty() => {
                if token == request_token.token() {
                    Ok(())
                } else {
                    Err(TokenReaderError::TokenMismatch {
                        expected: request_token.token().to_string(),
                        actual: token.to_string(),
                    })
                }
            }
            _ => Err(TokenReaderError::TokenKeyNotFound(
                OAUTH_TOKEN_KEY,
                format!("{:?}", self.params),
            )),
        }
    }
}
