use std::{fmt, str::FromStr};

use http::Method;
use rsa::RsaPrivateKey;
use url::Url;

use crate::{
    signer::{load_private_key, DEFAULT_VERSION},
    ConfigError, ConfigResult, SignatureMethod,
};

/// HTTP method used for the token endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequestMethod {
    Get,
    #[default]
    Post,
}

impl RequestMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
        }
    }
}

impl FromStr for RequestMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(RequestMethod::Get),
            "POST" => Ok(RequestMethod::Post),
            _ => Err(ConfigError::UnknownRequestMethod(s.to_string())),
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RequestMethod> for Method {
    fn from(method: RequestMethod) -> Self {
        match method {
            RequestMethod::Get => Method::GET,
            RequestMethod::Post => Method::POST,
        }
    }
}

/// Where the signed `oauth_*` parameters travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequestScheme {
    /// `Authorization: OAuth ...`
    #[default]
    Header,
    /// Merged into the `application/x-www-form-urlencoded` body.
    PostBody,
    /// Merged into the URL query.
    QueryString,
}

impl RequestScheme {
    pub const fn as_str(self) -> &'static str {
        match self {
            RequestScheme::Header => "header",
            RequestScheme::PostBody => "postbody",
            RequestScheme::QueryString => "querystring",
        }
    }
}

impl FromStr for RequestScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "header" => Ok(RequestScheme::Header),
            "postbody" => Ok(RequestScheme::PostBody),
            "querystring" => Ok(RequestScheme::QueryString),
            _ => Err(ConfigError::UnknownRequestScheme(s.to_string())),
        }
    }
}

impl fmt::Display for RequestScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn parse_absolute_url(field: &'static str, value: &str) -> ConfigResult<Url> {
    let url = Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() || !url.has_host() {
        return Err(ConfigError::NotAbsoluteUrl {
            field,
            value: value.to_string(),
        });
    }
    Ok(url)
}

/// Parses the RSA key up front so a bad secret fails at configuration time.
fn private_key_for(
    method: SignatureMethod,
    consumer_secret: &str,
) -> ConfigResult<Option<RsaPrivateKey>> {
    match method {
        SignatureMethod::RsaSha1 => load_private_key(consumer_secret)
            .map(Some)
            .map_err(|_| ConfigError::InvalidPrivateKey),
        _ => Ok(None),
    }
}

fn non_empty(value: String, err: ConfigError) -> ConfigResult<String> {
    if value.is_empty() {
        Err(err)
    } else {
        Ok(value)
    }
}

/// Validated consumer settings.
///
/// Every setter validates its input first; a rejected value leaves the
/// previous one in place.
#[derive(Clone, PartialEq, Eq)]
pub struct ConsumerConfig {
    consumer_key: String,
    consumer_secret: String,
    signature_method: SignatureMethod,
    request_method: RequestMethod,
    request_scheme: RequestScheme,
    version: String,
    realm: String,
    callback_url: Option<String>,
    request_token_url: Option<Url>,
    user_authorization_url: Option<Url>,
    access_token_url: Option<Url>,
    private_key: Option<RsaPrivateKey>,
}

impl ConsumerConfig {
    pub fn builder() -> ConsumerConfigBuilder {
        ConsumerConfigBuilder::default()
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// Shared secret, or the PEM encoded private key with RSA-SHA1.
    pub fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    pub fn signature_method(&self) -> SignatureMethod {
        self.signature_method
    }

    pub fn request_method(&self) -> RequestMethod {
        self.request_method
    }

    pub fn request_scheme(&self) -> RequestScheme {
        self.request_scheme
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// The callback exactly as configured; it is sent verbatim as `oauth_callback`.
    pub fn callback_url(&self) -> Option<&str> {
        self.callback_url.as_deref()
    }

    pub fn request_token_url(&self) -> Option<&Url> {
        self.request_token_url.as_ref()
    }

    pub fn user_authorization_url(&self) -> Option<&Url> {
        self.user_authorization_url.as_ref()
    }

    pub fn access_token_url(&self) -> Option<&Url> {
        self.access_token_url.as_ref()
    }

    pub fn set_consumer_key<T: Into<String>>(&mut self, key: T) -> ConfigResult<()> {
        self.consumer_key = non_empty(key.into(), ConfigError::MissingConsumerKey)?;
        Ok(())
    }

    /// RSA key loaded from the consumer secret when signing with RSA-SHA1.
    pub fn private_key(&self) -> Option<&RsaPrivateKey> {
        self.private_key.as_ref()
    }

    /// With RSA-SHA1 the secret must be a PEM encoded private key.
    pub fn set_consumer_secret<T: Into<String>>(&mut self, secret: T) -> ConfigResult<()> {
        let secret = non_empty(secret.into(), ConfigError::MissingConsumerSecret)?;
        self.private_key = private_key_for(self.signature_method, &secret)?;
        self.consumer_secret = secret;
        Ok(())
    }

    /// Accepts any letter case; reads back canonical (`rsa-sha1` -> `RSA-SHA1`).
    ///
    /// Switching to RSA-SHA1 requires the consumer secret to hold the private
    /// key already.
    pub fn set_signature_method(&mut self, method: &str) -> ConfigResult<()> {
        let method = method.parse()?;
        self.private_key = private_key_for(method, &self.consumer_secret)?;
        self.signature_method = method;
        Ok(())
    }

    pub fn set_request_method(&mut self, method: &str) -> ConfigResult<()> {
        self.request_method = method.parse()?;
        Ok(())
    }

    pub fn set_request_scheme(&mut self, scheme: &str) -> ConfigResult<()> {
        self.request_scheme = scheme.parse()?;
        Ok(())
    }

    pub fn set_version<T: Into<String>>(&mut self, version: T) {
        self.version = version.into();
    }

    pub fn set_realm<T: Into<String>>(&mut self, realm: T) {
        self.realm = realm.into();
    }

    pub fn set_callback_url(&mut self, url: &str) -> ConfigResult<()> {
        parse_absolute_url("callback_url", url)?;
        self.callback_url = Some(url.to_string());
        Ok(())
    }

    pub fn set_request_token_url(&mut self, url: &str) -> ConfigResult<()> {
        self.request_token_url = Some(parse_absolute_url("request_token_url", url)?);
        Ok(())
    }

    pub fn set_user_authorization_url(&mut self, url: &str) -> ConfigResult<()> {
        self.user_authorization_url = Some(parse_absolute_url("user_authorization_url", url)?);
        Ok(())
    }

    pub fn set_access_token_url(&mut self, url: &str) -> ConfigResult<()> {
        self.access_token_url = Some(parse_absolute_url("access_token_url", url)?);
        Ok(())
    }
}

impl fmt::Debug for ConsumerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerConfig")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("signature_method", &self.signature_method)
            .field("request_method", &self.request_method)
            .field("request_scheme", &self.request_scheme)
            .field("version", &self.version)
            .field("realm", &self.realm)
            .field("callback_url", &self.callback_url)
            .field("request_token_url", &self.request_token_url)
            .field("user_authorization_url", &self.user_authorization_url)
            .field("access_token_url", &self.access_token_url)
            .finish()
    }
}

/// Collects raw settings; [`ConsumerConfigBuilder::build`] validates them all at once.
#[derive(Debug, Clone, Default)]
pub struct ConsumerConfigBuilder {
    consumer_key: Option<String>,
    consumer_secret: Option<String>,
    signature_method: Option<String>,
    request_method: Option<String>,
    request_scheme: Option<String>,
    version: Option<String>,
    realm: Option<String>,
    callback_url: Option<String>,
    request_token_url: Option<String>,
    user_authorization_url: Option<String>,
    access_token_url: Option<String>,
}

macro_rules! builder_setters {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name<T: Into<String>>(self, value: T) -> Self {
                ConsumerConfigBuilder {
                    $name: Some(value.into()),
                    ..self
                }
            }
        )*
    };
}

impl ConsumerConfigBuilder {
    builder_setters!(
        consumer_key,
        /// Shared secret, or the PEM encoded private key with RSA-SHA1.
        consumer_secret,
        /// `HMAC-SHA1` (default), `RSA-SHA1` or `PLAINTEXT`, any letter case.
        signature_method,
        /// `GET` or `POST` (default).
        request_method,
        /// `header` (default), `postbody` or `querystring`.
        request_scheme,
        /// `oauth_version`, `1.0` by default.
        version,
        realm,
        callback_url,
        request_token_url,
        user_authorization_url,
        access_token_url,
    );

    pub fn build(self) -> ConfigResult<ConsumerConfig> {
        let parse_url = |field: &'static str, value: Option<String>| {
            value
                .map(|value| parse_absolute_url(field, &value))
                .transpose()
        };

        let consumer_key = non_empty(
            self.consumer_key.unwrap_or_default(),
            ConfigError::MissingConsumerKey,
        )?;
        let consumer_secret = non_empty(
            self.consumer_secret.unwrap_or_default(),
            ConfigError::MissingConsumerSecret,
        )?;
        let signature_method = self
            .signature_method
            .as_deref()
            .map(str::parse::<SignatureMethod>)
            .transpose()?
            .unwrap_or_default();
        let private_key = private_key_for(signature_method, &consumer_secret)?;
        if let Some(ref callback_url) = self.callback_url {
            parse_absolute_url("callback_url", callback_url)?;
        }

        Ok(ConsumerConfig {
            consumer_key,
            consumer_secret,
            signature_method,
            request_method: self
                .request_method
                .as_deref()
                .map(str::parse::<RequestMethod>)
                .transpose()?
                .unwrap_or_default(),
            request_scheme: self
                .request_scheme
                .as_deref()
                .map(str::parse::<RequestScheme>)
                .transpose()?
                .unwrap_or_default(),
            version: self.version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            realm: self.realm.unwrap_or_default(),
            callback_url: self.callback_url,
            request_token_url: parse_url("request_token_url", self.request_token_url)?,
            user_authorization_url: parse_url(
                "user_authorization_url",
                self.user_authorization_url,
            )?,
            access_token_url: parse_url("access_token_url", self.access_token_url)?,
            private_key,
        })
    }
}
