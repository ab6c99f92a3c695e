use std::{
    borrow::Cow,
    fmt,
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::RngCore;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer as _};
use rsa::RsaPrivateKey;
use sha1::Sha1;
use tracing::trace;
use url::Url;

use crate::{
    ConfigError, SecretsProvider, SignError, SignResult, OAUTH_CALLBACK_KEY, OAUTH_CONSUMER_KEY,
    OAUTH_KEY_PREFIX, OAUTH_NONCE_KEY, OAUTH_SIGNATURE_KEY, OAUTH_SIGNATURE_METHOD_KEY,
    OAUTH_TIMESTAMP_KEY, OAUTH_TOKEN_KEY, OAUTH_VERIFIER_KEY, OAUTH_VERSION_KEY, REALM_KEY,
};

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters (`A-Z a-z 0-9 - . _ ~`) pass through untouched.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Default `oauth_version` value.
pub const DEFAULT_VERSION: &str = "1.0";

/// The three signature methods defined by OAuth Core 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SignatureMethod {
    #[default]
    HmacSha1,
    RsaSha1,
    Plaintext,
}

impl SignatureMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            SignatureMethod::HmacSha1 => "HMAC-SHA1",
            SignatureMethod::RsaSha1 => "RSA-SHA1",
            SignatureMethod::Plaintext => "PLAINTEXT",
        }
    }

    /// Signs `base_string`.
    ///
    /// For RSA-SHA1 `consumer_secret` must hold a PEM encoded private key and
    /// `token_secret` is ignored.
    pub fn sign(
        self,
        base_string: &str,
        consumer_secret: &str,
        token_secret: Option<&str>,
    ) -> SignResult<String> {
        self.sign_with_key(base_string, consumer_secret, token_secret, None)
    }

    /// Like [`SignatureMethod::sign`], but RSA-SHA1 uses `private_key` when
    /// given instead of parsing `consumer_secret` again.
    pub fn sign_with_key(
        self,
        base_string: &str,
        consumer_secret: &str,
        token_secret: Option<&str>,
        private_key: Option<&RsaPrivateKey>,
    ) -> SignResult<String> {
        match self {
            SignatureMethod::HmacSha1 => {
                let key = signing_key(consumer_secret, token_secret);
                let mut mac = HmacSha1::new_from_slice(key.as_bytes())
                    .map_err(|_| SignError::InvalidKeyLength)?;
                mac.update(base_string.as_bytes());
                Ok(BASE64.encode(mac.finalize().into_bytes()))
            }
            SignatureMethod::RsaSha1 => {
                let key = match private_key {
                    Some(key) => key.clone(),
                    None => load_private_key(consumer_secret)?,
                };
                let signature = SigningKey::<Sha1>::new(key).try_sign(base_string.as_bytes())?;
                Ok(BASE64.encode(signature.to_bytes()))
            }
            SignatureMethod::Plaintext => Ok(signing_key(consumer_secret, token_secret)),
        }
    }
}

impl FromStr for SignatureMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HMAC-SHA1" => Ok(SignatureMethod::HmacSha1),
            "RSA-SHA1" => Ok(SignatureMethod::RsaSha1),
            "PLAINTEXT" => Ok(SignatureMethod::Plaintext),
            _ => Err(ConfigError::UnknownSignatureMethod(s.to_string())),
        }
    }
}

impl fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn signing_key(consumer_secret: &str, token_secret: Option<&str>) -> String {
    format!(
        "{}&{}",
        url_encode(consumer_secret),
        url_encode(token_secret.unwrap_or_default())
    )
}

/// Reads an RSA private key from PKCS#8 or PKCS#1 PEM.
pub fn load_private_key(pem: &str) -> SignResult<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|_| SignError::InvalidPrivateKey)
}

/// 128 random bits, hex encoded.
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Current Unix time in seconds.
pub fn generate_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
        .to_string()
}

/// Percent-encodes `s` per RFC 3986 with uppercase hex digits. Space becomes `%20`.
pub fn url_encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

/// Encodes every pair, sorts by encoded key then encoded value and joins them
/// as `k1=v1&k2=v2`. Repeated keys keep one entry each.
pub fn normalize_parameters<I, K, V>(params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut encoded: Vec<(String, String)> = params
        .into_iter()
        .map(|(k, v)| (url_encode(k.as_ref()), url_encode(v.as_ref())))
        .collect();
    encoded.sort();
    encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// `scheme://host[:port]/path` with default ports, query and fragment removed.
pub fn normalize_base_url(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.set_fragment(None);
    // default ports are already dropped by the parser
    url.to_string()
}

/// Builds the signature base string from an already normalized parameter string.
pub fn base_string(method: &str, url: &Url, normalized_params: &str) -> String {
    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        url_encode(&normalize_base_url(url)),
        url_encode(normalized_params)
    )
}

fn header_rank(key: &str) -> u8 {
    match key {
        OAUTH_CONSUMER_KEY => 0,
        OAUTH_NONCE_KEY => 1,
        OAUTH_SIGNATURE_METHOD_KEY => 2,
        OAUTH_TIMESTAMP_KEY => 3,
        OAUTH_VERSION_KEY => 4,
        OAUTH_TOKEN_KEY => 5,
        OAUTH_CALLBACK_KEY => 6,
        OAUTH_VERIFIER_KEY => 7,
        OAUTH_SIGNATURE_KEY => u8::MAX,
        _ => 8,
    }
}

/// Formats the `Authorization` header value.
///
/// Only `oauth_*` pairs are emitted, realm first and signature last:
/// `OAuth realm="",oauth_consumer_key="..",oauth_nonce="..",oauth_signature_method="..",
/// oauth_timestamp="..",oauth_version="..",oauth_token="..",oauth_callback="..",oauth_signature=".."`.
pub fn to_authorization_header<K, V>(params: &[(K, V)], realm: &str) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut fields: Vec<(&str, &str)> = params
        .iter()
        .map(|(k, v)| (k.as_ref(), v.as_ref()))
        .filter(|(k, _)| k.starts_with(OAUTH_KEY_PREFIX))
        .collect();
    fields.sort_by_key(|(k, _)| header_rank(k));

    let mut header = format!("OAuth {}=\"{}\"", REALM_KEY, escape_quoted(realm));
    for (key, value) in fields {
        header.push_str(&format!(",{}=\"{}\"", url_encode(key), url_encode(value)));
    }
    header
}

/// Escapes `"` and `\` so the value stays inside its quoted-string.
fn escape_quoted(value: &str) -> Cow<'_, str> {
    if value.contains(|c: char| c == '"' || c == '\\') {
        let mut escaped = String::with_capacity(value.len() + 2);
        for c in value.chars() {
            if c == '"' || c == '\\' {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(value)
    }
}

/// Computes the protocol parameters for one request.
#[derive(Debug, Clone)]
pub struct Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    secrets: &'a TSecretsProvider,
    signature_method: SignatureMethod,
    version: &'a str,
    parameters: OAuthParameters<'a>,
}

impl<'a, TSecretsProvider> Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    pub fn new(
        secrets: &'a TSecretsProvider,
        signature_method: SignatureMethod,
        version: &'a str,
        parameters: OAuthParameters<'a>,
    ) -> Self {
        Signer {
            secrets,
            signature_method,
            version,
            parameters,
        }
    }

    /// Returns the ordered `oauth_*` set for the request, `oauth_signature` last.
    ///
    /// `request_params` are the query and form parameters that travel with the
    /// request; they are covered by the signature but not returned.
    pub fn assemble_parameters(
        &self,
        method: &str,
        url: &Url,
        request_params: &[(String, String)],
    ) -> SignResult<Vec<(String, String)>> {
        let (consumer_key, consumer_secret) = self.secrets.get_consumer_key_pair();
        let (token, token_secret) = self.secrets.get_token_option_pair();

        let mut oauth: Vec<(String, String)> = vec![
            (OAUTH_CONSUMER_KEY.into(), consumer_key.into()),
            (OAUTH_NONCE_KEY.into(), self.parameters.resolve_nonce()),
            (
                OAUTH_SIGNATURE_METHOD_KEY.into(),
                self.signature_method.as_str().into(),
            ),
            (OAUTH_TIMESTAMP_KEY.into(), self.parameters.resolve_timestamp()),
            (OAUTH_VERSION_KEY.into(), self.version.into()),
        ];
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            oauth.push((OAUTH_TOKEN_KEY.into(), token.into()));
        }
        if let Some(ref callback) = self.parameters.callback {
            oauth.push((OAUTH_CALLBACK_KEY.into(), callback.to_string()));
        }
        if let Some(ref verifier) = self.parameters.verifier {
            oauth.push((OAUTH_VERIFIER_KEY.into(), verifier.to_string()));
        }

        let signable = oauth.iter().chain(
            request_params
                .iter()
                .filter(|(k, _)| k != REALM_KEY && k != OAUTH_SIGNATURE_KEY),
        );
        let normalized = normalize_parameters(signable.map(|(k, v)| (k, v)));
        let base = base_string(method, url, &normalized);
        trace!(base_string = %base, "computed signature base string");

        let signature = self.signature_method.sign_with_key(
            &base,
            consumer_secret,
            token_secret,
            self.secrets.get_private_key(),
        )?;
        oauth.push((OAUTH_SIGNATURE_KEY.into(), signature));
        Ok(oauth)
    }

    /// Generates the complete `Authorization` header value.
    pub fn generate_signature(
        &self,
        method: &str,
        url: &Url,
        request_params: &[(String, String)],
    ) -> SignResult<String> {
        let params = self.assemble_parameters(method, url, request_params)?;
        Ok(to_authorization_header(&params, self.realm()))
    }

    pub fn realm(&self) -> &str {
        self.parameters.realm.as_deref().unwrap_or_default()
    }
}

/// Per-request protocol values. Nonce and timestamp are generated when unset.
#[derive(Debug, Clone, Default)]
pub struct OAuthParameters<'a> {
    callback: Option<Cow<'a, str>>,
    nonce: Option<Cow<'a, str>>,
    realm: Option<Cow<'a, str>>,
    timestamp: Option<u64>,
    verifier: Option<Cow<'a, str>>,
}

impl<'a> OAuthParameters<'a> {
    pub fn new() -> Self {
        Default::default()
    }

    /// set the oauth_callback value
    pub fn callback<T>(self, callback: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            callback: Some(callback.into()),
            ..self
        }
    }

    /// set the oauth_nonce value
    pub fn nonce<T>(self, nonce: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            nonce: Some(nonce.into()),
            ..self
        }
    }

    /// set the realm value
    pub fn realm<T>(self, realm: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            realm: Some(realm.into()),
            ..self
        }
    }

    /// set the oauth_timestamp value
    pub fn timestamp<T>(self, timestamp: T) -> Self
    where
        T: Into<u64>,
    {
        OAuthParameters {
            timestamp: Some(timestamp.into()),
            ..self
        }
    }

    /// set the oauth_verifier value
    pub fn verifier<T>(self, verifier: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            verifier: Some(verifier.into()),
            ..self
        }
    }

    pub(crate) fn has_realm(&self) -> bool {
        self.realm.is_some()
    }

    fn resolve_nonce(&self) -> String {
        match self.nonce {
            Some(ref nonce) => nonce.to_string(),
            None => generate_nonce(),
        }
    }

    fn resolve_timestamp(&self) -> String {
        match self.timestamp {
            Some(timestamp) => timestamp.to_string(),
            None => generate_timestamp(),
        }
    }
}
