use std::{borrow::Cow, fmt};

use http::Method;
use reqwest::IntoUrl;

use crate::{
    signer::DEFAULT_VERSION, RequestBuilder, RequestScheme, Secrets, SignatureMethod, Transport,
};

/// Signs every request it builds with the wrapped secrets, then hands it to
/// the transport.
///
/// A `Client` carries no per-request state: each call to [`Client::request`]
/// starts from an empty query, empty body and no `Authorization` header.
#[derive(Clone)]
pub struct Client<'a> {
    transport: &'a dyn Transport,
    secrets: Secrets<'a>,
    signature_method: SignatureMethod,
    request_scheme: RequestScheme,
    version: Cow<'a, str>,
    realm: Cow<'a, str>,
}

impl<'a> Client<'a> {
    /// HMAC-SHA1 over the `Authorization` header, `oauth_version` 1.0 and an empty realm.
    pub fn new(transport: &'a dyn Transport, secrets: Secrets<'a>) -> Self {
        Client {
            transport,
            secrets,
            signature_method: SignatureMethod::default(),
            request_scheme: RequestScheme::default(),
            version: Cow::Borrowed(DEFAULT_VERSION),
            realm: Cow::Borrowed(""),
        }
    }

    pub fn signature_method(self, signature_method: SignatureMethod) -> Self {
        Client {
            signature_method,
            ..self
        }
    }

    pub fn request_scheme(self, request_scheme: RequestScheme) -> Self {
        Client {
            request_scheme,
            ..self
        }
    }

    pub fn version<T>(self, version: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        Client {
            version: version.into(),
            ..self
        }
    }

    pub fn realm<T>(self, realm: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        Client {
            realm: realm.into(),
            ..self
        }
    }

    pub(crate) fn transport(&self) -> &'a dyn Transport {
        self.transport
    }

    pub(crate) fn secrets(&self) -> &Secrets<'a> {
        &self.secrets
    }

    pub(crate) fn get_signature_method(&self) -> SignatureMethod {
        self.signature_method
    }

    pub(crate) fn get_request_scheme(&self) -> RequestScheme {
        self.request_scheme
    }

    pub(crate) fn get_version(&self) -> &str {
        &self.version
    }

    pub(crate) fn get_realm(&self) -> &str {
        &self.realm
    }

    /// Convenience method to make a `GET` request to a URL.
    ///
    /// # Errors
    ///
    /// An unparsable `Url` is reported when the request is prepared.
    pub fn get<U: IntoUrl>(&self, url: U) -> RequestBuilder<'_> {
        self.request(Method::GET, url)
    }

    /// Convenience method to make a `POST` request to a URL.
    ///
    /// # Errors
    ///
    /// An unparsable `Url` is reported when the request is prepared.
    pub fn post<U: IntoUrl>(&self, url: U) -> RequestBuilder<'_> {
        self.request(Method::POST, url)
    }

    /// Start building a `Request` with the `Method` and `Url`.
    ///
    /// Returns a `RequestBuilder`, which will allow setting headers and
    /// request body before signing.
    pub fn request<U: IntoUrl>(&self, method: Method, url: U) -> RequestBuilder<'_> {
        RequestBuilder::new(self, method, url.into_url())
    }
}

impl fmt::Debug for Client<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("secrets", &self.secrets)
            .field("signature_method", &self.signature_method)
            .field("request_scheme", &self.request_scheme)
            .field("version", &self.version)
            .field("realm", &self.realm)
            .finish()
    }
}
