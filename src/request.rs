// ----------------------------------------------------------------------------
// This source code contains derived artifacts from seanmonstar's `reqwest`.
// for further information(including license information),
// please visit their repository: https://github.com/seanmonstar/reqwest .
// ----------------------------------------------------------------------------
use std::convert::TryFrom;

use http::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::{
    signer::{to_authorization_header, url_encode},
    Client, ConfigError, Error, OAuthParameters, RequestScheme, Result, Signer, TransportError,
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A request under construction. Query and form parameters set here are
/// covered by the OAuth signature.
pub struct RequestBuilder<'a> {
    client: &'a Client<'a>,
    method: Method,
    url: reqwest::Result<Url>,
    headers: HeaderMap,
    body: Option<String>,
    is_form: bool,
    parameters: OAuthParameters<'a>,
    error: Option<Error>,
}

impl<'a> RequestBuilder<'a> {
    pub(crate) fn new(client: &'a Client<'a>, method: Method, url: reqwest::Result<Url>) -> Self {
        RequestBuilder {
            client,
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            is_form: false,
            parameters: OAuthParameters::new(),
            error: None,
        }
    }

    fn record_error<E: Into<Error>>(&mut self, err: E) {
        if self.error.is_none() {
            self.error = Some(err.into());
        }
    }

    /// Overrides per-request protocol values such as the nonce, the timestamp,
    /// the realm, `oauth_callback` or `oauth_verifier`.
    pub fn oauth_params(self, parameters: OAuthParameters<'a>) -> Self {
        RequestBuilder { parameters, ..self }
    }

    /// Modify the query string of the URL.
    ///
    /// Modifies the URL of this request, adding the parameters provided.
    /// This method appends and does not overwrite. This means that it can
    /// be called multiple times and that existing query parameters are not
    /// overwritten if the same key is used. The key will simply show up
    /// twice in the query string.
    /// Calling `.query(&[("foo", "a"), ("foo", "b")])` gives `"foo=a&foo=b"`.
    ///
    /// # Errors
    /// Preparing the request fails if the object you provide cannot be
    /// serialized into a query string.
    pub fn query<T: Serialize + ?Sized>(mut self, query: &T) -> Self {
        let mut failure = None;
        if let Ok(ref mut url) = self.url {
            {
                let mut pairs = url.query_pairs_mut();
                let serializer = serde_urlencoded::Serializer::new(&mut pairs);
                if let Err(err) = query.serialize(serializer) {
                    failure = Some(err);
                }
            }
            // cleanup
            if let Some("") = url.query() {
                url.set_query(None);
            }
        }
        if let Some(err) = failure {
            self.record_error(TransportError::other(err));
        }
        self
    }

    /// Send a form body.
    ///
    /// Sets `Content-Type: application/x-www-form-urlencoded` unless a
    /// content type was set explicitly.
    pub fn form<T: Serialize + ?Sized>(mut self, form: &T) -> Self {
        match serde_urlencoded::to_string(form) {
            Ok(body) => {
                self.body = Some(body);
                self.is_form = true;
            }
            Err(err) => self.record_error(TransportError::other(err)),
        }
        self
    }

    /// Set a raw request body. Raw bodies are not part of the signature.
    pub fn body<T: Into<String>>(mut self, body: T) -> Self {
        self.body = Some(body.into());
        self.is_form = false;
        self
    }

    /// Add a `Header` to this Request.
    pub fn header<K, V>(mut self, key: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        match HeaderName::try_from(key) {
            Ok(key) => match HeaderValue::try_from(value) {
                Ok(value) => {
                    self.headers.append(key, value);
                }
                Err(err) => self.record_error::<http::Error>(err.into()),
            },
            Err(err) => self.record_error::<http::Error>(err.into()),
        }
        self
    }

    /// Add a set of Headers to the existing ones on this Request.
    ///
    /// The headers will be merged in to any already set.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Signs the request and returns it without sending.
    ///
    /// Only the `Authorization` header (or the `oauth_*` body/query pairs) is
    /// added; every other header set by the caller is kept as is.
    pub fn prepare_oauth(self) -> Result<http::Request<String>> {
        let RequestBuilder {
            client,
            method,
            url,
            mut headers,
            mut body,
            mut is_form,
            mut parameters,
            error,
        } = self;
        if let Some(err) = error {
            return Err(err);
        }
        let mut url = url?;

        let scheme = client.get_request_scheme();
        if scheme == RequestScheme::PostBody && method != Method::POST {
            return Err(ConfigError::SchemeMethodMismatch(method.to_string()).into());
        }

        let mut request_params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        if let (true, Some(form)) = (is_form, body.as_ref()) {
            request_params.extend(url::form_urlencoded::parse(form.as_bytes()).into_owned());
        }

        if !parameters.has_realm() {
            parameters = parameters.realm(client.get_realm());
        }
        let signer = Signer::new(
            client.secrets(),
            client.get_signature_method(),
            client.get_version(),
            parameters,
        );
        let oauth = signer.assemble_parameters(method.as_str(), &url, &request_params)?;

        match scheme {
            RequestScheme::Header => {
                let value = HeaderValue::from_str(&to_authorization_header(&oauth, signer.realm()))
                    .map_err(http::Error::from)?;
                headers.insert(AUTHORIZATION, value);
            }
            RequestScheme::PostBody => {
                body = Some(append_pairs(body.as_deref(), &oauth));
                is_form = true;
            }
            RequestScheme::QueryString => {
                let query = append_pairs(url.query(), &oauth);
                url.set_query(Some(&query));
            }
        }

        if is_form && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        }

        let mut request = http::Request::builder()
            .method(method)
            .uri(url.as_str())
            .body(body.unwrap_or_default())?;
        *request.headers_mut() = headers;

        debug!(
            method = %request.method(),
            url = %normalized_for_log(&url),
            scheme = %scheme,
            "signed OAuth request"
        );
        Ok(request)
    }

    /// Signs the request and sends it through the client's transport.
    ///
    /// # Errors
    ///
    /// Transport failures are returned unchanged; nothing is retried.
    pub fn send(self) -> Result<http::Response<String>> {
        let transport = self.client.transport();
        let request = self.prepare_oauth()?;
        Ok(transport.execute(request)?)
    }
}

fn append_pairs(existing: Option<&str>, pairs: &[(String, String)]) -> String {
    let encoded = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", url_encode(k), url_encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    match existing {
        Some(existing) if !existing.is_empty() => format!("{}&{}", existing, encoded),
        _ => encoded,
    }
}

// the query may carry oauth_* values under the querystring scheme
fn normalized_for_log(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}
