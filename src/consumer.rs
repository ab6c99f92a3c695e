//! The three-legged token exchange.
//!
//! A [`Consumer`] moves from *configured* to *has-request-token* to
//! *has-access-token*:
//!
//! 1. [`Consumer::get_request_token`] signs a request to the request-token
//!    endpoint and returns a [`RequestToken`].
//! 2. [`Consumer::get_redirect_url`] composes the URL the user is sent to.
//! 3. [`Consumer::get_access_token`] exchanges the authorized request token
//!    for an [`AccessToken`].
//!
//! Whether the provider speaks OAuth 1.0a is learned from the request-token
//! response and travels with the [`RequestToken`] value, so flows running
//! side by side never see each other's answer.

use std::{fmt, sync::Arc};

use tracing::{debug, warn};
use url::Url;

use crate::{
    signer::url_encode, transport::default_transport, AccessToken, AuthorizedRequest, Client,
    ConfigError, ConsumerConfig, OAuthParameters, RequestMethod, RequestToken, Result, Secrets,
    Token, TokenReaderError, Transport, OAUTH_CALLBACK_KEY, OAUTH_TOKEN_KEY,
    OUT_OF_BAND_CALLBACK,
};

/// Where a [`Consumer`] stands in the token exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Configured,
    HasRequestToken,
    HasAccessToken,
}

pub struct Consumer {
    config: ConsumerConfig,
    transport: Arc<dyn Transport>,
    last_request_token: Option<RequestToken>,
    last_access_token: Option<AccessToken>,
}

impl Consumer {
    /// Uses the default reqwest transport.
    pub fn new(config: ConsumerConfig) -> Self {
        Consumer::with_transport(config, default_transport())
    }

    pub fn with_transport(config: ConsumerConfig, transport: Arc<dyn Transport>) -> Self {
        Consumer {
            config,
            transport,
            last_request_token: None,
            last_access_token: None,
        }
    }

    pub fn config(&self) -> &ConsumerConfig {
        &self.config
    }

    /// Setters on the returned config validate their input; rejected values
    /// leave the current configuration untouched.
    pub fn config_mut(&mut self) -> &mut ConsumerConfig {
        &mut self.config
    }

    pub fn set_transport(&mut self, transport: Arc<dyn Transport>) {
        self.transport = transport;
    }

    /// Goes back to a fresh default transport.
    pub fn reset_transport(&mut self) {
        self.transport = default_transport();
    }

    pub fn state(&self) -> FlowState {
        if self.last_access_token.is_some() {
            FlowState::HasAccessToken
        } else if self.last_request_token.is_some() {
            FlowState::HasRequestToken
        } else {
            FlowState::Configured
        }
    }

    /// Discards cached tokens so a new flow can start.
    pub fn reset(&mut self) {
        self.last_request_token = None;
        self.last_access_token = None;
    }

    pub fn last_request_token(&self) -> Option<&RequestToken> {
        self.last_request_token.as_ref()
    }

    pub fn last_access_token(&self) -> Option<&AccessToken> {
        self.last_access_token.as_ref()
    }

    /// Signed client for protected resource calls made with `access_token`.
    pub fn client<'a>(&'a self, access_token: &'a AccessToken) -> Client<'a> {
        self.client_for(self.transport.as_ref(), Some(&**access_token))
    }

    fn client_for<'a>(&'a self, transport: &'a dyn Transport, token: Option<&'a Token>) -> Client<'a> {
        let mut secrets = Secrets::new(self.config.consumer_key(), self.config.consumer_secret());
        if let Some(token) = token {
            secrets = secrets.token(token.token(), token.token_secret());
        }
        if let Some(private_key) = self.config.private_key() {
            secrets = secrets.private_key(private_key);
        }
        Client::new(transport, secrets)
            .signature_method(self.config.signature_method())
            .request_scheme(self.config.request_scheme())
            .version(self.config.version())
            .realm(self.config.realm())
    }

    /// Obtains a request token.
    ///
    /// `params` are extra provider-specific parameters (e.g. `scope`). They are
    /// sent in the query for GET and in the form body for POST. `oauth_callback`
    /// carries the configured callback URL, or `oob` when none is set.
    ///
    /// A new request token starts a new flow, so any cached access token is
    /// dropped.
    pub fn get_request_token(
        &mut self,
        params: &[(&str, &str)],
        method: Option<RequestMethod>,
        transport: Option<&dyn Transport>,
    ) -> Result<RequestToken> {
        let url = self
            .config
            .request_token_url()
            .ok_or(ConfigError::MissingEndpoint("request_token_url"))?;
        let callback = self
            .config
            .callback_url()
            .unwrap_or(OUT_OF_BAND_CALLBACK);
        let oauth = OAuthParameters::new().callback(callback);

        let body = self.execute_leg(url, None, oauth, params, method, transport)?;
        let token = RequestToken::parse(&body)?;
        debug!(
            url = %url,
            supports_1_0a = token.provider_supports_1_0a(),
            "obtained request token"
        );

        self.last_request_token = Some(token.clone());
        self.last_access_token = None;
        Ok(token)
    }

    /// Composes the user authorization URL:
    /// `<user_authorization_url>?oauth_token=..[&oauth_callback=..][&params..]`.
    ///
    /// `request_token` defaults to the last one obtained. `oauth_callback` is
    /// only added when that token did not confirm the callback, i.e. for
    /// OAuth 1.0 providers; `params` follow in the given order.
    pub fn get_redirect_url(
        &self,
        params: &[(&str, &str)],
        request_token: Option<&RequestToken>,
    ) -> Result<String> {
        self.get_redirect_url_with(params, request_token, compose_redirect_url)
    }

    /// Like [`Consumer::get_redirect_url`], but `build` turns the
    /// authorization endpoint and the ordered query pairs into the final URL.
    pub fn get_redirect_url_with<F>(
        &self,
        params: &[(&str, &str)],
        request_token: Option<&RequestToken>,
        build: F,
    ) -> Result<String>
    where
        F: FnOnce(&Url, &[(&str, &str)]) -> String,
    {
        let url = self
            .config
            .user_authorization_url()
            .ok_or(ConfigError::MissingEndpoint("user_authorization_url"))?;
        let token = request_token
            .or_else(|| self.last_request_token.as_ref())
            .ok_or(TokenReaderError::MissingRequestToken)?;

        let mut pairs: Vec<(&str, &str)> = vec![(OAUTH_TOKEN_KEY, token.token())];
        if !token.provider_supports_1_0a() {
            if let Some(callback) = self.config.callback_url() {
                pairs.push((OAUTH_CALLBACK_KEY, callback));
            }
        }
        pairs.extend(params.iter().copied());

        let redirect = build(url, &pairs);
        debug!(url = %url, "composed user authorization URL");
        Ok(redirect)
    }

    /// Exchanges the authorized request token for an access token.
    ///
    /// `authorized` holds the parameters the provider sent to the callback;
    /// its `oauth_token` must match `request_token`. A 1.0a `oauth_verifier`
    /// is signed into the request.
    pub fn get_access_token(
        &mut self,
        authorized: &AuthorizedRequest,
        request_token: &RequestToken,
        method: Option<RequestMethod>,
        transport: Option<&dyn Transport>,
    ) -> Result<AccessToken> {
        authorized.validate(request_token)?;
        let url = self
            .config
            .access_token_url()
            .ok_or(ConfigError::MissingEndpoint("access_token_url"))?;

        let mut oauth = OAuthParameters::new();
        match authorized.verifier() {
            Some(verifier) => oauth = oauth.verifier(verifier),
            None if request_token.provider_supports_1_0a() => {
                warn!("provider confirmed the callback but sent no oauth_verifier")
            }
            None => {}
        }

        let body = self.execute_leg(url, Some(&**request_token), oauth, &[], method, transport)?;
        let token = AccessToken::parse(&body)?;
        debug!(url = %url, "obtained access token");

        self.last_request_token = Some(request_token.clone());
        self.last_access_token = Some(token.clone());
        Ok(token)
    }

    fn execute_leg(
        &self,
        url: &Url,
        token: Option<&Token>,
        oauth: OAuthParameters<'_>,
        params: &[(&str, &str)],
        method: Option<RequestMethod>,
        transport: Option<&dyn Transport>,
    ) -> Result<String> {
        let transport = transport.unwrap_or_else(|| self.transport.as_ref());
        let client = self.client_for(transport, token);
        let method = method.unwrap_or_else(|| self.config.request_method());

        let builder = client.request(method.into(), url.clone()).oauth_params(oauth);
        let builder = match method {
            RequestMethod::Get => builder.query(params),
            RequestMethod::Post => builder.form(params),
        };
        let response = builder.send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(TokenReaderError::Rejected {
                status: status.as_u16(),
                body: response.into_body(),
            }
            .into());
        }
        Ok(response.into_body())
    }
}

fn compose_redirect_url(url: &Url, pairs: &[(&str, &str)]) -> String {
    let query = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", url_encode(k), url_encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    let separator = if url.query().is_some() { '&' } else { '?' };
    format!("{}{}{}", url.as_str(), separator, query)
}

impl fmt::Debug for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("consumer_key", &self.config.consumer_key())
            .field("signature_method", &self.config.signature_method())
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use http::header::AUTHORIZATION;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Error, TransportResult};

    /// Records every request and answers with a canned body.
    struct RecordingTransport {
        status: u16,
        body: &'static str,
        requests: Mutex<Vec<http::Request<String>>>,
    }

    impl RecordingTransport {
        fn replying(body: &'static str) -> Arc<Self> {
            Arc::new(RecordingTransport {
                status: 200,
                body,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn failing(status: u16, body: &'static str) -> Arc<Self> {
            Arc::new(RecordingTransport {
                status,
                body,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn last_request(&self) -> (String, String, String, String) {
            let requests = self.requests.lock().unwrap();
            let request = requests.last().unwrap();
            (
                request.method().to_string(),
                request.uri().to_string(),
                request
                    .headers()
                    .get(AUTHORIZATION)
                    .map(|v| v.to_str().unwrap().to_string())
                    .unwrap_or_default(),
                request.body().clone(),
            )
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl Transport for RecordingTransport {
        fn execute(
            &self,
            request: http::Request<String>,
        ) -> TransportResult<http::Response<String>> {
            self.requests.lock().unwrap().push(request);
            let mut response = http::Response::new(self.body.to_string());
            *response.status_mut() = http::StatusCode::from_u16(self.status).unwrap();
            Ok(response)
        }
    }

    fn config() -> ConsumerConfig {
        ConsumerConfig::builder()
            .consumer_key("12345")
            .consumer_secret("54321")
            .callback_url("http://www.example.com/local")
            .request_token_url("http://www.example.com/request")
            .user_authorization_url("http://www.example.com/authorize")
            .access_token_url("http://www.example.com/access")
            .build()
            .unwrap()
    }

    fn consumer(transport: Arc<RecordingTransport>) -> Consumer {
        Consumer::with_transport(config(), transport)
    }

    #[test]
    fn request_token_is_parsed_and_cached() {
        let transport = RecordingTransport::replying(
            "oauth_token=rt&oauth_token_secret=rs&oauth_callback_confirmed=true",
        );
        let mut consumer = consumer(transport.clone());
        assert_eq!(consumer.state(), FlowState::Configured);
        assert!(consumer.last_request_token().is_none());

        let token = consumer
            .get_request_token(&[("scope", "read write")], None, None)
            .unwrap();
        assert_eq!(token.token(), "rt");
        assert_eq!(token.token_secret(), "rs");
        assert!(token.provider_supports_1_0a());
        assert_eq!(consumer.last_request_token(), Some(&token));
        assert_eq!(consumer.state(), FlowState::HasRequestToken);

        let (method, uri, authorization, body) = transport.last_request();
        assert_eq!(method, "POST");
        assert_eq!(uri, "http://www.example.com/request");
        assert_eq!(body, "scope=read+write");
        assert!(authorization.starts_with("OAuth realm=\"\",oauth_consumer_key=\"12345\","));
        assert!(authorization
            .contains(",oauth_callback=\"http%3A%2F%2Fwww.example.com%2Flocal\",oauth_signature="));
        assert!(!authorization.contains("oauth_token="));
    }

    #[test]
    fn request_token_defaults_to_out_of_band_callback() {
        let transport = RecordingTransport::replying("oauth_token=rt&oauth_token_secret=rs");
        let mut config = ConsumerConfig::builder()
            .consumer_key("12345")
            .consumer_secret("54321")
            .request_token_url("http://www.example.com/request")
            .build()
            .unwrap();
        config.set_request_method("GET").unwrap();
        let mut consumer = Consumer::with_transport(config, transport.clone());

        consumer.get_request_token(&[], None, None).unwrap();
        let (method, uri, authorization, _) = transport.last_request();
        assert_eq!(method, "GET");
        assert_eq!(uri, "http://www.example.com/request");
        assert!(authorization.contains(",oauth_callback=\"oob\","));
    }

    #[test]
    fn request_token_honours_overrides() {
        let default = RecordingTransport::replying("oauth_token=unused");
        let other = RecordingTransport::replying("oauth_token=other");
        let mut consumer = consumer(default.clone());

        let token = consumer
            .get_request_token(
                &[("scope", "a")],
                Some(RequestMethod::Get),
                Some(other.as_ref() as &dyn Transport),
            )
            .unwrap();
        assert_eq!(token.token(), "other");
        assert_eq!(default.request_count(), 0);
        assert_eq!(other.request_count(), 1);

        let (method, uri, _, body) = other.last_request();
        assert_eq!(method, "GET");
        assert_eq!(uri, "http://www.example.com/request?scope=a");
        assert_eq!(body, "");
    }

    #[test]
    fn request_token_without_endpoint_fails() {
        let transport = RecordingTransport::replying("oauth_token=rt");
        let config = ConsumerConfig::builder()
            .consumer_key("12345")
            .consumer_secret("54321")
            .build()
            .unwrap();
        let mut consumer = Consumer::with_transport(config, transport.clone());

        let err = consumer.get_request_token(&[], None, None).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingEndpoint("request_token_url"))
        ));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn request_token_requires_oauth_token_in_response() {
        let transport = RecordingTransport::replying("oauth_problem=signature_invalid");
        let mut consumer = consumer(transport);

        let err = consumer.get_request_token(&[], None, None).unwrap_err();
        assert!(matches!(
            err,
            Error::TokenReader(TokenReaderError::TokenKeyNotFound("oauth_token", _))
        ));
        assert!(consumer.last_request_token().is_none());
    }

    #[test]
    fn provider_rejection_is_surfaced() {
        let transport = RecordingTransport::failing(401, "oauth_problem=consumer_key_unknown");
        let mut consumer = consumer(transport);

        let err = consumer.get_request_token(&[], None, None).unwrap_err();
        assert!(matches!(
            err,
            Error::TokenReader(TokenReaderError::Rejected { status: 401, .. })
        ));
    }

    #[test]
    fn redirect_url_for_legacy_provider_carries_callback() {
        let consumer = consumer(RecordingTransport::replying(""));
        let token = RequestToken::parse("oauth_token=123456&oauth_token_secret=654321").unwrap();

        let url = consumer
            .get_redirect_url(&[("foo", "bar")], Some(&token))
            .unwrap();
        assert_eq!(
            url,
            "http://www.example.com/authorize?oauth_token=123456&oauth_callback=http%3A%2F%2Fwww.example.com%2Flocal&foo=bar"
        );
    }

    #[test]
    fn redirect_url_for_1_0a_provider_omits_callback() {
        let transport = RecordingTransport::replying(
            "oauth_token=123456&oauth_token_secret=654321&oauth_callback_confirmed=true",
        );
        let mut consumer = consumer(transport);
        consumer.get_request_token(&[], None, None).unwrap();

        let url = consumer
            .get_redirect_url(&[("b", "2"), ("a", "1")], None)
            .unwrap();
        assert_eq!(
            url,
            "http://www.example.com/authorize?oauth_token=123456&b=2&a=1"
        );
    }

    #[test]
    fn redirect_url_keeps_existing_query() {
        let mut config = config();
        config
            .set_user_authorization_url("http://www.example.com/authorize?lang=en")
            .unwrap();
        let consumer = Consumer::with_transport(config, RecordingTransport::replying(""));
        let token = RequestToken::parse("oauth_token=t&oauth_callback_confirmed=true").unwrap();

        let url = consumer.get_redirect_url(&[], Some(&token)).unwrap();
        assert_eq!(url, "http://www.example.com/authorize?lang=en&oauth_token=t");
    }

    #[test]
    fn redirect_url_with_custom_builder() {
        let consumer = consumer(RecordingTransport::replying(""));
        let token = RequestToken::parse("oauth_token=t&oauth_callback_confirmed=true").unwrap();

        let url = consumer
            .get_redirect_url_with(&[("x", "y")], Some(&token), |endpoint, pairs| {
                let keys: Vec<&str> = pairs.iter().map(|(k, _)| *k).collect();
                format!("{}#{}", endpoint.path(), keys.join(","))
            })
            .unwrap();
        assert_eq!(url, "/authorize#oauth_token,x");
    }

    #[test]
    fn redirect_url_requires_request_token() {
        let consumer = consumer(RecordingTransport::replying(""));
        let err = consumer.get_redirect_url(&[], None).unwrap_err();
        assert!(matches!(
            err,
            Error::TokenReader(TokenReaderError::MissingRequestToken)
        ));
    }

    #[test]
    fn capability_signal_is_per_flow() {
        let confirmed = RecordingTransport::replying(
            "oauth_token=a&oauth_token_secret=s&oauth_callback_confirmed=true",
        );
        let legacy = RecordingTransport::replying("oauth_token=b&oauth_token_secret=s");
        let mut first = consumer(confirmed);
        let mut second = consumer(legacy);

        let first_token = first.get_request_token(&[], None, None).unwrap();
        let second_token = second.get_request_token(&[], None, None).unwrap();

        assert!(!first
            .get_redirect_url(&[], Some(&first_token))
            .unwrap()
            .contains("oauth_callback"));
        assert!(second
            .get_redirect_url(&[], Some(&second_token))
            .unwrap()
            .contains("oauth_callback"));
    }

    #[test]
    fn access_token_exchange() {
        let transport = RecordingTransport::replying(
            "oauth_token=at&oauth_token_secret=as&screen_name=someone",
        );
        let mut consumer = consumer(transport.clone());
        let request_token = RequestToken::parse(
            "oauth_token=token&oauth_token_secret=secret&oauth_callback_confirmed=true",
        )
        .unwrap();
        let authorized = AuthorizedRequest::from_query("oauth_token=token&oauth_verifier=v3r");

        let token = consumer
            .get_access_token(&authorized, &request_token, None, None)
            .unwrap();
        assert_eq!(token.token(), "at");
        assert_eq!(token.token_secret(), "as");
        assert_eq!(token.get("screen_name"), Some("someone"));
        assert_eq!(consumer.last_access_token(), Some(&token));
        assert_eq!(consumer.last_request_token(), Some(&request_token));
        assert_eq!(consumer.state(), FlowState::HasAccessToken);

        let (method, uri, authorization, _) = transport.last_request();
        assert_eq!(method, "POST");
        assert_eq!(uri, "http://www.example.com/access");
        assert!(authorization.contains(",oauth_token=\"token\",oauth_verifier=\"v3r\",oauth_signature="));
        assert!(!authorization.contains("oauth_callback"));

        consumer.reset();
        assert_eq!(consumer.state(), FlowState::Configured);
        assert!(consumer.last_access_token().is_none());
    }

    #[test]
    fn empty_token_responses_are_rejected() {
        let empty = RecordingTransport::replying("oauth_token=&oauth_token_secret=");
        let mut consumer = consumer(empty.clone());

        let err = consumer.get_request_token(&[], None, None).unwrap_err();
        assert!(matches!(
            err,
            Error::TokenReader(TokenReaderError::EmptyToken("oauth_token", _))
        ));
        assert!(consumer.last_request_token().is_none());
        assert!(matches!(
            consumer.get_redirect_url(&[], None).unwrap_err(),
            Error::TokenReader(TokenReaderError::MissingRequestToken)
        ));

        let request_token = RequestToken::from(Token::new("token", "secret"));
        let authorized = AuthorizedRequest::from_query("oauth_token=token&oauth_verifier=v");
        let err = consumer
            .get_access_token(&authorized, &request_token, None, None)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::TokenReader(TokenReaderError::EmptyToken("oauth_token", _))
        ));
        assert!(consumer.last_access_token().is_none());
        assert_eq!(consumer.state(), FlowState::Configured);
    }

    #[test]
    fn new_request_token_starts_a_new_flow() {
        let request = RecordingTransport::replying("oauth_token=token&oauth_token_secret=s");
        let access = RecordingTransport::replying("oauth_token=at&oauth_token_secret=as");
        let mut consumer = consumer(request.clone());

        let request_token = consumer.get_request_token(&[], None, None).unwrap();
        let authorized = AuthorizedRequest::from_query("oauth_token=token");
        consumer
            .get_access_token(
                &authorized,
                &request_token,
                None,
                Some(access.as_ref() as &dyn Transport),
            )
            .unwrap();
        assert_eq!(consumer.state(), FlowState::HasAccessToken);

        consumer.get_request_token(&[], None, None).unwrap();
        assert_eq!(consumer.state(), FlowState::HasRequestToken);
        assert!(consumer.last_access_token().is_none());
        assert_eq!(request.request_count(), 2);
    }

    #[test]
    fn callback_is_sent_as_configured() {
        let transport = RecordingTransport::replying("oauth_token=t&oauth_token_secret=s");
        let mut consumer = consumer(transport.clone());
        consumer
            .config_mut()
            .set_callback_url("http://www.example.com")
            .unwrap();

        let token = consumer.get_request_token(&[], None, None).unwrap();
        let (_, _, authorization, _) = transport.last_request();
        assert!(authorization.contains(",oauth_callback=\"http%3A%2F%2Fwww.example.com\","));

        let url = consumer.get_redirect_url(&[], Some(&token)).unwrap();
        assert_eq!(
            url,
            "http://www.example.com/authorize?oauth_token=t&oauth_callback=http%3A%2F%2Fwww.example.com"
        );
    }

    #[test]
    fn rsa_consumer_signs_with_configured_key() {
        let transport = RecordingTransport::replying("oauth_token=t&oauth_token_secret=s");
        let mut config = config();
        config
            .set_consumer_secret(include_str!("../tests/fixtures/rsa_pkcs1.pem"))
            .unwrap();
        config.set_signature_method("rsa-sha1").unwrap();
        let mut consumer = Consumer::with_transport(config, transport.clone());

        consumer.get_request_token(&[], None, None).unwrap();
        let (_, _, authorization, _) = transport.last_request();
        assert!(authorization.contains(",oauth_signature_method=\"RSA-SHA1\","));
        assert!(authorization.contains(",oauth_signature=\""));
    }

    #[test]
    fn access_token_rejects_mismatched_token() {
        let transport = RecordingTransport::replying("oauth_token=at&oauth_token_secret=as");
        let mut consumer = consumer(transport.clone());
        let request_token = RequestToken::from(Token::new("token", "secret"));
        let authorized = AuthorizedRequest::from_pairs(vec![("oauth_token", "forged")]);

        let err = consumer
            .get_access_token(&authorized, &request_token, None, None)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::TokenReader(TokenReaderError::TokenMismatch { .. })
        ));
        assert_eq!(transport.request_count(), 0);
        assert!(consumer.last_access_token().is_none());
    }

    #[test]
    fn protected_calls_are_signed_with_access_token() {
        let transport = RecordingTransport::replying("{}");
        let consumer = consumer(transport.clone());
        let access_token = AccessToken::from(Token::new("at", "as"));

        let response = consumer
            .client(&access_token)
            .get("http://api.example.com/me")
            .query(&[("fields", "name")])
            .send()
            .unwrap();
        assert_eq!(response.body(), "{}");

        let (method, uri, authorization, _) = transport.last_request();
        assert_eq!(method, "GET");
        assert_eq!(uri, "http://api.example.com/me?fields=name");
        assert!(authorization.contains(",oauth_token=\"at\","));
    }

    #[test]
    fn transport_can_be_swapped_and_reset() {
        let first = RecordingTransport::replying("oauth_token=first");
        let second = RecordingTransport::replying("oauth_token=second");
        let mut consumer = consumer(first.clone());

        consumer.set_transport(second.clone());
        let token = consumer.get_request_token(&[], None, None).unwrap();
        assert_eq!(token.token(), "second");
        assert_eq!(first.request_count(), 0);

        consumer.reset_transport();
        assert_eq!(second.request_count(), 1);
    }

    #[test]
    fn config_changes_are_validated() {
        let mut consumer = consumer(RecordingTransport::replying(""));
        consumer
            .config_mut()
            .set_signature_method("plaintext")
            .unwrap();
        assert!(consumer.config_mut().set_request_scheme("buckyball").is_err());
        assert!(consumer.config_mut().set_access_token_url("buckyball").is_err());

        assert_eq!(consumer.config().signature_method().as_str(), "PLAINTEXT");
        assert_eq!(
            consumer.config().access_token_url().map(Url::as_str),
            Some("http://www.example.com/access")
        );
    }
}
