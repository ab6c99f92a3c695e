/*!
oauth1-consumer: the consumer side of OAuth 1.0 and 1.0a.

# Overview

This library obtains request tokens, sends the user off to authorize them,
exchanges them for access tokens and signs protected resource requests with
HMAC-SHA1, RSA-SHA1 or PLAINTEXT. The signed values travel in the
`Authorization` header, the form body or the query string.

HTTP is delegated to a [`Transport`]; [`ReqwestTransport`] (built on
`reqwest::blocking`) is the default, and any
`Fn(http::Request<String>) -> TransportResult<http::Response<String>>`
works as well.

# How to use

## Acquiring an access token

```no_run
use std::io;
use oauth1_consumer::{AuthorizedRequest, Consumer, ConsumerConfig};

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let config = ConsumerConfig::builder()
    .consumer_key("[CONSUMER_KEY]")
    .consumer_secret("[CONSUMER_SECRET]")
    .request_token_url("https://api.twitter.com/oauth/request_token")
    .user_authorization_url("https://api.twitter.com/oauth/authorize")
    .access_token_url("https://api.twitter.com/oauth/access_token")
    .build()?;
let mut consumer = Consumer::new(config);

// step 1: acquire request token & token secret (callback is "oob")
let request_token = consumer.get_request_token(&[], None, None)?;

// step 2: let the user authorize it and read back the pin
println!("please access to: {}", consumer.get_redirect_url(&[], None)?);
println!("input pin: ");
let mut user_input = String::new();
io::stdin().read_line(&mut user_input)?;
let authorized = AuthorizedRequest::from_pairs(vec![
    ("oauth_token", request_token.token()),
    ("oauth_verifier", user_input.trim()),
]);

// step 3: acquire access token
let access_token = consumer.get_access_token(&authorized, &request_token, None, None)?;
println!("your token is: {}", access_token.token());
# Ok(())
# }
```

## Calling a protected resource

```no_run
use oauth1_consumer::{AccessToken, Consumer, ConsumerConfig, Token};

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let config = ConsumerConfig::builder()
    .consumer_key("[CONSUMER_KEY]")
    .consumer_secret("[CONSUMER_SECRET]")
    .build()?;
let consumer = Consumer::new(config);
let access_token = AccessToken::from(Token::new("[ACCESS_TOKEN]", "[TOKEN_SECRET]"));

let response = consumer
    .client(&access_token)
    .post("https://api.twitter.com/1.1/statuses/update.json")
    .form(&[("status", "Hello, Twitter!")])
    .send()?;
println!("{}", response.body());
# Ok(())
# }
```
*/
mod client;
mod config;
mod consumer;
mod error;
mod request;
mod secrets;
mod signer;
mod token;
mod transport;

// exposed to external program
pub use client::Client;
pub use config::{ConsumerConfig, ConsumerConfigBuilder, RequestMethod, RequestScheme};
pub use consumer::{Consumer, FlowState};
pub use error::{
    ConfigError, ConfigResult, Error, Result, SignError, SignResult, TokenReaderError,
    TokenReaderResult, TransportError, TransportResult,
};
pub use request::RequestBuilder;
pub use secrets::{Secrets, SecretsProvider};
pub use signer::{
    base_string, generate_nonce, generate_timestamp, load_private_key, normalize_base_url,
    normalize_parameters, to_authorization_header, url_encode, OAuthParameters, SignatureMethod,
    Signer, DEFAULT_VERSION,
};
pub use token::{AccessToken, AuthorizedRequest, RequestToken, Token};
pub use transport::{default_transport, ReqwestTransport, Transport};

// exposed constant variables
/// Represents `oauth_callback`.
pub const OAUTH_CALLBACK_KEY: &str = "oauth_callback";
/// Represents `oauth_nonce`.
pub const OAUTH_NONCE_KEY: &str = "oauth_nonce";
/// Represents `oauth_timestamp`.
pub const OAUTH_TIMESTAMP_KEY: &str = "oauth_timestamp";
/// Represents `oauth_verifier`.
pub const OAUTH_VERIFIER_KEY: &str = "oauth_verifier";
/// Represents `oauth_version`.
pub const OAUTH_VERSION_KEY: &str = "oauth_version";
/// Represents `realm`.
pub const REALM_KEY: &str = "realm";
/// Callback value for clients that cannot receive redirects.
pub const OUT_OF_BAND_CALLBACK: &str = "oob";

// crate-private constant variables
pub(crate) const OAUTH_KEY_PREFIX: &str = "oauth_";
pub(crate) const OAUTH_SIGNATURE_METHOD_KEY: &str = "oauth_signature_method";
pub(crate) const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
pub(crate) const OAUTH_TOKEN_KEY: &str = "oauth_token";
pub(crate) const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";
pub(crate) const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";
pub(crate) const OAUTH_CALLBACK_CONFIRMED_KEY: &str = "oauth_callback_confirmed";
