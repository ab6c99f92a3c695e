use std::{borrow::Cow, fmt};

use rsa::RsaPrivateKey;

/// Supplies the key material a [`Signer`](crate::Signer) needs.
pub trait SecretsProvider {
    fn get_consumer_key_pair<'a>(&'a self) -> (&'a str, &'a str);

    fn get_token_pair_option<'a>(&'a self) -> Option<(&'a str, &'a str)>;

    fn get_token_option_pair<'a>(&'a self) -> (Option<&'a str>, Option<&'a str>) {
        self.get_token_pair_option()
            .map(|s| (Some(s.0), Some(s.1)))
            .unwrap_or_else(|| (None, None))
    }

    /// RSA-SHA1 key parsed ahead of time, if any.
    fn get_private_key(&self) -> Option<&RsaPrivateKey> {
        None
    }
}

/// Consumer credentials, optionally paired with a token.
///
/// With RSA-SHA1 the consumer secret holds the PEM encoded private key.
#[derive(Clone)]
pub struct Secrets<'a> {
    consumer_key: Cow<'a, str>,
    consumer_secret: Cow<'a, str>,
    token: Option<(Cow<'a, str>, Cow<'a, str>)>,
    private_key: Option<&'a RsaPrivateKey>,
}

impl<'a> Secrets<'a> {
    pub fn new<TKey, TSecret>(consumer_key: TKey, consumer_secret: TSecret) -> Self
    where
        TKey: Into<Cow<'a, str>>,
        TSecret: Into<Cow<'a, str>>,
    {
        Secrets {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token: None,
            private_key: None,
        }
    }

    pub fn token<TKey, TSecret>(self, token: TKey, token_secret: TSecret) -> Self
    where
        TKey: Into<Cow<'a, str>>,
        TSecret: Into<Cow<'a, str>>,
    {
        Secrets {
            token: Some((token.into(), token_secret.into())),
            ..self
        }
    }

    /// Signs RSA-SHA1 with `private_key` instead of parsing the consumer secret.
    pub fn private_key(self, private_key: &'a RsaPrivateKey) -> Self {
        Secrets {
            private_key: Some(private_key),
            ..self
        }
    }
}

impl SecretsProvider for Secrets<'_> {
    fn get_consumer_key_pair<'a>(&'a self) -> (&'a str, &'a str) {
        (&self.consumer_key, &self.consumer_secret)
    }

    fn get_token_pair_option<'a>(&'a self) -> Option<(&'a str, &'a str)> {
        self.token
            .as_ref()
            .map(|(token, secret)| (token.as_ref(), secret.as_ref()))
    }

    fn get_private_key(&self) -> Option<&RsaPrivateKey> {
        self.private_key
    }
}

impl fmt::Debug for Secrets<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("token", &self.token.as_ref().map(|(token, _)| token))
            .field("private_key", &self.private_key.map(|_| "<redacted>"))
            .finish()
    }
}
