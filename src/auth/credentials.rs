use actix_web::http::header::{self, HeaderMap};

use anyhow::Context;

use secrecy::Secret;

const BASIC_AUTH_PREFIX: &str = "Basic ";

#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: Secret<String>,
}

impl Credentials {
    /// Extract credentials from the headers of a request
    pub fn from_headers(headers: &HeaderMap) -> anyhow::Result<Self> {
        let header_value = headers
            .get(header::AUTHORIZATION)
            .context("Missing authorization in header")?
            .to_str()?;
        if header_value.starts_with(BASIC_AUTH_PREFIX) {
            Self::from_basic(header_value)
        } else {
            anyhow::bail!("Missing or unknown Authorization scheme")
        }
    }

    /// Extract credentials from a string formatted as 'Basic <base64 credentials>'
    pub fn from_basic(header_value: &str) -> anyhow::Result<Self> {
        use base64::Engine;

        let header_value = header_value
            .strip_prefix(BASIC_AUTH_PREFIX)
            .context("Authorization scheme not basic")?;
        let decoded_value = base64::engine::general_purpose::STANDARD
            .decode(header_value)
            .context("Failed to decode authorization header")?;
        let decoded_value =
            String::from_utf8(decoded_value).context("Failed to decode authorization header")?;
        // Passwords may contain colons, emails may not
        let (username, password) = decoded_value
            .split_once(':')
            .context("Missing password in authorization")?;
        if username.is_empty() {
            anyhow::bail!("Missing email in authorization");
        }

        Ok(Self {
            username: username.into(),
            password: Secret::new(password.into()),
        })
    }
}
