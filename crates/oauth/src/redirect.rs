//! Callback redirect codec
//!
//! The callback handler hands its outcome to the client purely through query
//! parameters on the start page URL. Note that a successful redirect puts the
//! tokens in the URL, where browser history and access logs can see them.

use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use url::Url;

use crate::constants::{PARAM_AUTH_ERROR, PARAM_AUTH_SUCCESS, PARAM_TOKENS};
use crate::tokens::TokenPair;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Success(TokenPair),
    /// Provider error code, `no_code` or `callback_failed`
    Failure(String),
}

impl AuthOutcome {
    pub fn failure(reason: impl Into<String>) -> Self {
        AuthOutcome::Failure(reason.into())
    }

    /// Builds the redirect target on `start_page`
    pub fn redirect_url(&self, start_page: &str) -> Result<String> {
        let query = match self {
            AuthOutcome::Success(tokens) => format!(
                "{}=true&{}={}",
                PARAM_AUTH_SUCCESS,
                PARAM_TOKENS,
                urlencoding::encode(&tokens.to_redirect_param()?)
            ),
            AuthOutcome::Failure(reason) => {
                format!("{}={}", PARAM_AUTH_ERROR, urlencoding::encode(reason))
            }
        };
        Ok(format!("{}?{}", start_page, query))
    }

    /// Reads the outcome back from the URL the browser landed on.
    ///
    /// Returns `Ok(None)` when the URL carries no auth parameters and an
    /// error when it claims success but the token payload is unreadable.
    pub fn from_url(url: &str) -> Result<Option<Self>> {
        let params = query_params(url)?;

        if params.get(PARAM_AUTH_SUCCESS).map(String::as_str) == Some("true") {
            if let Some(tokens) = params.get(PARAM_TOKENS) {
                let tokens = TokenPair::from_redirect_param(tokens)
                    .map_err(|e| anyhow!("Failed to process authentication tokens: {}", e))?;
                return Ok(Some(AuthOutcome::Success(tokens)));
            }
        }

        Ok(params
            .get(PARAM_AUTH_ERROR)
            .map(|reason| AuthOutcome::Failure(reason.clone())))
    }
}

/// Relative start pages (`/start?...`) are resolved against this base
const RELATIVE_BASE: &str = "http://localhost/";

fn query_params(raw: &str) -> Result<HashMap<String, String>> {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_BASE)
            .and_then(|base| base.join(raw))
            .with_context(|| format!("Invalid redirect URL: {}", raw))?,
        Err(e) => return Err(anyhow!("Invalid redirect URL {}: {}", raw, e)),
    };

    Ok(url.query_pairs().into_owned().collect())
}
