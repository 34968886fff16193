//! OAuth 1.0a request signing for the Twitter/X v1.1 API.
//!
//! Every request the bot makes is signed with HMAC-SHA1 using the consumer
//! credentials of the application and the access token of the bot account.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;

use crate::config::TwitterCredentials;
use crate::error::ApiError;

type HmacSha1 = Hmac<Sha1>;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";
const NONCE_LENGTH: usize = 32;

/// Percent-encodes a string per RFC 3986, leaving only unreserved characters as-is.
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Generates a random alphanumeric nonce.
fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}

/// Builds the `oauth_*` protocol parameters for one request (without the signature).
fn protocol_params(
    credentials: &TwitterCredentials,
    nonce: &str,
    timestamp: i64,
) -> Vec<(String, String)> {
    vec![
        ("oauth_consumer_key".to_string(), credentials.consumer_key.clone()),
        ("oauth_nonce".to_string(), nonce.to_string()),
        ("oauth_signature_method".to_string(), SIGNATURE_METHOD.to_string()),
        ("oauth_timestamp".to_string(), timestamp.to_string()),
        ("oauth_token".to_string(), credentials.access_token.clone()),
        ("oauth_version".to_string(), OAUTH_VERSION.to_string()),
    ]
}

/// Builds the signature base string.
///
/// # Parameters
///
/// - `method`: HTTP method, upper case
/// - `base_url`: Request URL without query string
/// - `params`: Query, form body and `oauth_*` parameters, unencoded
pub(crate) fn signature_base_string(
    method: &str,
    base_url: &str,
    params: &[(String, String)],
) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let parameter_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(base_url),
        percent_encode(&parameter_string)
    )
}

/// Signs a base string with `consumer_secret&token_secret` and returns it base64-encoded.
pub(crate) fn sign(
    base_string: &str,
    consumer_secret: &str,
    token_secret: &str,
) -> Result<String, ApiError> {
    let signing_key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );
    let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
        .map_err(|e| ApiError::Signing(e.to_string()))?;
    mac.update(base_string.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Builds the Authorization header with a caller-supplied nonce and timestamp.
pub(crate) fn build_oauth1_header_with(
    credentials: &TwitterCredentials,
    method: &str,
    base_url: &str,
    request_params: &[(String, String)],
    nonce: &str,
    timestamp: i64,
) -> Result<String, ApiError> {
    let mut oauth_params = protocol_params(credentials, nonce, timestamp);

    let mut all_params = oauth_params.clone();
    all_params.extend_from_slice(request_params);

    let base_string = signature_base_string(method, base_url, &all_params);
    let signature = sign(
        &base_string,
        &credentials.consumer_secret,
        &credentials.access_token_secret,
    )?;
    oauth_params.push(("oauth_signature".to_string(), signature));
    oauth_params.sort();

    let header_params = oauth_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!("OAuth {}", header_params))
}

/// Builds the Authorization header for an OAuth 1.0a signed request.
///
/// # Parameters
///
/// - `credentials`: Consumer and access token credentials
/// - `method`: HTTP method (`GET`, `POST`)
/// - `base_url`: Request URL without query string
/// - `request_params`: Query string and form body parameters, unencoded
///
/// # Returns
///
/// A header value of the form `OAuth oauth_consumer_key="...", ...`.
pub fn build_oauth1_header(
    credentials: &TwitterCredentials,
    method: &str,
    base_url: &str,
    request_params: &[(String, String)],
) -> Result<String, ApiError> {
    let timestamp = chrono::Utc::now().timestamp();
    build_oauth1_header_with(
        credentials,
        method,
        base_url,
        request_params,
        &generate_nonce(),
        timestamp,
    )
}
