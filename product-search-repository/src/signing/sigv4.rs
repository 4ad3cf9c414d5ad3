//! AWS Signature Version 4.
//!
//! Signs requests to OpenSearch Service and OpenSearch Serverless with the
//! identity the process runs under.

use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use tracing::trace;

use crate::errors::SigningError;
use crate::signing::{Credentials, RequestSigner, SigningRequest};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Headers that proxies and clients are free to rewrite.
const UNSIGNED_HEADERS: &[&str] = &[
    "authorization",
    "connection",
    "content-length",
    "expect",
    "user-agent",
    "x-amzn-trace-id",
];

/// Signs requests for one region and service.
#[derive(Debug, Clone)]
pub struct SigV4Signer {
    credentials: Credentials,
    region: String,
    service: String,
    sign_payload_header: bool,
}

impl SigV4Signer {
    /// Create a signer that also sends and signs `x-amz-content-sha256`.
    pub fn new(
        credentials: Credentials,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            region: region.into(),
            service: service.into(),
            sign_payload_header: true,
        }
    }

    /// Leave out the `x-amz-content-sha256` header.
    ///
    /// OpenSearch Serverless requires it; managed domains do not.
    pub fn without_payload_header(mut self) -> Self {
        self.sign_payload_header = false;
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    fn credential_scope(&self, date: &str) -> String {
        format!("{}/{}/{}/aws4_request", date, self.region, self.service)
    }

    fn signing_key(&self, date: &str) -> Result<Vec<u8>, SigningError> {
        derive_signing_key(
            &self.credentials.secret_access_key,
            date,
            &self.region,
            &self.service,
        )
    }
}

impl RequestSigner for SigV4Signer {
    fn sign(
        &self,
        request: &SigningRequest<'_>,
        timestamp: DateTime<Utc>,
    ) -> Result<Vec<(String, String)>, SigningError> {
        let host = request
            .url
            .host_str()
            .ok_or_else(|| SigningError::MissingHost(request.url.to_string()))?;
        let host = match request.url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let amz_date = timestamp.format("%Y%m%dT%H%M%SZ").to_string();
        let date = timestamp.format("%Y%m%d").to_string();
        let payload_hash = hex::encode(Sha256::digest(request.body));

        let mut signature_headers = vec![("x-amz-date".to_string(), amz_date.clone())];
        if self.sign_payload_header {
            signature_headers.push(("x-amz-content-sha256".to_string(), payload_hash.clone()));
        }
        if let Some(token) = &self.credentials.session_token {
            signature_headers.push(("x-amz-security-token".to_string(), token.clone()));
        }

        let mut canonical: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in request.headers {
            let name = name.to_ascii_lowercase();
            if UNSIGNED_HEADERS.contains(&name.as_str()) {
                continue;
            }
            let value = normalize_header_value(value);
            canonical
                .entry(name)
                .and_modify(|existing| {
                    existing.push(',');
                    existing.push_str(&value);
                })
                .or_insert(value);
        }
        canonical.insert("host".to_string(), host);
        for (name, value) in &signature_headers {
            canonical.insert(name.clone(), value.clone());
        }

        let signed_headers = canonical.keys().cloned().collect::<Vec<_>>().join(";");
        let canonical_headers: String = canonical
            .iter()
            .map(|(name, value)| format!("{}:{}\n", name, value))
            .collect();

        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            request.method.as_str(),
            canonical_uri(request.url.path()),
            canonical_query(request.url),
            canonical_headers,
            signed_headers,
            payload_hash
        );
        trace!(canonical_request = %canonical_request, "Built canonical request");

        let scope = self.credential_scope(&date);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signing_key = self.signing_key(&date)?;
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes())?);
        let authorization = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, self.credentials.access_key_id, scope, signed_headers, signature
        );

        signature_headers.push(("authorization".to_string(), authorization));
        Ok(signature_headers)
    }
}

/// Derive the per-day, per-region, per-service signing key.
pub(crate) fn derive_signing_key(
    secret: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, SigningError> {
    let k_date = hmac_sha256(format!("AWS4{}", secret).as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, SigningError> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| SigningError::KeyDerivation(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Each segment of the already-encoded path is encoded once more.
fn canonical_uri(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Parameters are percent-decoded without form semantics, so a literal `+`
/// is signed as `%2B`.
fn canonical_query(url: &url::Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (encode_query_component(key), encode_query_component(value))
        })
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_query_component(raw: &str) -> String {
    let decoded = urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw));
    urlencoding::encode(&decoded).into_owned()
}

fn normalize_header_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
