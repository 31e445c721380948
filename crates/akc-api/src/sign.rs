//! Request signing for the Aikucun open gateway.
//!
//! Every request carries a `sign` query parameter computed as follows:
//!
//! 1. Start from the base set `appid`, `appsecret`, `noncestr`, `timestamp`,
//!    `version=1`, `format=JSON`, `interfaceName=<operation>`.
//! 2. Merge the caller's parameters (caller keys win).
//! 3. If a non-empty body is given, add its compact JSON text under `body`.
//! 4. Sort keys byte-wise and join as `k=v&k=v…` (the *canonical string*).
//! 5. `sign` = lowercase hex SHA-1 of the canonical string.
//! 6. Drop `appsecret` and `body`, then URL-encode what remains.
//!
//! The secret is keyed into the digest by being part of its input; it never
//! appears in the transmitted query. Signatures depend on the clock, so a
//! [`SignedRequest`] is single-use.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use akc_core::time_util::{Clock, SystemClock, nonce_from_secs};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use sha1::{Digest, Sha1};
use tracing::trace;

use crate::error::ApiError;

const KEY_SECRET: &str = "appsecret";
const KEY_BODY: &str = "body";
const KEY_SIGN: &str = "sign";

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Application credentials issued by the platform.
#[derive(Clone)]
pub struct Credentials {
    app_id: String,
    app_secret: String,
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// SignedRequest
// ---------------------------------------------------------------------------

/// Output of [`Signer::sign`]: the query string to append after `?` and the
/// payload to send, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// URL-encoded parameters including `sign`.
    pub query: String,
    /// Lowercase hex SHA-1 digest (40 chars).
    pub signature: String,
    /// Serialized JSON body. `None` when no (or an empty) body was given.
    pub body: Option<Vec<u8>>,
}

// ---------------------------------------------------------------------------
// Signer
// ---------------------------------------------------------------------------

/// Signs gateway requests with the application credentials.
#[derive(Clone)]
pub struct Signer {
    credentials: Credentials,
    clock: Arc<dyn Clock>,
}

impl Signer {
    /// Create a signer that reads the system clock.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Sign a call to `interface_name`.
    ///
    /// `params` are merged over the base parameters. An empty `body` is
    /// treated exactly like `None`.
    pub fn sign(
        &self,
        interface_name: &str,
        params: &[(&str, &str)],
        body: Option<&Map<String, Value>>,
    ) -> Result<SignedRequest, ApiError> {
        let now = self.clock.now_secs();

        let mut all: BTreeMap<String, String> = BTreeMap::new();
        all.insert("appid".into(), self.credentials.app_id.clone());
        all.insert(KEY_SECRET.into(), self.credentials.app_secret.clone());
        all.insert("noncestr".into(), nonce_from_secs(now));
        all.insert("timestamp".into(), now.to_string());
        all.insert("version".into(), "1".into());
        all.insert("format".into(), "JSON".into());
        all.insert("interfaceName".into(), interface_name.into());

        for (k, v) in params {
            all.insert((*k).to_string(), (*v).to_string());
        }

        let body = match body {
            Some(map) if !map.is_empty() => {
                let text = canonical_json(map).map_err(ApiError::Encode)?;
                all.insert(KEY_BODY.into(), text.clone());
                Some(text.into_bytes())
            }
            _ => None,
        };

        let signature = digest_hex(&canonical_string(&all));
        all.insert(KEY_SIGN.into(), signature.clone());
        all.remove(KEY_SECRET);
        all.remove(KEY_BODY);

        trace!(interface = interface_name, timestamp = now, "request signed");

        Ok(SignedRequest {
            query: encode_query(&all),
            signature,
            body,
        })
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Canonicalization helpers
// ---------------------------------------------------------------------------

/// Join parameters as `k=v` pairs with `&`, in byte-wise ascending key order.
///
/// Values are joined verbatim (not URL-encoded).
pub fn canonical_string(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// SHA-1 over the UTF-8 bytes of `canonical`, as lowercase hex.
pub fn digest_hex(canonical: &str) -> String {
    hex::encode(Sha1::digest(canonical.as_bytes()))
}

/// URL-encode parameters as `k=v&…`, in key order.
pub fn encode_query(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Compact JSON with object keys in ascending order at every depth.
///
/// Independent of whether `serde_json` preserves insertion order.
fn canonical_json(map: &Map<String, Value>) -> serde_json::Result<String> {
    let sorted: BTreeMap<&str, SortedValue<'_>> =
        map.iter().map(|(k, v)| (k.as_str(), SortedValue(v))).collect();
    serde_json::to_string(&sorted)
}

struct SortedValue<'a>(&'a Value);

impl Serialize for SortedValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Object(map) => {
                let sorted: BTreeMap<&str, SortedValue<'_>> =
                    map.iter().map(|(k, v)| (k.as_str(), SortedValue(v))).collect();
                sorted.serialize(serializer)
            }
            Value::Array(items) => serializer.collect_seq(items.iter().map(SortedValue)),
            other => other.serialize(serializer),
        }
    }
}
