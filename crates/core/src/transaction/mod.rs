//! Transaction record stamped onto every submitted entity.
//!
//! A *batch* transaction describes the whole request; a *per-entity*
//! transaction is derived from it with [`Transaction::derive`] and then
//! mutated and persisted on its own.

mod message;
mod outcome;
mod request_id;

use std::fmt;

use chrono::{SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{EntityKey, Timestamp};

pub use message::{Message, MessageKey, Messages};
pub use outcome::{classify, Outcome};
pub use request_id::RequestIdClock;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Transaction status, backed by the HTTP status code it reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum TransactionStatus {
    Ok,
    Created,
    BadRequest,
    NotFound,
    Conflict,
}

impl TransactionStatus {
    /// HTTP status code for this status.
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
        }
    }

    /// Whether the status reports a successful operation (2xx).
    pub fn is_success(self) -> bool {
        (200..300).contains(&self.code())
    }

    /// Look up a status by its HTTP code.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            200 => Some(Self::Ok),
            201 => Some(Self::Created),
            400 => Some(Self::BadRequest),
            404 => Some(Self::NotFound),
            409 => Some(Self::Conflict),
            _ => None,
        }
    }
}

impl From<TransactionStatus> for u16 {
    fn from(value: TransactionStatus) -> Self {
        value.code()
    }
}

impl TryFrom<u16> for TransactionStatus {
    type Error = String;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown transaction status code {code}"))
    }
}

// ---------------------------------------------------------------------------
// Request metadata
// ---------------------------------------------------------------------------

/// Channel a transaction originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestSource {
    Api,
    Service,
}

impl RequestSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Service => "service",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "api" => Some(Self::Api),
            "service" => Some(Self::Service),
            _ => None,
        }
    }
}

/// HTTP verb a transaction handler is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl RequestMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A transaction record.
///
/// `status` and `success` are private: they only change together through
/// [`Transaction::apply`], so a transaction can never report `Created`
/// alongside `success == false`. Deserialization rejects such a pair.
///
/// Timestamps are kept at microsecond precision, the resolution the
/// database stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TransactionRepr")]
pub struct Transaction {
    pub id: String,
    /// Entity type the request targets.
    pub model: String,
    pub request_method: RequestMethod,
    pub request_source: RequestSource,
    /// Correlation token, distinct for every per-entity transaction.
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_route: Option<String>,
    /// Entities covered by this transaction; `None` once a single-entity
    /// submission failed.
    pub related_ids: Option<Vec<EntityKey>>,
    status: TransactionStatus,
    success: bool,
    #[serde(default)]
    pub messages: Messages,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Transaction {
    /// Create a batch transaction for an incoming request.
    ///
    /// Starts out as `Ok` / successful with no related ids and no messages.
    pub fn new(
        id: impl Into<String>,
        model: impl Into<String>,
        request_method: RequestMethod,
        request_id: impl Into<String>,
    ) -> Self {
        let stamped = now();
        Self {
            id: id.into(),
            model: model.into(),
            request_method,
            request_source: RequestSource::Api,
            request_id: request_id.into(),
            related_route: None,
            related_ids: Some(Vec::new()),
            status: TransactionStatus::Ok,
            success: true,
            messages: Messages::new(),
            created_at: stamped,
            updated_at: stamped,
        }
    }

    /// Attach the route the request was made against.
    pub fn with_related_route(mut self, route: impl Into<String>) -> Self {
        self.related_route = Some(route.into());
        self
    }

    /// Structural copy used as the starting point of a per-entity transaction.
    ///
    /// The copy is fully independent: mutating it never touches `self`.
    pub fn derive(&self) -> Self {
        self.clone()
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn success(&self) -> bool {
        self.success
    }

    /// The current status/success pair.
    pub fn outcome(&self) -> Outcome {
        Outcome::from_status(self.status)
    }

    /// Set status and success together and bump `updated_at`.
    pub fn apply(&mut self, outcome: Outcome) {
        self.status = outcome.status();
        self.success = outcome.success();
        self.updated_at = now();
    }
}

/// Current time truncated to microseconds.
fn now() -> Timestamp {
    Utc::now().trunc_subsecs(6)
}

/// Wire shape of [`Transaction`], checked before it becomes one.
#[derive(Deserialize)]
struct TransactionRepr {
    id: String,
    model: String,
    request_method: RequestMethod,
    request_source: RequestSource,
    request_id: String,
    #[serde(default)]
    related_route: Option<String>,
    related_ids: Option<Vec<EntityKey>>,
    status: TransactionStatus,
    success: bool,
    #[serde(default)]
    messages: Messages,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl TryFrom<TransactionRepr> for Transaction {
    type Error = String;

    fn try_from(repr: TransactionRepr) -> Result<Self, Self::Error> {
        if repr.success != repr.status.is_success() {
            return Err(format!(
                "success flag {} contradicts status {}",
                repr.success,
                repr.status.code()
            ));
        }
        Ok(Self {
            id: repr.id,
            model: repr.model,
            request_method: repr.request_method,
            request_source: repr.request_source,
            request_id: repr.request_id,
            related_route: repr.related_route,
            related_ids: repr.related_ids,
            status: repr.status,
            success: repr.success,
            messages: repr.messages,
            created_at: repr.created_at,
            updated_at: repr.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> Transaction {
        Transaction::new("tx-1", "product", RequestMethod::Post, "req-1")
    }

    #[test]
    fn new_transaction_is_successful_and_empty() {
        let tx = batch();
        assert_eq!(tx.status(), TransactionStatus::Ok);
        assert!(tx.success());
        assert_eq!(tx.related_ids, Some(Vec::new()));
        assert!(tx.messages.is_empty());
        assert_eq!(tx.request_source, RequestSource::Api);
    }

    #[test]
    fn apply_sets_status_and_success_together() {
        let mut tx = batch();
        tx.apply(Outcome::conflict());
        assert_eq!(tx.status(), TransactionStatus::Conflict);
        assert!(!tx.success());

        tx.apply(Outcome::created());
        assert_eq!(tx.status(), TransactionStatus::Created);
        assert!(tx.success());
    }

    #[test]
    fn derived_copy_is_independent() {
        let base = batch();
        let mut copy = base.derive();
        copy.id = "tx-2".to_string();
        copy.related_ids = None;
        copy.apply(Outcome::conflict());

        assert_eq!(base.id, "tx-1");
        assert_eq!(base.related_ids, Some(Vec::new()));
        assert!(base.success());
    }

    #[test]
    fn status_serializes_as_http_code() {
        let mut tx = batch();
        tx.apply(Outcome::created());
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["status"], 201);
        assert_eq!(json["success"], true);
        assert_eq!(json["request_method"], "POST");
        assert_eq!(json["request_source"], "api");
    }

    #[test]
    fn unknown_status_code_is_rejected() {
        assert!(TransactionStatus::try_from(418u16).is_err());
        assert_eq!(TransactionStatus::try_from(409u16), Ok(TransactionStatus::Conflict));
    }

    #[test]
    fn transaction_survives_json() {
        let mut tx = batch().with_related_route("/api/v1/entities/product");
        tx.apply(Outcome::conflict());
        tx.messages
            .insert(MessageKey::Errors, vec![Message::new("name is required")]);

        let json = serde_json::to_string(&tx).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn contradicting_success_flag_is_rejected() {
        let mut tx = batch();
        tx.apply(Outcome::created());
        let mut json = serde_json::to_value(&tx).unwrap();
        json["success"] = serde_json::Value::Bool(false);

        let err = serde_json::from_value::<Transaction>(json).unwrap_err();
        assert!(err.to_string().contains("contradicts status 201"));
    }

    #[test]
    fn timestamps_have_microsecond_precision() {
        let mut tx = batch();
        assert_eq!(tx.created_at.timestamp_subsec_nanos() % 1_000, 0);
        tx.apply(Outcome::conflict());
        assert_eq!(tx.updated_at.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn request_method_parse_is_case_insensitive() {
        assert_eq!(RequestMethod::parse("post"), Some(RequestMethod::Post));
        assert_eq!(RequestMethod::parse("TRACE"), None);
        assert_eq!(RequestMethod::Post.to_string(), "POST");
    }
}
