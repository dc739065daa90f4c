use std::collections::HashMap;
use std::fmt;

use fieldops_core::{FailureKind, FetchError, ListResponse, QueryBuilder, SiteIdParam};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

/// Unreserved characters stay readable in item paths.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Backend collections the dashboard screens operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Assignors,
    Users,
    Assignments,
}

impl Resource {
    pub fn name(self) -> &'static str {
        match self {
            Resource::Assignors => "assignors",
            Resource::Users => "users",
            Resource::Assignments => "assignments",
        }
    }

    pub fn list_path(self) -> &'static str {
        match self {
            Resource::Assignors => "/assignor",
            Resource::Users => "/users",
            Resource::Assignments => "/assignments",
        }
    }

    /// Assignments are created by field devices, never from the dashboard.
    pub fn create_path(self) -> Option<&'static str> {
        match self {
            Resource::Assignors => Some("/assignor"),
            Resource::Users => Some("/users/add"),
            Resource::Assignments => None,
        }
    }

    pub fn supports_delete(self) -> bool {
        !matches!(self, Resource::Assignments)
    }

    pub fn item_path(self, id: &str) -> String {
        format!(
            "{}/{}",
            self.list_path(),
            utf8_percent_encode(id, PATH_SEGMENT)
        )
    }

    pub fn query_builder(self) -> QueryBuilder {
        QueryBuilder::new(self.list_path()).with_site_id_param(SiteIdParam::PmSiteId)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a list response keeps its rows and count, as JSON pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    pub items: &'static str,
    /// `None` when the backend sends no count. Such endpoints ignore
    /// `offset`/`limit` and return every row, so paging happens client side.
    pub total: Option<&'static str>,
}

impl Envelope {
    pub const fn new(items: &'static str, total: Option<&'static str>) -> Self {
        Self { items, total }
    }

    pub fn pages_on_server(&self) -> bool {
        self.total.is_some()
    }

    pub fn unwrap_list(&self, mut body: Value) -> Result<ListResponse<Value>, FetchError> {
        let total = self
            .total
            .and_then(|pointer| body.pointer(pointer))
            .and_then(count_value);

        let items = match body.pointer_mut(self.items).map(Value::take) {
            Some(Value::Array(rows)) => rows,
            Some(Value::Null) => Vec::new(),
            Some(other) => {
                return Err(FetchError::new(
                    FailureKind::Decode,
                    format!("expected an array at {}, found {}", self.items, kind_of(&other)),
                ))
            }
            None => {
                return Err(FetchError::new(
                    FailureKind::Decode,
                    format!("response has no {}", self.items),
                ))
            }
        };

        let total_count = total.unwrap_or(items.len() as u64);
        Ok(ListResponse::new(items, total_count))
    }
}

fn count_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Resource → envelope mapping injected into the fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeTable {
    entries: HashMap<Resource, Envelope>,
}

impl EnvelopeTable {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn with(mut self, resource: Resource, envelope: Envelope) -> Self {
        self.entries.insert(resource, envelope);
        self
    }

    pub fn get(&self, resource: Resource) -> Option<&Envelope> {
        self.entries.get(&resource)
    }
}

impl Default for EnvelopeTable {
    fn default() -> Self {
        Self::empty()
            .with(
                Resource::Assignors,
                Envelope::new("/data/Assignors", Some("/data/totalNoOfRecords")),
            )
            .with(Resource::Users, Envelope::new("/data", None))
            .with(
                Resource::Assignments,
                Envelope::new("/data/result", Some("/data/totalNoOfRecords")),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn assignor_envelope_unwraps() {
        let body = json!({
            "data": {
                "Assignors": [{"assignorId": "A1", "assignor": "Acme"}],
                "totalNoOfRecords": 1
            }
        });
        let table = EnvelopeTable::default();

        let list = table
            .get(Resource::Assignors)
            .unwrap()
            .unwrap_list(body)
            .unwrap();

        assert_eq!(list.total_count, 1);
        assert_eq!(list.items, vec![json!({"assignorId": "A1", "assignor": "Acme"})]);
    }

    #[test]
    fn bare_array_counts_rows() {
        let body = json!({"data": [{"userId": "U1"}, {"userId": "U2"}]});
        let list = EnvelopeTable::default()
            .get(Resource::Users)
            .unwrap()
            .unwrap_list(body)
            .unwrap();

        assert_eq!(list.items.len(), 2);
        assert_eq!(list.total_count, 2);
    }

    #[test]
    fn count_is_authoritative_over_row_count() {
        let body = json!({"data": {"result": [{"assignmentId": "W1"}], "totalNoOfRecords": "57"}});
        let list = EnvelopeTable::default()
            .get(Resource::Assignments)
            .unwrap()
            .unwrap_list(body)
            .unwrap();

        assert_eq!(list.items.len(), 1);
        assert_eq!(list.total_count, 57);
    }

    #[test]
    fn wrong_shape_is_a_decode_error() {
        let envelope = Envelope::new("/data/result", None);

        let missing = envelope.unwrap_list(json!({"data": {}})).unwrap_err();
        assert_eq!(missing.kind, FailureKind::Decode);

        let not_array = envelope
            .unwrap_list(json!({"data": {"result": {"a": 1}}}))
            .unwrap_err();
        assert_eq!(not_array.kind, FailureKind::Decode);

        let null = envelope
            .unwrap_list(json!({"data": {"result": null}}))
            .unwrap();
        assert!(null.items.is_empty());
    }

    #[test]
    fn item_path_escapes_ids() {
        assert_eq!(Resource::Users.item_path("U-1"), "/users/U-1");
        assert_eq!(Resource::Assignors.item_path("a/b"), "/assignor/a%2Fb");
        assert_eq!(Resource::Users.create_path(), Some("/users/add"));
        assert!(!Resource::Assignments.supports_delete());
    }
}
