use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Rows with a backend-assigned identity.
pub trait Entity {
    fn id(&self) -> &str;
    fn label(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignor {
    #[serde(deserialize_with = "id_string")]
    pub assignor_id: String,
    #[serde(default)]
    pub assignor: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "id_string")]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default, deserialize_with = "opt_text")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub device_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The embedded assignor on a work row; only the name is guaranteed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignorRef {
    #[serde(default, deserialize_with = "opt_text")]
    pub assignor_id: Option<String>,
    #[serde(default)]
    pub assignor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkAssignment {
    #[serde(deserialize_with = "id_string")]
    pub assignment_id: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assigned_by: Option<AssignorRef>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub site_id: Option<String>,
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub longitude: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub gallery_images: Vec<String>,
    #[serde(rename = "PMSiteId", default, deserialize_with = "opt_text")]
    pub pm_site_id: Option<String>,
    #[serde(rename = "PMComments", default)]
    pub pm_comments: Option<String>,
}

impl WorkAssignment {
    pub fn assignor_name(&self) -> Option<&str> {
        self.assigned_by.as_ref()?.assignor.as_deref()
    }
}

impl Entity for Assignor {
    fn id(&self) -> &str {
        &self.assignor_id
    }

    fn label(&self) -> &str {
        &self.assignor
    }
}

impl Entity for User {
    fn id(&self) -> &str {
        &self.user_id
    }

    fn label(&self) -> &str {
        &self.user_name
    }
}

impl Entity for WorkAssignment {
    fn id(&self) -> &str {
        &self.assignment_id
    }

    fn label(&self) -> &str {
        self.site_id.as_deref().unwrap_or(&self.assignment_id)
    }
}

/// Body for `POST /assignor` and `PUT /assignor/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AssignorPayload {
    pub assignor: String,
    #[serde(rename = "uniqueassignorId", skip_serializing_if = "Option::is_none")]
    pub unique_assignor_id: Option<String>,
}

/// Body for `POST /users/add` and `PUT /users/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub user_name: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_category_id: Option<String>,
}

/// Post-hoc reviewer fields for `PUT /assignments/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PmUpdate {
    #[serde(rename = "PMSiteId", skip_serializing_if = "Option::is_none")]
    pub pm_site_id: Option<String>,
    #[serde(rename = "PMComments", skip_serializing_if = "Option::is_none")]
    pub pm_comments: Option<String>,
}

impl PmUpdate {
    pub fn is_empty(&self) -> bool {
        self.pm_site_id.is_none() && self.pm_comments.is_none()
    }
}

// Ids and coordinates arrive as strings or numbers depending on the endpoint.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, found {other}"
        ))),
    }
}

fn opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a scalar, found {other}"
        ))),
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// RFC 3339, then the backend's naive `YYYY-MM-DD HH:MM:SS` (taken as UTC).
/// Anything else becomes `None` instead of failing the whole page.
fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let Some(Value::String(raw)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(at.with_timezone(&Utc)));
    }
    Ok(NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn work_row_accepts_numeric_coordinates_and_pm_fields() {
        let row: WorkAssignment = serde_json::from_value(json!({
            "assignmentId": 17,
            "createdAt": "2024-01-05T14:30:00Z",
            "assignedBy": {"assignor": "Acme"},
            "name": "Ravi",
            "siteId": "S-9",
            "latitude": 12.5,
            "longitude": "77.25",
            "galleryImages": ["https://img/1.jpg"],
            "PMSiteId": "PM-1",
            "PMComments": null
        }))
        .unwrap();

        assert_eq!(row.assignment_id, "17");
        assert_eq!(row.assignor_name(), Some("Acme"));
        assert_eq!(row.latitude.as_deref(), Some("12.5"));
        assert_eq!(row.longitude.as_deref(), Some("77.25"));
        assert_eq!(row.pm_site_id.as_deref(), Some("PM-1"));
        assert_eq!(row.pm_comments, None);
        assert_eq!(row.gallery_images.len(), 1);
        assert!(row.created_at.is_some());
    }

    #[test]
    fn payloads_use_backend_field_names() {
        let assignor = AssignorPayload {
            assignor: "Acme".to_string(),
            unique_assignor_id: None,
        };
        assert_eq!(serde_json::to_value(&assignor).unwrap(), json!({"assignor": "Acme"}));

        let user = UserPayload {
            user_name: "Ravi".to_string(),
            phone_number: "555".to_string(),
            device_id: Some("D1".to_string()),
            unique_category_id: None,
        };
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({"userName": "Ravi", "phoneNumber": "555", "deviceId": "D1"})
        );

        let pm = PmUpdate {
            pm_site_id: Some("PM-2".to_string()),
            pm_comments: Some("checked".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&pm).unwrap(),
            json!({"PMSiteId": "PM-2", "PMComments": "checked"})
        );
    }

    #[test]
    fn null_gallery_and_naive_timestamp_are_tolerated() {
        let row: WorkAssignment = serde_json::from_value(json!({
            "assignmentId": "W1",
            "createdAt": "2024-01-05 14:30:00",
            "galleryImages": null
        }))
        .unwrap();

        assert!(row.gallery_images.is_empty());
        assert_eq!(
            row.created_at.map(|at| at.to_rfc3339()),
            Some("2024-01-05T14:30:00+00:00".to_string())
        );
    }

    #[test]
    fn unreadable_timestamps_become_none() {
        let user: User = serde_json::from_value(json!({
            "userId": "U1",
            "createdAt": "05/01/2024"
        }))
        .unwrap();
        assert_eq!(user.created_at, None);

        let assignor: Assignor = serde_json::from_value(json!({
            "assignorId": "A1",
            "createdAt": 1704465000
        }))
        .unwrap();
        assert_eq!(assignor.created_at, None);
    }
}
