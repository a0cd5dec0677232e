use diesel::prelude::*;
use serde_json::Value as JsonValue;
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::identities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Identity {
    pub id: Uuid,
    pub traits: JsonValue,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Default)]
pub struct Traits {
    pub email: Option<String>,
    pub name: Option<String>,
}

impl From<&Traits> for JsonValue {
    fn from(t: &Traits) -> Self {
        serde_json::json!({ "email": t.email, "name": t.name })
    }
}

// Traits are written by the login flow; anything unexpected reads as empty
impl From<JsonValue> for Traits {
    fn from(value: JsonValue) -> Self {
        serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Malformed identity traits");
            Traits::default()
        })
    }
}
