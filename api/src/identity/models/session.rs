use diesel::prelude::*;
use uuid::Uuid;

// Sessions are issued by the login flow, this service only reads them
#[allow(dead_code)]
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Session {
    pub id: i32,
    pub token: String,
    pub active: bool,
    pub issued_at: chrono::NaiveDateTime,
    pub expires_at: chrono::NaiveDateTime,
    pub identity_id: Uuid,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl Session {
    /// Whether the session can authenticate a request made at `now`.
    pub fn is_valid_at(&self, now: chrono::NaiveDateTime) -> bool {
        self.active && self.issued_at <= now && self.expires_at > now
    }
}
