use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Attendee {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub username: String,
    pub display_name: String,
    pub is_confirmed: bool,
    pub registered_at: OffsetDateTime,
}
