#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VenueRow {
    pub id: String,
    pub name: String,
    pub address: String,
    pub capacity: i64,
}
