#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivityTypeRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}
