//! Education queries.

use sqlx::SqlitePool;

use crate::models::Education;
use crate::Result;

/// List the educations linked to a recipient.
pub async fn list_educations(pool: &SqlitePool, recipient_id: i64) -> Result<Vec<Education>> {
    let educations = sqlx::query_as::<_, Education>(
        r#"
        SELECT education_id, recipient_id, firstname, lastname, school, class
        FROM educations
        WHERE recipient_id = ?
        ORDER BY education_id
        "#,
    )
    .bind(recipient_id)
    .fetch_all(pool)
    .await?;

    Ok(educations)
}
