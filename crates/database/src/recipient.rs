//! Recipient lifecycle operations.

use sqlx::SqlitePool;

use crate::delivery_slot;
use crate::error::{DatabaseError, Result};
use crate::models::{NewEducation, Recipient, RecipientState};

/// Find a recipient by id.
pub async fn find_recipient(pool: &SqlitePool, id: i64) -> Result<Option<Recipient>> {
    let recipient = sqlx::query_as::<_, Recipient>(
        r#"
        SELECT id, state, token, chat_id
        FROM recipients
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(recipient)
}

/// Get a recipient by id.
pub async fn get_recipient(pool: &SqlitePool, id: i64) -> Result<Recipient> {
    find_recipient(pool, id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Recipient",
            id: id.to_string(),
        })
}

/// Create a recipient on first contact, or reset an existing one.
///
/// Either way the recipient ends in `NeedToken` with no token, no
/// educations and the seven default delivery slots.
pub async fn initialize_recipient(pool: &SqlitePool, id: i64, chat_id: i64) -> Result<Recipient> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO recipients (id, state, token, chat_id)
        VALUES (?, ?, NULL, ?)
        ON CONFLICT(id) DO UPDATE SET
            state = excluded.state,
            token = NULL,
            chat_id = excluded.chat_id,
            updated_at = datetime('now')
        "#,
    )
    .bind(id)
    .bind(RecipientState::NeedToken)
    .bind(chat_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        DELETE FROM educations
        WHERE recipient_id = ?
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    delivery_slot::reset_slots(&mut tx, id).await?;

    tx.commit().await?;

    Ok(Recipient {
        id,
        state: RecipientState::NeedToken,
        token: None,
        chat_id,
    })
}

/// Persist an accepted credential.
///
/// Replaces every education of the recipient with `educations`, stores the
/// token and moves the recipient to `Complete`, all in one transaction.
pub async fn complete_onboarding(
    pool: &SqlitePool,
    id: i64,
    token: &str,
    educations: &[NewEducation],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE recipients
        SET state = ?, token = ?, updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(RecipientState::Complete)
    .bind(token)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Recipient",
            id: id.to_string(),
        });
    }

    sqlx::query(
        r#"
        DELETE FROM educations
        WHERE recipient_id = ?
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    for education in educations {
        sqlx::query(
            r#"
            INSERT INTO educations (education_id, recipient_id, firstname, lastname, school, class)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(recipient_id, education_id) DO NOTHING
            "#,
        )
        .bind(education.education_id)
        .bind(id)
        .bind(&education.first_name)
        .bind(&education.last_name)
        .bind(&education.school)
        .bind(&education.class_name)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(
        recipient_id = id,
        educations = educations.len(),
        "Recipient onboarding complete"
    );
    Ok(())
}

/// List all recipients by id.
pub async fn list_recipients(pool: &SqlitePool) -> Result<Vec<Recipient>> {
    let recipients = sqlx::query_as::<_, Recipient>(
        r#"
        SELECT id, state, token, chat_id
        FROM recipients
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(recipients)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::education::list_educations;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn education(id: i64, first_name: &str) -> NewEducation {
        NewEducation {
            education_id: id,
            first_name: first_name.to_string(),
            last_name: "Ivanov".to_string(),
            school: "School 1".to_string(),
            class_name: "3B".to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_recipient_missing() {
        let db = test_db().await;
        assert!(find_recipient(db.pool(), 1).await.unwrap().is_none());
        assert!(get_recipient(db.pool(), 1).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_initialize_creates_need_token() {
        let db = test_db().await;

        let recipient = initialize_recipient(db.pool(), 10, 10).await.unwrap();
        assert_eq!(recipient.state, RecipientState::NeedToken);

        let stored = get_recipient(db.pool(), 10).await.unwrap();
        assert_eq!(stored, recipient);
        assert_eq!(list_recipients(db.pool()).await.unwrap(), vec![recipient]);
    }

    #[tokio::test]
    async fn test_complete_onboarding_replaces_educations() {
        let db = test_db().await;
        initialize_recipient(db.pool(), 10, 10).await.unwrap();

        complete_onboarding(db.pool(), 10, "first", &[education(1, "Ivan"), education(2, "Olga")])
            .await
            .unwrap();
        complete_onboarding(db.pool(), 10, "second", &[education(3, "Petr")])
            .await
            .unwrap();

        let educations = list_educations(db.pool(), 10).await.unwrap();
        assert_eq!(educations.len(), 1);
        assert_eq!(educations[0].education_id, 3);
        assert_eq!(educations[0].first_name, "Petr");

        let recipient = get_recipient(db.pool(), 10).await.unwrap();
        assert!(recipient.is_complete());
        assert_eq!(recipient.token.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_complete_onboarding_unknown_recipient() {
        let db = test_db().await;

        let result = complete_onboarding(db.pool(), 99, "token", &[education(1, "Ivan")]).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
        assert!(list_educations(db.pool(), 99).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_same_education_for_two_recipients() {
        let db = test_db().await;
        initialize_recipient(db.pool(), 1, 1).await.unwrap();
        initialize_recipient(db.pool(), 2, 2).await.unwrap();

        complete_onboarding(db.pool(), 1, "mother", &[education(500, "Ivan")])
            .await
            .unwrap();
        complete_onboarding(db.pool(), 2, "father", &[education(500, "Ivan")])
            .await
            .unwrap();

        assert_eq!(list_educations(db.pool(), 1).await.unwrap().len(), 1);
        assert_eq!(list_educations(db.pool(), 2).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_recipients_ordered() {
        let db = test_db().await;
        for id in [30, 10, 20] {
            initialize_recipient(db.pool(), id, id).await.unwrap();
        }

        let ids: Vec<_> = list_recipients(db.pool())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }
}
