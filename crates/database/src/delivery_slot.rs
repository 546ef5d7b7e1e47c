//! Per-weekday delivery slot operations.

use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::DeliverySlot;

/// Delivery time given to every weekday on (re)initialization.
pub const DEFAULT_SLOT_TIME: &str = "16:00";

/// Number of weekdays; slots use 0 (Monday) through 6 (Sunday).
pub const WEEKDAYS: u8 = 7;

fn check_weekday(weekday: u8) -> Result<()> {
    if weekday < WEEKDAYS {
        Ok(())
    } else {
        Err(DatabaseError::InvalidWeekday(weekday))
    }
}

/// Replace a recipient's slots with one default slot per weekday.
///
/// Runs on the caller's connection so it can join a transaction.
pub async fn reset_slots(conn: &mut SqliteConnection, recipient_id: i64) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM delivery_slots
        WHERE recipient_id = ?
        "#,
    )
    .bind(recipient_id)
    .execute(&mut *conn)
    .await?;

    for weekday in 0..WEEKDAYS {
        sqlx::query(
            r#"
            INSERT INTO delivery_slots (recipient_id, weekday, time)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(recipient_id)
        .bind(i64::from(weekday))
        .bind(DEFAULT_SLOT_TIME)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// List a recipient's slots, Monday first. Disabled weekdays are absent.
pub async fn list_slots(pool: &SqlitePool, recipient_id: i64) -> Result<Vec<DeliverySlot>> {
    let slots = sqlx::query_as::<_, DeliverySlot>(
        r#"
        SELECT recipient_id, weekday, time
        FROM delivery_slots
        WHERE recipient_id = ?
        ORDER BY weekday
        "#,
    )
    .bind(recipient_id)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

/// Set the delivery time of a weekday, re-creating the slot if it was disabled.
///
/// `time` must already be a normalized `HH:MM`
/// (see [`parse_time_of_day`](crate::validation::parse_time_of_day)).
pub async fn set_slot_time(
    pool: &SqlitePool,
    recipient_id: i64,
    weekday: u8,
    time: &str,
) -> Result<()> {
    check_weekday(weekday)?;

    sqlx::query(
        r#"
        INSERT INTO delivery_slots (recipient_id, weekday, time)
        VALUES (?, ?, ?)
        ON CONFLICT(recipient_id, weekday) DO UPDATE SET
            time = excluded.time
        "#,
    )
    .bind(recipient_id)
    .bind(i64::from(weekday))
    .bind(time)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete a weekday's slot, disabling delivery that day.
///
/// Returns whether a slot was removed.
pub async fn delete_slot(pool: &SqlitePool, recipient_id: i64, weekday: u8) -> Result<bool> {
    check_weekday(weekday)?;

    let result = sqlx::query(
        r#"
        DELETE FROM delivery_slots
        WHERE recipient_id = ? AND weekday = ?
        "#,
    )
    .bind(recipient_id)
    .bind(i64::from(weekday))
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Slots matching a weekday and `HH:MM` exactly, by recipient id.
pub async fn due_slots(pool: &SqlitePool, weekday: u8, time: &str) -> Result<Vec<DeliverySlot>> {
    check_weekday(weekday)?;

    let slots = sqlx::query_as::<_, DeliverySlot>(
        r#"
        SELECT recipient_id, weekday, time
        FROM delivery_slots
        WHERE weekday = ? AND time = ?
        ORDER BY recipient_id
        "#,
    )
    .bind(i64::from(weekday))
    .bind(time)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}
