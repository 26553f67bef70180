//! Reference number allocation
//!
//! Every human-readable identifier (HSI-, EST-, CERT-) is backed by a
//! counter row in `reference_sequences`, advanced with an atomic upsert
//! inside the caller's transaction. Two concurrent allocations in the same
//! period therefore always observe distinct values; selecting the highest
//! existing reference and incrementing it is the race this table exists to
//! prevent.

use chrono::NaiveDate;
use sqlx::{Postgres, Transaction};

use crate::error::AppResult;
use shared::{format_reference, SequenceScope};

/// Bounded attempts when an allocated reference still collides with a
/// pre-existing row (e.g. imported legacy data ahead of the counter).
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 3;

/// Allocate the next reference number for `scope` within the period
/// containing `on_date`, joining the caller's transaction.
pub async fn next_reference(
    tx: &mut Transaction<'_, Postgres>,
    scope: SequenceScope,
    on_date: NaiveDate,
) -> AppResult<String> {
    let period_key = scope.period_key(on_date);

    let sequence: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO reference_sequences (scope_kind, period_key, next_value)
        VALUES ($1, $2, 1)
        ON CONFLICT (scope_kind, period_key)
        DO UPDATE SET next_value = reference_sequences.next_value + 1
        RETURNING next_value
        "#,
    )
    .bind(scope.as_str())
    .bind(&period_key)
    .fetch_one(&mut **tx)
    .await?;

    Ok(format_reference(scope, &period_key, sequence))
}
