//! Swap-by-value reordering.
//!
//! Two records trade their payload (every mutable column) while their identity
//! columns stay where they are. Rows elsewhere that reference either identity,
//! such as progress records pointing at a content item, keep pointing at the
//! same key; only the title/type/url (or name/duration) behind that key moves.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, FromRow, PgConnection, PgPool};
use std::collections::BTreeMap;

use super::store::{StoreError, StoreResult};

/// A record with a user-visible ordering key and a movable payload
pub trait Sequenced {
    type Payload;

    fn sequence_key(&self) -> i32;
    fn payload(&self) -> Self::Payload;
    fn set_payload(&mut self, payload: Self::Payload);
}

/// Exchange the payloads of two records in place. Identity is untouched.
pub fn exchange_payloads<E: Sequenced>(first: &mut E, second: &mut E) {
    let first_payload = first.payload();
    first.set_payload(second.payload());
    second.set_payload(first_payload);
}

/// Swap the payloads of two entries of an in-memory table.
///
/// Returns `false` without touching the map when either key is absent.
pub fn swap_in_map<K, E>(rows: &mut BTreeMap<K, E>, first: &K, second: &K) -> bool
where
    K: Ord + Clone,
    E: Sequenced,
{
    if first == second || !rows.contains_key(first) || !rows.contains_key(second) {
        return false;
    }
    let Some(mut head) = rows.remove(first) else {
        return false;
    };
    if let Some(tail) = rows.get_mut(second) {
        exchange_payloads(&mut head, tail);
    }
    rows.insert(first.clone(), head);
    true
}

/// PostgreSQL binding for a `Sequenced` entity
#[async_trait]
pub trait PgSequenced: Sequenced + Sized + Send + Sync + Unpin + for<'r> FromRow<'r, PgRow> {
    /// Identity columns of the parent collection
    type Parent: Send + Sync;

    /// Human-readable entity name used in errors
    const ENTITY: &'static str;

    /// Load both rows under `parent` with `SELECT ... FOR UPDATE`, ascending by key
    async fn lock_pair(
        conn: &mut PgConnection,
        parent: &Self::Parent,
        first: i32,
        second: i32,
    ) -> Result<Vec<Self>, sqlx::Error>;

    /// Write this row's payload back to its own identity
    async fn write_payload(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error>;
}

/// Exchange the payloads of two rows inside a single transaction.
///
/// Both rows are locked before either is written, so a concurrent swap of the
/// same pair waits for this one to commit. If either row is missing the
/// transaction is dropped (rolled back) before any write.
pub async fn swap_in_transaction<E: PgSequenced>(
    pool: &PgPool,
    parent: &E::Parent,
    first: i32,
    second: i32,
) -> StoreResult<()> {
    let mut tx = pool.begin().await?;

    let mut rows = E::lock_pair(&mut *tx, parent, first, second).await?;
    if rows.len() != 2 {
        let missing = if rows.iter().any(|r| r.sequence_key() == first) { second } else { first };
        return Err(StoreError::NotFound(format!("{} {} not found", E::ENTITY, missing)));
    }

    let (head, tail) = rows.split_at_mut(1);
    exchange_payloads(&mut head[0], &mut tail[0]);

    for row in &rows {
        row.write_payload(&mut *tx).await?;
    }

    tx.commit().await?;
    tracing::debug!("Swapped {} {} <-> {}", E::ENTITY, first, second);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Module;

    fn module(number: i32, name: &str, weeks: i32) -> Module {
        Module {
            course_id: 1,
            module_number: number,
            name: name.to_string(),
            duration_weeks: weeks,
        }
    }

    #[test]
    fn exchange_moves_payload_not_identity() {
        let mut intro = module(1, "Intro", 2);
        let mut advanced = module(2, "Advanced", 4);

        exchange_payloads(&mut intro, &mut advanced);

        assert_eq!(intro, module(1, "Advanced", 4));
        assert_eq!(advanced, module(2, "Intro", 2));
    }

    #[test]
    fn swap_in_map_is_an_involution() {
        let mut rows = BTreeMap::new();
        for (n, name) in [(1, "a"), (3, "b"), (7, "c")] {
            rows.insert(n, module(n, name, n));
        }
        let original = rows.clone();

        assert!(swap_in_map(&mut rows, &1, &7));
        assert_ne!(rows, original);
        assert_eq!(rows.keys().copied().collect::<Vec<_>>(), vec![1, 3, 7]);

        assert!(swap_in_map(&mut rows, &7, &1));
        assert_eq!(rows, original);
    }

    #[test]
    fn swap_in_map_with_missing_key_leaves_rows_alone() {
        let mut rows = BTreeMap::new();
        rows.insert(1, module(1, "Intro", 2));
        rows.insert(2, module(2, "Advanced", 4));
        let original = rows.clone();

        assert!(!swap_in_map(&mut rows, &1, &9));
        assert!(!swap_in_map(&mut rows, &9, &2));
        assert!(!swap_in_map(&mut rows, &2, &2));
        assert_eq!(rows, original);
    }
}
