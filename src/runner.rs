//! The CRUD pass loop: insert, update, query, delete, pause, repeat.

use std::time::Duration;

use futures::TryStreamExt;
use mongodb::{Collection, bson::doc};
use rand::Rng;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::config::DemoOptions;
use crate::db::models::{self, FILTER_NAME, Trainer};
use crate::error::CastorError;

/// Drives repeated CRUD passes against one collection.
pub struct DemoRunner {
    collection: Collection<Trainer>,
    opts: DemoOptions,
}

impl DemoRunner {
    pub fn new(collection: Collection<Trainer>, opts: DemoOptions) -> Self {
        Self { collection, opts }
    }

    /// Writes `rounds` repetitions of one single insert plus one two-document
    /// batch insert. Returns the number of documents written.
    pub async fn insert_batch(&self) -> Result<u64, CastorError> {
        let mut written: u64 = 0;
        for round in 0..self.opts.rounds {
            let single = self.collection.insert_one(models::seed_single()).await?;
            debug!(round, id = %single.inserted_id, "inserted seed document");
            written += 1;

            let pair = self.collection.insert_many(models::seed_batch()).await?;
            debug!(round, ids = ?pair.inserted_ids, "inserted document pair");
            written += pair.inserted_ids.len() as u64;
        }
        info!(documents = written, "insert batch complete");
        Ok(written)
    }

    /// Bumps the age of every document named [`FILTER_NAME`] by one.
    /// Returns how many documents matched and how many were modified.
    pub async fn update_all(&self) -> Result<(u64, u64), CastorError> {
        let result = self
            .collection
            .update_many(doc! { "name": FILTER_NAME }, doc! { "$inc": { "age": 1 } })
            .await?;
        info!(
            matched = result.matched_count,
            modified = result.modified_count,
            "update complete"
        );
        Ok((result.matched_count, result.modified_count))
    }

    /// Point-queries one document named [`FILTER_NAME`], then drains the
    /// whole collection through a cursor. Returns every document found.
    pub async fn query_all(&self) -> Result<Vec<Trainer>, CastorError> {
        let single = self
            .collection
            .find_one(doc! { "name": FILTER_NAME })
            .await?
            .ok_or_else(|| CastorError::NotFound {
                name: FILTER_NAME.to_string(),
            })?;
        debug!(name = %single.name, age = single.age, "point query hit");

        let mut cursor = self.collection.find(doc! {}).await?;
        let mut all = Vec::new();
        while let Some(trainer) = cursor.try_next().await? {
            all.push(trainer);
        }
        info!(documents = all.len(), "query complete");
        Ok(all)
    }

    /// Deletes every document in the collection. Returns the delete count.
    pub async fn delete_all(&self) -> Result<u64, CastorError> {
        let result = self.collection.delete_many(doc! {}).await?;
        info!(deleted = result.deleted_count, "delete complete");
        Ok(result.deleted_count)
    }

    /// One full CRUD pass. The first failing step aborts the pass.
    pub async fn run_cycle(&self) -> Result<(), CastorError> {
        self.insert_batch().await?;
        self.insert_batch().await?;
        self.update_all().await?;
        self.query_all().await?;
        self.delete_all().await?;
        Ok(())
    }

    /// Runs CRUD passes until the cycle budget is spent, or forever when
    /// no budget is set. The budget is checked before each pass, so a
    /// zero budget issues no database call. A failed pass is logged and
    /// the loop moves on to the next one.
    pub async fn run(&self) {
        let mut pass: u64 = 0;
        loop {
            if let Some(cycles) = self.opts.cycles
                && pass >= cycles
            {
                info!(passes = pass, "cycle budget spent, stopping");
                return;
            }

            if pass > 0 {
                let pause = cycle_pause(self.opts.pause_max_secs);
                info!(seconds = pause.as_secs(), "pausing before next pass");
                sleep(pause).await;
            }

            pass += 1;
            match self.run_cycle().await {
                Ok(()) => info!(pass, "CRUD pass complete"),
                Err(err) => error!(pass, %err, "CRUD pass aborted"),
            }
        }
    }
}

/// Samples a pause of `0..max_secs` whole seconds. A zero bound skips
/// the pause entirely, since an empty sample range would panic.
fn cycle_pause(max_secs: u64) -> Duration {
    if max_secs == 0 {
        return Duration::ZERO;
    }
    Duration::from_secs(rand::rng().random_range(0..max_secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_pause_stays_under_the_bound() {
        for _ in 0..200 {
            let pause = cycle_pause(10);
            assert!(pause < Duration::from_secs(10));
        }
    }

    #[test]
    fn cycle_pause_with_zero_bound_is_zero() {
        assert_eq!(cycle_pause(0), Duration::ZERO);
    }

    #[test]
    fn cycle_pause_with_unit_bound_is_zero() {
        // 0..1 can only sample zero.
        assert_eq!(cycle_pause(1), Duration::ZERO);
    }
}
