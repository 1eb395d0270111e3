// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Profiles (one document per user)
//! - Daily logs and symptom entries (one document per user per day)
//! - Weight samples and dose events (append-only)

use crate::db::{collections, day_document_id, HealthStore};
use crate::error::AppError;
use crate::models::{
    DailyLog, DoseEvent, NutritionEntry, Profile, SymptomEntry, SymptomUpdate, WeightSample,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use firestore::errors::FirestoreError;
use firestore::{FirestoreConsistencySelector, FirestoreTransaction};

// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Attempts per read-modify-write before giving up with `Conflict`.
const MAX_TRANSACTION_ATTEMPTS: u32 = 5;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create an offline client for testing.
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Fetch every document in `collection` owned by `user_id`.
    async fn query_owned<T>(&self, collection: &str, user_id: &str) -> Result<Vec<T>, AppError>
    where
        for<'de> T: serde::Deserialize<'de> + Send,
    {
        let owner = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| q.for_all([q.field("user_id").eq(owner.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Read one document, transform it and write it back in a single transaction.
    ///
    /// The read is bound to the transaction, so a concurrent writer to the same
    /// document aborts this commit instead of being overwritten. Aborted commits
    /// are retried up to `MAX_TRANSACTION_ATTEMPTS` times, then reported as
    /// `Conflict`. `extra` stages further writes into the same commit.
    async fn read_modify_write<T, F, W>(
        &self,
        collection: &'static str,
        doc_id: &str,
        mut apply: F,
        extra: W,
    ) -> Result<T, AppError>
    where
        T: serde::Serialize + Send + Sync,
        for<'de> T: serde::Deserialize<'de>,
        F: FnMut(Option<T>) -> Result<T, AppError> + Send,
        W: Fn(&firestore::FirestoreDb, &mut FirestoreTransaction<'_>) -> Result<(), AppError>
            + Send
            + Sync,
    {
        let client = self.get_client()?;
        let mut attempt = 1;

        loop {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            let tx_client = client.clone_with_consistency_selector(
                FirestoreConsistencySelector::Transaction(transaction.transaction_id().clone()),
            );
            let current = tx_client
                .fluent()
                .select()
                .by_id_in(collection)
                .obj::<T>()
                .one(doc_id)
                .await
                .map_err(|e| {
                    AppError::Database(format!(
                        "Failed to read {} in transaction: {}",
                        collection, e
                    ))
                });

            let staged = current.and_then(&mut apply).and_then(|next| {
                client
                    .fluent()
                    .update()
                    .in_col(collection)
                    .document_id(doc_id)
                    .object(&next)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add {} to transaction: {}",
                            collection, e
                        ))
                    })?;
                extra(client, &mut transaction)?;
                Ok(next)
            });

            let next = match staged {
                Ok(next) => next,
                Err(e) => {
                    transaction.rollback().await.ok();
                    return Err(e);
                }
            };

            match transaction.commit().await {
                Ok(_) => return Ok(next),
                Err(FirestoreError::DatabaseError(ref e))
                    if e.retry_possible && attempt < MAX_TRANSACTION_ATTEMPTS =>
                {
                    tracing::warn!(
                        collection,
                        doc_id,
                        attempt,
                        error = %e,
                        "Transaction aborted, retrying"
                    );
                    attempt += 1;
                }
                Err(e) => {
                    return Err(AppError::Conflict(format!(
                        "{} update not applied: {}",
                        collection, e
                    )))
                }
            }
        }
    }

    /// Helper to batch delete documents using transactions.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        let client = self.get_client()?;

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }
}

#[async_trait]
impl HealthStore for FirestoreDb {
    // ─── Profile Operations ──────────────────────────────────────

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PROFILES)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PROFILES)
            .document_id(&profile.user_id)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Daily Record Operations ─────────────────────────────────

    async fn get_daily_log(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyLog>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::DAILY_LOGS)
            .obj()
            .one(&day_document_id(user_id, date))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment the day's totals in one transaction.
    async fn add_nutrition(
        &self,
        user_id: &str,
        date: NaiveDate,
        entry: &NutritionEntry,
        now: DateTime<Utc>,
    ) -> Result<DailyLog, AppError> {
        self.read_modify_write(
            collections::DAILY_LOGS,
            &day_document_id(user_id, date),
            |current: Option<DailyLog>| {
                let mut log = current.unwrap_or_else(|| DailyLog::empty(user_id, date));
                log.add(entry, now);
                Ok(log)
            },
            |_, _| Ok(()),
        )
        .await
    }

    async fn get_symptoms(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<SymptomEntry>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SYMPTOM_ENTRIES)
            .obj()
            .one(&day_document_id(user_id, date))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn apply_symptoms(
        &self,
        user_id: &str,
        date: NaiveDate,
        update: &SymptomUpdate,
        now: DateTime<Utc>,
    ) -> Result<SymptomEntry, AppError> {
        self.read_modify_write(
            collections::SYMPTOM_ENTRIES,
            &day_document_id(user_id, date),
            |current: Option<SymptomEntry>| {
                let mut symptoms = current.unwrap_or_else(|| SymptomEntry::empty(user_id, date));
                symptoms.apply(update, now);
                Ok(symptoms)
            },
            |_, _| Ok(()),
        )
        .await
    }

    // ─── Weight Operations ───────────────────────────────────────

    /// Write the sample and the profile's current weight in one transaction.
    async fn append_weight_sample(&self, sample: &WeightSample) -> Result<(), AppError> {
        self.read_modify_write(
            collections::PROFILES,
            &sample.user_id,
            |current: Option<Profile>| {
                let mut profile = current.ok_or_else(|| {
                    AppError::NotFound(format!("Profile {} not found", sample.user_id))
                })?;
                profile.current_weight_kg = Some(sample.weight_kg);
                profile.updated_at = sample.recorded_at;
                Ok(profile)
            },
            |client, transaction| {
                client
                    .fluent()
                    .update()
                    .in_col(collections::WEIGHT_SAMPLES)
                    .document_id(&sample.id)
                    .object(sample)
                    .add_to_transaction(transaction)
                    .map(|_| ())
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add weight sample to transaction: {}",
                            e
                        ))
                    })
            },
        )
        .await?;

        tracing::debug!(
            user_id = %sample.user_id,
            sample_id = %sample.id,
            "Weight sample stored atomically"
        );

        Ok(())
    }

    async fn list_weight_samples(
        &self,
        user_id: &str,
        before: Option<&str>,
        limit: u32,
    ) -> Result<Vec<WeightSample>, AppError> {
        let owner = user_id.to_string();
        let query = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::WEIGHT_SAMPLES);

        let query = if let Some(bound) = before {
            let bound = bound.to_string();
            query.filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(owner.clone()),
                    q.field("sort_key").less_than(bound.clone()),
                ])
            })
        } else {
            query.filter(move |q| q.field("user_id").eq(owner.clone()))
        };

        query
            .order_by([("sort_key", firestore::FirestoreQueryDirection::Descending)])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Dose Operations ─────────────────────────────────────────

    async fn append_dose_event(&self, event: &DoseEvent) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::DOSE_EVENTS)
            .document_id(&event.id)
            .object(event)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn list_dose_events(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<DoseEvent>, AppError> {
        let owner = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::DOSE_EVENTS)
            .filter(move |q| q.field("user_id").eq(owner.clone()))
            .order_by([("sort_key", firestore::FirestoreQueryDirection::Descending)])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── User Data Deletion ──────────────────────────────────────

    /// Delete ALL data for a user.
    ///
    /// Removes the user's documents from every collection, profile last so a
    /// failed run can be retried.
    async fn delete_user_data(&self, user_id: &str) -> Result<usize, AppError> {
        let mut deleted_count = 0;

        let (logs, symptoms, samples, doses) = futures_util::try_join!(
            self.query_owned::<DailyLog>(collections::DAILY_LOGS, user_id),
            self.query_owned::<SymptomEntry>(collections::SYMPTOM_ENTRIES, user_id),
            self.query_owned::<WeightSample>(collections::WEIGHT_SAMPLES, user_id),
            self.query_owned::<DoseEvent>(collections::DOSE_EVENTS, user_id),
        )?;

        // 1. Daily logs
        self.batch_delete(&logs, collections::DAILY_LOGS, |log: &DailyLog| {
            day_document_id(&log.user_id, log.date)
        })
        .await?;
        deleted_count += logs.len();
        tracing::debug!(user_id, count = logs.len(), "Deleted daily logs");

        // 2. Symptom entries
        self.batch_delete(
            &symptoms,
            collections::SYMPTOM_ENTRIES,
            |entry: &SymptomEntry| day_document_id(&entry.user_id, entry.date),
        )
        .await?;
        deleted_count += symptoms.len();
        tracing::debug!(user_id, count = symptoms.len(), "Deleted symptom entries");

        // 3. Weight samples
        self.batch_delete(&samples, collections::WEIGHT_SAMPLES, |s: &WeightSample| {
            s.id.clone()
        })
        .await?;
        deleted_count += samples.len();
        tracing::debug!(user_id, count = samples.len(), "Deleted weight samples");

        // 4. Dose events
        self.batch_delete(&doses, collections::DOSE_EVENTS, |d: &DoseEvent| {
            d.id.clone()
        })
        .await?;
        deleted_count += doses.len();
        tracing::debug!(user_id, count = doses.len(), "Deleted dose events");

        // 5. Profile
        if self.get_profile(user_id).await?.is_some() {
            self.get_client()?
                .fluent()
                .delete()
                .from(collections::PROFILES)
                .document_id(user_id)
                .execute()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            deleted_count += 1;
            tracing::debug!(user_id, "Deleted profile");
        }

        tracing::info!(user_id, deleted_count, "User data deletion complete");

        Ok(deleted_count)
    }
}
