//! In-memory record store.
//!
//! Stands in for the relational database. Implements the two collaborator
//! traits the access core consumes: `UserDirectory` for the gate and
//! `MedicalDetailsSource` for the redaction policy. Handlers reach it only
//! after the gate has admitted the caller.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use volunteerflow_contracts::{
    error::{FlowError, FlowResult},
    records::{Application, Lead, MedicalScreening, MedicalScreeningDetails, Placement, Position},
    user::User,
};
use volunteerflow_core::traits::{MedicalDetailsSource, UserDirectory};

use crate::{activity::ActivityLog, seed};

/// A stored record addressable by id.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Resource name used in `NotFound` errors.
    const RESOURCE: &'static str;

    fn id(&self) -> &str;

    fn touch(&mut self, at: DateTime<Utc>);
}

macro_rules! record {
    ($ty:ty, $resource:literal, $id:ident) => {
        impl Record for $ty {
            const RESOURCE: &'static str = $resource;

            fn id(&self) -> &str {
                &self.$id
            }

            fn touch(&mut self, at: DateTime<Utc>) {
                self.updated_at = at;
            }
        }
    };
}

record!(Lead, "lead", id);
record!(Position, "position", id);
record!(Application, "application", id);
record!(MedicalScreening, "medical screening", id);
record!(MedicalScreeningDetails, "medical details", screening_id);
record!(Placement, "placement", id);

/// Keys a patch may never overwrite.
const IMMUTABLE_KEYS: [&str; 4] = ["id", "screeningId", "createdAt", "updatedAt"];

/// One table of records keyed by id.
#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: BTreeMap<String, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { rows: BTreeMap::new() }
    }
}

impl<T: Record> Table<T> {
    pub fn from_rows(rows: impl IntoIterator<Item = T>) -> Self {
        Self { rows: rows.into_iter().map(|r| (r.id().to_string(), r)).collect() }
    }

    /// All rows in id order.
    pub fn list(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rows.contains_key(id)
    }

    pub fn find(&self, id: &str) -> Option<T> {
        self.rows.get(id).cloned()
    }

    pub fn get(&self, id: &str) -> FlowResult<T> {
        self.find(id).ok_or_else(|| FlowError::not_found(T::RESOURCE, id))
    }

    /// Insert or replace a row.
    pub fn put(&mut self, row: T) -> T {
        self.rows.insert(row.id().to_string(), row.clone());
        row
    }

    /// The row with `id` after applying a JSON merge patch, without storing it.
    ///
    /// Top-level keys in `patch` replace the row's fields; `id` and the
    /// timestamps are never replaced. A patch that produces an invalid
    /// record is a `ValidationFailed`.
    pub fn merged(&self, id: &str, patch: &Value) -> FlowResult<T> {
        let current = self.get(id)?;
        let Some(changes) = patch.as_object() else {
            return Err(FlowError::ValidationFailed { reason: "patch body must be a JSON object".to_string() });
        };

        let mut merged = serde_json::to_value(&current).map_err(|e| FlowError::Collaborator {
            reason: format!("failed to serialize {}: {}", T::RESOURCE, e),
        })?;
        if let Some(fields) = merged.as_object_mut() {
            for (key, value) in changes {
                if !IMMUTABLE_KEYS.contains(&key.as_str()) {
                    fields.insert(key.clone(), value.clone());
                }
            }
        }

        let mut updated: T = serde_json::from_value(merged).map_err(|e| FlowError::ValidationFailed {
            reason: format!("invalid {} update: {}", T::RESOURCE, e),
        })?;
        updated.touch(Utc::now());
        Ok(updated)
    }

    /// Merge `patch` into the row with `id`, run `check` on the result and
    /// store it only if the check passes. On any error the stored row is
    /// unchanged.
    pub fn patch_checked(
        &mut self,
        id: &str,
        patch: &Value,
        check: impl FnOnce(&T) -> FlowResult<()>,
    ) -> FlowResult<T> {
        let updated = self.merged(id, patch)?;
        check(&updated)?;
        Ok(self.put(updated))
    }

    pub fn patch(&mut self, id: &str, patch: &Value) -> FlowResult<T> {
        self.patch_checked(id, patch, |_| Ok(()))
    }

    pub fn remove(&mut self, id: &str) -> FlowResult<T> {
        self.rows.remove(id).ok_or_else(|| FlowError::not_found(T::RESOURCE, id))
    }
}

/// Every table the service serves.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub users: BTreeMap<String, User>,
    pub leads: Table<Lead>,
    pub positions: Table<Position>,
    pub applications: Table<Application>,
    pub screenings: Table<MedicalScreening>,
    /// Restricted layer, keyed by screening id.
    pub medical_details: Table<MedicalScreeningDetails>,
    pub placements: Table<Placement>,
    /// Dashboard feed of record changes.
    pub activities: ActivityLog,
}

pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// A store with no users and no records.
    pub fn empty() -> Self {
        Self { tables: RwLock::new(Tables::default()) }
    }

    /// A store loaded with the seed staff and recruitment records.
    pub fn seeded() -> Self {
        let (screenings, details) = seed::medical_screenings();
        let tables = Tables {
            users: seed::staff_users().into_iter().map(|u| (u.id.clone(), u)).collect(),
            leads: Table::from_rows(seed::leads()),
            positions: Table::from_rows(seed::positions()),
            applications: Table::from_rows(seed::applications()),
            screenings: Table::from_rows(screenings),
            medical_details: Table::from_rows(details),
            placements: Table::from_rows(seed::placements()),
            activities: ActivityLog::default(),
        };
        Self { tables: RwLock::new(tables) }
    }

    /// Run `f` with shared access to the tables.
    pub fn read<R>(&self, f: impl FnOnce(&Tables) -> FlowResult<R>) -> FlowResult<R> {
        let tables = self.tables.read().map_err(|e| FlowError::Collaborator {
            reason: format!("store lock poisoned: {}", e),
        })?;
        f(&tables)
    }

    /// Run `f` with exclusive access to the tables.
    pub fn write<R>(&self, f: impl FnOnce(&mut Tables) -> FlowResult<R>) -> FlowResult<R> {
        let mut tables = self.tables.write().map_err(|e| FlowError::Collaborator {
            reason: format!("store lock poisoned: {}", e),
        })?;
        f(&mut tables)
    }

    /// Provision or replace a staff account.
    pub fn upsert_user(&self, user: User) -> FlowResult<()> {
        self.write(|t| {
            t.users.insert(user.id.clone(), user);
            Ok(())
        })
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::seeded()
    }
}

impl UserDirectory for InMemoryStore {
    fn find_user(&self, subject: &str) -> FlowResult<Option<User>> {
        self.read(|t| Ok(t.users.get(subject).cloned()))
    }
}

impl MedicalDetailsSource for InMemoryStore {
    fn medical_details(&self, screening_id: &str) -> FlowResult<Option<MedicalScreeningDetails>> {
        self.read(|t| Ok(t.medical_details.find(screening_id)))
    }
}
