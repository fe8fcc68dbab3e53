//! Owner set reconciliation
//!
//! Diffs the declared owners of a group against its live owners and applies
//! the difference one call at a time. Every addition is applied before any
//! removal, so a group never drops to zero owners between the two.

use azuread_directory::DirectoryClient;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{OwnerOperation, ProviderError, ProviderResult};

/// Additions and removals that turn one owner set into another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerDiff {
    /// Desired owners not currently present, in desired order.
    pub to_add: Vec<String>,
    /// Current owners not desired, in current order.
    pub to_remove: Vec<String>,
}

impl OwnerDiff {
    /// Computes the diff from `current` to `desired`.
    ///
    /// IDs are compared in canonical form, so the same GUID in a different
    /// case counts as the same owner. The diff keeps the IDs as given.
    pub fn between<D, C>(desired: &[D], current: &[C]) -> Self
    where
        D: AsRef<str>,
        C: AsRef<str>,
    {
        let desired_set: HashSet<String> =
            desired.iter().map(|d| canonical_id(d.as_ref())).collect();
        let current_set: HashSet<String> =
            current.iter().map(|c| canonical_id(c.as_ref())).collect();

        Self {
            to_add: ordered_difference(desired, &current_set),
            to_remove: ordered_difference(current, &desired_set),
        }
    }

    /// True when nothing needs to change.
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Number of remote calls applying this diff takes.
    pub fn len(&self) -> usize {
        self.to_add.len() + self.to_remove.len()
    }
}

/// Lowercase hyphenated form for GUIDs, ASCII lowercase for anything else.
fn canonical_id(id: &str) -> String {
    match Uuid::parse_str(id.trim()) {
        Ok(uuid) => uuid.to_string(),
        Err(_) => id.trim().to_ascii_lowercase(),
    }
}

fn ordered_difference<T: AsRef<str>>(items: &[T], exclude: &HashSet<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|item| item.as_ref())
        .filter(|item| {
            let key = canonical_id(item);
            !exclude.contains(&key) && seen.insert(key)
        })
        .map(String::from)
        .collect()
}

/// What an applied diff actually did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Owners added to the group.
    pub added: Vec<String>,
    /// Owners removed from the group.
    pub removed: Vec<String>,
    /// Removals the directory reported as already done.
    pub already_absent: Vec<String>,
}

impl ReconcileReport {
    /// True when no owner call was issued.
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.already_absent.is_empty()
    }
}

/// Applies owner diffs against a directory.
///
/// Holds no state between calls; every reconciliation re-reads the live
/// owners, so re-running after a failure picks up wherever the last run
/// stopped.
pub struct OwnerReconciler<'a, D: DirectoryClient + ?Sized> {
    directory: &'a D,
}

impl<'a, D: DirectoryClient + ?Sized> OwnerReconciler<'a, D> {
    pub fn new(directory: &'a D) -> Self {
        Self { directory }
    }

    /// Live owner IDs of a group. Only users and service principals count.
    pub async fn current_owners(&self, group_id: &str) -> ProviderResult<Vec<String>> {
        self.directory
            .owner_ids(group_id)
            .await
            .map_err(|e| ProviderError::directory("listing owners of group", group_id, e))
    }

    /// Brings the owners of `group_id` in line with `desired`.
    #[instrument(skip(self, desired), fields(desired = desired.len()))]
    pub async fn reconcile<S: AsRef<str> + Sync>(
        &self,
        group_id: &str,
        desired: &[S],
    ) -> ProviderResult<ReconcileReport> {
        let current = self.current_owners(group_id).await?;
        let diff = OwnerDiff::between(desired, &current);
        debug!(
            current = current.len(),
            to_add = diff.to_add.len(),
            to_remove = diff.to_remove.len(),
            "Computed owner diff"
        );
        self.apply(group_id, &diff).await
    }

    /// Applies a precomputed diff: all additions, then all removals.
    ///
    /// The first failure stops the run. Removing an owner that is already
    /// gone counts as success; adding one that does not exist does not.
    pub async fn apply(&self, group_id: &str, diff: &OwnerDiff) -> ProviderResult<ReconcileReport> {
        let mut report = ReconcileReport::default();

        for owner_id in &diff.to_add {
            self.directory
                .add_owner(group_id, owner_id)
                .await
                .map_err(|source| ProviderError::OwnerOperation {
                    operation: OwnerOperation::Add,
                    group_id: group_id.to_string(),
                    owner_id: owner_id.clone(),
                    source,
                })?;
            report.added.push(owner_id.clone());
        }

        for owner_id in &diff.to_remove {
            match self.directory.remove_owner(group_id, owner_id).await {
                Ok(()) => report.removed.push(owner_id.clone()),
                Err(e) if e.is_not_found() => {
                    warn!(%group_id, %owner_id, "Owner already removed");
                    report.already_absent.push(owner_id.clone());
                }
                Err(source) => {
                    return Err(ProviderError::OwnerOperation {
                        operation: OwnerOperation::Remove,
                        group_id: group_id.to_string(),
                        owner_id: owner_id.clone(),
                        source,
                    })
                }
            }
        }

        if !report.is_noop() {
            info!(
                %group_id,
                added = report.added.len(),
                removed = report.removed.len(),
                "Reconciled group owners"
            );
        }
        Ok(report)
    }
}
