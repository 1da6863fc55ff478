// Copyright 2026 The CommitSet Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![expect(missing_docs)]

use std::fmt::Debug;
use std::fmt::Formatter;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::Weak;

use futures::FutureExt as _;
use futures::future;
use futures::future::BoxFuture;
use futures::future::Shared;

use crate::repository::Repository;
use crate::resolver::CommitId;
use crate::resolver::CommitRecord;
use crate::resolver::MillisSinceEpoch;
use crate::resolver::ResolverError;
use crate::resolver::ResolverResult;
use crate::store::Store;

type OwnedCommitsFuture = Shared<BoxFuture<'static, ResolverResult<Vec<CommitId>>>>;

/// Owned-commit knowledge of a single commit. At most one fetch is in flight
/// per commit; concurrent callers attach to the shared pending future.
#[derive(Default)]
enum OwnedCommits {
    #[default]
    Unknown,
    Pending(OwnedCommitsFuture),
    Resolved(Vec<CommitId>),
}

#[derive(Default)]
struct CommitState {
    owns_commits: Option<bool>,
    owner: Option<CommitId>,
    owned_commits: OwnedCommits,
}

pub(crate) struct CommitInner {
    id: CommitId,
    repository: Repository,
    revision: String,
    time: Option<MillisSinceEpoch>,
    state: Mutex<CommitState>,
}

impl CommitInner {
    pub(crate) fn new(record: &CommitRecord, repository: Repository) -> Self {
        Self {
            id: record.id,
            repository,
            revision: record.revision.clone(),
            time: record.time,
            state: Mutex::new(CommitState {
                owns_commits: record.owns_commits,
                ..CommitState::default()
            }),
        }
    }

    /// Folds a freshly fetched record for the same commit into what's already
    /// known. Only upgrades `owns_commits` from unknown; a commit that has
    /// been marked as owning (or never owning) commits keeps that knowledge.
    pub(crate) fn merge_record(&self, record: &CommitRecord) {
        let mut state = self.state.lock().unwrap();
        if state.owns_commits.is_none() {
            state.owns_commits = record.owns_commits;
        }
    }

    pub(crate) fn id(&self) -> CommitId {
        self.id
    }
}

/// A single revision in one repository.
///
/// `Commit` is a cheap-clone handle; all handles for the same commit id share
/// the same underlying state through the [`Store`] cache, so owned-commit
/// knowledge learned through one handle is visible through all of them.
#[derive(Clone)]
pub struct Commit {
    store: Arc<Store>,
    inner: Arc<CommitInner>,
}

impl Debug for Commit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Commit")
            .field("id", &self.inner.id)
            .field("revision", &self.inner.revision)
            .finish()
    }
}

impl PartialEq for Commit {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Commit {}

impl std::hash::Hash for Commit {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl Commit {
    pub(crate) fn new(store: Arc<Store>, inner: Arc<CommitInner>) -> Self {
        Self { store, inner }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn id(&self) -> CommitId {
        self.inner.id
    }

    pub fn repository(&self) -> &Repository {
        &self.inner.repository
    }

    pub fn revision(&self) -> &str {
        &self.inner.revision
    }

    pub fn time(&self) -> Option<MillisSinceEpoch> {
        self.inner.time
    }

    /// Whether this commit pins revisions in other repositories. `None` means
    /// not known yet; `Some(false)` is terminal and suppresses fetches.
    pub fn owns_commits(&self) -> Option<bool> {
        self.inner.state.lock().unwrap().owns_commits
    }

    /// The commit that owns this one, set once an owned-commit fetch for the
    /// owner has completed.
    pub fn owner_commit(&self) -> Option<Commit> {
        let owner_id = self.inner.state.lock().unwrap().owner?;
        self.store.cached_commit(owner_id)
    }

    /// The owned commits of this commit, or `None` if no fetch has completed
    /// yet. `Some(vec![])` means a fetch completed and found none.
    pub fn owned_commits(&self) -> Option<Vec<Commit>> {
        let ids = match &self.inner.state.lock().unwrap().owned_commits {
            OwnedCommits::Resolved(ids) => ids.clone(),
            _ => return None,
        };
        Some(self.commits_by_id(&ids))
    }

    /// Resolves the commits owned by this commit, in service response order.
    ///
    /// Issues at most one remote request: calls made while a fetch is in
    /// flight attach to it, and all callers observe the same result or the
    /// same error. A failed fetch leaves the commit unresolved so that a
    /// later call can retry.
    pub fn fetch_owned_commits(&self) -> BoxFuture<'static, ResolverResult<Vec<Commit>>> {
        let shared = {
            let mut state = self.inner.state.lock().unwrap();
            if state.owns_commits == Some(false) {
                return future::ready(Ok(Vec::new())).boxed();
            }
            match &state.owned_commits {
                OwnedCommits::Resolved(ids) => {
                    let commits = self.commits_by_id(ids);
                    return future::ready(Ok(commits)).boxed();
                }
                OwnedCommits::Pending(shared) => shared.clone(),
                OwnedCommits::Unknown => {
                    let shared = spawn_owned_fetch(&self.store, &self.inner);
                    state.owned_commits = OwnedCommits::Pending(shared.clone());
                    shared
                }
            }
        };
        let this = self.clone();
        async move {
            let ids = shared.await?;
            Ok(this.commits_by_id(&ids))
        }
        .boxed()
    }

    // Owned commit ids are interned by the store cache, which never evicts,
    // so the lookups cannot miss.
    fn commits_by_id(&self, ids: &[CommitId]) -> Vec<Commit> {
        ids.iter()
            .filter_map(|&id| self.store.cached_commit(id))
            .collect()
    }
}

/// Creates the single in-flight resolution future for a commit's owned
/// commits. The future holds weak references only: the pending slot lives
/// inside the commit itself, and strong captures would keep the store alive
/// through its own cache.
fn spawn_owned_fetch(store: &Arc<Store>, inner: &Arc<CommitInner>) -> OwnedCommitsFuture {
    let store = Arc::downgrade(store);
    let inner = Arc::downgrade(inner);
    async move {
        let result = resolve_owned_commits(&store, &inner).await;
        if let Some(inner) = inner.upgrade() {
            let mut state = inner.state.lock().unwrap();
            match &result {
                Ok(ids) => {
                    // An unknown owner that turns out to own nothing stays
                    // unknown; only a non-empty response proves ownership.
                    if !ids.is_empty() {
                        state.owns_commits = Some(true);
                    }
                    state.owned_commits = OwnedCommits::Resolved(ids.clone());
                }
                Err(_) => {
                    state.owned_commits = OwnedCommits::Unknown;
                }
            }
        }
        result
    }
    .boxed()
    .shared()
}

async fn resolve_owned_commits(
    store: &Weak<Store>,
    inner: &Weak<CommitInner>,
) -> ResolverResult<Vec<CommitId>> {
    let (store, inner) = match (store.upgrade(), inner.upgrade()) {
        (Some(store), Some(inner)) => (store, inner),
        _ => return Err(ResolverError::SessionClosed),
    };
    tracing::debug!(
        repository = inner.repository.name(),
        owner_revision = inner.revision,
        "fetching owned commits"
    );
    let records = store
        .resolver()
        .resolve_owned_commits(inner.repository.id(), &inner.revision)
        .await?;
    let mut ids = Vec::with_capacity(records.len());
    for record in &records {
        let owned = store.materialize_commit(record)?;
        owned.inner.state.lock().unwrap().owner = Some(inner.id);
        ids.push(owned.id());
    }
    Ok(ids)
}
