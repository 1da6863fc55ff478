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

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;

use futures::FutureExt as _;
use futures::future::BoxFuture;
use futures::future::try_join_all;
use indexmap::IndexMap;
use itertools::Itertools as _;

use crate::commit::Commit;
use crate::commit_set::CommitSet;
use crate::commit_set::RevisionItem;
use crate::repository::Repository;
use crate::resolver::RepositoryId;
use crate::resolver::ResolverResult;
use crate::store::Store;

#[derive(Clone)]
struct WorkingEntry {
    repository: Repository,
    commit: Commit,
    owner_commit: Option<Commit>,
}

#[derive(Default)]
struct WorkingState {
    entries: IndexMap<RepositoryId, WorkingEntry>,
    // Generation counters survive entry removal: a removal bumps the counter
    // so that a response stamped before it can never resurrect the entry.
    generations: HashMap<RepositoryId, u64>,
}

impl WorkingState {
    fn set_commit(&mut self, repository: &Repository, commit: Commit) {
        let owner_commit = commit.owner_commit();
        self.entries.insert(
            repository.id(),
            WorkingEntry {
                repository: repository.clone(),
                commit,
                owner_commit,
            },
        );
    }

    fn bump_generation(&mut self, id: RepositoryId) -> u64 {
        let generation = self.generations.entry(id).or_insert(0);
        *generation += 1;
        *generation
    }

    fn generation(&self, id: RepositoryId) -> u64 {
        self.generations.get(&id).copied().unwrap_or(0)
    }
}

/// A mutable, in-progress commit set edit.
///
/// The working set is seeded from an immutable [`CommitSet`] snapshot and
/// mutated by repository-keyed operations while asynchronous resolutions are
/// in flight. Overlapping resolutions for the same repository are serialized
/// by per-repository generation counters: every asynchronous update captures
/// the counter at dispatch time and is applied only if the counter is
/// unchanged at completion time, so the final visible state always matches
/// the most recently issued call regardless of response arrival order.
///
/// One instance corresponds to one edit; nothing is shared across unrelated
/// resolution sessions except the [`Store`] the caller supplies.
pub struct IntermediateCommitSet {
    store: Arc<Store>,
    snapshot: CommitSet,
    state: Arc<Mutex<WorkingState>>,
}

impl IntermediateCommitSet {
    pub fn new(store: Arc<Store>, snapshot: CommitSet) -> Self {
        Self {
            store,
            snapshot,
            state: Arc::new(Mutex::new(WorkingState::default())),
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Unconditionally installs `commit` as the entry for `repository`. The
    /// owner relation is recorded from the commit's back-reference; no fetch
    /// is triggered.
    pub fn set_commit_for_repository(&self, repository: &Repository, commit: Commit) {
        self.state.lock().unwrap().set_commit(repository, commit);
    }

    pub fn commit_for_repository(&self, repository: &Repository) -> Option<Commit> {
        let state = self.state.lock().unwrap();
        Some(state.entries.get(&repository.id())?.commit.clone())
    }

    pub fn owner_commit_for_repository(&self, repository: &Repository) -> Option<Commit> {
        let state = self.state.lock().unwrap();
        state.entries.get(&repository.id())?.owner_commit.clone()
    }

    /// The repositories currently present, each once, owner repositories
    /// before the owned repositories they introduced, insertion order
    /// otherwise.
    pub fn repositories(&self) -> Vec<Repository> {
        ordered_repositories(&self.state.lock().unwrap())
    }

    /// Removes the entry for `repository` and, transitively, the entries of
    /// every repository owned by a commit of `repository`. Removing an owned
    /// repository's entry never removes its owner's.
    ///
    /// Removal does not cancel in-flight requests; bumping the generation
    /// makes their responses stale instead.
    pub fn remove_commit_for_repository(&self, repository: &Repository) {
        let mut state = self.state.lock().unwrap();
        let mut pending = vec![repository.id()];
        while let Some(id) = pending.pop() {
            state.entries.shift_remove(&id);
            state.bump_generation(id);
            let owned = state
                .entries
                .values()
                .filter(|entry| {
                    entry
                        .owner_commit
                        .as_ref()
                        .is_some_and(|owner| owner.repository().id() == id)
                })
                .map(|entry| entry.repository.id())
                .collect_vec();
            pending.extend(owned);
        }
    }

    /// Resolves `revision` in `repository` and installs the resulting commit,
    /// unless a newer update or a removal for the same repository was issued
    /// in the meantime; a superseded response is discarded silently and the
    /// future still resolves to `Ok(())`.
    ///
    /// The generation stamp is taken synchronously, before the returned
    /// future is first polled.
    pub fn update_revision_for_owner_repository(
        &self,
        repository: &Repository,
        revision: &str,
    ) -> BoxFuture<'static, ResolverResult<()>> {
        let stamp = self.state.lock().unwrap().bump_generation(repository.id());
        let store = self.store.clone();
        let state = self.state.clone();
        let repository = repository.clone();
        let revision = revision.to_owned();
        async move {
            let commit = store.resolve_revision(&repository, &revision).await?;
            let mut state = state.lock().unwrap();
            if state.generation(repository.id()) == stamp {
                state.set_commit(&repository, commit);
            } else {
                tracing::debug!(
                    repository = repository.name(),
                    revision,
                    "discarding stale revision update"
                );
            }
            Ok(())
        }
        .boxed()
    }

    /// Resolves every revision item of the backing snapshot, then fetches the
    /// owned commits of every resolved commit not known to own none, and
    /// installs the full owner+owned closure.
    ///
    /// Application is all-or-nothing: if any resolution or owned-commit fetch
    /// fails, the working set is left untouched and the whole operation
    /// fails. Any repository whose generation moved while the fetch was in
    /// flight is skipped at installation time, discovered owned repositories
    /// included.
    pub fn fetch_commit_logs(&self) -> BoxFuture<'static, ResolverResult<()>> {
        let items = self.snapshot.revision_items().to_vec();
        // The full generation map at dispatch time; repositories absent from
        // the map are at generation 0, including owned repositories that are
        // only discovered by the fetch itself.
        let stamps: HashMap<RepositoryId, u64> =
            self.state.lock().unwrap().generations.clone();
        let store = self.store.clone();
        let state = self.state.clone();
        async move {
            let mut seen = HashSet::new();
            let mut resolutions = Vec::new();
            for item in &items {
                if seen.insert(item.commit.id()) {
                    resolutions
                        .push(store.resolve_revision(&item.repository, item.commit.revision()));
                }
            }
            let resolved = try_join_all(resolutions).await?;

            let mut owners = Vec::new();
            let mut owned_fetches = Vec::new();
            for commit in &resolved {
                if commit.owns_commits() != Some(false) {
                    owners.push(commit.clone());
                    owned_fetches.push(commit.fetch_owned_commits());
                }
            }
            let owned_lists = try_join_all(owned_fetches).await?;

            let mut state = state.lock().unwrap();
            let is_current = |state: &WorkingState, repository: &Repository| {
                stamps.get(&repository.id()).copied().unwrap_or(0)
                    == state.generation(repository.id())
            };
            for commit in &resolved {
                let repository = commit.repository().clone();
                if is_current(&state, &repository) {
                    state.set_commit(&repository, commit.clone());
                }
            }
            for (owner, owned_commits) in owners.iter().zip(&owned_lists) {
                if !is_current(&state, owner.repository()) {
                    continue;
                }
                for owned in owned_commits {
                    let repository = owned.repository().clone();
                    if is_current(&state, &repository) {
                        state.set_commit(&repository, owned.clone());
                    }
                }
            }
            Ok(())
        }
        .boxed()
    }

    /// Extracts an immutable snapshot of the current working set. Patches and
    /// required-build flags are carried forward from the seeding snapshot for
    /// the repositories that are still present.
    pub fn finalize(&self) -> CommitSet {
        let state = self.state.lock().unwrap();
        let items = ordered_repositories(&state)
            .into_iter()
            .map(|repository| {
                let entry = &state.entries[&repository.id()];
                RevisionItem {
                    repository: repository.clone(),
                    commit: entry.commit.clone(),
                    owner_commit: entry.owner_commit.clone(),
                    patch: self.snapshot.patch_for_repository(&repository).cloned(),
                    requires_build: self.snapshot.requires_build_for_repository(&repository),
                }
            })
            .collect();
        CommitSet::new(items)
    }
}

fn ordered_repositories(state: &WorkingState) -> Vec<Repository> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for entry in state.entries.values() {
        push_with_owner(state, entry, &mut seen, &mut result);
    }
    result
}

fn push_with_owner(
    state: &WorkingState,
    entry: &WorkingEntry,
    seen: &mut HashSet<RepositoryId>,
    result: &mut Vec<Repository>,
) {
    if !seen.insert(entry.repository.id()) {
        return;
    }
    if let Some(owner) = &entry.owner_commit
        && let Some(owner_entry) = state.entries.get(&owner.repository().id())
    {
        push_with_owner(state, owner_entry, seen, result);
    }
    result.push(entry.repository.clone());
}
