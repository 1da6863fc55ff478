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
use std::collections::hash_map::Entry;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::sync::Arc;
use std::sync::Mutex;

use crate::commit::Commit;
use crate::commit::CommitInner;
use crate::repository::Repository;
use crate::resolver::CommitId;
use crate::resolver::CommitRecord;
use crate::resolver::CommitResolver;
use crate::resolver::RepositoryId;
use crate::resolver::ResolverError;
use crate::resolver::ResolverResult;

/// Wraps the low-level resolver and makes it return [`Commit`] handles
/// instead of raw records. Also interns commits: the same commit id always
/// yields the same shared instance, so knowledge learned about a commit
/// (owned commits, owner back-reference) is visible everywhere it appears.
///
/// The cache lives for one resolution session and never evicts.
pub struct Store {
    resolver: Box<dyn CommitResolver>,
    repositories: Mutex<HashMap<RepositoryId, Repository>>,
    commit_cache: Mutex<HashMap<CommitId, Arc<CommitInner>>>,
}

impl Debug for Store {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl Store {
    pub fn new(resolver: Box<dyn CommitResolver>) -> Arc<Self> {
        Arc::new(Self {
            resolver,
            repositories: Mutex::new(HashMap::new()),
            commit_cache: Mutex::new(HashMap::new()),
        })
    }

    pub fn resolver(&self) -> &dyn CommitResolver {
        self.resolver.as_ref()
    }

    /// Registers a repository so that commit records referencing its id can
    /// be materialized. A record for an unregistered repository is a
    /// resolution failure.
    pub fn add_repository(&self, repository: Repository) {
        self.repositories
            .lock()
            .unwrap()
            .insert(repository.id(), repository);
    }

    pub fn repository(&self, id: RepositoryId) -> Option<Repository> {
        self.repositories.lock().unwrap().get(&id).cloned()
    }

    /// Looks up or interns the commit described by `record`. Materializing
    /// the same commit id twice returns the same shared instance, with
    /// `owns_commits` knowledge merged from both records.
    pub fn materialize_commit(
        self: &Arc<Self>,
        record: &CommitRecord,
    ) -> ResolverResult<Commit> {
        let repository = self
            .repository(record.repository)
            .ok_or(ResolverError::UnknownRepository(record.repository))?;
        let (inner, existed) = {
            let mut cache = self.commit_cache.lock().unwrap();
            match cache.entry(record.id) {
                Entry::Occupied(entry) => (entry.get().clone(), true),
                Entry::Vacant(entry) => (
                    entry
                        .insert(Arc::new(CommitInner::new(record, repository)))
                        .clone(),
                    false,
                ),
            }
        };
        if existed {
            inner.merge_record(record);
        }
        Ok(Commit::new(self.clone(), inner))
    }

    pub fn cached_commit(self: &Arc<Self>, id: CommitId) -> Option<Commit> {
        let inner = self.commit_cache.lock().unwrap().get(&id).cloned()?;
        Some(Commit::new(self.clone(), inner))
    }

    /// Resolves a single revision in `repository` against the remote service.
    /// An empty response is a [`ResolverError::CommitNotFound`] failure.
    pub async fn resolve_revision(
        self: &Arc<Self>,
        repository: &Repository,
        revision: &str,
    ) -> ResolverResult<Commit> {
        tracing::debug!(
            repository = repository.name(),
            revision,
            "resolving commit by revision"
        );
        let records = self
            .resolver
            .resolve_revision(repository.id(), revision)
            .await?;
        let record = records
            .into_iter()
            .next()
            .ok_or_else(|| ResolverError::CommitNotFound {
                repository: repository.id(),
                revision: revision.to_owned(),
            })?;
        if record.repository != repository.id() {
            return Err(ResolverError::UnexpectedRepository {
                expected: repository.id(),
                actual: record.repository,
            });
        }
        self.materialize_commit(&record)
    }
}
