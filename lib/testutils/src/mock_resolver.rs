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

use std::collections::HashMap;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use async_trait::async_trait;
use commitset_lib::repository::Repository;
use commitset_lib::resolver::CommitRecord;
use commitset_lib::resolver::CommitResolver;
use commitset_lib::resolver::RepositoryId;
use commitset_lib::resolver::ResolverError;
use commitset_lib::resolver::ResolverResult;
use futures::channel::oneshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
    ResolveRevision,
    ResolveOwnedCommits,
}

/// A request the resolver has actually received, in arrival order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LoggedRequest {
    pub kind: RequestKind,
    pub repository: RepositoryId,
    pub revision: String,
}

#[derive(Default)]
struct MockData {
    requests: Vec<LoggedRequest>,
    staged: HashMap<LoggedRequest, VecDeque<oneshot::Receiver<ResolverResult<Vec<CommitRecord>>>>>,
}

/// A commit resolver for use in tests.
///
/// It's meant to be strict, in order to catch bugs where we make the wrong
/// assumptions: every request must have been staged beforehand with
/// [`MockResolver::stage_revision`] or [`MockResolver::stage_owned_commits`],
/// and an unexpected request fails immediately. Staged responses resolve only
/// when the test releases them, so tests control completion order precisely.
#[derive(Clone, Default)]
pub struct MockResolver {
    data: Arc<Mutex<MockData>>,
}

impl Debug for MockResolver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockResolver").finish_non_exhaustive()
    }
}

/// Handle for one staged response; dropping it unresolved fails the request.
pub struct StagedResponse {
    sender: oneshot::Sender<ResolverResult<Vec<CommitRecord>>>,
}

impl StagedResponse {
    pub fn resolve(self, records: Vec<CommitRecord>) {
        let _: Result<(), _> = self.sender.send(Ok(records));
    }

    pub fn fail(self, error: ResolverError) {
        let _: Result<(), _> = self.sender.send(Err(error));
    }
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked_data(&self) -> MutexGuard<'_, MockData> {
        self.data.lock().unwrap()
    }

    fn stage(&self, key: LoggedRequest) -> StagedResponse {
        let (sender, receiver) = oneshot::channel();
        self.locked_data()
            .staged
            .entry(key)
            .or_default()
            .push_back(receiver);
        StagedResponse { sender }
    }

    pub fn stage_revision(&self, repository: &Repository, revision: &str) -> StagedResponse {
        self.stage(LoggedRequest {
            kind: RequestKind::ResolveRevision,
            repository: repository.id(),
            revision: revision.to_owned(),
        })
    }

    pub fn stage_owned_commits(
        &self,
        repository: &Repository,
        owner_revision: &str,
    ) -> StagedResponse {
        self.stage(LoggedRequest {
            kind: RequestKind::ResolveOwnedCommits,
            repository: repository.id(),
            revision: owner_revision.to_owned(),
        })
    }

    /// All requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<LoggedRequest> {
        self.locked_data().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.locked_data().requests.len()
    }

    async fn dispatch(&self, key: LoggedRequest) -> ResolverResult<Vec<CommitRecord>> {
        let receiver = {
            let mut data = self.locked_data();
            data.requests.push(key.clone());
            data.staged.get_mut(&key).and_then(VecDeque::pop_front)
        };
        let Some(receiver) = receiver else {
            return Err(ResolverError::other(std::io::Error::other(format!(
                "unexpected request: {key:?}"
            ))));
        };
        match receiver.await {
            Ok(result) => result,
            Err(oneshot::Canceled) => Err(ResolverError::other(std::io::Error::other(format!(
                "staged response dropped unresolved: {key:?}"
            )))),
        }
    }
}

#[async_trait]
impl CommitResolver for MockResolver {
    fn name(&self) -> &str {
        "mock"
    }

    async fn resolve_revision(
        &self,
        repository: RepositoryId,
        revision: &str,
    ) -> ResolverResult<Vec<CommitRecord>> {
        self.dispatch(LoggedRequest {
            kind: RequestKind::ResolveRevision,
            repository,
            revision: revision.to_owned(),
        })
        .await
    }

    async fn resolve_owned_commits(
        &self,
        repository: RepositoryId,
        owner_revision: &str,
    ) -> ResolverResult<Vec<CommitRecord>> {
        self.dispatch(LoggedRequest {
            kind: RequestKind::ResolveOwnedCommits,
            repository,
            revision: owner_revision.to_owned(),
        })
        .await
    }
}
