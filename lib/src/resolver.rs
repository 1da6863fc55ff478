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
use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeZone as _;
use thiserror::Error;

/// Identifier for a repository, assigned by the commit service.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct RepositoryId(u64);

impl RepositoryId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl Display for RepositoryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Identifier for a commit record, assigned by the commit service. Two
/// records with the same id describe the same logical commit.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct CommitId(u64);

impl CommitId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl Display for CommitId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct UploadedFileId(u64);

impl UploadedFileId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl Display for UploadedFileId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct MillisSinceEpoch(pub i64);

impl MillisSinceEpoch {
    pub fn from_datetime<Tz: chrono::TimeZone>(datetime: chrono::DateTime<Tz>) -> Self {
        Self(datetime.timestamp_millis())
    }

    pub fn to_datetime(self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::Utc.timestamp_millis_opt(self.0).single()
    }
}

/// Raw commit record as returned by the remote commit service.
///
/// `owns_commits` is tri-state: `Some(true)` means the commit pins revisions
/// in other repositories, `Some(false)` means it never does, and `None` means
/// the service doesn't know yet.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    pub id: CommitId,
    pub repository: RepositoryId,
    pub revision: String,
    #[serde(default)]
    pub owns_commits: Option<bool>,
    #[serde(default)]
    pub time: Option<MillisSinceEpoch>,
}

/// Error that may occur while resolving commits against the remote service.
///
/// Unlike most error enums, this one is `Clone`: a coalesced owned-commit
/// fetch has multiple waiters, and every waiter observes the same failure.
/// Foreign sources are therefore held in `Arc` rather than `Box`.
#[derive(Clone, Debug, Error)]
pub enum ResolverError {
    #[error("No commit found for revision {revision} in repository {repository}")]
    CommitNotFound {
        repository: RepositoryId,
        revision: String,
    },
    #[error("Commit record references unregistered repository {0}")]
    UnknownRepository(RepositoryId),
    #[error("Expected a commit in repository {expected}, got one in repository {actual}")]
    UnexpectedRepository {
        expected: RepositoryId,
        actual: RepositoryId,
    },
    #[error("Commit store was dropped while a fetch was in flight")]
    SessionClosed,
    #[error(transparent)]
    Other(Arc<dyn std::error::Error + Send + Sync>),
}

impl ResolverError {
    pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other(Arc::new(err))
    }
}

pub type ResolverResult<T> = Result<T, ResolverError>;

/// Defines the interface to the remote commit service. This is the only I/O
/// boundary of the crate; implementations own transport concerns entirely.
#[async_trait]
pub trait CommitResolver: Send + Sync + Debug {
    /// A short name identifying the resolver, for diagnostics.
    fn name(&self) -> &str;

    /// Resolves a single revision in a repository. The returned list contains
    /// zero or one record.
    async fn resolve_revision(
        &self,
        repository: RepositoryId,
        revision: &str,
    ) -> ResolverResult<Vec<CommitRecord>>;

    /// Returns the commit records pinned by the given owner revision, one per
    /// owned repository. An empty list is a valid response.
    async fn resolve_owned_commits(
        &self,
        repository: RepositoryId,
        owner_revision: &str,
    ) -> ResolverResult<Vec<CommitRecord>>;
}
