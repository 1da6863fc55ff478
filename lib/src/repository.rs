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
use std::hash::Hash;
use std::hash::Hasher;

use crate::resolver::RepositoryId;

/// A source repository known to the commit service.
///
/// Repositories compare equal iff they have the same id. Names are display
/// strings and carry no identity: an owned repository may share its name with
/// an unrelated top-level repository.
#[derive(Clone, serde::Serialize)]
pub struct Repository {
    id: RepositoryId,
    name: String,
    owner: Option<RepositoryId>,
}

impl Debug for Repository {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl PartialEq for Repository {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Repository {}

impl Hash for Repository {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Repository {
    pub fn new(id: RepositoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            owner: None,
        }
    }

    /// Creates a repository whose revisions are pinned by commits of the
    /// `owner` repository. The owner relation is acyclic by construction.
    pub fn new_owned(id: RepositoryId, name: impl Into<String>, owner: RepositoryId) -> Self {
        Self {
            id,
            name: name.into(),
            owner: Some(owner),
        }
    }

    pub fn id(&self) -> RepositoryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> Option<RepositoryId> {
        self.owner
    }
}
