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

use itertools::Itertools as _;

use crate::commit::Commit;
use crate::repository::Repository;
use crate::uploaded_file::UploadedFile;

/// One repository's resolved association within a [`CommitSet`]: the commit
/// being tested, the commit that owns it (if any), an optional patch, and
/// whether a custom build is required.
#[derive(Clone, Debug, PartialEq)]
pub struct RevisionItem {
    pub repository: Repository,
    pub commit: Commit,
    pub owner_commit: Option<Commit>,
    pub patch: Option<UploadedFile>,
    pub requires_build: bool,
}

impl RevisionItem {
    /// A plain item for the commit's own repository, taking the owner
    /// relation from the commit's back-reference if one is known.
    pub fn new(commit: Commit) -> Self {
        Self {
            repository: commit.repository().clone(),
            owner_commit: commit.owner_commit(),
            commit,
            patch: None,
            requires_build: false,
        }
    }

    pub fn with_owner(mut self, owner_commit: Commit) -> Self {
        self.owner_commit = Some(owner_commit);
        self
    }

    pub fn with_patch(mut self, patch: UploadedFile) -> Self {
        self.patch = Some(patch);
        self.requires_build = true;
        self
    }
}

/// An immutable, finalized snapshot of a commit set: one revision item per
/// repository, in insertion order. Snapshots seed an
/// [`IntermediateCommitSet`](crate::intermediate_commit_set::IntermediateCommitSet)
/// and are extracted back out of one when an edit is finalized.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommitSet {
    items: Vec<RevisionItem>,
}

impl CommitSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(items: Vec<RevisionItem>) -> Self {
        debug_assert!(
            items
                .iter()
                .map(|item| item.repository.id())
                .all_unique(),
            "a repository may appear at most once in a commit set"
        );
        Self { items }
    }

    pub fn revision_items(&self) -> &[RevisionItem] {
        &self.items
    }

    pub fn repositories(&self) -> Vec<Repository> {
        self.items
            .iter()
            .map(|item| item.repository.clone())
            .collect()
    }

    /// The repositories not owned by another commit in this set.
    pub fn top_level_repositories(&self) -> Vec<Repository> {
        self.items
            .iter()
            .filter(|item| item.owner_commit.is_none())
            .map(|item| item.repository.clone())
            .collect()
    }

    fn item(&self, repository: &Repository) -> Option<&RevisionItem> {
        self.items
            .iter()
            .find(|item| &item.repository == repository)
    }

    pub fn contains_repository(&self, repository: &Repository) -> bool {
        self.item(repository).is_some()
    }

    pub fn commit_for_repository(&self, repository: &Repository) -> Option<&Commit> {
        self.item(repository).map(|item| &item.commit)
    }

    pub fn revision_for_repository(&self, repository: &Repository) -> Option<&str> {
        self.item(repository).map(|item| item.commit.revision())
    }

    pub fn owner_commit_for_repository(&self, repository: &Repository) -> Option<&Commit> {
        self.item(repository)?.owner_commit.as_ref()
    }

    pub fn patch_for_repository(&self, repository: &Repository) -> Option<&UploadedFile> {
        self.item(repository)?.patch.as_ref()
    }

    pub fn requires_build_for_repository(&self, repository: &Repository) -> bool {
        self.item(repository)
            .is_some_and(|item| item.requires_build)
    }
}
