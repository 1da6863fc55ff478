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

use indexmap::IndexMap;

use crate::repository::Repository;
use crate::resolver::RepositoryId;
use crate::uploaded_file::UploadedFile;

#[derive(Clone, Debug, PartialEq)]
struct CustomRevisionEntry {
    repository: Repository,
    revision: String,
    patch: Option<UploadedFile>,
    // The owner revision is stored as a raw string referencing another
    // entry's revision; it is never resolved by name matching.
    owner_revision: Option<String>,
}

/// A user-authored commit set: revisions (and optional patches and explicit
/// owner revisions) are supplied directly instead of being resolved remotely.
/// Purely synchronous; no remote calls are ever issued.
///
/// Equality is structural and independent of insertion order: two sets are
/// equal iff they cover the same repositories with the same
/// (revision, patch, owner revision) triple per repository, and their custom
/// roots are attribute-wise equal.
#[derive(Clone, Debug, Default)]
pub struct CustomCommitSet {
    entries: IndexMap<RepositoryId, CustomRevisionEntry>,
    custom_roots: Vec<UploadedFile>,
}

impl PartialEq for CustomCommitSet {
    fn eq(&self, other: &Self) -> bool {
        // IndexMap equality ignores insertion order.
        self.entries == other.entries && self.custom_roots == other.custom_roots
    }
}

impl CustomCommitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry for `repository`. `owner_revision`, when
    /// given, should reference the revision of another entry whose repository
    /// owns this one; it is stored verbatim.
    pub fn set_revision_for_repository(
        &mut self,
        repository: &Repository,
        revision: &str,
        patch: Option<UploadedFile>,
        owner_revision: Option<&str>,
    ) {
        self.entries.insert(
            repository.id(),
            CustomRevisionEntry {
                repository: repository.clone(),
                revision: revision.to_owned(),
                patch,
                owner_revision: owner_revision.map(str::to_owned),
            },
        );
    }

    pub fn revision_for_repository(&self, repository: &Repository) -> Option<&str> {
        let entry = self.entries.get(&repository.id())?;
        Some(&entry.revision)
    }

    pub fn patch_for_repository(&self, repository: &Repository) -> Option<&UploadedFile> {
        self.entries.get(&repository.id())?.patch.as_ref()
    }

    pub fn owner_revision_for_repository(&self, repository: &Repository) -> Option<&str> {
        self.entries.get(&repository.id())?.owner_revision.as_deref()
    }

    /// All repositories present, in insertion order.
    pub fn repositories(&self) -> Vec<Repository> {
        self.entries
            .values()
            .map(|entry| entry.repository.clone())
            .collect()
    }

    /// The repositories whose entries carry no owner revision. An owned
    /// repository sharing a name with an unrelated top-level repository is
    /// excluded solely based on its own entry, never by name comparison.
    pub fn top_level_repositories(&self) -> Vec<Repository> {
        self.entries
            .values()
            .filter(|entry| entry.owner_revision.is_none())
            .map(|entry| entry.repository.clone())
            .collect()
    }

    /// Appends a custom root. Roots are kept in insertion order; duplicates
    /// are permitted.
    pub fn add_custom_root(&mut self, file: UploadedFile) {
        self.custom_roots.push(file);
    }

    pub fn custom_roots(&self) -> &[UploadedFile] {
        &self.custom_roots
    }
}
