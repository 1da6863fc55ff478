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

use std::sync::Arc;

use commitset_lib::commit::Commit;
use commitset_lib::repository::Repository;
use commitset_lib::resolver::CommitId;
use commitset_lib::resolver::CommitRecord;
use commitset_lib::resolver::MillisSinceEpoch;
use commitset_lib::resolver::RepositoryId;
use commitset_lib::resolver::UploadedFileId;
use commitset_lib::store::Store;
use commitset_lib::uploaded_file::UploadedFile;

use crate::mock_resolver::MockResolver;

pub mod mock_resolver;

// Canned repositories mirroring a typical deployment: two top-level
// repositories, an owner/owned pair, and an owned repository sharing its
// name with an unrelated top-level one.

pub fn osx() -> Repository {
    Repository::new(RepositoryId::new(9), "OS X")
}

pub fn webkit() -> Repository {
    Repository::new(RepositoryId::new(11), "WebKit")
}

pub fn owner_repository() -> Repository {
    Repository::new(RepositoryId::new(111), "Owner Repository")
}

pub fn owned_repository() -> Repository {
    Repository::new_owned(RepositoryId::new(112), "Owned Repository", RepositoryId::new(111))
}

pub fn owned_webkit() -> Repository {
    Repository::new_owned(RepositoryId::new(191), "WebKit", RepositoryId::new(9))
}

/// Creates a store backed by the given mock resolver, with all canned
/// repositories registered.
pub fn test_store(resolver: &MockResolver) -> Arc<Store> {
    let store = Store::new(Box::new(resolver.clone()));
    for repository in [
        osx(),
        webkit(),
        owner_repository(),
        owned_repository(),
        owned_webkit(),
    ] {
        store.add_repository(repository);
    }
    store
}

pub fn commit_record(
    id: u64,
    repository: &Repository,
    revision: &str,
    owns_commits: Option<bool>,
    time: Option<i64>,
) -> CommitRecord {
    CommitRecord {
        id: CommitId::new(id),
        repository: repository.id(),
        revision: revision.to_owned(),
        owns_commits,
        time: time.map(MillisSinceEpoch),
    }
}

/// An owner commit already known to own commits.
pub fn owner_commit(store: &Arc<Store>) -> Commit {
    store
        .materialize_commit(&commit_record(
            5,
            &owner_repository(),
            "owner-commit-0",
            Some(true),
            None,
        ))
        .unwrap()
}

/// An owner commit whose ownership is not known yet.
pub fn partial_owner_commit(store: &Arc<Store>) -> Commit {
    store
        .materialize_commit(&commit_record(
            5,
            &owner_repository(),
            "owner-commit-0",
            None,
            Some(1463100957841),
        ))
        .unwrap()
}

pub fn owned_commit(store: &Arc<Store>) -> Commit {
    store
        .materialize_commit(&commit_record(
            6,
            &owned_repository(),
            "owned-commit-0",
            None,
            Some(1456932774000),
        ))
        .unwrap()
}

pub fn webkit_commit(store: &Arc<Store>) -> Commit {
    store
        .materialize_commit(&commit_record(
            2017,
            &webkit(),
            "webkit-commit-0",
            Some(false),
            Some(1456932773000),
        ))
        .unwrap()
}

pub fn create_patch() -> UploadedFile {
    UploadedFile {
        id: UploadedFileId::new(453),
        created_at: MillisSinceEpoch(1493666213000),
        filename: "patch.dat".to_owned(),
        extension: ".dat".to_owned(),
        author: "some user".to_owned(),
        size: 534637,
        sha256: "169463c8125e07c577110fe144ecd63942eb9472d438fc0014f474245e5df8a1".to_owned(),
    }
}

pub fn create_root() -> UploadedFile {
    UploadedFile {
        id: UploadedFileId::new(456),
        created_at: MillisSinceEpoch(1493672607000),
        filename: "root.dat".to_owned(),
        extension: ".dat".to_owned(),
        author: "some user".to_owned(),
        size: 16452234,
        sha256: "03eed7a8494ab8794c44b7d4308e55448fc56f4d6c175809ba968f78f656d58d".to_owned(),
    }
}
