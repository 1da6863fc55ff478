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

use commitset_lib::commit_set::CommitSet;
use commitset_lib::commit_set::RevisionItem;
use pretty_assertions::assert_eq;
use testutils::create_patch;
use testutils::mock_resolver::MockResolver;
use testutils::owned_repository;
use testutils::owner_repository;
use testutils::test_store;
use testutils::webkit;

#[test]
fn test_snapshot_listings() {
    let resolver = MockResolver::new();
    let store = test_store(&resolver);
    let owner = testutils::owner_commit(&store);
    let owned = testutils::owned_commit(&store);
    let webkit_commit = testutils::webkit_commit(&store);

    let commit_set = CommitSet::new(vec![
        RevisionItem::new(webkit_commit.clone()).with_patch(create_patch()),
        RevisionItem::new(owner.clone()),
        RevisionItem::new(owned.clone()).with_owner(owner.clone()),
    ]);

    assert_eq!(
        commit_set.repositories(),
        vec![webkit(), owner_repository(), owned_repository()]
    );
    assert_eq!(
        commit_set.top_level_repositories(),
        vec![webkit(), owner_repository()]
    );
    assert_eq!(
        commit_set.revision_for_repository(&webkit()),
        Some("webkit-commit-0")
    );
    assert_eq!(commit_set.commit_for_repository(&owner_repository()), Some(&owner));
    assert_eq!(
        commit_set.owner_commit_for_repository(&owned_repository()),
        Some(&owner)
    );
    assert_eq!(commit_set.owner_commit_for_repository(&webkit()), None);
    assert_eq!(
        commit_set.patch_for_repository(&webkit()),
        Some(&create_patch())
    );
    assert!(commit_set.requires_build_for_repository(&webkit()));
    assert!(!commit_set.requires_build_for_repository(&owner_repository()));
    assert!(commit_set.contains_repository(&owned_repository()));
    assert!(commit_set.revision_items().len() == 3);
}

#[test]
fn test_snapshot_equality() {
    let resolver = MockResolver::new();
    let store = test_store(&resolver);
    let webkit_commit = testutils::webkit_commit(&store);

    let with_patch = || {
        CommitSet::new(vec![
            RevisionItem::new(webkit_commit.clone()).with_patch(create_patch()),
        ])
    };
    assert_eq!(with_patch(), with_patch());
    assert_ne!(
        with_patch(),
        CommitSet::new(vec![RevisionItem::new(webkit_commit.clone())])
    );
    assert_ne!(CommitSet::empty(), with_patch());
}
