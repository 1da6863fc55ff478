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

use assert_matches::assert_matches;
use commitset_lib::repository::Repository;
use commitset_lib::resolver::RepositoryId;
use commitset_lib::resolver::ResolverError;
use pollster::FutureExt as _;
use pretty_assertions::assert_eq;
use testutils::commit_record;
use testutils::mock_resolver::LoggedRequest;
use testutils::mock_resolver::MockResolver;
use testutils::mock_resolver::RequestKind;
use testutils::owned_repository;
use testutils::owner_repository;
use testutils::test_store;

#[test]
fn test_fetch_owned_commits_wires_back_references() {
    let resolver = MockResolver::new();
    let store = test_store(&resolver);
    let commit = testutils::owner_commit(&store);

    let staged = resolver.stage_owned_commits(&owner_repository(), "owner-commit-0");
    let fetch = commit.fetch_owned_commits();
    staged.resolve(vec![commit_record(
        233,
        &owned_repository(),
        "6f8b0dbbda95a440503b88db1dd03dad3a7b07fb",
        None,
        Some(1463100957841),
    )]);
    let owned = fetch.block_on().unwrap();

    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].repository(), &owned_repository());
    assert_eq!(owned[0].revision(), "6f8b0dbbda95a440503b88db1dd03dad3a7b07fb");
    assert_eq!(owned[0].owner_commit(), Some(commit.clone()));
    assert_eq!(commit.owned_commits(), Some(owned.clone()));
    assert_eq!(commit.owns_commits(), Some(true));
    assert_eq!(
        resolver.requests(),
        vec![LoggedRequest {
            kind: RequestKind::ResolveOwnedCommits,
            repository: owner_repository().id(),
            revision: "owner-commit-0".to_owned(),
        }]
    );
}

#[test]
fn test_concurrent_fetches_issue_one_request() {
    let resolver = MockResolver::new();
    let store = test_store(&resolver);
    let commit = testutils::owner_commit(&store);

    let staged = resolver.stage_owned_commits(&owner_repository(), "owner-commit-0");
    let first = commit.fetch_owned_commits();
    let second = commit.fetch_owned_commits();
    staged.resolve(vec![commit_record(
        233,
        &owned_repository(),
        "6f8b0dbbda95a440503b88db1dd03dad3a7b07fb",
        None,
        None,
    )]);

    let first = first.block_on().unwrap();
    let second = second.block_on().unwrap();
    assert_eq!(first, second);
    assert_eq!(resolver.request_count(), 1);

    // A fetch after resolution is served from the commit itself.
    let third = commit.fetch_owned_commits().block_on().unwrap();
    assert_eq!(third, first);
    assert_eq!(resolver.request_count(), 1);
}

#[test]
fn test_commit_that_owns_nothing_never_fetches() {
    let resolver = MockResolver::new();
    let store = test_store(&resolver);
    let commit = testutils::webkit_commit(&store);
    assert_eq!(commit.owns_commits(), Some(false));

    let owned = commit.fetch_owned_commits().block_on().unwrap();
    assert!(owned.is_empty());
    assert_eq!(resolver.request_count(), 0);
}

#[test]
fn test_failed_fetch_is_shared_and_retryable() {
    let resolver = MockResolver::new();
    let store = test_store(&resolver);
    let commit = testutils::owner_commit(&store);

    let staged = resolver.stage_owned_commits(&owner_repository(), "owner-commit-0");
    let first = commit.fetch_owned_commits();
    let second = commit.fetch_owned_commits();
    staged.fail(ResolverError::other(std::io::Error::other("network down")));

    // Both attached waiters observe the same failure.
    assert_matches!(first.block_on(), Err(ResolverError::Other(_)));
    assert_matches!(second.block_on(), Err(ResolverError::Other(_)));
    assert_eq!(commit.owned_commits(), None);
    assert_eq!(resolver.request_count(), 1);

    // The failure is not terminal; a later call fetches again.
    let staged = resolver.stage_owned_commits(&owner_repository(), "owner-commit-0");
    let retry = commit.fetch_owned_commits();
    staged.resolve(vec![commit_record(
        233,
        &owned_repository(),
        "6f8b0dbbda95a440503b88db1dd03dad3a7b07fb",
        None,
        None,
    )]);
    let owned = retry.block_on().unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(resolver.request_count(), 2);
}

#[test]
fn test_empty_response_leaves_ownership_unknown() {
    let resolver = MockResolver::new();
    let store = test_store(&resolver);
    let commit = testutils::partial_owner_commit(&store);
    assert_eq!(commit.owns_commits(), None);

    let staged = resolver.stage_owned_commits(&owner_repository(), "owner-commit-0");
    let fetch = commit.fetch_owned_commits();
    staged.resolve(vec![]);
    let owned = fetch.block_on().unwrap();

    // Zero owned commits is a legitimate terminal state for an unknown
    // owner, distinct from "never owns commits".
    assert!(owned.is_empty());
    assert_eq!(commit.owns_commits(), None);
    assert_eq!(commit.owned_commits(), Some(vec![]));

    // The result is cached; no second request goes out.
    let again = commit.fetch_owned_commits().block_on().unwrap();
    assert!(again.is_empty());
    assert_eq!(resolver.request_count(), 1);
}

#[test]
fn test_materialize_commit_interns_by_id() {
    let resolver = MockResolver::new();
    let store = test_store(&resolver);
    let partial = testutils::partial_owner_commit(&store);
    assert_eq!(partial.owns_commits(), None);

    let refetched = store
        .materialize_commit(&commit_record(
            5,
            &owner_repository(),
            "owner-commit-0",
            Some(true),
            None,
        ))
        .unwrap();
    assert_eq!(refetched, partial);
    // Knowledge from the fresh record is visible through the old handle.
    assert_eq!(partial.owns_commits(), Some(true));
}

#[test]
fn test_materialize_commit_rejects_unknown_repository() {
    let resolver = MockResolver::new();
    let store = test_store(&resolver);
    let unregistered = Repository::new(RepositoryId::new(999), "Unregistered");
    let result = store.materialize_commit(&commit_record(1, &unregistered, "r1", None, None));
    assert_matches!(result, Err(ResolverError::UnknownRepository(id)) if id == unregistered.id());
}
