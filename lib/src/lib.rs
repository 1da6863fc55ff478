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

//! Asynchronous commit-set resolution.
//!
//! A commit set maps source repositories to the specific revision being
//! tested. A commit of an "owner" repository can pin revisions in other,
//! "owned" repositories; those owned commits are discovered lazily by
//! querying a remote commit service through the [`resolver::CommitResolver`]
//! seam. The [`intermediate_commit_set::IntermediateCommitSet`] working set
//! drives that resolution with latest-invocation-wins semantics for
//! overlapping requests, while [`commit_set::CommitSet`] and
//! [`custom_commit_set::CustomCommitSet`] are the immutable and user-authored
//! forms respectively.

#![deny(unused_must_use)]

pub mod commit;
pub mod commit_set;
pub mod custom_commit_set;
pub mod intermediate_commit_set;
pub mod repository;
pub mod resolver;
pub mod store;
pub mod uploaded_file;
