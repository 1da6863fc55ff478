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

use crate::resolver::MillisSinceEpoch;
use crate::resolver::UploadedFileId;

/// A build artifact uploaded by a user, attached to a commit set either as a
/// per-repository patch or as a custom root.
///
/// This crate treats uploaded files as opaque records; equality is
/// attribute-wise.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub id: UploadedFileId,
    pub created_at: MillisSinceEpoch,
    pub filename: String,
    pub extension: String,
    pub author: String,
    pub size: u64,
    pub sha256: String,
}
