// Copyright 2025 The TopicRoute Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! TopicRoute admin tools.
//!
//! The `topicroute-admin-cli` binary loads a topology (or the built-in order sample), routes
//! messages through it and prints what each subscription would receive. Nothing leaves the
//! process: deliveries land in a [`MemorySink`](topicroute_broker::MemorySink).

pub mod commands;
pub mod message_file;
pub mod sample;
pub mod topicroute_cli;
