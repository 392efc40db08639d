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

//! Outbound sinks receive the per-subscription copies produced by a publish.
//!
//! A sink owns durability and transport. The router calls it once per delivered copy and
//! never retries on its behalf.

mod memory_sink;

pub use memory_sink::MemorySink;
use topicroute_common::Message;
use topicroute_error::RouteResult;

#[trait_variant::make(OutboundSink: Send)]
pub trait LocalOutboundSink {
    /// Enqueues `message` for `subscription`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Sink`](topicroute_error::RouteError::Sink) when the message
    /// cannot be accepted, e.g. because the subscription's queue is full.
    async fn deliver(&self, subscription: &str, message: Message) -> RouteResult<()>;
}
