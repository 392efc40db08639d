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

//! Topics, subscriptions and rules, and the [`TopicRouter`] that routes published messages
//! to every subscription whose rules accept them.

pub mod router;
pub mod rule;
pub mod sink;
pub mod subscription;
pub mod topic;
pub mod topology;

pub use router::DispatchSummary;
pub use router::TopicRouter;
pub use rule::Rule;
pub use rule::RuleDescription;
pub use rule::DEFAULT_RULE_NAME;
pub use sink::MemorySink;
pub use sink::OutboundSink;
pub use subscription::Subscription;
pub use topic::PublishOutcome;
pub use topic::SubscriptionFailure;
pub use topic::Topic;
pub use topology::Topology;
