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

use cheetah_string::CheetahString;
use topicroute_common::Message;
use topicroute_common::PropertyValue;
use topicroute_common::SystemProperty;

/// Property lookup used while evaluating filter expressions.
///
/// Filters and actions only ever see a message through this trait, so anything exposing
/// user and system properties can be filtered. A missing property is `None`; the evaluator
/// turns that into `NULL` rather than an error.
///
/// # Example
///
/// ```ignore
/// let message = Message::new("body").with_property("color", "red");
/// let context: &dyn EvaluationContext = &message;
/// assert!(context.user_property("color").is_some());
/// assert!(context.system_property(SystemProperty::Subject).is_none());
/// ```
pub trait EvaluationContext {
    /// Application property by exact, case-sensitive name.
    fn user_property(&self, name: &str) -> Option<&PropertyValue>;

    fn system_property(&self, property: SystemProperty) -> Option<&CheetahString>;
}

impl EvaluationContext for Message {
    #[inline]
    fn user_property(&self, name: &str) -> Option<&PropertyValue> {
        self.property(name)
    }

    #[inline]
    fn system_property(&self, property: SystemProperty) -> Option<&CheetahString> {
        Message::system_property(self, property)
    }
}
