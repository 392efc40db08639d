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
use topicroute_common::PropertyValue;
use topicroute_common::SystemProperty;

use crate::expression::evaluation_context::EvaluationContext;

/// A context in which every property is undefined.
///
/// Used to evaluate constant expressions, e.g. when validating rules without a message.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyEvaluationContext;

impl EvaluationContext for EmptyEvaluationContext {
    fn user_property(&self, _name: &str) -> Option<&PropertyValue> {
        None
    }

    fn system_property(&self, _property: SystemProperty) -> Option<&CheetahString> {
        None
    }
}
