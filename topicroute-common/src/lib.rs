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

pub use crate::utils::parse_config_file as ParseConfigFile;

pub mod log;
pub mod message;
pub mod utils;

pub use message::property_value::PropertyValue;
pub use message::system_property::SystemProperties;
pub use message::system_property::SystemProperty;
pub use message::Message;
