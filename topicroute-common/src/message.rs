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

pub mod property_value;
pub mod system_property;

use std::collections::HashMap;

use bytes::Bytes;
use cheetah_string::CheetahString;
use serde::Deserialize;
use serde::Serialize;

use crate::message::property_value::PropertyValue;
use crate::message::system_property::SystemProperties;
use crate::message::system_property::SystemProperty;

/// A published message: system properties, application properties and an opaque body.
///
/// Routing never mutates a published message. Each matching subscription receives its own
/// clone, and rule actions work on that clone. Cloning is cheap for the body since [`Bytes`]
/// is reference counted.
///
/// The JSON form keeps system properties at the top level:
///
/// ```json
/// {
///   "MessageId": "4b1c...",
///   "CorrelationId": "high",
///   "Subject": "red",
///   "ApplicationProperties": { "color": "red", "quantity": 10, "priority": "high" },
///   "Body": "{\"Color\":\"red\"}"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(flatten)]
    system_properties: SystemProperties,

    #[serde(rename = "ApplicationProperties", default)]
    application_properties: HashMap<CheetahString, PropertyValue>,

    #[serde(rename = "Body", default, with = "body_serde")]
    body: Bytes,
}

impl Message {
    pub fn new(body: impl Into<Bytes>) -> Self {
        Message {
            body: body.into(),
            ..Default::default()
        }
    }

    /// Assigns a random message id when the sender did not provide one.
    pub fn ensure_message_id(&mut self) -> &CheetahString {
        self.system_properties
            .message_id
            .get_or_insert_with(|| CheetahString::from(uuid::Uuid::new_v4().simple().to_string()))
    }

    pub fn with_message_id(mut self, message_id: impl Into<CheetahString>) -> Self {
        self.system_properties.message_id = Some(message_id.into());
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<CheetahString>) -> Self {
        self.system_properties.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<CheetahString>) -> Self {
        self.system_properties.subject = Some(subject.into());
        self
    }

    pub fn with_system_property(mut self, property: SystemProperty, value: impl Into<CheetahString>) -> Self {
        self.system_properties.set(property, Some(value.into()));
        self
    }

    pub fn with_property(mut self, name: impl Into<CheetahString>, value: impl Into<PropertyValue>) -> Self {
        self.application_properties.insert(name.into(), value.into());
        self
    }

    #[inline]
    pub fn system_properties(&self) -> &SystemProperties {
        &self.system_properties
    }

    #[inline]
    pub fn system_properties_mut(&mut self) -> &mut SystemProperties {
        &mut self.system_properties
    }

    #[inline]
    pub fn system_property(&self, property: SystemProperty) -> Option<&CheetahString> {
        self.system_properties.get(property)
    }

    pub fn set_system_property(
        &mut self,
        property: SystemProperty,
        value: Option<CheetahString>,
    ) -> Option<CheetahString> {
        self.system_properties.set(property, value)
    }

    #[inline]
    pub fn message_id(&self) -> Option<&CheetahString> {
        self.system_properties.message_id.as_ref()
    }

    #[inline]
    pub fn correlation_id(&self) -> Option<&CheetahString> {
        self.system_properties.correlation_id.as_ref()
    }

    #[inline]
    pub fn subject(&self) -> Option<&CheetahString> {
        self.system_properties.subject.as_ref()
    }

    #[inline]
    pub fn application_properties(&self) -> &HashMap<CheetahString, PropertyValue> {
        &self.application_properties
    }

    /// Application property lookup. Names are case-sensitive.
    #[inline]
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.application_properties.get(name)
    }

    pub fn set_property(
        &mut self,
        name: impl Into<CheetahString>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.application_properties.insert(name.into(), value.into())
    }

    pub fn remove_property(&mut self, name: &str) -> Option<PropertyValue> {
        self.application_properties.remove(name)
    }

    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

/// UTF-8 bodies travel as text in message files. Any other body is written as an array of
/// byte values so it survives a round trip unchanged; both forms are accepted on input.
mod body_serde {
    use bytes::Bytes;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum EncodedBody {
        Text(String),
        Raw(Vec<u8>),
    }

    pub fn serialize<S>(body: &Bytes, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match std::str::from_utf8(body) {
            Ok(text) => serializer.serialize_str(text),
            Err(_) => serializer.collect_seq(body.iter()),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Bytes, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match EncodedBody::deserialize(deserializer)? {
            EncodedBody::Text(text) => Bytes::from(text),
            EncodedBody::Raw(raw) => Bytes::from(raw),
        })
    }
}
