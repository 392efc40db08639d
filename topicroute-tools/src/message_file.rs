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

use std::path::Path;

use serde::Deserialize;
use topicroute_common::Message;
use topicroute_error::RouteResult;

#[derive(Deserialize)]
#[serde(untagged)]
enum MessageFile {
    Many(Vec<Message>),
    One(Message),
}

/// Reads a JSON message file holding either one message object or an array of them.
/// Messages without a `MessageId` get a generated one.
pub fn load_messages(path: impl AsRef<Path>) -> RouteResult<Vec<Message>> {
    let content = std::fs::read_to_string(path)?;
    parse_messages(&content)
}

pub fn parse_messages(json: &str) -> RouteResult<Vec<Message>> {
    let mut messages = match serde_json::from_str::<MessageFile>(json)? {
        MessageFile::Many(messages) => messages,
        MessageFile::One(message) => vec![message],
    };
    for message in &mut messages {
        message.ensure_message_id();
    }
    Ok(messages)
}
