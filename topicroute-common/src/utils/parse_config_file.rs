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

use std::fmt::Debug;
use std::path::PathBuf;

use config::Config;
use serde::de::DeserializeOwned;
use topicroute_error::RouteError;
use topicroute_error::RouteResult;
use tracing::debug;

/// Loads a configuration file into `C`. The format (TOML, YAML, JSON, ...) is picked from
/// the file extension.
pub fn parse_config_file<C>(config_file: PathBuf) -> RouteResult<C>
where
    C: Debug + DeserializeOwned,
{
    if !config_file.exists() {
        return Err(RouteError::IO(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("config file {} does not exist", config_file.display()),
        )));
    }
    let cfg = Config::builder()
        .add_source(config::File::from(config_file.as_path()))
        .build()?;
    let parsed = cfg.try_deserialize::<C>()?;
    debug!("loaded config from {}: {:?}", config_file.display(), parsed);
    Ok(parsed)
}
