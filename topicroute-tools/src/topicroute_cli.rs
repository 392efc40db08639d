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

use anyhow::bail;
use anyhow::Context;
use clap::CommandFactory;
use clap::Parser;
use clap_complete::generate;
use clap_complete::shells::Bash;
use clap_complete::shells::Fish;
use clap_complete::shells::Zsh;

use crate::commands::CommandExecute;
use crate::commands::Commands;

const BIN_NAME: &str = "topicroute-admin-cli";

#[derive(Parser)]
#[command(name = "topicroute-admin-cli")]
#[command(about = "TopicRoute admin commands", long_about = None)]
pub struct TopicRouteCli {
    /// Generate shell completion script
    #[arg(
        long = "generate-completion",
        value_name = "SHELL",
        help = "Generate shell completion script (bash, zsh, fish)"
    )]
    completion: Option<String>,

    #[command(subcommand)]
    commands: Option<Commands>,
}

impl TopicRouteCli {
    pub async fn handle(&self) -> anyhow::Result<()> {
        if let Some(shell) = &self.completion {
            let mut cmd = TopicRouteCli::command();
            match shell.to_lowercase().as_str() {
                "bash" => generate(Bash, &mut cmd, BIN_NAME, &mut std::io::stdout()),
                "zsh" => generate(Zsh, &mut cmd, BIN_NAME, &mut std::io::stdout()),
                "fish" => generate(Fish, &mut cmd, BIN_NAME, &mut std::io::stdout()),
                _ => bail!("Unsupported shell: {shell}. Supported shells: bash, zsh, fish"),
            }
            return Ok(());
        }

        match &self.commands {
            Some(commands) => commands.execute().await.context("command failed"),
            None => {
                eprintln!("No command specified. Use --help for usage information.");
                Ok(())
            }
        }
    }
}
