//! Git aliases for looking at the graph outside this tool
//!
//! Installation is idempotent: an alias already holding the expected
//! definition is left alone, and one holding something else is only
//! overwritten when forced. A repository `.gitmessage` file is wired up as
//! the local `commit.template` under the same rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::CommandFailure;
use crate::git::{commands, CommandRunner};
use crate::workflow::Step;

/// One named shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alias {
    pub name: &'static str,
    pub definition: &'static str,
}

impl Alias {
    pub fn key(&self) -> String {
        format!("alias.{}", self.name)
    }
}

/// Commit message template looked up at the repository root
pub const COMMIT_TEMPLATE_FILE: &str = ".gitmessage";

const COMMIT_TEMPLATE_KEY: &str = "commit.template";

/// `<repo>/.gitmessage`, if the file exists
pub fn find_commit_template(repo: &Path) -> Option<PathBuf> {
    let path = repo.join(COMMIT_TEMPLATE_FILE);
    path.is_file().then_some(path)
}

/// The fixed alias table
pub const ALIASES: &[Alias] = &[
    Alias {
        name: "graph",
        definition: "log --graph --pretty=format:\"%C(auto)%h%d %C(blue)%ar %C(green)%an%C(reset) %s\" --all",
    },
    Alias {
        name: "lg",
        definition: "log --color --graph --pretty=format:\"%C(auto)%h%d %C(blue)%ar %C(green)%an%C(reset) %s\" --abbrev-commit --all",
    },
    Alias {
        name: "tree",
        definition: "log --graph --abbrev-commit --decorate --format=format:\"%C(bold blue)%h%C(reset) - %C(bold green)(%ar)%C(reset) %C(white)%s%C(reset) %C(dim white)- %an%C(reset)%C(auto)%d%C(reset)\" --all",
    },
    Alias {
        name: "visual",
        definition: "log --graph --pretty=format:\"%C(yellow)%h%C(reset) %C(red)%d%C(reset) %s %C(green)(%cr) %C(blue)<%an>%C(reset)\" --abbrev-commit --date=relative --all",
    },
    Alias {
        name: "branches",
        definition: "log --graph --pretty=format:\"%C(auto)%h%d %s %C(green)(%ar) %C(blue)<%an>%C(reset)\" --abbrev-commit --all --branches",
    },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasScope {
    #[default]
    Global,
    Local,
}

impl AliasScope {
    fn flag(self) -> &'static str {
        match self {
            AliasScope::Global => "--global",
            AliasScope::Local => "--local",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AliasStatus {
    Installed,
    AlreadyPresent,
    /// A different definition was replaced (forced install only)
    Updated { previous: String },
    /// A different definition is present and was left untouched
    Conflict { existing: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasOutcome {
    pub name: &'static str,
    #[serde(flatten)]
    pub status: AliasStatus,
}

impl fmt::Display for AliasOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            AliasStatus::Installed => write!(f, "{}: installed", self.name),
            AliasStatus::AlreadyPresent => write!(f, "{}: already present", self.name),
            AliasStatus::Updated { .. } => write!(f, "{}: updated", self.name),
            AliasStatus::Conflict { existing } => write!(
                f,
                "{}: left unchanged, already defined as '{}' (use --force to replace)",
                self.name, existing
            ),
        }
    }
}

pub struct AliasInstaller {
    runner: Arc<dyn CommandRunner>,
    scope: AliasScope,
    force: bool,
    commit_template: Option<PathBuf>,
}

impl AliasInstaller {
    pub fn new(runner: Arc<dyn CommandRunner>, scope: AliasScope) -> Self {
        Self {
            runner,
            scope,
            force: false,
            commit_template: None,
        }
    }

    /// Also set `commit.template` (always repository-local) to this file
    pub fn commit_template(mut self, template: Option<PathBuf>) -> Self {
        self.commit_template = template;
        self
    }

    /// Replace aliases whose current definition differs
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Install the whole table, then the commit template if one was given,
    /// reporting per entry. Stops at the first git configuration command
    /// that fails.
    pub async fn install(&self) -> Result<Vec<AliasOutcome>, CommandFailure> {
        self.install_set(ALIASES).await
    }

    pub async fn install_set(&self, aliases: &[Alias]) -> Result<Vec<AliasOutcome>, CommandFailure> {
        info!("Installing {} git aliases ({:?})", aliases.len(), self.scope);
        let flag = self.scope.flag();
        let mut outcomes = Vec::with_capacity(aliases.len() + 1);
        for alias in aliases {
            let status = self.install_one(flag, &alias.key(), alias.definition).await?;
            debug!("alias.{}: {:?}", alias.name, status);
            outcomes.push(AliasOutcome {
                name: alias.name,
                status,
            });
        }

        if let Some(template) = &self.commit_template {
            let value = template.display().to_string();
            let status = self
                .install_one(AliasScope::Local.flag(), COMMIT_TEMPLATE_KEY, &value)
                .await?;
            debug!("{}: {:?}", COMMIT_TEMPLATE_KEY, status);
            outcomes.push(AliasOutcome {
                name: COMMIT_TEMPLATE_KEY,
                status,
            });
        }
        Ok(outcomes)
    }

    async fn install_one(&self, flag: &str, key: &str, value: &str) -> Result<AliasStatus, CommandFailure> {
        let current = self.runner.run(&commands::config_get(flag, key)).await;
        // `git config --get` exits 1 when the key is unset
        let existing = match current.exit_code {
            0 => Some(current.stdout.trim_end_matches('\n').to_string()),
            1 => None,
            _ => return Err(CommandFailure::from_result(Step::ConfigureAlias, &current)),
        };

        let status = match existing {
            Some(existing) if existing == value => return Ok(AliasStatus::AlreadyPresent),
            Some(existing) if !self.force => return Ok(AliasStatus::Conflict { existing }),
            Some(previous) => AliasStatus::Updated { previous },
            None => AliasStatus::Installed,
        };

        let written = self
            .runner
            .run(&commands::config_set(flag, key, value))
            .await;
        if !written.success() {
            return Err(CommandFailure::from_result(Step::ConfigureAlias, &written));
        }
        Ok(status)
    }
}
