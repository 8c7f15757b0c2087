use crate::Result;
use core::fmt::{Display, Formatter};
use ohno::bail;

/// Where to search: every repository of a user/organization, or a single repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    /// A bare name such as `rust-lang`.
    Owner(String),

    /// An `owner/repo` pair such as `rust-lang/cargo`.
    Repository { owner: String, repo: String },
}

impl Scope {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            bail!("scope must not be empty");
        }

        let Some((owner, repo)) = s.split_once('/') else {
            return Ok(Self::Owner(s.to_string()));
        };

        if owner.is_empty() || repo.is_empty() {
            bail!("invalid repository scope '{s}': expected 'owner/repo'");
        }

        if repo.contains('/') {
            bail!("invalid repository scope '{s}': too many '/' separators");
        }

        Ok(Self::Repository {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    #[must_use]
    pub const fn is_repository(&self) -> bool {
        matches!(self, Self::Repository { .. })
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Owner(name) => write!(f, "{name}"),
            Self::Repository { owner, repo } => write!(f, "{owner}/{repo}"),
        }
    }
}
