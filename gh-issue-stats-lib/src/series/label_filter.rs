use crate::Result;
use core::fmt::{Display, Formatter};
use ohno::bail;

/// Which items to count within a scope.
///
/// The literal names `issues` and `pulls` select every issue or every pull request; any other
/// name selects items carrying that label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LabelFilter {
    Issues,
    PullRequests,
    Label(String),
}

impl LabelFilter {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        match s {
            "" => bail!("label must not be empty"),
            "issues" => Ok(Self::Issues),
            "pulls" => Ok(Self::PullRequests),
            name => Ok(Self::Label(name.to_string())),
        }
    }
}

impl Display for LabelFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Issues => write!(f, "issues"),
            Self::PullRequests => write!(f, "pulls"),
            Self::Label(name) => write!(f, "{name}"),
        }
    }
}
