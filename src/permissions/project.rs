//! Project types and the agent roles they map to.

use serde::{Deserialize, Serialize};

/// Kind of work a workspace is set up for. Selects the edit scope of the
/// compiled rules and the role template used during resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Development,
    Review,
    Analysis,
    #[default]
    #[serde(other)]
    General,
}

impl ProjectType {
    /// Total parse: unknown or missing values are `General`.
    pub fn parse_lenient(s: Option<&str>) -> Self {
        s.and_then(|s| s.parse().ok()).unwrap_or_default()
    }

    pub fn role(&self) -> Role {
        match self {
            ProjectType::Review => Role::Reviewer,
            ProjectType::Analysis => Role::Analyst,
            ProjectType::Development | ProjectType::General => Role::Developer,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Development => "development",
            ProjectType::General => "general",
            ProjectType::Review => "review",
            ProjectType::Analysis => "analysis",
        }
    }
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(ProjectType::Development),
            "general" => Ok(ProjectType::General),
            "review" => Ok(ProjectType::Review),
            "analysis" => Ok(ProjectType::Analysis),
            _ => Err(format!("Unknown project type: {}", s)),
        }
    }
}

/// Agent role keying the permission templates of the global config.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Developer,
    Reviewer,
    Analyst,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Developer, Role::Reviewer, Role::Analyst];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Developer => "developer",
            Role::Reviewer => "reviewer",
            Role::Analyst => "analyst",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "developer" => Ok(Role::Developer),
            "reviewer" => Ok(Role::Reviewer),
            "analyst" => Ok(Role::Analyst),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}
