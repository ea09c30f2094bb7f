//! Supported ALM platforms and their static integration table.
//!
//! Each backend names its created-item list differently and renders identifiers
//! with its own label and prefix; all of that lives in [`ResponseShape`] so the
//! dispatcher never branches on platform names.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    Jira,
    #[serde(rename = "azure-devops")]
    AzureDevOps,
    #[serde(rename = "github")]
    GitHub,
    #[serde(rename = "gitlab")]
    GitLab,
    Polarion,
}

/// How a platform's success body is read and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseShape {
    /// Field holding the created identifiers.
    pub field: &'static str,
    /// Text placed before the joined identifiers.
    pub label: &'static str,
    /// Text placed before every identifier.
    pub id_prefix: &'static str,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Jira,
        Platform::AzureDevOps,
        Platform::GitHub,
        Platform::GitLab,
        Platform::Polarion,
    ];

    /// Storage key of the credential record and the last path segment of the endpoint.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Jira => "jira",
            Self::AzureDevOps => "azure-devops",
            Self::GitHub => "github",
            Self::GitLab => "gitlab",
            Self::Polarion => "polarion",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Jira => "Jira",
            Self::AzureDevOps => "Azure DevOps",
            Self::GitHub => "GitHub",
            Self::GitLab => "GitLab",
            Self::Polarion => "Polarion",
        }
    }

    pub fn endpoint_path(&self) -> String {
        format!("api/{}", self.key())
    }

    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Jira => &["server", "user", "apiToken", "projectKey"],
            Self::AzureDevOps => &["organization", "project", "personalAccessToken"],
            Self::GitHub => &["token", "owner", "repo"],
            Self::GitLab => &["url", "token", "projectId"],
            Self::Polarion => &["url", "user", "token", "projectId"],
        }
    }

    /// Fields holding secrets; masked whenever a record is shown.
    pub fn secret_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Jira => &["apiToken"],
            Self::AzureDevOps => &["personalAccessToken"],
            Self::GitHub | Self::GitLab | Self::Polarion => &["token"],
        }
    }

    /// Values a never-saved record starts with.
    pub fn field_defaults(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::GitLab => &[("url", "https://gitlab.com")],
            _ => &[],
        }
    }

    pub fn response_shape(&self) -> ResponseShape {
        match self {
            Self::Jira => ResponseShape {
                field: "issues",
                label: "",
                id_prefix: "",
            },
            Self::AzureDevOps => ResponseShape {
                field: "items",
                label: "Work Items: ",
                id_prefix: "",
            },
            Self::GitHub => ResponseShape {
                field: "issues",
                label: "Issues: ",
                id_prefix: "#",
            },
            Self::GitLab => ResponseShape {
                field: "issues",
                label: "Issues: ",
                id_prefix: "!",
            },
            Self::Polarion => ResponseShape {
                field: "items",
                label: "Test Cases: ",
                id_prefix: "",
            },
        }
    }
}

impl ResponseShape {
    pub fn render(&self, identifiers: &[String]) -> String {
        let joined = identifiers
            .iter()
            .map(|id| format!("{}{}", self.id_prefix, id))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}{}", self.label, joined)
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::Jira
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jira" => Ok(Self::Jira),
            "azure-devops" | "azure_devops" | "azuredevops" | "azure" | "ado" => {
                Ok(Self::AzureDevOps)
            }
            "github" | "gh" => Ok(Self::GitHub),
            "gitlab" | "gl" => Ok(Self::GitLab),
            "polarion" => Ok(Self::Polarion),
            _ => Err(format!("Unknown platform: {}", s)),
        }
    }
}
