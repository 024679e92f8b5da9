use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow category a task belongs to. Each type owns exactly one step table.
///
/// Deserialization is lossy: historical or malformed type values resolve to
/// [`TaskType::Etc`] so a bad record never fails a whole collection. Use
/// [`str::parse`] when strict validation is wanted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(from = "String", into = "String")]
pub enum TaskType {
    /// Customer-funded installation
    SelfFunded,
    /// Government subsidy installation
    Subsidy,
    /// Anything that does not fit another category
    #[default]
    Etc,
    /// After-service
    AfterService,
    /// Dealer sales
    Dealer,
    /// Outsourced work
    Outsourcing,
}

impl TaskType {
    /// All types in registry order
    pub const ALL: [TaskType; 6] = [
        Self::SelfFunded,
        Self::Subsidy,
        Self::Etc,
        Self::AfterService,
        Self::Dealer,
        Self::Outsourcing,
    ];

    /// Position in [`TaskType::ALL`]
    pub fn registry_index(&self) -> usize {
        *self as usize
    }

    /// Wire name as stored by the surrounding system
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfFunded => "self",
            Self::Subsidy => "subsidy",
            Self::Etc => "etc",
            Self::AfterService => "as",
            Self::Dealer => "dealer",
            Self::Outsourcing => "outsourcing",
        }
    }

    /// Human-facing category name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SelfFunded => "자가",
            Self::Subsidy => "보조금",
            Self::Etc => "기타",
            Self::AfterService => "AS",
            Self::Dealer => "대리점",
            Self::Outsourcing => "외주",
        }
    }

    /// Parse a wire value, resolving anything unrecognized to `Etc`
    pub fn parse_lossy(value: &str) -> Self {
        value.parse().unwrap_or(Self::Etc)
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "self" => Ok(Self::SelfFunded),
            "subsidy" => Ok(Self::Subsidy),
            "etc" => Ok(Self::Etc),
            "as" => Ok(Self::AfterService),
            "dealer" => Ok(Self::Dealer),
            "outsourcing" => Ok(Self::Outsourcing),
            _ => Err(format!("Invalid task type: {s}")),
        }
    }
}

impl From<String> for TaskType {
    fn from(value: String) -> Self {
        Self::parse_lossy(&value)
    }
}

impl From<TaskType> for String {
    fn from(value: TaskType) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_type_string_conversion() {
        assert_eq!(TaskType::AfterService.to_string(), "as");
        assert_eq!("self".parse::<TaskType>().unwrap(), TaskType::SelfFunded);
        assert_eq!(" Dealer ".parse::<TaskType>().unwrap(), TaskType::Dealer);
        assert!("legacy_install".parse::<TaskType>().is_err());
    }

    #[test]
    fn test_unknown_type_resolves_to_etc() {
        assert_eq!(TaskType::parse_lossy("legacy_install"), TaskType::Etc);
        assert_eq!(TaskType::parse_lossy(""), TaskType::Etc);
        assert_eq!(TaskType::default(), TaskType::parse_lossy("legacy_install"));
    }

    #[test]
    fn test_task_type_serde() {
        let json = serde_json::to_string(&TaskType::Outsourcing).unwrap();
        assert_eq!(json, "\"outsourcing\"");

        let parsed: TaskType = serde_json::from_str("\"subsidy\"").unwrap();
        assert_eq!(parsed, TaskType::Subsidy);

        let unknown: TaskType = serde_json::from_str("\"warranty\"").unwrap();
        assert_eq!(unknown, TaskType::Etc);
    }

    #[test]
    fn test_registry_order() {
        let names: Vec<&str> = TaskType::ALL.iter().map(TaskType::as_str).collect();
        assert_eq!(names, vec!["self", "subsidy", "etc", "as", "dealer", "outsourcing"]);
        for (index, task_type) in TaskType::ALL.iter().enumerate() {
            assert_eq!(task_type.registry_index(), index);
        }
    }
}
