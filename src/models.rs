use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    #[default]
    Applied,
    Interviewing,
    Accepted,
    Rejected,
    /// Value read from storage that is not one of the known statuses.
    Unknown(String),
}

impl Status {
    /// Known statuses in board-column order.
    pub const KNOWN: [Status; 4] = [
        Status::Applied,
        Status::Interviewing,
        Status::Accepted,
        Status::Rejected,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Status::Applied => "Applied",
            Status::Interviewing => "Interviewing",
            Status::Accepted => "Accepted",
            Status::Rejected => "Rejected",
            Status::Unknown(raw) => raw,
        }
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Applied" => Status::Applied,
            "Interviewing" => Status::Interviewing,
            "Accepted" => Status::Accepted,
            "Rejected" => Status::Rejected,
            _ => Status::Unknown(raw),
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict, case-insensitive parse for user input. Storage goes through
/// `From<String>` instead, which never fails.
impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Status::KNOWN
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid("status", s))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
    Unknown(String),
}

impl Priority {
    pub const KNOWN: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Unknown(raw) => raw,
        }
    }
}

impl From<String> for Priority {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "High" => Priority::High,
            "Medium" => Priority::Medium,
            "Low" => Priority::Low,
            _ => Priority::Unknown(raw),
        }
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Priority::KNOWN
            .into_iter()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid("priority", s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

impl YesNo {
    pub fn is_yes(self) -> bool {
        self == YesNo::Yes
    }

    pub fn as_str(self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }
}

impl From<String> for YesNo {
    fn from(raw: String) -> Self {
        if raw == "Yes" { YesNo::Yes } else { YesNo::No }
    }
}

impl From<YesNo> for String {
    fn from(value: YesNo) -> Self {
        value.as_str().to_string()
    }
}

/// How `coverLetter` should be read: absent, a file name, or pasted text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CoverLetterType {
    #[default]
    None,
    File,
    Text,
}

impl CoverLetterType {
    pub fn as_str(self) -> &'static str {
        match self {
            CoverLetterType::None => "none",
            CoverLetterType::File => "file",
            CoverLetterType::Text => "text",
        }
    }
}

// Unrecognized kinds collapse to `None`; the content string is kept as-is.
impl From<String> for CoverLetterType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "file" => CoverLetterType::File,
            "text" => CoverLetterType::Text,
            _ => CoverLetterType::None,
        }
    }
}

impl From<CoverLetterType> for String {
    fn from(kind: CoverLetterType) -> Self {
        kind.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InterviewRound {
    #[default]
    NotSet,
    PhoneScreen,
    Technical,
    Behavioral,
    SystemDesign,
    Final,
}

impl InterviewRound {
    pub const ROUNDS: [InterviewRound; 5] = [
        InterviewRound::PhoneScreen,
        InterviewRound::Technical,
        InterviewRound::Behavioral,
        InterviewRound::SystemDesign,
        InterviewRound::Final,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InterviewRound::NotSet => "",
            InterviewRound::PhoneScreen => "Phone Screen",
            InterviewRound::Technical => "Technical",
            InterviewRound::Behavioral => "Behavioral",
            InterviewRound::SystemDesign => "System Design",
            InterviewRound::Final => "Final",
        }
    }
}

impl From<String> for InterviewRound {
    fn from(raw: String) -> Self {
        InterviewRound::ROUNDS
            .into_iter()
            .find(|round| round.as_str() == raw)
            .unwrap_or(InterviewRound::NotSet)
    }
}

impl From<InterviewRound> for String {
    fn from(round: InterviewRound) -> Self {
        round.as_str().to_string()
    }
}

/// Accepts "phone-screen", "system design", "Final", etc. An empty string
/// clears the round.
impl FromStr for InterviewRound {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().replace(['-', '_'], " ");
        if wanted.is_empty() {
            return Ok(InterviewRound::NotSet);
        }
        InterviewRound::ROUNDS
            .into_iter()
            .find(|round| round.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| Error::invalid("interview round", s))
    }
}

/// Everything the user fills in for an application. Creating or editing a
/// record always submits a full draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationDraft {
    #[serde(deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(with = "optional_text")]
    pub team_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(with = "optional_text")]
    pub website_link: Option<String>,
    #[serde(with = "optional_text")]
    pub resume_file_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub cover_letter_type: CoverLetterType,
    #[serde(deserialize_with = "null_as_default")]
    pub cover_letter: String,
    #[serde(deserialize_with = "null_as_default")]
    pub referral_given: YesNo,
    #[serde(deserialize_with = "null_as_default")]
    pub recruiter_outreach: YesNo,
    #[serde(with = "optional_text")]
    pub recruiter_contact: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub date_applied: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: Status,
    #[serde(deserialize_with = "null_as_default")]
    pub priority: Priority,
    #[serde(with = "optional_text")]
    pub follow_up_date: Option<String>,
    #[serde(with = "optional_text")]
    pub salary_range: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub interview_round: InterviewRound,
    #[serde(with = "optional_text")]
    pub notes: Option<String>,
}

impl ApplicationDraft {
    /// A blank form for `company_name`/`role`, applied today.
    pub fn new(company_name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            role: role.into(),
            date_applied: chrono::Local::now().date_naive().to_string(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.company_name.trim().is_empty() {
            return Err(Error::Validation {
                field: "companyName",
            });
        }
        if self.role.trim().is_empty() {
            return Err(Error::Validation { field: "role" });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(flatten)]
    pub details: ApplicationDraft,
}

/// `null` in a stored field reads the same as a missing one.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Optional free-text fields are stored as `""` when absent, and `""` or
/// `null` read back as `None`.
mod optional_text {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|s| !s.is_empty()))
    }
}
