use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// 注册表单中的学术职位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Undergraduate Student")]
    UndergraduateStudent,
    #[serde(rename = "Graduate Student")]
    GraduateStudent,
    #[serde(rename = "PhD Candidate")]
    PhdCandidate,
    #[serde(rename = "Postdoctoral Researcher")]
    PostdoctoralResearcher,
    #[serde(rename = "Research Assistant")]
    ResearchAssistant,
    #[serde(rename = "Assistant Professor")]
    AssistantProfessor,
    #[serde(rename = "Associate Professor")]
    AssociateProfessor,
    #[serde(rename = "Professor")]
    Professor,
    #[serde(rename = "Research Scientist")]
    ResearchScientist,
    #[serde(rename = "Industry Researcher")]
    IndustryResearcher,
    #[serde(rename = "Independent Researcher")]
    IndependentResearcher,
    #[serde(rename = "Other")]
    Other,
}

impl Role {
    pub const ALL: [Role; 12] = [
        Role::UndergraduateStudent,
        Role::GraduateStudent,
        Role::PhdCandidate,
        Role::PostdoctoralResearcher,
        Role::ResearchAssistant,
        Role::AssistantProfessor,
        Role::AssociateProfessor,
        Role::Professor,
        Role::ResearchScientist,
        Role::IndustryResearcher,
        Role::IndependentResearcher,
        Role::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::UndergraduateStudent => "Undergraduate Student",
            Role::GraduateStudent => "Graduate Student",
            Role::PhdCandidate => "PhD Candidate",
            Role::PostdoctoralResearcher => "Postdoctoral Researcher",
            Role::ResearchAssistant => "Research Assistant",
            Role::AssistantProfessor => "Assistant Professor",
            Role::AssociateProfessor => "Associate Professor",
            Role::Professor => "Professor",
            Role::ResearchScientist => "Research Scientist",
            Role::IndustryResearcher => "Industry Researcher",
            Role::IndependentResearcher => "Independent Researcher",
            Role::Other => "Other",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    /// 接受显示名（忽略大小写）或 kebab-case，如 `phd-candidate`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', " ");
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.as_str().to_lowercase() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Role::ALL.iter().map(Role::as_str).collect();
                format!("unknown role '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct Credentials {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Please fill in all fields"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "Please fill in all fields"))]
    pub email: String,
    #[validate(length(min = 1, message = "Please fill in all fields"))]
    pub phone: String,
    #[validate(required(message = "Please fill in all fields"))]
    pub role: Option<Role>,
    #[validate(length(min = 1, message = "Please fill in all fields"))]
    pub institution: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateWorkspaceRequest<'a> {
    pub name: &'a str,
}

/// 论文记录：来自搜索结果（无 id）或工作区（有 id）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub authors: String,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub url: String,
}

impl Paper {
    /// 后端日期可能是完整时间戳，也可能为空
    pub fn published(&self) -> Option<NaiveDate> {
        let prefix = self.date.get(..10)?;
        NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ImportPaperRequest<'a> {
    #[serde(flatten)]
    pub paper: &'a Paper,
    pub workspace_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message: String,
    pub response: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub workspace_id: i64,
    pub message: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatReply {
    pub response: String,
}

/// 后端错误体，`detail` 可能是字符串也可能是校验错误数组
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}
