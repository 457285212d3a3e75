//! 内容 API 的 JSON 契约
//!
//! 字段名与后端一致（snake_case）；后端可能省略的字段用 Option / `#[serde(default)]` 兜底。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// GET /portfolio/profile
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileInfo {
    pub full_name: String,
    pub title: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub github_url: String,
    #[serde(default)]
    pub linkedin_url: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub about_short: String,
    #[serde(default)]
    pub about_long: Option<String>,
    #[serde(default)]
    pub is_available_for_hire: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: Option<i64>,
    pub github_id: String,
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub github_url: String,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub primary_language: Option<String>,
    /// 语言 → 占比
    #[serde(default)]
    pub languages: BTreeMap<String, f64>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub stars_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub is_forked: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub github_created_at: Option<String>,
    #[serde(default)]
    pub github_updated_at: Option<String>,
}

/// GET /portfolio/projects
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectListResponse {
    pub projects: Vec<Project>,
    pub total_count: u64,
    #[serde(default)]
    pub featured_count: u64,
}

/// 项目列表的查询参数；None / false 时不出现在查询串里
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ProjectFilter {
    pub category: Option<String>,
    pub featured_only: bool,
}

impl ProjectFilter {
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn featured_only(mut self) -> Self {
        self.featured_only = true;
        self
    }

    /// 查询参数对：空 category 视为未设置
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("category", category.to_string()));
        }
        if self.featured_only {
            pairs.push(("featured_only", "true".to_string()));
        }
        pairs
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub category: String,
    /// 0-100
    pub proficiency: u8,
    #[serde(default)]
    pub icon_name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub years_experience: Option<f32>,
    #[serde(default)]
    pub is_highlighted: bool,
}

/// GET /portfolio/skills（按类别分组）
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsGrouped {
    pub languages: Vec<Skill>,
    pub frameworks: Vec<Skill>,
    pub databases: Vec<Skill>,
    pub tools: Vec<Skill>,
    pub cloud: Vec<Skill>,
    pub other: Vec<Skill>,
}

impl SkillsGrouped {
    /// (类别名, 技能) 按固定顺序遍历，跳过空类别
    pub fn groups(&self) -> impl Iterator<Item = (&'static str, &[Skill])> {
        [
            ("Languages", self.languages.as_slice()),
            ("Frameworks", self.frameworks.as_slice()),
            ("Databases", self.databases.as_slice()),
            ("Tools", self.tools.as_slice()),
            ("Cloud", self.cloud.as_slice()),
            ("Other", self.other.as_slice()),
        ]
        .into_iter()
        .filter(|(_, skills)| !skills.is_empty())
    }
}

/// GET /portfolio/experience 的元素
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default)]
    pub id: Option<i64>,
    pub company_name: String,
    pub role_title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub company_logo_url: Option<String>,
}

/// GET /portfolio/certificates 的元素
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    pub issuer: String,
    pub issue_date: String,
    #[serde(default)]
    pub credential_url: Option<String>,
    #[serde(default)]
    pub credential_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageCount {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub count: u64,
}

/// GET /portfolio/stats
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioStats {
    pub total_projects: u64,
    pub total_commits: u64,
    pub primary_languages: Vec<LanguageCount>,
    pub language_distribution: BTreeMap<String, f64>,
    pub total_stars: u64,
    pub total_forks: u64,
    pub most_active_project: Option<String>,
    pub projects_by_category: BTreeMap<String, u64>,
    pub skills_count: u64,
    pub experience_years: f64,
    pub certifications_count: u64,
    pub visitors_count: Option<u64>,
    pub messages_count: Option<u64>,
}

/// POST /contact/submit 的请求体
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    pub message_body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

/// POST /contact/submit 的响应
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmitResponse {
    pub success: bool,
    pub message: String,
    pub reference_id: i64,
}

/// GET /health；timestamp 保留原始字符串（后端输出不带时区）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub timestamp: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}
