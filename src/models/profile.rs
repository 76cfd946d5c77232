use crate::entities::{certification_entity, project_entity, skill_entity};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SkillResponse {
    pub id: i64,
    pub name: String,
}

impl From<skill_entity::Model> for SkillResponse {
    fn from(m: skill_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub technologies: String,
    pub link: Option<String>,
}

impl From<project_entity::Model> for ProjectResponse {
    fn from(m: project_entity::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            technologies: m.technologies,
            link: m.link,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CertificationResponse {
    pub id: i64,
    pub name: String,
    pub organization: String,
    pub date_obtained: NaiveDate,
    pub certificate_url: Option<String>,
}

impl From<certification_entity::Model> for CertificationResponse {
    fn from(m: certification_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            organization: m.organization,
            date_obtained: m.date_obtained,
            certificate_url: m.certificate_url,
        }
    }
}

/// 资料中可展示的字段，`None` 统一显示为空串
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentProfileResponse {
    pub profile_id: i64,
    pub user_id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub university: String,
    pub major: String,
    pub graduation_year: Option<i32>,
    pub location: String,
    pub bio: String,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub legacy_website: Option<String>,
    pub internship_type: Option<String>,
    pub preferred_locations: Option<String>,
    pub open_to_relocate: bool,
    pub profile_views: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentProfileDetail {
    pub profile: StudentProfileResponse,
    pub skills: Vec<SkillResponse>,
    pub projects: Vec<ProjectResponse>,
    pub certifications: Vec<CertificationResponse>,
    pub skills_count: usize,
    pub projects_count: usize,
    pub certifications_count: usize,
    pub completion_percent: u8,
    /// 可选技能列表（编辑用）
    pub all_skills: Vec<SkillResponse>,
    /// 可选毕业年份
    pub years: Vec<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentPublicProfile {
    pub profile: StudentProfileResponse,
    pub skills: Vec<SkillResponse>,
    pub projects: Vec<ProjectResponse>,
    pub certifications: Vec<CertificationResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatePersonalInfoRequest {
    #[schema(example = "Ayşe Yılmaz")]
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub university: Option<String>,
    pub major: Option<String>,
    /// 表单原样提交的字符串
    #[schema(example = "2026")]
    pub graduation_year: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: Option<String>,
    pub technologies: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCertificationRequest {
    pub name: String,
    pub organization: String,
    /// YYYY-MM-DD
    #[schema(example = "2025-06-01")]
    pub date_obtained: String,
    pub certificate_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateStudentSocialRequest {
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub legacy_website: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateInternshipRequest {
    pub internship_type: Option<String>,
    pub preferred_locations: Option<String>,
    #[serde(default)]
    pub open_to_relocate: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateSkillsRequest {
    pub skills: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileViewsResponse {
    pub profile_views: i32,
    pub redirect_to: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RedirectResponse {
    pub redirect_to: String,
}

/// 学生资料完整度：简介 30，所在地 30，至少一项技能 40
pub fn student_completion_percent(
    bio: Option<&str>,
    location: Option<&str>,
    has_skills: bool,
) -> u8 {
    let mut percent = 0;
    if bio.is_some_and(|v| !v.is_empty()) {
        percent += 30;
    }
    if location.is_some_and(|v| !v.is_empty()) {
        percent += 30;
    }
    if has_skills {
        percent += 40;
    }
    percent
}
