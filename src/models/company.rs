use crate::entities::{company_entity, position_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub about: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub contact_email: Option<String>,
    pub is_verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
}

impl From<company_entity::Model> for CompanyResponse {
    fn from(m: company_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
            industry: m.industry,
            location: m.location,
            website: m.website,
            about: m.about,
            linkedin: m.linkedin,
            twitter: m.twitter,
            facebook: m.facebook,
            contact_email: m.contact_email,
            is_verified: m.is_verified,
            verified_at: m.verified_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PositionResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub link: Option<String>,
}

impl From<position_entity::Model> for PositionResponse {
    fn from(m: position_entity::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            link: m.link,
        }
    }
}

/// 公司页面学生列表中的一项
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentCard {
    pub profile_id: i64,
    pub user_id: i64,
    pub username: String,
    pub full_name: String,
    pub university: Option<String>,
    pub major: Option<String>,
    pub graduation_year: Option<i32>,
    pub location: Option<String>,
    pub internship_type: Option<String>,
    pub skills: Vec<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StudentFilterQuery {
    pub tab: Option<String>,
    pub major: Option<String>,
    pub skill: Option<String>,
    pub project_skill: Option<String>,
    pub location: Option<String>,
    pub graduation_year: Option<String>,
    pub internship_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompanyPageResponse {
    pub company: CompanyResponse,
    pub positions: Vec<PositionResponse>,
    pub open_positions_count: usize,
    pub completion_percent: u8,
    pub active_tab: String,
    pub students: Vec<StudentCard>,
    pub filtered_count: u64,
    pub total_count: u64,
    pub bookmarked_students: Vec<StudentCard>,
    pub bookmarked_ids: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateCompanyRequest {
    #[schema(example = "Acme")]
    pub name: String,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub about: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePositionRequest {
    #[schema(example = "Backend Intern")]
    pub title: String,
    pub description: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateCompanySocialRequest {
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToggleBookmarkRequest {
    pub next: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToggleBookmarkResponse {
    pub bookmarked: bool,
    pub redirect_to: String,
}

/// 公司资料完整度：简介 30，所在地 30，至少一个职位 40
pub fn company_completion_percent(
    about: Option<&str>,
    location: Option<&str>,
    has_positions: bool,
) -> u8 {
    let mut percent = 0;
    if about.is_some_and(|v| !v.is_empty()) {
        percent += 30;
    }
    if location.is_some_and(|v| !v.is_empty()) {
        percent += 30;
    }
    if has_positions {
        percent += 40;
    }
    percent
}
