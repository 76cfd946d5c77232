use crate::entities::{
    UserRole, certification_entity as certifications, profile_entity as profiles,
    profile_skill_entity as profile_skills, project_entity as projects, skill_entity as skills,
    user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::CompanyService;
use crate::utils::{
    company_profile_path, normalize, normalize_non_empty, student_profile_path,
    student_public_path, validate_email, validate_optional_url,
};
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::collections::BTreeSet;

/// 编辑页可选的毕业年份
const GRADUATION_YEARS: std::ops::RangeInclusive<i32> = 2020..=2035;

fn display(value: Option<&str>) -> String {
    normalize(value).unwrap_or_default()
}

fn profile_response(user: &users::Model, profile: profiles::Model) -> StudentProfileResponse {
    StudentProfileResponse {
        profile_id: profile.id,
        user_id: user.id,
        username: user.username.clone(),
        full_name: user.full_name(),
        email: user.email.clone(),
        university: display(profile.university.as_deref()),
        major: display(profile.major.as_deref()),
        graduation_year: profile.graduation_year,
        location: display(profile.location.as_deref()),
        bio: display(profile.bio.as_deref()),
        github: profile.github,
        linkedin: profile.linkedin,
        website: profile.website,
        legacy_website: profile.legacy_website,
        internship_type: profile.internship_type,
        preferred_locations: profile.preferred_locations,
        open_to_relocate: profile.open_to_relocate,
        profile_views: profile.profile_views,
    }
}

#[derive(Clone)]
pub struct ProfileService {
    pool: DatabaseConnection,
    company_service: CompanyService,
}

impl ProfileService {
    pub fn new(pool: DatabaseConnection, company_service: CompanyService) -> Self {
        Self {
            pool,
            company_service,
        }
    }

    /// 取学生资料，没有就建一条空的
    pub async fn ensure_profile(&self, user_id: i64) -> AppResult<profiles::Model> {
        if let Some(profile) = profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
        {
            return Ok(profile);
        }
        let profile = profiles::ActiveModel {
            user_id: Set(user_id),
            open_to_relocate: Set(false),
            profile_views: Set(0),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn find_user(&self, username: &str) -> AppResult<users::Model> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// 只有本人可以修改自己的资料
    async fn find_owned(
        &self,
        auth_user_id: i64,
        username: &str,
    ) -> AppResult<(users::Model, profiles::Model)> {
        let user = self.find_user(username).await?;
        if user.id != auth_user_id {
            return Err(AppError::PermissionDenied);
        }
        let profile = self.ensure_profile(user.id).await?;
        Ok((user, profile))
    }

    async fn profile_skills(&self, profile_id: i64) -> AppResult<Vec<SkillResponse>> {
        let skill_ids: Vec<i64> = profile_skills::Entity::find()
            .filter(profile_skills::Column::ProfileId.eq(profile_id))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|l| l.skill_id)
            .collect();
        if skill_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(skills::Entity::find()
            .filter(skills::Column::Id.is_in(skill_ids))
            .order_by_asc(skills::Column::Name)
            .all(&self.pool)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn profile_projects(&self, profile_id: i64) -> AppResult<Vec<ProjectResponse>> {
        Ok(projects::Entity::find()
            .filter(projects::Column::ProfileId.eq(profile_id))
            .order_by_desc(projects::Column::Id)
            .all(&self.pool)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn profile_certifications(
        &self,
        profile_id: i64,
    ) -> AppResult<Vec<CertificationResponse>> {
        Ok(certifications::Entity::find()
            .filter(certifications::Column::ProfileId.eq(profile_id))
            .order_by_desc(certifications::Column::DateObtained)
            .order_by_asc(certifications::Column::Name)
            .all(&self.pool)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    pub async fn list_skills(&self) -> AppResult<Vec<SkillResponse>> {
        Ok(skills::Entity::find()
            .order_by_asc(skills::Column::Name)
            .all(&self.pool)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// 学生资料页（含编辑所需的全部技能与年份）
    pub async fn detail(&self, username: &str) -> AppResult<StudentProfileDetail> {
        let user = self.find_user(username).await?;
        let profile = self.ensure_profile(user.id).await?;

        let skills = self.profile_skills(profile.id).await?;
        let projects = self.profile_projects(profile.id).await?;
        let certifications = self.profile_certifications(profile.id).await?;
        let completion_percent = student_completion_percent(
            profile.bio.as_deref(),
            profile.location.as_deref(),
            !skills.is_empty(),
        );

        Ok(StudentProfileDetail {
            profile: profile_response(&user, profile),
            skills_count: skills.len(),
            projects_count: projects.len(),
            certifications_count: certifications.len(),
            skills,
            projects,
            certifications,
            completion_percent,
            all_skills: self.list_skills().await?,
            years: GRADUATION_YEARS.collect(),
        })
    }

    /// 个人信息：所有字段必填，错误一次性返回
    pub async fn update_personal(
        &self,
        auth_user_id: i64,
        username: &str,
        request: UpdatePersonalInfoRequest,
    ) -> AppResult<StudentProfileDetail> {
        let (user, profile) = self.find_owned(auth_user_id, username).await?;

        let full_name = normalize_non_empty(request.full_name.as_deref());
        let email = normalize_non_empty(request.email.as_deref()).map(|e| e.to_lowercase());
        let university = normalize_non_empty(request.university.as_deref());
        let major = normalize_non_empty(request.major.as_deref());
        let graduation_year = request
            .graduation_year
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty());
        let location = normalize_non_empty(request.location.as_deref());
        let bio = normalize_non_empty(request.bio.as_deref());

        let mut errors = Vec::new();
        if full_name.is_none() {
            errors.push("Full Name is required.");
        }
        if email.is_none() {
            errors.push("Email Address is required.");
        }
        if university.is_none() {
            errors.push("University is required.");
        }
        if major.is_none() {
            errors.push("Major/Field of Study is required.");
        }
        if graduation_year.is_none() {
            errors.push("Graduation Year is required.");
        }
        if location.is_none() {
            errors.push("Current Location is required.");
        }
        if bio.is_none() {
            errors.push("Bio/About Me is required.");
        }
        let year = match graduation_year.map(str::parse::<i32>) {
            Some(Ok(year)) => Some(year),
            Some(Err(_)) => {
                errors.push("Graduation Year must be a number.");
                None
            }
            None => None,
        };
        if let Some(email) = &email {
            if validate_email(email).is_err() {
                errors.push("Enter a valid email address.");
            } else {
                let taken = users::Entity::find()
                    .filter(users::Column::Email.eq(email.as_str()))
                    .filter(users::Column::Id.ne(user.id))
                    .one(&self.pool)
                    .await?
                    .is_some();
                if taken {
                    errors.push("A user with that email already exists.");
                }
            }
        }
        if !errors.is_empty() {
            return Err(AppError::ValidationError(errors.join(" ")));
        }

        let (Some(full_name), Some(email)) = (full_name, email) else {
            return Err(AppError::InternalError("validated fields missing".into()));
        };
        let mut parts = full_name.split_whitespace();
        let first_name = parts.next().unwrap_or_default().to_string();
        let last_name = parts.collect::<Vec<_>>().join(" ");

        let txn = self.pool.begin().await?;
        let mut user_model = user.into_active_model();
        user_model.first_name = Set(first_name);
        user_model.last_name = Set(last_name);
        user_model.email = Set(email);
        user_model.updated_at = Set(Some(Utc::now()));
        user_model.update(&txn).await?;

        let mut profile_model = profile.into_active_model();
        profile_model.university = Set(university);
        profile_model.major = Set(major);
        profile_model.graduation_year = Set(year);
        profile_model.location = Set(location);
        profile_model.bio = Set(bio);
        profile_model.update(&txn).await?;
        txn.commit().await?;

        self.detail(username).await
    }

    pub async fn add_project(
        &self,
        auth_user_id: i64,
        username: &str,
        request: CreateProjectRequest,
    ) -> AppResult<ProjectResponse> {
        let (_, profile) = self.find_owned(auth_user_id, username).await?;

        let title = normalize_non_empty(Some(&request.title))
            .ok_or_else(|| AppError::ValidationError("Title is required.".to_string()))?;
        let link = validate_optional_url("link", request.link)?;

        let project = projects::ActiveModel {
            profile_id: Set(profile.id),
            title: Set(title),
            description: Set(normalize(request.description.as_deref()).unwrap_or_default()),
            technologies: Set(normalize(request.technologies.as_deref()).unwrap_or_default()),
            link: Set(link),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(project.into())
    }

    pub async fn add_certification(
        &self,
        auth_user_id: i64,
        username: &str,
        request: CreateCertificationRequest,
    ) -> AppResult<CertificationResponse> {
        let (_, profile) = self.find_owned(auth_user_id, username).await?;

        let mut errors = Vec::new();
        let name = normalize_non_empty(Some(&request.name));
        if name.is_none() {
            errors.push("Name is required.".to_string());
        }
        let organization = normalize_non_empty(Some(&request.organization));
        if organization.is_none() {
            errors.push("Organization is required.".to_string());
        }
        let date = NaiveDate::parse_from_str(request.date_obtained.trim(), "%Y-%m-%d").ok();
        if date.is_none() {
            errors.push("Date obtained: Enter a valid date.".to_string());
        }
        let url = match validate_optional_url("certificate_url", request.certificate_url) {
            Ok(url) => url,
            Err(e) => {
                errors.push(match e {
                    AppError::ValidationError(msg) => msg,
                    other => other.to_string(),
                });
                None
            }
        };

        let (Some(name), Some(organization), Some(date), true) =
            (name, organization, date, errors.is_empty())
        else {
            return Err(AppError::ValidationError(errors.join(" ")));
        };

        let certification = certifications::ActiveModel {
            profile_id: Set(profile.id),
            name: Set(name),
            organization: Set(organization),
            date_obtained: Set(date),
            certificate_url: Set(url),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(certification.into())
    }

    pub async fn update_social(
        &self,
        auth_user_id: i64,
        username: &str,
        request: UpdateStudentSocialRequest,
    ) -> AppResult<StudentProfileResponse> {
        let (user, profile) = self.find_owned(auth_user_id, username).await?;

        let github = validate_optional_url("github", request.github)?;
        let linkedin = validate_optional_url("linkedin", request.linkedin)?;
        let website = validate_optional_url("website", request.website)?;
        let legacy_website = validate_optional_url("legacy_website", request.legacy_website)?;

        let mut model = profile.into_active_model();
        model.github = Set(github);
        model.linkedin = Set(linkedin);
        model.website = Set(website);
        model.legacy_website = Set(legacy_website);
        let profile = model.update(&self.pool).await?;
        Ok(profile_response(&user, profile))
    }

    pub async fn update_internship(
        &self,
        auth_user_id: i64,
        username: &str,
        request: UpdateInternshipRequest,
    ) -> AppResult<StudentProfileResponse> {
        let (user, profile) = self.find_owned(auth_user_id, username).await?;

        let mut model = profile.into_active_model();
        model.internship_type = Set(normalize_non_empty(request.internship_type.as_deref()));
        model.preferred_locations =
            Set(normalize_non_empty(request.preferred_locations.as_deref()));
        model.open_to_relocate = Set(request.open_to_relocate);
        let profile = model.update(&self.pool).await?;
        Ok(profile_response(&user, profile))
    }

    /// 用提交的技能集合整体替换
    pub async fn set_skills(
        &self,
        auth_user_id: i64,
        username: &str,
        request: UpdateSkillsRequest,
    ) -> AppResult<Vec<SkillResponse>> {
        let (_, profile) = self.find_owned(auth_user_id, username).await?;

        let wanted: BTreeSet<i64> = request.skills.into_iter().collect();
        if !wanted.is_empty() {
            let known: BTreeSet<i64> = skills::Entity::find()
                .filter(skills::Column::Id.is_in(wanted.iter().copied()))
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|s| s.id)
                .collect();
            if let Some(missing) = wanted.difference(&known).next() {
                return Err(AppError::ValidationError(format!(
                    "Select a valid choice. {missing} is not one of the available choices."
                )));
            }
        }

        let txn = self.pool.begin().await?;
        profile_skills::Entity::delete_many()
            .filter(profile_skills::Column::ProfileId.eq(profile.id))
            .exec(&txn)
            .await?;
        if !wanted.is_empty() {
            profile_skills::Entity::insert_many(wanted.iter().map(|skill_id| {
                profile_skills::ActiveModel {
                    profile_id: Set(profile.id),
                    skill_id: Set(*skill_id),
                }
            }))
            .exec_without_returning(&txn)
            .await?;
        }
        txn.commit().await?;

        self.profile_skills(profile.id).await
    }

    /// 公司查看的学生公开资料
    pub async fn public_profile(&self, user_id: i64) -> AppResult<StudentPublicProfile> {
        let profile = profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Student profile not found".to_string()))?;
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(StudentPublicProfile {
            skills: self.profile_skills(profile.id).await?,
            projects: self.profile_projects(profile.id).await?,
            certifications: self.profile_certifications(profile.id).await?,
            profile: profile_response(&user, profile),
        })
    }

    /// 浏览量 +1，在数据库里原子完成
    pub async fn increment_views(
        &self,
        user_id: i64,
        next: Option<String>,
    ) -> AppResult<ProfileViewsResponse> {
        let result = profiles::Entity::update_many()
            .col_expr(
                profiles::Column::ProfileViews,
                Expr::col(profiles::Column::ProfileViews).add(1),
            )
            .filter(profiles::Column::UserId.eq(user_id))
            .exec(&self.pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Student profile not found".to_string()));
        }

        let profile = profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Student profile not found".to_string()))?;

        Ok(ProfileViewsResponse {
            profile_views: profile.profile_views,
            redirect_to: normalize_non_empty(next.as_deref())
                .unwrap_or_else(|| student_public_path(user_id)),
        })
    }

    /// 登录用户的"我的资料"入口
    pub async fn redirect_for(&self, user: &users::Model) -> AppResult<RedirectResponse> {
        let existing = self.company_service.find_by_user(user.id).await?;
        let redirect_to = match (user.role, existing) {
            (_, Some(company)) => company_profile_path(&company.slug),
            (UserRole::Company, None) => {
                let company = self.company_service.ensure_company_for_user(user).await?;
                company_profile_path(&company.slug)
            }
            (UserRole::Student, None) => student_profile_path(&user.username),
        };
        Ok(RedirectResponse { redirect_to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_user, setup_db};

    async fn setup() -> (ProfileService, DatabaseConnection, users::Model) {
        let db = setup_db().await;
        let service = ProfileService::new(db.clone(), CompanyService::new(db.clone()));
        let user = create_user(&db, "ayse", "ayse@uni.edu", UserRole::Student).await;
        (service, db, user)
    }

    async fn skill(db: &DatabaseConnection, name: &str) -> skills::Model {
        skills::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    fn personal() -> UpdatePersonalInfoRequest {
        UpdatePersonalInfoRequest {
            full_name: Some("Ayşe Nur Yılmaz".into()),
            email: Some("Ayse.Yilmaz@Uni.edu".into()),
            university: Some("METU".into()),
            major: Some("Computer Engineering".into()),
            graduation_year: Some("2026".into()),
            location: Some("Ankara".into()),
            bio: Some("Backend enthusiast".into()),
        }
    }

    #[tokio::test]
    async fn test_detail_creates_profile() {
        let (service, _db, _user) = setup().await;
        let detail = service.detail("ayse").await.unwrap();
        assert_eq!(detail.profile.username, "ayse");
        assert_eq!(detail.profile.university, "");
        assert_eq!(detail.completion_percent, 0);
        assert_eq!(detail.years.first(), Some(&2020));
        assert_eq!(detail.years.last(), Some(&2035));

        let err = service.detail("nobody").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_personal() {
        let (service, _db, user) = setup().await;
        let detail = service
            .update_personal(user.id, "ayse", personal())
            .await
            .unwrap();
        assert_eq!(detail.profile.full_name, "Ayşe Nur Yılmaz");
        assert_eq!(detail.profile.email, "ayse.yilmaz@uni.edu");
        assert_eq!(detail.profile.graduation_year, Some(2026));
        assert_eq!(detail.completion_percent, 60);
    }

    #[tokio::test]
    async fn test_update_personal_reports_all_errors() {
        let (service, _db, user) = setup().await;
        let request = UpdatePersonalInfoRequest {
            full_name: Some("None".into()),
            bio: Some("   ".into()),
            ..personal()
        };
        let err = service
            .update_personal(user.id, "ayse", request)
            .await
            .unwrap_err();
        match err {
            AppError::ValidationError(msg) => {
                assert!(msg.contains("Full Name is required."));
                assert!(msg.contains("Bio/About Me is required."));
                assert!(!msg.contains("University"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_personal_rejects_taken_email_and_other_users() {
        let (service, db, user) = setup().await;
        let other = create_user(&db, "mehmet", "mehmet@uni.edu", UserRole::Student).await;

        let err = service
            .update_personal(other.id, "ayse", personal())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied));

        let request = UpdatePersonalInfoRequest {
            email: Some("MEHMET@uni.edu".into()),
            ..personal()
        };
        let err = service
            .update_personal(user.id, "ayse", request)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(msg) if msg.contains("already exists")));
    }

    #[tokio::test]
    async fn test_set_skills_replaces_set() {
        let (service, db, user) = setup().await;
        let rust = skill(&db, "Rust").await;
        let go = skill(&db, "Go").await;

        let skills = service
            .set_skills(user.id, "ayse", UpdateSkillsRequest { skills: vec![rust.id, go.id, rust.id] })
            .await
            .unwrap();
        let names: Vec<_> = skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Go", "Rust"]);

        let skills = service
            .set_skills(user.id, "ayse", UpdateSkillsRequest { skills: vec![go.id] })
            .await
            .unwrap();
        assert_eq!(skills.len(), 1);

        let err = service
            .set_skills(user.id, "ayse", UpdateSkillsRequest { skills: vec![999] })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let detail = service.detail("ayse").await.unwrap();
        assert_eq!(detail.skills_count, 1);
        assert_eq!(detail.all_skills.len(), 2);
    }

    #[tokio::test]
    async fn test_projects_and_certifications() {
        let (service, _db, user) = setup().await;
        service
            .add_project(
                user.id,
                "ayse",
                CreateProjectRequest {
                    title: "Old".into(),
                    description: None,
                    technologies: Some("Rust".into()),
                    link: None,
                },
            )
            .await
            .unwrap();
        service
            .add_project(
                user.id,
                "ayse",
                CreateProjectRequest {
                    title: "New".into(),
                    description: Some("desc".into()),
                    technologies: None,
                    link: Some("https://github.com/ayse/new".into()),
                },
            )
            .await
            .unwrap();
        let err = service
            .add_project(
                user.id,
                "ayse",
                CreateProjectRequest {
                    title: "Bad".into(),
                    description: None,
                    technologies: None,
                    link: Some("javascript:alert(1)".into()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        for (name, date) in [("AWS", "2024-05-01"), ("Azure", "2025-01-10")] {
            service
                .add_certification(
                    user.id,
                    "ayse",
                    CreateCertificationRequest {
                        name: name.into(),
                        organization: "Cloud".into(),
                        date_obtained: date.into(),
                        certificate_url: None,
                    },
                )
                .await
                .unwrap();
        }
        let err = service
            .add_certification(
                user.id,
                "ayse",
                CreateCertificationRequest {
                    name: "".into(),
                    organization: "Cloud".into(),
                    date_obtained: "yesterday".into(),
                    certificate_url: None,
                },
            )
            .await
            .unwrap_err();
        assert!(
            matches!(err, AppError::ValidationError(msg) if msg.contains("Name is required.") && msg.contains("valid date"))
        );

        let detail = service.detail("ayse").await.unwrap();
        let titles: Vec<_> = detail.projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Old"]);
        let certs: Vec<_> = detail.certifications.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(certs, vec!["Azure", "AWS"]);
    }

    #[tokio::test]
    async fn test_social_and_internship() {
        let (service, _db, user) = setup().await;
        let profile = service
            .update_social(
                user.id,
                "ayse",
                UpdateStudentSocialRequest {
                    github: Some("https://github.com/ayse".into()),
                    linkedin: Some("undefined".into()),
                    website: None,
                    legacy_website: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(profile.github.as_deref(), Some("https://github.com/ayse"));
        assert_eq!(profile.linkedin, None);

        let profile = service
            .update_internship(
                user.id,
                "ayse",
                UpdateInternshipRequest {
                    internship_type: Some(" Remote ".into()),
                    preferred_locations: Some("-".into()),
                    open_to_relocate: true,
                },
            )
            .await
            .unwrap();
        assert_eq!(profile.internship_type.as_deref(), Some("Remote"));
        assert_eq!(profile.preferred_locations, None);
        assert!(profile.open_to_relocate);
    }

    #[tokio::test]
    async fn test_increment_views() {
        let (service, _db, user) = setup().await;
        service.ensure_profile(user.id).await.unwrap();

        let first = service.increment_views(user.id, None).await.unwrap();
        assert_eq!(first.profile_views, 1);
        assert_eq!(first.redirect_to, student_public_path(user.id));
        let second = service
            .increment_views(user.id, Some("/back".into()))
            .await
            .unwrap();
        assert_eq!(second.profile_views, 2);
        assert_eq!(second.redirect_to, "/back");

        let public = service.public_profile(user.id).await.unwrap();
        assert_eq!(public.profile.profile_views, 2);

        let err = service.increment_views(user.id + 50, None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_redirect_for() {
        let (service, db, user) = setup().await;
        let resp = service.redirect_for(&user).await.unwrap();
        assert_eq!(resp.redirect_to, "/api/v1/profiles/students/ayse");

        let company_user = create_user(&db, "acme", "hr@acme.com", UserRole::Company).await;
        let resp = service.redirect_for(&company_user).await.unwrap();
        assert_eq!(resp.redirect_to, "/api/v1/companies/acme");
    }
}
