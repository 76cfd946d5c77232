use crate::entities::{
    bookmark_entity as bookmarks, company_entity as companies, position_entity as positions,
    profile_entity as profiles, profile_skill_entity as profile_skills,
    project_entity as projects, skill_entity as skills, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{
    company_profile_path, normalize, normalize_non_empty, slug_candidate, slugify,
    validate_optional_url,
};
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr, Query, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;

/// `lower(col) LIKE %value%`，通配符用 `!` 转义
fn icontains<C: ColumnTrait>(col: C, value: &str) -> SimpleExpr {
    let escaped = value
        .to_lowercase()
        .replace('!', "!!")
        .replace('%', "!%")
        .replace('_', "!_");
    Expr::expr(Func::lower(Expr::col(col)))
        .like(LikeExpr::new(format!("%{escaped}%")).escape('!'))
}

/// 与 `/companies` 下固定路由冲突的 slug
const RESERVED_SLUGS: &[&str] = &["me", "bookmarks"];

#[derive(Clone)]
pub struct CompanyService {
    pool: DatabaseConnection,
}

impl CompanyService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(&self, user_id: i64) -> AppResult<Option<companies::Model>> {
        Ok(companies::Entity::find()
            .filter(companies::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?)
    }

    pub async fn find_by_slug(&self, slug: &str) -> AppResult<companies::Model> {
        companies::Entity::find()
            .filter(companies::Column::Slug.eq(slug))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Company not found".to_string()))
    }

    /// 只返回属于该用户的公司，别人的 slug 一律当作不存在
    pub async fn find_owned(&self, user_id: i64, slug: &str) -> AppResult<companies::Model> {
        companies::Entity::find()
            .filter(companies::Column::Slug.eq(slug))
            .filter(companies::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Company not found".to_string()))
    }

    /// 依次尝试 `base`、`base-2`、`base-3` 直到没有冲突
    pub async fn unique_slug(&self, base: &str, exclude_id: Option<i64>) -> AppResult<String> {
        let mut attempt = 1;
        loop {
            let candidate = slug_candidate(base, attempt);
            if RESERVED_SLUGS.contains(&candidate.as_str()) {
                attempt += 1;
                continue;
            }
            let mut query =
                companies::Entity::find().filter(companies::Column::Slug.eq(candidate.as_str()));
            if let Some(id) = exclude_id {
                query = query.filter(companies::Column::Id.ne(id));
            }
            if query.count(&self.pool).await? == 0 {
                return Ok(candidate);
            }
            attempt += 1;
        }
    }

    fn slug_base_for_user(user: &users::Model) -> String {
        let source = if user.username.is_empty() {
            user.email.split('@').next().unwrap_or_default()
        } else {
            user.username.as_str()
        };
        let base = slugify(source);
        if base.is_empty() {
            format!("company-{}", user.id)
        } else {
            base
        }
    }

    /// 取用户的公司，没有就新建一个（名称取用户名）
    pub async fn ensure_company_for_user(
        &self,
        user: &users::Model,
    ) -> AppResult<companies::Model> {
        if let Some(company) = self.find_by_user(user.id).await? {
            if !company.slug.is_empty() {
                return Ok(company);
            }
            let slug = self
                .unique_slug(&Self::slug_base_for_user(user), Some(company.id))
                .await?;
            let mut model = company.into_active_model();
            model.slug = Set(slug);
            return Ok(model.update(&self.pool).await?);
        }

        let slug = self.unique_slug(&Self::slug_base_for_user(user), None).await?;
        let name = if user.username.is_empty() {
            "Company".to_string()
        } else {
            user.username.clone()
        };
        let company = companies::ActiveModel {
            user_id: Set(Some(user.id)),
            name: Set(name),
            slug: Set(slug),
            is_verified: Set(false),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Created company {} for user {}", company.slug, user.id);
        Ok(company)
    }

    /// 公司主页：公司信息、职位、学生筛选结果与收藏
    pub async fn company_page(
        &self,
        slug: &str,
        query: StudentFilterQuery,
    ) -> AppResult<CompanyPageResponse> {
        let company = self.find_by_slug(slug).await?;

        let position_models = positions::Entity::find()
            .filter(positions::Column::CompanyId.eq(company.id))
            .order_by_desc(positions::Column::Id)
            .all(&self.pool)
            .await?;
        let completion_percent = company_completion_percent(
            company.about.as_deref(),
            company.location.as_deref(),
            !position_models.is_empty(),
        );

        // 基础集合：不属于任何公司账号的学生，且不是本公司账号自己
        let mut base = Condition::all().add(
            profiles::Column::UserId.not_in_subquery(
                Query::select()
                    .column(companies::Column::UserId)
                    .from(companies::Entity)
                    .and_where(Expr::col(companies::Column::UserId).is_not_null())
                    .to_owned(),
            ),
        );
        if let Some(owner) = company.user_id {
            base = base.add(profiles::Column::UserId.ne(owner));
        }

        let total_count = profiles::Entity::find()
            .filter(base.clone())
            .count(&self.pool)
            .await?;

        let filtered = base.add(Self::student_filters(&query)?);
        let student_models = profiles::Entity::find()
            .filter(filtered)
            .order_by_asc(profiles::Column::Id)
            .all(&self.pool)
            .await?;
        let filtered_count = student_models.len() as u64;
        let students = self.student_cards(student_models).await?;

        let bookmarked_ids: Vec<i64> = bookmarks::Entity::find()
            .filter(bookmarks::Column::CompanyId.eq(company.id))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|b| b.profile_id)
            .collect();
        let bookmarked_models = if bookmarked_ids.is_empty() {
            Vec::new()
        } else {
            profiles::Entity::find()
                .filter(profiles::Column::Id.is_in(bookmarked_ids.clone()))
                .all(&self.pool)
                .await?
        };
        let bookmarked_students = self.student_cards(bookmarked_models).await?;

        let open_positions_count = position_models.len();
        Ok(CompanyPageResponse {
            company: company.into(),
            positions: position_models.into_iter().map(Into::into).collect(),
            open_positions_count,
            completion_percent,
            active_tab: normalize_non_empty(query.tab.as_deref()).unwrap_or_else(|| "all".into()),
            students,
            filtered_count,
            total_count,
            bookmarked_students,
            bookmarked_ids,
        })
    }

    fn student_filters(query: &StudentFilterQuery) -> AppResult<Condition> {
        fn value(v: &Option<String>) -> Option<&str> {
            v.as_deref().map(str::trim).filter(|v| !v.is_empty())
        }
        let mut cond = Condition::all();

        if let Some(major) = value(&query.major) {
            cond = cond.add(icontains(profiles::Column::Major, major));
        }
        if let Some(location) = value(&query.location) {
            cond = cond.add(icontains(profiles::Column::Location, location));
        }
        if let Some(year) = value(&query.graduation_year) {
            let year: i32 = year.parse().map_err(|_| {
                AppError::ValidationError("graduation_year must be a number".to_string())
            })?;
            cond = cond.add(profiles::Column::GraduationYear.eq(year));
        }
        if let Some(kind) = value(&query.internship_type) {
            cond = cond.add(
                Expr::expr(Func::lower(Expr::col(profiles::Column::InternshipType)))
                    .eq(kind.to_lowercase()),
            );
        }
        if let Some(skill) = value(&query.skill) {
            cond = cond.add(
                profiles::Column::Id.in_subquery(
                    Query::select()
                        .column(profile_skills::Column::ProfileId)
                        .from(profile_skills::Entity)
                        .and_where(
                            profile_skills::Column::SkillId.in_subquery(
                                Query::select()
                                    .column(skills::Column::Id)
                                    .from(skills::Entity)
                                    .and_where(icontains(skills::Column::Name, skill))
                                    .to_owned(),
                            ),
                        )
                        .to_owned(),
                ),
            );
        }
        if let Some(tech) = value(&query.project_skill) {
            cond = cond.add(
                profiles::Column::Id.in_subquery(
                    Query::select()
                        .column(projects::Column::ProfileId)
                        .from(projects::Entity)
                        .and_where(icontains(projects::Column::Technologies, tech))
                        .to_owned(),
                ),
            );
        }
        Ok(cond)
    }

    /// 组装学生卡片，按用户名排序
    async fn student_cards(&self, models: Vec<profiles::Model>) -> AppResult<Vec<StudentCard>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let profile_ids: Vec<i64> = models.iter().map(|p| p.id).collect();
        let user_ids: Vec<i64> = models.iter().map(|p| p.user_id).collect();

        let users_by_id: HashMap<i64, users::Model> = users::Entity::find()
            .filter(users::Column::Id.is_in(user_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let links = profile_skills::Entity::find()
            .filter(profile_skills::Column::ProfileId.is_in(profile_ids))
            .all(&self.pool)
            .await?;
        let skill_ids: Vec<i64> = links.iter().map(|l| l.skill_id).collect();
        let skill_names: HashMap<i64, String> = if skill_ids.is_empty() {
            HashMap::new()
        } else {
            skills::Entity::find()
                .filter(skills::Column::Id.is_in(skill_ids))
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|s| (s.id, s.name))
                .collect()
        };
        let mut skills_by_profile: HashMap<i64, Vec<String>> = HashMap::new();
        for link in links {
            if let Some(name) = skill_names.get(&link.skill_id) {
                skills_by_profile
                    .entry(link.profile_id)
                    .or_default()
                    .push(name.clone());
            }
        }

        let mut cards: Vec<StudentCard> = models
            .into_iter()
            .filter_map(|p| {
                let user = users_by_id.get(&p.user_id)?;
                let mut skills = skills_by_profile.remove(&p.id).unwrap_or_default();
                skills.sort();
                Some(StudentCard {
                    profile_id: p.id,
                    user_id: p.user_id,
                    username: user.username.clone(),
                    full_name: user.full_name(),
                    university: p.university,
                    major: p.major,
                    graduation_year: p.graduation_year,
                    location: p.location,
                    internship_type: p.internship_type,
                    skills,
                })
            })
            .collect();
        cards.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(cards)
    }

    pub async fn update_company_info(
        &self,
        user_id: i64,
        slug: &str,
        request: UpdateCompanyRequest,
    ) -> AppResult<CompanyResponse> {
        let company = self.find_owned(user_id, slug).await?;

        let name = normalize_non_empty(Some(&request.name))
            .ok_or_else(|| AppError::ValidationError("Name is required.".to_string()))?;
        let website = validate_optional_url("website", request.website)?;

        let mut model = company.into_active_model();
        model.name = Set(name);
        model.industry = Set(normalize_non_empty(request.industry.as_deref()));
        model.location = Set(normalize_non_empty(request.location.as_deref()));
        model.website = Set(website);
        model.about = Set(normalize_non_empty(request.about.as_deref()));
        Ok(model.update(&self.pool).await?.into())
    }

    pub async fn add_position(
        &self,
        user_id: i64,
        slug: &str,
        request: CreatePositionRequest,
    ) -> AppResult<PositionResponse> {
        let company = self.find_owned(user_id, slug).await?;

        let title = normalize_non_empty(Some(&request.title))
            .ok_or_else(|| AppError::ValidationError("Title is required.".to_string()))?;
        let link = validate_optional_url("link", request.link)?;

        let position = positions::ActiveModel {
            company_id: Set(company.id),
            title: Set(title),
            description: Set(normalize_non_empty(request.description.as_deref())),
            link: Set(link),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(position.into())
    }

    pub async fn update_social(
        &self,
        user_id: i64,
        slug: &str,
        request: UpdateCompanySocialRequest,
    ) -> AppResult<CompanyResponse> {
        let company = self.find_owned(user_id, slug).await?;

        let linkedin = validate_optional_url("linkedin", request.linkedin)?;
        let twitter = validate_optional_url("twitter", request.twitter)?;
        let facebook = validate_optional_url("facebook", request.facebook)?;

        let mut model = company.into_active_model();
        model.linkedin = Set(linkedin);
        model.twitter = Set(twitter);
        model.facebook = Set(facebook);
        Ok(model.update(&self.pool).await?.into())
    }

    /// 当前用户的公司收藏 / 取消收藏某个学生
    pub async fn toggle_bookmark(
        &self,
        user_id: i64,
        profile_id: i64,
        request: ToggleBookmarkRequest,
    ) -> AppResult<ToggleBookmarkResponse> {
        let company = self.find_by_user(user_id).await?.ok_or(AppError::PermissionDenied)?;

        profiles::Entity::find_by_id(profile_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Student profile not found".to_string()))?;

        let existing = bookmarks::Entity::find()
            .filter(bookmarks::Column::CompanyId.eq(company.id))
            .filter(bookmarks::Column::ProfileId.eq(profile_id))
            .one(&self.pool)
            .await?;

        let bookmarked = match existing {
            Some(bookmark) => {
                bookmark.delete(&self.pool).await?;
                false
            }
            None => {
                bookmarks::ActiveModel {
                    company_id: Set(company.id),
                    profile_id: Set(profile_id),
                    created_at: Set(Utc::now()),
                    ..Default::default()
                }
                .insert(&self.pool)
                .await?;
                true
            }
        };

        let redirect_to = normalize(request.next.as_deref())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| company_profile_path(&company.slug));
        Ok(ToggleBookmarkResponse {
            bookmarked,
            redirect_to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::UserRole;
    use crate::test_support::{create_user, setup_db};

    async fn student(
        db: &DatabaseConnection,
        username: &str,
        major: &str,
        location: &str,
        year: i32,
    ) -> profiles::Model {
        let user = create_user(db, username, &format!("{username}@uni.edu"), UserRole::Student).await;
        profiles::ActiveModel {
            user_id: Set(user.id),
            major: Set(Some(major.to_string())),
            location: Set(Some(location.to_string())),
            graduation_year: Set(Some(year)),
            internship_type: Set(Some("Remote".to_string())),
            open_to_relocate: Set(false),
            profile_views: Set(0),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    async fn add_skill(db: &DatabaseConnection, profile_id: i64, name: &str) {
        let skill = match skills::Entity::find()
            .filter(skills::Column::Name.eq(name))
            .one(db)
            .await
            .unwrap()
        {
            Some(s) => s,
            None => skills::ActiveModel {
                name: Set(name.to_string()),
                ..Default::default()
            }
            .insert(db)
            .await
            .unwrap(),
        };
        profile_skills::ActiveModel {
            profile_id: Set(profile_id),
            skill_id: Set(skill.id),
        }
        .insert(db)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_unique_slugs() {
        let db = setup_db().await;
        let service = CompanyService::new(db.clone());

        let a = create_user(&db, "Acme Corp", "a@acme.com", UserRole::Company).await;
        let b = create_user(&db, "acme-corp", "b@acme.com", UserRole::Company).await;
        let c = create_user(&db, "!!!", "c@acme.com", UserRole::Company).await;

        let ca = service.ensure_company_for_user(&a).await.unwrap();
        let cb = service.ensure_company_for_user(&b).await.unwrap();
        let cc = service.ensure_company_for_user(&c).await.unwrap();
        assert_eq!(ca.slug, "acme-corp");
        assert_eq!(cb.slug, "acme-corp-2");
        assert_eq!(cc.slug, format!("company-{}", c.id));
        assert_eq!(ca.name, "Acme Corp");

        let me = create_user(&db, "me", "me@acme.com", UserRole::Company).await;
        let cme = service.ensure_company_for_user(&me).await.unwrap();
        assert_eq!(cme.slug, "me-2");

        // 再次调用返回同一条记录
        let again = service.ensure_company_for_user(&a).await.unwrap();
        assert_eq!(again.id, ca.id);
    }

    #[tokio::test]
    async fn test_company_page_filters_students() {
        let db = setup_db().await;
        let service = CompanyService::new(db.clone());
        let owner = create_user(&db, "acme", "hr@acme.com", UserRole::Company).await;
        service.ensure_company_for_user(&owner).await.unwrap();

        let ali = student(&db, "ali", "Computer Engineering", "Istanbul", 2026).await;
        let bora = student(&db, "bora", "Economics", "Ankara", 2025).await;
        let _cem = student(&db, "cem", "Software Engineering", "izmir", 2026).await;
        add_skill(&db, ali.id, "Rust").await;
        add_skill(&db, bora.id, "Python").await;
        projects::ActiveModel {
            profile_id: Set(bora.id),
            title: Set("Scraper".into()),
            description: Set(String::new()),
            technologies: Set("Python, Django".into()),
            link: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let page = service
            .company_page("acme", StudentFilterQuery::default())
            .await
            .unwrap();
        assert_eq!(page.total_count, 3);
        assert_eq!(page.filtered_count, 3);
        assert_eq!(page.active_tab, "all");
        let names: Vec<_> = page.students.iter().map(|s| s.username.as_str()).collect();
        assert_eq!(names, vec!["ali", "bora", "cem"]);

        let page = service
            .company_page(
                "acme",
                StudentFilterQuery {
                    major: Some("engineering".into()),
                    graduation_year: Some("2026".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.filtered_count, 2);
        assert_eq!(page.total_count, 3);

        let page = service
            .company_page(
                "acme",
                StudentFilterQuery {
                    skill: Some("rus".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.students.len(), 1);
        assert_eq!(page.students[0].skills, vec!["Rust".to_string()]);

        let page = service
            .company_page(
                "acme",
                StudentFilterQuery {
                    project_skill: Some("django".into()),
                    internship_type: Some("remote".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.students.len(), 1);
        assert_eq!(page.students[0].username, "bora");

        let page = service
            .company_page(
                "acme",
                StudentFilterQuery {
                    major: Some("100%".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.filtered_count, 0);

        let err = service
            .company_page(
                "acme",
                StudentFilterQuery {
                    graduation_year: Some("soon".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_company_users_are_not_listed() {
        let db = setup_db().await;
        let service = CompanyService::new(db.clone());
        let owner = create_user(&db, "acme", "hr@acme.com", UserRole::Company).await;
        service.ensure_company_for_user(&owner).await.unwrap();
        // 公司账号自己也有 profile 时不应出现在列表里
        profiles::ActiveModel {
            user_id: Set(owner.id),
            open_to_relocate: Set(false),
            profile_views: Set(0),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
        student(&db, "ali", "CS", "Istanbul", 2026).await;

        let page = service
            .company_page("acme", StudentFilterQuery::default())
            .await
            .unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.students[0].username, "ali");
    }

    #[tokio::test]
    async fn test_toggle_bookmark() {
        let db = setup_db().await;
        let service = CompanyService::new(db.clone());
        let owner = create_user(&db, "acme", "hr@acme.com", UserRole::Company).await;
        service.ensure_company_for_user(&owner).await.unwrap();
        let ali = student(&db, "ali", "CS", "Istanbul", 2026).await;

        let resp = service
            .toggle_bookmark(owner.id, ali.id, ToggleBookmarkRequest { next: None })
            .await
            .unwrap();
        assert!(resp.bookmarked);
        assert_eq!(resp.redirect_to, "/api/v1/companies/acme");

        let page = service
            .company_page("acme", StudentFilterQuery::default())
            .await
            .unwrap();
        assert_eq!(page.bookmarked_ids, vec![ali.id]);
        assert_eq!(page.bookmarked_students[0].username, "ali");

        let resp = service
            .toggle_bookmark(
                owner.id,
                ali.id,
                ToggleBookmarkRequest {
                    next: Some("/back".into()),
                },
            )
            .await
            .unwrap();
        assert!(!resp.bookmarked);
        assert_eq!(resp.redirect_to, "/back");

        // 学生账号没有公司
        let err = service
            .toggle_bookmark(ali.user_id, ali.id, ToggleBookmarkRequest { next: None })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied));
    }

    #[tokio::test]
    async fn test_owner_only_updates() {
        let db = setup_db().await;
        let service = CompanyService::new(db.clone());
        let owner = create_user(&db, "acme", "hr@acme.com", UserRole::Company).await;
        let other = create_user(&db, "globex", "hr@globex.com", UserRole::Company).await;
        service.ensure_company_for_user(&owner).await.unwrap();

        let request = || UpdateCompanyRequest {
            name: "Acme Inc".into(),
            industry: Some("Software".into()),
            location: Some(" Istanbul ".into()),
            website: Some("https://acme.example".into()),
            about: Some("null".into()),
        };
        let err = service
            .update_company_info(other.id, "acme", request())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let updated = service
            .update_company_info(owner.id, "acme", request())
            .await
            .unwrap();
        assert_eq!(updated.name, "Acme Inc");
        assert_eq!(updated.location.as_deref(), Some("Istanbul"));
        assert_eq!(updated.about, None);

        service
            .add_position(
                owner.id,
                "acme",
                CreatePositionRequest {
                    title: "Backend Intern".into(),
                    description: None,
                    link: None,
                },
            )
            .await
            .unwrap();
        let page = service
            .company_page("acme", StudentFilterQuery::default())
            .await
            .unwrap();
        assert_eq!(page.open_positions_count, 1);
        assert_eq!(page.completion_percent, 70);
    }
}
