use sea_orm::entity::prelude::*;

/// 学生资料，每个用户最多一条
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    pub university: Option<String>,
    pub major: Option<String>,
    pub graduation_year: Option<i32>,
    pub location: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub legacy_website: Option<String>,
    pub internship_type: Option<String>,
    pub preferred_locations: Option<String>,
    pub open_to_relocate: bool,
    pub profile_views: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
