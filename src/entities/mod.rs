pub mod bookmarks;
pub mod certifications;
pub mod companies;
pub mod oauth_accounts;
pub mod positions;
pub mod profile_skills;
pub mod profiles;
pub mod projects;
pub mod skills;
pub mod users;

pub use bookmarks as bookmark_entity;
pub use certifications as certification_entity;
pub use companies as company_entity;
pub use oauth_accounts as oauth_account_entity;
pub use positions as position_entity;
pub use profile_skills as profile_skill_entity;
pub use profiles as profile_entity;
pub use projects as project_entity;
pub use skills as skill_entity;
pub use users as user_entity;
pub use users::UserRole;
