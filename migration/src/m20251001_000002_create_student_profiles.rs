use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Skills {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    UserId,
    University,
    Major,
    GraduationYear,
    Location,
    Bio,
    Github,
    Linkedin,
    Website,
    LegacyWebsite,
    InternshipType,
    PreferredLocations,
    OpenToRelocate,
    ProfileViews,
}

#[derive(DeriveIden)]
enum ProfileSkills {
    Table,
    ProfileId,
    SkillId,
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    ProfileId,
    Title,
    Description,
    Technologies,
    Link,
}

#[derive(DeriveIden)]
enum Certifications {
    Table,
    Id,
    ProfileId,
    Name,
    Organization,
    DateObtained,
    CertificateUrl,
}

fn id_col<T: IntoIden + 'static>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn profile_fk<T: IntoIden + 'static>(table: T, name: &str) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from_tbl(table)
        .from_col(Alias::new("profile_id"))
        .to(Profiles::Table, Profiles::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Skills::Table)
                    .if_not_exists()
                    .col(&mut id_col(Skills::Id))
                    .col(
                        ColumnDef::new(Skills::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(&mut id_col(Profiles::Id))
                    .col(
                        ColumnDef::new(Profiles::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Profiles::University).string_len(255).null())
                    .col(ColumnDef::new(Profiles::Major).string_len(255).null())
                    .col(ColumnDef::new(Profiles::GraduationYear).integer().null())
                    .col(ColumnDef::new(Profiles::Location).string_len(255).null())
                    .col(ColumnDef::new(Profiles::Bio).text().null())
                    .col(ColumnDef::new(Profiles::Github).string_len(200).null())
                    .col(ColumnDef::new(Profiles::Linkedin).string_len(200).null())
                    .col(ColumnDef::new(Profiles::Website).string_len(200).null())
                    .col(ColumnDef::new(Profiles::LegacyWebsite).string_len(200).null())
                    .col(ColumnDef::new(Profiles::InternshipType).string_len(50).null())
                    .col(
                        ColumnDef::new(Profiles::PreferredLocations)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Profiles::OpenToRelocate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Profiles::ProfileViews)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profiles_user")
                            .from(Profiles::Table, Profiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProfileSkills::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProfileSkills::ProfileId).big_integer().not_null())
                    .col(ColumnDef::new(ProfileSkills::SkillId).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(ProfileSkills::ProfileId)
                            .col(ProfileSkills::SkillId),
                    )
                    .foreign_key(&mut profile_fk(ProfileSkills::Table, "fk_profile_skills_profile"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_skills_skill")
                            .from(ProfileSkills::Table, ProfileSkills::SkillId)
                            .to(Skills::Table, Skills::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(&mut id_col(Projects::Id))
                    .col(ColumnDef::new(Projects::ProfileId).big_integer().not_null())
                    .col(ColumnDef::new(Projects::Title).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Projects::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Projects::Technologies)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Projects::Link).string_len(200).null())
                    .foreign_key(&mut profile_fk(Projects::Table, "fk_projects_profile"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Certifications::Table)
                    .if_not_exists()
                    .col(&mut id_col(Certifications::Id))
                    .col(
                        ColumnDef::new(Certifications::ProfileId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Certifications::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Certifications::Organization)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Certifications::DateObtained).date().not_null())
                    .col(
                        ColumnDef::new(Certifications::CertificateUrl)
                            .string_len(200)
                            .null(),
                    )
                    .foreign_key(&mut profile_fk(
                        Certifications::Table,
                        "fk_certifications_profile",
                    ))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Certifications::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProfileSkills::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Skills::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
