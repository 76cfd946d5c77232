use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
    UserId,
    Name,
    Slug,
    Industry,
    Location,
    Website,
    About,
    Linkedin,
    Twitter,
    Facebook,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Positions {
    Table,
    Id,
    CompanyId,
    Title,
    Description,
    Link,
}

#[derive(DeriveIden)]
enum Bookmarks {
    Table,
    Id,
    CompanyId,
    ProfileId,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Companies::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Companies::UserId)
                            .big_integer()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Companies::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Companies::Slug)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Companies::Industry).string_len(255).null())
                    .col(ColumnDef::new(Companies::Location).string_len(255).null())
                    .col(ColumnDef::new(Companies::Website).string_len(200).null())
                    .col(ColumnDef::new(Companies::About).text().null())
                    .col(ColumnDef::new(Companies::Linkedin).string_len(200).null())
                    .col(ColumnDef::new(Companies::Twitter).string_len(200).null())
                    .col(ColumnDef::new(Companies::Facebook).string_len(200).null())
                    .col(
                        ColumnDef::new(Companies::CreatedAt)
                            .timestamp_with_time_zone()
                            .null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_companies_user")
                            .from(Companies::Table, Companies::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Positions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Positions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Positions::CompanyId).big_integer().not_null())
                    .col(ColumnDef::new(Positions::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Positions::Description).text().null())
                    .col(ColumnDef::new(Positions::Link).string_len(200).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_positions_company")
                            .from(Positions::Table, Positions::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Bookmarks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookmarks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookmarks::CompanyId).big_integer().not_null())
                    .col(ColumnDef::new(Bookmarks::ProfileId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Bookmarks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookmarks_company")
                            .from(Bookmarks::Table, Bookmarks::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookmarks_profile")
                            .from(Bookmarks::Table, Bookmarks::ProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一公司对同一学生只能收藏一次
        manager
            .create_index(
                Index::create()
                    .name("idx_bookmarks_company_profile")
                    .table(Bookmarks::Table)
                    .col(Bookmarks::CompanyId)
                    .col(Bookmarks::ProfileId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookmarks::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Positions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Companies::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
