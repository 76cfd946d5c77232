use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Companies {
    Table,
    ContactEmail,
    IsVerified,
    VerificationCode,
    VerificationExpiresAt,
    VerifiedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // SQLite 的 ALTER TABLE 每次只能加一列
        let columns = [
            ColumnDef::new(Companies::ContactEmail)
                .string_len(254)
                .null()
                .to_owned(),
            ColumnDef::new(Companies::IsVerified)
                .boolean()
                .not_null()
                .default(false)
                .to_owned(),
            ColumnDef::new(Companies::VerificationCode)
                .string_len(6)
                .null()
                .to_owned(),
            ColumnDef::new(Companies::VerificationExpiresAt)
                .timestamp_with_time_zone()
                .null()
                .to_owned(),
            ColumnDef::new(Companies::VerifiedAt)
                .timestamp_with_time_zone()
                .null()
                .to_owned(),
        ];

        for mut column in columns {
            manager
                .alter_table(
                    Table::alter()
                        .table(Companies::Table)
                        .add_column(&mut column)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_index(
                Index::create()
                    .name("idx_companies_is_verified")
                    .table(Companies::Table)
                    .col(Companies::IsVerified)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_companies_is_verified")
                    .table(Companies::Table)
                    .to_owned(),
            )
            .await?;
        for column in [
            Companies::VerifiedAt,
            Companies::VerificationExpiresAt,
            Companies::VerificationCode,
            Companies::IsVerified,
            Companies::ContactEmail,
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(Companies::Table)
                        .drop_column(column)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }
}
