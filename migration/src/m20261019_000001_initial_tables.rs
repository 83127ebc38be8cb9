use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 bio_profiles 表
        manager
            .create_table(
                Table::create()
                    .table(BioProfile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BioProfile::Handle)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BioProfile::DisplayName)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(BioProfile::Tagline).text().not_null())
                    .col(ColumnDef::new(BioProfile::AvatarRef).text().not_null())
                    .col(
                        ColumnDef::new(BioProfile::DarkMode)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(BioProfile::ShareCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BioProfile::LinksUnlocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(BioProfile::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 bio_links 表
        manager
            .create_table(
                Table::create()
                    .table(BioLink::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BioLink::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BioLink::ProfileHandle).string().not_null())
                    .col(ColumnDef::new(BioLink::Title).string().not_null())
                    .col(ColumnDef::new(BioLink::Url).text().not_null())
                    .col(ColumnDef::new(BioLink::Icon).text().null())
                    .col(
                        ColumnDef::new(BioLink::Color)
                            .string()
                            .not_null()
                            .default("purple"),
                    )
                    .col(
                        ColumnDef::new(BioLink::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // 按 profile + 排序位置查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_bio_links_profile_order")
                    .table(BioLink::Table)
                    .col(BioLink::ProfileHandle)
                    .col(BioLink::SortOrder)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_bio_links_profile_order").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(BioLink::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(BioProfile::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BioProfile {
    #[sea_orm(iden = "bio_profiles")]
    Table,
    Handle,
    DisplayName,
    Tagline,
    AvatarRef,
    DarkMode,
    ShareCount,
    LinksUnlocked,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BioLink {
    #[sea_orm(iden = "bio_links")]
    Table,
    Id,
    ProfileHandle,
    Title,
    Url,
    Icon,
    Color,
    SortOrder,
}
