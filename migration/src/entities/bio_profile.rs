use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "bio_profiles")]
pub struct Model {
    /// 小写存储，查询时大小写不敏感
    #[sea_orm(primary_key, auto_increment = false)]
    pub handle: String,
    pub display_name: String,
    #[sea_orm(column_type = "Text")]
    pub tagline: String,
    #[sea_orm(column_type = "Text")]
    pub avatar_ref: String,
    pub dark_mode: bool,
    pub share_count: i64,
    pub links_unlocked: bool,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
