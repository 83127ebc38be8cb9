use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "bio_links")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub profile_handle: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub url: String,
    /// 图标原始字符串：符号名或图片 URI
    #[sea_orm(column_type = "Text", nullable)]
    pub icon: Option<String>,
    pub color: String,
    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
