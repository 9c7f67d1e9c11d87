use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vaccination")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub vaccine_name: String,
    pub date_administered: Date, // administered, or due when in the future
    #[sea_orm(column_type = "Text")]
    pub notes: Option<String>,

    pub pet_id: i32,
    #[sea_orm(belongs_to, from = "pet_id", to = "id")]
    pub pet: HasOne<super::pet::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
