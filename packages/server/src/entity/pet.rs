use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pet")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub breed: Option<String>,
    pub weight: Option<f64>, // in kilograms
    #[sea_orm(column_name = "type")]
    pub pet_type: Option<String>,
    pub birth_date: Date,
    pub neutered: bool,
    pub gender: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub image: String, // public URL of the photo

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    #[sea_orm(has_many)]
    pub vaccinations: HasMany<super::vaccination::Entity>,
    #[sea_orm(has_many)]
    pub events: HasMany<super::event::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
