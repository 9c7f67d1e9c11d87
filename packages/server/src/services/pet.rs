use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    Value,
};
use tracing::debug;

use crate::entity::{event, pet, vaccination};
use crate::error::AppError;
use crate::models::pet::{NewPet, PetChanges};

use super::ownership::pet_not_found;

/// How an update treats the pet's image column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageUpdate {
    /// No file and no reference supplied; the column is left out of the write.
    Keep,
    /// A file arrived with this request and was stored under this URL.
    Uploaded(String),
    /// The client passed a previously obtained reference.
    Passthrough(String),
}

impl ImageUpdate {
    pub fn reference(&self) -> Option<&str> {
        match self {
            ImageUpdate::Keep => None,
            ImageUpdate::Uploaded(url) | ImageUpdate::Passthrough(url) => Some(url),
        }
    }
}

/// Write set of a pet update.
///
/// `updated_at` is always assigned. Scalar columns are assigned only when
/// provided, and `image` only when the image mode is not [`ImageUpdate::Keep`].
#[derive(Debug, Clone)]
pub struct PetUpdate {
    pub changes: PetChanges,
    pub image: ImageUpdate,
}

impl PetUpdate {
    pub fn assignments(self, now: DateTime<Utc>) -> Vec<(pet::Column, Value)> {
        let PetChanges {
            name,
            breed,
            weight,
            pet_type,
            birth_date,
            neutered,
            gender,
        } = self.changes;

        let mut set: Vec<(pet::Column, Value)> = vec![(pet::Column::UpdatedAt, now.into())];
        if let Some(name) = name {
            set.push((pet::Column::Name, name.into()));
        }
        if let Some(breed) = breed {
            set.push((pet::Column::Breed, breed.into()));
        }
        if let Some(weight) = weight {
            set.push((pet::Column::Weight, weight.into()));
        }
        if let Some(pet_type) = pet_type {
            set.push((pet::Column::PetType, pet_type.into()));
        }
        if let Some(birth_date) = birth_date {
            set.push((pet::Column::BirthDate, birth_date.into()));
        }
        if let Some(neutered) = neutered {
            set.push((pet::Column::Neutered, neutered.into()));
        }
        if let Some(gender) = gender {
            set.push((pet::Column::Gender, gender.into()));
        }
        match self.image {
            ImageUpdate::Keep => {}
            ImageUpdate::Uploaded(url) | ImageUpdate::Passthrough(url) => {
                set.push((pet::Column::Image, url.into()));
            }
        }
        set
    }
}

pub struct PetService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> PetService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        user_id: i32,
        new_pet: NewPet,
        image: String,
    ) -> Result<pet::Model, AppError> {
        let now = Utc::now();
        let model = pet::ActiveModel {
            name: Set(new_pet.name),
            breed: Set(new_pet.breed),
            weight: Set(new_pet.weight),
            pet_type: Set(new_pet.pet_type),
            birth_date: Set(new_pet.birth_date),
            neutered: Set(new_pet.neutered),
            gender: Set(new_pet.gender),
            image: Set(image),
            user_id: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(model.insert(self.conn).await?)
    }

    /// The caller's pets, oldest first.
    pub async fn list(&self, user_id: i32) -> Result<Vec<pet::Model>, AppError> {
        Ok(pet::Entity::find()
            .filter(pet::Column::UserId.eq(user_id))
            .order_by_asc(pet::Column::Id)
            .all(self.conn)
            .await?)
    }

    pub async fn find(&self, user_id: i32, pet_id: i32) -> Result<pet::Model, AppError> {
        pet::Entity::find()
            .filter(pet::Column::Id.eq(pet_id))
            .filter(pet::Column::UserId.eq(user_id))
            .one(self.conn)
            .await?
            .ok_or_else(pet_not_found)
    }

    /// Apply `update` under `WHERE id = ? AND user_id = ?`, then re-read.
    pub async fn update(
        &self,
        user_id: i32,
        pet_id: i32,
        update: PetUpdate,
    ) -> Result<pet::Model, AppError> {
        let mut stmt = pet::Entity::update_many();
        for (column, value) in update.assignments(Utc::now()) {
            stmt = stmt.col_expr(column, Expr::value(value));
        }
        let result = stmt
            .filter(pet::Column::Id.eq(pet_id))
            .filter(pet::Column::UserId.eq(user_id))
            .exec(self.conn)
            .await?;
        if result.rows_affected == 0 {
            return Err(pet_not_found());
        }
        self.find(user_id, pet_id).await
    }

    /// Delete the pet and its vaccinations and events. Run inside a
    /// transaction so a missing pet leaves nothing half-deleted.
    pub async fn delete(&self, user_id: i32, pet_id: i32) -> Result<(), AppError> {
        let owned = || {
            sea_orm::sea_query::Query::select()
                .column(pet::Column::Id)
                .from(pet::Entity)
                .and_where(pet::Column::Id.eq(pet_id))
                .and_where(pet::Column::UserId.eq(user_id))
                .to_owned()
        };

        let vaccinations = vaccination::Entity::delete_many()
            .filter(vaccination::Column::PetId.in_subquery(owned()))
            .exec(self.conn)
            .await?;
        let events = event::Entity::delete_many()
            .filter(event::Column::PetId.in_subquery(owned()))
            .exec(self.conn)
            .await?;

        let pets = pet::Entity::delete_many()
            .filter(pet::Column::Id.eq(pet_id))
            .filter(pet::Column::UserId.eq(user_id))
            .exec(self.conn)
            .await?;
        if pets.rows_affected == 0 {
            return Err(pet_not_found());
        }

        debug!(
            pet_id,
            vaccinations = vaccinations.rows_affected,
            events = events.rows_affected,
            "pet deleted with dependents"
        );
        Ok(())
    }
}
