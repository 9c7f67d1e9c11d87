use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entity::vaccination;
use crate::error::AppError;
use crate::models::vaccination::{CreateVaccinationRequest, UpdateVaccinationRequest};

use super::ownership::{ensure_pet_owned, owned_pet_ids};

fn vaccination_not_found() -> AppError {
    AppError::NotFound("Vaccination not found".into())
}

pub struct VaccinationService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> VaccinationService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Vaccinations of one of the caller's pets, by date.
    pub async fn list(
        &self,
        user_id: i32,
        pet_id: i32,
    ) -> Result<Vec<vaccination::Model>, AppError> {
        ensure_pet_owned(self.conn, user_id, pet_id).await?;
        Ok(vaccination::Entity::find()
            .filter(vaccination::Column::PetId.eq(pet_id))
            .order_by_asc(vaccination::Column::DateAdministered)
            .order_by_asc(vaccination::Column::Id)
            .all(self.conn)
            .await?)
    }

    pub async fn create(
        &self,
        user_id: i32,
        pet_id: i32,
        req: CreateVaccinationRequest,
    ) -> Result<vaccination::Model, AppError> {
        ensure_pet_owned(self.conn, user_id, pet_id).await?;
        let model = vaccination::ActiveModel {
            vaccine_name: Set(req.vaccine_name),
            date_administered: Set(req.date_administered),
            notes: Set(req.notes),
            pet_id: Set(pet_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        Ok(model.insert(self.conn).await?)
    }

    /// Fetch a vaccination only if its pet belongs to `user_id`.
    pub async fn find_owned(
        &self,
        user_id: i32,
        id: i32,
    ) -> Result<vaccination::Model, AppError> {
        vaccination::Entity::find()
            .filter(vaccination::Column::Id.eq(id))
            .filter(vaccination::Column::PetId.in_subquery(owned_pet_ids(user_id)))
            .one(self.conn)
            .await?
            .ok_or_else(vaccination_not_found)
    }

    pub async fn update(
        &self,
        user_id: i32,
        id: i32,
        req: UpdateVaccinationRequest,
    ) -> Result<vaccination::Model, AppError> {
        let mut stmt = vaccination::Entity::update_many();
        if let Some(name) = req.vaccine_name {
            stmt = stmt.col_expr(vaccination::Column::VaccineName, Expr::value(name));
        }
        if let Some(date) = req.date_administered {
            stmt = stmt.col_expr(vaccination::Column::DateAdministered, Expr::value(date));
        }
        if let Some(notes) = req.notes {
            stmt = stmt.col_expr(vaccination::Column::Notes, Expr::value(notes));
        }

        let result = stmt
            .filter(vaccination::Column::Id.eq(id))
            .filter(vaccination::Column::PetId.in_subquery(owned_pet_ids(user_id)))
            .exec(self.conn)
            .await?;
        if result.rows_affected == 0 {
            return Err(vaccination_not_found());
        }
        self.find_owned(user_id, id).await
    }

    pub async fn delete(&self, user_id: i32, id: i32) -> Result<(), AppError> {
        let result = vaccination::Entity::delete_many()
            .filter(vaccination::Column::Id.eq(id))
            .filter(vaccination::Column::PetId.in_subquery(owned_pet_ids(user_id)))
            .exec(self.conn)
            .await?;
        if result.rows_affected == 0 {
            return Err(vaccination_not_found());
        }
        Ok(())
    }
}
