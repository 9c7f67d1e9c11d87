use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entity::{event, pet};
use crate::error::AppError;
use crate::models::event::{CreateEventRequest, UpdateEventRequest};

use super::ownership::{ensure_pet_owned, owned_pet_ids};

fn event_not_found() -> AppError {
    AppError::NotFound("Event not found".into())
}

pub struct EventService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> EventService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn list(&self, user_id: i32, pet_id: i32) -> Result<Vec<event::Model>, AppError> {
        ensure_pet_owned(self.conn, user_id, pet_id).await?;
        Ok(event::Entity::find()
            .filter(event::Column::PetId.eq(pet_id))
            .order_by_asc(event::Column::EventDate)
            .order_by_asc(event::Column::Id)
            .all(self.conn)
            .await?)
    }

    pub async fn create(
        &self,
        user_id: i32,
        pet_id: i32,
        req: CreateEventRequest,
    ) -> Result<event::Model, AppError> {
        ensure_pet_owned(self.conn, user_id, pet_id).await?;
        let model = event::ActiveModel {
            event_title: Set(req.event_title),
            event_date: Set(req.event_date),
            notes: Set(req.notes),
            pet_id: Set(pet_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        Ok(model.insert(self.conn).await?)
    }

    pub async fn find_owned(&self, user_id: i32, id: i32) -> Result<event::Model, AppError> {
        event::Entity::find()
            .filter(event::Column::Id.eq(id))
            .filter(event::Column::PetId.in_subquery(owned_pet_ids(user_id)))
            .one(self.conn)
            .await?
            .ok_or_else(event_not_found)
    }

    pub async fn update(
        &self,
        user_id: i32,
        id: i32,
        req: UpdateEventRequest,
    ) -> Result<event::Model, AppError> {
        let mut stmt = event::Entity::update_many();
        if let Some(title) = req.event_title {
            stmt = stmt.col_expr(event::Column::EventTitle, Expr::value(title));
        }
        if let Some(date) = req.event_date {
            stmt = stmt.col_expr(event::Column::EventDate, Expr::value(date));
        }
        if let Some(notes) = req.notes {
            stmt = stmt.col_expr(event::Column::Notes, Expr::value(notes));
        }

        let result = stmt
            .filter(event::Column::Id.eq(id))
            .filter(event::Column::PetId.in_subquery(owned_pet_ids(user_id)))
            .exec(self.conn)
            .await?;
        if result.rows_affected == 0 {
            return Err(event_not_found());
        }
        self.find_owned(user_id, id).await
    }

    pub async fn delete(&self, user_id: i32, id: i32) -> Result<(), AppError> {
        let result = event::Entity::delete_many()
            .filter(event::Column::Id.eq(id))
            .filter(event::Column::PetId.in_subquery(owned_pet_ids(user_id)))
            .exec(self.conn)
            .await?;
        if result.rows_affected == 0 {
            return Err(event_not_found());
        }
        Ok(())
    }

    /// Events dated `today` or later across all of the caller's pets, soonest
    /// first, each paired with its pet.
    pub async fn upcoming(
        &self,
        user_id: i32,
        today: NaiveDate,
        limit: u64,
    ) -> Result<Vec<(event::Model, pet::Model)>, AppError> {
        let rows = event::Entity::find()
            .find_also_related(pet::Entity)
            .filter(pet::Column::UserId.eq(user_id))
            .filter(event::Column::EventDate.gte(today))
            .order_by_asc(event::Column::EventDate)
            .order_by_asc(event::Column::Id)
            .limit(limit)
            .all(self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(e, p)| p.map(|p| (e, p)))
            .collect())
    }
}
