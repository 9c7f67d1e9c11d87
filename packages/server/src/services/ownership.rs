use sea_orm::sea_query::{Query as SeaQuery, SelectStatement};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entity::pet;
use crate::error::AppError;

/// `SELECT pet.id FROM pet WHERE pet.user_id = ?`, for `IN (...)` guards.
pub fn owned_pet_ids(user_id: i32) -> SelectStatement {
    SeaQuery::select()
        .column(pet::Column::Id)
        .from(pet::Entity)
        .and_where(pet::Column::UserId.eq(user_id))
        .to_owned()
}

/// Confirm `pet_id` exists and belongs to `user_id`, in a single predicate.
pub async fn ensure_pet_owned<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    pet_id: i32,
) -> Result<(), AppError> {
    let count = pet::Entity::find()
        .filter(pet::Column::Id.eq(pet_id))
        .filter(pet::Column::UserId.eq(user_id))
        .count(conn)
        .await?;
    if count == 0 {
        return Err(pet_not_found());
    }
    Ok(())
}

pub fn pet_not_found() -> AppError {
    AppError::NotFound("Pet not found".into())
}
