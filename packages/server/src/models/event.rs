use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{event, pet};
use crate::error::AppError;

use super::shared::{double_option, normalize_optional, validate_required_text};

const EVENT_TITLE_MAX: usize = 200;

/// Hard cap on the upcoming-events page size.
pub const UPCOMING_LIMIT_MAX: u64 = 50;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateEventRequest {
    #[schema(example = "Grooming")]
    pub event_title: String,
    #[schema(value_type = String, format = Date, example = "2024-06-01")]
    pub event_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateEventRequest {
    pub event_title: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub event_date: Option<NaiveDate>,
    /// Absent leaves notes untouched; `null` clears them.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct EventResponse {
    pub id: i32,
    pub pet_id: i32,
    pub event_title: String,
    #[schema(value_type = String, format = Date)]
    pub event_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<event::Model> for EventResponse {
    fn from(m: event::Model) -> Self {
        Self {
            id: m.id,
            pet_id: m.pet_id,
            event_title: m.event_title,
            event_date: m.event_date,
            notes: m.notes,
            created_at: m.created_at,
        }
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpcomingQuery {
    /// Page size (1-50). Defaults to the configured upcoming limit.
    pub limit: Option<u64>,
}

impl UpcomingQuery {
    pub fn effective_limit(&self, default: u64) -> u64 {
        self.limit
            .unwrap_or(default)
            .clamp(1, UPCOMING_LIMIT_MAX)
    }
}

/// An upcoming event joined with its pet's display fields.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpcomingEventItem {
    pub id: i32,
    pub pet_id: i32,
    pub pet_name: String,
    pub pet_image: String,
    pub event_title: String,
    #[schema(value_type = String, format = Date)]
    pub event_date: NaiveDate,
    pub notes: Option<String>,
}

impl From<(event::Model, pet::Model)> for UpcomingEventItem {
    fn from((e, p): (event::Model, pet::Model)) -> Self {
        Self {
            id: e.id,
            pet_id: e.pet_id,
            pet_name: p.name,
            pet_image: p.image,
            event_title: e.event_title,
            event_date: e.event_date,
            notes: e.notes,
        }
    }
}

impl CreateEventRequest {
    pub fn normalized(self) -> Result<Self, AppError> {
        validate_required_text(&self.event_title, "Event title", EVENT_TITLE_MAX)?;
        Ok(Self {
            event_title: self.event_title.trim().to_string(),
            event_date: self.event_date,
            notes: normalize_optional(self.notes),
        })
    }
}

impl UpdateEventRequest {
    pub fn normalized(self) -> Result<Self, AppError> {
        if self == Self::default() {
            return Err(AppError::Validation(
                "At least one field must be provided".into(),
            ));
        }
        if let Some(ref title) = self.event_title {
            validate_required_text(title, "Event title", EVENT_TITLE_MAX)?;
        }
        Ok(Self {
            event_title: self.event_title.map(|t| t.trim().to_string()),
            event_date: self.event_date,
            notes: self.notes.map(normalize_optional),
        })
    }
}
