use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::vaccination;
use crate::error::AppError;

use super::shared::{double_option, normalize_optional, validate_required_text};

const VACCINE_NAME_MAX: usize = 200;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateVaccinationRequest {
    #[schema(example = "Rabies")]
    pub vaccine_name: String,
    /// Date given, or due date when in the future.
    #[schema(value_type = String, format = Date, example = "2024-01-01")]
    pub date_administered: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateVaccinationRequest {
    pub vaccine_name: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub date_administered: Option<NaiveDate>,
    /// Absent leaves notes untouched; `null` clears them.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct VaccinationResponse {
    pub id: i32,
    pub pet_id: i32,
    pub vaccine_name: String,
    #[schema(value_type = String, format = Date)]
    pub date_administered: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<vaccination::Model> for VaccinationResponse {
    fn from(m: vaccination::Model) -> Self {
        Self {
            id: m.id,
            pet_id: m.pet_id,
            vaccine_name: m.vaccine_name,
            date_administered: m.date_administered,
            notes: m.notes,
            created_at: m.created_at,
        }
    }
}

impl CreateVaccinationRequest {
    pub fn normalized(self) -> Result<Self, AppError> {
        validate_required_text(&self.vaccine_name, "Vaccine name", VACCINE_NAME_MAX)?;
        Ok(Self {
            vaccine_name: self.vaccine_name.trim().to_string(),
            date_administered: self.date_administered,
            notes: normalize_optional(self.notes),
        })
    }
}

impl UpdateVaccinationRequest {
    pub fn normalized(self) -> Result<Self, AppError> {
        if self == Self::default() {
            return Err(AppError::Validation(
                "At least one field must be provided".into(),
            ));
        }
        if let Some(ref name) = self.vaccine_name {
            validate_required_text(name, "Vaccine name", VACCINE_NAME_MAX)?;
        }
        Ok(Self {
            vaccine_name: self.vaccine_name.map(|n| n.trim().to_string()),
            date_administered: self.date_administered,
            notes: self.notes.map(normalize_optional),
        })
    }
}
