use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::pet;
use crate::error::AppError;

use super::shared::{normalize_optional, validate_optional_text, validate_required_text};

const NAME_MAX: usize = 100;
const ATTRIBUTE_MAX: usize = 100;
const IMAGE_URL_MAX: usize = 2048;

/// Pet attributes as submitted by a client, either as multipart text fields or
/// as a JSON body. Every field is optional here; create and update apply their
/// own requirements.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct PetFields {
    #[schema(example = "Fido")]
    pub name: Option<String>,
    #[schema(example = "Labrador")]
    pub breed: Option<String>,
    /// Weight in kilograms.
    #[schema(example = 12.5)]
    pub weight: Option<f64>,
    #[serde(rename = "type")]
    #[schema(example = "dog")]
    pub pet_type: Option<String>,
    #[schema(value_type = String, format = Date, example = "2020-01-01")]
    pub birth_date: Option<NaiveDate>,
    pub neutered: Option<bool>,
    #[schema(example = "male")]
    pub gender: Option<String>,
    /// Previously uploaded image reference, used when no file is attached.
    pub image_url: Option<String>,
}

fn parse_bool(value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        _ => Err(AppError::Validation(
            "Neutered must be true, false, 1 or 0".into(),
        )),
    }
}

impl PetFields {
    /// Apply one multipart text field. Blank values count as absent and
    /// unknown field names are ignored.
    pub fn apply_text_field(&mut self, name: &str, value: &str) -> Result<(), AppError> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(());
        }
        match name {
            "name" => self.name = Some(value.to_string()),
            "breed" => self.breed = Some(value.to_string()),
            "type" => self.pet_type = Some(value.to_string()),
            "gender" => self.gender = Some(value.to_string()),
            "image_url" => self.image_url = Some(value.to_string()),
            "weight" => {
                let weight = value
                    .parse::<f64>()
                    .map_err(|_| AppError::Validation("Weight must be a number".into()))?;
                self.weight = Some(weight);
            }
            "birth_date" => {
                let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                    AppError::Validation("Birth date must be formatted YYYY-MM-DD".into())
                })?;
                self.birth_date = Some(date);
            }
            "neutered" => self.neutered = Some(parse_bool(value)?),
            other => tracing::debug!(field = other, "ignoring unknown pet form field"),
        }
        Ok(())
    }

    /// Blank-trimmed image reference supplied by the client, if any.
    pub fn image_reference(&self) -> Result<Option<String>, AppError> {
        let url = normalize_optional(self.image_url.clone());
        if let Some(ref url) = url
            && url.chars().count() > IMAGE_URL_MAX
        {
            return Err(AppError::Validation(format!(
                "Image URL must be at most {IMAGE_URL_MAX} characters"
            )));
        }
        Ok(url)
    }

    fn validate(&self) -> Result<(), AppError> {
        if let Some(ref name) = self.name {
            validate_required_text(name, "Name", NAME_MAX)?;
        }
        validate_optional_text(self.breed.as_deref(), "Breed", ATTRIBUTE_MAX)?;
        validate_optional_text(self.pet_type.as_deref(), "Type", ATTRIBUTE_MAX)?;
        validate_optional_text(self.gender.as_deref(), "Gender", ATTRIBUTE_MAX)?;
        if let Some(weight) = self.weight
            && (!weight.is_finite() || weight < 0.0)
        {
            return Err(AppError::Validation(
                "Weight must be a non-negative number".into(),
            ));
        }
        Ok(())
    }

    /// Validate for creation: `name` and `birth_date` are required.
    pub fn into_new_pet(self) -> Result<NewPet, AppError> {
        self.validate()?;
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .ok_or_else(|| AppError::Validation("Name is required".into()))?;
        let birth_date = self
            .birth_date
            .ok_or_else(|| AppError::Validation("Birth date is required".into()))?;
        Ok(NewPet {
            name,
            breed: normalize_optional(self.breed),
            weight: self.weight,
            pet_type: normalize_optional(self.pet_type),
            birth_date,
            neutered: self.neutered.unwrap_or(false),
            gender: normalize_optional(self.gender),
        })
    }

    /// Validate for a partial update. Absent fields stay untouched.
    pub fn into_changes(self) -> Result<PetChanges, AppError> {
        self.validate()?;
        Ok(PetChanges {
            name: self.name.map(|n| n.trim().to_string()),
            breed: normalize_optional(self.breed),
            weight: self.weight,
            pet_type: normalize_optional(self.pet_type),
            birth_date: self.birth_date,
            neutered: self.neutered,
            gender: normalize_optional(self.gender),
        })
    }
}

/// Validated attributes of a pet about to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPet {
    pub name: String,
    pub breed: Option<String>,
    pub weight: Option<f64>,
    pub pet_type: Option<String>,
    pub birth_date: NaiveDate,
    pub neutered: bool,
    pub gender: Option<String>,
}

/// Validated scalar changes of a pet update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetChanges {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub weight: Option<f64>,
    pub pet_type: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub neutered: Option<bool>,
    pub gender: Option<String>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetResponse {
    #[schema(example = 7)]
    pub pet_id: i32,
    #[schema(example = "http://127.0.0.1:3000/uploads/3f1c...e2.jpg")]
    pub image_url: String,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageResponse {
    #[schema(example = "http://127.0.0.1:3000/uploads/3f1c...e2.jpg")]
    pub image_url: String,
}

/// Pet as shown in the caller's list.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PetSummary {
    pub id: i32,
    pub name: String,
    pub breed: Option<String>,
    pub weight: Option<f64>,
    #[serde(rename = "type")]
    pub pet_type: Option<String>,
    pub gender: Option<String>,
    pub neutered: bool,
    #[schema(value_type = String, format = Date)]
    pub birth_date: NaiveDate,
    pub image: String,
}

impl From<pet::Model> for PetSummary {
    fn from(m: pet::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            breed: m.breed,
            weight: m.weight,
            pet_type: m.pet_type,
            gender: m.gender,
            neutered: m.neutered,
            birth_date: m.birth_date,
            image: m.image,
        }
    }
}

/// Full pet detail.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PetResponse {
    pub id: i32,
    pub name: String,
    pub breed: Option<String>,
    pub weight: Option<f64>,
    #[serde(rename = "type")]
    pub pet_type: Option<String>,
    pub gender: Option<String>,
    pub neutered: bool,
    #[schema(value_type = String, format = Date)]
    pub birth_date: NaiveDate,
    pub image: String,
    pub updated_at: DateTime<Utc>,
}

impl From<pet::Model> for PetResponse {
    fn from(m: pet::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            breed: m.breed,
            weight: m.weight,
            pet_type: m.pet_type,
            gender: m.gender,
            neutered: m.neutered,
            birth_date: m.birth_date,
            image: m.image,
            updated_at: m.updated_at,
        }
    }
}
