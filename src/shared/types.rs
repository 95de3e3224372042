use serde::{Deserialize, Serialize};

use crate::core::features::unit_converter::{format_magnitude, ConversionResult, UnitCategory};
use crate::shared::error::{AppError, AppResult};

/// A validated conversion request: finite value, non-empty unit names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub value: f64,
    pub from_unit: String,
    pub to_unit: String,
}

impl ConversionRequest {
    pub fn new(value: f64, from_unit: &str, to_unit: &str) -> AppResult<Self> {
        if !value.is_finite() {
            return Err(AppError::Validation(format!(
                "Value must be a finite number, got {}",
                value
            )));
        }
        let from_unit = from_unit.trim();
        let to_unit = to_unit.trim();
        if from_unit.is_empty() || to_unit.is_empty() {
            return Err(AppError::Validation("Unit names must not be empty".to_string()));
        }

        Ok(Self {
            value,
            from_unit: from_unit.to_string(),
            to_unit: to_unit.to_string(),
        })
    }

    /// Same value with source and target exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            value: self.value,
            from_unit: self.to_unit.clone(),
            to_unit: self.from_unit.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvertUnitsResponse {
    pub value: f64,
    pub from_unit: String,
    pub to_unit: String,
    pub result: f64,
    pub formatted_result: String,
}

impl ConvertUnitsResponse {
    pub fn new(request: &ConversionRequest, result: &ConversionResult, decimals: usize) -> Self {
        Self {
            value: request.value,
            from_unit: request.from_unit.clone(),
            to_unit: result.unit.clone(),
            result: result.magnitude,
            formatted_result: format_magnitude(result.magnitude, decimals),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitCategoryDTO {
    pub name: String,
    pub units: Vec<String>,
}

impl From<&UnitCategory> for UnitCategoryDTO {
    fn from(category: &UnitCategory) -> Self {
        Self {
            name: category.name.to_string(),
            units: category.units.iter().map(|u| u.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GetUnitsResponse {
    pub categories: Vec<UnitCategoryDTO>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub query: String,
    pub answer: String,
    pub model: String,
    pub latency_ms: u128,
}
