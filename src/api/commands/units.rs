use crate::core::features::unit_converter::registry;
use crate::core::features::unit_converter::{category_for_unit, find_category, unit_categories};
use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{GetUnitsResponse, UnitCategoryDTO};

/// All categories, or the one named `category` (case-insensitive).
///
/// A unit name is accepted too and selects the category it belongs to.
pub fn get_units(category: Option<&str>) -> AppResult<GetUnitsResponse> {
    let categories = match category {
        Some(name) => {
            let found = find_category(name).or_else(|| category_for_unit(name)).ok_or_else(|| {
                let known: Vec<&str> = unit_categories().iter().map(|c| c.name).collect();
                AppError::Validation(format!(
                    "Unknown category '{}' (expected one of: {})",
                    name.trim(),
                    known.join(", ")
                ))
            })?;
            vec![UnitCategoryDTO::from(found)]
        }
        None => unit_categories().iter().map(UnitCategoryDTO::from).collect(),
    };

    Ok(GetUnitsResponse { categories })
}

/// Every simple unit in the registry as one pseudo-category.
pub fn all_units() -> GetUnitsResponse {
    let units = registry::definitions()
        .iter()
        .map(|definition| definition.name.to_string())
        .collect();
    GetUnitsResponse {
        categories: vec![UnitCategoryDTO {
            name: "All units".to_string(),
            units,
        }],
    }
}

/// One `Category: unit, unit, ...` line per category.
pub fn render(response: &GetUnitsResponse) -> Vec<String> {
    response
        .categories
        .iter()
        .map(|c| format!("{}: {}", c.name, c.units.join(", ")))
        .collect()
}

pub fn run(category: Option<&str>, all: bool, json: bool) -> AppResult<()> {
    let response = if all { all_units() } else { get_units(category)? };
    if json {
        return super::print_json(&response);
    }
    for line in render(&response) {
        println!("{}", line);
    }
    Ok(())
}
