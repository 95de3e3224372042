use tracing::info;

use crate::core::features::unit_converter::{self, format_value, parse_conversion_query};
use crate::shared::error::AppResult;
use crate::shared::types::{ConversionRequest, ConvertUnitsResponse};

/// Parse `5 feet to meters` style text into a validated request.
pub fn request_from_text(text: &str) -> AppResult<ConversionRequest> {
    let query = parse_conversion_query(text)?;
    ConversionRequest::new(query.value, &query.from_unit, &query.to_unit)
}

/// Validate and convert.
pub fn convert_units(request: &ConversionRequest, decimals: usize) -> AppResult<ConvertUnitsResponse> {
    let result = unit_converter::convert(request.value, &request.from_unit, &request.to_unit)?;
    info!(
        value = request.value,
        from = %request.from_unit,
        to = %request.to_unit,
        result = result.magnitude,
        "conversion"
    );
    Ok(ConvertUnitsResponse::new(request, &result, decimals))
}

/// `✅ 5 foot = 1.5240 meter`
pub fn success_line(response: &ConvertUnitsResponse) -> String {
    format!(
        "✅ {} {} = {} {}",
        format_value(response.value),
        response.from_unit,
        response.formatted_result,
        response.to_unit
    )
}

pub fn run(value: f64, from: &str, to: &str, decimals: usize, json: bool) -> AppResult<()> {
    let request = ConversionRequest::new(value, from, to)?;
    let response = convert_units(&request, decimals)?;

    if json {
        super::print_json(&response)
    } else {
        println!("{}", success_line(&response));
        Ok(())
    }
}
