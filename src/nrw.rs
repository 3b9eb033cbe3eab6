//! Column layout of the water-network (NRW) dataset.

use crate::error::{LoadError, LoadResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

pub const USER_ID: &str = "User_ID";
pub const AREA_CODE: &str = "Area_Code";
pub const DEVICE_ID: &str = "Device_ID";
pub const WEATHER_CONDITION: &str = "Weather_Condition";
pub const YEAR: &str = "Year";
pub const MONTH: &str = "Month";
pub const HOURLY_WATER_CONSUMPTION: &str = "Hourly_Water_Consumption";
pub const AREA_TANK_LEVEL: &str = "Area_Tank_Level";
pub const MAIN_TANK_LEVEL: &str = "Main_Tank_Level";
pub const MAIN_TANK_PRESSURE: &str = "Main_Tank_Pressure";
pub const AREA_PRESSURE: &str = "Area_Pressure";
pub const USER_PRESSURE: &str = "User_Pressure";

/// Columns offered as multi-select filters, in sidebar order.
pub const FILTER_COLUMNS: [&str; 4] = [USER_ID, AREA_CODE, DEVICE_ID, WEATHER_CONDITION];

/// Pressure readings. Older exports of the dataset do not carry them.
pub const PRESSURE_COLUMNS: [&str; 3] = [MAIN_TANK_PRESSURE, AREA_PRESSURE, USER_PRESSURE];

/// Schema of the dataset: nine required columns plus the optional pressure columns.
///
/// Identifier columns are loaded as text so that numeric ids and codes such as `A1` compare
/// the same way regardless of how the spreadsheet stored them.
pub fn nrw_schema() -> Schema {
    let mut fields = vec![
        Field::new(USER_ID, DataType::Utf8),
        Field::new(AREA_CODE, DataType::Utf8),
        Field::new(DEVICE_ID, DataType::Utf8),
        Field::new(WEATHER_CONDITION, DataType::Utf8),
        Field::new(YEAR, DataType::Int64),
        Field::new(MONTH, DataType::Int64),
        Field::new(HOURLY_WATER_CONSUMPTION, DataType::Float64),
        Field::new(AREA_TANK_LEVEL, DataType::Float64),
        Field::new(MAIN_TANK_LEVEL, DataType::Float64),
    ];
    fields.extend(
        PRESSURE_COLUMNS
            .iter()
            .map(|name| Field::optional(*name, DataType::Float64)),
    );
    Schema::new(fields)
}

/// Check loaded records for values the schema types alone cannot rule out.
///
/// Currently: a non-null `Month` must lie in 1..=12. Rows are reported 1-based.
pub fn validate_records(dataset: &DataSet) -> LoadResult<()> {
    let Some(month_idx) = dataset.schema.index_of(MONTH) else {
        return Ok(());
    };

    for (i, row) in dataset.rows.iter().enumerate() {
        match row.get(month_idx) {
            Some(Value::Int64(m)) if !(1..=12).contains(m) => {
                return Err(LoadError::ParseError {
                    row: i + 1,
                    column: MONTH.to_string(),
                    raw: m.to_string(),
                    message: "month must be between 1 and 12".to_string(),
                });
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{MONTH, YEAR, nrw_schema, validate_records};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    #[test]
    fn schema_marks_only_pressure_columns_optional() {
        let schema = nrw_schema();
        assert_eq!(schema.fields.len(), 12);
        let optional: Vec<_> = schema
            .fields
            .iter()
            .filter(|f| !f.required)
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(optional, vec!["Main_Tank_Pressure", "Area_Pressure", "User_Pressure"]);
    }

    #[test]
    fn month_out_of_range_is_rejected() {
        let ds = DataSet::new(
            Schema::new(vec![
                Field::new(YEAR, DataType::Int64),
                Field::new(MONTH, DataType::Int64),
            ]),
            vec![
                vec![Value::Int64(2023), Value::Int64(12)],
                vec![Value::Int64(2023), Value::Null],
                vec![Value::Int64(2023), Value::Int64(13)],
            ],
        );
        let err = validate_records(&ds).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("row 3"));
        assert!(msg.contains("month must be between 1 and 12"));
    }
}
