use fixture_cases::{find_case, CANONICAL_CASES};
use schemars::JsonSchema;
use serde::Serialize;

/// JSON output for show
#[derive(Serialize, JsonSchema)]
pub(crate) struct ShowJsonOutput {
    id: String,
    file_name: String,
    rows: usize,
    fields: Vec<ShowField>,
    /// Rendered values, one inner vector per row in field order
    data: Vec<Vec<String>>,
}

#[derive(Serialize, JsonSchema)]
pub(crate) struct ShowField {
    name: String,
    #[serde(rename = "type")]
    logical_type: String,
    nullable: bool,
}

pub fn run(id: &str, json: bool) -> anyhow::Result<()> {
    let descriptor = find_case(id).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown case: {}. Valid options: {}",
            id,
            CANONICAL_CASES
                .iter()
                .map(|c| c.id)
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;
    let case = descriptor.build();
    case.validate()?;

    let fields: Vec<ShowField> = case
        .schema
        .fields
        .iter()
        .map(|f| ShowField {
            name: f.name.clone(),
            logical_type: f.logical_type.to_string(),
            nullable: f.nullable,
        })
        .collect();

    let data: Vec<Vec<String>> = (0..case.num_rows())
        .map(|row| {
            case.schema
                .fields
                .iter()
                .zip(&case.columns)
                .map(|(field, column)| column.values[row].render(&field.logical_type))
                .collect()
        })
        .collect();

    if json {
        let output = ShowJsonOutput {
            id: case.id.clone(),
            file_name: case.file_name.clone(),
            rows: case.num_rows(),
            fields,
            data,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{} ({}, {} rows)", case.id, case.file_name, case.num_rows());
    println!();
    println!("Schema:");
    for field in &fields {
        println!(
            "  {}: {}{}",
            field.name,
            field.logical_type,
            if field.nullable { "" } else { " not null" }
        );
    }
    println!();
    println!("Rows:");
    for (row, values) in data.iter().enumerate() {
        println!("  [{}]", row);
        for (field, value) in fields.iter().zip(values) {
            println!("    {} = {}", field.name, value);
        }
    }
    Ok(())
}
