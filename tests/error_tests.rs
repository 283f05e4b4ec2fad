//! Error handling tests

use std::path::Path;
use storage_calc::config::Config;
use storage_calc::core::{saline, SalineInputs};
use storage_calc::table::{load_parameters, open_table, read_csv_from};
use storage_calc::CalcError;

#[test]
fn test_missing_field_message() {
    let err = CalcError::MissingField("Porosity".to_string());
    assert_eq!(
        err.to_string(),
        "Required field 'Porosity' not found in the data"
    );
}

#[test]
fn test_non_numeric_message() {
    let err = CalcError::NonNumeric {
        field: "Porosity".to_string(),
        value: "N/A".to_string(),
    };
    assert_eq!(err.to_string(), "Value for 'Porosity' is not numeric: N/A");
}

#[test]
fn test_sheet_not_found_is_schema_error() {
    assert!(CalcError::SheetNotFound("Saline Storage".to_string()).is_schema_error());
    assert!(CalcError::Schema("bad column".to_string()).is_schema_error());
    assert!(!CalcError::MissingField("Bg".to_string()).is_schema_error());
    assert!(!CalcError::NoSolution("irr".to_string()).is_schema_error());
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: CalcError = io.into();
    assert!(matches!(err, CalcError::Io(_)));
    assert!(err.to_string().starts_with("IO error"));
}

#[test]
fn test_yaml_error_conversion() {
    let err = Config::from_yaml("saline: [unclosed").unwrap_err();
    assert!(matches!(err, CalcError::Yaml(_)));
}

#[test]
fn test_unsupported_extension() {
    let err = open_table(Path::new("inputs.json"), "Saline Storage", &Config::default().csv)
        .unwrap_err();
    assert!(err.is_schema_error());
}

#[test]
fn test_missing_reported_before_non_numeric() {
    // Porosity is non-numeric AND Permeability is missing: the missing label wins
    let data = "\
title
,,Parameter,,,Value
,,Injection Rate,,,1
,,Reservoir Thickness,,,50
,,Injection Time,,,20
,,Porosity,,,N/A
,,Reservoir Depth,,,1000
,,Pressure Gradient,,,0.433
,,Reservoir Angle,,,30
,,CO2 Relative Permeability,,,0.6
,,CO2 Density,,,700
,,Water Density,,,1050
";
    let config = Config::default();
    let table = read_csv_from(data.as_bytes(), "saline", &config.csv).unwrap();

    let err = SalineInputs::load(&table, &config.saline, &config.saline.methods).unwrap_err();
    match err {
        CalcError::MissingField(field) => assert_eq!(field, "Permeability"),
        other => panic!("Expected MissingField, got {:?}", other),
    }
}

#[test]
fn test_viscosity_only_required_for_pressure_diffusion() {
    let data = "\
title
,,Parameter,,,Value
,,Injection Rate,,,1
,,Reservoir Thickness,,,50
,,Injection Time,,,20
,,Porosity,,,0.2
,,Reservoir Depth,,,1000
,,Pressure Gradient,,,0.433
,,Reservoir Angle,,,30
,,Permeability,,,100
,,CO2 Relative Permeability,,,0.6
,,CO2 Density,,,700
,,Water Density,,,1050
";
    let config = Config::default();
    let table = read_csv_from(data.as_bytes(), "saline", &config.csv).unwrap();

    let inputs = SalineInputs::load(&table, &config.saline, &config.saline.methods).unwrap();
    assert_eq!(inputs.co2_viscosity, None);
    assert!(saline::evaluate(&inputs, &config.saline.methods, &config.saline.factors).is_ok());

    let err = SalineInputs::load(
        &table,
        &config.saline,
        &[saline::RadiusMethod::PressureDiffusion],
    )
    .unwrap_err();
    assert!(matches!(err, CalcError::MissingField(ref f) if f == "CO2 Viscosity"));
}

#[test]
fn test_label_match_is_exact() {
    let data = "\
title
,,Parameter,,Value
,,bg,,0.005
,,Bg ,,0.006
";
    let config = Config::default();
    let table = read_csv_from(data.as_bytes(), "depleted", &config.csv).unwrap();

    let err = load_parameters(&table, &config.depleted.layout, &["Bg"]).unwrap_err();
    assert!(matches!(err, CalcError::MissingField(_)));
}
