//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::{NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

lazy_static! {
    /// Formato de número de autobús: letras mayúsculas, dígitos y guiones
    pub static ref BUS_NUMBER_RE: Regex = Regex::new(r"^[A-Z0-9][A-Z0-9-]{1,19}$").unwrap();
}

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar y convertir string a tiempo
pub fn validate_time(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S").map_err(|_| {
        let mut error = ValidationError::new("time");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"HH:MM:SS".to_string());
        error
    })
}

/// Validar formato de fecha (para derive de validator)
pub fn validate_date_str(value: &str) -> Result<(), ValidationError> {
    validate_date(value).map(|_| ())
}

/// Validar formato de hora (para derive de validator)
pub fn validate_time_str(value: &str) -> Result<(), ValidationError> {
    validate_time(value).map(|_| ())
}

/// Validar que una tarifa sea positiva (para derive de validator)
pub fn validate_fare(value: &Decimal) -> Result<(), ValidationError> {
    validate_positive(*value)
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor esté en una lista de valores permitidos
pub fn validate_enum<T: PartialEq + std::fmt::Display + std::fmt::Debug + serde::Serialize>(
    value: T,
    allowed_values: &[T],
) -> Result<(), ValidationError> {
    if !allowed_values.contains(&value) {
        let mut error = ValidationError::new("enum");
        error.add_param("value".into(), &value);
        error.add_param("allowed_values".into(), &format!("{:?}", allowed_values));
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar género de pasajero
pub fn validate_gender(value: &str) -> Result<(), ValidationError> {
    let normalized = value.trim().to_lowercase();
    if !["male", "female", "other"].contains(&normalized.as_str()) {
        let mut error = ValidationError::new("gender");
        error.add_param("value".into(), &value.to_string());
        error.add_param("allowed_values".into(), &"male, female, other".to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        let valid_date = "2025-12-01";
        assert_eq!(
            validate_date(valid_date).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
        );

        let invalid_date = "2025/12/01";
        assert!(validate_date(invalid_date).is_err());
        assert!(validate_date("2025-13-01").is_err());
    }

    #[test]
    fn test_validate_time() {
        assert!(validate_time("08:30:00").is_ok());
        assert!(validate_time("8h30").is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Pune").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_enum() {
        let allowed = vec!["ac", "non-ac", "sleeper", "seater"];
        assert!(validate_enum("ac", &allowed).is_ok());
        assert!(validate_enum("deluxe", &allowed).is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(5).is_ok());
        assert!(validate_positive(0).is_err());
        assert!(validate_positive(-5).is_err());
    }

    #[test]
    fn test_validate_fare() {
        assert!(validate_fare(&Decimal::new(4500, 2)).is_ok());
        assert!(validate_fare(&Decimal::ZERO).is_err());
        assert!(validate_fare(&Decimal::new(-100, 2)).is_err());
    }

    #[test]
    fn test_validate_gender() {
        assert!(validate_gender("male").is_ok());
        assert!(validate_gender("Female").is_ok());
        assert!(validate_gender("OTHER").is_ok());
        assert!(validate_gender("unknown").is_err());
    }

    #[test]
    fn test_bus_number_regex() {
        assert!(BUS_NUMBER_RE.is_match("MH-12-4545"));
        assert!(BUS_NUMBER_RE.is_match("BUS01"));
        assert!(!BUS_NUMBER_RE.is_match("bus 01"));
        assert!(!BUS_NUMBER_RE.is_match("-"));
    }
}
