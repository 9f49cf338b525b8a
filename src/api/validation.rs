//! Input validation for API requests.
//!
//! For collecting multiple validation errors and returning them as an
//! ApiError, use the `ValidationErrorBuilder` from the `error` module.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating room numbers (alphanumeric with dashes)
    static ref ROOM_NUMBER_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9][A-Za-z0-9-]*$"
    ).unwrap();

    /// Regex for validating email addresses
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[^@\s]+@[^@\s]+\.[^@\s]+$"
    ).unwrap();

    /// Regex for validating phone numbers (digits, spaces, dashes, optional +)
    static ref PHONE_REGEX: Regex = Regex::new(
        r"^\+?[0-9][0-9 -]{5,19}$"
    ).unwrap();
}

/// Validate a room number
pub fn validate_room_number(room_number: &str) -> Result<(), String> {
    if room_number.is_empty() {
        return Err("Room number is required".to_string());
    }

    if room_number.len() > 20 {
        return Err("Room number is too long (max 20 characters)".to_string());
    }

    if !ROOM_NUMBER_REGEX.is_match(room_number) {
        return Err(
            "Room number must be alphanumeric with dashes, starting with alphanumeric".to_string(),
        );
    }

    Ok(())
}

/// Validate a room capacity (optional field)
pub fn validate_capacity(capacity: &Option<i64>) -> Result<(), String> {
    if let Some(c) = capacity {
        if *c < 1 {
            return Err("Capacity must be at least 1".to_string());
        }
    }

    Ok(())
}

/// Validate a room price (optional field)
pub fn validate_price(price: &Option<f64>) -> Result<(), String> {
    if let Some(p) = price {
        if !p.is_finite() || *p < 0.0 {
            return Err("Price must be zero or greater".to_string());
        }
    }

    Ok(())
}

/// Validate a floor label (optional field)
pub fn validate_floor(floor: &Option<String>) -> Result<(), String> {
    if let Some(f) = floor {
        if f.len() > 50 {
            return Err("Floor is too long (max 50 characters)".to_string());
        }
    }

    Ok(())
}

/// Validate a room description (optional field)
pub fn validate_description(description: &Option<String>) -> Result<(), String> {
    if let Some(d) = description {
        if d.len() > 500 {
            return Err("Description is too long (max 500 characters)".to_string());
        }
    }

    Ok(())
}

/// Validate a user name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name is required".to_string());
    }

    if name.len() > 100 {
        return Err("Name is too long (max 100 characters)".to_string());
    }

    Ok(())
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email address".to_string());
    }

    Ok(())
}

/// Validate a phone number
pub fn validate_phone_number(phone_number: &str) -> Result<(), String> {
    if phone_number.is_empty() {
        return Err("Phone number is required".to_string());
    }

    if !PHONE_REGEX.is_match(phone_number) {
        return Err("Invalid phone number format".to_string());
    }

    Ok(())
}

/// Validate a password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }

    if password.len() > 128 {
        return Err("Password is too long (max 128 characters)".to_string());
    }

    Ok(())
}

/// Validate a UUID string
pub fn validate_uuid(id: &str, field_name: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err(format!("{} is required", field_name));
    }

    if uuid::Uuid::parse_str(id).is_err() {
        return Err(format!("Invalid {} format", field_name));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_room_number() {
        assert!(validate_room_number("101").is_ok());
        assert!(validate_room_number("A-12").is_ok());
        assert!(validate_room_number("2B").is_ok());

        assert!(validate_room_number("").is_err());
        assert!(validate_room_number("-101").is_err());
        assert!(validate_room_number("room 101").is_err());
        assert!(validate_room_number(&"9".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_capacity() {
        assert!(validate_capacity(&Some(1)).is_ok());
        assert!(validate_capacity(&Some(12)).is_ok());
        assert!(validate_capacity(&None).is_ok());

        assert!(validate_capacity(&Some(0)).is_err());
        assert!(validate_capacity(&Some(-3)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(&Some(0.0)).is_ok());
        assert!(validate_price(&Some(499.99)).is_ok());
        assert!(validate_price(&None).is_ok());

        assert!(validate_price(&Some(-1.0)).is_err());
        assert!(validate_price(&Some(f64::NAN)).is_err());
        assert!(validate_price(&Some(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_validate_floor_and_description() {
        assert!(validate_floor(&Some("3rd".to_string())).is_ok());
        assert!(validate_floor(&None).is_ok());
        assert!(validate_floor(&Some("f".repeat(51))).is_err());

        assert!(validate_description(&Some("Corner room".to_string())).is_ok());
        assert!(validate_description(&None).is_ok());
        assert!(validate_description(&Some("d".repeat(501))).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("tenant@example.com").is_ok());
        assert!(validate_email("a.b+c@mail.example.org").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
        assert!(validate_email("two@@example.com").is_err());
    }

    #[test]
    fn test_validate_phone_number() {
        assert!(validate_phone_number("0241234567").is_ok());
        assert!(validate_phone_number("+233 24 123 4567").is_ok());
        assert!(validate_phone_number("024-123-4567").is_ok());

        assert!(validate_phone_number("").is_err());
        assert!(validate_phone_number("12345").is_err());
        assert!(validate_phone_number("phone").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("longenough").is_ok());

        assert!(validate_password("").is_err());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"p".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000", "room_id").is_ok());
        assert!(validate_uuid("", "room_id").is_err());
        assert!(validate_uuid("not-a-uuid", "room_id").is_err());
    }
}
