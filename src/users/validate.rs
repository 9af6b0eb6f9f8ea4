//! Field-level rules shared by registration and profile updates.

use lazy_static::lazy_static;
use regex::Regex;

pub const FOOD_INTEREST_OPTIONS: &[&str] = &[
    "italian",
    "asian",
    "mexican",
    "american",
    "mediterranean",
    "desserts",
];

pub const DIETARY_RESTRICTION_OPTIONS: &[&str] = &[
    "",
    "vegetarian",
    "vegan",
    "gluten-free",
    "dairy-free",
    "keto",
    "paleo",
];

pub const MAX_FOOD_INTERESTS: usize = 6;

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]{3,20}$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

/// Itemized messages for the registration payload. Empty means valid.
pub fn registration_errors(
    first_name: &str,
    last_name: &str,
    email: &str,
    username: &str,
    password: &str,
    location: &str,
    food_interests: &[String],
    dietary_restrictions: &str,
) -> Vec<String> {
    // Length caps count characters, not bytes, so multi-byte names are
    // measured the way users see them.
    let mut errors = Vec::new();
    if first_name.chars().count() > 50 {
        errors.push("First name cannot exceed 50 characters".into());
    }
    if last_name.chars().count() > 50 {
        errors.push("Last name cannot exceed 50 characters".into());
    }
    if !is_valid_email(email) {
        errors.push("Please enter a valid email".into());
    }
    let username_chars = username.chars().count();
    if username_chars < 3 {
        errors.push("Username must be at least 3 characters".into());
    } else if username_chars > 20 {
        errors.push("Username cannot exceed 20 characters".into());
    } else if !is_valid_username(username) {
        errors.push("Username can only contain letters, numbers, and underscores".into());
    }
    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters".into());
    }
    if location.chars().count() > 100 {
        errors.push("Location cannot exceed 100 characters".into());
    }
    errors.extend(food_interest_errors(food_interests));
    errors.extend(dietary_restriction_errors(dietary_restrictions));
    errors
}

pub fn food_interest_errors(interests: &[String]) -> Vec<String> {
    let mut errors = Vec::new();
    if interests.len() > MAX_FOOD_INTERESTS {
        errors.push("Cannot select more than 6 food interests".into());
    }
    for interest in interests {
        if !FOOD_INTEREST_OPTIONS.contains(&interest.as_str()) {
            errors.push(format!("'{}' is not a valid food interest", interest));
        }
    }
    errors
}

pub fn dietary_restriction_errors(value: &str) -> Vec<String> {
    if DIETARY_RESTRICTION_OPTIONS.contains(&value) {
        Vec::new()
    } else {
        vec![format!("'{}' is not a valid dietary restriction", value)]
    }
}

pub fn bio_errors(bio: &str) -> Vec<String> {
    if bio.chars().count() > 500 {
        vec!["Bio cannot exceed 500 characters".into()]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors_for(first: &str, user: &str, email: &str) -> Vec<String> {
        registration_errors(first, "Rao", email, user, "longenough", "", &[], "")
    }

    #[test]
    fn accepts_a_normal_registration() {
        assert!(errors_for("Asha", "asha_r", "asha@example.com").is_empty());
    }

    #[test]
    fn rejects_bad_email() {
        let errors = errors_for("Asha", "asha_r", "not-an-email");
        assert_eq!(errors, vec!["Please enter a valid email".to_string()]);
    }

    #[test]
    fn username_rules() {
        assert!(is_valid_username("abc"));
        assert!(is_valid_username("with_underscore_99"));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("has-dash"));
        assert!(!is_valid_username("waaaaaaaaaaaaaaaaytoolong"));
        assert!(!is_valid_username("has space"));
    }

    #[test]
    fn length_caps_count_characters_not_bytes() {
        // "é" is two bytes; forty of them fit the 50-character cap even
        // though the byte length is 80.
        assert!(errors_for(&"é".repeat(40), "asha_r", "asha@example.com").is_empty());
        let errors = errors_for(&"é".repeat(51), "asha_r", "asha@example.com");
        assert_eq!(errors, vec!["First name cannot exceed 50 characters".to_string()]);
        assert!(bio_errors(&"é".repeat(500)).is_empty());
        assert_eq!(bio_errors(&"é".repeat(501)).len(), 1);
    }

    #[test]
    fn caps_food_interests_at_six() {
        let seven: Vec<String> = std::iter::repeat("italian".to_string()).take(7).collect();
        let errors = food_interest_errors(&seven);
        assert_eq!(errors[0], "Cannot select more than 6 food interests");
    }

    #[test]
    fn rejects_unknown_interest_and_restriction() {
        assert!(!food_interest_errors(&["sushi-only".to_string()]).is_empty());
        assert!(dietary_restriction_errors("carnivore").len() == 1);
        assert!(dietary_restriction_errors("").is_empty());
        assert!(dietary_restriction_errors("gluten-free").is_empty());
    }

    #[test]
    fn short_password_is_flagged() {
        let errors = registration_errors(
            "Asha",
            "Rao",
            "asha@example.com",
            "asha_r",
            "short",
            "",
            &[],
            "",
        );
        assert_eq!(errors, vec!["Password must be at least 8 characters".to_string()]);
    }
}
