use validator::ValidationError;

pub const MIN_PHONE_DIGITS: usize = 10;

/// Five-digit US zip, optionally followed by `-` and four more digits
pub fn validate_zip_code(zip: &str) -> Result<(), ValidationError> {
    let zip = zip.trim();
    let (base, extension) = match zip.split_once('-') {
        Some((base, ext)) => (base, Some(ext)),
        None => (zip, None),
    };

    let all_digits = |s: &str, len: usize| s.len() == len && s.chars().all(|c| c.is_ascii_digit());
    let valid = all_digits(base, 5) && extension.is_none_or(|ext| all_digits(ext, 4));

    if !valid {
        let mut err = ValidationError::new("zip_code");
        err.message = Some("Enter a valid 5-digit zip (e.g., 32801).".into());
        return Err(err);
    }
    Ok(())
}

/// Any formatting is accepted as long as enough digits are present
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < MIN_PHONE_DIGITS {
        let mut err = ValidationError::new("phone_digits");
        err.message = Some("Phone number must include 10 digits.".into());
        return Err(err);
    }
    Ok(())
}

/// `local@domain.tld` with no whitespace and exactly one `@`
pub fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            let no_space_or_at = |s: &str| !s.chars().any(|c| c.is_whitespace() || c == '@');
            let domain_ok = domain
                .rsplit_once('.')
                .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty());
            !local.is_empty() && no_space_or_at(local) && no_space_or_at(domain) && domain_ok
        }
        None => false,
    };

    if !valid {
        let mut err = ValidationError::new("email");
        err.message = Some("Enter a valid email address.".into());
        return Err(err);
    }
    Ok(())
}
