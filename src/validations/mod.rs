mod lead;

pub use lead::{validate_email_address, validate_phone, validate_zip_code};
