pub mod ip;
pub mod url_validator;

pub use url_validator::{is_valid_url, validate_url, validation_error_message};

/// Characters allowed in short codes, generated or user supplied.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub const MIN_CODE_LENGTH: usize = 4;
pub const MAX_CODE_LENGTH: usize = 10;
pub const DEFAULT_CODE_LENGTH: usize = 6;

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    // 随机选择字母和数字
    iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// 短码格式：4-10 位 ASCII 字母或数字
#[inline]
pub fn is_valid_short_code(code: &str) -> bool {
    (MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&code.len())
        && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
