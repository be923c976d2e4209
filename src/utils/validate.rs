use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{9,15}$").expect("Invalid phone regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：5 <= x <= 16
    if username.len() < 5 || username.len() > 16 {
        return Err("Username length must be between 5 and 16 characters");
    }
    // 用户名格式校验：只能包含字母、数字、下划线或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    // 电话号码：可选 + 前缀，9 到 15 位数字
    if !PHONE_RE.is_match(phone) {
        return Err("Phone number must contain 9 to 15 digits");
    }
    Ok(())
}

const MIN_PASSWORD_CHARS: usize = 8;

// 比较相似度时忽略过短的个人信息片段
const MIN_ATTRIBUTE_CHARS: usize = 3;

const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "12345678",
    "123456789",
    "1234567890",
    "qwerty123",
    "qwertyuiop",
    "iloveyou",
    "admin123",
    "abcd1234",
    "11111111",
    "00000000",
];

/// 密码不满足的规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordViolation {
    TooShort,
    EntirelyNumeric,
    TooCommon,
    SimilarToPersonalInfo,
}

impl PasswordViolation {
    pub fn message(&self) -> &'static str {
        match self {
            Self::TooShort => "Password must be at least 8 characters long",
            Self::EntirelyNumeric => "Password cannot be entirely numeric",
            Self::TooCommon => "Password is too common",
            Self::SimilarToPersonalInfo => "Password is too similar to the username or email",
        }
    }
}

/// 列出密码违反的全部规则
///
/// `personal` 为用户名、邮箱等个人信息；邮箱只取 @ 前的部分比较。
pub fn password_violations(password: &str, personal: &[&str]) -> Vec<PasswordViolation> {
    let mut violations = Vec::new();
    let lowered = password.to_lowercase();

    if password.chars().count() < MIN_PASSWORD_CHARS {
        violations.push(PasswordViolation::TooShort);
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        violations.push(PasswordViolation::EntirelyNumeric);
    }
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        violations.push(PasswordViolation::TooCommon);
    }

    let similar = personal
        .iter()
        .map(|attr| attr.split('@').next().unwrap_or_default().to_lowercase())
        .filter(|attr| attr.chars().count() >= MIN_ATTRIBUTE_CHARS)
        .any(|attr| lowered.contains(&attr) || attr.contains(&lowered));
    if similar {
        violations.push(PasswordViolation::SimilarToPersonalInfo);
    }

    violations
}

/// 密码策略校验，违反时返回合并后的提示
pub fn validate_password(password: &str, personal: &[&str]) -> Result<(), String> {
    let violations = password_violations(password, personal);
    if violations.is_empty() {
        return Ok(());
    }
    Err(violations
        .iter()
        .map(PasswordViolation::message)
        .collect::<Vec<_>>()
        .join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acceptable_passwords() {
        assert!(validate_password("correct horse", &["student_01"]).is_ok());
        assert!(validate_password("Lop-hoc-2024", &["minh", "minh@example.com"]).is_ok());
    }

    #[test]
    fn test_short_and_numeric() {
        assert_eq!(
            password_violations("1234567", &[]),
            vec![PasswordViolation::TooShort, PasswordViolation::EntirelyNumeric]
        );
    }

    #[test]
    fn test_common_password_is_case_insensitive() {
        assert_eq!(
            password_violations("PassWord1", &[]),
            vec![PasswordViolation::TooCommon]
        );
    }

    #[test]
    fn test_similar_to_personal_info() {
        assert_eq!(
            password_violations("teacher_anh!", &["teacher_anh"]),
            vec![PasswordViolation::SimilarToPersonalInfo]
        );
        // 邮箱只比较本地部分
        assert_eq!(
            password_violations("xx-linh.tran-xx", &["linh.tran@school.edu"]),
            vec![PasswordViolation::SimilarToPersonalInfo]
        );
        // 过短的片段不参与比较
        assert!(password_violations("abroad-travels", &["ab"]).is_empty());
    }

    #[test]
    fn test_error_message_joins_all_violations() {
        let msg = validate_password("12345678", &[]).unwrap_err();
        assert!(msg.contains("entirely numeric"));
        assert!(msg.contains("too common"));
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("student_01").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("a_very_long_username_x").is_err());
    }

    #[test]
    fn test_email_and_phone() {
        assert!(validate_email("learner@example.com").is_ok());
        assert!(validate_email("learner@example").is_err());
        assert!(validate_phone("0912345678").is_ok());
        assert!(validate_phone("+84912345678").is_ok());
        assert!(validate_phone("09-1234").is_err());
    }
}
