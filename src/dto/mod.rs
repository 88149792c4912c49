pub mod admin_dto;
pub mod auth_dto;
pub mod course_dto;
pub mod lesson_dto;
pub mod quiz_dto;

use serde::Deserialize;

// Custom deserializer to trim strings and convert empty strings to None
pub(crate) fn trim_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
