//! 发请求前的本地校验，失败时不会产生任何网络调用。

use validator::{Validate, ValidationErrors};

use super::models::{Credentials, RegisterRequest};
use crate::utils::{GatewayError, GatewayResult};

const CREDENTIAL_FIELDS: &[&str] = &["username", "password"];
const REGISTER_FIELDS: &[&str] = &[
    "username",
    "password",
    "full_name",
    "email",
    "phone",
    "role",
    "institution",
];

pub const PDF_REQUIRED: &str = "Please upload a PDF file";

/// 按表单字段顺序取第一条错误
fn first_error(errors: &ValidationErrors, order: &[&str]) -> GatewayError {
    let field_errors = errors.field_errors();
    let message = order
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string());
    GatewayError::Validation(message)
}

pub fn validate_credentials(credentials: &Credentials) -> GatewayResult<()> {
    credentials
        .validate()
        .map_err(|e| first_error(&e, CREDENTIAL_FIELDS))
}

pub fn validate_registration(request: &RegisterRequest) -> GatewayResult<()> {
    request
        .validate()
        .map_err(|e| first_error(&e, REGISTER_FIELDS))
}

pub fn validate_pdf_name(file_name: &str) -> GatewayResult<()> {
    if file_name.ends_with(".pdf") {
        Ok(())
    } else {
        Err(GatewayError::Validation(PDF_REQUIRED.to_string()))
    }
}

pub fn require_text(value: &str, message: &str) -> GatewayResult<()> {
    if value.trim().is_empty() {
        Err(GatewayError::Validation(message.to_string()))
    } else {
        Ok(())
    }
}
