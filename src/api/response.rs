//! JSON envelope shared by all routes

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::errors::BiolinkError;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// "OK" or the error code (E001...)
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: &str,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code.to_string(),
            message: message.into(),
            data,
        })
}

pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, "OK", "OK", Some(data))
}

/// 从 BiolinkError 构建错误响应（自动映射 HTTP 状态码）
pub fn error_response(err: &BiolinkError) -> HttpResponse {
    json_response::<()>(err.http_status(), err.code(), err.message(), None)
}
