use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BiolinkError {
    Validation(String),
    NotFound(String),
    AuthDenied(String),
    Parse(String),
    BackendUnavailable(String),
    LimitReached(String),
    Conflict(String),
    Config(String),
    FileOperation(String),
    Serialization(String),
}

impl BiolinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            BiolinkError::Validation(_) => "E001",
            BiolinkError::NotFound(_) => "E002",
            BiolinkError::AuthDenied(_) => "E003",
            BiolinkError::Parse(_) => "E004",
            BiolinkError::BackendUnavailable(_) => "E005",
            BiolinkError::LimitReached(_) => "E006",
            BiolinkError::Conflict(_) => "E007",
            BiolinkError::Config(_) => "E008",
            BiolinkError::FileOperation(_) => "E009",
            BiolinkError::Serialization(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            BiolinkError::Validation(_) => "Validation Rejected",
            BiolinkError::NotFound(_) => "Not Found",
            BiolinkError::AuthDenied(_) => "Access Denied",
            BiolinkError::Parse(_) => "Parse Error",
            BiolinkError::BackendUnavailable(_) => "Backend Unavailable",
            BiolinkError::LimitReached(_) => "Link Limit Reached",
            BiolinkError::Conflict(_) => "Conflict",
            BiolinkError::Config(_) => "Configuration Error",
            BiolinkError::FileOperation(_) => "File Operation Error",
            BiolinkError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            BiolinkError::Validation(msg)
            | BiolinkError::NotFound(msg)
            | BiolinkError::AuthDenied(msg)
            | BiolinkError::Parse(msg)
            | BiolinkError::BackendUnavailable(msg)
            | BiolinkError::LimitReached(msg)
            | BiolinkError::Conflict(msg)
            | BiolinkError::Config(msg)
            | BiolinkError::FileOperation(msg)
            | BiolinkError::Serialization(msg) => msg,
        }
    }

    /// HTTP 状态码映射
    #[cfg(feature = "server")]
    pub fn http_status(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            BiolinkError::Validation(_) | BiolinkError::Parse(_) => StatusCode::BAD_REQUEST,
            BiolinkError::NotFound(_) => StatusCode::NOT_FOUND,
            BiolinkError::AuthDenied(_) => StatusCode::UNAUTHORIZED,
            BiolinkError::LimitReached(_) => StatusCode::FORBIDDEN,
            BiolinkError::Conflict(_) => StatusCode::CONFLICT,
            BiolinkError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            BiolinkError::Config(_)
            | BiolinkError::FileOperation(_)
            | BiolinkError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for BiolinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for BiolinkError {}

// 便捷的构造函数
impl BiolinkError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        BiolinkError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        BiolinkError::NotFound(msg.into())
    }

    pub fn auth_denied<T: Into<String>>(msg: T) -> Self {
        BiolinkError::AuthDenied(msg.into())
    }

    pub fn parse<T: Into<String>>(msg: T) -> Self {
        BiolinkError::Parse(msg.into())
    }

    pub fn backend_unavailable<T: Into<String>>(msg: T) -> Self {
        BiolinkError::BackendUnavailable(msg.into())
    }

    pub fn limit_reached<T: Into<String>>(msg: T) -> Self {
        BiolinkError::LimitReached(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        BiolinkError::Conflict(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        BiolinkError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        BiolinkError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        BiolinkError::Serialization(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BiolinkError::NotFound(_))
    }
}

impl From<sea_orm::DbErr> for BiolinkError {
    fn from(err: sea_orm::DbErr) -> Self {
        BiolinkError::BackendUnavailable(err.to_string())
    }
}

impl From<std::io::Error> for BiolinkError {
    fn from(err: std::io::Error) -> Self {
        BiolinkError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for BiolinkError {
    fn from(err: serde_json::Error) -> Self {
        BiolinkError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BiolinkError>;
