//! 错误处理模块
//!
//! 定义了程序中使用的统一错误类型，使用 `thiserror` 生成 `Display` 与 `Error` 实现。
//!
//! 原生图形 API 的失败（HRESULT）会被包装成 `GraphicsError::Api`，
//! 同时保留失败的调用名称和状态码，方便在日志里定位。

use thiserror::Error;

/// 统一的 Result 类型
pub type Result<T> = std::result::Result<T, HelloError>;

/// 程序的错误类型
#[derive(Debug, Error)]
pub enum HelloError {
    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 图形 API 错误
    #[error("Graphics error: {0}")]
    Graphics(#[from] GraphicsError),

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 日志系统错误
    #[error("Log error: {0}")]
    Log(String),

    /// 初始化错误
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// 运行时错误
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// 配置相关的错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件未找到
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    /// 配置文件解析失败
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// 配置值无效
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 图形 API 相关的错误
#[derive(Debug, Error)]
pub enum GraphicsError {
    /// 原生调用返回了失败的 HRESULT
    #[error("{call} failed with HRESULT {code:#010x}: {message}")]
    Api {
        call: &'static str,
        code: i32,
        message: String,
    },

    /// 设备创建失败
    #[error("Device creation failed: {0}")]
    DeviceCreation(String),

    /// 资源状态不满足调用前提（例如未获取就绘制）
    #[error("Invalid resource state: {0}")]
    InvalidState(String),
}

impl GraphicsError {
    /// 构造 API 调用失败的错误
    pub fn api(call: &'static str, code: i32, message: impl Into<String>) -> Self {
        GraphicsError::Api {
            call,
            code,
            message: message.into(),
        }
    }

    /// 失败调用对应的 HRESULT（如果有）
    pub fn hresult(&self) -> Option<i32> {
        match self {
            GraphicsError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = GraphicsError::api("D3D12CreateDevice", 0x887A0004_u32 as i32, "unsupported");
        assert_eq!(
            err.to_string(),
            "D3D12CreateDevice failed with HRESULT 0x887a0004: unsupported"
        );
        assert_eq!(err.hresult(), Some(0x887A0004_u32 as i32));
    }

    #[test]
    fn test_error_conversion() {
        let err: HelloError = ConfigError::FileNotFound("config.toml".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Config file not found: config.toml"
        );

        let err: HelloError = GraphicsError::InvalidState("buffer 1 not acquired".to_string()).into();
        assert!(matches!(err, HelloError::Graphics(_)));
        assert_eq!(
            err.to_string(),
            "Graphics error: Invalid resource state: buffer 1 not acquired"
        );
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error as _;

        let err: HelloError = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
        assert!(err.source().is_some());
        assert_eq!(GraphicsError::DeviceCreation("x".into()).hresult(), None);
    }
}
