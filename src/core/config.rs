//! 配置管理模块
//!
//! 提供演示程序配置的加载、解析和校验功能。
//! 支持从 TOML 配置文件加载，也支持命令行参数覆盖。
//!
//! # 配置文件格式 (config.toml)
//!
//! ```toml
//! [window]
//! width = 640          # 逻辑像素，按 DPI 缩放
//! height = 480
//! title = "Direct2D Demo Application"
//! resizable = true
//!
//! [graphics]
//! vsync = false
//! debug_layer = false
//! adapter_index = 0
//!
//! [text]
//! content = "Hello, World!"
//! font_family = "Verdana"
//! font_size = 50.0
//! alignment = "center"
//! paragraph_alignment = "center"
//!
//! [logging]
//! level = "info"      # trace, debug, info, warn, error
//! file_output = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::color::Color;
use super::error::{ConfigError, Result};

/// 演示程序配置
///
/// 所有字段都有默认值，配置文件缺失或只写了部分字段都可以正常运行。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// 窗口配置
    #[serde(default)]
    pub window: WindowConfig,

    /// 图形配置
    #[serde(default)]
    pub graphics: GraphicsConfig,

    /// 文本配置
    #[serde(default)]
    pub text: TextConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 窗口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// 窗口宽度（逻辑像素）
    #[serde(default = "default_width")]
    pub width: u32,

    /// 窗口高度（逻辑像素）
    #[serde(default = "default_height")]
    pub height: u32,

    /// 窗口标题
    #[serde(default = "default_title")]
    pub title: String,

    /// 是否可调整大小
    #[serde(default = "default_resizable")]
    pub resizable: bool,
}

/// 图形配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphicsConfig {
    /// 垂直同步（Present 的同步间隔为 1，否则为 0）
    #[serde(default)]
    pub vsync: bool,

    /// 启用 D3D12 调试层
    #[serde(default)]
    pub debug_layer: bool,

    /// 使用的 DXGI 适配器序号
    #[serde(default)]
    pub adapter_index: u32,
}

/// 文本配置
///
/// 对应 DirectWrite 的文本格式以及绘制时使用的颜色。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    /// 要绘制的字符串
    #[serde(default = "default_content")]
    pub content: String,

    /// 字体族名称
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// 字号（DIP）
    #[serde(default = "default_font_size")]
    pub font_size: f32,

    /// 区域名称，空字符串表示系统默认
    #[serde(default)]
    pub locale: String,

    /// 水平对齐
    #[serde(default)]
    pub alignment: TextAlignment,

    /// 垂直（段落）对齐
    #[serde(default)]
    pub paragraph_alignment: ParagraphAlignment,

    /// 文字颜色
    #[serde(default = "default_foreground")]
    pub foreground: Color,

    /// 清屏颜色
    #[serde(default = "default_background")]
    pub background: Color,
}

/// 水平对齐方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    Leading,
    Trailing,
    #[default]
    Center,
    Justified,
}

/// 段落对齐方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParagraphAlignment {
    Near,
    Far,
    #[default]
    Center,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// 是否输出到文件
    #[serde(default)]
    pub file_output: bool,

    /// 日志文件路径
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

// 默认值函数
fn default_width() -> u32 { 640 }
fn default_height() -> u32 { 480 }
fn default_title() -> String { "Direct2D Demo Application".to_string() }
fn default_resizable() -> bool { true }
fn default_content() -> String { "Hello, World!".to_string() }
fn default_font_family() -> String { "Verdana".to_string() }
fn default_font_size() -> f32 { 50.0 }
fn default_foreground() -> Color { Color::BLACK }
fn default_background() -> Color { Color::WHITE }
fn default_log_level() -> LogLevel { LogLevel::Info }
fn default_log_file() -> String { "hello_d2d12.log".to_string() }

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_title(),
            resizable: default_resizable(),
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            content: default_content(),
            font_family: default_font_family(),
            font_size: default_font_size(),
            locale: String::new(),
            alignment: TextAlignment::default(),
            paragraph_alignment: ParagraphAlignment::default(),
            foreground: default_foreground(),
            background: default_background(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: false,
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// 从配置文件加载
    ///
    /// 文件不存在返回 `ConfigError::FileNotFound`，内容无法解析返回
    /// `ConfigError::ParseError`。
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path_str))?;

        Self::from_toml_str(&contents)
    }

    /// 从 TOML 字符串解析
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// 从配置文件加载，如果文件不存在则使用默认配置
    ///
    /// 文件存在但解析失败时同样回退到默认配置，并把原因写到标准错误
    /// （此时日志系统尚未初始化）。
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        Self::from_file(path).unwrap_or_else(|e| {
            eprintln!("Ignoring {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// 从命令行参数覆盖配置
    ///
    /// 支持的参数：
    /// - `--width <value>` / `--height <value>`: 窗口尺寸
    /// - `--text <value>`: 绘制的字符串
    /// - `--font <value>` / `--font-size <value>`: 字体
    /// - `--vsync`: 开启垂直同步
    /// - `--debug-layer`: 启用 D3D12 调试层
    ///
    /// 无法解析的数值会被忽略，保留原有配置；以 `--` 开头的下一个参数
    /// 被视为另一个选项而不是取值。
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        let value_of = |flag: &str| {
            args.iter()
                .position(|a| a == flag)
                .and_then(|idx| args.get(idx + 1))
                .filter(|value| !value.starts_with("--"))
        };

        if args.iter().any(|a| a == "--vsync") {
            self.graphics.vsync = true;
        }

        if args.iter().any(|a| a == "--debug-layer") {
            self.graphics.debug_layer = true;
        }

        if let Some(width) = value_of("--width").and_then(|v| v.parse().ok()) {
            self.window.width = width;
        }

        if let Some(height) = value_of("--height").and_then(|v| v.parse().ok()) {
            self.window.height = height;
        }

        if let Some(text) = value_of("--text") {
            self.text.content = text.clone();
        }

        if let Some(font) = value_of("--font") {
            self.text.font_family = font.clone();
        }

        if let Some(size) = value_of("--font-size").and_then(|v| v.parse().ok()) {
            self.text.font_size = size;
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "window.width/height".to_string(),
                reason: "Window dimensions must be greater than 0".to_string(),
            }.into());
        }

        if self.text.font_family.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "text.font_family".to_string(),
                reason: "Font family must not be empty".to_string(),
            }.into());
        }

        if !self.text.font_size.is_finite() || self.text.font_size <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "text.font_size".to_string(),
                reason: "Font size must be a positive number".to_string(),
            }.into());
        }

        for (field, color) in [
            ("text.foreground", &self.text.foreground),
            ("text.background", &self.text.background),
        ] {
            if !color.is_normalized() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "Color channels must be within [0, 1]".to_string(),
                }.into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::HelloError;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 480);
        assert_eq!(config.text.content, "Hello, World!");
        assert_eq!(config.text.font_family, "Verdana");
        assert_eq!(config.text.font_size, 50.0);
        assert_eq!(config.text.alignment, TextAlignment::Center);
        assert_eq!(config.text.paragraph_alignment, ParagraphAlignment::Center);
        assert!(!config.graphics.vsync);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            [text]
            content = "Hi"
            alignment = "leading"

            [graphics]
            vsync = true
            "#,
        )
        .unwrap();

        assert_eq!(config.text.content, "Hi");
        assert_eq!(config.text.alignment, TextAlignment::Leading);
        assert_eq!(config.text.font_family, "Verdana");
        assert!(config.graphics.vsync);
        assert_eq!(config.window.width, 640);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_colors_from_toml() {
        let config = Config::from_toml_str(
            r#"
            [text]
            foreground = [1.0, 0.0, 0.0, 1.0]
            "#,
        )
        .unwrap();
        assert_eq!(config.text.foreground, Color::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(config.text.background, Color::WHITE);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml_str("[window\nwidth = 1").unwrap_err();
        assert!(matches!(err, HelloError::Config(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, HelloError::Config(ConfigError::FileNotFound(_))));

        let config = Config::from_file_or_default("does/not/exist.toml");
        assert_eq!(config.window.width, 640);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.window.width = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.text.font_size = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.text.font_size = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.text.font_family = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.text.background = Color::new(1.5, 0.0, 0.0, 1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_args() {
        let mut config = Config::default();
        config.apply_args([
            "hello_d2d12",
            "--width", "1024",
            "--height", "abc",
            "--text", "Bonjour",
            "--font-size", "32",
            "--vsync",
        ]);

        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 480);
        assert_eq!(config.text.content, "Bonjour");
        assert_eq!(config.text.font_size, 32.0);
        assert_eq!(config.text.font_family, "Verdana");
        assert!(config.graphics.vsync);
        assert!(!config.graphics.debug_layer);
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join(format!("hello_d2d12_{}.toml", std::process::id()));
        let mut config = Config::default();
        config.text.content = "Saved".to_string();
        config.logging.level = LogLevel::Debug;
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.text.content, "Saved");
        assert_eq!(loaded.logging.level, LogLevel::Debug);
        assert_eq!(loaded.text.background, Color::WHITE);
    }

    #[test]
    fn test_flag_without_value_is_ignored() {
        let mut config = Config::default();
        config.apply_args(["hello_d2d12", "--font"]);
        assert_eq!(config.text.font_family, "Verdana");
    }

    #[test]
    fn test_flag_does_not_take_next_flag_as_value() {
        let mut config = Config::default();
        config.apply_args(["hello_d2d12", "--text", "--vsync", "--font", "--width", "800"]);

        assert_eq!(config.text.content, "Hello, World!");
        assert_eq!(config.text.font_family, "Verdana");
        assert_eq!(config.window.width, 800);
        assert!(config.graphics.vsync);
    }
}
