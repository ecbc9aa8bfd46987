//! 文本参数
//!
//! DirectWrite 的字符串参数是 UTF-16：传给 `CreateTextFormat` 的名称需要
//! 以 0 结尾，而 `DrawText` 接收的是不含结尾 0 的切片。

use crate::core::config::{ParagraphAlignment, TextAlignment, TextConfig};
use crate::core::Color;

/// 编码为以 0 结尾的 UTF-16
pub fn to_wide_null(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// 编码为不含结尾 0 的 UTF-16
pub fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

/// 创建文本格式所需的参数
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// 以 0 结尾
    pub font_family: Vec<u16>,
    /// 以 0 结尾，空字符串对应 `L""`
    pub locale: Vec<u16>,
    pub font_size: f32,
    pub alignment: TextAlignment,
    pub paragraph_alignment: ParagraphAlignment,
}

impl TextStyle {
    pub fn from_config(config: &TextConfig) -> Self {
        Self {
            font_family: to_wide_null(&config.font_family),
            locale: to_wide_null(&config.locale),
            font_size: config.font_size,
            alignment: config.alignment,
            paragraph_alignment: config.paragraph_alignment,
        }
    }
}

/// 每帧绘制的内容
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// 不含结尾 0
    pub utf16: Vec<u16>,
    pub foreground: Color,
    pub background: Color,
}

impl TextRun {
    pub fn from_config(config: &TextConfig) -> Self {
        Self {
            utf16: to_wide(&config.content),
            foreground: config.foreground,
            background: config.background,
        }
    }
}

/// 布局矩形：覆盖整个渲染目标（DIP）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl LayoutRect {
    pub fn full_target(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            right: width.max(0.0),
            bottom: height.max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_encoding() {
        assert_eq!(to_wide("Hi"), vec![0x48, 0x69]);
        assert_eq!(to_wide_null("Hi"), vec![0x48, 0x69, 0]);
        assert_eq!(to_wide_null(""), vec![0]);
        // 补充平面字符占两个 UTF-16 单元
        assert_eq!(to_wide("😀").len(), 2);
    }

    #[test]
    fn test_default_run() {
        let run = TextRun::from_config(&TextConfig::default());
        assert_eq!(run.utf16.len(), "Hello, World!".len());
        assert_ne!(run.utf16.last(), Some(&0));
        assert_eq!(run.foreground, Color::BLACK);
        assert_eq!(run.background, Color::WHITE);
    }

    #[test]
    fn test_style_from_config() {
        let style = TextStyle::from_config(&TextConfig::default());
        assert_eq!(style.font_family, to_wide_null("Verdana"));
        assert_eq!(style.locale, vec![0]);
        assert_eq!(style.font_size, 50.0);
        assert_eq!(style.alignment, TextAlignment::Center);
    }

    #[test]
    fn test_layout_rect() {
        let rect = LayoutRect::full_target(640.0, 480.0);
        assert_eq!((rect.left, rect.top, rect.right, rect.bottom), (0.0, 0.0, 640.0, 480.0));
        assert_eq!(LayoutRect::full_target(-1.0, 10.0).right, 0.0);
    }
}
