//! 颜色类型
//!
//! 线性 RGBA，每个通道取值 `[0, 1]`。配置文件里以 `[r, g, b, a]` 数组表示。

use serde::{Deserialize, Serialize};

/// RGBA 颜色
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// 所有通道都在 `[0, 1]` 之内
    pub fn is_normalized(&self) -> bool {
        self.to_array()
            .iter()
            .all(|c| c.is_finite() && (0.0..=1.0).contains(c))
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; 4]> for Color {
    fn from(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

impl From<Color> for [f32; 4] {
    fn from(c: Color) -> Self {
        c.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!(Color::BLACK.to_array(), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(Color::WHITE.to_array(), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_normalized() {
        assert!(Color::new(0.2, 0.4, 0.6, 1.0).is_normalized());
        assert!(!Color::new(-0.1, 0.0, 0.0, 1.0).is_normalized());
        assert!(!Color::new(0.0, 0.0, f32::INFINITY, 1.0).is_normalized());
    }
}
