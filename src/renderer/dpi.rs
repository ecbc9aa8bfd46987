//! DPI 换算
//!
//! Windows 以 96 DPI 为 1.0 缩放。窗口初始尺寸以逻辑像素给出，
//! 按显示器 DPI 放大并向上取整；Direct2D 位图使用窗口的实际 DPI。

/// 缩放为 1.0 时的 DPI
pub const BASE_DPI: f32 = 96.0;

/// 逻辑像素换算为物理像素（向上取整）
pub fn to_physical(logical: u32, scale_factor: f64) -> u32 {
    let scale = sanitize(scale_factor);
    (f64::from(logical) * scale).ceil() as u32
}

/// 缩放系数对应的 DPI
pub fn dpi_for_scale(scale_factor: f64) -> f32 {
    (sanitize(scale_factor) as f32) * BASE_DPI
}

fn sanitize(scale_factor: f64) -> f64 {
    if scale_factor.is_finite() && scale_factor > 0.0 {
        scale_factor
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_physical() {
        assert_eq!(to_physical(640, 1.0), 640);
        assert_eq!(to_physical(640, 1.5), 960);
        // 120 DPI: 480 * 1.25 = 600
        assert_eq!(to_physical(480, 1.25), 600);
        // 向上取整
        assert_eq!(to_physical(101, 1.5), 152);
    }

    #[test]
    fn test_dpi_for_scale() {
        assert_eq!(dpi_for_scale(1.0), 96.0);
        assert_eq!(dpi_for_scale(2.0), 192.0);
        assert_eq!(dpi_for_scale(0.0), 96.0);
        assert_eq!(dpi_for_scale(f64::NAN), 96.0);
    }
}
