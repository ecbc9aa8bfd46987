//! 窗口客户区尺寸
//!
//! 记录交换链应当使用的物理像素尺寸，并决定一次尺寸变化需要做什么：
//! 最小化（任一边为 0）时既不渲染也不重建交换链；交换链尚未创建时
//! 只记录尺寸，首次创建时直接使用。

/// 一次尺寸变化对应的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAction {
    /// 尺寸未变，或窗口被最小化
    Skip,
    /// 设备相关资源尚未创建，创建时使用新尺寸
    Defer,
    /// 需要调整交换链缓冲区
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    width: u32,
    height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// 尺寸为 0 时跳过渲染
    pub fn should_render(&self) -> bool {
        !self.is_empty()
    }

    /// 记录新尺寸并返回处理方式
    ///
    /// `device_ready` 表示交换链是否已经存在。
    pub fn resize(&mut self, width: u32, height: u32, device_ready: bool) -> ResizeAction {
        let next = Self::new(width, height);
        if next == *self {
            return ResizeAction::Skip;
        }
        *self = next;

        if next.is_empty() {
            ResizeAction::Skip
        } else if !device_ready {
            ResizeAction::Defer
        } else {
            ResizeAction::Resize
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sized_surface_does_not_render() {
        assert!(!SurfaceSize::new(0, 480).should_render());
        assert!(!SurfaceSize::new(640, 0).should_render());
        assert!(SurfaceSize::new(640, 480).should_render());
    }

    #[test]
    fn test_minimize_skips_resize() {
        let mut size = SurfaceSize::new(640, 480);
        assert_eq!(size.resize(0, 480, true), ResizeAction::Skip);
        assert!(!size.should_render());
        assert_eq!(size.resize(640, 0, true), ResizeAction::Skip);
        assert_eq!((size.width(), size.height()), (640, 0));
    }

    #[test]
    fn test_same_size_is_skipped() {
        let mut size = SurfaceSize::new(640, 480);
        assert_eq!(size.resize(640, 480, true), ResizeAction::Skip);
    }

    #[test]
    fn test_resize_before_device_is_deferred() {
        let mut size = SurfaceSize::new(640, 480);
        assert_eq!(size.resize(800, 600, false), ResizeAction::Defer);
        assert_eq!((size.width(), size.height()), (800, 600));
        assert!(size.should_render());
    }

    #[test]
    fn test_restore_after_minimize_resizes() {
        let mut size = SurfaceSize::new(640, 480);
        assert_eq!(size.resize(1024, 768, true), ResizeAction::Resize);
        assert_eq!(size.resize(0, 0, true), ResizeAction::Skip);
        assert_eq!(size.resize(1024, 768, true), ResizeAction::Resize);
    }
}
