//! GPU 同步计数
//!
//! D3D12 通过 Fence 实现 CPU-GPU 同步：命令队列在提交的工作完成后把
//! Fence 设置为某个值，CPU 比较该值即可知道工作是否完成。
//!
//! 这里只维护单调递增的计数，真正的 Signal/Wait 调用在 `gfx::d3d12` 中。
//! 重建交换链和退出前都需要等待队列空闲。

use std::sync::atomic::{AtomicU64, Ordering};

/// Fence 值
///
/// 用于CPU-GPU同步的单调递增值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FenceValue(u64);

impl FenceValue {
    /// 创建新的Fence值
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// 获取内部值
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Fence 计数管理
///
/// # 示例
///
/// ```
/// use hello_d2d12::renderer::sync::FenceManager;
///
/// let fences = FenceManager::new();
/// let value = fences.next_value();
/// // queue.Signal(fence, value) ...
/// fences.update_completed_value(value);
/// assert!(fences.is_completed(value));
/// ```
#[derive(Debug, Default)]
pub struct FenceManager {
    /// 最近一次 Signal 的值（CPU侧）
    current_value: AtomicU64,
    /// 已完成的值（GPU侧）
    completed_value: AtomicU64,
}

impl FenceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取当前Fence值
    pub fn current_value(&self) -> FenceValue {
        FenceValue::new(self.current_value.load(Ordering::Acquire))
    }

    /// 获取已完成的Fence值
    pub fn completed_value(&self) -> FenceValue {
        FenceValue::new(self.completed_value.load(Ordering::Acquire))
    }

    /// 获取下一个Fence值并递增计数器
    pub fn next_value(&self) -> FenceValue {
        let value = self.current_value.fetch_add(1, Ordering::AcqRel);
        FenceValue::new(value + 1)
    }

    /// 更新已完成的Fence值，只会前进
    pub fn update_completed_value(&self, value: FenceValue) {
        self.completed_value.fetch_max(value.value(), Ordering::AcqRel);
    }

    /// 检查特定Fence值是否已完成
    pub fn is_completed(&self, value: FenceValue) -> bool {
        self.completed_value() >= value
    }

    /// 所有已 Signal 的工作是否都已完成
    pub fn is_idle(&self) -> bool {
        self.is_completed(self.current_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_manager() {
        let manager = FenceManager::new();

        assert_eq!(manager.current_value().value(), 0);
        assert_eq!(manager.completed_value().value(), 0);
        assert!(manager.is_idle());

        let v1 = manager.next_value();
        assert_eq!(v1.value(), 1);
        assert_eq!(manager.current_value().value(), 1);
        assert!(!manager.is_idle());

        let v2 = manager.next_value();
        assert_eq!(v2.value(), 2);

        // 模拟GPU完成
        manager.update_completed_value(v1);
        assert!(manager.is_completed(v1));
        assert!(!manager.is_completed(v2));

        manager.update_completed_value(v2);
        assert!(manager.is_completed(v2));
        assert!(manager.is_idle());
    }

    #[test]
    fn test_completed_value_never_goes_back() {
        let manager = FenceManager::new();
        manager.update_completed_value(FenceValue::new(5));
        manager.update_completed_value(FenceValue::new(3));
        assert_eq!(manager.completed_value().value(), 5);
    }

    #[test]
    fn test_fence_ordering() {
        let f1 = FenceValue::new(1);
        let f2 = FenceValue::new(2);

        assert!(f1 < f2);
        assert_eq!(f1, FenceValue::new(1));
    }
}
