//! 帧与后台缓冲区簿记
//!
//! 交换链固定使用两块后台缓冲区。每一帧通过帧计数取模选出当前缓冲区，
//! 缓冲区在被 Direct2D 绘制之前必须先经 11On12 设备"获取"，绘制完成后
//! "释放"（释放时资源转换到 PRESENT 状态），全部释放后才能 Present。
//!
//! 这里只记录状态并校验调用顺序，真正的 API 调用在 `gfx` 模块中完成。

use crate::core::error::{GraphicsError, Result};

/// 交换链缓冲区数量
pub const FRAME_COUNT: usize = 2;

/// 帧计数环
///
/// 单调递增的帧计数，当前缓冲区索引为 `counter % count`。
#[derive(Debug, Clone)]
pub struct FrameRing {
    counter: u64,
    count: usize,
}

impl FrameRing {
    pub fn new(count: usize) -> Self {
        assert!(count > 0, "frame ring needs at least one buffer");
        Self { counter: 0, count }
    }

    /// 双缓冲
    pub fn double_buffering() -> Self {
        Self::new(FRAME_COUNT)
    }

    /// 已经完成的帧数
    pub fn frame_number(&self) -> u64 {
        self.counter
    }

    /// 当前缓冲区索引
    pub fn index(&self) -> usize {
        (self.counter % self.count as u64) as usize
    }

    /// 前进到下一帧
    pub fn advance(&mut self) {
        self.counter += 1;
    }

    /// 与交换链报告的当前缓冲区对齐
    ///
    /// 交换链重建后会从 0 号缓冲区重新开始，这里把计数推进到
    /// 下一个满足 `counter % count == index` 的值，计数不回退。
    pub fn sync_to(&mut self, index: usize) {
        let index = index % self.count;
        while self.index() != index {
            self.counter += 1;
        }
    }
}

/// 后台缓冲区的包装资源状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackBufferState {
    /// 已释放，D3D12 侧处于 PRESENT 状态
    Released,
    /// 已被 11On12 设备获取，可以绘制
    Acquired,
}

/// 记录每块后台缓冲区的获取/释放状态
#[derive(Debug, Clone)]
pub struct BackBufferTracker {
    states: Vec<BackBufferState>,
}

impl BackBufferTracker {
    pub fn new(count: usize) -> Self {
        Self {
            states: vec![BackBufferState::Released; count],
        }
    }

    pub fn state(&self, index: usize) -> Option<BackBufferState> {
        self.states.get(index).copied()
    }

    /// 标记获取，重复获取返回错误
    pub fn acquire(&mut self, index: usize) -> Result<()> {
        let state = self.slot(index)?;
        if *state == BackBufferState::Acquired {
            return Err(invalid(format!("back buffer {index} is already acquired")));
        }
        *state = BackBufferState::Acquired;
        Ok(())
    }

    /// 标记释放，未获取就释放返回错误
    pub fn release(&mut self, index: usize) -> Result<()> {
        let state = self.slot(index)?;
        if *state == BackBufferState::Released {
            return Err(invalid(format!("back buffer {index} is not acquired")));
        }
        *state = BackBufferState::Released;
        Ok(())
    }

    /// 绘制前检查
    pub fn ensure_acquired(&self, index: usize) -> Result<()> {
        match self.state(index) {
            Some(BackBufferState::Acquired) => Ok(()),
            Some(BackBufferState::Released) => Err(invalid(format!("back buffer {index} must be acquired before drawing"))),
            None => Err(out_of_range(index)),
        }
    }

    /// Present 前检查
    pub fn ensure_all_released(&self) -> Result<()> {
        match self.states.iter().position(|s| *s == BackBufferState::Acquired) {
            Some(index) => Err(invalid(format!("back buffer {index} is still acquired"))),
            None => Ok(()),
        }
    }

    /// 资源重建后全部视为已释放
    pub fn reset(&mut self) {
        self.states.fill(BackBufferState::Released);
    }

    fn slot(&mut self, index: usize) -> Result<&mut BackBufferState> {
        self.states.get_mut(index).ok_or_else(|| out_of_range(index))
    }
}

fn invalid(msg: String) -> crate::core::error::HelloError {
    GraphicsError::InvalidState(msg).into()
}

fn out_of_range(index: usize) -> crate::core::error::HelloError {
    invalid(format!("back buffer index {index} out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_ring_alternates() {
        let mut ring = FrameRing::double_buffering();
        let indices: Vec<usize> = (0..5)
            .map(|_| {
                let i = ring.index();
                ring.advance();
                i
            })
            .collect();
        assert_eq!(indices, vec![0, 1, 0, 1, 0]);
        assert_eq!(ring.frame_number(), 5);
    }

    #[test]
    fn test_frame_ring_sync() {
        let mut ring = FrameRing::double_buffering();
        ring.advance(); // index 1
        ring.sync_to(0);
        assert_eq!(ring.index(), 0);
        assert_eq!(ring.frame_number(), 2);

        // 已对齐时不前进
        ring.sync_to(0);
        assert_eq!(ring.frame_number(), 2);
    }

    #[test]
    fn test_acquire_release_cycle() {
        let mut tracker = BackBufferTracker::new(FRAME_COUNT);
        assert!(tracker.ensure_acquired(0).is_err());

        tracker.acquire(0).unwrap();
        assert_eq!(tracker.state(0), Some(BackBufferState::Acquired));
        assert!(tracker.ensure_acquired(0).is_ok());
        assert!(tracker.ensure_all_released().is_err());

        tracker.release(0).unwrap();
        assert!(tracker.ensure_all_released().is_ok());
    }

    #[test]
    fn test_invalid_transitions() {
        let mut tracker = BackBufferTracker::new(FRAME_COUNT);
        assert!(tracker.release(1).is_err());

        tracker.acquire(1).unwrap();
        assert!(tracker.acquire(1).is_err());
        assert!(tracker.acquire(2).is_err());
        assert!(tracker.ensure_acquired(5).is_err());

        tracker.reset();
        assert_eq!(tracker.state(1), Some(BackBufferState::Released));
    }
}
