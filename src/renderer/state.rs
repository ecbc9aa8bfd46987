//! 渲染器生命周期
//!
//! ```text
//! Uninitialized ──► DeviceIndependentReady ──► DeviceReady
//!                           ▲                      │
//!                           └──── discard ─────────┘
//! ```
//!
//! 设备无关资源（工厂、设备、文本格式）只创建一次；设备相关资源
//! （交换链、每帧缓冲区、画刷）在第一次渲染时创建，设备丢失或
//! 重建交换链时丢弃，下一次渲染再重新创建。

use crate::core::error::{GraphicsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RendererState {
    #[default]
    Uninitialized,
    DeviceIndependentReady,
    DeviceReady,
}

/// 生命周期状态机
#[derive(Debug, Default)]
pub struct Lifecycle {
    state: RendererState,
    device_generation: u32,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RendererState {
        self.state
    }

    /// 设备相关资源被创建过的次数
    pub fn device_generation(&self) -> u32 {
        self.device_generation
    }

    pub fn needs_device_resources(&self) -> bool {
        self.state == RendererState::DeviceIndependentReady
    }

    pub fn mark_device_independent_ready(&mut self) -> Result<()> {
        match self.state {
            RendererState::Uninitialized => {
                self.state = RendererState::DeviceIndependentReady;
                Ok(())
            }
            other => Err(transition_error(other, "device-independent resources created twice")),
        }
    }

    pub fn mark_device_ready(&mut self) -> Result<()> {
        match self.state {
            RendererState::DeviceIndependentReady => {
                self.state = RendererState::DeviceReady;
                self.device_generation += 1;
                Ok(())
            }
            other => Err(transition_error(other, "device resources need device-independent resources first")),
        }
    }

    /// 丢弃设备相关资源；尚未创建时不做任何事
    pub fn discard(&mut self) {
        if self.state == RendererState::DeviceReady {
            self.state = RendererState::DeviceIndependentReady;
        }
    }

    pub fn ensure(&self, expected: RendererState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(transition_error(self.state, "unexpected renderer state"))
        }
    }
}

fn transition_error(state: RendererState, msg: &str) -> crate::core::error::HelloError {
    GraphicsError::InvalidState(format!("{msg} (state: {state:?})")).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_order() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.state(), RendererState::Uninitialized);
        assert!(lifecycle.mark_device_ready().is_err());

        lifecycle.mark_device_independent_ready().unwrap();
        assert!(lifecycle.needs_device_resources());

        lifecycle.mark_device_ready().unwrap();
        assert!(lifecycle.ensure(RendererState::DeviceReady).is_ok());
        assert_eq!(lifecycle.device_generation(), 1);
        assert!(lifecycle.mark_device_independent_ready().is_err());
    }

    #[test]
    fn test_discard_and_recreate() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.discard();
        assert_eq!(lifecycle.state(), RendererState::Uninitialized);

        lifecycle.mark_device_independent_ready().unwrap();
        lifecycle.mark_device_ready().unwrap();
        lifecycle.discard();
        assert!(lifecycle.needs_device_resources());
        assert!(lifecycle.ensure(RendererState::DeviceReady).is_err());

        lifecycle.mark_device_ready().unwrap();
        assert_eq!(lifecycle.device_generation(), 2);
    }
}
