//! 非 Windows 平台的占位渲染器
//!
//! 该类型无法被构造，只用于让上层代码在所有平台上都能编译。

use std::convert::Infallible;

use crate::core::error::Result;

pub struct TextRenderer {
    never: Infallible,
}

impl TextRenderer {
    pub fn frame_number(&self) -> u64 {
        match self.never {}
    }

    pub fn render(&mut self) -> Result<()> {
        match self.never {}
    }

    pub fn resize(&mut self, _width: u32, _height: u32) -> Result<()> {
        match self.never {}
    }

    pub fn set_dpi(&mut self, _dpi: f32) -> Result<()> {
        match self.never {}
    }
}
