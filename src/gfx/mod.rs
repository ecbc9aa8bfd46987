//! 图形后端模块
//!
//! 封装三套原生图形 API 的底层调用，仅在 Windows 上编译：
//! - `d3d12`：DXGI 工厂、适配器、D3D12 设备、命令队列与 Fence
//! - `interop`：D3D11On12 桥接设备，负责包装/获取/释放后台缓冲区
//! - `d2d`：Direct2D 工厂、设备上下文、目标位图与画刷
//! - `dwrite`：DirectWrite 工厂与文本格式
//! - `swapchain`：交换链、RTV 描述符堆以及每帧资源
//! - `renderer`：把以上资源串起来的 `TextRenderer`
//!
//! 其他平台上 `TextRenderer` 是一个无法构造的占位类型。

#[cfg(target_os = "windows")]
pub mod d3d12;
#[cfg(target_os = "windows")]
pub mod interop;
#[cfg(target_os = "windows")]
pub mod d2d;
#[cfg(target_os = "windows")]
pub mod dwrite;
#[cfg(target_os = "windows")]
pub mod swapchain;
#[cfg(target_os = "windows")]
pub mod renderer;

#[cfg(not(target_os = "windows"))]
mod unsupported;

#[cfg(target_os = "windows")]
pub use renderer::{DeviceIndependentResources, DeviceResources, TextRenderer};
#[cfg(not(target_os = "windows"))]
pub use unsupported::TextRenderer;

/// 把 `windows::core::Error` 转换为带调用名称的 `GraphicsError::Api`
#[cfg(target_os = "windows")]
pub(crate) trait ApiResultExt<T> {
    fn api(self, call: &'static str) -> crate::core::Result<T>;
}

#[cfg(target_os = "windows")]
impl<T> ApiResultExt<T> for windows::core::Result<T> {
    fn api(self, call: &'static str) -> crate::core::Result<T> {
        self.map_err(|e| {
            crate::core::error::GraphicsError::api(call, e.code().0, e.message().to_string()).into()
        })
    }
}
