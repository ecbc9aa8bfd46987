//! 与图形 API 无关的渲染器状态
//!
//! 这里的类型不调用任何原生接口，可以在所有平台上测试：
//!
//! - `frame`：帧计数器与后台缓冲区获取/释放状态
//! - `state`：设备无关/设备相关资源的生命周期
//! - `sync`：Fence 值管理
//! - `text`：UTF-16 编码、文本样式与布局矩形
//! - `dpi`：逻辑像素与物理像素的换算
//! - `surface`：窗口尺寸与尺寸变化的处理方式

pub mod dpi;
pub mod frame;
pub mod state;
pub mod surface;
pub mod sync;
pub mod text;
