//! hello_d2d12 - Direct3D 12 上的 Direct2D 文本演示
//!
//! 用 D3D12 设备持有翻转模型交换链，通过 D3D11On12 包装后台缓冲区，
//! 再由 Direct2D 设备上下文与 DirectWrite 在其上绘制一行文本。
//!
//! # 模块结构
//!
//! - `core`：日志、配置、错误处理、颜色
//! - `renderer`：与图形 API 无关的帧、生命周期与文本状态
//! - `gfx`：D3D12 / 11On12 / Direct2D / DirectWrite 的封装（仅 Windows）
//! - `app`：窗口与渲染器的组合
//!
//! # 使用示例
//!
//! ```no_run
//! use hello_d2d12::core::Config;
//!
//! let mut config = Config::default();
//! config.apply_args(["--text", "Hi"]);
//! assert_eq!(config.text.content, "Hi");
//! ```

pub mod app;
pub mod core;
pub mod gfx;
pub mod renderer;
