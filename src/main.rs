//! hello_d2d12 - 在 Direct3D 12 窗口中用 Direct2D 绘制 "Hello, World!"
//!
//! # 使用方法
//!
//! ```bash
//! # 使用配置文件（config.toml，可选）
//! cargo run
//!
//! # 命令行覆盖
//! cargo run -- --text "Hi there" --font-size 64 --vsync
//! ```
//!
//! # 初始化流程
//!
//! 1. 加载配置文件并应用命令行参数
//! 2. 初始化日志系统
//! 3. 创建事件循环、窗口和渲染器（设备无关资源）
//! 4. 进入事件循环，第一次重绘时创建设备相关资源

use anyhow::{Context, Result};
use tracing::{debug, error, info};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};

use hello_d2d12::app::HelloApp;
use hello_d2d12::core::{log, Config, HelloError};

const CONFIG_PATH: &str = "config.toml";

fn main() {
    let mut config = Config::from_file_or_default(CONFIG_PATH);
    config.apply_args(std::env::args());

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let log_file = if config.logging.file_output {
        Some(config.logging.log_file.as_str())
    } else {
        None
    };
    if let Err(e) = log::init_logger(config.logging.level, config.logging.file_output, log_file) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(version = env!("CARGO_PKG_VERSION"), "hello_d2d12 starting...");
    info!(
        width = config.window.width,
        height = config.window.height,
        text = %config.text.content,
        font = %config.text.font_family,
        font_size = config.text.font_size,
        vsync = config.graphics.vsync,
        "Configuration loaded"
    );

    if let Err(e) = run(&config) {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    info!("Shut down cleanly");
}

/// 创建窗口并运行事件循环，直到窗口关闭或渲染失败
///
/// # 事件处理
///
/// - `RedrawRequested`：渲染一帧
/// - `Resized`：调整交换链
/// - `ScaleFactorChanged`：按新 DPI 重建目标位图
/// - `CloseRequested`：退出循环
fn run(config: &Config) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let mut app = HelloApp::new(&event_loop, config).context("failed to initialize application")?;

    info!("Entering main loop...");

    let mut failure: Option<HelloError> = None;
    event_loop
        .run(|event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);

            let Event::WindowEvent { event, window_id } = event else {
                return;
            };
            if window_id != app.window().id() {
                return;
            }

            let result = match event {
                WindowEvent::CloseRequested => {
                    info!("Close requested, shutting down...");
                    elwt.exit();
                    Ok(())
                }
                WindowEvent::Resized(size) => app.resize(size),
                WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                    debug!(scale_factor, "Scale factor changed");
                    app.set_scale_factor(scale_factor)
                }
                WindowEvent::RedrawRequested => app.render(),
                _ => Ok(()),
            };

            if let Err(e) = result {
                error!("Render loop failed: {}", e);
                failure = Some(e);
                elwt.exit();
            }
        })
        .context("event loop terminated abnormally")?;

    match failure {
        Some(e) => Err(e).context("rendering failed"),
        None => Ok(()),
    }
}
