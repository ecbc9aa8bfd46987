//! DirectX 12 设备
//!
//! # 初始化流程
//!
//! 1. 启用调试层（配置开启时）
//! 2. 创建 DXGI 工厂
//! 3. 枚举适配器
//! 4. 创建 D3D12 设备（功能级别 12_0）
//! 5. 创建直接命令队列
//! 6. 创建同步对象（Fence + 事件）

use tracing::{debug, info, warn};
use windows::{
    core::PCSTR,
    Win32::Foundation::{CloseHandle, HANDLE},
    Win32::Graphics::Direct3D::*,
    Win32::Graphics::Direct3D12::*,
    Win32::Graphics::Dxgi::*,
    Win32::System::Threading::{CreateEventA, WaitForSingleObject, INFINITE},
};

use super::ApiResultExt;
use crate::core::config::GraphicsConfig;
use crate::core::error::{GraphicsError, Result};
use crate::renderer::sync::FenceManager;

/// D3D12 设备及其命令队列
///
/// 交换链需要命令队列才能在 Present 时刷新，11On12 设备也把 D3D11
/// 命令提交到同一个队列。
pub struct Dx12Device {
    pub factory: IDXGIFactory4,
    pub adapter: IDXGIAdapter1,
    pub device: ID3D12Device,
    pub command_queue: ID3D12CommandQueue,
    fence: ID3D12Fence,
    fence_event: HANDLE,
    fences: FenceManager,
}

impl Dx12Device {
    pub fn new(config: &GraphicsConfig) -> Result<Self> {
        unsafe {
            if config.debug_layer {
                let mut debug: Option<ID3D12Debug> = None;
                match D3D12GetDebugInterface(&mut debug) {
                    Ok(()) => {
                        if let Some(debug) = debug {
                            debug.EnableDebugLayer();
                            debug!("DX12 Debug Layer enabled");
                        }
                    }
                    Err(e) => warn!(error = %e, "Failed to enable DX12 Debug Layer"),
                }
            }

            let factory_flags = if config.debug_layer {
                DXGI_CREATE_FACTORY_DEBUG
            } else {
                DXGI_CREATE_FACTORY_FLAGS(0)
            };
            let factory: IDXGIFactory4 = CreateDXGIFactory2(factory_flags).api("CreateDXGIFactory2")?;

            let adapter: IDXGIAdapter1 = factory
                .EnumAdapters1(config.adapter_index)
                .api("IDXGIFactory1::EnumAdapters1")?;
            if let Ok(desc) = adapter.GetDesc1() {
                info!(
                    index = config.adapter_index,
                    name = %adapter_name(&desc.Description),
                    "Using DXGI adapter"
                );
            }

            let mut device: Option<ID3D12Device> = None;
            D3D12CreateDevice(&adapter, D3D_FEATURE_LEVEL_12_0, &mut device)
                .api("D3D12CreateDevice")?;
            let device = device.ok_or_else(|| {
                GraphicsError::DeviceCreation("D3D12CreateDevice returned no device".to_string())
            })?;
            debug!("D3D12 Device created successfully");

            let queue_desc = D3D12_COMMAND_QUEUE_DESC {
                Type: D3D12_COMMAND_LIST_TYPE_DIRECT,
                Flags: D3D12_COMMAND_QUEUE_FLAG_NONE,
                ..Default::default()
            };
            let command_queue: ID3D12CommandQueue = device
                .CreateCommandQueue(&queue_desc)
                .api("ID3D12Device::CreateCommandQueue")?;

            let fence: ID3D12Fence = device
                .CreateFence(0, D3D12_FENCE_FLAG_NONE)
                .api("ID3D12Device::CreateFence")?;
            let fence_event = CreateEventA(None, false, false, PCSTR::null()).api("CreateEventA")?;
            debug!("Synchronization objects created");

            Ok(Self {
                factory,
                adapter,
                device,
                command_queue,
                fence,
                fence_event,
                fences: FenceManager::new(),
            })
        }
    }

    /// 等待命令队列上已提交的所有工作完成
    pub fn wait_for_idle(&self) -> Result<()> {
        let value = self.fences.next_value();
        unsafe {
            self.command_queue
                .Signal(&self.fence, value.value())
                .api("ID3D12CommandQueue::Signal")?;

            if self.fence.GetCompletedValue() < value.value() {
                self.fence
                    .SetEventOnCompletion(value.value(), self.fence_event)
                    .api("ID3D12Fence::SetEventOnCompletion")?;
                WaitForSingleObject(self.fence_event, INFINITE);
            }
        }
        self.fences.update_completed_value(value);
        debug!(fence_value = value.value(), "Command queue idle");
        Ok(())
    }
}

impl Drop for Dx12Device {
    fn drop(&mut self) {
        if !self.fences.is_idle() {
            warn!(
                signaled = self.fences.current_value().value(),
                completed = self.fences.completed_value().value(),
                "D3D12 device dropped with GPU work outstanding"
            );
        }
        unsafe {
            let _ = CloseHandle(self.fence_event);
        }
    }
}

/// 适配器描述是定长的 UTF-16 数组，以 0 结尾
fn adapter_name(description: &[u16]) -> String {
    let len = description.iter().position(|&c| c == 0).unwrap_or(description.len());
    String::from_utf16_lossy(&description[..len])
}
