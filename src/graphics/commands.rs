//! Command allocator, command list and command queue.

use serde::{Deserialize, Serialize};

/// Command list type shared by the allocator, list and queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandListKind {
    #[default]
    Direct,
    Compute,
    Copy,
}

/// Scheduling priority of the command queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueuePriority {
    #[default]
    Normal,
    High,
}

/// Settings for the command objects created after the device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandQueueConfig {
    pub kind: CommandListKind,
    pub priority: QueuePriority,
    pub disable_gpu_timeout: bool,
    /// GPU node for multi-adapter setups; 0 for single GPU
    pub node_mask: u32,
}

#[cfg(windows)]
pub use platform::CommandObjects;

#[cfg(windows)]
mod platform {
    use windows::Win32::Graphics::Direct3D12::{
        ID3D12CommandAllocator, ID3D12CommandQueue, ID3D12Device, ID3D12GraphicsCommandList,
        D3D12_COMMAND_LIST_TYPE, D3D12_COMMAND_LIST_TYPE_COMPUTE, D3D12_COMMAND_LIST_TYPE_COPY,
        D3D12_COMMAND_LIST_TYPE_DIRECT, D3D12_COMMAND_QUEUE_DESC,
        D3D12_COMMAND_QUEUE_FLAG_DISABLE_GPU_TIMEOUT, D3D12_COMMAND_QUEUE_FLAG_NONE,
        D3D12_COMMAND_QUEUE_PRIORITY_HIGH, D3D12_COMMAND_QUEUE_PRIORITY_NORMAL,
    };

    use super::{CommandListKind, CommandQueueConfig, QueuePriority};
    use crate::error::{step_err, ProtoError, ProtoResult};

    impl CommandListKind {
        fn to_d3d(self) -> D3D12_COMMAND_LIST_TYPE {
            match self {
                CommandListKind::Direct => D3D12_COMMAND_LIST_TYPE_DIRECT,
                CommandListKind::Compute => D3D12_COMMAND_LIST_TYPE_COMPUTE,
                CommandListKind::Copy => D3D12_COMMAND_LIST_TYPE_COPY,
            }
        }
    }

    impl CommandQueueConfig {
        pub(crate) fn to_desc(&self) -> D3D12_COMMAND_QUEUE_DESC {
            let priority = match self.priority {
                QueuePriority::Normal => D3D12_COMMAND_QUEUE_PRIORITY_NORMAL,
                QueuePriority::High => D3D12_COMMAND_QUEUE_PRIORITY_HIGH,
            };

            D3D12_COMMAND_QUEUE_DESC {
                Type: self.kind.to_d3d(),
                Priority: priority.0,
                Flags: if self.disable_gpu_timeout {
                    D3D12_COMMAND_QUEUE_FLAG_DISABLE_GPU_TIMEOUT
                } else {
                    D3D12_COMMAND_QUEUE_FLAG_NONE
                },
                NodeMask: self.node_mask,
            }
        }
    }

    /// Command objects owned for the lifetime of the graphics context.
    ///
    /// Field order is drop order: the list goes before the allocator backing it.
    pub struct CommandObjects {
        pub list: ID3D12GraphicsCommandList,
        pub allocator: ID3D12CommandAllocator,
        pub queue: ID3D12CommandQueue,
    }

    impl CommandObjects {
        /// Create allocator, list and queue of the configured kind.
        ///
        /// The list is created in the recording state and closed right away so
        /// the first user can `Reset` it.
        pub fn create(device: &ID3D12Device, config: &CommandQueueConfig) -> ProtoResult<Self> {
            let kind = config.kind.to_d3d();

            unsafe {
                let allocator: ID3D12CommandAllocator = device
                    .CreateCommandAllocator(kind)
                    .map_err(step_err(ProtoError::CommandError, "CreateCommandAllocator"))?;

                let list: ID3D12GraphicsCommandList = device
                    .CreateCommandList(config.node_mask, kind, &allocator, None)
                    .map_err(step_err(ProtoError::CommandError, "CreateCommandList"))?;
                list.Close()
                    .map_err(step_err(ProtoError::CommandError, "ID3D12GraphicsCommandList::Close"))?;

                let queue: ID3D12CommandQueue = device
                    .CreateCommandQueue(&config.to_desc())
                    .map_err(step_err(ProtoError::CommandError, "CreateCommandQueue"))?;

                log::info!(
                    "[CommandObjects::create] {:?} allocator, list and queue ready (priority {:?})",
                    config.kind,
                    config.priority
                );

                Ok(Self {
                    list,
                    allocator,
                    queue,
                })
            }
        }
    }
}
