//! The five pipeline stages.
//!
//! Each stage is a free function over the owning [`Core`](crate::core::Core);
//! the memory stage additionally takes the bus to issue miss requests. The
//! per-tick call order is WB, MEM, EX, ID, IF.

/// Instruction fetch (IF).
pub mod fetch;
/// Decode, hazard detection, and branch resolution (ID).
pub mod decode;
/// ALU and address generation (EX).
pub mod execute;
/// Data cache access (MEM).
pub mod memory;
/// Commit (WB).
pub mod writeback;

pub use decode::decode_stage;
pub use execute::{alu_op, execute_stage};
pub use fetch::fetch_stage;
pub use memory::mem_stage;
pub use writeback::wb_stage;
