/*
 * @Author       : 老董
 * @Date         : 2026-08-30
 * @Description  : Workspace模块：命名blob存储 + 网络的eager执行
 *
 * 公开 API：
 * - `Workspace`: blob存取（feed/fetch）与`run_net_once`
 * - `NetDef`/`OperatorDef`: 网络与算子定义
 * - `WorkspaceError`: 错误类型
 */

mod error;
mod net;
mod ops;

pub use error::WorkspaceError;
pub use net::{NetDef, OperatorDef};

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

/// blob即动态维度的f32张量（数值运算委托给ndarray）
pub type Blob = ndarray::ArrayD<f32>;

/// 工作区：可变的全局blob表，网络在其上按序执行
///
/// # 设计原则
/// - 显式上下文对象，由调用方持有并以引用传入，不做进程级全局量
/// - 随机性集中于`rng`：带种子则确定性执行，否则退回thread_rng
pub struct Workspace {
    blobs: HashMap<String, Blob>,
    rng: Option<StdRng>,
}

impl Workspace {
    // ==================== 创建 ====================

    pub fn new() -> Self {
        Self {
            blobs: HashMap::new(),
            rng: None,
        }
    }

    /// 创建带固定种子的工作区（确保可重复性）
    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            blobs: HashMap::new(),
            rng: Some(StdRng::seed_from_u64(seed)),
        }
    }

    /// 设置/重置随机种子
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = Some(StdRng::seed_from_u64(seed));
    }

    /// 是否有固定种子
    pub const fn has_seed(&self) -> bool {
        self.rng.is_some()
    }

    // ==================== blob存取 ====================

    /// 写入命名blob（已存在则覆盖）
    pub fn feed(&mut self, name: &str, blob: Blob) {
        self.blobs.insert(name.to_string(), blob);
    }

    /// 读取命名blob
    pub fn fetch(&self, name: &str) -> Result<&Blob, WorkspaceError> {
        self.blobs
            .get(name)
            .ok_or_else(|| WorkspaceError::BlobNotFound(name.to_string()))
    }

    pub fn has_blob(&self, name: &str) -> bool {
        self.blobs.contains_key(name)
    }

    pub fn blob_names(&self) -> Vec<String> {
        self.blobs.keys().cloned().collect()
    }

    pub fn blobs_count(&self) -> usize {
        self.blobs.len()
    }

    /// 清空所有blob（种子保留）
    pub fn reset(&mut self) {
        self.blobs.clear();
    }

    // ==================== 执行 ====================

    /// 按序执行网络中的全部算子，输出写回blob表
    pub fn run_net_once(&mut self, net: &NetDef) -> Result<(), WorkspaceError> {
        for op in net.ops() {
            ops::execute(self, op)?;
        }
        Ok(())
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
