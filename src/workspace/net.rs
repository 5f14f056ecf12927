/*
 * @Author       : 老董
 * @Date         : 2026-08-30
 * @Description  : 网络定义（NetDef）与算子定义（OperatorDef）
 *
 * NetDef只是算子的有序列表，本身不参与执行；
 * 执行由`Workspace::run_net_once`按顺序解释。
 */

use crate::args::Args;

/// 单个算子定义：类型名 + 输入/输出blob名 + 关键字参数
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorDef {
    pub op_type: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub args: Args,
}

/// 网络定义：命名的算子有序列表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetDef {
    name: String,
    ops: Vec<OperatorDef>,
}

impl NetDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ops: Vec::new(),
        }
    }

    /// 追加一个算子，返回其第一个输出blob名
    pub fn define_op(
        &mut self,
        op_type: &str,
        inputs: &[&str],
        outputs: &[&str],
        args: Args,
    ) -> String {
        self.ops.push(OperatorDef {
            op_type: op_type.to_string(),
            inputs: inputs.iter().map(|s| (*s).to_string()).collect(),
            outputs: outputs.iter().map(|s| (*s).to_string()).collect(),
            args,
        });
        outputs.first().map_or_else(String::new, |s| (*s).to_string())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ops(&self) -> &[OperatorDef] {
        &self.ops
    }

    pub fn ops_count(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
