/*
 * @Author       : 老董
 * @Date         : 2026-08-30
 * @Description  : 前向算子内核与分发
 *
 * 只提供前向计算（无autograd、无GPU）。矩阵乘等数值运算委托给ndarray。
 */

mod activations;
mod conv;
mod dropout;
mod fc;
mod fill;

use super::error::WorkspaceError;
use super::net::OperatorDef;
use super::{Blob, Workspace};

/// 按op_type分发执行单个算子，结果写回工作区
pub(super) fn execute(ws: &mut Workspace, op: &OperatorDef) -> Result<(), WorkspaceError> {
    // 先取出输入的拷贝，避免与blob表/RNG的可变借用冲突
    let inputs: Vec<Blob> = op
        .inputs
        .iter()
        .map(|name| ws.fetch(name).cloned())
        .collect::<Result<_, _>>()?;

    let output = match op.op_type.as_str() {
        "Relu" => activations::relu(op, &inputs)?,
        "Tanh" => activations::tanh(op, &inputs)?,
        "Dropout" => dropout::dropout(op, &inputs, &mut ws.rng)?,
        "FC" => fc::fc(op, &inputs)?,
        "Conv" => conv::conv(op, &inputs)?,
        "XavierFill" => fill::xavier_fill(op, &mut ws.rng)?,
        "ConstantFill" => fill::constant_fill(op)?,
        other => return Err(WorkspaceError::UnknownOp(other.to_string())),
    };

    let out_name = op.outputs.first().ok_or_else(|| WorkspaceError::InvalidOpArg {
        op: op.op_type.clone(),
        message: "算子没有输出blob".to_string(),
    })?;
    ws.blobs.insert(out_name.clone(), output);
    Ok(())
}

/// 校验输入个数
fn expect_inputs(op: &OperatorDef, expected: usize, got: &[Blob]) -> Result<(), WorkspaceError> {
    if got.len() == expected {
        Ok(())
    } else {
        Err(WorkspaceError::WrongInputCount {
            op: op.op_type.clone(),
            expected,
            got: got.len(),
        })
    }
}
