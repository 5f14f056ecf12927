/*
 * @Author       : 老董
 * @Date         : 2026-08-30
 * @Description  : 逐元素激活算子：Relu / Tanh
 */

use super::super::error::WorkspaceError;
use super::super::net::OperatorDef;
use super::super::Blob;
use super::expect_inputs;

pub(super) fn relu(op: &OperatorDef, inputs: &[Blob]) -> Result<Blob, WorkspaceError> {
    expect_inputs(op, 1, inputs)?;
    Ok(inputs[0].mapv(|v| v.max(0.0)))
}

pub(super) fn tanh(op: &OperatorDef, inputs: &[Blob]) -> Result<Blob, WorkspaceError> {
    expect_inputs(op, 1, inputs)?;
    Ok(inputs[0].mapv(f32::tanh))
}
