/*
 * @Author       : 老董
 * @Date         : 2026-08-30
 * @Description  : FC（全连接）算子：Y = X · Wᵀ + b
 *
 * 权重布局沿用caffe2：W为[N, K]，X为[M, K]（高维输入先压平为二维）。
 */

use super::super::error::WorkspaceError;
use super::super::net::OperatorDef;
use super::super::Blob;
use super::expect_inputs;
use ndarray::{Ix1, Ix2};

pub(super) fn fc(op: &OperatorDef, inputs: &[Blob]) -> Result<Blob, WorkspaceError> {
    expect_inputs(op, 3, inputs)?;
    let x = &inputs[0];
    let w = &inputs[1];
    let b = &inputs[2];

    if x.ndim() < 2 {
        return Err(WorkspaceError::DimensionMismatch {
            op: op.op_type.clone(),
            expected: 2,
            got: x.ndim(),
        });
    }
    // 首维为batch，其余维压平（batch为0时输出为空的[0, N]）
    let m = x.shape()[0];
    let k: usize = x.shape()[1..].iter().product();
    let x2 = x
        .clone()
        .into_shape((m, k))
        .map_err(|_| WorkspaceError::ShapeMismatch {
            op: op.op_type.clone(),
            expected: vec![m, k],
            got: x.shape().to_vec(),
        })?;

    let w2 = w
        .clone()
        .into_dimensionality::<Ix2>()
        .map_err(|_| WorkspaceError::DimensionMismatch {
            op: op.op_type.clone(),
            expected: 2,
            got: w.ndim(),
        })?;
    let n = w2.nrows();
    if w2.ncols() != k {
        return Err(WorkspaceError::ShapeMismatch {
            op: op.op_type.clone(),
            expected: vec![n, k],
            got: w2.shape().to_vec(),
        });
    }

    let b1 = b
        .clone()
        .into_dimensionality::<Ix1>()
        .map_err(|_| WorkspaceError::DimensionMismatch {
            op: op.op_type.clone(),
            expected: 1,
            got: b.ndim(),
        })?;
    if b1.len() != n {
        return Err(WorkspaceError::ShapeMismatch {
            op: op.op_type.clone(),
            expected: vec![n],
            got: b1.shape().to_vec(),
        });
    }

    let y = x2.dot(&w2.t()) + &b1;
    Ok(y.into_dyn())
}
