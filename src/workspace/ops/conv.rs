/*
 * @Author       : 老董
 * @Date         : 2026-08-30
 * @Description  : Conv算子（直接法二维卷积，支持NCHW/NHWC两种排布）
 *
 * 输出边长 = (输入边长 + 2*pad - kernel) / stride + 1。
 * 权重布局沿用caffe2：NCHW为[F, C, k, k]，NHWC为[F, k, k, C]。
 */

use super::super::error::WorkspaceError;
use super::super::net::OperatorDef;
use super::super::Blob;
use super::expect_inputs;
use ndarray::{Array1, Array4, Ix1, Ix4};

pub(super) fn conv(op: &OperatorDef, inputs: &[Blob]) -> Result<Blob, WorkspaceError> {
    expect_inputs(op, 3, inputs)?;

    let kernel = op
        .args
        .get_int("kernel")
        .ok_or_else(|| WorkspaceError::MissingOpArg {
            op: op.op_type.clone(),
            key: "kernel".to_string(),
        })?;
    let stride = op.args.get_int_or("stride", 1);
    let pad = op.args.get_int_or("pad", 0);
    // 先在i64上校验，负数直接转usize会回绕成巨大值
    if kernel <= 0 || stride <= 0 || pad < 0 {
        return Err(WorkspaceError::InvalidOpArg {
            op: op.op_type.clone(),
            message: format!(
                "kernel与stride须为正数、pad须非负（kernel={kernel}，stride={stride}，pad={pad}）"
            ),
        });
    }
    let kernel = kernel as usize;
    let stride = stride as usize;
    let pad = pad as usize;

    let x4 = to_4d(op, &inputs[0])?;
    let w4 = to_4d(op, &inputs[1])?;
    let b1 = inputs[2]
        .clone()
        .into_dimensionality::<Ix1>()
        .map_err(|_| WorkspaceError::DimensionMismatch {
            op: op.op_type.clone(),
            expected: 1,
            got: inputs[2].ndim(),
        })?;

    match op.args.get_str_or("order", "NCHW") {
        "NCHW" => conv_nchw(op, &x4, &w4, &b1, kernel, stride, pad),
        "NHWC" => conv_nhwc(op, &x4, &w4, &b1, kernel, stride, pad),
        other => Err(WorkspaceError::InvalidOpArg {
            op: op.op_type.clone(),
            message: format!("未知数据排布`{other}`（只支持NCHW/NHWC）"),
        }),
    }
}

fn to_4d(op: &OperatorDef, blob: &Blob) -> Result<Array4<f32>, WorkspaceError> {
    blob.clone()
        .into_dimensionality::<Ix4>()
        .map_err(|_| WorkspaceError::DimensionMismatch {
            op: op.op_type.clone(),
            expected: 4,
            got: blob.ndim(),
        })
}

fn out_len(op: &OperatorDef, input: usize, kernel: usize, stride: usize, pad: usize) -> Result<usize, WorkspaceError> {
    let padded = input + 2 * pad;
    if padded < kernel {
        return Err(WorkspaceError::InvalidOpArg {
            op: op.op_type.clone(),
            message: format!("卷积核{kernel}大于补零后的输入边长{padded}"),
        });
    }
    Ok((padded - kernel) / stride + 1)
}

fn conv_nchw(
    op: &OperatorDef,
    x: &Array4<f32>,
    w: &Array4<f32>,
    b: &Array1<f32>,
    kernel: usize,
    stride: usize,
    pad: usize,
) -> Result<Blob, WorkspaceError> {
    let (n, c_in, h, w_in) = x.dim();
    let (c_out, wc, kh, kw) = w.dim();
    if wc != c_in || kh != kernel || kw != kernel {
        return Err(WorkspaceError::ShapeMismatch {
            op: op.op_type.clone(),
            expected: vec![c_out, c_in, kernel, kernel],
            got: w.shape().to_vec(),
        });
    }
    if b.len() != c_out {
        return Err(WorkspaceError::ShapeMismatch {
            op: op.op_type.clone(),
            expected: vec![c_out],
            got: b.shape().to_vec(),
        });
    }

    let h_out = out_len(op, h, kernel, stride, pad)?;
    let w_out = out_len(op, w_in, kernel, stride, pad)?;
    let mut out = Array4::<f32>::zeros((n, c_out, h_out, w_out));
    for bi in 0..n {
        for of in 0..c_out {
            for oh in 0..h_out {
                for ow in 0..w_out {
                    let mut acc = b[of];
                    for ci in 0..c_in {
                        for ki in 0..kernel {
                            for kj in 0..kernel {
                                let ih = (oh * stride + ki) as isize - pad as isize;
                                let iw = (ow * stride + kj) as isize - pad as isize;
                                if ih >= 0
                                    && iw >= 0
                                    && (ih as usize) < h
                                    && (iw as usize) < w_in
                                {
                                    acc += x[[bi, ci, ih as usize, iw as usize]]
                                        * w[[of, ci, ki, kj]];
                                }
                            }
                        }
                    }
                    out[[bi, of, oh, ow]] = acc;
                }
            }
        }
    }
    Ok(out.into_dyn())
}

fn conv_nhwc(
    op: &OperatorDef,
    x: &Array4<f32>,
    w: &Array4<f32>,
    b: &Array1<f32>,
    kernel: usize,
    stride: usize,
    pad: usize,
) -> Result<Blob, WorkspaceError> {
    let (n, h, w_in, c_in) = x.dim();
    let (c_out, kh, kw, wc) = w.dim();
    if wc != c_in || kh != kernel || kw != kernel {
        return Err(WorkspaceError::ShapeMismatch {
            op: op.op_type.clone(),
            expected: vec![c_out, kernel, kernel, c_in],
            got: w.shape().to_vec(),
        });
    }
    if b.len() != c_out {
        return Err(WorkspaceError::ShapeMismatch {
            op: op.op_type.clone(),
            expected: vec![c_out],
            got: b.shape().to_vec(),
        });
    }

    let h_out = out_len(op, h, kernel, stride, pad)?;
    let w_out = out_len(op, w_in, kernel, stride, pad)?;
    let mut out = Array4::<f32>::zeros((n, h_out, w_out, c_out));
    for bi in 0..n {
        for oh in 0..h_out {
            for ow in 0..w_out {
                for of in 0..c_out {
                    let mut acc = b[of];
                    for ki in 0..kernel {
                        for kj in 0..kernel {
                            for ci in 0..c_in {
                                let ih = (oh * stride + ki) as isize - pad as isize;
                                let iw = (ow * stride + kj) as isize - pad as isize;
                                if ih >= 0
                                    && iw >= 0
                                    && (ih as usize) < h
                                    && (iw as usize) < w_in
                                {
                                    acc += x[[bi, ih as usize, iw as usize, ci]]
                                        * w[[of, ki, kj, ci]];
                                }
                            }
                        }
                    }
                    out[[bi, oh, ow, of]] = acc;
                }
            }
        }
    }
    Ok(out.into_dyn())
}
