/*
 * @Author       : 老董
 * @Date         : 2026-08-30
 * @Description  : 参数初始化算子：XavierFill / ConstantFill
 *
 * XavierFill沿用caffe2语义：在±sqrt(3/fan_in)上均匀采样，
 * 其中fan_in = 元素总数 / shape[0]。
 */

use super::super::error::WorkspaceError;
use super::super::net::OperatorDef;
use super::super::Blob;
use ndarray::IxDyn;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::Rng;

pub(super) fn xavier_fill(
    op: &OperatorDef,
    rng: &mut Option<StdRng>,
) -> Result<Blob, WorkspaceError> {
    let shape = required_shape(op)?;
    let size: usize = shape.iter().product();
    let fan_in = size / shape[0];
    if fan_in == 0 {
        return Err(WorkspaceError::InvalidOpArg {
            op: op.op_type.clone(),
            message: format!("shape{shape:?}的fan_in为0"),
        });
    }
    let scale = (3.0 / fan_in as f32).sqrt();

    let dist = Uniform::new(-scale, scale);
    let data: Vec<f32> = match rng {
        Some(r) => sample_n(size, &dist, r),
        None => sample_n(size, &dist, &mut rand::thread_rng()),
    };
    Blob::from_shape_vec(IxDyn(&shape), data).map_err(|_| WorkspaceError::InvalidOpArg {
        op: op.op_type.clone(),
        message: format!("shape{shape:?}与生成的数据长度不符"),
    })
}

pub(super) fn constant_fill(op: &OperatorDef) -> Result<Blob, WorkspaceError> {
    let shape = required_shape(op)?;
    let value = op.args.get_f32_or("value", 0.0);
    Ok(Blob::from_elem(IxDyn(&shape), value))
}

fn required_shape(op: &OperatorDef) -> Result<Vec<usize>, WorkspaceError> {
    let shape = op
        .args
        .get_shape("shape")
        .ok_or_else(|| WorkspaceError::MissingOpArg {
            op: op.op_type.clone(),
            key: "shape".to_string(),
        })?;
    if shape.is_empty() || shape.contains(&0) {
        return Err(WorkspaceError::InvalidOpArg {
            op: op.op_type.clone(),
            message: format!("shape{shape:?}不合法（不能为空或含0）"),
        });
    }
    Ok(shape)
}

fn sample_n<R: Rng>(n: usize, dist: &Uniform<f32>, rng: &mut R) -> Vec<f32> {
    (0..n).map(|_| dist.sample(rng)).collect()
}
