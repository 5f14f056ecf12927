/*
 * @Author       : 老董
 * @Date         : 2026-08-30
 * @Description  : Dropout算子（训练态按比例置零并放大存活元素；测试态恒等）
 */

use super::super::error::WorkspaceError;
use super::super::net::OperatorDef;
use super::super::Blob;
use super::expect_inputs;
use rand::rngs::StdRng;
use rand::Rng;

pub(super) fn dropout(
    op: &OperatorDef,
    inputs: &[Blob],
    rng: &mut Option<StdRng>,
) -> Result<Blob, WorkspaceError> {
    expect_inputs(op, 1, inputs)?;
    let ratio = op.args.get_f32_or("ratio", 0.5);
    let is_test = op.args.get_bool_or("is_test", false);

    if !(0.0..1.0).contains(&ratio) {
        return Err(WorkspaceError::InvalidOpArg {
            op: op.op_type.clone(),
            message: format!("ratio须在[0, 1)内，实际为{ratio}"),
        });
    }
    if is_test {
        return Ok(inputs[0].clone());
    }

    match rng {
        Some(r) => Ok(apply(&inputs[0], ratio, r)),
        None => Ok(apply(&inputs[0], ratio, &mut rand::thread_rng())),
    }
}

/// 存活元素放大1/(1-ratio)，保证期望不变
fn apply<R: Rng>(x: &Blob, ratio: f32, rng: &mut R) -> Blob {
    let scale = 1.0 / (1.0 - ratio);
    x.mapv(|v| {
        if rng.r#gen::<f32>() < ratio {
            0.0
        } else {
            v * scale
        }
    })
}
