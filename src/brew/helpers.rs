/*
 * @Author       : 老董
 * @Date         : 2026-08-30
 * @Description  : 内建helper（dropout/relu/tanh/fc/conv）及其类型化包装
 *
 * 每个helper向`model.net`追加前向算子、向`model.param_init_net`追加
 * 参数初始化算子，并通过`add_parameter`登记新建参数，返回输出blob名。
 */

use super::{Brew, Helper};
use crate::args::{ArgValue, Args};
use crate::errors::BrewError;
use crate::model::{ModelHelper, ParamTag};

pub(super) fn builtin_helpers() -> Vec<Helper> {
    vec![
        Helper::new(
            "dropout",
            Args::new().with("ratio", 0.5_f32).with("is_test", false),
            dropout_helper,
        ),
        Helper::new("relu", Args::new(), relu_helper),
        Helper::new("tanh", Args::new(), tanh_helper),
        Helper::new(
            "fc",
            Args::new()
                .with("weight_init", "XavierFill")
                .with("bias_init", "ConstantFill"),
            fc_helper,
        ),
        Helper::new(
            "conv",
            Args::new()
                .with("stride", 1)
                .with("pad", 0)
                .with("order", "NCHW")
                .with("weight_init", "XavierFill")
                .with("bias_init", "ConstantFill"),
            conv_helper,
        ),
    ]
}

// ==================== kwargs提取 ====================

fn require_str<'a>(args: &'a Args, helper: &str, key: &str) -> Result<&'a str, BrewError> {
    match args.get(key) {
        None => Err(BrewError::MissingArg {
            helper: helper.to_string(),
            key: key.to_string(),
        }),
        Some(value) => value.as_str().ok_or_else(|| BrewError::InvalidArg {
            helper: helper.to_string(),
            key: key.to_string(),
            message: format!("期望字符串，实际为{value:?}"),
        }),
    }
}

fn require_usize(args: &Args, helper: &str, key: &str) -> Result<usize, BrewError> {
    match args.get(key) {
        None => Err(BrewError::MissingArg {
            helper: helper.to_string(),
            key: key.to_string(),
        }),
        Some(value) => match value.as_int() {
            Some(v) if v > 0 => Ok(v as usize),
            _ => Err(BrewError::InvalidArg {
                helper: helper.to_string(),
                key: key.to_string(),
                message: format!("期望正整数，实际为{value:?}"),
            }),
        },
    }
}

// ==================== helper函数体 ====================

fn dropout_helper(model: &mut ModelHelper, args: &Args) -> Result<ArgValue, BrewError> {
    let blob_in = require_str(args, "dropout", "blob_in")?;
    let blob_out = require_str(args, "dropout", "blob_out")?;
    let op_args = Args::new()
        .with("ratio", args.get_f32_or("ratio", 0.5))
        .with("is_test", args.get_bool_or("is_test", false));
    let out = model
        .net_mut()
        .define_op("Dropout", &[blob_in], &[blob_out], op_args);
    Ok(ArgValue::Str(out))
}

fn relu_helper(model: &mut ModelHelper, args: &Args) -> Result<ArgValue, BrewError> {
    let blob_in = require_str(args, "relu", "blob_in")?;
    let blob_out = require_str(args, "relu", "blob_out")?;
    let out = model
        .net_mut()
        .define_op("Relu", &[blob_in], &[blob_out], Args::new());
    Ok(ArgValue::Str(out))
}

fn tanh_helper(model: &mut ModelHelper, args: &Args) -> Result<ArgValue, BrewError> {
    let blob_in = require_str(args, "tanh", "blob_in")?;
    let blob_out = require_str(args, "tanh", "blob_out")?;
    let out = model
        .net_mut()
        .define_op("Tanh", &[blob_in], &[blob_out], Args::new());
    Ok(ArgValue::Str(out))
}

/// 全连接：权重`{out}_w`为[dim_out, dim_in]（caffe2布局），偏置`{out}_b`为[dim_out]
fn fc_helper(model: &mut ModelHelper, args: &Args) -> Result<ArgValue, BrewError> {
    let blob_in = require_str(args, "fc", "blob_in")?.to_string();
    let blob_out = require_str(args, "fc", "blob_out")?.to_string();
    let dim_in = require_usize(args, "fc", "dim_in")?;
    let dim_out = require_usize(args, "fc", "dim_out")?;
    let weight_init = args.get_str_or("weight_init", "XavierFill").to_string();
    let bias_init = args.get_str_or("bias_init", "ConstantFill").to_string();

    let w_name = model.add_parameter(&format!("{blob_out}_w"), ParamTag::Trainable);
    let b_name = model.add_parameter(&format!("{blob_out}_b"), ParamTag::Trainable);

    model.param_init_net_mut().define_op(
        &weight_init,
        &[],
        &[&w_name],
        Args::new().with("shape", vec![dim_out as i64, dim_in as i64]),
    );
    model.param_init_net_mut().define_op(
        &bias_init,
        &[],
        &[&b_name],
        Args::new().with("shape", vec![dim_out as i64]),
    );

    let out = model.net_mut().define_op(
        "FC",
        &[&blob_in, &w_name, &b_name],
        &[&blob_out],
        Args::new(),
    );
    Ok(ArgValue::Str(out))
}

/// 卷积：权重布局随order而变——NCHW为[F, C, k, k]，NHWC为[F, k, k, C]
fn conv_helper(model: &mut ModelHelper, args: &Args) -> Result<ArgValue, BrewError> {
    let blob_in = require_str(args, "conv", "blob_in")?.to_string();
    let blob_out = require_str(args, "conv", "blob_out")?.to_string();
    let dim_in = require_usize(args, "conv", "dim_in")?;
    let dim_out = require_usize(args, "conv", "dim_out")?;
    let kernel = require_usize(args, "conv", "kernel")?;
    let stride = args.get_int_or("stride", 1);
    let pad = args.get_int_or("pad", 0);
    let order = args.get_str_or("order", "NCHW").to_string();
    let weight_init = args.get_str_or("weight_init", "XavierFill").to_string();
    let bias_init = args.get_str_or("bias_init", "ConstantFill").to_string();

    let weight_shape: Vec<i64> = match order.as_str() {
        "NCHW" => vec![dim_out as i64, dim_in as i64, kernel as i64, kernel as i64],
        "NHWC" => vec![dim_out as i64, kernel as i64, kernel as i64, dim_in as i64],
        other => return Err(BrewError::UnknownOrder(other.to_string())),
    };

    let w_name = model.add_parameter(&format!("{blob_out}_w"), ParamTag::Trainable);
    let b_name = model.add_parameter(&format!("{blob_out}_b"), ParamTag::Trainable);

    model.param_init_net_mut().define_op(
        &weight_init,
        &[],
        &[&w_name],
        Args::new().with("shape", weight_shape),
    );
    model.param_init_net_mut().define_op(
        &bias_init,
        &[],
        &[&b_name],
        Args::new().with("shape", vec![dim_out as i64]),
    );

    let op_args = Args::new()
        .with("kernel", kernel)
        .with("stride", stride)
        .with("pad", pad)
        .with("order", order.as_str());
    let out = model.net_mut().define_op(
        "Conv",
        &[&blob_in, &w_name, &b_name],
        &[&blob_out],
        op_args,
    );
    Ok(ArgValue::Str(out))
}

// ==================== 类型化包装 ====================

fn expect_blob_name(helper: &str, value: ArgValue) -> Result<String, BrewError> {
    match value {
        ArgValue::Str(s) => Ok(s),
        other => Err(BrewError::InvalidArg {
            helper: helper.to_string(),
            key: "返回值".to_string(),
            message: format!("期望blob名，实际为{other:?}"),
        }),
    }
}

/// `brew::dropout(model, "x", "out")`风格的便捷入口；`extra`里可带ratio等kwargs
pub fn dropout(
    brew: &Brew,
    model: &mut ModelHelper,
    blob_in: &str,
    blob_out: &str,
    extra: Args,
) -> Result<String, BrewError> {
    let mut args = extra;
    args.set("blob_in", blob_in);
    args.set("blob_out", blob_out);
    expect_blob_name("dropout", brew.run("dropout", model, args)?)
}

pub fn relu(
    brew: &Brew,
    model: &mut ModelHelper,
    blob_in: &str,
    blob_out: &str,
    extra: Args,
) -> Result<String, BrewError> {
    let mut args = extra;
    args.set("blob_in", blob_in);
    args.set("blob_out", blob_out);
    expect_blob_name("relu", brew.run("relu", model, args)?)
}

pub fn tanh(
    brew: &Brew,
    model: &mut ModelHelper,
    blob_in: &str,
    blob_out: &str,
    extra: Args,
) -> Result<String, BrewError> {
    let mut args = extra;
    args.set("blob_in", blob_in);
    args.set("blob_out", blob_out);
    expect_blob_name("tanh", brew.run("tanh", model, args)?)
}

pub fn fc(
    brew: &Brew,
    model: &mut ModelHelper,
    blob_in: &str,
    blob_out: &str,
    dim_in: usize,
    dim_out: usize,
    extra: Args,
) -> Result<String, BrewError> {
    let mut args = extra;
    args.set("blob_in", blob_in);
    args.set("blob_out", blob_out);
    args.set("dim_in", dim_in);
    args.set("dim_out", dim_out);
    expect_blob_name("fc", brew.run("fc", model, args)?)
}

pub fn conv(
    brew: &Brew,
    model: &mut ModelHelper,
    blob_in: &str,
    blob_out: &str,
    dim_in: usize,
    dim_out: usize,
    kernel: usize,
    extra: Args,
) -> Result<String, BrewError> {
    let mut args = extra;
    args.set("blob_in", blob_in);
    args.set("blob_out", blob_out);
    args.set("dim_in", dim_in);
    args.set("dim_out", dim_out);
    args.set("kernel", kernel);
    expect_blob_name("conv", brew.run("conv", model, args)?)
}
