/*
 * @Author       : 老董
 * @Date         : 2026-08-30
 * @Description  : brew + ModelHelper + Workspace 端到端集成测试
 *
 * 流程仿照caffe2的使用方式：feed输入 -> 用brew helper搭网络 ->
 * 先跑param_init_net再跑net -> fetch输出并校验。
 */

use approx::assert_abs_diff_eq;
use ndarray::{Array2, ArrayD, IxDyn};
use only_brew::args::Args;
use only_brew::brew::{self, Brew};
use only_brew::model::ModelHelper;
use only_brew::workspace::Workspace;
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;

type TestResult = Result<(), Box<dyn Error>>;

fn random_blob(shape: &[usize], seed: u64) -> ArrayD<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let dist = Uniform::new(-0.5_f32, 0.5);
    let n: usize = shape.iter().product();
    ArrayD::from_shape_vec(IxDyn(shape), (0..n).map(|_| rng.sample(dist)).collect())
        .expect("随机blob生成失败")
}

fn mean(blob: &ArrayD<f32>) -> f32 {
    blob.mean().unwrap()
}

/// dropout：输入全为1-p，训练态输出均值应仍接近1-p
#[test]
fn test_dropout() -> TestResult {
    let p = 0.2_f32;
    let brew = Brew::new();
    let mut ws = Workspace::new_with_seed(42);
    ws.feed("x", Array2::from_elem((100, 100), 1.0 - p).into_dyn());

    let mut model = ModelHelper::new("test_model");
    brew::dropout(&brew, &mut model, "x", "out", Args::new().with("ratio", p))?;
    ws.run_net_once(model.param_init_net())?;
    ws.run_net_once(model.net())?;

    let out = ws.fetch("out")?;
    assert!((mean(out) - (1.0 - p)).abs() < 0.05);
    Ok(())
}

/// fc：随机输入上构建并跑通一层全连接
#[test]
fn test_fc() -> TestResult {
    let (m, n, k) = (15, 15, 15);
    let brew = Brew::new();
    let mut ws = Workspace::new_with_seed(42);
    ws.feed("x", random_blob(&[m, k], 7));

    let mut model = ModelHelper::new("test_model");
    brew::fc(&brew, &mut model, "x", "out_1", k, n, Args::new())?;
    model.validate()?;
    ws.run_net_once(model.param_init_net())?;
    ws.run_net_once(model.net())?;

    assert_eq!(ws.fetch("out_1")?.shape(), &[m, n]);
    Ok(())
}

/// relu：正输入均值保持，负输入全被置零
#[test]
fn test_relu() -> TestResult {
    let brew = Brew::new();
    let mut ws = Workspace::new();
    ws.feed("xpos", Array2::from_elem((5, 5), 0.5_f32).into_dyn());
    ws.feed("xneg", Array2::from_elem((5, 5), -0.5_f32).into_dyn());

    let mut model = ModelHelper::new("test_model");
    brew::relu(&brew, &mut model, "xpos", "out_xpos", Args::new())?;
    brew::relu(&brew, &mut model, "xneg", "out_xneg", Args::new())?;
    model.validate()?;
    ws.run_net_once(model.param_init_net())?;
    ws.run_net_once(model.net())?;

    assert_abs_diff_eq!(mean(ws.fetch("out_xpos")?), 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(mean(ws.fetch("out_xneg")?), 0.0, epsilon = 1e-6);
    Ok(())
}

/// tanh：tanh(0.5) ≈ 0.46211716
#[test]
fn test_tanh() -> TestResult {
    let brew = Brew::new();
    let mut ws = Workspace::new();
    ws.feed("x", Array2::from_elem((5, 5), 0.5_f32).into_dyn());

    let mut model = ModelHelper::new("test_model");
    brew::tanh(&brew, &mut model, "x", "out_tanh", Args::new())?;
    model.validate()?;
    ws.run_net_once(model.param_init_net())?;
    ws.run_net_once(model.net())?;

    assert_abs_diff_eq!(mean(ws.fetch("out_tanh")?), 0.462_117_16, epsilon = 1e-6);
    Ok(())
}

/// 对单个helper的arg scope：stride/pad来自scope，NCHW输出(64, 64, 17, 17)
#[test]
fn test_arg_scope_single() -> TestResult {
    let brew = Brew::new();
    let mut ws = Workspace::new_with_seed(42);
    ws.feed("x", random_blob(&[64, 3, 32, 32], 11));

    let mut model = ModelHelper::new("test_model");
    {
        let _scope = brew.arg_scope(
            &["conv"],
            Args::new()
                .with("stride", 2)
                .with("pad", 2)
                .with("weight_init", "XavierFill")
                .with("bias_init", "ConstantFill"),
        )?;
        brew::conv(&brew, &mut model, "x", "out", 3, 64, 3, Args::new())?;
    }
    model.validate()?;
    ws.run_net_once(model.param_init_net())?;
    ws.run_net_once(model.net())?;

    // (32 + 2*2 - 3) / 2 + 1 = 17
    assert_eq!(ws.fetch("out")?.shape(), &[64, 64, 17, 17]);
    Ok(())
}

/// 模型级arg_scope提供order=NHWC，conv输出通道维在最后：(64, 17, 17, 64)
#[test]
fn test_model_helper_arg_scope() -> TestResult {
    let brew = Brew::new();
    let mut ws = Workspace::new_with_seed(42);
    ws.feed("x", random_blob(&[64, 32, 32, 3], 13));

    let mut model =
        ModelHelper::with_arg_scope("test_model", Args::new().with("order", "NHWC"));
    {
        let _scope = brew.arg_scope(
            &["conv"],
            Args::new().with("stride", 2).with("pad", 2),
        )?;
        brew::conv(&brew, &mut model, "x", "out", 3, 64, 3, Args::new())?;
    }
    model.validate()?;
    ws.run_net_once(model.param_init_net())?;
    ws.run_net_once(model.net())?;

    assert_eq!(ws.fetch("out")?.shape(), &[64, 17, 17, 64]);
    Ok(())
}

/// dropout测试态 + 链式helper：fc -> relu -> dropout(is_test)
#[test]
fn test_helper_chain() -> TestResult {
    let brew = Brew::new();
    let mut ws = Workspace::new_with_seed(42);
    ws.feed("x", random_blob(&[8, 16], 17));

    let mut model = ModelHelper::new("test_model");
    let fc_out = brew::fc(&brew, &mut model, "x", "fc1", 16, 4, Args::new())?;
    let relu_out = brew::relu(&brew, &mut model, &fc_out, "fc1_relu", Args::new())?;
    brew::dropout(
        &brew,
        &mut model,
        &relu_out,
        "pred",
        Args::new().with("is_test", true),
    )?;
    model.validate()?;
    ws.run_net_once(model.param_init_net())?;
    ws.run_net_once(model.net())?;

    let pred = ws.fetch("pred")?;
    assert_eq!(pred.shape(), &[8, 4]);
    // 测试态dropout恒等，relu后无负值
    assert_eq!(pred, ws.fetch("fc1_relu")?);
    assert!(pred.iter().all(|&v| v >= 0.0));
    Ok(())
}
