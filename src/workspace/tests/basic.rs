/*
 * @Author       : 老董
 * @Date         : 2026-08-30
 * @Description  : Workspace基础功能（blob存取、网络定义）单元测试
 */

use crate::args::Args;
use crate::workspace::{Blob, NetDef, Workspace, WorkspaceError};
use ndarray::Array2;

/// 测试feed/fetch往返
#[test]
fn test_feed_and_fetch() -> Result<(), WorkspaceError> {
    let mut ws = Workspace::new();
    assert!(!ws.has_blob("x"));

    let x = Array2::<f32>::ones((3, 4)).into_dyn();
    ws.feed("x", x.clone());

    assert!(ws.has_blob("x"));
    assert_eq!(ws.fetch("x")?, &x);
    assert_eq!(ws.blobs_count(), 1);
    Ok(())
}

/// 测试feed覆盖已有blob
#[test]
fn test_feed_overwrites() -> Result<(), WorkspaceError> {
    let mut ws = Workspace::new();
    ws.feed("x", Blob::zeros(ndarray::IxDyn(&[2, 2])));
    ws.feed("x", Blob::from_elem(ndarray::IxDyn(&[2, 2]), 3.0));

    assert_eq!(ws.fetch("x")?[[0, 0]], 3.0);
    assert_eq!(ws.blobs_count(), 1);
    Ok(())
}

/// 测试读取不存在的blob报错
#[test]
fn test_fetch_missing_blob() {
    let ws = Workspace::new();
    assert_eq!(
        ws.fetch("nope"),
        Err(WorkspaceError::BlobNotFound("nope".to_string()))
    );
}

/// 测试reset清空blob但保留种子
#[test]
fn test_reset_keeps_seed() {
    let mut ws = Workspace::new_with_seed(42);
    ws.feed("x", Blob::zeros(ndarray::IxDyn(&[1])));
    ws.reset();

    assert_eq!(ws.blobs_count(), 0);
    assert!(ws.has_seed());
}

/// 测试define_op返回首个输出blob名并按序记账
#[test]
fn test_netdef_define_op() {
    let mut net = NetDef::new("test_net");
    assert!(net.is_empty());

    let out = net.define_op("Relu", &["x"], &["y"], Args::new());
    assert_eq!(out, "y");
    assert_eq!(net.ops_count(), 1);
    assert_eq!(net.name(), "test_net");

    net.define_op("Tanh", &["y"], &["z"], Args::new());
    assert_eq!(net.ops()[1].op_type, "Tanh");
    assert_eq!(net.ops()[1].inputs, vec!["y".to_string()]);
}

/// 测试执行未知算子报错
#[test]
fn test_run_unknown_op() {
    let mut ws = Workspace::new();
    let mut net = NetDef::new("bad_net");
    net.define_op("FrobnicateGrad", &[], &["y"], Args::new());

    assert_eq!(
        ws.run_net_once(&net),
        Err(WorkspaceError::UnknownOp("FrobnicateGrad".to_string()))
    );
}

/// 测试算子缺输入blob时报错
#[test]
fn test_run_with_missing_input() {
    let mut ws = Workspace::new();
    let mut net = NetDef::new("net");
    net.define_op("Relu", &["ghost"], &["y"], Args::new());

    assert_eq!(
        ws.run_net_once(&net),
        Err(WorkspaceError::BlobNotFound("ghost".to_string()))
    );
}
