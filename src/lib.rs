//! # Only Brew
//!
//! `only_brew`项目旨在用纯rust仿造[caffe2](https://caffe2.ai)的`brew`/`ModelHelper`
//! 模型构建便捷层：辅助函数（helper）注册与分发、嵌套的arg scope默认参数覆盖机制、
//! 带层级命名空间的参数簿记，以及一个执行网络定义的极简eager工作区（workspace）。
//!
//! 张量存储与矩阵运算委托给[ndarray](https://docs.rs/ndarray)，本crate不实现
//! 张量库、自动求导或GPU算子。

pub mod args;
pub mod brew;
pub mod errors;
pub mod model;
pub mod scope;
pub mod workspace;
