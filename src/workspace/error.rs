/*
 * @Author       : 老董
 * @Date         : 2026-08-30
 * @Description  : Workspace模块的错误类型
 */

use thiserror::Error;

/// 工作区操作（blob存取、网络执行）错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum WorkspaceError {
    #[error("blob`{0}`不存在")]
    BlobNotFound(String),
    #[error("未知算子类型：`{0}`")]
    UnknownOp(String),
    #[error("算子`{op}`缺少必需的参数`{key}`")]
    MissingOpArg { op: String, key: String },
    #[error("算子`{op}`的参数不合法：{message}")]
    InvalidOpArg { op: String, message: String },
    #[error("算子`{op}`期望{expected}个输入，实际{got}个")]
    WrongInputCount {
        op: String,
        expected: usize,
        got: usize,
    },
    #[error("算子`{op}`形状不匹配：期望{expected:?}，实际{got:?}")]
    ShapeMismatch {
        op: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    #[error("算子`{op}`期望{expected}维输入，实际{got}维")]
    DimensionMismatch {
        op: String,
        expected: usize,
        got: usize,
    },
}
