use thiserror::Error;

/// brew层（注册表、arg scope、模型参数簿记）的错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BrewError {
    #[error("辅助函数`{0}`已注册，不能重复注册")]
    HelperAlreadyRegistered(String),
    #[error("辅助函数`{0}`未注册")]
    HelperNotRegistered(String),
    #[error("辅助函数`{helper}`缺少必需的关键字参数`{key}`")]
    MissingArg { helper: String, key: String },
    #[error("辅助函数`{helper}`的关键字参数`{key}`类型不符：{message}")]
    InvalidArg {
        helper: String,
        key: String,
        message: String,
    },
    #[error("无效的参数标签：`{0}`（只支持trainable/computed）")]
    InvalidParamTag(String),
    #[error("模型`{model}`中存在重复参数：{duplicates:?}")]
    DuplicateParams {
        model: String,
        duplicates: Vec<String>,
    },
    #[error("不支持的数据排布：`{0}`（只支持NCHW/NHWC）")]
    UnknownOrder(String),
}
