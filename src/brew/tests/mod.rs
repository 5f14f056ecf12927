
use crate::args::{ArgValue, Args};
use crate::errors::BrewError;
use crate::model::ModelHelper;

/// 测试用自定义helper：原样返回val（默认-1）
pub(super) fn myhelper(_model: &mut ModelHelper, args: &Args) -> Result<ArgValue, BrewError> {
    Ok(ArgValue::Int(args.get_int_or("val", -1)))
}

pub(super) fn myhelper_defaults() -> Args {
    Args::new().with("val", -1)
}
