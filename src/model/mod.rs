/*
 * @Author       : 老董
 * @Date         : 2026-08-30
 * @Description  : ModelHelper：网络定义与参数簿记的载体
 *
 * 一个模型持有两个网络定义（param_init_net负责参数初始化，net负责前向），
 * 以及按注册顺序记录的参数清单。参数名在注册时就用当时的命名空间前缀
 * 限定，事后进入/退出scope不影响已注册的名字。
 */

use crate::args::Args;
use crate::errors::BrewError;
use crate::scope::NameScope;
use crate::workspace::NetDef;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

// ==================== 参数标签 ====================

/// 参数标签：可训练参数 vs 派生（非训练）参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamTag {
    /// 由优化器更新的参数（权重、偏置等）
    Trainable,
    /// 跟踪但不参与优化的派生量（如batch-norm统计量）
    Computed,
}

impl ParamTag {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trainable => "trainable",
            Self::Computed => "computed",
        }
    }
}

impl FromStr for ParamTag {
    type Err = BrewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trainable" => Ok(Self::Trainable),
            "computed" => Ok(Self::Computed),
            other => Err(BrewError::InvalidParamTag(other.to_string())),
        }
    }
}

/// 单条参数记录：完整限定名 + 标签
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamRecord {
    pub name: String,
    pub tag: ParamTag,
}

// ==================== ModelHelper ====================

/// 模型辅助对象
///
/// # 设计原则
/// - 显式上下文对象：brew的helper向其追加算子与参数，不依赖进程级全局量
/// - `arg_scope`是模型级默认kwargs，优先级低于brew的scope覆盖帧
pub struct ModelHelper {
    name: String,
    net: NetDef,
    param_init_net: NetDef,
    params: Vec<ParamRecord>,
    arg_scope: Args,
    scope: NameScope,
}

impl ModelHelper {
    // ==================== 创建 ====================

    pub fn new(name: &str) -> Self {
        Self::with_arg_scope(name, Args::new())
    }

    /// 创建带模型级默认kwargs的模型（如`order: "NHWC"`）
    pub fn with_arg_scope(name: &str, arg_scope: Args) -> Self {
        Self {
            name: name.to_string(),
            net: NetDef::new(&format!("{name}_net")),
            param_init_net: NetDef::new(&format!("{name}_init")),
            params: Vec::new(),
            arg_scope,
            scope: NameScope::new(),
        }
    }

    // ==================== 基础访问器 ====================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn net(&self) -> &NetDef {
        &self.net
    }

    pub fn net_mut(&mut self) -> &mut NetDef {
        &mut self.net
    }

    pub fn param_init_net(&self) -> &NetDef {
        &self.param_init_net
    }

    pub fn param_init_net_mut(&mut self) -> &mut NetDef {
        &mut self.param_init_net
    }

    pub fn arg_scope(&self) -> &Args {
        &self.arg_scope
    }

    /// 模型的命名空间句柄（Clone语义，共享同一段栈）
    pub fn scope(&self) -> NameScope {
        self.scope.clone()
    }

    pub fn params(&self) -> &[ParamRecord] {
        &self.params
    }

    // ==================== 参数簿记 ====================

    /// 注册一个参数，名字用**当前**命名空间前缀限定，返回限定后的完整名
    ///
    /// 重复注册同名参数是允许的（由`validate`检查），记录按注册顺序保留。
    pub fn add_parameter(&mut self, name: &str, tag: ParamTag) -> String {
        let qualified = self.scope.qualify(name);
        self.params.push(ParamRecord {
            name: qualified.clone(),
            tag,
        });
        qualified
    }

    /// 可训练参数的有序去重清单，按前缀过滤
    ///
    /// - `None`：只看**当前**命名空间
    /// - `Some("")`：所有命名空间
    /// - `Some(p)`：字面前缀匹配（`"c"`与`"c/"`等价，`"c"`不会匹配`"cx/..."`）
    pub fn get_params(&self, prefix: Option<&str>) -> Vec<String> {
        self.collect(Some(ParamTag::Trainable), prefix)
    }

    /// 派生参数的有序去重清单，前缀语义同`get_params`
    pub fn get_computed_params(&self, prefix: Option<&str>) -> Vec<String> {
        self.collect(Some(ParamTag::Computed), prefix)
    }

    /// 全部参数（两种标签的并集）的有序去重清单
    pub fn get_all_params(&self, prefix: Option<&str>) -> Vec<String> {
        self.collect(None, prefix)
    }

    fn collect(&self, tag: Option<ParamTag>, prefix: Option<&str>) -> Vec<String> {
        // 省略前缀默认到当前scope；显式空串表示全局——两者语义不同，刻意保留
        let normalized = match prefix {
            None => self.scope.current_prefix(),
            Some("") => String::new(),
            Some(p) if p.ends_with('/') => p.to_string(),
            Some(p) => format!("{p}/"),
        };
        self.params
            .iter()
            .filter(|rec| tag.map_or(true, |t| rec.tag == t))
            .filter(|rec| rec.name.starts_with(&normalized))
            .map(|rec| rec.name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    // ==================== 校验 ====================

    /// 出现超过一次的参数名（有序）
    pub fn duplicate_params(&self) -> Vec<String> {
        let mut counts = BTreeMap::<&str, usize>::new();
        for rec in &self.params {
            *counts.entry(rec.name.as_str()).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .filter(|&(_, n)| n > 1)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// 校验参数清单无重复
    pub fn validate(&self) -> Result<(), BrewError> {
        let duplicates = self.duplicate_params();
        if duplicates.is_empty() {
            Ok(())
        } else {
            Err(BrewError::DuplicateParams {
                model: self.name.clone(),
                duplicates,
            })
        }
    }
}

// ==================== 遗留CNN构造器 ====================

/// 以固定数据排布创建模型（遗留API）
#[deprecated(note = "请使用ModelHelper::with_arg_scope搭配order参数")]
pub fn cnn_model_helper(name: &str, order: &str) -> ModelHelper {
    ModelHelper::with_arg_scope(name, Args::new().with("order", order))
}
