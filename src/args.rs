/*
 * @Author       : 老董
 * @Date         : 2026-08-30
 * @Description  : 动态关键字参数（模仿python kwargs的有序字典）
 *
 * `Args`是整个crate的参数载体：helper默认值、arg scope覆盖帧、
 * 算子（OperatorDef）参数都用它表示。覆盖优先级通过`merge_from`
 * 的调用顺序实现：后合并者覆盖先合并者。
 */

use std::collections::BTreeMap;

// ==================== ArgValue ====================

/// 单个关键字参数的值
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Int(i64),
    Float(f32),
    Bool(bool),
    Str(String),
    /// 整数列表（用于shape等）
    Ints(Vec<i64>),
}

impl ArgValue {
    /// 若为字符串则返回其内容
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// 若为整数则返回其值
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ArgValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<usize> for ArgValue {
    fn from(v: usize) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f32> for ArgValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<i64>> for ArgValue {
    fn from(v: Vec<i64>) -> Self {
        Self::Ints(v)
    }
}

impl From<&[usize]> for ArgValue {
    fn from(v: &[usize]) -> Self {
        Self::Ints(v.iter().map(|&d| d as i64).collect())
    }
}

// ==================== Args ====================

/// 关键字参数集合（键有序，便于确定性遍历与调试输出）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: BTreeMap<String, ArgValue>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// builder风格：设置一个键值并返回自身
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<ArgValue>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    /// 设置一个键值（已存在则覆盖）
    pub fn set(&mut self, key: &str, value: impl Into<ArgValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// 将`other`的所有键值合并进来，`other`覆盖已有键
    pub fn merge_from(&mut self, other: &Self) {
        for (k, v) in &other.values {
            self.values.insert(k.clone(), v.clone());
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ArgValue)> {
        self.values.iter()
    }

    // ==================== 类型化getter ====================

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.values.get(key) {
            Some(ArgValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_int_or(&self, key: &str, default: i64) -> i64 {
        self.get_int(key).unwrap_or(default)
    }

    /// 浮点getter（整数值也接受，便于`ratio=1`这类写法）
    pub fn get_f32(&self, key: &str) -> Option<f32> {
        match self.values.get(key) {
            Some(ArgValue::Float(v)) => Some(*v),
            Some(ArgValue::Int(v)) => Some(*v as f32),
            _ => None,
        }
    }

    pub fn get_f32_or(&self, key: &str, default: f32) -> f32 {
        self.get_f32(key).unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(ArgValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(ArgValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn get_str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_str(key).unwrap_or(default)
    }

    /// 读取shape类参数（`Ints`转为`Vec<usize>`）
    pub fn get_shape(&self, key: &str) -> Option<Vec<usize>> {
        match self.values.get(key) {
            Some(ArgValue::Ints(v)) => Some(v.iter().map(|&d| d as usize).collect()),
            _ => None,
        }
    }
}
