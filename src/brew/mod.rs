/*
 * @Author       : 老董
 * @Date         : 2026-08-30
 * @Description  : brew模块：辅助函数（helper）注册表与arg scope覆盖机制
 *
 * 公开 API：
 * - `Brew`: 注册表句柄（register/has_helper/run/arg_scope）
 * - `Helper`/`HelperFn`: 可注册的辅助函数及其默认kwargs
 * - `ArgScopeGuard`: scope退出守卫
 * - `conv`/`fc`/`relu`/`tanh`/`dropout`: 内建helper的类型化包装
 *
 * kwargs解析优先级（后者覆盖前者）：
 * helper默认值 < 模型arg_scope < 覆盖帧（外层到内层）< 调用点显式kwargs
 */

mod helpers;

pub use helpers::{conv, dropout, fc, relu, tanh};

use crate::args::{ArgValue, Args};
use crate::errors::BrewError;
use crate::model::ModelHelper;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

// ==================== Helper ====================

/// helper函数签名：模型上下文 + 已解析的kwargs
pub type HelperFn = fn(&mut ModelHelper, &Args) -> Result<ArgValue, BrewError>;

/// 一个可注册的helper：名字 + 默认kwargs + 函数体
pub struct Helper {
    name: String,
    defaults: Args,
    func: HelperFn,
}

impl Helper {
    pub fn new(name: &str, defaults: Args, func: HelperFn) -> Self {
        Self {
            name: name.to_string(),
            defaults,
            func,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn defaults(&self) -> &Args {
        &self.defaults
    }
}

// ==================== 注册表 ====================

/// 一个激活中的覆盖帧：对哪些helper、覆盖哪些kwargs
struct ScopeFrame {
    targets: BTreeSet<String>,
    overrides: Args,
}

#[derive(Default)]
struct BrewInner {
    helpers: BTreeMap<String, Helper>,
    frames: Vec<ScopeFrame>,
}

/// brew注册表句柄
///
/// # 设计原则
/// - 是`Rc<RefCell<BrewInner>>`的薄封装，Clone语义：多个句柄共享同一注册表
/// - 显式上下文对象，由调用方持有，不做进程级全局量
/// - 覆盖帧栈严格嵌套，`ArgScopeGuard`在Drop时恢复进入前的帧栈
#[derive(Clone)]
pub struct Brew {
    inner: Rc<RefCell<BrewInner>>,
}

impl Brew {
    // ==================== 创建 ====================

    /// 创建注册表并预注册内建helper（conv/fc/relu/tanh/dropout）
    pub fn new() -> Self {
        let brew = Self::empty();
        {
            let mut inner = brew.inner.borrow_mut();
            for helper in helpers::builtin_helpers() {
                // 内建名字互不相同，直接入表
                inner.helpers.insert(helper.name.clone(), helper);
            }
        }
        brew
    }

    /// 创建不带内建helper的空注册表
    pub fn empty() -> Self {
        Self {
            inner: Rc::new(RefCell::new(BrewInner::default())),
        }
    }

    // ==================== 注册与查询 ====================

    /// 注册一个helper，名字已存在则报错
    pub fn register(&self, helper: Helper) -> Result<(), BrewError> {
        let mut inner = self.inner.borrow_mut();
        if inner.helpers.contains_key(&helper.name) {
            return Err(BrewError::HelperAlreadyRegistered(helper.name));
        }
        inner.helpers.insert(helper.name.clone(), helper);
        Ok(())
    }

    pub fn has_helper(&self, name: &str) -> bool {
        self.inner.borrow().helpers.contains_key(name)
    }

    pub fn helper_names(&self) -> Vec<String> {
        self.inner.borrow().helpers.keys().cloned().collect()
    }

    // ==================== arg scope ====================

    /// 进入一个覆盖帧：对`targets`中的每个helper生效，返回退出守卫
    ///
    /// 帧栈严格嵌套，内层（后进入）帧的覆盖优先；守卫Drop时恢复先前可见性，
    /// 全部退出后解析行为与从未进入scope时一致。
    pub fn arg_scope(
        &self,
        targets: &[&str],
        overrides: Args,
    ) -> Result<ArgScopeGuard, BrewError> {
        let mut inner = self.inner.borrow_mut();
        for target in targets {
            if !inner.helpers.contains_key(*target) {
                return Err(BrewError::HelperNotRegistered((*target).to_string()));
            }
        }
        let depth = inner.frames.len();
        inner.frames.push(ScopeFrame {
            targets: targets.iter().map(|s| (*s).to_string()).collect(),
            overrides,
        });
        Ok(ArgScopeGuard {
            inner: Rc::clone(&self.inner),
            depth,
        })
    }

    // ==================== 调用 ====================

    /// 调用已注册的helper，kwargs按优先级解析后传入
    pub fn run(
        &self,
        name: &str,
        model: &mut ModelHelper,
        explicit: Args,
    ) -> Result<ArgValue, BrewError> {
        // 先解析并取出函数指针，再释放借用，避免helper体内再借注册表
        let (func, resolved) = {
            let inner = self.inner.borrow();
            let helper = inner
                .helpers
                .get(name)
                .ok_or_else(|| BrewError::HelperNotRegistered(name.to_string()))?;

            let mut resolved = helper.defaults.clone();
            resolved.merge_from(model.arg_scope());
            for frame in &inner.frames {
                if frame.targets.contains(name) {
                    resolved.merge_from(&frame.overrides);
                }
            }
            resolved.merge_from(&explicit);
            (helper.func, resolved)
        };
        func(model, &resolved)
    }
}

impl Default for Brew {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== 退出守卫 ====================

/// arg scope退出守卫：Drop时把帧栈截断回进入时的深度
pub struct ArgScopeGuard {
    inner: Rc<RefCell<BrewInner>>,
    depth: usize,
}

impl Drop for ArgScopeGuard {
    fn drop(&mut self) {
        self.inner.borrow_mut().frames.truncate(self.depth);
    }
}

#[cfg(test)]
mod tests;
