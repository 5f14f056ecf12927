/*
 * @Author       : 老董
 * @Date         : 2026-08-30
 * @Description  : 层级命名空间（name scope）
 *
 * 段（segment）以"/"连接形成前缀，进入/退出必须严格嵌套。
 * 退出以RAII守卫实现：`NameScopeGuard`在Drop时把段栈截断回
 * 进入时的深度，提前return或panic展开都能精确恢复。
 */

use std::cell::RefCell;
use std::rc::Rc;

/// 命名空间分隔符
pub const SEPARATOR: &str = "/";

/// 命名空间句柄
///
/// # 设计原则
/// - 是`Rc<RefCell<Vec<String>>>`的薄封装，Clone语义：多个句柄共享同一段栈
/// - `enter`返回守卫，守卫离开作用域即恢复先前状态
#[derive(Clone, Default)]
pub struct NameScope {
    segments: Rc<RefCell<Vec<String>>>,
}

impl NameScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// 进入一层命名空间，返回退出守卫
    pub fn enter(&self, segment: &str) -> NameScopeGuard {
        let depth = {
            let mut segs = self.segments.borrow_mut();
            segs.push(segment.to_string());
            segs.len() - 1
        };
        NameScopeGuard {
            segments: Rc::clone(&self.segments),
            depth,
        }
    }

    /// 当前完整前缀：非空时以"/"结尾（如`"c/"`、`"c/d/"`），空栈时为`""`
    pub fn current_prefix(&self) -> String {
        let segs = self.segments.borrow();
        if segs.is_empty() {
            String::new()
        } else {
            format!("{}{}", segs.join(SEPARATOR), SEPARATOR)
        }
    }

    /// 用当前前缀限定一个名字
    pub fn qualify(&self, name: &str) -> String {
        format!("{}{}", self.current_prefix(), name)
    }

    /// 当前嵌套深度
    pub fn depth(&self) -> usize {
        self.segments.borrow().len()
    }
}

/// 命名空间退出守卫：Drop时恢复进入前的段栈
pub struct NameScopeGuard {
    segments: Rc<RefCell<Vec<String>>>,
    depth: usize,
}

impl Drop for NameScopeGuard {
    fn drop(&mut self) {
        self.segments.borrow_mut().truncate(self.depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scope() {
        let scope = NameScope::new();
        assert_eq!(scope.current_prefix(), "");
        assert_eq!(scope.qualify("a"), "a");
        assert_eq!(scope.depth(), 0);
    }

    #[test]
    fn test_nested_prefix() {
        let scope = NameScope::new();
        let _g1 = scope.enter("c");
        assert_eq!(scope.current_prefix(), "c/");
        assert_eq!(scope.qualify("a"), "c/a");

        {
            let _g2 = scope.enter("d");
            assert_eq!(scope.current_prefix(), "c/d/");
            assert_eq!(scope.qualify("w"), "c/d/w");
        }
        // 内层守卫Drop后恢复外层前缀
        assert_eq!(scope.current_prefix(), "c/");
    }

    #[test]
    fn test_guard_restores_on_early_exit() {
        let scope = NameScope::new();

        let result: Result<(), String> = (|| {
            let _g = scope.enter("c");
            assert_eq!(scope.current_prefix(), "c/");
            Err("提前退出".to_string())
        })();
        assert!(result.is_err());

        // 即使作用域块以错误退出，前缀也已恢复
        assert_eq!(scope.current_prefix(), "");
        assert_eq!(scope.depth(), 0);
    }

    #[test]
    fn test_shared_handle() {
        let scope = NameScope::new();
        let alias = scope.clone();
        let _g = scope.enter("c");
        // Clone的句柄共享同一段栈
        assert_eq!(alias.current_prefix(), "c/");
    }
}
