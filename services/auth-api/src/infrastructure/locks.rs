//! 邮箱级别锁
//!
//! 同一邮箱上的验证与重发操作需要串行执行，避免 verify 校验到
//! 一个刚被并发 resend 删除的令牌。进程内的异步互斥即可满足
//! 单实例部署；多实例部署换成分布式锁，接口不变。

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 按邮箱分配的异步互斥锁注册表
#[derive(Default)]
pub struct EmailLockRegistry {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl EmailLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取邮箱对应的锁，不存在则创建
    pub fn lock_for(&self, email: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().expect("lock registry poisoned");
        locks
            .entry(email.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}
