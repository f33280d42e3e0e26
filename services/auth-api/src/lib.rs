//! Auth API Service Library
//!
//! 模块化架构：
//! - `domain`: 实体、值对象、仓储接口、领域服务
//! - `infrastructure`: 键值存储适配器、邮箱级别锁
//! - `api`: HTTP 边界层（axum）

pub mod api;
pub mod domain;
pub mod error;
pub mod infrastructure;
