//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 欢迎页和健康检查
//! - [`menu`] - 菜单管理接口
//! - [`orders`] - 订单管理接口 (含库存扣减)
//! - [`tables`] - 桌台管理接口
//! - [`customers`] - 顾客管理接口
//! - [`reservations`] - 预订管理接口
//! - [`inventory`] - 库存管理接口
//! - [`recipes`] - 配方管理接口
//! - [`stock_presets`] - 进货预设接口
//! - [`reports`] - 报表接口
//! - [`backup`] - 数据库备份接口

pub mod health;

pub mod menu;
pub mod orders;
pub mod tables;
pub mod customers;
pub mod reservations;
pub mod inventory;
pub mod recipes;
pub mod stock_presets;
pub mod reports;
pub mod backup;

// Re-export common types for handlers
pub use crate::utils::AppResult;
