//! 订单业务逻辑
//!
//! - [`stock`] - 下单时的配方解析、库存校验与扣减计划
//! - [`status`] - 订单状态流转 (厨房计时)

pub mod status;
pub mod stock;
