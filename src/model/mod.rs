//! 数据模型层：树、Schema形状与两个方向的同步算法

pub mod build;
pub mod data_core;
pub mod edit;
pub mod position;
pub mod project;
pub mod schema;
pub mod tree;
