pub mod config;
pub mod convert;
pub mod engine;
pub mod geometry;
pub mod input;
pub mod logger;
pub mod mesh;
pub mod pose;
pub mod raycast;
pub mod sheet;
pub mod solid;
pub mod viewer;
