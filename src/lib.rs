/*
 * Responsibility
 * - crate のモジュール宣言
 * - integration test (tests/) から router / state / auth を参照できるようにする
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
