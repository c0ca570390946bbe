/*
 * Responsibility
 * - middleware の公開インターフェース
 * - cors::apply, http::apply, auth::access::guard
 */
pub mod auth;
pub mod cors;
pub mod http;
