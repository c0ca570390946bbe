/*
 * Responsibility
 * - handler が受け取る extractor の公開
 *   - Caller: guard middleware が検証済みの Claims
 *   - DrinkId: path の id (数値でなければ 404)
 *   - JsonBody: body の JSON (rejection を AppError に変換)
 *   - DeferredJson: body を保持し、handler が呼んだ時点で JsonBody と同じ規則で parse
 */
mod caller;
mod drink_id;
mod json_body;

pub use caller::Caller;
pub use drink_id::DrinkId;
pub use json_body::{DeferredJson, JsonBody};
