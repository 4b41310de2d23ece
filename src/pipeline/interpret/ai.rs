use super::{EmptyState, Rendered};
use crate::navigation::TransferObject;
use crate::pipeline::{AiExchange, Pipeline};

/// Prompt and suggestion are shown exactly as sent and received: no
/// trimming, truncation or markup processing.
pub fn render_ai(state: Option<TransferObject>) -> Rendered<AiExchange> {
    match state {
        Some(TransferObject::Ai(t)) => Rendered::Ready(AiExchange {
            prompt: t.context,
            suggestion: t.result.suggestion,
        }),
        _ => Rendered::Empty(EmptyState::for_pipeline(Pipeline::Ai)),
    }
}
