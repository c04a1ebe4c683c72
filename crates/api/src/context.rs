use uuid::Uuid;

/// Per-invocation execution context.
///
/// Carries the id that ties together every log line of one request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    request_id: Uuid,
}

impl InvocationContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::now_v7(),
        }
    }

    pub fn with_request_id(request_id: Uuid) -> Self {
        Self { request_id }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }
}

impl Default for InvocationContext {
    fn default() -> Self {
        Self::new()
    }
}
