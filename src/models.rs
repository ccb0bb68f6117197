pub type SendableError = Box<dyn std::error::Error + Send + Sync>;

pub const LAMBDA_PREFIX: &str = "/aws/lambda/";

/// One page of results from a paginated CloudWatch Logs call.
/// `next_token` is `None` on the last page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamDescriptor {
    pub name: Option<String>,
    pub last_event_timestamp: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub timestamp: Option<i64>,
    pub message: Option<String>,
}
