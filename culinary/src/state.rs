use culinary_core::gateway::DocumentGateway;

/// Shared state handed to every handler.
///
/// Cloning is cheap: the gateway wraps its backend in an `Arc`.
#[derive(Clone, Debug)]
pub struct AppState {
    pub gateway: DocumentGateway,
    /// Whether a connection string was configured, reported by `/test`.
    pub database_url_set: bool,
    pub database_name: Option<String>,
}

impl AppState {
    pub fn new(gateway: DocumentGateway) -> Self {
        Self {
            gateway,
            database_url_set: false,
            database_name: None,
        }
    }

    pub fn with_database(mut self, name: impl Into<String>, url_set: bool) -> Self {
        self.database_name = Some(name.into());
        self.database_url_set = url_set;
        self
    }
}
