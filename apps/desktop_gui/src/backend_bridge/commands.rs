//! Backend commands queued from UI to backend worker.

pub enum BackendCommand {
    /// Run one generation request for the given ticket with the source
    /// snapshot taken at submission time.
    Generate { ticket_id: u64, code: String },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Generate { .. } => "generate",
        }
    }
}
