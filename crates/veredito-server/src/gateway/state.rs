use std::sync::Arc;

use veredito::audit::AuditEngine;

#[derive(Clone)]
pub struct HandlerState {
    pub engine: Arc<AuditEngine>,
}

impl HandlerState {
    pub fn new(engine: Arc<AuditEngine>) -> Self {
        Self { engine }
    }
}
