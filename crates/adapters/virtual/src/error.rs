//! Error type for the virtual host.

/// Failures raised by the simulated host.
#[derive(Debug, thiserror::Error)]
pub enum VirtualError {
    #[error("no live session with the virtual home")]
    Disconnected,

    #[error("unknown entity {0}")]
    UnknownEntity(String),

    #[error("{entity} does not support {service}")]
    UnsupportedService { entity: String, service: String },

    #[error("invalid parameter {name} for {entity}")]
    InvalidParameter { entity: String, name: &'static str },
}

impl VirtualError {
    pub(crate) fn unsupported(entity: &str, service: &str) -> Self {
        Self::UnsupportedService {
            entity: entity.to_string(),
            service: service.to_string(),
        }
    }
}
