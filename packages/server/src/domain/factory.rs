//! Factories for identifiers issued by the server.

use uuid::Uuid;

use super::{error::DomainError, value_object::ConnectionId};

/// Connection ID のファクトリ
///
/// UUID v4 を使って一意な ID を生成する。
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> Result<ConnectionId, DomainError> {
        ConnectionId::new(Uuid::new_v4().to_string())
    }
}
