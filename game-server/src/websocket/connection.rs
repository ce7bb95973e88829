use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which session a socket plays and whether the session lives only as long
/// as the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayConnection {
    pub id: ConnectionId,
    pub session_key: String,
    pub connection_scoped: bool,
}

impl PlayConnection {
    /// Use the client's key when it sent a non-blank one, otherwise a key
    /// private to this connection.
    pub fn new(requested_key: Option<String>) -> Self {
        let id = ConnectionId::new();
        match requested_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
        {
            Some(session_key) => Self {
                id,
                session_key,
                connection_scoped: false,
            },
            None => Self {
                id,
                session_key: id.to_string(),
                connection_scoped: true,
            },
        }
    }
}
