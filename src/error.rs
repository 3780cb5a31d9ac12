use std::fmt;

/// Why an established connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DisconnectReason {
    /// The local host closed the connection.
    ClosedByUser,
    /// The remote end sent a disconnection notification.
    ClosedByRemote,
    /// The transport detected the connection as lost.
    ConnectionLost,
}

/// Why the remote end rejected a connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConnectAttemptFailReason {
    AttemptFailed,
    AlreadyConnected,
    NoFreeIncomingConnections,
    SecurityPublicKeyMismatch,
    ConnectionBanned,
    InvalidPassword,
    IncompatibleProtocol,
    IpRecentlyConnected,
    RemoteRequiresPublicKey,
    LocalRequiresSecurity,
    PublicKeyMismatch,
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        use DisconnectReason::*;

        match *self {
            ClosedByUser => write!(fmt, "connection closed by the local host"),
            ClosedByRemote => write!(fmt, "connection closed by the remote host"),
            ConnectionLost => write!(fmt, "connection lost"),
        }
    }
}

impl fmt::Display for ConnectAttemptFailReason {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        use ConnectAttemptFailReason::*;

        match *self {
            AttemptFailed => write!(fmt, "connection attempt failed"),
            AlreadyConnected => write!(fmt, "already connected"),
            NoFreeIncomingConnections => write!(fmt, "no free incoming connections"),
            SecurityPublicKeyMismatch => write!(fmt, "security public key mismatch"),
            ConnectionBanned => write!(fmt, "connection banned"),
            InvalidPassword => write!(fmt, "invalid password"),
            IncompatibleProtocol => write!(fmt, "incompatible protocol version"),
            IpRecentlyConnected => write!(fmt, "address reconnected too recently"),
            RemoteRequiresPublicKey => write!(fmt, "remote system requires a public key"),
            LocalRequiresSecurity => write!(fmt, "local system requires security"),
            PublicKeyMismatch => write!(fmt, "public key mismatch"),
        }
    }
}
