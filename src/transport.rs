use std::time::Duration;

use bytes::Bytes;

use crate::Guid;

/// Message tags carried in the first byte of every inbound packet.
///
/// Values follow the transport's identifier ordinals. Tags below
/// [`tag::USER_RANGE_START`] belong to the transport itself; the application
/// range starts there.
pub mod tag {
    pub const REMOTE_REQUIRES_PUBLIC_KEY: u8 = 10;
    pub const LOCAL_REQUIRES_SECURITY: u8 = 11;
    pub const PUBLIC_KEY_MISMATCH: u8 = 12;
    pub const CONNECTION_REQUEST_ACCEPTED: u8 = 16;
    pub const CONNECTION_ATTEMPT_FAILED: u8 = 17;
    pub const ALREADY_CONNECTED: u8 = 18;
    pub const NO_FREE_INCOMING_CONNECTIONS: u8 = 20;
    pub const DISCONNECTION_NOTIFICATION: u8 = 21;
    pub const CONNECTION_LOST: u8 = 22;
    pub const CONNECTION_BANNED: u8 = 23;
    pub const INVALID_PASSWORD: u8 = 24;
    pub const INCOMPATIBLE_PROTOCOL_VERSION: u8 = 25;
    pub const IP_RECENTLY_CONNECTED: u8 = 26;

    /// First tag available to applications.
    pub const USER_RANGE_START: u8 = 134;
    /// Application payload marker, reserved until payload framing lands.
    pub const CUSTOM_DATA: u8 = 135;
    /// Per-message compression flag marker, reserved until payload framing lands.
    pub const CUSTOM_COMPRESS_FLAG: u8 = 136;
}

/// Send urgency, forwarded verbatim to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PacketPriority {
    /// Sent right away, bypassing the transport's send batching.
    Immediate,
    /// Batched on the transport's coalescing interval. For every 2 immediate
    /// messages, 1 high message is sent.
    High,
    /// For every 2 high messages, 1 medium message is sent.
    Medium,
    /// For every 2 medium messages, 1 low message is sent.
    Low,
}

/// Delivery guarantee, forwarded verbatim to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PacketReliability {
    /// Plain datagram, duplicates discarded.
    Unreliable,
    /// Plain datagram with a sequence counter, out of order messages discarded.
    UnreliableSequenced,
    /// Retransmitted until acknowledged, no ordering between messages.
    Reliable,
    /// Retransmitted and delivered in send order, later messages wait for
    /// earlier ones.
    ReliableOrdered,
    /// Retransmitted, out of order messages dropped instead of delayed.
    ReliableSequenced,
}

/// Local socket binding handed to [`Peer::startup`].
#[derive(Debug, Clone, Default)]
pub struct SocketConfig {
    /// Local port, 0 picks an ephemeral one.
    pub port: u16,
    /// Local address, `None` binds to any interface.
    pub address: Option<String>,
}

/// Result vocabulary of [`Peer::startup`].
///
/// `Other` carries codes newer than this binding knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupCode {
    Started,
    AlreadyStarted,
    InvalidSocketConfig,
    PortInUse,
    FailedToBind,
    FailedTestSend,
    NetworkThreadFailed,
    Other(u8),
}

/// Result vocabulary of [`Peer::connect`].
///
/// `Other` carries codes newer than this binding knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionAttemptCode {
    Started,
    InvalidParameter,
    CannotResolveDomainName,
    AlreadyConnectedToEndpoint,
    AttemptAlreadyInProgress,
    SecurityInitializationFailed,
    Other(u8),
}

/// Inbound packet envelope, handed to the registered [`PacketHandler`] on one
/// of the transport's worker threads.
#[derive(Debug, Clone)]
pub struct Packet {
    /// Sender address in textual form, without a port suffix.
    pub host: String,
    pub port: u16,
    pub guid: Guid,
    /// Raw payload, first byte is the message tag.
    pub payload: Bytes,
    /// Payload length in bits as reported by the transport.
    pub bit_length: usize,
}

/// Invoked synchronously on a transport worker thread for every inbound
/// packet. Must not block. Returns whether the packet was recognized.
pub type PacketHandler = Box<dyn FnMut(&Packet) -> bool + Send>;

/// One instance of the reliable UDP transport, bound to a local socket.
///
/// The transport library owns the connection state machine, retransmission,
/// ordering and congestion control; this trait is the surface the client
/// facade drives it through. Implementations hand inbound packets to the
/// registered [`PacketHandler`] from their own worker threads.
pub trait Peer: Send {
    /// One-time socket/thread startup. Safe to call on an already started
    /// peer, which reports [`StartupCode::AlreadyStarted`].
    fn startup(&mut self, max_connections: usize, sockets: &[SocketConfig], thread_priority: i32) -> StartupCode;

    /// Whether startup succeeded and the peer has not been shut down.
    fn is_active(&self) -> bool;

    /// Issues an asynchronous connection attempt. Completion is reported
    /// through the packet handler.
    fn connect(&mut self, host: &str, port: u16, password: Option<&[u8]>) -> ConnectionAttemptCode;

    fn set_occasional_ping(&mut self, enabled: bool);

    fn set_unreliable_timeout(&mut self, timeout: Duration);

    /// Queues a payload for the current connection, returns the number of
    /// bytes accepted, 0 if rejected.
    fn send(&mut self, payload: &[u8], priority: PacketPriority, reliability: PacketReliability) -> usize;

    /// Graceful shutdown, blocking up to `linger` to flush pending sends.
    fn shutdown(&mut self, linger: Duration);

    /// Registers or clears the inbound packet sink.
    fn set_packet_handler(&mut self, handler: Option<PacketHandler>);
}
