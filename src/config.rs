use std::time::Duration;

use crate::transport::{PacketPriority, PacketReliability};

/// Configuration for a [`UdpClient`](crate::UdpClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Priority handed to the transport's network thread on startup.
    /// Default: 0 (the platform's normal priority)
    pub net_thread_priority: i32,
    /// Time the transport may spend flushing pending sends during shutdown.
    /// Default: 500ms
    pub shutdown_linger: Duration,
    /// Priority used by [`UdpClient::send`](crate::UdpClient::send).
    /// Default: [`PacketPriority::Immediate`]
    pub default_priority: PacketPriority,
    /// Reliability used by [`UdpClient::send`](crate::UdpClient::send).
    /// Default: [`PacketReliability::ReliableOrdered`]
    pub default_reliability: PacketReliability,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            net_thread_priority: 0,
            shutdown_linger: Duration::from_millis(500),
            default_priority: PacketPriority::Immediate,
            default_reliability: PacketReliability::ReliableOrdered,
        }
    }
}
