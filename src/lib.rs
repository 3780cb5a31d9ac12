mod client;
mod config;
mod error;
mod events;

pub mod transport;

pub use client::{ConnectResult, UdpClient};
pub use config::ClientConfig;
pub use error::{ConnectAttemptFailReason, DisconnectReason};
pub use events::{ConnectFailed, ConnectionClosed, ConnectionOpened, EventChannel, SubscriptionId};
pub use transport::{Packet, PacketPriority, PacketReliability, Peer};

pub use bytes::Bytes;

/// Transport-assigned identifier for a remote endpoint, stable across address
/// changes.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Ord, PartialOrd)]
pub struct Guid(u32);

impl Guid {
    /// Creates a [`Guid`] from a raw 32 bit value.
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw 32 bit value of the [`Guid`]
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for Guid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Guid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Guid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        u32::deserialize(deserializer).map(Guid::from_raw)
    }
}
