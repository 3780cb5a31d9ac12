use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error, info, warn};

use crate::config::ClientConfig;
use crate::error::{ConnectAttemptFailReason, DisconnectReason};
use crate::events::{ClientEvent, ConnectFailed, ConnectionClosed, ConnectionOpened, EventChannel};
use crate::transport::{tag, ConnectionAttemptCode, Packet, PacketHandler, PacketPriority, PacketReliability, Peer, SocketConfig, StartupCode};

/// Timeout applied to unreliable sends once the transport is started.
const UNRELIABLE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Outcome of [`UdpClient::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConnectResult {
    /// The attempt was issued. Completion arrives later as a
    /// connection-opened or connection-attempt-failed event.
    Started,
    InvalidParameter,
    CannotResolveDomainName,
    AlreadyConnectedToEndpoint,
    AttemptAlreadyInProgress,
    SecurityInitializationFailed,
    /// One-time transport startup failed, no attempt was issued.
    StartupFailed,
    /// The client holds no peer, either none was injected or it was shut down.
    InvalidPeer,
    UnknownError,
}

/// Client facade over one reliable UDP [`Peer`].
///
/// Owns exactly one peer for its whole lifetime. Operations forward to the
/// peer; packets the peer delivers from its worker threads are classified by
/// their leading tag and queued as typed events. Call [`pump_events`] from the
/// thread that owns the listeners to deliver them.
///
/// [`pump_events`]: UdpClient::pump_events
pub struct UdpClient {
    peer: Option<Box<dyn Peer>>,
    config: ClientConfig,
    events: Receiver<ClientEvent>,
    opened: EventChannel<ConnectionOpened>,
    closed: EventChannel<ConnectionClosed>,
    attempt_failed: EventChannel<ConnectFailed>,
}

impl UdpClient {
    /// Creates a client around an injected peer and registers its packet
    /// handler. Passing `None`, for when the transport failed to provide a
    /// peer, leaves the client inert: every operation reports the
    /// invalid-peer condition.
    pub fn new(mut peer: Option<Box<dyn Peer>>, config: ClientConfig) -> Self {
        let (sender, receiver) = unbounded();
        if let Some(peer) = peer.as_mut() {
            peer.set_packet_handler(Some(packet_handler(sender)));
        }

        Self {
            peer,
            config,
            events: receiver,
            opened: EventChannel::default(),
            closed: EventChannel::default(),
            attempt_failed: EventChannel::default(),
        }
    }

    /// Starts the transport if needed and issues a connection attempt to
    /// `host:port`. The returned value only reports whether the attempt was
    /// issued; the outcome arrives as an event.
    pub fn connect(&mut self, host: &str, port: u16) -> ConnectResult {
        let Some(peer) = self.peer.as_mut() else {
            error!("connect to {}:{} failed: no peer instance", host, port);
            return ConnectResult::InvalidPeer;
        };

        if !peer.is_active() {
            let code = peer.startup(1, &[SocketConfig::default()], self.config.net_thread_priority);
            match code {
                StartupCode::Started | StartupCode::AlreadyStarted => {}
                code => {
                    error!("transport startup failed: {:?} ({}:{})", code, host, port);
                    return ConnectResult::StartupFailed;
                }
            }

            peer.set_occasional_ping(true);
            peer.set_unreliable_timeout(UNRELIABLE_TIMEOUT);
            info!("transport peer started");
        }

        match peer.connect(host, port, None) {
            ConnectionAttemptCode::Started => {
                info!("connecting to {}:{}", host, port);
                ConnectResult::Started
            }
            ConnectionAttemptCode::InvalidParameter => {
                error!("connect to {}:{} failed: invalid parameter", host, port);
                ConnectResult::InvalidParameter
            }
            ConnectionAttemptCode::CannotResolveDomainName => {
                error!("connect to {}:{} failed: cannot resolve domain name", host, port);
                ConnectResult::CannotResolveDomainName
            }
            ConnectionAttemptCode::AlreadyConnectedToEndpoint => {
                info!("already connected to {}:{}", host, port);
                ConnectResult::AlreadyConnectedToEndpoint
            }
            ConnectionAttemptCode::AttemptAlreadyInProgress => {
                info!("connection attempt to {}:{} already in progress", host, port);
                ConnectResult::AttemptAlreadyInProgress
            }
            ConnectionAttemptCode::SecurityInitializationFailed => {
                error!("connect to {}:{} failed: security initialization failed", host, port);
                ConnectResult::SecurityInitializationFailed
            }
            ConnectionAttemptCode::Other(code) => {
                error!("connect to {}:{} failed: unknown attempt code {}", host, port, code);
                ConnectResult::UnknownError
            }
        }
    }

    /// Sends with the configured default priority and reliability. Returns the
    /// number of bytes accepted by the transport, 0 if there is no active peer.
    pub fn send(&mut self, payload: &[u8]) -> usize {
        let (priority, reliability) = (self.config.default_priority, self.config.default_reliability);
        self.send_with_options(payload, priority, reliability)
    }

    /// Returns the number of bytes accepted by the transport, 0 if there is
    /// no active peer or the payload was rejected.
    pub fn send_with_options(&mut self, payload: &[u8], priority: PacketPriority, reliability: PacketReliability) -> usize {
        match self.peer.as_mut() {
            Some(peer) if peer.is_active() => peer.send(payload, priority, reliability),
            _ => 0,
        }
    }

    /// Whether a peer exists and reports itself started.
    pub fn is_active(&self) -> bool {
        self.peer.as_ref().is_some_and(|peer| peer.is_active())
    }

    /// Gracefully shuts the peer down, waiting up to the configured linger to
    /// flush pending sends, then detaches the packet handler and releases the
    /// peer. Later operations take the no-peer path. Calling this again is a
    /// no-op.
    pub fn shutdown(&mut self) {
        let Some(mut peer) = self.peer.take() else {
            return;
        };

        peer.shutdown(self.config.shutdown_linger);
        peer.set_packet_handler(None);
        info!("transport peer shut down");
    }

    /// Drains queued events and delivers each to its channel's listeners.
    /// Returns the number of events delivered. Must be called from the thread
    /// that owns the listeners, typically once per host tick.
    pub fn pump_events(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(event) = self.events.try_recv() {
            match event {
                ClientEvent::Opened(event) => self.opened.publish(&event),
                ClientEvent::Closed(event) => self.closed.publish(&event),
                ClientEvent::AttemptFailed(event) => self.attempt_failed.publish(&event),
            }
            delivered += 1;
        }

        delivered
    }

    pub fn on_connection_opened(&mut self) -> &mut EventChannel<ConnectionOpened> {
        &mut self.opened
    }

    pub fn on_connection_closed(&mut self) -> &mut EventChannel<ConnectionClosed> {
        &mut self.closed
    }

    pub fn on_connection_attempt_failed(&mut self) -> &mut EventChannel<ConnectFailed> {
        &mut self.attempt_failed
    }
}

impl Drop for UdpClient {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn packet_handler(events: Sender<ClientEvent>) -> PacketHandler {
    Box::new(move |packet| classify_packet(packet, &events))
}

/// Runs on a transport worker thread. Classifies the packet by its leading
/// tag, logs it and queues the resulting event. Returns whether the tag was
/// recognized.
fn classify_packet(packet: &Packet, events: &Sender<ClientEvent>) -> bool {
    if packet.payload.is_empty() || packet.bit_length == 0 {
        error!("received an invalid packet");
        return false;
    }

    let host = packet.host.clone();
    let (port, guid) = (packet.port, packet.guid);

    match packet.payload[0] {
        tag::CONNECTION_REQUEST_ACCEPTED => {
            info!("connection opened by {}:{}", host, port);
            dispatch(events, ClientEvent::Opened(ConnectionOpened { host, port, guid }));
            true
        }
        tag::DISCONNECTION_NOTIFICATION => {
            error!("connection closed by remote {}:{}", host, port);
            let reason = DisconnectReason::ClosedByRemote;
            dispatch(events, ClientEvent::Closed(ConnectionClosed { host, port, guid, reason }));
            true
        }
        tag::CONNECTION_LOST => {
            error!("connection to {}:{} lost", host, port);
            let reason = DisconnectReason::ConnectionLost;
            dispatch(events, ClientEvent::Closed(ConnectionClosed { host, port, guid, reason }));
            true
        }
        tag::CUSTOM_DATA | tag::CUSTOM_COMPRESS_FLAG => {
            // Reserved for payload framing, recognized but not delivered.
            true
        }
        tag_byte => match attempt_fail_reason(tag_byte) {
            Some(reason) => {
                if reason == ConnectAttemptFailReason::AlreadyConnected {
                    warn!("connection attempt to {}:{} rejected: {}", host, port, reason);
                } else {
                    error!("connection attempt to {}:{} rejected: {}", host, port, reason);
                }
                dispatch(events, ClientEvent::AttemptFailed(ConnectFailed { host, port, guid, reason }));
                true
            }
            None => {
                warn!("unknown message tag {} from {}:{}", tag_byte, host, port);
                false
            }
        },
    }
}

fn attempt_fail_reason(tag_byte: u8) -> Option<ConnectAttemptFailReason> {
    use ConnectAttemptFailReason::*;

    match tag_byte {
        tag::CONNECTION_ATTEMPT_FAILED => Some(AttemptFailed),
        tag::REMOTE_REQUIRES_PUBLIC_KEY => Some(RemoteRequiresPublicKey),
        tag::LOCAL_REQUIRES_SECURITY => Some(LocalRequiresSecurity),
        tag::PUBLIC_KEY_MISMATCH => Some(PublicKeyMismatch),
        tag::ALREADY_CONNECTED => Some(AlreadyConnected),
        tag::NO_FREE_INCOMING_CONNECTIONS => Some(NoFreeIncomingConnections),
        tag::CONNECTION_BANNED => Some(ConnectionBanned),
        tag::INVALID_PASSWORD => Some(InvalidPassword),
        tag::INCOMPATIBLE_PROTOCOL_VERSION => Some(IncompatibleProtocol),
        tag::IP_RECENTLY_CONNECTED => Some(IpRecentlyConnected),
        _ => None,
    }
}

fn dispatch(events: &Sender<ClientEvent>, event: ClientEvent) {
    // Fails only while the client is mid-teardown with packets still in flight.
    if events.send(event).is_err() {
        debug!("event queue disconnected, notification dropped");
    }
}
