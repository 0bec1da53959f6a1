//! A protocol-shape simulator for the negotiation phase of a TLS 1.3 style
//! handshake.
//!
//! An [`Initiator`](handshake::client::Initiator) and a
//! [`Responder`](handshake::server::Responder) exchange hellos, a simulated
//! certificate and a simulated pre-master secret, driven stage by stage by a
//! [`HandshakeSession`](handshake::session::HandshakeSession). Nothing here is
//! secure: there is no real key exchange, encryption or transport.

pub mod config;
pub mod crypto;
pub mod error;
pub mod handshake;
pub mod protocol;

pub use config::HandshakeConfig;
pub use crypto::suite::CipherSuite;
pub use error::{HandshakeError, Result};
pub use handshake::session::HandshakeSession;
