//! Acceptor/worker-pool engine (C5/C6/C7 of the design): one acceptor
//! thread ([`acceptor`]) owns the listening socket and hands accepted
//! connections to a fixed pool of worker threads ([`worker`]) through a
//! one-slot rendezvous ([`channel`]). [`shutdown`] is the signal every
//! thread observes to know when to stop.

pub mod acceptor;
pub mod channel;
pub mod shutdown;
pub mod worker;
