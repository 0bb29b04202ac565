// Library-Root: Hardware-Adapter, Tasks und Web-Oberfläche des Globus
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod link;
pub mod tasks;
pub mod web;

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::pubsub::{PubSubChannel, Publisher, Subscriber};
use globe_core::StatusSnapshot;
use globe_core::codec::MAX_FRAME_LEN;

use crate::config::{FRAME_QUEUE_DEPTH, HTTP_TASK_COUNT};

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================
//
// Statt:  Publisher<'static, NoopRawMutex, StatusSnapshot, 2, 3, 1>
// Nutze:  StatusPublisher

/// Ein roher Bluefruit-Frame, wie er über den WebSocket ankommt
pub type Frame = heapless::Vec<u8, MAX_FRAME_LEN>;

/// Channel für Frames (WebSocket → Controller Task)
pub type FrameChannel = Channel<NoopRawMutex, Frame, FRAME_QUEUE_DEPTH>;

/// PubSubChannel für Status-Broadcasts (Controller → WebSocket)
/// - 2: Nachrichten-Kapazität im Queue
/// - HTTP_TASK_COUNT: Maximale Anzahl Subscribers (einer pro HTTP-Task)
/// - 1: Publisher (Controller Task)
pub type StatusChannel = PubSubChannel<NoopRawMutex, StatusSnapshot, 2, HTTP_TASK_COUNT, 1>;

/// Publisher für Status-Broadcasts
pub type StatusPublisher = Publisher<'static, NoopRawMutex, StatusSnapshot, 2, HTTP_TASK_COUNT, 1>;

/// Subscriber für Status-Broadcasts
pub type StatusSubscriber =
    Subscriber<'static, NoopRawMutex, StatusSnapshot, 2, HTTP_TASK_COUNT, 1>;
