//! Networked presenter: turns engine notifications into protocol lines.

use crate::games::quoridor::{SeatId, WallSegment};
use crate::presenter::Presenter;
use crate::protocol::ServerMessage;
use std::collections::BTreeMap;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

/// Fans engine notifications out to every connected seat.
///
/// Each seat has one outbox feeding its connection's writer. Errors and
/// start coordinates go to the addressed seat only; everything else goes
/// to every seat. A closed outbox is logged and otherwise ignored, so one
/// dead connection never stalls the others.
#[derive(Debug, Default)]
pub struct Broadcaster {
    outboxes: BTreeMap<SeatId, UnboundedSender<ServerMessage>>,
    stats: BTreeMap<SeatId, (u32, u8)>,
}

impl Broadcaster {
    /// Registers a seat's outbox, replacing any previous one.
    pub fn add(&mut self, seat: SeatId, outbox: UnboundedSender<ServerMessage>) {
        debug!(seat, "Outbox registered");
        self.outboxes.insert(seat, outbox);
    }

    /// Drops a seat's outbox.
    pub fn remove(&mut self, seat: SeatId) -> bool {
        self.outboxes.remove(&seat).is_some()
    }

    /// Seats with a registered outbox.
    pub fn seats(&self) -> impl Iterator<Item = SeatId> + '_ {
        self.outboxes.keys().copied()
    }

    /// Number of registered outboxes.
    pub fn len(&self) -> usize {
        self.outboxes.len()
    }

    /// Whether no outbox is registered.
    pub fn is_empty(&self) -> bool {
        self.outboxes.is_empty()
    }

    /// Sends to one seat.
    pub fn unicast(&self, seat: SeatId, message: ServerMessage) {
        self.outboxes
            .get(&seat)
            .map(|outbox| outbox.send(message))
            .and_then(|res| res.err())
            .inspect(|e| warn!(seat, message = %e.0, "Failed unicast"));
    }

    /// Sends to every seat.
    pub fn broadcast(&self, message: ServerMessage) {
        self.outboxes
            .iter()
            .filter_map(|(seat, outbox)| outbox.send(message.clone()).err().map(|e| (seat, e)))
            .for_each(|(seat, e)| warn!(seat, message = %e.0, "Failed broadcast"));
    }

    fn send_stats(&mut self, seat: SeatId) {
        let (move_count, wall_count) = self.stats.get(&seat).copied().unwrap_or_default();
        self.broadcast(ServerMessage::Stats {
            move_count,
            wall_count,
            seat,
        });
    }
}

impl Presenter for Broadcaster {
    fn update_move_count(&mut self, count: u32, seat: SeatId) {
        self.stats.entry(seat).or_default().0 = count;
        self.send_stats(seat);
    }

    fn update_wall_count(&mut self, count: u8, seat: SeatId) {
        self.stats.entry(seat).or_default().1 = count;
        self.send_stats(seat);
    }

    fn update_stats(&mut self, move_count: u32, wall_count: u8, seat: SeatId) {
        self.stats.insert(seat, (move_count, wall_count));
        self.send_stats(seat);
    }

    fn update_pawn_position(&mut self, x: u8, y: u8, seat: SeatId) {
        self.broadcast(ServerMessage::Pawn { x, y, seat });
    }

    fn update_current_player(&mut self, seat: SeatId) {
        self.broadcast(ServerMessage::CurrentPlayer(seat));
    }

    fn display_wall(&mut self, segment: WallSegment, seat: SeatId) {
        self.broadcast(ServerMessage::Wall { segment, seat });
    }

    fn remove_wall_display(&mut self, segment: WallSegment) {
        self.broadcast(ServerMessage::RemoveWallDisplay(segment));
    }

    fn highlight_availability(&mut self, x: u8, y: u8) {
        self.broadcast(ServerMessage::Highlight { x, y });
    }

    fn display_error(&mut self, seat: SeatId, text: &str) {
        self.unicast(seat, ServerMessage::Error(text.to_string()));
    }

    fn reset_walls(&mut self) {
        self.broadcast(ServerMessage::Reset);
    }

    fn set_initial_positions(&mut self, seat: SeatId, positions: &[(u8, u8)]) {
        self.unicast(seat, ServerMessage::Coordinate(positions.to_vec()));
    }
}
