use super::{broadcaster::SessionBroadcaster, seats::Seat};
use crate::connect6::{Connect6, Move};
use crate::error::GameError;
use crate::messages::{ConnectionId, ServerEvent};
use tracing::{debug, info};

/// Who sent the command being handled.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    pub conn_id: ConnectionId,
    pub identity: &'a str,
    pub seat: Seat,
}

// Every handler returns the connections that had to be dropped while sending.
pub struct HubHandlers;

impl HubHandlers {
    pub fn handle_new_game(
        game: &mut Connect6,
        broadcaster: &mut SessionBroadcaster,
        ctx: &CommandContext,
    ) -> Vec<ConnectionId> {
        game.reset();
        info!("New game started by {}", ctx.identity);
        broadcaster.broadcast(ServerEvent::new_game(ctx.identity, game.encode_state()))
    }

    pub fn handle_resign(
        game: &mut Connect6,
        broadcaster: &mut SessionBroadcaster,
        ctx: &CommandContext,
    ) -> Vec<ConnectionId> {
        let Some(player) = ctx.seat.player() else {
            return Self::reject(broadcaster, ctx, GameError::SpectatorCannotResign);
        };
        match game.resign(player) {
            Ok(winner) => {
                info!(
                    "Player {} ({}) resigned, player {} wins",
                    player.number(),
                    ctx.identity,
                    winner.number()
                );
                broadcaster.broadcast(ServerEvent::resign(ctx.identity, ctx.seat))
            }
            Err(e) => Self::reject(broadcaster, ctx, e),
        }
    }

    pub fn handle_move(
        game: &mut Connect6,
        broadcaster: &mut SessionBroadcaster,
        ctx: &CommandContext,
        m: Move,
        enforce_turn_order: bool,
    ) -> Vec<ConnectionId> {
        if enforce_turn_order
            && !game.is_finished()
            && ctx.seat.player() != Some(game.current_player())
        {
            return Self::reject(broadcaster, ctx, GameError::NotYourTurn);
        }

        let mover = match game.apply_move(m) {
            Ok(mover) => mover,
            Err(e) => return Self::reject(broadcaster, ctx, e),
        };
        debug!("Player {} placed a stone at ({})", mover.number(), m);

        let mut dropped = broadcaster.broadcast(ServerEvent::move_made(ctx.identity, m, mover));
        let follow_up = match game.winner() {
            Some(winner) => {
                info!("Player {} wins\n{}", winner.number(), game);
                ServerEvent::finished(ctx.identity, winner)
            }
            None => ServerEvent::current_player(ctx.identity, game.current_player()),
        };
        dropped.extend(broadcaster.broadcast(follow_up));
        dropped
    }

    /// Reports `error` to the sender only.
    pub fn reject(
        broadcaster: &mut SessionBroadcaster,
        ctx: &CommandContext,
        error: GameError,
    ) -> Vec<ConnectionId> {
        debug!("Rejected command from {}: {}", ctx.identity, error);
        broadcaster.send_to(ctx.conn_id, ServerEvent::error(ctx.identity, error.to_string()))
    }
}
