use super::super::*;
use super::duel_error_vec;
use duelist_types::duel::{
    Address, Bet, RoomState, Seat, Winner, ERROR_ALREADY_CLAIMED, ERROR_AIRDROP_CLAIMED,
    ERROR_BET_EXISTS, ERROR_INSUFFICIENT_FUNDS, ERROR_INVALID_ADDRESS, ERROR_INVALID_BET_AMOUNT,
    ERROR_NO_BET, ERROR_ROOM_NOT_FINISHED, ERROR_ROOM_NOT_OPEN, MAX_BET, SPECTATOR_AIRDROP,
};

impl<'a, S: State, O: QuestionOracle> Layer<'a, S, O> {
    // === Betting Handler Methods ===

    pub(in crate::layer) async fn handle_spectator_airdrop(
        &mut self,
        address: &str,
    ) -> Result<Vec<Event>> {
        let bettor = match Address::parse(address) {
            Ok(bettor) => bettor,
            Err(_) => {
                return Ok(duel_error_vec(
                    address,
                    None,
                    ERROR_INVALID_ADDRESS,
                    "Invalid address",
                ))
            }
        };
        if self
            .get(&Key::AirdropClaim(bettor.clone()))
            .await?
            .is_some()
        {
            return Ok(duel_error_vec(
                address,
                None,
                ERROR_AIRDROP_CLAIMED,
                "Already claimed spectator airdrop",
            ));
        }

        self.mint(&bettor, SPECTATOR_AIRDROP).await?;
        self.insert(Key::AirdropClaim(bettor.clone()), Value::AirdropClaim);

        Ok(vec![Event::AirdropClaimed {
            address: bettor,
            amount: SPECTATOR_AIRDROP,
        }])
    }

    pub(in crate::layer) async fn handle_place_bet(
        &mut self,
        room_code: &str,
        bettor: &str,
        side: Seat,
        amount: u64,
    ) -> Result<Vec<Event>> {
        let mut room = match self.room_or_error(room_code, bettor).await? {
            Ok(room) => room,
            Err(events) => return Ok(events),
        };
        // Bets stay open while the room is waiting or active.
        if room.state == RoomState::Finished {
            return Ok(duel_error_vec(
                bettor,
                Some(room_code),
                ERROR_ROOM_NOT_OPEN,
                "Game already ended",
            ));
        }
        if amount == 0 {
            return Ok(duel_error_vec(
                bettor,
                Some(room_code),
                ERROR_INVALID_BET_AMOUNT,
                "Amount must be positive",
            ));
        }
        if amount > MAX_BET {
            return Ok(duel_error_vec(
                bettor,
                Some(room_code),
                ERROR_INVALID_BET_AMOUNT,
                "Max bet is 10 GOT per room",
            ));
        }
        let address = match Address::parse(bettor) {
            Ok(address) => address,
            Err(_) => {
                return Ok(duel_error_vec(
                    bettor,
                    Some(room_code),
                    ERROR_INVALID_ADDRESS,
                    "Invalid address",
                ))
            }
        };
        let bet_key = Key::Bet {
            room_code: room_code.to_owned(),
            bettor: address.clone(),
        };
        if self.get(&bet_key).await?.is_some() {
            return Ok(duel_error_vec(
                bettor,
                Some(room_code),
                ERROR_BET_EXISTS,
                "Already placed a bet in this room",
            ));
        }
        if !self.escrow_debit(&address, amount).await? {
            return Ok(duel_error_vec(
                bettor,
                Some(room_code),
                ERROR_INSUFFICIENT_FUNDS,
                "Insufficient GOT balance",
            ));
        }

        match side {
            Seat::P1 => room.pool_p1 = room.pool_p1.saturating_add(amount),
            Seat::P2 => room.pool_p2 = room.pool_p2.saturating_add(amount),
        }
        self.insert(Key::Room(room_code.to_owned()), Value::Room(room));
        self.insert(bet_key, Value::Bet(Bet::new(side, amount)));

        Ok(vec![Event::BetPlaced {
            room_code: room_code.to_owned(),
            bettor: address,
            side,
            amount,
        }])
    }

    pub(in crate::layer) async fn handle_claim_winnings(
        &mut self,
        room_code: &str,
        bettor: &str,
    ) -> Result<Vec<Event>> {
        let room = match self.room_or_error(room_code, bettor).await? {
            Ok(room) => room,
            Err(events) => return Ok(events),
        };
        if room.state != RoomState::Finished {
            return Ok(duel_error_vec(
                bettor,
                Some(room_code),
                ERROR_ROOM_NOT_FINISHED,
                "Game not finished yet",
            ));
        }
        // An unparseable address cannot have placed a bet.
        let address = match Address::parse(bettor) {
            Ok(address) => address,
            Err(_) => {
                return Ok(duel_error_vec(
                    bettor,
                    Some(room_code),
                    ERROR_NO_BET,
                    "No bet found for this address",
                ))
            }
        };
        let bet_key = Key::Bet {
            room_code: room_code.to_owned(),
            bettor: address.clone(),
        };
        let mut bet = match self.get(&bet_key).await? {
            Some(Value::Bet(bet)) => bet,
            _ => {
                return Ok(duel_error_vec(
                    bettor,
                    Some(room_code),
                    ERROR_NO_BET,
                    "No bet found for this address",
                ))
            }
        };
        if bet.claimed {
            return Ok(duel_error_vec(
                bettor,
                Some(room_code),
                ERROR_ALREADY_CLAIMED,
                "Already claimed winnings",
            ));
        }

        // Mark claimed before settling so a replayed claim can never pay out
        // twice.
        bet.claimed = true;
        self.insert(bet_key, Value::Bet(bet.clone()));

        let payout = match &room.winner {
            // Tie returns the original stake in full.
            Winner::Tie => bet.amount,
            Winner::Player(winner) => {
                let winning_side = if *winner == room.player1.address {
                    Seat::P1
                } else {
                    Seat::P2
                };
                if bet.side != winning_side {
                    0
                } else {
                    let winning_pool = room.pool(winning_side);
                    let total = room.pool_p1.saturating_add(room.pool_p2);
                    if winning_pool == 0 {
                        // Unreachable in practice: the claimant's own stake is
                        // part of the winning pool.
                        0
                    } else {
                        ((bet.amount as u128 * total as u128) / winning_pool as u128) as u64
                    }
                }
            }
            Winner::Undecided => {
                anyhow::bail!("finished room has no recorded winner")
            }
        };
        if payout > 0 {
            self.escrow_credit(&address, payout).await?;
        }

        tracing::debug!(room = room_code, bettor = %address, payout, "winnings claimed");
        Ok(vec![Event::WinningsClaimed {
            room_code: room_code.to_owned(),
            bettor: address,
            payout,
        }])
    }
}
