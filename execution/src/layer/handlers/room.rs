use super::super::*;
use super::duel_error_vec;
use duelist_types::duel::{
    question, Address, AnswerOutcome, PlayerSeat, PowerUp, Room, RoomState, Seat, Winner,
    DOUBLE_DOWN_STEAL_AMOUNT, ERROR_GAME_INCOMPLETE, ERROR_INVALID_ADDRESS, ERROR_INVALID_ANIME,
    ERROR_INVALID_CODE, ERROR_INVALID_QUESTION_NUMBER, ERROR_NOT_A_PARTICIPANT, ERROR_NO_SNIPE,
    ERROR_OWN_ROOM, ERROR_ROOM_CODE_TAKEN, ERROR_ROOM_NOT_ACTIVE, ERROR_ROOM_NOT_FOUND,
    ERROR_ROOM_NOT_OPEN, FAILED_STEAL_BURN, JOIN_BONUS, MATCH_RESET_BALANCE, MIN_ANIME_LENGTH,
    MIN_ROOM_CODE_LENGTH, POWER_UP_STREAK, QUESTIONS_PER_PLAYER, STEAL_AMOUNT,
    STREAK_BURN_AMOUNT, WIN_BONUS, WRONG_STREAK_BURN_THRESHOLD,
};
use duelist_types::oracle::{AnswerCheck, PromptContext, QuestionPrompt, Verdict};

/// The second seat of an active room is always occupied; treat its absence as
/// state corruption rather than a caller error.
fn seat_state(room: &Room, seat: Seat) -> Result<&PlayerSeat> {
    room.seat(seat)
        .ok_or_else(|| anyhow::anyhow!("active room missing {} seat", seat.as_str()))
}

fn seat_state_mut(room: &mut Room, seat: Seat) -> Result<&mut PlayerSeat> {
    room.seat_mut(seat)
        .ok_or_else(|| anyhow::anyhow!("active room missing {} seat", seat.as_str()))
}

impl<'a, S: State, O: QuestionOracle> Layer<'a, S, O> {
    // === Room Handler Methods ===

    pub(in crate::layer) async fn room_or_error(
        &mut self,
        room_code: &str,
        caller: &str,
    ) -> Result<std::result::Result<Room, Vec<Event>>> {
        match self.get(&Key::Room(room_code.to_owned())).await? {
            Some(Value::Room(room)) => Ok(Ok(room)),
            _ => Ok(Err(duel_error_vec(
                caller,
                Some(room_code),
                ERROR_ROOM_NOT_FOUND,
                "Room not found",
            ))),
        }
    }

    async fn active_room_or_error(
        &mut self,
        room_code: &str,
        caller: &str,
    ) -> Result<std::result::Result<Room, Vec<Event>>> {
        let room = match self.room_or_error(room_code, caller).await? {
            Ok(room) => room,
            Err(events) => return Ok(Err(events)),
        };
        if room.state != RoomState::Active {
            return Ok(Err(duel_error_vec(
                caller,
                Some(room_code),
                ERROR_ROOM_NOT_ACTIVE,
                "Game not active",
            )));
        }
        Ok(Ok(room))
    }

    /// Resolve caller membership, mapping an unparseable address to the same
    /// rejection a stranger gets.
    fn participant_or_error(
        room: &Room,
        room_code: &str,
        caller: &str,
    ) -> std::result::Result<(Address, Seat), Vec<Event>> {
        let address = match Address::parse(caller) {
            Ok(address) => address,
            Err(_) => {
                return Err(duel_error_vec(
                    caller,
                    Some(room_code),
                    ERROR_NOT_A_PARTICIPANT,
                    "Not a player in this room",
                ))
            }
        };
        match room.seat_of(&address) {
            Some(seat) => Ok((address, seat)),
            None => Err(duel_error_vec(
                caller,
                Some(room_code),
                ERROR_NOT_A_PARTICIPANT,
                "Not a player in this room",
            )),
        }
    }

    pub(in crate::layer) async fn handle_create_room(
        &mut self,
        room_code: &str,
        anime: &str,
        player: &str,
        league_code: &str,
    ) -> Result<Vec<Event>> {
        // Room codes are never reused, so any existing record blocks creation.
        if self.get(&Key::Room(room_code.to_owned())).await?.is_some() {
            return Ok(duel_error_vec(
                player,
                Some(room_code),
                ERROR_ROOM_CODE_TAKEN,
                "Room code already taken",
            ));
        }
        if room_code.len() < MIN_ROOM_CODE_LENGTH {
            return Ok(duel_error_vec(
                player,
                Some(room_code),
                ERROR_INVALID_CODE,
                "Room code must be at least 4 characters",
            ));
        }
        if anime.trim().len() < MIN_ANIME_LENGTH {
            return Ok(duel_error_vec(
                player,
                Some(room_code),
                ERROR_INVALID_ANIME,
                "Anime name too short",
            ));
        }
        let address = match Address::parse(player) {
            Ok(address) => address,
            Err(_) => {
                return Ok(duel_error_vec(
                    player,
                    Some(room_code),
                    ERROR_INVALID_ADDRESS,
                    "Invalid player address",
                ))
            }
        };

        let room = Room::new(
            address.clone(),
            anime.trim().to_owned(),
            league_code.trim().to_owned(),
        );
        self.insert(Key::Room(room_code.to_owned()), Value::Room(room));

        tracing::info!(room = room_code, player = %address, "room created");
        Ok(vec![Event::RoomCreated {
            room_code: room_code.to_owned(),
            player: address,
        }])
    }

    pub(in crate::layer) async fn handle_join_room(
        &mut self,
        room_code: &str,
        anime: &str,
        player: &str,
    ) -> Result<Vec<Event>> {
        let mut room = match self.room_or_error(room_code, player).await? {
            Ok(room) => room,
            Err(events) => return Ok(events),
        };
        if room.state != RoomState::Waiting {
            return Ok(duel_error_vec(
                player,
                Some(room_code),
                ERROR_ROOM_NOT_OPEN,
                "Room is not open",
            ));
        }
        if anime.trim().len() < MIN_ANIME_LENGTH {
            return Ok(duel_error_vec(
                player,
                Some(room_code),
                ERROR_INVALID_ANIME,
                "Anime name too short",
            ));
        }
        let address = match Address::parse(player) {
            Ok(address) => address,
            Err(_) => {
                return Ok(duel_error_vec(
                    player,
                    Some(room_code),
                    ERROR_INVALID_ADDRESS,
                    "Invalid player address",
                ))
            }
        };
        if address == room.player1.address {
            return Ok(duel_error_vec(
                player,
                Some(room_code),
                ERROR_OWN_ROOM,
                "Cannot join your own room",
            ));
        }

        let creator = room.player1.address.clone();
        room.player2 = Some(PlayerSeat::new(address.clone(), anime.trim().to_owned()));
        room.state = RoomState::Active;
        self.insert(Key::Room(room_code.to_owned()), Value::Room(room));

        // Joining is the single event that funds the match economy.
        self.mint(&creator, JOIN_BONUS).await?;
        self.mint(&address, JOIN_BONUS).await?;

        tracing::info!(room = room_code, player = %address, "room joined, match active");
        Ok(vec![Event::RoomJoined {
            room_code: room_code.to_owned(),
            player: address,
            join_bonus: JOIN_BONUS,
        }])
    }

    pub(in crate::layer) async fn handle_use_snipe(
        &mut self,
        room_code: &str,
        player: &str,
    ) -> Result<Vec<Event>> {
        let mut room = match self.active_room_or_error(room_code, player).await? {
            Ok(room) => room,
            Err(events) => return Ok(events),
        };
        let (address, seat) = match Self::participant_or_error(&room, room_code, player) {
            Ok(found) => found,
            Err(events) => return Ok(events),
        };

        let slot = seat_state_mut(&mut room, seat)?;
        if slot.power_up != PowerUp::Snipe {
            return Ok(duel_error_vec(
                player,
                Some(room_code),
                ERROR_NO_SNIPE,
                "No snipe powerup to use",
            ));
        }
        slot.power_up = PowerUp::None;
        slot.snipe_active = true;
        self.insert(Key::Room(room_code.to_owned()), Value::Room(room));

        Ok(vec![Event::SnipeActivated {
            room_code: room_code.to_owned(),
            player: address,
        }])
    }

    pub(in crate::layer) async fn handle_get_question(
        &mut self,
        room_code: &str,
        seat: Seat,
        question_num: u8,
    ) -> Result<Vec<Event>> {
        let mut room = match self.active_room_or_error(room_code, "").await? {
            Ok(room) => room,
            Err(events) => return Ok(events),
        };
        let answering = seat_state(&room, seat)?.address.as_str().to_owned();
        if question_num < 1 || question_num > QUESTIONS_PER_PLAYER {
            return Ok(duel_error_vec(
                &answering,
                Some(room_code),
                ERROR_INVALID_QUESTION_NUMBER,
                "Question number must be 1-40",
            ));
        }

        let anime1 = room.player1.anime.clone();
        let anime2 = seat_state(&room, Seat::P2)?.anime.clone();

        let mut snipe_consumed = false;
        let context = if question::is_wild_card(question_num) {
            // Wild-card rounds ignore snipe flags entirely; an armed snipe
            // stays set through questions 36-40.
            let suggested =
                question::wild_card_pick(room_code, question_num, &anime1, &anime2);
            PromptContext::WildCard {
                suggested: suggested.to_owned(),
                pool: question::WILD_CARD_POOL
                    .iter()
                    .map(|title| (*title).to_owned())
                    .collect(),
                excluded: [anime1, anime2],
            }
        } else {
            let opponent = seat.opponent();
            let mut anime = match seat {
                Seat::P1 => anime1,
                Seat::P2 => anime2,
            };
            let opponent_state = seat_state_mut(&mut room, opponent)?;
            let mut sniped = false;
            if opponent_state.snipe_active {
                // The snipe fires: this one question draws from the sniper's
                // selection and the flag is consumed.
                anime = opponent_state.anime.clone();
                opponent_state.snipe_active = false;
                snipe_consumed = true;
                sniped = true;
            }
            PromptContext::Normal {
                anime,
                category: question::category_for(question_num).to_owned(),
                sniped,
            }
        };

        let prompt = QuestionPrompt {
            room_code: room_code.to_owned(),
            seat,
            question_num,
            context,
        };
        let generated = self.oracle.generate_question(&prompt)?;

        if snipe_consumed {
            self.insert(Key::Room(room_code.to_owned()), Value::Room(room));
        }

        tracing::debug!(room = room_code, seat = seat.as_str(), question_num, "question issued");
        Ok(vec![Event::QuestionIssued {
            room_code: room_code.to_owned(),
            seat,
            question_num,
            question: generated,
        }])
    }

    pub(in crate::layer) async fn handle_submit_answer(
        &mut self,
        room_code: &str,
        question: &str,
        answer: &str,
        is_steal: bool,
        player: &str,
    ) -> Result<Vec<Event>> {
        let mut room = match self.active_room_or_error(room_code, player).await? {
            Ok(room) => room,
            Err(events) => return Ok(events),
        };
        let (address, seat) = match Self::participant_or_error(&room, room_code, player) {
            Ok(found) => found,
            Err(events) => return Ok(events),
        };

        let check = AnswerCheck {
            question: question.to_owned(),
            answer: answer.to_owned(),
        };
        let verdict = Verdict::parse(&self.oracle.check_answer(&check)?);

        // Steals are a side-channel on top of the turn structure: they settle
        // tokens but never touch question counters or streaks.
        if is_steal {
            return self.resolve_steal(room_code, room, seat, verdict).await;
        }

        let slot = seat_state_mut(&mut room, seat)?;
        slot.answered = slot.answered.saturating_add(1);

        let (outcome, tokens_moved) = if verdict.is_correct() {
            slot.wrong_streak = 0;
            slot.correct_streak += 1;
            if slot.correct_streak >= POWER_UP_STREAK {
                slot.power_up = slot.power_up.next();
                slot.correct_streak = 0;
            }
            self.insert(Key::Room(room_code.to_owned()), Value::Room(room));
            (AnswerOutcome::Correct, 0)
        } else {
            slot.correct_streak = 0;
            slot.wrong_streak += 1;
            if slot.wrong_streak >= WRONG_STREAK_BURN_THRESHOLD {
                slot.wrong_streak = 0;
                self.insert(Key::Room(room_code.to_owned()), Value::Room(room));
                let burned = self.burn(&address, STREAK_BURN_AMOUNT).await?;
                (AnswerOutcome::WrongBurn, burned)
            } else {
                self.insert(Key::Room(room_code.to_owned()), Value::Room(room));
                (AnswerOutcome::Wrong, 0)
            }
        };

        tracing::debug!(
            room = room_code,
            player = %address,
            outcome = outcome.as_str(),
            "answer resolved"
        );
        Ok(vec![Event::AnswerResolved {
            room_code: room_code.to_owned(),
            player: address,
            outcome,
            tokens_moved,
        }])
    }

    async fn resolve_steal(
        &mut self,
        room_code: &str,
        mut room: Room,
        stealer_seat: Seat,
        verdict: Verdict,
    ) -> Result<Vec<Event>> {
        let victim_seat = stealer_seat.opponent();
        let stealer = seat_state(&room, stealer_seat)?;
        let stealer_address = stealer.address.clone();
        let stealer_power = stealer.power_up;
        let victim = seat_state(&room, victim_seat)?;
        let victim_address = victim.address.clone();
        let victim_power = victim.power_up;

        let (outcome, tokens_moved) = if verdict.is_correct() {
            // A held shield absorbs the steal; the stealer's double-down
            // survives for a later attempt.
            if victim_power == PowerUp::Shield {
                seat_state_mut(&mut room, victim_seat)?.power_up = PowerUp::None;
                self.insert(Key::Room(room_code.to_owned()), Value::Room(room));
                (AnswerOutcome::StealBlocked, 0)
            } else {
                let mut amount = STEAL_AMOUNT;
                if stealer_power == PowerUp::DoubleDown {
                    amount = DOUBLE_DOWN_STEAL_AMOUNT;
                    seat_state_mut(&mut room, stealer_seat)?.power_up = PowerUp::None;
                    self.insert(Key::Room(room_code.to_owned()), Value::Room(room));
                }
                // Cap at the victim's balance so it never goes negative; a
                // zero-balance victim still yields a successful steal.
                let victim_balance = self.balance_of(&victim_address).await?;
                let capped = amount.min(victim_balance);
                let moved = if capped > 0 {
                    self.transfer(&victim_address, &stealer_address, capped)
                        .await?
                } else {
                    0
                };
                (AnswerOutcome::StealSuccess, moved)
            }
        } else {
            let burned = self.burn(&victim_address, FAILED_STEAL_BURN).await?;
            (AnswerOutcome::StealFailedBurn, burned)
        };

        tracing::debug!(
            room = room_code,
            player = %stealer_address,
            outcome = outcome.as_str(),
            tokens_moved,
            "steal resolved"
        );
        Ok(vec![Event::AnswerResolved {
            room_code: room_code.to_owned(),
            player: stealer_address,
            outcome,
            tokens_moved,
        }])
    }

    pub(in crate::layer) async fn handle_forfeit_game(
        &mut self,
        room_code: &str,
        active_player: &str,
    ) -> Result<Vec<Event>> {
        let mut room = match self.active_room_or_error(room_code, active_player).await? {
            Ok(room) => room,
            Err(events) => return Ok(events),
        };
        let (address, seat) = match Self::participant_or_error(&room, room_code, active_player) {
            Ok(found) => found,
            Err(events) => return Ok(events),
        };

        // The caller is the player still present; the other seat quit.
        let quitter = seat_state(&room, seat.opponent())?.address.clone();
        let quitter_balance = self.balance_of(&quitter).await?;
        let half = quitter_balance / 2;
        let remainder = quitter_balance - half;

        let transferred = if half > 0 {
            self.transfer(&quitter, &address, half).await?
        } else {
            0
        };
        let burned = if remainder > 0 {
            self.burn(&quitter, remainder).await?
        } else {
            0
        };
        self.mint(&address, WIN_BONUS).await?;

        room.state = RoomState::Finished;
        room.winner = Winner::Player(address.clone());
        self.insert(Key::Room(room_code.to_owned()), Value::Room(room));

        tracing::info!(
            room = room_code,
            winner = %address,
            transferred,
            burned,
            "game forfeited"
        );
        Ok(vec![Event::GameForfeited {
            room_code: room_code.to_owned(),
            winner: address,
            transferred,
            burned,
        }])
    }

    pub(in crate::layer) async fn handle_end_game(
        &mut self,
        room_code: &str,
        player: &str,
    ) -> Result<Vec<Event>> {
        let mut room = match self.active_room_or_error(room_code, player).await? {
            Ok(room) => room,
            Err(events) => return Ok(events),
        };
        if let Err(events) = Self::participant_or_error(&room, room_code, player) {
            return Ok(events);
        }

        let q1 = room.player1.answered;
        let q2 = seat_state(&room, Seat::P2)?.answered;
        if q1 < QUESTIONS_PER_PLAYER || q2 < QUESTIONS_PER_PLAYER {
            return Ok(duel_error_vec(
                player,
                Some(room_code),
                ERROR_GAME_INCOMPLETE,
                format!("Game not complete. P1: {q1}/40, P2: {q2}/40"),
            ));
        }

        let p1_address = room.player1.address.clone();
        let p2_address = seat_state(&room, Seat::P2)?.address.clone();
        let p1_balance = self.balance_of(&p1_address).await?;
        let p2_balance = self.balance_of(&p2_address).await?;

        let winner = if p1_balance > p2_balance {
            Winner::Player(p1_address)
        } else if p2_balance > p1_balance {
            Winner::Player(p2_address)
        } else {
            Winner::Tie
        };
        if let Winner::Player(address) = &winner {
            self.mint(address, WIN_BONUS).await?;
        }

        room.state = RoomState::Finished;
        room.winner = winner.clone();
        self.insert(Key::Room(room_code.to_owned()), Value::Room(room));

        tracing::info!(room = room_code, winner = winner.projection(), "game ended");
        Ok(vec![Event::GameEnded {
            room_code: room_code.to_owned(),
            winner,
        }])
    }

    pub(in crate::layer) async fn handle_reset_match_balance(
        &mut self,
        room_code: &str,
        player: &str,
    ) -> Result<Vec<Event>> {
        let room = match self.active_room_or_error(room_code, player).await? {
            Ok(room) => room,
            Err(events) => return Ok(events),
        };
        let (address, _) = match Self::participant_or_error(&room, room_code, player) {
            Ok(found) => found,
            Err(events) => return Ok(events),
        };

        // Fresh AI matches start from the canonical stake regardless of what
        // earlier games left behind.
        let previous_balance = self.reset_balance(&address, MATCH_RESET_BALANCE).await?;

        Ok(vec![Event::MatchBalanceReset {
            room_code: room_code.to_owned(),
            player: address,
            previous_balance,
        }])
    }
}
