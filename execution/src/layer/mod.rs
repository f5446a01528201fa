use anyhow::Result;
use duelist_types::execution::{Event, Instruction, Key, Output, Value};
use std::collections::BTreeMap;

use crate::oracle::QuestionOracle;
use crate::state::{State, Status};

mod handlers;

/// One batch of instructions applied against shared state.
///
/// Writes are buffered in a pending overlay keyed like the backing store;
/// reads consult the overlay first so every instruction observes the effects
/// of the ones before it. A precondition violation journals a `DuelError`
/// event without staging anything, and an internal error aborts the whole
/// batch, so no transition is ever half-applied. `commit` hands the final
/// changeset back to the host for durable application.
pub struct Layer<'a, S: State, O: QuestionOracle> {
    state: &'a S,
    oracle: &'a O,
    pending: BTreeMap<Key, Status>,
}

impl<'a, S: State, O: QuestionOracle> Layer<'a, S, O> {
    pub fn new(state: &'a S, oracle: &'a O) -> Self {
        Self {
            state,
            oracle,
            pending: BTreeMap::new(),
        }
    }

    fn insert(&mut self, key: Key, value: Value) {
        self.pending.insert(key, Status::Update(value));
    }

    async fn apply(&mut self, instruction: &Instruction) -> Result<Vec<Event>> {
        match instruction {
            // Room engine
            Instruction::CreateRoom {
                room_code,
                anime,
                player,
                league_code,
            } => {
                self.handle_create_room(room_code, anime, player, league_code)
                    .await
            }
            Instruction::JoinRoom {
                room_code,
                anime,
                player,
            } => self.handle_join_room(room_code, anime, player).await,
            Instruction::UseSnipe { room_code, player } => {
                self.handle_use_snipe(room_code, player).await
            }
            Instruction::GetQuestion {
                room_code,
                seat,
                question_num,
            } => {
                self.handle_get_question(room_code, *seat, *question_num)
                    .await
            }
            Instruction::SubmitAnswer {
                room_code,
                question,
                answer,
                is_steal,
                player,
            } => {
                self.handle_submit_answer(room_code, question, answer, *is_steal, player)
                    .await
            }
            Instruction::ForfeitGame {
                room_code,
                active_player,
            } => self.handle_forfeit_game(room_code, active_player).await,
            Instruction::EndGame { room_code, player } => {
                self.handle_end_game(room_code, player).await
            }
            Instruction::ResetMatchBalance { room_code, player } => {
                self.handle_reset_match_balance(room_code, player).await
            }

            // Betting pool
            Instruction::SpectatorAirdrop { address } => {
                self.handle_spectator_airdrop(address).await
            }
            Instruction::PlaceBet {
                room_code,
                bettor,
                side,
                amount,
            } => {
                self.handle_place_bet(room_code, bettor, *side, *amount)
                    .await
            }
            Instruction::ClaimWinnings { room_code, bettor } => {
                self.handle_claim_winnings(room_code, bettor).await
            }

            // League registry
            Instruction::CreateLeague {
                league_code,
                name,
                creator,
                created_at,
            } => {
                self.handle_create_league(league_code, name, creator, *created_at)
                    .await
            }
            Instruction::JoinLeague {
                league_code,
                member,
            } => self.handle_join_league(league_code, member).await,
            Instruction::RecordLeagueResult {
                league_code,
                winner,
                loser,
                winner_delta,
                loser_delta,
            } => {
                self.handle_record_league_result(
                    league_code,
                    winner,
                    loser,
                    *winner_delta,
                    *loser_delta,
                )
                .await
            }
        }
    }

    pub async fn execute(&mut self, instructions: Vec<Instruction>) -> Result<Vec<Output>> {
        let mut outputs = Vec::new();
        for instruction in instructions {
            outputs.extend(
                self.apply(&instruction)
                    .await?
                    .into_iter()
                    .map(Output::Event),
            );
            outputs.push(Output::Instruction(instruction));
        }
        Ok(outputs)
    }

    pub fn commit(self) -> Vec<(Key, Status)> {
        self.pending.into_iter().collect()
    }
}

impl<'a, S: State, O: QuestionOracle> State for Layer<'a, S, O> {
    async fn get(&self, key: &Key) -> Result<Option<Value>> {
        Ok(match self.pending.get(key) {
            Some(Status::Update(value)) => Some(value.clone()),
            Some(Status::Delete) => None,
            None => self.state.get(key).await?,
        })
    }

    async fn insert(&mut self, key: Key, value: Value) -> Result<()> {
        self.pending.insert(key, Status::Update(value));
        Ok(())
    }

    async fn delete(&mut self, key: &Key) -> Result<()> {
        self.pending.insert(key.clone(), Status::Delete);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::ScriptedOracle;
    use crate::state::Memory;
    use commonware_runtime::deterministic::Runner;
    use commonware_runtime::Runner as _;
    use duelist_types::duel::{
        PowerUp, RoomState, Winner, ERROR_INVALID_ADDRESS, ERROR_INVALID_ANIME,
        ERROR_INVALID_CODE, ERROR_ROOM_CODE_TAKEN, ERROR_ROOM_NOT_FOUND, JOIN_BONUS,
    };

    const P1: &str = "0x00000000000000p1";
    const P2: &str = "0x00000000000000p2";

    fn create(room_code: &str, anime: &str, player: &str) -> Instruction {
        Instruction::CreateRoom {
            room_code: room_code.to_string(),
            anime: anime.to_string(),
            player: player.to_string(),
            league_code: String::new(),
        }
    }

    fn join(room_code: &str, anime: &str, player: &str) -> Instruction {
        Instruction::JoinRoom {
            room_code: room_code.to_string(),
            anime: anime.to_string(),
            player: player.to_string(),
        }
    }

    fn error_code(events: &[Event]) -> Option<u8> {
        events.iter().find_map(|event| match event {
            Event::DuelError { error_code, .. } => Some(*error_code),
            _ => None,
        })
    }

    #[test]
    fn test_create_and_join_room() {
        let executor = Runner::default();
        executor.start(|_| async move {
            let state = Memory::default();
            let oracle = ScriptedOracle::new();
            let mut layer = Layer::new(&state, &oracle);

            let events = layer.apply(&create("room1", "Naruto", P1)).await.unwrap();
            assert!(matches!(
                events.as_slice(),
                [Event::RoomCreated { room_code, .. }] if room_code == "room1"
            ));

            let events = layer.apply(&join("room1", "Bleach", P2)).await.unwrap();
            assert!(matches!(
                events.as_slice(),
                [Event::RoomJoined { join_bonus, .. }] if *join_bonus == JOIN_BONUS
            ));

            // Join activates the room and funds both players.
            if let Some(Value::Room(room)) = layer
                .get(&Key::Room("room1".to_string()))
                .await
                .unwrap()
            {
                assert_eq!(room.state, RoomState::Active);
                assert_eq!(room.player1.power_up, PowerUp::None);
                assert_eq!(room.winner, Winner::Undecided);
                assert_eq!(room.player2.as_ref().unwrap().anime, "Bleach");
            } else {
                panic!("Room not found");
            }
            assert_eq!(crate::queries::balance_of(&layer, P1).await.unwrap(), 20);
            assert_eq!(crate::queries::balance_of(&layer, P2).await.unwrap(), 20);
            assert_eq!(
                crate::queries::token_stats(&layer).await.unwrap(),
                "40|0"
            );

            let _ = layer.commit();
        });
    }

    #[test]
    fn test_create_room_rejections() {
        let executor = Runner::default();
        executor.start(|_| async move {
            let state = Memory::default();
            let oracle = ScriptedOracle::new();
            let mut layer = Layer::new(&state, &oracle);

            let events = layer.apply(&create("r1", "Naruto", P1)).await.unwrap();
            assert_eq!(error_code(&events), Some(ERROR_INVALID_CODE));

            let events = layer.apply(&create("room1", " N ", P1)).await.unwrap();
            assert_eq!(error_code(&events), Some(ERROR_INVALID_ANIME));

            let events = layer.apply(&create("room1", "Naruto", "short")).await.unwrap();
            assert_eq!(error_code(&events), Some(ERROR_INVALID_ADDRESS));

            // Nothing staged by any rejection.
            assert!(layer
                .get(&Key::Room("room1".to_string()))
                .await
                .unwrap()
                .is_none());

            let _ = layer.apply(&create("room1", "Naruto", P1)).await.unwrap();
            let events = layer.apply(&create("room1", "Bleach", P2)).await.unwrap();
            assert_eq!(error_code(&events), Some(ERROR_ROOM_CODE_TAKEN));

            let events = layer.apply(&join("nope", "Bleach", P2)).await.unwrap();
            assert_eq!(error_code(&events), Some(ERROR_ROOM_NOT_FOUND));

            let _ = layer.commit();
        });
    }

    #[test]
    fn test_execute_echoes_instructions_after_events() {
        let executor = Runner::default();
        executor.start(|_| async move {
            let state = Memory::default();
            let oracle = ScriptedOracle::new();
            let mut layer = Layer::new(&state, &oracle);

            let outputs = layer
                .execute(vec![create("room1", "Naruto", P1), join("room1", "Bleach", P2)])
                .await
                .unwrap();

            assert_eq!(outputs.len(), 4);
            assert!(matches!(outputs[0], Output::Event(Event::RoomCreated { .. })));
            assert!(matches!(outputs[1], Output::Instruction(Instruction::CreateRoom { .. })));
            assert!(matches!(outputs[2], Output::Event(Event::RoomJoined { .. })));
            assert!(matches!(outputs[3], Output::Instruction(Instruction::JoinRoom { .. })));

            let _ = layer.commit();
        });
    }

    #[test]
    fn test_execute_is_deterministic_for_identical_inputs() {
        let executor = Runner::default();
        executor.start(|_| async move {
            let state1 = Memory::default();
            let state2 = Memory::default();
            let oracle = ScriptedOracle::always("correct");

            let instructions = vec![
                create("room1", "Naruto", P1),
                join("room1", "Bleach", P2),
                Instruction::SubmitAnswer {
                    room_code: "room1".to_string(),
                    question: "q1".to_string(),
                    answer: "a".to_string(),
                    is_steal: false,
                    player: P1.to_string(),
                },
            ];

            let mut layer1 = Layer::new(&state1, &oracle);
            let mut layer2 = Layer::new(&state2, &oracle);

            let outputs1 = layer1.execute(instructions.clone()).await.unwrap();
            let outputs2 = layer2.execute(instructions).await.unwrap();

            assert_eq!(outputs1, outputs2);
            assert!(layer1.commit() == layer2.commit());
        });
    }

    #[test]
    fn test_commit_applies_to_backing_state() {
        let executor = Runner::default();
        executor.start(|_| async move {
            let mut state = Memory::default();
            let oracle = ScriptedOracle::new();

            let changes = {
                let mut layer = Layer::new(&state, &oracle);
                layer
                    .execute(vec![create("room1", "Naruto", P1), join("room1", "Bleach", P2)])
                    .await
                    .unwrap();
                layer.commit()
            };
            state.apply(changes).await.unwrap();

            assert_eq!(
                crate::queries::room_state(&state, "room1").await.unwrap(),
                "active"
            );
            assert_eq!(crate::queries::balance_of(&state, P1).await.unwrap(), 20);
        });
    }
}
