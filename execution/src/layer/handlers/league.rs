use super::super::*;
use super::duel_error_vec;
use duelist_types::duel::{
    Address, League, MemberStats, ERROR_ALREADY_MEMBER, ERROR_INVALID_ADDRESS,
    ERROR_INVALID_LEAGUE_NAME, ERROR_INVALID_CODE, ERROR_LEAGUE_CODE_TAKEN,
    ERROR_LEAGUE_NOT_FOUND, MIN_LEAGUE_CODE_LENGTH, MIN_LEAGUE_NAME_LENGTH,
};

impl<'a, S: State, O: QuestionOracle> Layer<'a, S, O> {
    // === League Handler Methods ===

    async fn league_or_error(
        &mut self,
        league_code: &str,
        caller: &str,
    ) -> Result<std::result::Result<League, Vec<Event>>> {
        match self.get(&Key::League(league_code.to_owned())).await? {
            Some(Value::League(league)) => Ok(Ok(league)),
            _ => Ok(Err(duel_error_vec(
                caller,
                None,
                ERROR_LEAGUE_NOT_FOUND,
                "League not found",
            ))),
        }
    }

    async fn member_stats(
        &mut self,
        league_code: &str,
        member: &Address,
    ) -> Result<Option<MemberStats>> {
        Ok(
            match self
                .get(&Key::LeagueMember {
                    league_code: league_code.to_owned(),
                    member: member.clone(),
                })
                .await?
            {
                Some(Value::LeagueMember(stats)) => Some(stats),
                _ => None,
            },
        )
    }

    pub(in crate::layer) async fn handle_create_league(
        &mut self,
        league_code: &str,
        name: &str,
        creator: &str,
        created_at: u64,
    ) -> Result<Vec<Event>> {
        if league_code.len() < MIN_LEAGUE_CODE_LENGTH {
            return Ok(duel_error_vec(
                creator,
                None,
                ERROR_INVALID_CODE,
                "League code must be at least 4 characters",
            ));
        }
        if self
            .get(&Key::League(league_code.to_owned()))
            .await?
            .is_some()
        {
            return Ok(duel_error_vec(
                creator,
                None,
                ERROR_LEAGUE_CODE_TAKEN,
                "League code already taken",
            ));
        }
        if name.trim().len() < MIN_LEAGUE_NAME_LENGTH {
            return Ok(duel_error_vec(
                creator,
                None,
                ERROR_INVALID_LEAGUE_NAME,
                "League name too short",
            ));
        }
        let address = match Address::parse(creator) {
            Ok(address) => address,
            Err(_) => {
                return Ok(duel_error_vec(
                    creator,
                    None,
                    ERROR_INVALID_ADDRESS,
                    "Invalid creator address",
                ))
            }
        };

        // The creator seeds the membership list at ordinal zero.
        self.insert(
            Key::League(league_code.to_owned()),
            Value::League(League {
                name: name.trim().to_owned(),
                creator: address.clone(),
                created_at,
                member_count: 1,
            }),
        );
        self.insert(
            Key::LeagueMemberIndex {
                league_code: league_code.to_owned(),
                index: 0,
            },
            Value::LeagueMemberIndex(address.clone()),
        );
        self.insert(
            Key::LeagueMember {
                league_code: league_code.to_owned(),
                member: address.clone(),
            },
            Value::LeagueMember(MemberStats::default()),
        );

        tracing::info!(league = league_code, creator = %address, "league created");
        Ok(vec![Event::LeagueCreated {
            league_code: league_code.to_owned(),
            creator: address,
        }])
    }

    pub(in crate::layer) async fn handle_join_league(
        &mut self,
        league_code: &str,
        member: &str,
    ) -> Result<Vec<Event>> {
        let mut league = match self.league_or_error(league_code, member).await? {
            Ok(league) => league,
            Err(events) => return Ok(events),
        };
        let address = match Address::parse(member) {
            Ok(address) => address,
            Err(_) => {
                return Ok(duel_error_vec(
                    member,
                    None,
                    ERROR_INVALID_ADDRESS,
                    "Invalid address",
                ))
            }
        };
        if self.member_stats(league_code, &address).await?.is_some() {
            return Ok(duel_error_vec(
                member,
                None,
                ERROR_ALREADY_MEMBER,
                "Already a member of this league",
            ));
        }

        let index = league.member_count;
        league.member_count += 1;
        self.insert(
            Key::LeagueMemberIndex {
                league_code: league_code.to_owned(),
                index,
            },
            Value::LeagueMemberIndex(address.clone()),
        );
        self.insert(
            Key::LeagueMember {
                league_code: league_code.to_owned(),
                member: address.clone(),
            },
            Value::LeagueMember(MemberStats::default()),
        );
        self.insert(Key::League(league_code.to_owned()), Value::League(league));

        Ok(vec![Event::LeagueJoined {
            league_code: league_code.to_owned(),
            member: address,
            index,
        }])
    }

    pub(in crate::layer) async fn handle_record_league_result(
        &mut self,
        league_code: &str,
        winner: &str,
        loser: &str,
        winner_delta: i64,
        loser_delta: i64,
    ) -> Result<Vec<Event>> {
        if let Err(events) = self.league_or_error(league_code, winner).await? {
            return Ok(events);
        }

        // League results may reference addresses that never joined (a match
        // against an outsider); those sides are skipped without error.
        let mut winner_counted = false;
        if let Ok(address) = Address::parse(winner) {
            if let Some(mut stats) = self.member_stats(league_code, &address).await? {
                stats.wins += 1;
                stats.games += 1;
                stats.tokens_earned = stats.tokens_earned.saturating_add(winner_delta);
                self.insert(
                    Key::LeagueMember {
                        league_code: league_code.to_owned(),
                        member: address,
                    },
                    Value::LeagueMember(stats),
                );
                winner_counted = true;
            }
        }

        let mut loser_counted = false;
        if let Ok(address) = Address::parse(loser) {
            if let Some(mut stats) = self.member_stats(league_code, &address).await? {
                stats.losses += 1;
                stats.games += 1;
                stats.tokens_earned = stats.tokens_earned.saturating_add(loser_delta);
                self.insert(
                    Key::LeagueMember {
                        league_code: league_code.to_owned(),
                        member: address,
                    },
                    Value::LeagueMember(stats),
                );
                loser_counted = true;
            }
        }

        Ok(vec![Event::LeagueResultRecorded {
            league_code: league_code.to_owned(),
            winner_counted,
            loser_counted,
        }])
    }
}
