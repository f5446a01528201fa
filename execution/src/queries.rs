//! Read-only projections of duel state.
//!
//! Every projection is a pipe-delimited string whose exact field order is a
//! compatibility surface for existing clients; extend by appending, never by
//! reordering.

use anyhow::Result;
use duelist_types::duel::{Address, TokenStats};
use duelist_types::execution::{Key, Value};

use crate::state::State;

/// Balance lookup; unknown (or malformed) addresses read as zero.
pub async fn balance_of<S: State>(state: &S, address: &str) -> Result<u64> {
    let Ok(address) = Address::parse(address) else {
        return Ok(0);
    };
    Ok(match state.get(&Key::Balance(address)).await? {
        Some(Value::Balance(balance)) => balance,
        _ => 0,
    })
}

/// `total_supply|total_burned`
pub async fn token_stats<S: State>(state: &S) -> Result<String> {
    let stats = match state.get(&Key::TokenStats).await? {
        Some(Value::TokenStats(stats)) => stats,
        _ => TokenStats::default(),
    };
    Ok(format!("{}|{}", stats.total_supply, stats.total_burned))
}

/// Bare lifecycle state, or `not_found`.
pub async fn room_state<S: State>(state: &S, room_code: &str) -> Result<String> {
    Ok(match state.get(&Key::Room(room_code.to_owned())).await? {
        Some(Value::Room(room)) => room.state.as_str().to_owned(),
        _ => "not_found".to_owned(),
    })
}

/// `state|p1|p2|anime1|anime2|p1_bal|p2_bal|q1|q2|powerup1|powerup2|winner|snipe1|snipe2|bets_p1|bets_p2|p1_correct_streak|p2_correct_streak|p1_wrong_streak|p2_wrong_streak|league_code`
/// or `not_found`. Seat-two fields print as empty/zero while the room waits.
pub async fn room_info<S: State>(state: &S, room_code: &str) -> Result<String> {
    let room = match state.get(&Key::Room(room_code.to_owned())).await? {
        Some(Value::Room(room)) => room,
        _ => return Ok("not_found".to_owned()),
    };

    let (p1_bal, p2_bal) = futures::try_join!(
        balance_of(state, room.player1.address.as_str()),
        async {
            match room.player2.as_ref() {
                Some(seat) => balance_of(state, seat.address.as_str()).await,
                None => Ok(0),
            }
        }
    )?;

    let p1 = &room.player1;
    let p2 = room.player2.as_ref();
    Ok(format!(
        "{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}",
        room.state.as_str(),
        p1.address.as_str(),
        p2.map(|seat| seat.address.as_str()).unwrap_or(""),
        p1.anime,
        p2.map(|seat| seat.anime.as_str()).unwrap_or(""),
        p1_bal,
        p2_bal,
        p1.answered,
        p2.map(|seat| seat.answered).unwrap_or(0),
        p1.power_up.as_str(),
        p2.map(|seat| seat.power_up.as_str()).unwrap_or(""),
        room.winner.projection(),
        p1.snipe_active as u8,
        p2.map(|seat| seat.snipe_active as u8).unwrap_or(0),
        room.pool_p1,
        room.pool_p2,
        p1.correct_streak,
        p2.map(|seat| seat.correct_streak).unwrap_or(0),
        p1.wrong_streak,
        p2.map(|seat| seat.wrong_streak).unwrap_or(0),
        room.league_code,
    ))
}

/// `side|amount|claimed`, or the literal `none`.
pub async fn bettor_info<S: State>(state: &S, room_code: &str, bettor: &str) -> Result<String> {
    let Ok(bettor) = Address::parse(bettor) else {
        return Ok("none".to_owned());
    };
    let key = Key::Bet {
        room_code: room_code.to_owned(),
        bettor,
    };
    Ok(match state.get(&key).await? {
        Some(Value::Bet(bet)) => format!(
            "{}|{}|{}",
            bet.side.as_str(),
            bet.amount,
            bet.claimed as u8
        ),
        _ => "none".to_owned(),
    })
}

/// `name|creator|member_count|created_at`, or `not_found`.
pub async fn league_info<S: State>(state: &S, league_code: &str) -> Result<String> {
    Ok(
        match state.get(&Key::League(league_code.to_owned())).await? {
            Some(Value::League(league)) => format!(
                "{}|{}|{}|{}",
                league.name,
                league.creator.as_str(),
                league.member_count,
                league.created_at
            ),
            _ => "not_found".to_owned(),
        },
    )
}

/// Member address at an ordinal index, or the empty string.
pub async fn league_member<S: State>(state: &S, league_code: &str, index: u32) -> Result<String> {
    let key = Key::LeagueMemberIndex {
        league_code: league_code.to_owned(),
        index,
    };
    Ok(match state.get(&key).await? {
        Some(Value::LeagueMemberIndex(address)) => address.as_str().to_owned(),
        _ => String::new(),
    })
}

/// `wins|losses|tokens_earned|games`, or `not_found`.
pub async fn member_stats<S: State>(state: &S, league_code: &str, member: &str) -> Result<String> {
    let Ok(member) = Address::parse(member) else {
        return Ok("not_found".to_owned());
    };
    let key = Key::LeagueMember {
        league_code: league_code.to_owned(),
        member,
    };
    Ok(match state.get(&key).await? {
        Some(Value::LeagueMember(stats)) => format!(
            "{}|{}|{}|{}",
            stats.wins, stats.losses, stats.tokens_earned, stats.games
        ),
        _ => "not_found".to_owned(),
    })
}
