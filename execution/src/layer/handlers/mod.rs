use super::*;

fn duel_error(
    address: &str,
    room_code: Option<&str>,
    error_code: u8,
    message: impl Into<String>,
) -> Event {
    Event::DuelError {
        address: address.to_owned(),
        room_code: room_code.map(str::to_owned),
        error_code,
        message: message.into(),
    }
}

fn duel_error_vec(
    address: &str,
    room_code: Option<&str>,
    error_code: u8,
    message: impl Into<String>,
) -> Vec<Event> {
    vec![duel_error(address, room_code, error_code, message)]
}

mod betting;
mod league;
mod ledger;
mod room;
