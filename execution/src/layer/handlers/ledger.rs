use super::super::*;
use duelist_types::duel::{Address, TokenStats};

/// GOT ledger primitives.
///
/// These are the only balance/supply mutators in the system; the room,
/// betting, and league handlers move tokens exclusively through them.
/// `burn` and `transfer` preserve the historical silent no-op on an
/// insufficient balance, but report the amount actually moved so callers can
/// journal "moved N of requested M" instead of swallowing it.
impl<'a, S: State, O: QuestionOracle> Layer<'a, S, O> {
    pub(in crate::layer) async fn balance_of(&self, addr: &Address) -> Result<u64> {
        Ok(match self.get(&Key::Balance(addr.clone())).await? {
            Some(Value::Balance(balance)) => balance,
            _ => 0,
        })
    }

    pub(in crate::layer) async fn token_stats(&self) -> Result<TokenStats> {
        Ok(match self.get(&Key::TokenStats).await? {
            Some(Value::TokenStats(stats)) => stats,
            _ => TokenStats::default(),
        })
    }

    /// Credit newly issued tokens. Never fails and enforces no upper bound.
    pub(in crate::layer) async fn mint(&mut self, addr: &Address, amount: u64) -> Result<()> {
        let balance = self.balance_of(addr).await?;
        let mut stats = self.token_stats().await?;
        stats.total_supply = stats.total_supply.saturating_add(amount);
        self.insert(
            Key::Balance(addr.clone()),
            Value::Balance(balance.saturating_add(amount)),
        );
        self.insert(Key::TokenStats, Value::TokenStats(stats));
        Ok(())
    }

    /// Destroy `amount` tokens if the balance covers it; otherwise a no-op.
    /// Partial burns never occur. Returns the amount actually burned.
    pub(in crate::layer) async fn burn(&mut self, addr: &Address, amount: u64) -> Result<u64> {
        let balance = self.balance_of(addr).await?;
        if balance < amount {
            return Ok(0);
        }
        let mut stats = self.token_stats().await?;
        stats.total_supply = stats.total_supply.saturating_sub(amount);
        stats.total_burned = stats.total_burned.saturating_add(amount);
        self.insert(Key::Balance(addr.clone()), Value::Balance(balance - amount));
        self.insert(Key::TokenStats, Value::TokenStats(stats));
        Ok(amount)
    }

    /// Move `amount` between balances if the source covers it; otherwise a
    /// no-op. Returns the amount actually moved.
    pub(in crate::layer) async fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<u64> {
        let from_balance = self.balance_of(from).await?;
        if from_balance < amount {
            return Ok(0);
        }
        let to_balance = self.balance_of(to).await?;
        self.insert(
            Key::Balance(from.clone()),
            Value::Balance(from_balance - amount),
        );
        self.insert(
            Key::Balance(to.clone()),
            Value::Balance(to_balance.saturating_add(amount)),
        );
        Ok(amount)
    }

    /// Move a stake out of a balance and into a room pool. The tokens stay in
    /// `total_supply` while held. Returns false (staging nothing) if the
    /// balance cannot cover the stake.
    pub(in crate::layer) async fn escrow_debit(
        &mut self,
        addr: &Address,
        amount: u64,
    ) -> Result<bool> {
        let balance = self.balance_of(addr).await?;
        if balance < amount {
            return Ok(false);
        }
        self.insert(Key::Balance(addr.clone()), Value::Balance(balance - amount));
        Ok(true)
    }

    /// Pay a pool-held amount back into a balance.
    pub(in crate::layer) async fn escrow_credit(
        &mut self,
        addr: &Address,
        amount: u64,
    ) -> Result<()> {
        let balance = self.balance_of(addr).await?;
        self.insert(
            Key::Balance(addr.clone()),
            Value::Balance(balance.saturating_add(amount)),
        );
        Ok(())
    }

    /// Set a balance to exactly `target`, adjusting supply by the delta.
    /// Returns the previous balance.
    pub(in crate::layer) async fn reset_balance(
        &mut self,
        addr: &Address,
        target: u64,
    ) -> Result<u64> {
        let previous = self.balance_of(addr).await?;
        let mut stats = self.token_stats().await?;
        stats.total_supply = stats
            .total_supply
            .saturating_sub(previous)
            .saturating_add(target);
        self.insert(Key::Balance(addr.clone()), Value::Balance(target));
        self.insert(Key::TokenStats, Value::TokenStats(stats));
        Ok(previous)
    }
}
