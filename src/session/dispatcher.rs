//! Action dispatcher
//!
//! Runs one [`Action`] against the chain and appends the operator-facing
//! report to `out`. Mutating actions report the relevant balances before
//! and after the transaction; when the transaction fails, the lines written
//! so far stay in `out` and the error is returned.

use crate::crypto::to_checksum_address;
use crate::rpc::ChainClient;
use crate::session::{Action, SessionContext, SessionError};
use ethereum_types::{Address, U256};

pub async fn dispatch<C: ChainClient>(
    ctx: &mut SessionContext,
    chain: &C,
    action: &Action,
    out: &mut Vec<String>,
) -> Result<(), SessionError> {
    let me = ctx.account.address();

    match action {
        Action::TotalSupply => {
            let supply = ctx.token.total_supply(chain).await?;
            out.push(format!("Total supply of {} token is {}", ctx.symbol, supply));
        }

        Action::Balance { owner } => {
            let balance = ctx.token.balance_of(chain, *owner).await?;
            out.push(format!(
                "Address {} has {} {}",
                to_checksum_address(owner),
                balance,
                ctx.symbol
            ));
        }

        Action::Transfer { to, amount } => {
            out.push("Before transfer".to_string());
            transfer_report(ctx, chain, me, *to, out).await?;

            let data = ctx.token.transfer_data(*to, *amount)?;
            let receipt = ctx.submit(chain, data).await?;
            out.push(format!(
                "✅ Transferred {} {} to {} (tx {:?})",
                amount,
                ctx.symbol,
                to_checksum_address(to),
                receipt.transaction_hash
            ));

            out.push("After transfer".to_string());
            transfer_report(ctx, chain, me, *to, out).await?;
        }

        Action::Mint { amount } => {
            supply_report(ctx, chain, me, "before mint", out).await?;

            let data = ctx.token.mint_data(*amount)?;
            let receipt = ctx.submit(chain, data).await?;
            out.push(format!(
                "✅ Minted {} {} (tx {:?})",
                amount, ctx.symbol, receipt.transaction_hash
            ));

            supply_report(ctx, chain, me, "after mint", out).await?;
        }

        Action::Burn { amount } => {
            supply_report(ctx, chain, me, "before burn", out).await?;

            let data = ctx.token.burn_data(*amount)?;
            let receipt = ctx.submit(chain, data).await?;
            out.push(format!(
                "🔥 Burned {} {} (tx {:?})",
                amount, ctx.symbol, receipt.transaction_hash
            ));

            supply_report(ctx, chain, me, "after burn", out).await?;
        }
    }

    Ok(())
}

async fn transfer_report<C: ChainClient>(
    ctx: &SessionContext,
    chain: &C,
    me: Address,
    receiver: Address,
    out: &mut Vec<String>,
) -> Result<(), SessionError> {
    let mine = ctx.token.balance_of(chain, me).await?;
    let theirs = ctx.token.balance_of(chain, receiver).await?;
    out.push(format!("Your account balance: {} {}", mine, ctx.symbol));
    out.push(format!("Receiver balance: {} {}", theirs, ctx.symbol));
    Ok(())
}

async fn supply_report<C: ChainClient>(
    ctx: &SessionContext,
    chain: &C,
    me: Address,
    when: &str,
    out: &mut Vec<String>,
) -> Result<(), SessionError> {
    let supply: U256 = ctx.token.total_supply(chain).await?;
    let balance = ctx.token.balance_of(chain, me).await?;
    out.push(format!(
        "Total supply of {} token {} is {}",
        ctx.symbol, when, supply
    ));
    out.push(format!(
        "Your account balance {}: {} {}",
        when, balance, ctx.symbol
    ));
    Ok(())
}
