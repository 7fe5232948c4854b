//! The menu loop

use crate::rpc::ChainClient;
use crate::session::{dispatch, Action, Console, MenuChoice, SessionContext, SessionError, MENU};
use std::io::{BufRead, Write};

/// Why the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Operator picked Exit
    Exit,
    /// Operator answered no to the continuation question
    Declined,
    EndOfInput,
}

/// Run the menu until the operator leaves or a fatal error occurs
///
/// Recoverable failures (node errors, reverts, receipt timeouts) are
/// reported and the loop continues; a lost connection ends the session with
/// an error.
pub async fn run_session<C, R, W>(
    ctx: &mut SessionContext,
    chain: &C,
    console: &mut Console<R, W>,
) -> Result<SessionEnd, SessionError>
where
    C: ChainClient,
    R: BufRead,
    W: Write,
{
    loop {
        console.write_line("")?;
        console.write_line(MENU)?;

        let Some(input) = console.prompt("\nEnter your choice: ")? else {
            return Ok(SessionEnd::EndOfInput);
        };
        let choice = match input.parse::<MenuChoice>() {
            Ok(choice) => choice,
            Err(e) => {
                console.write_line(&e.to_string())?;
                continue;
            }
        };

        let action = match read_action(choice, console)? {
            Step::Run(action) => action,
            Step::Exit => return Ok(SessionEnd::Exit),
            Step::EndOfInput => return Ok(SessionEnd::EndOfInput),
        };

        let mut lines = Vec::new();
        let result = dispatch(ctx, chain, &action, &mut lines).await;
        if action.is_mutating() {
            console.write_line("")?;
        }
        for line in &lines {
            console.write_line(line)?;
        }

        if let Err(e) = result {
            if e.is_fatal() {
                return Err(e);
            }
            log::warn!("{:?} failed: {}", action, e);
            console.write_line(&format!("❌ {}", e))?;
        }

        match console.prompt("\nDo you want to continue? (y/n) ")? {
            None => return Ok(SessionEnd::EndOfInput),
            Some(answer) if is_no(&answer) => return Ok(SessionEnd::Declined),
            Some(_) => {}
        }
    }
}

enum Step {
    Run(Action),
    Exit,
    EndOfInput,
}

fn read_action<R: BufRead, W: Write>(
    choice: MenuChoice,
    console: &mut Console<R, W>,
) -> std::io::Result<Step> {
    let action = match choice {
        MenuChoice::Exit => return Ok(Step::Exit),
        MenuChoice::TotalSupply => Some(Action::TotalSupply),
        MenuChoice::Balance => console
            .prompt_address("Enter address: ")?
            .map(|owner| Action::Balance { owner }),
        MenuChoice::Transfer => match console.prompt_address("Enter receiver address: ")? {
            Some(to) => console
                .prompt_amount("Enter transfer amount: ")?
                .map(|amount| Action::Transfer { to, amount }),
            None => None,
        },
        MenuChoice::Mint => console
            .prompt_amount("Enter mint amount: ")?
            .map(|amount| Action::Mint { amount }),
        MenuChoice::Burn => console
            .prompt_amount("Enter burn amount: ")?
            .map(|amount| Action::Burn { amount }),
    };

    Ok(action.map_or(Step::EndOfInput, Step::Run))
}

fn is_no(answer: &str) -> bool {
    matches!(answer.trim(), "n" | "N" | "no" | "No" | "NO")
}
