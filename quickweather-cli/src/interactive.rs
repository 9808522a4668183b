use anyhow::Context;
use quickweather_core::{Applied, Completion, LookupController, LookupState, PendingLookup, WeatherClient};
use std::{io::Write, sync::Arc};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    task::JoinSet,
};
use tracing::debug;

use crate::view::{PROMPT, render_state};

const QUIT: &str = ":q";

/// Interactive lookup screen: one input line is one edit + submit.
///
/// Lookups run alongside input, so a new city can be submitted while the
/// previous one is still loading; the controller drops the stale answer.
/// Exits on `:q`, or on end of input once outstanding lookups have finished.
pub async fn run<R, W>(
    client: Arc<dyn WeatherClient>,
    seed: &str,
    input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (mut controller, seed_lookup) = LookupController::start(client, seed);
    let mut in_flight: JoinSet<Completion> = JoinSet::new();

    if let Some(pending) = seed_lookup {
        dispatch(&mut in_flight, pending);
        show(out, controller.state())?;
    } else {
        prompt(out)?;
    }

    let mut lines = input.lines();
    let mut input_open = true;

    while input_open || !in_flight.is_empty() {
        tokio::select! {
            biased;

            Some(joined) = in_flight.join_next() => {
                let completion = joined.context("Lookup task failed")?;
                if controller.complete(completion) == Applied::Stale {
                    continue;
                }
                show(out, controller.state())?;
                if controller.take_focus_request() {
                    debug!("input cleared, ready for next city");
                }
                prompt(out)?;
            }

            line = lines.next_line(), if input_open => {
                match line.context("Failed to read city name from input")? {
                    None => input_open = false,
                    Some(line) if line.trim() == QUIT => break,
                    Some(line) => {
                        controller.set_query_text(line);
                        match controller.submit() {
                            Some(pending) => {
                                dispatch(&mut in_flight, pending);
                                show(out, controller.state())?;
                            }
                            None => prompt(out)?,
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

fn dispatch(in_flight: &mut JoinSet<Completion>, pending: PendingLookup) {
    debug!(query = pending.query(), "spawning lookup");
    in_flight.spawn(pending.run());
}

fn show<W: Write>(out: &mut W, state: &LookupState) -> anyhow::Result<()> {
    let text = render_state(state);
    if !text.is_empty() {
        writeln!(out, "{text}").context("Failed to write to stdout")?;
    }
    Ok(())
}

fn prompt<W: Write>(out: &mut W) -> anyhow::Result<()> {
    write!(out, "{PROMPT}").context("Failed to write to stdout")?;
    out.flush().context("Failed to flush stdout")
}
