use dj_base::StopSignal;
use dj_control::{DispatchStats, Dispatcher, MediaBackend};
use dj_gesture::GesturePipeline;
use dj_hands::{HandError, HandStream, Tick};
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Ctrl-C or `q` on stdin.
    Signal,
    /// A replay reached its end.
    StreamEnded,
}

/// What happened during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub hands: u64,
    pub dropped: u64,
    pub events: u64,
    pub dispatch: DispatchStats,
    pub reason: StopReason,
}

/// The frame loop: ticks in, gesture events out to the backend.
///
/// `stop` is polled once per tick. Events are dispatched inline, so a slow
/// backend call delays the next tick by at most the dispatcher's call
/// timeout.
pub async fn run_loop<H, B>(
    stream: &mut H,
    pipeline: &mut GesturePipeline,
    dispatcher: &mut Dispatcher<B>,
    stop: &StopSignal,
) -> Result<RunSummary, HandError>
where
    H: HandStream,
    B: MediaBackend,
{
    let mut ticks = 0;
    let mut hands = 0;
    let mut dropped = 0;
    let mut events = 0;

    let reason = loop {
        if stop.is_raised() {
            break StopReason::Signal;
        }

        let Some(tick) = stream.next_tick().await? else {
            break StopReason::StreamEnded;
        };

        ticks += 1;
        match &tick {
            Tick::Hand(_) => hands += 1,
            Tick::Dropped => dropped += 1,
            Tick::NoHand(_) => {}
        }

        if let Some(event) = pipeline.process_tick(&tick) {
            events += 1;
            dispatcher.dispatch(&event).await;
        }
    };

    Ok(RunSummary {
        ticks,
        hands,
        dropped,
        events,
        dispatch: dispatcher.stats(),
        reason,
    })
}

/// Raise `stop` on Ctrl-C.
pub fn watch_ctrl_c(stop: StopSignal) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("interrupt received, stopping");
                stop.raise();
            }
            Err(e) => log::warn!("cannot listen for Ctrl-C: {}", e),
        }
    });
}

/// Raise `stop` when the user types `q` and Enter.
///
/// Reads stdin on a plain thread; a blocking read would otherwise hold up
/// the runtime at shutdown. A closed stdin leaves the run going.
pub fn spawn_stdin_watcher(stop: StopSignal) {
    let spawned = std::thread::Builder::new()
        .name("stdin-watcher".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if is_quit(&line) {
                    log::info!("quit requested, stopping");
                    stop.raise();
                    break;
                }
            }
        });

    if let Err(e) = spawned {
        log::warn!("cannot watch stdin for quit: {}", e);
    }
}

pub fn is_quit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("q")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_line() {
        assert!(is_quit("q"));
        assert!(is_quit(" Q \n"));
        assert!(!is_quit("quit"));
        assert!(!is_quit(""));
    }
}
