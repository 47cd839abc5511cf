/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines progress reporting messages, sinks, and helper functions for long-running processes.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Progress reporting primitives for long-running computations.

use crate::error::Stage;
use std::fmt::Debug;
use std::sync::{Arc, mpsc};
use std::thread;

/// Progress events emitted while a model is built.
#[derive(Debug, Clone)]
pub enum ProgressMsg {
    /// A pipeline stage finished successfully.
    StageCompleted { stage: Stage },

    /// One pass of the active-set solver, with the number of bounded rows it activated.
    ActiveSetPass { pass: usize, promoted: usize },

    /// One greedy refinement iteration.
    GreedyIteration {
        iteration: usize,
        active_constraints: usize,
        added: usize,
    },

    /// Interface iso values were re-derived from the solved field.
    IsoValuesUpdated { count: usize },

    /// Arbitrary informational message.
    Message { message: String },
}

/// Sink that consumes progress messages.
pub trait ProgressSink: Send + Sync + Debug {
    fn emit(&self, msg: ProgressMsg);
}

/// Progress sink that forwards messages over a channel.
#[derive(Debug)]
pub struct ClosureSink {
    tx: mpsc::SyncSender<ProgressMsg>,
}

impl ProgressSink for ClosureSink {
    #[inline]
    fn emit(&self, msg: ProgressMsg) {
        let _ = self.tx.try_send(msg);
    }
}

/// Spawns a listener thread that runs a handler closure for each progress message.
///
/// The listener exits once every clone of the returned sink has been dropped.
pub fn closure_sink<F>(
    buffer: usize,
    mut handler: F,
) -> (Arc<dyn ProgressSink>, thread::JoinHandle<()>)
where
    F: FnMut(ProgressMsg) + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel::<ProgressMsg>(buffer.max(1));
    let sink: Arc<dyn ProgressSink> = Arc::new(ClosureSink { tx });

    let handle = thread::spawn(move || {
        while let Ok(msg) = rx.recv() {
            handler(msg);
        }
    });

    (sink, handle)
}

/// Emits `msg` if a sink is attached.
#[inline]
pub(crate) fn report(sink: &Option<Arc<dyn ProgressSink>>, msg: ProgressMsg) {
    if let Some(sink) = sink {
        sink.emit(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;
    use std::sync::Mutex;

    #[test]
    fn closure_sink_delivers_messages() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_handler = Arc::clone(&seen);
        let (sink, handle) = closure_sink(16, move |msg| {
            if let ProgressMsg::StageCompleted { stage } = msg {
                seen_in_handler.lock().unwrap().push(stage);
            }
        });

        let sink = Some(sink);
        report(&sink, ProgressMsg::StageCompleted { stage: Stage::ProcessInputData });
        report(&sink, ProgressMsg::Message { message: "ignored".into() });
        report(&sink, ProgressMsg::StageCompleted { stage: Stage::GetMethodParameters });
        drop(sink);
        handle.join().unwrap();

        let seen = seen.lock().unwrap();
        assert!(*seen == vec![Stage::ProcessInputData, Stage::GetMethodParameters]);
    }
}
