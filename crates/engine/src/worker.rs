// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One of the K worker tasks the controller spawns (SPEC_FULL.md §4.2):
//! pulls a target's [`ScanData`] off the shared queue, runs the job
//! pipeline if it hasn't started yet, waits for the scanner to finish, reaps
//! the job's cloud resources, and reports a [`CompletionMessage`].

use crate::pipeline::run_job_pipeline;
use crate::reaper;
use crate::scan_data::{CompletionMessage, ScanData};
use crate::waiter::{wait_for_result, WaitOutcome};
use crate::PipelineError;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tracing::{info, instrument};
use vmscan_core::{FamilyState, ScanConfig};
use vmscan_provider::{Provider, ScanContext};
use vmscan_store::BackendStore;

/// Runs until the queue is drained (all senders dropped) or the kill signal
/// fires. On cancellation, the in-flight job (if any) is reaped and the
/// worker exits without reporting a completion for it — the controller's
/// own terminal path accounts for unfinished targets.
#[instrument(skip_all)]
pub async fn run_worker(
    ctx: ScanContext,
    provider: &dyn Provider,
    store: &dyn BackendStore,
    config: &ScanConfig,
    mut queue: mpsc::Receiver<ScanData>,
    completions: mpsc::Sender<CompletionMessage>,
) {
    loop {
        let data = tokio::select! {
            biased;
            _ = ctx.cancelled() => {
                info!("worker exiting: kill signal received");
                return;
            }
            item = queue.recv() => match item {
                Some(data) => data,
                None => return,
            },
        };

        let completion = process_one(&ctx, provider, store, config, data).await;
        if let Some(completion) = completion {
            if completions.send(completion).await.is_err() {
                return;
            }
        } else {
            return;
        }
    }
}

/// Same loop as [`run_worker`], but pulling from a queue shared by every
/// worker in the pool (the controller spawns one OS task per worker, all
/// locking the same receiver to claim the next [`ScanData`]).
#[instrument(skip_all)]
pub async fn run_worker_from_shared_queue(
    ctx: ScanContext,
    provider: &dyn Provider,
    store: &dyn BackendStore,
    config: &ScanConfig,
    queue: Arc<AsyncMutex<mpsc::Receiver<ScanData>>>,
    completions: mpsc::Sender<CompletionMessage>,
) {
    loop {
        let data = tokio::select! {
            biased;
            _ = ctx.cancelled() => {
                info!("worker exiting: kill signal received");
                return;
            }
            item = async { queue.lock().await.recv().await } => match item {
                Some(data) => data,
                None => return,
            },
        };

        let completion = process_one(&ctx, provider, store, config, data).await;
        if let Some(completion) = completion {
            if completions.send(completion).await.is_err() {
                return;
            }
        } else {
            return;
        }
    }
}

/// Drives a single target to completion. Returns `None` when cancellation
/// cut the job short — the caller must stop without reporting a completion.
#[instrument(skip_all, fields(target_id = %data.target.id, scan_result_id = %data.result_id))]
async fn process_one(
    ctx: &ScanContext,
    provider: &dyn Provider,
    store: &dyn BackendStore,
    config: &ScanConfig,
    data: ScanData,
) -> Option<CompletionMessage> {
    let target_id = data.target.id.clone();
    let result_id = data.result_id.clone();

    let status = match store.get_scan_result_status(&result_id).await {
        Ok(status) => status,
        Err(_) => {
            return Some(CompletionMessage { target_id, result_id, success: false, timed_out: false });
        }
    };

    let job = match status.general {
        FamilyState::Done | FamilyState::NotScanned => {
            return Some(CompletionMessage { target_id, result_id, success: true, timed_out: false });
        }
        FamilyState::Init => {
            match run_job_pipeline(ctx, provider, store, config, &data.target, &result_id).await {
                Ok(job) => Some(job),
                Err(PipelineError::Cancelled) => return None,
                Err(err) => {
                    info!(error = %err, "job pipeline failed");
                    return Some(CompletionMessage { target_id, result_id, success: false, timed_out: false });
                }
            }
        }
        // Already attached/in progress/aborted from an earlier step in this
        // same run: the pipeline already provisioned the job, fall through
        // to waiting on it.
        FamilyState::Attached | FamilyState::InProgress | FamilyState::Aborted => None,
    };

    let outcome = wait_for_result(
        ctx,
        store,
        &result_id,
        config.job_results_polling_interval,
        config.job_result_timeout,
    )
    .await;

    match outcome {
        WaitOutcome::Finished { success } => {
            if let Some(job) = &job {
                reaper::reap(ctx, job, success, true, config.delete_job_policy).await;
            }
            Some(CompletionMessage { target_id, result_id, success, timed_out: false })
        }
        WaitOutcome::TimedOut => {
            if let Some(job) = &job {
                reaper::reap(ctx, job, false, true, config.delete_job_policy).await;
            }
            Some(CompletionMessage { target_id, result_id, success: false, timed_out: true })
        }
        WaitOutcome::Cancelled => {
            if let Some(job) = &job {
                reaper::reap(ctx, job, false, false, config.delete_job_policy).await;
            }
            None
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
