use std::collections::HashMap;

use rayon::prelude::*;

use crate::{
    caption::{model::Page, schedule::ScheduledFrame},
    eval::{
        fingerprint::{FrameFingerprint, fingerprint_inputs},
        job::PreparedJob,
    },
    foundation::{
        core::{FrameIndex, FrameRange},
        error::{CaptionFxError, CaptionFxResult},
    },
    style::presenter::{FrameContext, PresentInputs, PresentedPage, StylePresenter},
    text::{
        fit::{TextFitter, TextMeasure},
        fonts::{FontBook, ParleyMeasurer},
    },
};

/// Caption state of one output frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CaptionFrame {
    pub frame: FrameIndex,
    /// Page on screen and the page-local time, if any page is shown.
    pub scheduled: Option<ScheduledFrame>,
    pub page: Option<PresentedPage>,
}

/// Evaluate a single frame.
///
/// Fits the on-screen page with `fitter`, then presents it. Frames outside
/// every page window evaluate to an empty [`CaptionFrame`].
pub fn evaluate_frame<M: TextMeasure>(
    job: &PreparedJob,
    fitter: &mut TextFitter<M>,
    frame: FrameIndex,
) -> CaptionFxResult<CaptionFrame> {
    let presenter = StylePresenter::new(&job.style, job.canvas);
    let scheduled = job.schedule.locate(frame);
    let page = match scheduled {
        None => None,
        Some(s) => {
            let page = page_at(job, s.page_index)?;
            let font_size = presenter.font_size_for(fitter, page, &job.font_family)?;
            Some(presenter.present(&frame_context(job, s), page, font_size))
        }
    };
    Ok(CaptionFrame {
        frame,
        scheduled,
        page,
    })
}

/// Evaluate a range of frames (inclusive start, exclusive end) with Parley
/// measuring against `fonts`.
pub fn evaluate_frames(
    job: &PreparedJob,
    fonts: &FontBook,
    range: FrameRange,
) -> CaptionFxResult<Vec<CaptionFrame>> {
    evaluate_frames_with_stats(job, fonts, range, &EvalThreading::default())
        .map(|(frames, _)| frames)
}

#[derive(Clone, Debug)]
pub struct EvalThreading {
    pub parallel: bool,
    pub chunk_size: usize,
    pub threads: Option<usize>,
    pub static_frame_elision: bool,
}

impl Default for EvalThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            static_frame_elision: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct EvalStats {
    pub frames_total: u64,
    pub frames_evaluated: u64,
    pub frames_elided: u64,
}

pub fn evaluate_frames_with_stats(
    job: &PreparedJob,
    fonts: &FontBook,
    range: FrameRange,
    threading: &EvalThreading,
) -> CaptionFxResult<(Vec<CaptionFrame>, EvalStats)> {
    fonts.require(&job.font_family)?;
    evaluate_frames_with_measurer(job, range, threading, || ParleyMeasurer::new(fonts))
}

/// Evaluate a range of frames with a caller-supplied text measurer.
///
/// `new_measurer` runs once for serial evaluation and once per worker thread
/// when `threading.parallel` is set. Output is identical either way.
#[tracing::instrument(skip_all, fields(start = range.start.0, end = range.end.0))]
pub fn evaluate_frames_with_measurer<F, M>(
    job: &PreparedJob,
    range: FrameRange,
    threading: &EvalThreading,
    new_measurer: F,
) -> CaptionFxResult<(Vec<CaptionFrame>, EvalStats)>
where
    F: Fn() -> M + Sync,
    M: TextMeasure,
{
    if range.is_empty() {
        return Err(CaptionFxError::validation("eval range must be non-empty"));
    }

    let len = range.len_frames();
    let mut out = Vec::with_capacity(len.min(4096) as usize);
    let mut stats = EvalStats::default();
    let chunk_size = normalized_chunk_size(threading.chunk_size);
    let presenter = StylePresenter::new(&job.style, job.canvas);
    let mut font_sizes = HashMap::<usize, f64>::new();

    let mut worker = if threading.parallel {
        Worker::Pool(build_thread_pool(threading.threads)?)
    } else {
        Worker::Serial(TextFitter::new(new_measurer()))
    };

    let mut chunk_start = range.start.0;
    while chunk_start < range.end.0 {
        let chunk_end = (chunk_start + chunk_size).min(range.end.0);
        let chunk = FrameRange::new(FrameIndex(chunk_start), FrameIndex(chunk_end))
            .map_err(|e| CaptionFxError::evaluation(format!("invalid chunk range: {e}")))?;
        let (mut frames, chunk_stats) = evaluate_chunk(
            job,
            &presenter,
            chunk,
            threading,
            &mut worker,
            &new_measurer,
            &mut font_sizes,
        )?;
        out.append(&mut frames);
        stats.frames_total += chunk_stats.frames_total;
        stats.frames_evaluated += chunk_stats.frames_evaluated;
        stats.frames_elided += chunk_stats.frames_elided;
        chunk_start = chunk_end;
    }

    tracing::debug!(
        frames = stats.frames_total,
        evaluated = stats.frames_evaluated,
        elided = stats.frames_elided,
        "evaluated caption frames"
    );
    Ok((out, stats))
}

enum Worker<M> {
    Serial(TextFitter<M>),
    Pool(rayon::ThreadPool),
}

struct FrameEval {
    scheduled: Option<ScheduledFrame>,
    inputs: Option<PresentInputs>,
    fingerprint: FrameFingerprint,
}

fn evaluate_chunk<F, M>(
    job: &PreparedJob,
    presenter: &StylePresenter<'_>,
    range: FrameRange,
    threading: &EvalThreading,
    worker: &mut Worker<M>,
    new_measurer: &F,
    font_sizes: &mut HashMap<usize, f64>,
) -> CaptionFxResult<(Vec<CaptionFrame>, EvalStats)>
where
    F: Fn() -> M + Sync,
    M: TextMeasure,
{
    let mut evals = Vec::with_capacity(range.len_frames() as usize);
    for f in range.start.0..range.end.0 {
        let scheduled = job.schedule.locate(FrameIndex(f));
        let inputs = match scheduled {
            None => None,
            Some(s) => {
                let page = page_at(job, s.page_index)?;
                Some(presenter.inputs(&frame_context(job, s), page))
            }
        };
        let fingerprint = fingerprint_inputs(inputs.as_ref());
        evals.push(FrameEval {
            scheduled,
            inputs,
            fingerprint,
        });
    }

    let mut unique_indices = Vec::<usize>::with_capacity(evals.len());
    let mut frame_to_unique = Vec::<usize>::with_capacity(evals.len());
    if threading.static_frame_elision {
        let mut first = HashMap::<FrameFingerprint, usize>::new();
        for (idx, frame) in evals.iter().enumerate() {
            if let Some(existing) = first.get(&frame.fingerprint).copied() {
                frame_to_unique.push(existing);
            } else {
                let slot = unique_indices.len();
                unique_indices.push(idx);
                first.insert(frame.fingerprint, slot);
                frame_to_unique.push(slot);
            }
        }
    } else {
        for idx in 0..evals.len() {
            frame_to_unique.push(idx);
            unique_indices.push(idx);
        }
    }

    let mut missing: Vec<usize> = unique_indices
        .iter()
        .filter_map(|&i| evals[i].inputs.as_ref().map(|inp| inp.page_index))
        .filter(|p| !font_sizes.contains_key(p))
        .collect();
    missing.sort_unstable();
    missing.dedup();

    match worker {
        Worker::Serial(fitter) => {
            for page_index in missing {
                let page = page_at(job, page_index)?;
                let size = presenter.font_size_for(fitter, page, &job.font_family)?;
                font_sizes.insert(page_index, size);
            }
        }
        Worker::Pool(pool) => {
            let fitted = pool.install(|| {
                missing
                    .par_iter()
                    .map_init(
                        || TextFitter::new(new_measurer()),
                        |fitter, &page_index| -> CaptionFxResult<(usize, f64)> {
                            let page = page_at(job, page_index)?;
                            let size = presenter.font_size_for(fitter, page, &job.font_family)?;
                            Ok((page_index, size))
                        },
                    )
                    .collect::<Vec<_>>()
            });
            for item in fitted {
                let (page_index, size) = item?;
                font_sizes.insert(page_index, size);
            }
        }
    }

    let font_sizes = &*font_sizes;
    let present_one = |eval_idx: usize| -> CaptionFxResult<Option<PresentedPage>> {
        let Some(inputs) = &evals[eval_idx].inputs else {
            return Ok(None);
        };
        let page = page_at(job, inputs.page_index)?;
        let font_size = font_sizes.get(&inputs.page_index).copied().ok_or_else(|| {
            CaptionFxError::evaluation("internal error: page was never fitted")
        })?;
        Ok(Some(presenter.present_inputs(inputs, page, font_size)))
    };

    let presented: Vec<CaptionFxResult<Option<PresentedPage>>> = match worker {
        Worker::Serial(_) => unique_indices.iter().map(|&i| present_one(i)).collect(),
        Worker::Pool(pool) => {
            pool.install(|| unique_indices.par_iter().map(|&i| present_one(i)).collect())
        }
    };

    let mut unique_pages = Vec::<Option<Option<PresentedPage>>>::with_capacity(presented.len());
    for item in presented {
        unique_pages.push(Some(item?));
    }

    let mut remaining = vec![0usize; unique_pages.len()];
    for &u in &frame_to_unique {
        remaining[u] += 1;
    }

    let mut out = Vec::<CaptionFrame>::with_capacity(frame_to_unique.len());
    for (offset, u) in frame_to_unique.into_iter().enumerate() {
        let page = if remaining[u] == 1 {
            unique_pages[u].take().ok_or_else(|| {
                CaptionFxError::evaluation("internal error: unique frame missing at final take")
            })?
        } else {
            unique_pages[u]
                .as_ref()
                .ok_or_else(|| {
                    CaptionFxError::evaluation(
                        "internal error: unique frame missing during clone path",
                    )
                })?
                .clone()
        };
        remaining[u] -= 1;
        out.push(CaptionFrame {
            frame: FrameIndex(range.start.0 + offset as u64),
            scheduled: evals[offset].scheduled,
            page,
        });
    }

    let total = evals.len() as u64;
    let evaluated = unique_indices.len() as u64;
    Ok((
        out,
        EvalStats {
            frames_total: total,
            frames_evaluated: evaluated,
            frames_elided: total.saturating_sub(evaluated),
        },
    ))
}

fn frame_context(job: &PreparedJob, s: ScheduledFrame) -> FrameContext {
    FrameContext {
        canvas: job.canvas,
        fps: job.fps,
        page_index: s.page_index,
        frame_in_page: s.frame_in_page,
        current_ms: s.current_ms,
    }
}

fn page_at(job: &PreparedJob, index: usize) -> CaptionFxResult<&Page> {
    job.track.pages.get(index).ok_or_else(|| {
        CaptionFxError::evaluation(format!("internal error: page {index} out of range"))
    })
}

fn build_thread_pool(threads: Option<usize>) -> CaptionFxResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CaptionFxError::validation(
            "eval threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CaptionFxError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/pipeline.rs"]
mod tests;
