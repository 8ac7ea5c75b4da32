//! # Profiler
//!
//! A process-lifetime sampling CPU profiler built on `pprof`.
//!
//! [`CpuProfiler::builder`] configures and starts sampling; the returned
//! [`RunningProfiler`] is the only handle to the session, and
//! [`RunningProfiler::stop`] consumes it, so a session is stopped at most
//! once. Stopping resolves the collected stacks and writes them as a Chrome
//! DevTools `.cpuprofile` document named `cpu-profile-<unix-millis>.cpuprofile`.
//!
//! Only one session can run per process.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cwatch_profiler::CpuProfiler;
//!
//! let profiler = CpuProfiler::builder().frequency(1000).output_dir("profiles").start()?;
//! // ... run the workload ...
//! let path = profiler.stop()?;
//! println!("profile written to {}", path.display());
//! # Ok::<(), cwatch_profiler::ProfilerError>(())
//! ```

pub mod cpuprofile;
mod error;

pub use crate::cpuprofile::{CpuProfile, Frame, StackSample};
pub use crate::error::{ProfilerError, ProfilerErrorExt};

use chrono::Utc;
use cwatch_domain::config::ProfilerConfig;
use cwatch_domain::constants::{PROFILE_FILE_EXTENSION, PROFILE_FILE_PREFIX};
use pprof::{ProfilerGuard, ProfilerGuardBuilder, Report};
use std::fmt;
use std::path::PathBuf;
use tracing::info;

/// Entry point for configuring a profiling session.
#[derive(Debug)]
pub struct CpuProfiler;

impl CpuProfiler {
    /// Returns a builder with the default [`ProfilerConfig`] settings.
    #[must_use]
    pub fn builder() -> CpuProfilerBuilder {
        CpuProfilerBuilder::default().config(&ProfilerConfig::default())
    }
}

#[derive(Debug, Default)]
pub struct CpuProfilerBuilder {
    frequency: i32,
    output_dir: PathBuf,
    blocklist: Vec<String>,
}

impl CpuProfilerBuilder {
    /// Applies every setting from a [`ProfilerConfig`].
    #[must_use]
    pub fn config(self, config: &ProfilerConfig) -> Self {
        Self {
            frequency: config.frequency,
            output_dir: config.output_dir.clone(),
            blocklist: config.blocklist.clone(),
        }
    }

    /// Samples per second.
    #[must_use]
    pub const fn frequency(mut self, frequency: i32) -> Self {
        self.frequency = frequency;
        self
    }

    /// Directory receiving the profile file on stop.
    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Starts sampling every thread of the process.
    ///
    /// # Errors
    /// * [`ProfilerError::InvalidConfiguration`] for a non-positive frequency.
    /// * [`ProfilerError::Sampler`] if the sampler cannot be installed, for
    ///   instance while another session is still running.
    pub fn start(self) -> Result<RunningProfiler, ProfilerError> {
        if self.frequency <= 0 {
            return Err(ProfilerError::InvalidConfiguration {
                message: format!("frequency must be positive, got {}", self.frequency).into(),
                context: None,
            });
        }

        let guard = ProfilerGuardBuilder::default()
            .frequency(self.frequency)
            .blocklist(self.blocklist.as_slice())
            .build()
            .context("Starting CPU sampler")?;

        info!(frequency = self.frequency, "CPU profiling started");
        Ok(RunningProfiler { guard, frequency: self.frequency, output_dir: self.output_dir })
    }
}

/// An active profiling session.
pub struct RunningProfiler {
    guard: ProfilerGuard<'static>,
    frequency: i32,
    output_dir: PathBuf,
}

impl fmt::Debug for RunningProfiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunningProfiler")
            .field("frequency", &self.frequency)
            .field("output_dir", &self.output_dir)
            .finish_non_exhaustive()
    }
}

impl RunningProfiler {
    /// Stops sampling and writes the profile, returning its path.
    ///
    /// # Errors
    /// * [`ProfilerError::Sampler`] if the report cannot be built.
    /// * [`ProfilerError::Io`] / [`ProfilerError::Serialize`] if the file
    ///   cannot be written.
    pub fn stop(self) -> Result<PathBuf, ProfilerError> {
        info!("Stopping CPU profiling");

        let report = self.guard.report().build().context("Building CPU profile report")?;
        drop(self.guard);

        let profile = profile_from_report(&report);
        let path = self.output_dir.join(profile_file_name(Utc::now().timestamp_millis()));
        profile.write_to(&path)?;

        info!(
            path = %path.display(),
            samples = profile.samples.len(),
            nodes = profile.nodes.len(),
            "CPU profile written"
        );
        Ok(path)
    }
}

/// `cpu-profile-<millis>.cpuprofile`
#[must_use]
pub fn profile_file_name(timestamp_millis: i64) -> String {
    format!("{PROFILE_FILE_PREFIX}{timestamp_millis}.{PROFILE_FILE_EXTENSION}")
}

fn profile_from_report(report: &Report) -> CpuProfile {
    // pprof lists frames innermost first, inlined symbols innermost first too.
    let samples = report.data.iter().filter_map(|(stack, &count)| {
        let count = u64::try_from(count).ok().filter(|&count| count > 0)?;
        let frames = stack
            .frames
            .iter()
            .rev()
            .flat_map(|symbols| symbols.iter().rev())
            .map(|symbol| Frame {
                function: symbol.name(),
                file: symbol.filename.as_ref().map(|file| file.display().to_string()),
                line: symbol.lineno,
            })
            .collect();
        Some(StackSample { thread: stack.thread_name.clone(), frames, count })
    });

    CpuProfile::from_samples(
        samples,
        report.timing.start_time,
        report.timing.duration,
        report.timing.frequency,
    )
}
