use std::borrow::Cow;

/// Errors raised while starting or stopping the CPU profiler.
#[cwatch_derive::cwatch_error]
pub enum ProfilerError {
    /// The sampler failed: it could not be installed (e.g., another profiler
    /// is running) or its samples could not be turned into a report.
    #[error("CPU sampler error{}: {source}", format_context(context))]
    Sampler { source: pprof::Error, context: Option<Cow<'static, str>> },

    #[error("Profile IO error{}: {source}", format_context(context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Profile serialization error{}: {source}", format_context(context))]
    Serialize { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// Invalid settings supplied to the builder.
    #[error("Invalid profiler configuration{}: {message}", format_context(context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
