#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the workspace:
//! * [`macro@main`] boots an `async fn main` on a preset Tokio runtime.
//! * [`macro@cwatch_error`] turns an enum into a context-aware error type.
//!
//! Examples are `ignore`d here because the generated code refers to crates
//! (`cwatch_runtime`, `thiserror`) that this proc-macro crate does not link.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, parse_macro_input};

/// Attribute macro to bootstrap the Tokio runtime.
///
/// Rewrites `async fn main` into a plain `fn main` that builds a runtime from a
/// `cwatch_runtime::RuntimeConfig` preset and blocks on the original body.
///
/// # Arguments
///
/// * `single_threaded` - A current-thread runtime: one thread drives every task.
/// * `default` (or no argument) - The multi-threaded default configuration.
///
/// # Examples
///
/// ```rust,ignore
/// #[cwatch_runtime::main(single_threaded)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro for defining crate-level error enums.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * A `<ErrorName>Ext` trait adding `.context(...)` to `Result<T, ErrorName>`
///   and to `Result<T, Source>` for every variant wrapping a source error.
/// * `From<Source>` for each variant with a `source` field (or a field marked
///   `#[source]`/`#[from]`).
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }`
///   variant exists.
/// * A module-private `format_context` helper for `#[error(...)]` strings.
///
/// # Requirements
///
/// Variants must use named fields. A variant with a source must also carry
/// `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[cwatch_derive::cwatch_error]
/// pub enum StoreError {
///     #[error("IO error{}: {source}", format_context(context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal error{}: {message}", format_context(context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read() -> Result<String, StoreError> {
///     std::fs::read_to_string("data.json").context("Reading data file")
/// }
/// ```
#[proc_macro_attribute]
pub fn cwatch_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
