//! # Code Segmenter - Declaration-Level Segmentation of Python Sources
//!
//! Splits a Python source file into an ordered sequence of self-contained
//! chunks using tree-sitter: one chunk per top-level function, async
//! function, or class, one for the conventional
//! `if __name__ == "__main__":` block, plus two synthetic aggregates
//! collecting all import statements and all top-level variable bindings.
//! Each chunk carries its kind, display name, originating file name, and
//! exact line span, ready for downstream consumers (embedding pipelines,
//! knowledge bases, review tooling) to index however they see fit.
//!
//! ## Overview
//!
//! The engine is three stateless stages wired together per invocation:
//!
//! 1. **Parser** - turns raw source text into a syntax tree, rejecting
//!    syntactically invalid input with a single parse-error kind.
//! 2. **Classifier** - walks the tree's top-level statements in source order
//!    and assigns each a category (declaration, import, binding,
//!    entry-point block, unrecognized).
//! 3. **Builder** - converts declarations and the entry-point block into
//!    chunks immediately and flushes the accumulated imports and bindings
//!    into one aggregate chunk each at the end.
//!
//! Segmentation is purely syntactic: no type inference, no cross-file
//! resolution, and the parsed source is never mutated. Unrecognized
//! top-level constructs surface as diagnostics, never failures.
//!
//! Around the engine, the crate ships a small re-segmentation daemon: a
//! filesystem watcher that re-segments qualifying files on change, with
//! debouncing and content-hash deduplication, plus a CLI binary exposing
//! one-shot and watch modes.
//!
//! ## Usage Example
//!
//! ```no_run
//! use code_segmenter::segmenter;
//!
//! fn main() -> anyhow::Result<()> {
//!     let segmentation = segmenter::segment("def f():\n    return 1\n", "example.py")?;
//!
//!     for chunk in &segmentation.chunks {
//!         println!("[{}] {} ({}-{})", chunk.kind, chunk.name, chunk.start_line, chunk.end_line);
//!     }
//!
//!     Ok(())
//! }
//! ```

/// Configuration management with environment variable overrides
pub mod config;

/// Error types and utilities
pub mod error;

/// The segmentation engine: parsing, classification, and chunk building
pub mod segmenter;

/// Directory watching and re-segmentation on file change
pub mod watcher;
